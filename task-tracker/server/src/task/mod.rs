use crate::entities::sea_orm_active_enums::TaskStatus;
use crate::entities::*;
use sea_orm::*;

pub mod schema;
pub mod web;

pub use schema::{Patch, TaskCreate, TaskRead, TaskUpdate};
pub use web::{TaskState, create_task_router};

const MAX_BOUND: u64 = i64::MAX as u64;

/// Data access for tasks over any connection, pooled or transactional.
pub struct TaskService<'a, C>
where
    C: ConnectionTrait,
{
    db: &'a C,
}

impl<'a, C> TaskService<'a, C>
where
    C: ConnectionTrait,
{
    pub fn new(db: &'a C) -> Self {
        TaskService { db }
    }

    /// Retrieves a task by its ID.
    ///
    /// # Returns
    ///
    /// `Ok(None)` when no task has the given ID.
    #[tracing::instrument(skip(self))]
    pub async fn get_task(&self, id: i32) -> anyhow::Result<Option<task::Model>> {
        let task = task::Entity::find_by_id(id).one(self.db).await?;
        Ok(task)
    }

    /// Lists tasks in insertion order.
    ///
    /// # Arguments
    ///
    /// * `skip` - Number of tasks to discard from the front.
    /// * `limit` - Maximum number of tasks to return.
    ///
    /// Both are capped at `i64::MAX`, the widest value the database binds.
    #[tracing::instrument(skip(self))]
    pub async fn list_tasks(&self, skip: u64, limit: u64) -> anyhow::Result<Vec<task::Model>> {
        let tasks = task::Entity::find()
            .order_by_asc(task::Column::Id)
            .offset(skip.min(MAX_BOUND))
            .limit(limit.min(MAX_BOUND))
            .all(self.db)
            .await?;
        Ok(tasks)
    }

    /// Creates a new task. The status always starts as `todo`.
    ///
    /// # Returns
    ///
    /// The stored task, including its generated ID and timestamps.
    #[tracing::instrument(skip(self))]
    pub async fn create_task(&self, input: TaskCreate) -> anyhow::Result<task::Model> {
        let active_model = task::ActiveModel {
            title: ActiveValue::Set(input.title),
            description: ActiveValue::Set(input.description),
            status: ActiveValue::Set(TaskStatus::Todo),
            ..Default::default()
        };
        let created_model = active_model.insert(self.db).await?;
        tracing::debug!(id = created_model.id, "Created task");
        Ok(created_model)
    }

    /// Applies a partial update to a task.
    ///
    /// Only fields present in `input` are written; `updated_at` is refreshed.
    ///
    /// # Returns
    ///
    /// The updated task, or `Ok(None)` when no task has the given ID.
    #[tracing::instrument(skip(self))]
    pub async fn update_task(
        &self,
        id: i32,
        input: TaskUpdate,
    ) -> anyhow::Result<Option<task::Model>> {
        let Some(task_to_update) = task::Entity::find_by_id(id).one(self.db).await? else {
            return Ok(None);
        };

        let mut active_model: task::ActiveModel = task_to_update.into();
        input.apply(&mut active_model);
        let updated_model = active_model.update(self.db).await?;

        Ok(Some(updated_model))
    }

    /// Deletes a task.
    ///
    /// # Returns
    ///
    /// The task as it was before deletion, or `Ok(None)` when no task has the given ID.
    #[tracing::instrument(skip(self))]
    pub async fn delete_task(&self, id: i32) -> anyhow::Result<Option<task::Model>> {
        let Some(task_to_delete) = task::Entity::find_by_id(id).one(self.db).await? else {
            return Ok(None);
        };

        task_to_delete.clone().delete(self.db).await?;
        tracing::debug!(id, "Deleted task");

        Ok(Some(task_to_delete))
    }
}
