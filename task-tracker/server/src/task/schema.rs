//! Request and response shapes for the task API.
//!
//! These are kept apart from the storage entity so that callers can only
//! propose `title`, `description` and `status`; ids and timestamps belong to
//! the storage layer.

use crate::entities::sea_orm_active_enums::TaskStatus;
use crate::entities::task;
use chrono::{DateTime, Utc};
use sea_orm::ActiveValue::Set;
use serde::{Deserialize, Deserializer, Serialize};
use utoipa::ToSchema;

/// A field of a partial update that may be omitted, cleared, or given a value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Patch<T> {
    /// The field was not present in the request and must not be touched.
    #[default]
    Unset,
    /// The field was present and explicitly `null`.
    Null,
    /// The field was present with a value.
    Value(T),
}

impl<T> Patch<T> {
    /// Converts the patch into the value to store, or `None` when the field was omitted.
    pub fn into_update(self) -> Option<Option<T>> {
        match self {
            Patch::Unset => None,
            Patch::Null => Some(None),
            Patch::Value(value) => Some(Some(value)),
        }
    }
}

// Only reached when the key is present; a missing key falls back to `Default`.
impl<'de, T> Deserialize<'de> for Patch<T>
where
    T: Deserialize<'de>,
{
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        Ok(match Option::<T>::deserialize(deserializer)? {
            Some(value) => Patch::Value(value),
            None => Patch::Null,
        })
    }
}

/// Accepts a present, non-null value. Used with `#[serde(default)]` so that a
/// missing key still maps to `None`.
fn deserialize_non_null<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer)?
        .map(Some)
        .ok_or_else(|| serde::de::Error::custom("value may not be null"))
}

/// Payload for creating a task.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, ToSchema)]
pub struct TaskCreate {
    /// Title of the task
    pub title: String,
    /// Optional free-form description
    #[serde(default)]
    pub description: Option<String>,
}

/// Payload for a partial update. Omitted fields are left untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, ToSchema)]
pub struct TaskUpdate {
    /// New title
    #[serde(default, deserialize_with = "deserialize_non_null")]
    pub title: Option<String>,
    /// New description; `null` clears it
    #[serde(default)]
    #[schema(value_type = Option<String>)]
    pub description: Patch<String>,
    /// New status
    #[serde(default, deserialize_with = "deserialize_non_null")]
    pub status: Option<TaskStatus>,
}

impl TaskUpdate {
    /// Writes the supplied fields onto the active model, leaving the rest unchanged.
    pub fn apply(self, model: &mut task::ActiveModel) {
        if let Some(title) = self.title {
            model.title = Set(title);
        }
        if let Some(description) = self.description.into_update() {
            model.description = Set(description);
        }
        if let Some(status) = self.status {
            model.status = Set(status);
        }
    }
}

/// A task as returned by the API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct TaskRead {
    /// Unique identifier assigned by storage
    pub id: i32,
    pub title: String,
    pub description: Option<String>,
    pub status: TaskStatus,
    /// When the task was created
    pub created_at: DateTime<Utc>,
    /// When the task was last modified
    pub updated_at: DateTime<Utc>,
}

impl From<task::Model> for TaskRead {
    fn from(model: task::Model) -> Self {
        Self {
            id: model.id,
            title: model.title,
            description: model.description,
            status: model.status,
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}
