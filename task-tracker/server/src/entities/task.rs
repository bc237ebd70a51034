use super::sea_orm_active_enums::TaskStatus;
use chrono::{Duration, SubsecRound, Utc};
use sea_orm::ActiveValue::{NotSet, Set, Unchanged};
use sea_orm::ConnectionTrait;
use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "tasks")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    #[sea_orm(column_type = "Text")]
    pub title: String,
    #[sea_orm(column_type = "Text", nullable)]
    pub description: Option<String>,
    pub status: TaskStatus,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

#[async_trait::async_trait]
impl ActiveModelBehavior for ActiveModel {
    /// Stamps `created_at` on insert and refreshes `updated_at` on every save.
    ///
    /// Timestamps are kept at microsecond precision, which every supported
    /// backend stores exactly. An update never leaves `updated_at` where it was.
    async fn before_save<C>(mut self, _db: &C, insert: bool) -> Result<Self, DbErr>
    where
        C: ConnectionTrait,
    {
        let mut now = Utc::now().trunc_subsecs(6);
        if insert {
            self.created_at = Set(now);
        } else {
            match &self.updated_at {
                Set(previous) | Unchanged(previous) if *previous >= now => {
                    now = *previous + Duration::microseconds(1);
                }
                Set(_) | Unchanged(_) | NotSet => {}
            }
        }
        self.updated_at = Set(now);
        Ok(self)
    }
}
