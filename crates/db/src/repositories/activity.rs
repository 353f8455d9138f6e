//! Activity repository.

use std::sync::Arc;

use crate::entities::{Activity, activity};
use crate::error::classify_write_err;
use pulse_common::{AppError, AppResult};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, ConnectionTrait, DatabaseConnection, EntityTrait,
    PaginatorTrait, QueryFilter, QueryOrder, QuerySelect,
};

/// Activity repository for database operations.
///
/// Activities are append-only: there is no update operation.
#[derive(Clone)]
pub struct ActivityRepository {
    db: Arc<DatabaseConnection>,
}

impl ActivityRepository {
    /// Create a new activity repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Find an activity by ID.
    pub async fn find_by_id(&self, id: &str) -> AppResult<Option<activity::Model>> {
        Activity::find_by_id(id)
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// List activities (paginated, newest first) with the total count.
    pub async fn find_all(&self, limit: u64, offset: u64) -> AppResult<(Vec<activity::Model>, u64)> {
        let activities = Activity::find()
            .order_by_desc(activity::Column::CreatedAt)
            .offset(offset)
            .limit(limit)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        let total = Activity::find()
            .count(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        Ok((activities, total))
    }

    /// List a user's activities (paginated, newest first) with optional type
    /// and inclusive date-range filters.
    pub async fn find_for_user(
        &self,
        user_id: &str,
        activity_type: Option<activity::ActivityType>,
        date_range: Option<(
            chrono::DateTime<chrono::FixedOffset>,
            chrono::DateTime<chrono::FixedOffset>,
        )>,
        limit: u64,
        offset: u64,
    ) -> AppResult<(Vec<activity::Model>, u64)> {
        let mut condition = Condition::all().add(activity::Column::UserId.eq(user_id));

        if let Some(activity_type) = activity_type {
            condition = condition.add(activity::Column::ActivityType.eq(activity_type));
        }

        if let Some((start, end)) = date_range {
            condition = condition
                .add(activity::Column::CreatedAt.gte(start))
                .add(activity::Column::CreatedAt.lte(end));
        }

        let activities = Activity::find()
            .filter(condition.clone())
            .order_by_desc(activity::Column::CreatedAt)
            .offset(offset)
            .limit(limit)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        let total = Activity::find()
            .filter(condition)
            .count(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        Ok((activities, total))
    }

    /// Create a new activity on the given connection.
    pub async fn create_in<C: ConnectionTrait>(
        &self,
        conn: &C,
        model: activity::ActiveModel,
    ) -> AppResult<activity::Model> {
        model
            .insert(conn)
            .await
            .map_err(|e| classify_write_err(e, "Activity already exists", "User not found"))
    }

    /// Create a new activity.
    pub async fn create(&self, model: activity::ActiveModel) -> AppResult<activity::Model> {
        self.create_in(self.db.as_ref(), model).await
    }

    /// Delete an activity by ID, returning the number of affected rows.
    pub async fn delete(&self, id: &str) -> AppResult<u64> {
        let result = Activity::delete_by_id(id)
            .exec(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(result.rows_affected)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::entities::activity::ActivityType;
    use chrono::Utc;
    use sea_orm::{DatabaseBackend, MockDatabase};

    fn create_test_activity(id: &str, user_id: &str, activity_type: ActivityType) -> activity::Model {
        activity::Model {
            id: id.to_string(),
            user_id: user_id.to_string(),
            activity_type,
            target_id: Some("target1".to_string()),
            metadata: None,
            created_at: Utc::now().into(),
        }
    }

    #[tokio::test]
    async fn test_find_for_user_with_type_filter() {
        let act = create_test_activity("a1", "user1", ActivityType::PostLiked);

        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([vec![act]])
                .append_query_results([vec![maplit::btreemap! {
                    "num_items" => sea_orm::Value::BigInt(Some(1))
                }]])
                .into_connection(),
        );

        let repo = ActivityRepository::new(db);
        let (activities, total) = repo
            .find_for_user("user1", Some(ActivityType::PostLiked), None, 10, 0)
            .await
            .unwrap();

        assert_eq!(activities.len(), 1);
        assert_eq!(total, 1);
        assert_eq!(activities[0].activity_type, ActivityType::PostLiked);
    }

    #[tokio::test]
    async fn test_find_all_returns_total() {
        let act1 = create_test_activity("a1", "user1", ActivityType::PostCreated);
        let act2 = create_test_activity("a2", "user2", ActivityType::UserFollowed);

        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([vec![act1, act2]])
                .append_query_results([vec![maplit::btreemap! {
                    "num_items" => sea_orm::Value::BigInt(Some(2))
                }]])
                .into_connection(),
        );

        let repo = ActivityRepository::new(db);
        let (activities, total) = repo.find_all(10, 0).await.unwrap();

        assert_eq!(activities.len(), 2);
        assert_eq!(total, 2);
    }
}
