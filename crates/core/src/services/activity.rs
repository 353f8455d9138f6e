//! Activity service.

use chrono::{DateTime, FixedOffset, Utc};
use pulse_common::{AppError, AppResult, IdGenerator};
use pulse_db::{
    entities::activity::{self, ActivityType},
    repositories::{ActivityRepository, UserRepository},
};
use sea_orm::{ConnectionTrait, Set};
use serde::Deserialize;

/// Activity service for the append-only activity log.
#[derive(Clone)]
pub struct ActivityService {
    activity_repo: ActivityRepository,
    user_repo: UserRepository,
    id_gen: IdGenerator,
}

/// Input for creating an activity directly.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateActivityInput {
    pub user_id: String,
    pub activity_type: ActivityType,
    pub target_id: Option<String>,
    pub metadata: Option<serde_json::Value>,
}

/// Filters for a user's activity history.
#[derive(Debug, Default)]
pub struct ActivityFilter {
    pub activity_type: Option<ActivityType>,
    pub start_date: Option<DateTime<FixedOffset>>,
    pub end_date: Option<DateTime<FixedOffset>>,
}

impl ActivityService {
    /// Create a new activity service.
    #[must_use]
    pub const fn new(activity_repo: ActivityRepository, user_repo: UserRepository) -> Self {
        Self {
            activity_repo,
            user_repo,
            id_gen: IdGenerator::new(),
        }
    }

    /// Record an activity row for a domain mutation, on the given connection.
    ///
    /// Callers performing multi-step mutations pass their transaction here so
    /// the activity commits or rolls back with the primary write.
    pub async fn record_in<C: ConnectionTrait>(
        &self,
        conn: &C,
        user_id: &str,
        activity_type: ActivityType,
        target_id: Option<String>,
        metadata: Option<serde_json::Value>,
    ) -> AppResult<activity::Model> {
        let model = activity::ActiveModel {
            id: Set(self.id_gen.generate()),
            user_id: Set(user_id.to_string()),
            activity_type: Set(activity_type),
            target_id: Set(target_id),
            metadata: Set(metadata),
            created_at: Set(Utc::now().into()),
        };

        self.activity_repo.create_in(conn, model).await
    }

    /// Create an activity from client input.
    pub async fn create(&self, input: CreateActivityInput) -> AppResult<activity::Model> {
        let model = activity::ActiveModel {
            id: Set(self.id_gen.generate()),
            user_id: Set(input.user_id),
            activity_type: Set(input.activity_type),
            target_id: Set(input.target_id),
            metadata: Set(input.metadata),
            created_at: Set(Utc::now().into()),
        };

        self.activity_repo.create(model).await
    }

    /// Get an activity by ID.
    pub async fn get(&self, id: &str) -> AppResult<activity::Model> {
        self.activity_repo
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound("Activity".to_string()))
    }

    /// List all activities, newest first.
    pub async fn list(&self, limit: u64, offset: u64) -> AppResult<(Vec<activity::Model>, u64)> {
        self.activity_repo.find_all(limit, offset).await
    }

    /// List a user's activities, newest first, with optional type and date
    /// range filters.
    ///
    /// Date filtering is all-or-nothing: supplying only one bound is rejected
    /// rather than silently ignored.
    pub async fn list_for_user(
        &self,
        user_id: &str,
        filter: ActivityFilter,
        limit: u64,
        offset: u64,
    ) -> AppResult<(Vec<activity::Model>, u64)> {
        self.user_repo.get_by_id(user_id).await?;

        let date_range = match (filter.start_date, filter.end_date) {
            (Some(start), Some(end)) => Some((start, end)),
            (None, None) => None,
            _ => {
                return Err(AppError::Validation(
                    "Both startDate and endDate are required for date filtering".to_string(),
                ));
            }
        };

        self.activity_repo
            .find_for_user(user_id, filter.activity_type, date_range, limit, offset)
            .await
    }

    /// Delete an activity by ID.
    pub async fn delete(&self, id: &str) -> AppResult<()> {
        let affected = self.activity_repo.delete(id).await?;
        if affected == 0 {
            return Err(AppError::NotFound("Activity".to_string()));
        }
        Ok(())
    }
}
