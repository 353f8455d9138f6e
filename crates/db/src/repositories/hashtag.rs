//! Hashtag repository.

use std::sync::Arc;

use crate::entities::{Hashtag, hashtag};
use crate::error::{classify_write_err, is_unique_violation};
use chrono::Utc;
use pulse_common::{AppError, AppResult, IdGenerator};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, QuerySelect, Set,
};

/// Hashtag repository for database operations.
#[derive(Clone)]
pub struct HashtagRepository {
    db: Arc<DatabaseConnection>,
    id_gen: IdGenerator,
}

impl HashtagRepository {
    /// Create a new hashtag repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self {
            db,
            id_gen: IdGenerator::new(),
        }
    }

    /// Find a hashtag by ID.
    pub async fn find_by_id(&self, id: &str) -> AppResult<Option<hashtag::Model>> {
        Hashtag::find_by_id(id)
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Find a hashtag by ID, returning an error if not found.
    pub async fn get_by_id(&self, id: &str) -> AppResult<hashtag::Model> {
        self.find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound("Hashtag".to_string()))
    }

    /// Find a hashtag by its normalized name.
    pub async fn find_by_name(&self, name: &str) -> AppResult<Option<hashtag::Model>> {
        let name_lower = name.to_lowercase();
        Hashtag::find()
            .filter(hashtag::Column::Name.eq(&name_lower))
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Find hashtags by IDs.
    pub async fn find_by_ids(&self, ids: &[String]) -> AppResult<Vec<hashtag::Model>> {
        if ids.is_empty() {
            return Ok(vec![]);
        }

        Hashtag::find()
            .filter(hashtag::Column::Id.is_in(ids.to_vec()))
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// List hashtags (paginated, newest first) with the total count.
    pub async fn find_all(&self, limit: u64, offset: u64) -> AppResult<(Vec<hashtag::Model>, u64)> {
        let hashtags = Hashtag::find()
            .order_by_desc(hashtag::Column::CreatedAt)
            .offset(offset)
            .limit(limit)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        let total = Hashtag::find()
            .count(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        Ok((hashtags, total))
    }

    /// Get or create a hashtag by normalized name.
    ///
    /// Concurrent identical creates race on the unique name index; the loser
    /// re-fetches the winner's row instead of surfacing a conflict.
    pub async fn get_or_create(&self, name: &str) -> AppResult<hashtag::Model> {
        let name_lower = name.to_lowercase();

        if let Some(tag) = self.find_by_name(&name_lower).await? {
            return Ok(tag);
        }

        let model = hashtag::ActiveModel {
            id: Set(self.id_gen.generate()),
            name: Set(name_lower.clone()),
            created_at: Set(Utc::now().into()),
        };

        match model.insert(self.db.as_ref()).await {
            Ok(tag) => Ok(tag),
            Err(e) if is_unique_violation(&e) => self
                .find_by_name(&name_lower)
                .await?
                .ok_or_else(|| AppError::Database(e.to_string())),
            Err(e) => Err(AppError::Database(e.to_string())),
        }
    }

    /// Create a new hashtag.
    pub async fn create(&self, model: hashtag::ActiveModel) -> AppResult<hashtag::Model> {
        model
            .insert(self.db.as_ref())
            .await
            .map_err(|e| classify_write_err(e, "Hashtag already exists", "Hashtag not found"))
    }

    /// Update a hashtag.
    pub async fn update(&self, model: hashtag::ActiveModel) -> AppResult<hashtag::Model> {
        model
            .update(self.db.as_ref())
            .await
            .map_err(|e| classify_write_err(e, "Hashtag already exists", "Hashtag not found"))
    }

    /// Delete a hashtag by ID, returning the number of affected rows.
    pub async fn delete(&self, id: &str) -> AppResult<u64> {
        let result = Hashtag::delete_by_id(id)
            .exec(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(result.rows_affected)
    }
}
