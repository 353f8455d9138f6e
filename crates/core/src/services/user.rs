//! User service.

use chrono::Utc;
use pulse_common::{AppError, AppResult, IdGenerator};
use pulse_db::{entities::user, repositories::UserRepository};
use sea_orm::Set;
use serde::Deserialize;
use validator::{Validate, ValidateUrl};

/// User service for business logic.
#[derive(Clone)]
pub struct UserService {
    user_repo: UserRepository,
    id_gen: IdGenerator,
}

/// Input for creating a new user.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateUserInput {
    #[validate(length(min = 3, max = 50))]
    pub username: String,

    #[validate(email, length(max = 100))]
    pub email: String,

    #[validate(length(min = 1, max = 100))]
    pub full_name: String,

    #[validate(length(max = 500))]
    pub bio: Option<String>,

    #[validate(url, length(max = 255))]
    pub avatar_url: Option<String>,
}

/// Input for updating a user. All fields are optional. For the nullable
/// columns (`bio`, `avatarUrl`) an absent field means "leave unchanged"
/// while an explicit JSON `null` clears the stored value, so those two are
/// double-wrapped.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateUserInput {
    #[validate(length(min = 3, max = 50))]
    pub username: Option<String>,

    #[validate(email, length(max = 100))]
    pub email: Option<String>,

    #[validate(length(min = 1, max = 100))]
    pub full_name: Option<String>,

    #[serde(default, deserialize_with = "double_option")]
    pub bio: Option<Option<String>>,

    #[serde(default, deserialize_with = "double_option")]
    pub avatar_url: Option<Option<String>>,
}

/// Maps an absent field to `None` and a present field (including `null`)
/// to `Some(...)`, which plain `Option<Option<T>>` cannot distinguish.
fn double_option<'de, D>(deserializer: D) -> Result<Option<Option<String>>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    Option::<String>::deserialize(deserializer).map(Some)
}

fn validate_username_chars(username: &str) -> AppResult<()> {
    if !username.chars().all(char::is_alphanumeric) {
        return Err(AppError::Validation(
            "Username must contain only alphanumeric characters".to_string(),
        ));
    }
    Ok(())
}

impl UserService {
    /// Create a new user service.
    #[must_use]
    pub const fn new(user_repo: UserRepository) -> Self {
        Self {
            user_repo,
            id_gen: IdGenerator::new(),
        }
    }

    /// Create a new user.
    pub async fn create(&self, input: CreateUserInput) -> AppResult<user::Model> {
        input.validate()?;
        validate_username_chars(&input.username)?;

        let now = Utc::now();
        let model = user::ActiveModel {
            id: Set(self.id_gen.generate()),
            username: Set(input.username),
            email: Set(input.email),
            full_name: Set(input.full_name),
            bio: Set(input.bio),
            avatar_url: Set(input.avatar_url),
            created_at: Set(now.into()),
            updated_at: Set(now.into()),
        };

        let user = self.user_repo.create(model).await?;
        tracing::info!(user_id = %user.id, username = %user.username, "User created");
        Ok(user)
    }

    /// Get a user by ID.
    pub async fn get(&self, id: &str) -> AppResult<user::Model> {
        self.user_repo.get_by_id(id).await
    }

    /// List users, newest first.
    pub async fn list(&self, limit: u64, offset: u64) -> AppResult<(Vec<user::Model>, u64)> {
        self.user_repo.find_all(limit, offset).await
    }

    /// Update a user.
    pub async fn update(&self, id: &str, input: UpdateUserInput) -> AppResult<user::Model> {
        input.validate()?;
        if let Some(ref username) = input.username {
            validate_username_chars(username)?;
        }
        if let Some(Some(ref bio)) = input.bio {
            if bio.chars().count() > 500 {
                return Err(AppError::Validation(
                    "Bio must be at most 500 characters".to_string(),
                ));
            }
        }
        if let Some(Some(ref avatar_url)) = input.avatar_url {
            if avatar_url.chars().count() > 255 {
                return Err(AppError::Validation(
                    "Avatar URL must be at most 255 characters".to_string(),
                ));
            }
            if !avatar_url.is_empty() && !avatar_url.validate_url() {
                return Err(AppError::Validation(
                    "Avatar URL must be a valid URL".to_string(),
                ));
            }
        }

        let user = self.user_repo.get_by_id(id).await?;
        let mut active: user::ActiveModel = user.into();

        if let Some(username) = input.username {
            active.username = Set(username);
        }
        if let Some(email) = input.email {
            active.email = Set(email);
        }
        if let Some(full_name) = input.full_name {
            active.full_name = Set(full_name);
        }
        if let Some(bio) = input.bio {
            active.bio = Set(bio);
        }
        if let Some(avatar_url) = input.avatar_url {
            active.avatar_url = Set(avatar_url);
        }
        active.updated_at = Set(Utc::now().into());

        self.user_repo.update(active).await
    }

    /// Delete a user. Cascades to their posts, likes, follows, and activities.
    pub async fn delete(&self, id: &str) -> AppResult<()> {
        let affected = self.user_repo.delete(id).await?;
        if affected == 0 {
            return Err(AppError::UserNotFound);
        }
        tracing::info!(user_id = %id, "User deleted");
        Ok(())
    }
}
