//! Activity entity (append-only side-effect log).

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Activity types recorded alongside domain mutations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(32))")]
pub enum ActivityType {
    #[sea_orm(string_value = "POST_CREATED")]
    #[serde(rename = "POST_CREATED")]
    PostCreated,
    #[sea_orm(string_value = "POST_LIKED")]
    #[serde(rename = "POST_LIKED")]
    PostLiked,
    #[sea_orm(string_value = "USER_FOLLOWED")]
    #[serde(rename = "USER_FOLLOWED")]
    UserFollowed,
    #[sea_orm(string_value = "USER_UNFOLLOWED")]
    #[serde(rename = "USER_UNFOLLOWED")]
    UserUnfollowed,
}

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "activities")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,

    /// The user the activity belongs to
    #[sea_orm(indexed)]
    pub user_id: String,

    pub activity_type: ActivityType,

    /// ID of the affected entity (post, followed user, ...)
    #[sea_orm(nullable)]
    pub target_id: Option<String>,

    /// Arbitrary structured context for the activity
    #[sea_orm(column_type = "JsonBinary", nullable)]
    pub metadata: Option<Json>,

    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::UserId",
        to = "super::user::Column::Id",
        on_delete = "Cascade"
    )]
    User,
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::User.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
