use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// SeaORM entity for the `reviews` table.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "reviews")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    /// Owner id of the reviewed provider (`providers.user_id`).
    pub provider_id: Uuid,
    /// Auth id of the reviewer.
    pub user_id: Uuid,
    pub reviewer_name: String,
    #[sea_orm(column_type = "Text", nullable)]
    pub reviewer_avatar: Option<String>,
    pub rating: i32,
    #[sea_orm(column_type = "Text")]
    pub comment: String,
    pub created_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

// ── DTOs ──

/// A validated review ready to be inserted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateReview {
    pub provider_id: Uuid,
    pub user_id: Uuid,
    pub reviewer_name: String,
    pub reviewer_avatar: Option<String>,
    pub rating: i32,
    pub comment: String,
}

/// Body of `POST /api/providers/{owner_id}/reviews`.
#[derive(Debug, Clone, Deserialize)]
pub struct SubmitReview {
    pub rating: i32,
    #[serde(default)]
    pub comment: String,
}
