use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Category given to providers created through the mitra checkout.
pub const DEFAULT_CATEGORY: &str = "Jasa Umum";

/// SeaORM entity for the `providers` table.
///
/// `user_id` is the Supabase auth UUID of the mitra who owns the profile and is
/// the key every other table refers to.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "providers")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    #[sea_orm(unique)]
    pub user_id: Uuid,
    pub email: Option<String>,
    pub name: String,
    pub category: String,
    pub whatsapp_number: Option<String>,
    #[sea_orm(column_type = "Text", nullable)]
    pub bio: Option<String>,
    #[sea_orm(column_type = "Text", nullable)]
    pub avatar_url: Option<String>,
    pub city: Option<String>,
    pub features: Vec<String>,
    pub is_active: bool,
    pub created_at: DateTimeUtc,
    pub updated_at: Option<DateTimeUtc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

// ── DTOs ──

/// Row created when a mitra finishes checkout.
#[derive(Debug, Clone)]
pub struct CreateProvider {
    pub user_id: Uuid,
    pub email: Option<String>,
    pub name: String,
    pub category: String,
}

/// Body of `PUT /api/dashboard/profile`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateProfile {
    pub name: String,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub whatsapp_number: String,
    #[serde(default)]
    pub bio: String,
    #[serde(default)]
    pub avatar_url: String,
    #[serde(default)]
    pub features: Vec<String>,
}

/// The fields an upsert writes; built from [`UpdateProfile`] after validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProfileFields {
    pub name: String,
    pub category: String,
    pub whatsapp_number: Option<String>,
    pub bio: Option<String>,
    pub avatar_url: Option<String>,
    pub features: Vec<String>,
}

/// Search parameters for `GET /api/providers`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SearchQuery {
    pub q: Option<String>,
    pub category: Option<String>,
}

impl SearchQuery {
    /// The free-text term, if any non-blank one was given.
    pub fn term(&self) -> Option<&str> {
        self.q.as_deref().map(str::trim).filter(|q| !q.is_empty())
    }
}
