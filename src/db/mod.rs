pub mod portfolio;
pub mod providers;
pub mod reviews;

use async_trait::async_trait;
use sea_orm::{Database, DatabaseConnection, DbErr};
use uuid::Uuid;

use crate::models::portfolio as portfolio_model;
use crate::models::providers::{self as provider_model, CreateProvider, ProfileFields};
use crate::models::reviews::{self as review_model, CreateReview};

/// Create a SeaORM database connection pool.
pub async fn create_pool(database_url: &str) -> Result<DatabaseConnection, DbErr> {
    Database::connect(database_url).await
}

/// Persistence for provider profiles, keyed by owner (`user_id`).
#[async_trait]
pub trait ProviderStore: Send + Sync {
    async fn find_by_owner(&self, owner_id: Uuid) -> Result<Option<provider_model::Model>, DbErr>;

    async fn create(&self, input: CreateProvider) -> Result<provider_model::Model, DbErr>;

    /// Insert or overwrite the editable profile fields of `owner_id`. Last write wins.
    async fn upsert_profile(
        &self,
        owner_id: Uuid,
        fields: ProfileFields,
    ) -> Result<provider_model::Model, DbErr>;

    async fn set_features(
        &self,
        owner_id: Uuid,
        features: Vec<String>,
    ) -> Result<provider_model::Model, DbErr>;

    /// Providers whose name, category or bio contains `term` (case-insensitive),
    /// newest first. `None` returns every provider.
    async fn search(&self, term: Option<&str>) -> Result<Vec<provider_model::Model>, DbErr>;

    async fn newest(&self, limit: u64) -> Result<Vec<provider_model::Model>, DbErr>;
}

/// Persistence for reviews. There is no update operation.
#[async_trait]
pub trait ReviewStore: Send + Sync {
    async fn insert(&self, input: CreateReview) -> Result<review_model::Model, DbErr>;

    /// All reviews of a provider, newest first.
    async fn list_by_provider(&self, provider_id: Uuid) -> Result<Vec<review_model::Model>, DbErr>;

    async fn find(&self, id: Uuid) -> Result<Option<review_model::Model>, DbErr>;

    /// Returns whether a row was removed.
    async fn delete(&self, id: Uuid) -> Result<bool, DbErr>;

    /// `(provider_id, rating)` pairs for the given providers.
    async fn ratings_for(&self, provider_ids: &[Uuid]) -> Result<Vec<(Uuid, i32)>, DbErr>;
}

/// Persistence for portfolio records (the images themselves live in object storage).
#[async_trait]
pub trait PortfolioStore: Send + Sync {
    async fn insert(&self, owner_id: Uuid, image_url: String)
    -> Result<portfolio_model::Model, DbErr>;

    /// A provider's items, newest first.
    async fn list_by_owner(&self, owner_id: Uuid) -> Result<Vec<portfolio_model::Model>, DbErr>;

    async fn find(&self, id: Uuid) -> Result<Option<portfolio_model::Model>, DbErr>;

    async fn delete(&self, id: Uuid) -> Result<bool, DbErr>;
}

/// Postgres-backed implementation of every store trait.
#[derive(Clone)]
pub struct PgStore {
    db: DatabaseConnection,
}

impl PgStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    pub fn connection(&self) -> &DatabaseConnection {
        &self.db
    }
}
