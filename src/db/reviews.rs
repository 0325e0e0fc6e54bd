use async_trait::async_trait;
use sea_orm::*;
use uuid::Uuid;

use crate::db::{PgStore, ReviewStore};
use crate::models::reviews::{self, CreateReview};

/// Insert a new review.
pub async fn insert_review(
    db: &DatabaseConnection,
    input: CreateReview,
) -> Result<reviews::Model, DbErr> {
    let new_review = reviews::ActiveModel {
        id: Set(Uuid::new_v4()),
        provider_id: Set(input.provider_id),
        user_id: Set(input.user_id),
        reviewer_name: Set(input.reviewer_name),
        reviewer_avatar: Set(input.reviewer_avatar),
        rating: Set(input.rating),
        comment: Set(input.comment),
        created_at: Set(chrono::Utc::now()),
    };

    new_review.insert(db).await
}

/// Fetch every review of a provider, newest first.
pub async fn get_reviews_by_provider(
    db: &DatabaseConnection,
    provider_id: Uuid,
) -> Result<Vec<reviews::Model>, DbErr> {
    reviews::Entity::find()
        .filter(reviews::Column::ProviderId.eq(provider_id))
        .order_by_desc(reviews::Column::CreatedAt)
        .order_by_desc(reviews::Column::Id)
        .all(db)
        .await
}

/// Fetch a single review by ID.
pub async fn get_review_by_id(
    db: &DatabaseConnection,
    id: Uuid,
) -> Result<Option<reviews::Model>, DbErr> {
    reviews::Entity::find_by_id(id).one(db).await
}

/// Delete a review by ID.
pub async fn delete_review(db: &DatabaseConnection, id: Uuid) -> Result<DeleteResult, DbErr> {
    reviews::Entity::delete_by_id(id).exec(db).await
}

/// Ratings of several providers in one query, for listing pages.
pub async fn get_ratings_for_providers(
    db: &DatabaseConnection,
    provider_ids: &[Uuid],
) -> Result<Vec<(Uuid, i32)>, DbErr> {
    if provider_ids.is_empty() {
        return Ok(Vec::new());
    }

    let rows = reviews::Entity::find()
        .filter(reviews::Column::ProviderId.is_in(provider_ids.to_vec()))
        .all(db)
        .await?;

    Ok(rows.into_iter().map(|r| (r.provider_id, r.rating)).collect())
}

#[async_trait]
impl ReviewStore for PgStore {
    async fn insert(&self, input: CreateReview) -> Result<reviews::Model, DbErr> {
        insert_review(self.connection(), input).await
    }

    async fn list_by_provider(&self, provider_id: Uuid) -> Result<Vec<reviews::Model>, DbErr> {
        get_reviews_by_provider(self.connection(), provider_id).await
    }

    async fn find(&self, id: Uuid) -> Result<Option<reviews::Model>, DbErr> {
        get_review_by_id(self.connection(), id).await
    }

    async fn delete(&self, id: Uuid) -> Result<bool, DbErr> {
        Ok(delete_review(self.connection(), id).await?.rows_affected > 0)
    }

    async fn ratings_for(&self, provider_ids: &[Uuid]) -> Result<Vec<(Uuid, i32)>, DbErr> {
        get_ratings_for_providers(self.connection(), provider_ids).await
    }
}
