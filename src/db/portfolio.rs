use async_trait::async_trait;
use sea_orm::*;
use uuid::Uuid;

use crate::db::{PgStore, PortfolioStore};
use crate::models::portfolio;

/// Insert a new portfolio item pointing at an uploaded image.
pub async fn insert_portfolio(
    db: &DatabaseConnection,
    user_id: Uuid,
    image_url: String,
) -> Result<portfolio::Model, DbErr> {
    let new_item = portfolio::ActiveModel {
        id: Set(Uuid::new_v4()),
        user_id: Set(user_id),
        image_url: Set(image_url),
        created_at: Set(chrono::Utc::now()),
    };

    new_item.insert(db).await
}

/// Fetch all portfolio items of a provider, newest first.
pub async fn get_portfolio_by_owner(
    db: &DatabaseConnection,
    user_id: Uuid,
) -> Result<Vec<portfolio::Model>, DbErr> {
    portfolio::Entity::find()
        .filter(portfolio::Column::UserId.eq(user_id))
        .order_by_desc(portfolio::Column::CreatedAt)
        .all(db)
        .await
}

/// Fetch a single portfolio item by ID.
pub async fn get_portfolio_by_id(
    db: &DatabaseConnection,
    id: Uuid,
) -> Result<Option<portfolio::Model>, DbErr> {
    portfolio::Entity::find_by_id(id).one(db).await
}

/// Delete a portfolio item by ID.
pub async fn delete_portfolio(db: &DatabaseConnection, id: Uuid) -> Result<DeleteResult, DbErr> {
    portfolio::Entity::delete_by_id(id).exec(db).await
}

#[async_trait]
impl PortfolioStore for PgStore {
    async fn insert(&self, owner_id: Uuid, image_url: String) -> Result<portfolio::Model, DbErr> {
        insert_portfolio(self.connection(), owner_id, image_url).await
    }

    async fn list_by_owner(&self, owner_id: Uuid) -> Result<Vec<portfolio::Model>, DbErr> {
        get_portfolio_by_owner(self.connection(), owner_id).await
    }

    async fn find(&self, id: Uuid) -> Result<Option<portfolio::Model>, DbErr> {
        get_portfolio_by_id(self.connection(), id).await
    }

    async fn delete(&self, id: Uuid) -> Result<bool, DbErr> {
        Ok(delete_portfolio(self.connection(), id).await?.rows_affected > 0)
    }
}
