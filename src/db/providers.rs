use async_trait::async_trait;
use sea_orm::prelude::Expr;
use sea_orm::sea_query::OnConflict;
use sea_orm::*;
use uuid::Uuid;

use crate::db::{PgStore, ProviderStore};
use crate::models::providers::{self, CreateProvider, ProfileFields};

/// Insert the provider row created at mitra checkout.
pub async fn insert_provider(
    db: &DatabaseConnection,
    input: CreateProvider,
) -> Result<providers::Model, DbErr> {
    let new_provider = providers::ActiveModel {
        id: Set(Uuid::new_v4()),
        user_id: Set(input.user_id),
        email: Set(input.email),
        name: Set(input.name),
        category: Set(input.category),
        whatsapp_number: Set(None),
        bio: Set(None),
        avatar_url: Set(None),
        city: Set(None),
        features: Set(Vec::new()),
        is_active: Set(true),
        created_at: Set(chrono::Utc::now()),
        updated_at: Set(None),
    };

    new_provider.insert(db).await
}

/// Fetch the provider owned by `user_id`.
pub async fn get_provider_by_owner(
    db: &DatabaseConnection,
    user_id: Uuid,
) -> Result<Option<providers::Model>, DbErr> {
    providers::Entity::find()
        .filter(providers::Column::UserId.eq(user_id))
        .one(db)
        .await
}

/// Upsert the editable profile, using `user_id` as the conflict target.
pub async fn upsert_profile(
    db: &DatabaseConnection,
    user_id: Uuid,
    fields: ProfileFields,
) -> Result<providers::Model, DbErr> {
    let now = chrono::Utc::now();
    let row = providers::ActiveModel {
        id: Set(Uuid::new_v4()),
        user_id: Set(user_id),
        name: Set(fields.name),
        category: Set(fields.category),
        whatsapp_number: Set(fields.whatsapp_number),
        bio: Set(fields.bio),
        avatar_url: Set(fields.avatar_url),
        features: Set(fields.features),
        is_active: Set(true),
        created_at: Set(now),
        updated_at: Set(Some(now)),
        ..Default::default()
    };

    providers::Entity::insert(row)
        .on_conflict(
            OnConflict::column(providers::Column::UserId)
                .update_columns([
                    providers::Column::Name,
                    providers::Column::Category,
                    providers::Column::WhatsappNumber,
                    providers::Column::Bio,
                    providers::Column::AvatarUrl,
                    providers::Column::Features,
                    providers::Column::UpdatedAt,
                ])
                .to_owned(),
        )
        .exec_with_returning(db)
        .await
}

/// Replace the stored feature list of a provider.
pub async fn update_features(
    db: &DatabaseConnection,
    user_id: Uuid,
    features: Vec<String>,
) -> Result<providers::Model, DbErr> {
    let provider = get_provider_by_owner(db, user_id)
        .await?
        .ok_or(DbErr::RecordNotFound("Provider not found".to_string()))?;

    let mut active: providers::ActiveModel = provider.into();
    active.features = Set(features);
    active.updated_at = Set(Some(chrono::Utc::now()));

    active.update(db).await
}

/// Escape character for [`like_pattern`]; see the `ESCAPE` clauses below.
const LIKE_ESCAPE: char = '!';

/// `%term%` for a LIKE match, with the term's own `!`, `%` and `_` escaped.
pub fn like_pattern(term: &str) -> String {
    let mut pattern = String::with_capacity(term.len() + 2);
    pattern.push('%');
    for c in term.to_lowercase().chars() {
        if matches!(c, LIKE_ESCAPE | '%' | '_') {
            pattern.push(LIKE_ESCAPE);
        }
        pattern.push(c);
    }
    pattern.push('%');
    pattern
}

/// Case-insensitive substring search over name, category and bio.
pub async fn search_providers(
    db: &DatabaseConnection,
    term: Option<&str>,
) -> Result<Vec<providers::Model>, DbErr> {
    let mut query = providers::Entity::find();

    if let Some(term) = term {
        let pattern = like_pattern(term);
        query = query.filter(
            Condition::any()
                .add(Expr::cust_with_values(
                    r#"LOWER("providers"."name") LIKE ? ESCAPE '!'"#,
                    [pattern.clone()],
                ))
                .add(Expr::cust_with_values(
                    r#"LOWER("providers"."category") LIKE ? ESCAPE '!'"#,
                    [pattern.clone()],
                ))
                .add(Expr::cust_with_values(
                    r#"LOWER(COALESCE("providers"."bio", '')) LIKE ? ESCAPE '!'"#,
                    [pattern],
                )),
        );
    }

    query
        .order_by_desc(providers::Column::CreatedAt)
        .all(db)
        .await
}

/// The most recently created providers.
pub async fn get_newest_providers(
    db: &DatabaseConnection,
    limit: u64,
) -> Result<Vec<providers::Model>, DbErr> {
    providers::Entity::find()
        .order_by_desc(providers::Column::CreatedAt)
        .limit(limit)
        .all(db)
        .await
}

#[async_trait]
impl ProviderStore for PgStore {
    async fn find_by_owner(&self, owner_id: Uuid) -> Result<Option<providers::Model>, DbErr> {
        get_provider_by_owner(self.connection(), owner_id).await
    }

    async fn create(&self, input: CreateProvider) -> Result<providers::Model, DbErr> {
        insert_provider(self.connection(), input).await
    }

    async fn upsert_profile(
        &self,
        owner_id: Uuid,
        fields: ProfileFields,
    ) -> Result<providers::Model, DbErr> {
        upsert_profile(self.connection(), owner_id, fields).await
    }

    async fn set_features(
        &self,
        owner_id: Uuid,
        features: Vec<String>,
    ) -> Result<providers::Model, DbErr> {
        update_features(self.connection(), owner_id, features).await
    }

    async fn search(&self, term: Option<&str>) -> Result<Vec<providers::Model>, DbErr> {
        search_providers(self.connection(), term).await
    }

    async fn newest(&self, limit: u64) -> Result<Vec<providers::Model>, DbErr> {
        get_newest_providers(self.connection(), limit).await
    }
}
