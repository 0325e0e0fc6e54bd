use std::collections::HashMap;

use serde::Serialize;
use tracing::info;
use uuid::Uuid;

use crate::auth::Identity;
use crate::errors::{AppError, AppResult};
use crate::features::FeatureList;
use crate::models::providers::{self, DEFAULT_CATEGORY, ProfileFields, SearchQuery, UpdateProfile};
use crate::models::{PaginationQuery, portfolio, reviews};
use crate::rating::{RatingSummary, RatingView};
use crate::services::contact;
use crate::state::AppState;

/// Category tabs on the search page. The first one shows everything.
pub const CATEGORY_TABS: [&str; 6] = ["Semua", "AC", "Listrik", "Bangunan", "Kebersihan", "Elektronik"];

/// Number of providers on the home page.
pub const FEATURED_LIMIT: u64 = 6;

/// A provider in a listing, with its rating.
#[derive(Debug, Clone, Serialize)]
pub struct ProviderCard {
    #[serde(flatten)]
    pub provider: providers::Model,
    pub rating: RatingView,
}

#[derive(Debug, Clone, Serialize)]
pub struct PublicProfile {
    pub provider: providers::Model,
    pub portfolio: Vec<portfolio::Model>,
    pub reviews: Vec<reviews::Model>,
    pub rating: RatingView,
    pub whatsapp_url: Option<String>,
    pub is_own_profile: bool,
    /// Whether the review form should be enabled for this viewer.
    pub can_review: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct Dashboard {
    pub provider: providers::Model,
    pub reviews: Vec<reviews::Model>,
    pub rating: RatingView,
    pub portfolio_count: usize,
    pub public_profile_path: String,
}

async fn require_provider(state: &AppState, owner_id: Uuid) -> AppResult<providers::Model> {
    state
        .providers
        .find_by_owner(owner_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Provider {owner_id} not found")))
}

pub async fn public_profile(
    state: &AppState,
    owner_id: Uuid,
    viewer: Option<&Identity>,
) -> AppResult<PublicProfile> {
    let provider = require_provider(state, owner_id).await?;
    let portfolio = state.portfolio.list_by_owner(owner_id).await?;
    let reviews = state.reviews.list_by_provider(owner_id).await?;
    let rating = RatingSummary::from_reviews(&reviews).into();
    let is_own_profile = viewer.is_some_and(|v| v.id == owner_id);

    Ok(PublicProfile {
        whatsapp_url: contact::whatsapp_link(&provider),
        is_own_profile,
        can_review: viewer.is_some() && !is_own_profile,
        provider,
        portfolio,
        reviews,
        rating,
    })
}

pub async fn dashboard(state: &AppState, identity: &Identity) -> AppResult<Dashboard> {
    let provider = state
        .providers
        .find_by_owner(identity.id)
        .await?
        .ok_or_else(|| AppError::NotFound("You do not have a provider profile yet".to_string()))?;
    let reviews = state.reviews.list_by_provider(identity.id).await?;
    let portfolio_count = state.portfolio.list_by_owner(identity.id).await?.len();

    Ok(Dashboard {
        public_profile_path: format!("/profile/{}", provider.user_id),
        rating: RatingSummary::from_reviews(&reviews).into(),
        provider,
        reviews,
        portfolio_count,
    })
}

fn non_blank(value: String) -> Option<String> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

/// Validate a profile edit and turn it into the fields an upsert writes.
pub fn profile_fields(input: UpdateProfile) -> AppResult<ProfileFields> {
    let name = non_blank(input.name).ok_or_else(|| AppError::validation("Name is required"))?;
    let features = FeatureList::from_submitted(input.features)?.sanitize_for_persist();

    Ok(ProfileFields {
        name,
        category: non_blank(input.category).unwrap_or_else(|| DEFAULT_CATEGORY.to_string()),
        whatsapp_number: non_blank(input.whatsapp_number),
        bio: non_blank(input.bio),
        avatar_url: non_blank(input.avatar_url),
        features,
    })
}

/// Save the caller's profile. Repeating the same edit gives the same row.
pub async fn update_profile(
    state: &AppState,
    identity: &Identity,
    input: UpdateProfile,
) -> AppResult<providers::Model> {
    let fields = profile_fields(input)?;
    let provider = state.providers.upsert_profile(identity.id, fields).await?;
    info!(owner_id = %identity.id, "Provider profile saved");
    Ok(provider)
}

async fn save_features(
    state: &AppState,
    owner_id: Uuid,
    list: &FeatureList,
) -> AppResult<providers::Model> {
    Ok(state
        .providers
        .set_features(owner_id, list.sanitize_for_persist())
        .await?)
}

pub async fn add_feature(
    state: &AppState,
    identity: &Identity,
    value: String,
) -> AppResult<providers::Model> {
    if value.trim().is_empty() {
        return Err(AppError::validation("Feature text is required"));
    }

    let provider = require_provider(state, identity.id).await?;
    let mut list = FeatureList::from_stored(provider.features);
    if !list.add() {
        return Err(AppError::validation(format!(
            "A profile can list at most {} features",
            crate::features::MAX_FEATURES
        )));
    }
    list.update(list.len() - 1, value)?;

    save_features(state, identity.id, &list).await
}

pub async fn update_feature(
    state: &AppState,
    identity: &Identity,
    index: usize,
    value: String,
) -> AppResult<providers::Model> {
    let provider = require_provider(state, identity.id).await?;
    let mut list = FeatureList::from_stored(provider.features);
    list.update(index, value)?;

    save_features(state, identity.id, &list).await
}

pub async fn remove_feature(
    state: &AppState,
    identity: &Identity,
    index: usize,
) -> AppResult<providers::Model> {
    let provider = require_provider(state, identity.id).await?;
    let mut list = FeatureList::from_stored(provider.features);
    list.remove(index)?;

    save_features(state, identity.id, &list).await
}

/// Keep providers in the given tab. `"Semua"` or a blank tab keeps everything.
pub fn filter_by_category(providers: Vec<providers::Model>, tab: Option<&str>) -> Vec<providers::Model> {
    let tab = match tab.map(str::trim) {
        Some(t) if !t.is_empty() && !t.eq_ignore_ascii_case(CATEGORY_TABS[0]) => t.to_lowercase(),
        _ => return providers,
    };

    providers
        .into_iter()
        .filter(|p| p.category.to_lowercase().contains(&tab))
        .collect()
}

async fn with_ratings(
    state: &AppState,
    providers: Vec<providers::Model>,
) -> AppResult<Vec<ProviderCard>> {
    let ids: Vec<Uuid> = providers.iter().map(|p| p.user_id).collect();

    let mut by_provider: HashMap<Uuid, Vec<i32>> = HashMap::new();
    for (provider_id, rating) in state.reviews.ratings_for(&ids).await? {
        by_provider.entry(provider_id).or_default().push(rating);
    }

    Ok(providers
        .into_iter()
        .map(|provider| {
            let ratings = by_provider.remove(&provider.user_id).unwrap_or_default();
            ProviderCard {
                rating: RatingSummary::from_ratings(ratings).into(),
                provider,
            }
        })
        .collect())
}

pub async fn search(
    state: &AppState,
    query: &SearchQuery,
    page: &PaginationQuery,
) -> AppResult<Vec<ProviderCard>> {
    let found = state.providers.search(query.term()).await?;
    let filtered = filter_by_category(found, query.category.as_deref());
    with_ratings(state, page.apply(filtered)).await
}

pub async fn featured(state: &AppState) -> AppResult<Vec<ProviderCard>> {
    let newest = state.providers.newest(FEATURED_LIMIT).await?;
    with_ratings(state, newest).await
}
