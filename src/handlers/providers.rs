use actix_web::{HttpResponse, web};
use uuid::Uuid;

use crate::auth::middleware::MaybeUser;
use crate::errors::AppError;
use crate::models::PaginationQuery;
use crate::models::providers::SearchQuery;
use crate::models::reviews::SubmitReview;
use crate::services::{providers, reviews};
use crate::state::AppState;

/// GET /api/providers?q=&category=&page=&limit=
pub async fn search(
    state: web::Data<AppState>,
    query: web::Query<SearchQuery>,
    page: web::Query<PaginationQuery>,
) -> Result<HttpResponse, AppError> {
    let cards = providers::search(&state, &query, &page).await?;
    Ok(HttpResponse::Ok().json(cards))
}

/// GET /api/providers/featured
pub async fn featured(state: web::Data<AppState>) -> Result<HttpResponse, AppError> {
    let cards = providers::featured(&state).await?;
    Ok(HttpResponse::Ok().json(cards))
}

/// GET /api/providers/{owner_id}: public profile. Signing in is optional.
pub async fn get_profile(
    viewer: MaybeUser,
    state: web::Data<AppState>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, AppError> {
    let profile = providers::public_profile(&state, path.into_inner(), viewer.0.as_ref()).await?;
    Ok(HttpResponse::Ok().json(profile))
}

/// GET /api/providers/{owner_id}/reviews
pub async fn get_reviews(
    state: web::Data<AppState>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, AppError> {
    let list = reviews::list(&state, path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(list))
}

/// POST /api/providers/{owner_id}/reviews
///
/// Anonymous viewers get 401 and owners get 403; neither writes anything.
pub async fn submit_review(
    viewer: MaybeUser,
    state: web::Data<AppState>,
    path: web::Path<Uuid>,
    body: web::Json<SubmitReview>,
) -> Result<HttpResponse, AppError> {
    let SubmitReview { rating, comment } = body.into_inner();
    let submitted =
        reviews::submit_for(&state, viewer.0, path.into_inner(), rating, comment).await?;
    Ok(HttpResponse::Created().json(submitted))
}
