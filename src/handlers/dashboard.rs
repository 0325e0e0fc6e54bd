use actix_web::{HttpResponse, web};
use serde::Deserialize;
use uuid::Uuid;

use crate::auth::middleware::AuthenticatedUser;
use crate::errors::AppError;
use crate::models::portfolio::UploadQuery;
use crate::models::providers::UpdateProfile;
use crate::services::media::{self, UploadedFile};
use crate::services::{providers, reviews};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct FeatureBody {
    pub value: String,
}

/// GET /api/dashboard
pub async fn overview(
    auth_user: AuthenticatedUser,
    state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let dashboard = providers::dashboard(&state, &auth_user.identity).await?;
    Ok(HttpResponse::Ok().json(dashboard))
}

/// PUT /api/dashboard/profile: create or replace the caller's profile.
pub async fn update_profile(
    auth_user: AuthenticatedUser,
    state: web::Data<AppState>,
    body: web::Json<UpdateProfile>,
) -> Result<HttpResponse, AppError> {
    let provider = providers::update_profile(&state, &auth_user.identity, body.into_inner()).await?;
    Ok(HttpResponse::Ok().json(provider))
}

/// POST /api/dashboard/profile/features
pub async fn add_feature(
    auth_user: AuthenticatedUser,
    state: web::Data<AppState>,
    body: web::Json<FeatureBody>,
) -> Result<HttpResponse, AppError> {
    let provider =
        providers::add_feature(&state, &auth_user.identity, body.into_inner().value).await?;
    Ok(HttpResponse::Ok().json(provider))
}

/// PUT /api/dashboard/profile/features/{index}
pub async fn update_feature(
    auth_user: AuthenticatedUser,
    state: web::Data<AppState>,
    path: web::Path<usize>,
    body: web::Json<FeatureBody>,
) -> Result<HttpResponse, AppError> {
    let provider = providers::update_feature(
        &state,
        &auth_user.identity,
        path.into_inner(),
        body.into_inner().value,
    )
    .await?;
    Ok(HttpResponse::Ok().json(provider))
}

/// DELETE /api/dashboard/profile/features/{index}
pub async fn remove_feature(
    auth_user: AuthenticatedUser,
    state: web::Data<AppState>,
    path: web::Path<usize>,
) -> Result<HttpResponse, AppError> {
    let provider =
        providers::remove_feature(&state, &auth_user.identity, path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(provider))
}

/// POST /api/dashboard/avatar?filename=: raw image body, returns its public URL.
pub async fn upload_avatar(
    auth_user: AuthenticatedUser,
    state: web::Data<AppState>,
    query: web::Query<UploadQuery>,
    body: web::Bytes,
) -> Result<HttpResponse, AppError> {
    let file = UploadedFile::new(query.into_inner().filename, body.to_vec());
    let url = media::upload_avatar(&state, auth_user.identity.id, file).await?;
    Ok(HttpResponse::Created().json(serde_json::json!({ "avatar_url": url })))
}

/// DELETE /api/dashboard/reviews/{id}
pub async fn delete_review(
    auth_user: AuthenticatedUser,
    state: web::Data<AppState>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, AppError> {
    let list = reviews::delete(&state, &auth_user.identity, path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(list))
}
