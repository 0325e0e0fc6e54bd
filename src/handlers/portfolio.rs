use actix_web::{HttpResponse, web};
use uuid::Uuid;

use crate::auth::middleware::AuthenticatedUser;
use crate::errors::AppError;
use crate::models::portfolio::UploadQuery;
use crate::services::media::{self, UploadedFile};
use crate::state::AppState;

/// GET /api/dashboard/portfolio
pub async fn list(
    auth_user: AuthenticatedUser,
    state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let items = state.portfolio.list_by_owner(auth_user.identity.id).await?;
    Ok(HttpResponse::Ok().json(items))
}

/// POST /api/dashboard/portfolio?filename=: raw image body.
pub async fn upload(
    auth_user: AuthenticatedUser,
    state: web::Data<AppState>,
    query: web::Query<UploadQuery>,
    body: web::Bytes,
) -> Result<HttpResponse, AppError> {
    let file = UploadedFile::new(query.into_inner().filename, body.to_vec());
    let item = media::upload_portfolio_image(&state, auth_user.identity.id, file).await?;
    Ok(HttpResponse::Created().json(item))
}

/// DELETE /api/dashboard/portfolio/{id}
///
/// The record is gone even when the stored image could not be removed; the
/// body's `status` says which.
pub async fn delete(
    auth_user: AuthenticatedUser,
    state: web::Data<AppState>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, AppError> {
    let outcome =
        media::delete_portfolio_item(&state, auth_user.identity.id, path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(outcome))
}
