use actix_web::{HttpResponse, web};

use crate::auth::middleware::AuthenticatedUser;
use crate::errors::AppError;
use crate::services::accounts::{self, LoginRequest, RegisterRequest};
use crate::state::AppState;

/// POST /api/auth/register: create a buyer account.
pub async fn register(
    state: web::Data<AppState>,
    body: web::Json<RegisterRequest>,
) -> Result<HttpResponse, AppError> {
    let user = accounts::register_buyer(&state, body.into_inner()).await?;
    Ok(HttpResponse::Created().json(user))
}

/// POST /api/auth/login: password sign-in; the response says where to go next.
pub async fn login(
    state: web::Data<AppState>,
    body: web::Json<LoginRequest>,
) -> Result<HttpResponse, AppError> {
    let session = accounts::login(&state, body.into_inner()).await?;
    Ok(HttpResponse::Ok().json(session))
}

/// POST /api/auth/logout
pub async fn logout(
    auth_user: AuthenticatedUser,
    state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    accounts::logout(&state, &auth_user.access_token).await?;
    Ok(HttpResponse::NoContent().finish())
}

/// GET /api/auth/me: the identity carried by the bearer token.
pub async fn me(auth_user: AuthenticatedUser) -> HttpResponse {
    let identity = auth_user.identity;
    HttpResponse::Ok().json(serde_json::json!({
        "user": identity,
        "display_name": identity.display_name(),
        "redirect_to": identity.redirect_path(),
    }))
}
