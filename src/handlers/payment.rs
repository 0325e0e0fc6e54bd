use actix_web::{HttpResponse, web};

use crate::errors::AppError;
use crate::services::accounts::{self, RegisterRequest};
use crate::state::AppState;

/// POST /api/payment/checkout: register a mitra and open their provider profile.
///
/// There is no payment gateway behind this; reaching it counts as paid.
pub async fn checkout(
    state: web::Data<AppState>,
    body: web::Json<RegisterRequest>,
) -> Result<HttpResponse, AppError> {
    let account = accounts::register_mitra(&state, body.into_inner()).await?;
    Ok(HttpResponse::Created().json(account))
}
