use actix_web::FromRequest;
use actix_web::{Error, HttpRequest, dev::Payload, web};
use std::future::Future;
use std::pin::Pin;
use tracing::debug;

use crate::auth::identity::Identity;
use crate::auth::jwt::TokenVerifier;

/// A request that carried a valid Supabase bearer token.
pub struct AuthenticatedUser {
    pub identity: Identity,
    pub access_token: String,
}

/// The viewer of a public page: signed in or anonymous.
///
/// A missing or unusable token yields `None` rather than an error so public
/// pages keep working with a stale session.
pub struct MaybeUser(pub Option<Identity>);

fn bearer_token(req: &HttpRequest) -> Result<Option<String>, Error> {
    let Some(header) = req.headers().get("Authorization") else {
        return Ok(None);
    };

    let value = header
        .to_str()
        .map_err(|_| actix_web::error::ErrorUnauthorized("Malformed Authorization header"))?;

    value
        .strip_prefix("Bearer ")
        .map(|t| Some(t.trim().to_string()))
        .ok_or_else(|| {
            actix_web::error::ErrorUnauthorized("Authorization header must be: Bearer <token>")
        })
}

async fn verify(req: &HttpRequest, token: &str) -> Result<Identity, Error> {
    let verifier = req.app_data::<web::Data<TokenVerifier>>().ok_or_else(|| {
        actix_web::error::ErrorInternalServerError("Token verifier not configured")
    })?;

    let claims = verifier
        .verify(token)
        .await
        .map_err(|e| actix_web::error::ErrorUnauthorized(format!("Invalid token: {e}")))?;

    claims.identity().map_err(actix_web::error::ErrorUnauthorized)
}

impl FromRequest for AuthenticatedUser {
    type Error = Error;
    type Future = Pin<Box<dyn Future<Output = Result<Self, Self::Error>>>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let req = req.clone();

        Box::pin(async move {
            let token = bearer_token(&req)?.ok_or_else(|| {
                actix_web::error::ErrorUnauthorized("Missing Authorization header")
            })?;

            let identity = verify(&req, &token).await?;

            Ok(AuthenticatedUser {
                identity,
                access_token: token,
            })
        })
    }
}

impl FromRequest for MaybeUser {
    type Error = Error;
    type Future = Pin<Box<dyn Future<Output = Result<Self, Self::Error>>>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let req = req.clone();

        Box::pin(async move {
            let token = match bearer_token(&req) {
                Ok(Some(token)) => token,
                _ => return Ok(MaybeUser(None)),
            };

            match verify(&req, &token).await {
                Ok(identity) => Ok(MaybeUser(Some(identity))),
                Err(e) => {
                    debug!("Treating viewer as anonymous: {e}");
                    Ok(MaybeUser(None))
                }
            }
        })
    }
}
