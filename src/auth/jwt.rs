use jsonwebtoken::{Algorithm, DecodingKey, Validation, decode};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::auth::identity::Identity;
use crate::auth::jwks::JwksCache;

/// Supabase JWT claims.
///
/// The `sub` field is the user's UUID in `auth.users`; `user_metadata` holds
/// what was passed as `options.data` at sign-up (full name and role).
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,
    pub exp: usize,
    pub iat: Option<usize>,
    pub iss: Option<String>,
    pub email: Option<String>,
    /// Supabase role (e.g. "authenticated"), not the marketplace role.
    pub role: Option<String>,
    pub user_metadata: Option<UserMetadata>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UserMetadata {
    pub full_name: Option<String>,
    pub name: Option<String>,
    pub avatar_url: Option<String>,
    pub picture: Option<String>,
    pub email: Option<String>,
    pub email_verified: Option<bool>,
    /// `buyer` or `mitra`.
    pub role: Option<String>,
}

impl Claims {
    pub fn user_id(&self) -> Result<Uuid, String> {
        Uuid::parse_str(&self.sub).map_err(|e| format!("Invalid UUID in sub claim: {e}"))
    }

    pub fn identity(&self) -> Result<Identity, String> {
        Ok(Identity::from_parts(
            self.user_id()?,
            self.email.clone(),
            self.user_metadata.as_ref(),
        ))
    }
}

/// How bearer tokens are checked.
///
/// Newer Supabase projects sign with asymmetric keys published as JWKS; older
/// ones use the HS256 project secret.
pub enum TokenVerifier {
    Jwks(JwksCache),
    Secret(String),
}

impl TokenVerifier {
    pub async fn verify(&self, token: &str) -> Result<Claims, String> {
        match self {
            TokenVerifier::Jwks(cache) => cache.validate_token(token).await.map(|td| td.claims),
            TokenVerifier::Secret(secret) => validate_with_secret(token, secret),
        }
    }
}

/// Validate an HS256 token signed with the project's JWT secret.
pub fn validate_with_secret(token: &str, secret: &str) -> Result<Claims, String> {
    let mut validation = Validation::new(Algorithm::HS256);
    validation.validate_aud = false;

    decode::<Claims>(token, &DecodingKey::from_secret(secret.as_bytes()), &validation)
        .map(|td| td.claims)
        .map_err(|e| format!("Token validation failed: {e}"))
}
