//! Client for the Supabase auth (GoTrue) REST API.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::debug;
use uuid::Uuid;

use crate::auth::identity::{Identity, Role};
use crate::auth::jwt::UserMetadata;
use crate::errors::{AppError, AppResult};

/// Attributes stored in `user_metadata` at sign-up.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SignUpAttributes {
    pub full_name: String,
    pub role: Role,
}

/// A password sign-in result.
#[derive(Debug, Clone, Serialize)]
pub struct AuthSession {
    pub access_token: String,
    pub refresh_token: Option<String>,
    pub expires_in: Option<u64>,
    pub user: Identity,
}

/// The account operations the marketplace needs from the auth provider.
#[async_trait]
pub trait AuthGateway: Send + Sync {
    async fn sign_up(
        &self,
        email: &str,
        password: &str,
        attributes: SignUpAttributes,
    ) -> AppResult<Identity>;

    async fn sign_in_with_password(&self, email: &str, password: &str) -> AppResult<AuthSession>;

    async fn sign_out(&self, access_token: &str) -> AppResult<()>;
}

#[derive(Debug, Deserialize)]
struct GoTrueUser {
    id: Uuid,
    email: Option<String>,
    #[serde(default)]
    user_metadata: Option<UserMetadata>,
}

impl From<GoTrueUser> for Identity {
    fn from(u: GoTrueUser) -> Self {
        Identity::from_parts(u.id, u.email, u.user_metadata.as_ref())
    }
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    refresh_token: Option<String>,
    expires_in: Option<u64>,
    user: GoTrueUser,
}

pub struct SupabaseAuth {
    client: reqwest::Client,
    auth_url: String,
    anon_key: String,
}

impl SupabaseAuth {
    pub fn new(supabase_url: &str, anon_key: &str) -> Self {
        Self {
            client: reqwest::Client::new(),
            auth_url: format!("{}/auth/v1", supabase_url.trim_end_matches('/')),
            anon_key: anon_key.to_string(),
        }
    }

    async fn post_json(
        &self,
        path: &str,
        body: &serde_json::Value,
        bearer: Option<&str>,
    ) -> AppResult<serde_json::Value> {
        let url = format!("{}{path}", self.auth_url);
        debug!("POST {url}");

        let mut request = self
            .client
            .post(&url)
            .header("apikey", &self.anon_key)
            .json(body);
        if let Some(token) = bearer {
            request = request.bearer_auth(token);
        }

        let response = request
            .send()
            .await
            .map_err(|e| AppError::Auth(format!("Auth service unreachable: {e}")))?;

        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| AppError::Auth(format!("Failed to read auth response: {e}")))?;

        if !status.is_success() {
            return Err(AppError::Auth(error_message(&text).unwrap_or_else(|| {
                format!("HTTP {status}")
            })));
        }

        if text.trim().is_empty() {
            return Ok(serde_json::Value::Null);
        }
        serde_json::from_str(&text)
            .map_err(|e| AppError::Auth(format!("Unexpected auth response: {e}")))
    }
}

/// GoTrue reports errors under a few different keys depending on the endpoint.
fn error_message(body: &str) -> Option<String> {
    let value: serde_json::Value = serde_json::from_str(body).ok()?;
    ["msg", "error_description", "message", "error"]
        .iter()
        .find_map(|key| value.get(*key).and_then(|v| v.as_str()))
        .map(str::to_string)
}

#[async_trait]
impl AuthGateway for SupabaseAuth {
    async fn sign_up(
        &self,
        email: &str,
        password: &str,
        attributes: SignUpAttributes,
    ) -> AppResult<Identity> {
        let body = serde_json::json!({
            "email": email,
            "password": password,
            "data": attributes,
        });
        let value = self.post_json("/signup", &body, None).await?;

        // With e-mail confirmation on, the user comes back bare; otherwise inside a session.
        let user = value.get("user").cloned().unwrap_or(value);
        let user: GoTrueUser = serde_json::from_value(user)
            .map_err(|e| AppError::Auth(format!("Unexpected sign-up response: {e}")))?;

        Ok(user.into())
    }

    async fn sign_in_with_password(&self, email: &str, password: &str) -> AppResult<AuthSession> {
        let body = serde_json::json!({ "email": email, "password": password });
        let value = self
            .post_json("/token?grant_type=password", &body, None)
            .await?;

        let token: TokenResponse = serde_json::from_value(value)
            .map_err(|e| AppError::Auth(format!("Unexpected sign-in response: {e}")))?;

        Ok(AuthSession {
            access_token: token.access_token,
            refresh_token: token.refresh_token,
            expires_in: token.expires_in,
            user: token.user.into(),
        })
    }

    async fn sign_out(&self, access_token: &str) -> AppResult<()> {
        self.post_json("/logout", &serde_json::Value::Null, Some(access_token))
            .await
            .map(|_| ())
    }
}
