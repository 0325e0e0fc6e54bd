use serde::{Deserialize, Serialize};
use tracing::info;

use crate::auth::gotrue::{AuthSession, SignUpAttributes};
use crate::auth::{Identity, Role};
use crate::errors::{AppError, AppResult};
use crate::models::providers::{self, CreateProvider, DEFAULT_CATEGORY};
use crate::state::AppState;

pub const MIN_PASSWORD_LEN: usize = 6;

/// Body of `POST /api/auth/register` and `POST /api/payment/checkout`.
#[derive(Debug, Clone, Deserialize)]
pub struct RegisterRequest {
    pub email: String,
    pub password: String,
    pub name: String,
}

impl RegisterRequest {
    fn validate(&self) -> AppResult<()> {
        let email = self.email.trim();
        if email.is_empty() || !email.contains('@') {
            return Err(AppError::validation("A valid e-mail address is required"));
        }
        if self.password.chars().count() < MIN_PASSWORD_LEN {
            return Err(AppError::validation(format!(
                "Password must be at least {MIN_PASSWORD_LEN} characters"
            )));
        }
        if self.name.trim().is_empty() {
            return Err(AppError::validation("Name is required"));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct LoginResponse {
    #[serde(flatten)]
    pub session: AuthSession,
    /// Where the front end should land. A hint only; it grants nothing.
    pub redirect_to: &'static str,
}

/// A new mitra account and the provider profile created with it.
#[derive(Debug, Clone, Serialize)]
pub struct MitraAccount {
    pub user: Identity,
    pub provider: providers::Model,
}

async fn sign_up(state: &AppState, input: &RegisterRequest, role: Role) -> AppResult<Identity> {
    input.validate()?;
    state
        .auth
        .sign_up(
            input.email.trim(),
            &input.password,
            SignUpAttributes {
                full_name: input.name.trim().to_string(),
                role,
            },
        )
        .await
}

pub async fn register_buyer(state: &AppState, input: RegisterRequest) -> AppResult<Identity> {
    let user = sign_up(state, &input, Role::Buyer).await?;
    info!(user_id = %user.id, "Buyer registered");
    Ok(user)
}

/// Finish the mitra checkout. No payment is taken or verified.
pub async fn register_mitra(state: &AppState, input: RegisterRequest) -> AppResult<MitraAccount> {
    let user = sign_up(state, &input, Role::Mitra).await?;

    let provider = state
        .providers
        .create(CreateProvider {
            user_id: user.id,
            email: Some(input.email.trim().to_string()),
            name: input.name.trim().to_string(),
            category: DEFAULT_CATEGORY.to_string(),
        })
        .await?;
    info!(user_id = %user.id, provider_id = %provider.id, "Mitra registered");

    Ok(MitraAccount { user, provider })
}

pub async fn login(state: &AppState, input: LoginRequest) -> AppResult<LoginResponse> {
    if input.email.trim().is_empty() || input.password.is_empty() {
        return Err(AppError::validation("E-mail and password are required"));
    }

    let session = state
        .auth
        .sign_in_with_password(input.email.trim(), &input.password)
        .await?;
    let redirect_to = session.user.redirect_path();

    Ok(LoginResponse {
        session,
        redirect_to,
    })
}

pub async fn logout(state: &AppState, access_token: &str) -> AppResult<()> {
    state.auth.sign_out(access_token).await
}
