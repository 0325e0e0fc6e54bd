use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::auth::jwt::UserMetadata;

/// Account type chosen at registration.
///
/// Only used to pick where the front end lands after login; it is not an
/// authorization boundary.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    #[default]
    Buyer,
    Mitra,
}

impl Role {
    /// Unknown or missing values are treated as buyers.
    pub fn from_metadata(value: Option<&str>) -> Self {
        match value.map(|v| v.trim().to_ascii_lowercase()) {
            Some(v) if v == "mitra" => Role::Mitra,
            _ => Role::Buyer,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Buyer => "buyer",
            Role::Mitra => "mitra",
        }
    }
}

/// The signed-in user as seen by this service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Identity {
    pub id: Uuid,
    pub email: Option<String>,
    pub full_name: Option<String>,
    pub avatar_url: Option<String>,
    pub role: Role,
}

impl Identity {
    pub fn from_parts(id: Uuid, email: Option<String>, metadata: Option<&UserMetadata>) -> Self {
        let full_name = metadata.and_then(|m| m.full_name.clone().or_else(|| m.name.clone()));
        let avatar_url = metadata.and_then(|m| m.avatar_url.clone().or_else(|| m.picture.clone()));
        let email = email.or_else(|| metadata.and_then(|m| m.email.clone()));
        let role = Role::from_metadata(metadata.and_then(|m| m.role.as_deref()));

        Self {
            id,
            email,
            full_name,
            avatar_url,
            role,
        }
    }

    /// Name shown on reviews: the full name, else the local part of the e-mail.
    pub fn display_name(&self) -> String {
        self.full_name
            .as_deref()
            .map(str::trim)
            .filter(|n| !n.is_empty())
            .map(str::to_string)
            .or_else(|| {
                self.email
                    .as_deref()
                    .and_then(|e| e.split('@').next())
                    .filter(|local| !local.is_empty())
                    .map(str::to_string)
            })
            .unwrap_or_else(|| "Pengguna".to_string())
    }

    /// Front-end route to land on after signing in.
    pub fn redirect_path(&self) -> &'static str {
        match self.role {
            Role::Mitra => "/dashboard",
            Role::Buyer => "/",
        }
    }
}
