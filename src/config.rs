use std::env;
use thiserror::Error;

/// Default cap on portfolio uploads: 2 MiB.
pub const DEFAULT_MAX_PORTFOLIO_BYTES: usize = 2 * 1024 * 1024;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),

    #[error("Invalid SUPABASE_URL format. Expected: https://PROJECT.supabase.co, got {0}")]
    InvalidSupabaseUrl(String),

    #[error("{name} must be a number, got {value}")]
    InvalidNumber { name: &'static str, value: String },
}

/// Process configuration, read once at startup from the environment (and `.env`).
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub database_url: String,
    pub supabase_url: String,
    pub project_ref: String,
    pub anon_key: String,
    /// Key used for Storage writes; falls back to the anon key.
    pub service_role_key: String,
    /// When set, bearer tokens are verified with HS256 instead of JWKS.
    pub jwt_secret: Option<String>,
    pub port: u16,
    pub run_migrations: bool,
    pub max_portfolio_bytes: usize,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build the config from any key lookup; `from_env` passes `std::env::var`.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let required = |key: &'static str| {
            lookup(key)
                .filter(|v| !v.trim().is_empty())
                .ok_or(ConfigError::Missing(key))
        };

        let database_url = required("DATABASE_URL")?;
        let supabase_url = required("SUPABASE_URL")?.trim_end_matches('/').to_string();
        let project_ref = project_ref_from_url(&supabase_url)?;
        let anon_key = required("SUPABASE_ANON_KEY")?;
        let service_role_key = lookup("SUPABASE_SERVICE_ROLE_KEY")
            .filter(|v| !v.trim().is_empty())
            .unwrap_or_else(|| anon_key.clone());
        let jwt_secret = lookup("SUPABASE_JWT_SECRET").filter(|v| !v.trim().is_empty());

        let port = parse_number(&lookup, "PORT", 8080u16)?;
        let max_portfolio_bytes =
            parse_number(&lookup, "MAX_PORTFOLIO_BYTES", DEFAULT_MAX_PORTFOLIO_BYTES)?;
        let run_migrations = lookup("RUN_MIGRATIONS")
            .map(|v| matches!(v.trim().to_ascii_lowercase().as_str(), "1" | "true" | "yes"))
            .unwrap_or(false);

        Ok(Self {
            database_url,
            supabase_url,
            project_ref,
            anon_key,
            service_role_key,
            jwt_secret,
            port,
            run_migrations,
            max_portfolio_bytes,
        })
    }

    pub fn bind_addr(&self) -> String {
        format!("0.0.0.0:{}", self.port)
    }
}

/// Extract `PROJECT` from `https://PROJECT.supabase.co`.
pub fn project_ref_from_url(url: &str) -> Result<String, ConfigError> {
    url.strip_prefix("https://")
        .and_then(|s| s.strip_suffix(".supabase.co"))
        .filter(|s| !s.is_empty() && !s.contains('/'))
        .map(str::to_string)
        .ok_or_else(|| ConfigError::InvalidSupabaseUrl(url.to_string()))
}

fn parse_number<F, T>(lookup: &F, name: &'static str, default: T) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: std::str::FromStr,
{
    match lookup(name) {
        Some(value) => value
            .trim()
            .parse()
            .map_err(|_| ConfigError::InvalidNumber { name, value }),
        None => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    const BASE: &[(&str, &str)] = &[
        ("DATABASE_URL", "postgres://localhost/pintarlokal"),
        ("SUPABASE_URL", "https://abcd1234.supabase.co/"),
        ("SUPABASE_ANON_KEY", "anon"),
    ];

    #[test]
    fn reads_required_values_and_defaults() {
        let config = AppConfig::from_lookup(lookup(BASE)).unwrap();
        assert_eq!(config.project_ref, "abcd1234");
        assert_eq!(config.supabase_url, "https://abcd1234.supabase.co");
        assert_eq!(config.service_role_key, "anon");
        assert_eq!(config.port, 8080);
        assert_eq!(config.max_portfolio_bytes, 2 * 1024 * 1024);
        assert!(!config.run_migrations);
        assert!(config.jwt_secret.is_none());
    }

    #[test]
    fn missing_database_url_is_reported() {
        let err = AppConfig::from_lookup(lookup(&BASE[1..])).unwrap_err();
        assert_eq!(err, ConfigError::Missing("DATABASE_URL"));
    }

    #[test]
    fn rejects_non_supabase_urls() {
        assert!(project_ref_from_url("http://abcd.supabase.co").is_err());
        assert!(project_ref_from_url("https://example.com").is_err());
        assert_eq!(project_ref_from_url("https://xyz.supabase.co").unwrap(), "xyz");
    }

    #[test]
    fn bad_port_is_an_error() {
        let mut pairs = BASE.to_vec();
        pairs.push(("PORT", "eighty"));
        let err = AppConfig::from_lookup(lookup(&pairs)).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidNumber { name: "PORT", .. }));
    }
}
