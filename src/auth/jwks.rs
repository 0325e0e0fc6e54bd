use jsonwebtoken::{Algorithm, DecodingKey, TokenData, Validation, decode, decode_header};
use moka::future::Cache;
use serde::Deserialize;
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

use crate::auth::jwt::Claims;

/// One entry of the project's `/.well-known/jwks.json`.
#[derive(Debug, Clone, Deserialize)]
struct Jwk {
    kid: String,
    kty: String,
    alg: Option<String>,
    // EC keys
    x: Option<String>,
    y: Option<String>,
    // RSA keys
    n: Option<String>,
    e: Option<String>,
}

#[derive(Debug, Deserialize)]
struct JwkSet {
    keys: Vec<Jwk>,
}

#[derive(Clone)]
enum KeyMaterial {
    Ec { x: String, y: String },
    Rsa { n: String, e: String },
}

#[derive(Clone)]
struct SigningKey {
    material: KeyMaterial,
    algorithm: Algorithm,
}

impl SigningKey {
    fn from_jwk(jwk: &Jwk) -> Result<Self, String> {
        match jwk.kty.as_str() {
            "EC" => {
                let algorithm = match jwk.alg.as_deref() {
                    Some("ES384") => Algorithm::ES384,
                    _ => Algorithm::ES256,
                };
                let x = jwk.x.clone().ok_or("Missing 'x' in EC JWK")?;
                let y = jwk.y.clone().ok_or("Missing 'y' in EC JWK")?;
                Ok(Self {
                    material: KeyMaterial::Ec { x, y },
                    algorithm,
                })
            }
            "RSA" => {
                let n = jwk.n.clone().ok_or("Missing 'n' in RSA JWK")?;
                let e = jwk.e.clone().ok_or("Missing 'e' in RSA JWK")?;
                Ok(Self {
                    material: KeyMaterial::Rsa { n, e },
                    algorithm: Algorithm::RS256,
                })
            }
            other => Err(format!("Unsupported JWK key type: {other}")),
        }
    }

    fn decoding_key(&self) -> Result<DecodingKey, String> {
        match &self.material {
            KeyMaterial::Ec { x, y } => DecodingKey::from_ec_components(x, y),
            KeyMaterial::Rsa { n, e } => DecodingKey::from_rsa_components(n, e),
        }
        .map_err(|e| format!("Failed to create decoding key: {e}"))
    }
}

/// Verifies Supabase access tokens against the project's published signing keys.
///
/// Keys are cached per `kid` for an hour; an unknown `kid` triggers a refetch.
#[derive(Clone)]
pub struct JwksCache {
    cache: Arc<Cache<String, SigningKey>>,
    jwks_url: String,
    client: reqwest::Client,
    anon_key: String,
}

impl JwksCache {
    pub fn new(supabase_url: &str, anon_key: &str) -> Self {
        let cache = Arc::new(
            Cache::builder()
                .time_to_live(Duration::from_secs(3600))
                .max_capacity(10)
                .build(),
        );

        Self {
            cache,
            jwks_url: format!(
                "{}/auth/v1/.well-known/jwks.json",
                supabase_url.trim_end_matches('/')
            ),
            client: reqwest::Client::new(),
            anon_key: anon_key.to_string(),
        }
    }

    async fn fetch_keys(&self) -> Result<JwkSet, String> {
        debug!("Fetching JWKS from {}", self.jwks_url);

        let response = self
            .client
            .get(&self.jwks_url)
            .header("apikey", &self.anon_key)
            .send()
            .await
            .map_err(|e| format!("Failed to fetch JWKS: {e}"))?;

        let status = response.status();
        if !status.is_success() {
            return Err(format!("Failed to fetch JWKS: HTTP {status}"));
        }

        response
            .json::<JwkSet>()
            .await
            .map_err(|e| format!("Failed to parse JWKS JSON: {e}"))
    }

    async fn signing_key(&self, kid: &str) -> Result<SigningKey, String> {
        if let Some(cached) = self.cache.get(kid).await {
            return Ok(cached);
        }

        let set = self.fetch_keys().await?;
        let mut found = None;
        for jwk in &set.keys {
            // Cache every usable key from the set, not only the one asked for.
            if let Ok(key) = SigningKey::from_jwk(jwk) {
                if jwk.kid == kid {
                    found = Some(key.clone());
                }
                self.cache.insert(jwk.kid.clone(), key).await;
            }
        }

        found.ok_or(format!("Key with kid={kid} not found in JWKS"))
    }

    pub async fn validate_token(&self, token: &str) -> Result<TokenData<Claims>, String> {
        let header = decode_header(token).map_err(|e| format!("Failed to decode header: {e}"))?;
        let kid = header.kid.ok_or("No 'kid' in token header")?;

        let key = self.signing_key(&kid).await?;
        let decoding_key = key.decoding_key()?;

        let mut validation = Validation::new(key.algorithm);
        validation.validate_aud = false;

        decode::<Claims>(token, &decoding_key, &validation)
            .map_err(|e| format!("Token validation failed: {e}"))
    }
}
