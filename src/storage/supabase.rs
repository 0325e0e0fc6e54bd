use async_trait::async_trait;
use tracing::debug;

use crate::errors::{AppError, AppResult};
use crate::storage::MediaStore;

/// Supabase Storage over its REST API.
///
/// Writes use the service-role key so bucket policies do not have to allow
/// anonymous uploads; reads go through the public object URL.
pub struct SupabaseStorage {
    client: reqwest::Client,
    storage_url: String,
    api_key: String,
}

impl SupabaseStorage {
    pub fn new(supabase_url: &str, api_key: &str) -> Self {
        Self {
            client: reqwest::Client::new(),
            storage_url: format!("{}/storage/v1", supabase_url.trim_end_matches('/')),
            api_key: api_key.to_string(),
        }
    }

    async fn check(response: reqwest::Response, action: &str) -> AppResult<()> {
        let status = response.status();
        if status.is_success() {
            return Ok(());
        }

        let body = response.text().await.unwrap_or_default();
        let message = serde_json::from_str::<serde_json::Value>(&body)
            .ok()
            .and_then(|v| {
                v.get("message")
                    .or_else(|| v.get("error"))
                    .and_then(|m| m.as_str())
                    .map(str::to_string)
            })
            .unwrap_or_else(|| format!("HTTP {status}"));

        Err(AppError::Storage(format!("{action} failed: {message}")))
    }
}

#[async_trait]
impl MediaStore for SupabaseStorage {
    async fn upload(
        &self,
        bucket: &str,
        key: &str,
        bytes: Vec<u8>,
        content_type: &str,
    ) -> AppResult<()> {
        let url = format!("{}/object/{bucket}/{key}", self.storage_url);
        debug!("Uploading {} bytes to {url}", bytes.len());

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .header("apikey", &self.api_key)
            .header("Content-Type", content_type)
            .header("Cache-Control", "max-age=3600")
            .header("x-upsert", "false")
            .body(bytes)
            .send()
            .await
            .map_err(|e| AppError::Storage(format!("Upload failed: {e}")))?;

        Self::check(response, "Upload").await
    }

    fn public_url(&self, bucket: &str, key: &str) -> String {
        format!("{}/object/public/{bucket}/{key}", self.storage_url)
    }

    async fn remove(&self, bucket: &str, keys: &[String]) -> AppResult<()> {
        let url = format!("{}/object/{bucket}", self.storage_url);
        debug!("Removing {keys:?} from {url}");

        let response = self
            .client
            .delete(&url)
            .bearer_auth(&self.api_key)
            .header("apikey", &self.api_key)
            .json(&serde_json::json!({ "prefixes": keys }))
            .send()
            .await
            .map_err(|e| AppError::Storage(format!("Remove failed: {e}")))?;

        Self::check(response, "Remove").await
    }
}
