//! Object storage for avatars and portfolio images.

pub mod supabase;

use async_trait::async_trait;

use crate::errors::AppResult;

pub use supabase::SupabaseStorage;

pub const AVATAR_BUCKET: &str = "avatars";
pub const PORTFOLIO_BUCKET: &str = "portfolio-images";

/// A blob store that hands out stable public URLs.
#[async_trait]
pub trait MediaStore: Send + Sync {
    async fn upload(
        &self,
        bucket: &str,
        key: &str,
        bytes: Vec<u8>,
        content_type: &str,
    ) -> AppResult<()>;

    fn public_url(&self, bucket: &str, key: &str) -> String;

    async fn remove(&self, bucket: &str, keys: &[String]) -> AppResult<()>;
}

/// Lower-cased extension of an uploaded file name, without the dot.
pub fn file_extension(filename: &str) -> Option<String> {
    let (stem, ext) = filename.rsplit_once('.')?;
    if stem.is_empty() || ext.is_empty() || ext.contains('/') {
        return None;
    }
    Some(ext.to_ascii_lowercase())
}

/// MIME type for the image extensions the gallery accepts.
pub fn content_type_for(extension: &str) -> &'static str {
    match extension {
        "jpg" | "jpeg" => "image/jpeg",
        "png" => "image/png",
        "gif" => "image/gif",
        "webp" => "image/webp",
        "avif" => "image/avif",
        "svg" => "image/svg+xml",
        _ => "application/octet-stream",
    }
}

/// Recover the object key from a public URL produced by [`MediaStore::public_url`].
///
/// Falls back to the last two path segments (`{owner}/{file}`), which is how
/// portfolio keys are laid out.
pub fn key_from_public_url(url: &str, bucket: &str) -> Option<String> {
    let marker = format!("/object/public/{bucket}/");
    if let Some((_, key)) = url.split_once(&marker) {
        let key = key.split(['?', '#']).next().unwrap_or(key);
        return (!key.is_empty()).then(|| key.to_string());
    }

    let path = url.split(['?', '#']).next().unwrap_or(url);
    let mut segments = path.rsplit('/').filter(|s| !s.is_empty());
    let file = segments.next()?;
    let folder = segments.next()?;
    Some(format!("{folder}/{file}"))
}
