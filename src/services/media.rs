use serde::Serialize;
use tracing::{info, warn};
use uuid::Uuid;

use crate::errors::{AppError, AppResult};
use crate::models::portfolio;
use crate::state::AppState;
use crate::storage::{
    AVATAR_BUCKET, PORTFOLIO_BUCKET, content_type_for, file_extension, key_from_public_url,
};

/// A file received from the client.
#[derive(Debug, Clone)]
pub struct UploadedFile {
    pub filename: String,
    pub bytes: Vec<u8>,
}

impl UploadedFile {
    pub fn new(filename: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            filename: filename.into(),
            bytes,
        }
    }

    pub fn size(&self) -> usize {
        self.bytes.len()
    }

    fn extension(&self) -> AppResult<String> {
        file_extension(&self.filename).ok_or_else(|| {
            AppError::validation(format!("File name '{}' has no extension", self.filename))
        })
    }
}

/// How a portfolio deletion ended. The record is gone in both cases.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum PortfolioDeletion {
    Complete,
    /// The stored image could not be removed and is now orphaned.
    StorageCleanupFailed { reason: String },
}

fn check_size(state: &AppState, file: &UploadedFile) -> AppResult<()> {
    if file.size() > state.max_portfolio_bytes {
        return Err(AppError::FileTooLarge {
            size: file.size(),
            limit: state.max_portfolio_bytes,
        });
    }
    Ok(())
}

fn check_not_empty(file: &UploadedFile) -> AppResult<()> {
    if file.bytes.is_empty() {
        return Err(AppError::validation("Uploaded file is empty"));
    }
    Ok(())
}

/// Store a portfolio image and record it.
///
/// Order: size check, object upload, public URL, database insert. If the insert
/// fails the uploaded object is left behind.
pub async fn upload_portfolio_image(
    state: &AppState,
    owner_id: Uuid,
    file: UploadedFile,
) -> AppResult<portfolio::Model> {
    check_size(state, &file)?;
    check_not_empty(&file)?;
    let ext = file.extension()?;

    let key = format!("{owner_id}/{}.{ext}", chrono::Utc::now().timestamp_millis());
    state
        .media
        .upload(PORTFOLIO_BUCKET, &key, file.bytes, content_type_for(&ext))
        .await?;

    let public_url = state.media.public_url(PORTFOLIO_BUCKET, &key);

    match state.portfolio.insert(owner_id, public_url).await {
        Ok(item) => {
            info!(item_id = %item.id, %owner_id, %key, "Portfolio image added");
            Ok(item)
        }
        Err(e) => {
            warn!(%owner_id, %key, "Portfolio record insert failed, object left in storage: {e}");
            Err(e.into())
        }
    }
}

/// Store a new avatar and return its public URL. The profile is not changed
/// until the client saves the URL with its next profile edit.
///
/// Avatars share the portfolio image size limit.
pub async fn upload_avatar(state: &AppState, owner_id: Uuid, file: UploadedFile) -> AppResult<String> {
    check_size(state, &file)?;
    check_not_empty(&file)?;
    let ext = file.extension()?;

    let key = format!(
        "avatar-{owner_id}-{}.{ext}",
        chrono::Utc::now().timestamp_millis()
    );
    state
        .media
        .upload(AVATAR_BUCKET, &key, file.bytes, content_type_for(&ext))
        .await?;

    info!(%owner_id, %key, "Avatar uploaded");
    Ok(state.media.public_url(AVATAR_BUCKET, &key))
}

/// Delete a portfolio item owned by `owner_id`, then try to remove its image.
pub async fn delete_portfolio_item(
    state: &AppState,
    owner_id: Uuid,
    item_id: Uuid,
) -> AppResult<PortfolioDeletion> {
    let item = state
        .portfolio
        .find(item_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Portfolio item {item_id} not found")))?;

    if item.user_id != owner_id {
        return Err(AppError::Forbidden(
            "You can only delete your own portfolio items".to_string(),
        ));
    }

    if !state.portfolio.delete(item_id).await? {
        return Err(AppError::NotFound(format!("Portfolio item {item_id} not found")));
    }
    info!(%item_id, %owner_id, "Portfolio item deleted");

    let Some(key) = key_from_public_url(&item.image_url, PORTFOLIO_BUCKET) else {
        warn!(%item_id, url = %item.image_url, "Could not derive storage key for deleted item");
        return Ok(PortfolioDeletion::StorageCleanupFailed {
            reason: "Image location is not recognised".to_string(),
        });
    };

    match state.media.remove(PORTFOLIO_BUCKET, &[key.clone()]).await {
        Ok(()) => Ok(PortfolioDeletion::Complete),
        Err(e) => {
            warn!(%item_id, %key, "Storage cleanup failed: {e}");
            Ok(PortfolioDeletion::StorageCleanupFailed {
                reason: e.to_string(),
            })
        }
    }
}
