use crate::config::UploadConfig;
use crate::error::{AppError, Result};
use base64::Engine;
use std::collections::BTreeMap;
use std::path::PathBuf;
use uuid::Uuid;

/// Image formats accepted for profile pictures; anything else is rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ImageKind {
    Png,
    Jpeg,
}

impl ImageKind {
    fn sniff(bytes: &[u8]) -> Option<Self> {
        if bytes.starts_with(&[0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A]) {
            Some(Self::Png)
        } else if bytes.starts_with(&[0xFF, 0xD8, 0xFF]) {
            Some(Self::Jpeg)
        } else {
            None
        }
    }

    const fn extension(self) -> &'static str {
        match self {
            Self::Png => "png",
            Self::Jpeg => "jpg",
        }
    }
}

fn image_validation_error(message: &str) -> AppError {
    let mut errors = BTreeMap::new();
    errors.insert("image".to_string(), message.to_string());
    AppError::Validation(errors)
}

#[derive(Clone, Debug)]
pub struct FileService {
    config: UploadConfig,
}

impl FileService {
    #[must_use]
    pub const fn new(config: UploadConfig) -> Self {
        Self { config }
    }

    /// Creates the upload directory tree if it does not exist yet.
    ///
    /// # Errors
    /// Returns `AppError::Internal` if a directory cannot be created.
    pub async fn ensure_upload_folders(&self) -> Result<()> {
        let folders = [
            PathBuf::from(&self.config.upload_path),
            self.config.full_profile_images_path(),
            self.config.full_attachments_path(),
        ];

        for folder in folders {
            tokio::fs::create_dir_all(&folder).await.map_err(|e| {
                tracing::error!(error = %e, path = %folder.display(), "Failed to create upload folder");
                AppError::Internal
            })?;
        }

        Ok(())
    }

    /// Decodes a base64 profile image, checks its magic bytes, and writes it
    /// under the profile folder with a generated name. Returns the file name.
    ///
    /// # Errors
    /// Returns `AppError::Validation` when the payload is not a PNG or JPEG,
    /// `AppError::Internal` when the write fails.
    #[tracing::instrument(err(level = "warn"), skip(self, base64_image))]
    pub async fn save_profile_image(&self, base64_image: &str) -> Result<String> {
        let bytes = base64::engine::general_purpose::STANDARD
            .decode(base64_image)
            .map_err(|_| image_validation_error("Image is not valid base64 data"))?;

        let kind = ImageKind::sniff(&bytes)
            .ok_or_else(|| image_validation_error("Only PNG and JPG files are allowed"))?;

        let name = format!("{}.{}", Uuid::new_v4().simple(), kind.extension());
        let target = self.config.full_profile_images_path().join(&name);

        tokio::fs::write(&target, &bytes).await.map_err(|e| {
            tracing::error!(error = %e, path = %target.display(), "Failed to write profile image");
            AppError::Internal
        })?;

        tracing::debug!(file = %name, size = bytes.len(), "Profile image stored");
        Ok(name)
    }

    /// Best-effort removal of a previously stored profile image.
    pub async fn delete_profile_image(&self, name: &str) {
        let target = self.config.full_profile_images_path().join(name);
        if let Err(e) = tokio::fs::remove_file(&target).await {
            tracing::debug!(error = %e, path = %target.display(), "Could not remove replaced profile image");
        }
    }
}
