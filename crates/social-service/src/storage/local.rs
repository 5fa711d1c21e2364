//! Avatars on the local disk, served back by the HTTP layer.
//!
//! Layout: `{root}/avatars/{user_id}/{uuid}.{ext}`. Each upload gets a fresh
//! file name so browsers never show a cached old avatar. Saving never deletes;
//! callers prune once the new URL is committed.

use async_trait::async_trait;
use social_core::Snowflake;
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::{debug, warn};
use uuid::Uuid;

use super::{stored_file_name, FileStorage, ImageUpload, StorageError};

#[derive(Debug, Clone)]
pub struct LocalFileStorage {
    root: PathBuf,
    public_path: String,
}

impl LocalFileStorage {
    pub fn new(root: impl Into<PathBuf>, public_path: impl Into<String>) -> Self {
        Self {
            root: root.into(),
            public_path: public_path.into().trim_end_matches('/').to_string(),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn avatar_dir(&self, user_id: Snowflake) -> PathBuf {
        self.root.join(format!("avatars/{user_id}"))
    }

    /// Remove every file in `dir` except `keep`
    async fn prune(dir: &Path, keep: &str) -> Result<(), StorageError> {
        let mut entries = match fs::read_dir(dir).await {
            Ok(entries) => entries,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(()),
            Err(e) => return Err(e.into()),
        };
        while let Some(entry) = entries.next_entry().await? {
            if entry.file_name() != keep {
                if let Err(e) = fs::remove_file(entry.path()).await {
                    warn!(path = %entry.path().display(), error = %e, "failed to remove old avatar");
                }
            }
        }
        Ok(())
    }
}

#[async_trait]
impl FileStorage for LocalFileStorage {
    async fn save_avatar(&self, user_id: Snowflake, image: &ImageUpload) -> Result<String, StorageError> {
        let ext = image
            .extension()
            .ok_or_else(|| StorageError::UnsupportedType(image.content_type.clone()))?;

        let relative = format!("avatars/{user_id}");
        let dir = self.root.join(&relative);
        fs::create_dir_all(&dir).await?;

        let file_name = format!("{}.{ext}", Uuid::new_v4().simple());
        fs::write(dir.join(&file_name), &image.bytes).await?;

        debug!(user_id = %user_id, file = %file_name, bytes = image.len(), "avatar stored");
        Ok(format!("{}/{relative}/{file_name}", self.public_path))
    }

    async fn discard_avatar(&self, user_id: Snowflake, url: &str) -> Result<(), StorageError> {
        let Some(file_name) = stored_file_name(url) else {
            return Ok(());
        };
        match fs::remove_file(self.avatar_dir(user_id).join(file_name)).await {
            Ok(()) => {
                debug!(user_id = %user_id, file = %file_name, "avatar discarded");
                Ok(())
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }

    async fn prune_avatars(&self, user_id: Snowflake, keep_url: &str) -> Result<(), StorageError> {
        let keep = stored_file_name(keep_url).unwrap_or_default();
        Self::prune(&self.avatar_dir(user_id), keep).await
    }
}
