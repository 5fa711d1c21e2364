//! Uploaded file storage

mod local;

use async_trait::async_trait;
use social_core::Snowflake;

pub use local::LocalFileStorage;

#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("unsupported content type: {0}")]
    UnsupportedType(String),
}

/// An image received from a multipart form
#[derive(Debug, Clone)]
pub struct ImageUpload {
    pub content_type: String,
    pub file_name: Option<String>,
    pub bytes: Vec<u8>,
}

impl ImageUpload {
    pub fn is_image(&self) -> bool {
        self.content_type.starts_with("image/")
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// File extension for raster types browsers render inline.
    /// SVG and unknown subtypes get `None`.
    pub fn extension(&self) -> Option<&'static str> {
        let essence = self.content_type.split(';').next()?.trim();
        match essence.to_ascii_lowercase().as_str() {
            "image/png" => Some("png"),
            "image/jpeg" | "image/jpg" | "image/pjpeg" => Some("jpg"),
            "image/gif" => Some("gif"),
            "image/webp" => Some("webp"),
            "image/avif" => Some("avif"),
            "image/bmp" => Some("bmp"),
            _ => None,
        }
    }
}

#[async_trait]
pub trait FileStorage: Send + Sync {
    /// Store a new avatar for the user and return the public URL it is
    /// served under. Older avatars stay until [`FileStorage::prune_avatars`].
    async fn save_avatar(&self, user_id: Snowflake, image: &ImageUpload) -> Result<String, StorageError>;

    /// Delete one stored avatar, e.g. a new upload whose account update failed
    async fn discard_avatar(&self, user_id: Snowflake, url: &str) -> Result<(), StorageError>;

    /// Delete every avatar of the user except the one at `keep_url`
    async fn prune_avatars(&self, user_id: Snowflake, keep_url: &str) -> Result<(), StorageError>;
}

/// Last path segment of a stored URL, if it can name a file
pub(crate) fn stored_file_name(url: &str) -> Option<&str> {
    let name = url.rsplit('/').next()?;
    if name.is_empty() || name.starts_with('.') || name.contains('\\') {
        return None;
    }
    Some(name)
}
