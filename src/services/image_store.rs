//! Storage for uploaded identity-card images.
//!
//! Handlers only see the `ImageStore` trait; the bundled implementation writes
//! to a local directory that the router also serves under `/images`.
use std::path::PathBuf;

use async_trait::async_trait;
use axum::body::Bytes;
use thiserror::Error;

use crate::services::new_id;

pub const MIN_IMAGE_BYTES: usize = 10 * 1024;
pub const MAX_IMAGE_BYTES: usize = 2 * 1024 * 1024;

#[derive(Debug, Error)]
pub enum ImageError {
    #[error("file must be a .jpg or .jpeg image")]
    UnsupportedType,
    #[error("file must be between 10KB and 2MB")]
    InvalidSize,
    #[error("image storage failed: {0}")]
    Storage(#[from] std::io::Error),
}

/// Accepted extension (lowercased) of an upload, or why it is rejected.
pub fn validate_upload(file_name: &str, len: usize) -> Result<&'static str, ImageError> {
    let extension = file_name
        .rsplit_once('.')
        .map(|(_, ext)| ext.to_ascii_lowercase())
        .ok_or(ImageError::UnsupportedType)?;

    let extension = match extension.as_str() {
        "jpg" => "jpg",
        "jpeg" => "jpeg",
        _ => return Err(ImageError::UnsupportedType),
    };

    if !(MIN_IMAGE_BYTES..=MAX_IMAGE_BYTES).contains(&len) {
        return Err(ImageError::InvalidSize);
    }

    Ok(extension)
}

#[async_trait]
pub trait ImageStore: Send + Sync + 'static {
    // Returns the storage backend name (for logging).
    fn backend_name(&self) -> &'static str;

    // Store the bytes and return the public URL of the stored image.
    async fn put(&self, extension: &str, bytes: Bytes) -> Result<String, ImageError>;
}

#[derive(Clone, Debug)]
pub struct LocalImageStore {
    root: PathBuf,
    public_base_url: String,
}

impl LocalImageStore {
    pub fn new(root: impl Into<PathBuf>, public_base_url: &str) -> Self {
        Self {
            root: root.into(),
            public_base_url: public_base_url.trim_end_matches('/').to_string(),
        }
    }
}

#[async_trait]
impl ImageStore for LocalImageStore {
    fn backend_name(&self) -> &'static str {
        "local"
    }

    async fn put(&self, extension: &str, bytes: Bytes) -> Result<String, ImageError> {
        tokio::fs::create_dir_all(&self.root).await?;

        let file_name = format!("{}.{extension}", new_id());
        tokio::fs::write(self.root.join(&file_name), &bytes).await?;

        Ok(format!("{}/{file_name}", self.public_base_url))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_jpeg_within_bounds() {
        assert_eq!(validate_upload("card.jpg", MIN_IMAGE_BYTES).unwrap(), "jpg");
        assert_eq!(validate_upload("CARD.JPEG", MAX_IMAGE_BYTES).unwrap(), "jpeg");
    }

    #[test]
    fn rejects_other_types() {
        assert!(matches!(
            validate_upload("card.png", 50 * 1024),
            Err(ImageError::UnsupportedType)
        ));
        assert!(matches!(
            validate_upload("card", 50 * 1024),
            Err(ImageError::UnsupportedType)
        ));
    }

    #[test]
    fn rejects_out_of_bounds_sizes() {
        assert!(matches!(
            validate_upload("card.jpg", MIN_IMAGE_BYTES - 1),
            Err(ImageError::InvalidSize)
        ));
        assert!(matches!(
            validate_upload("card.jpg", MAX_IMAGE_BYTES + 1),
            Err(ImageError::InvalidSize)
        ));
    }

    #[tokio::test]
    async fn local_store_writes_file_and_returns_url() {
        let root = std::env::temp_dir().join(format!("ward-api-images-{}", new_id()));
        let store = LocalImageStore::new(root.clone(), "http://localhost:8080/images/");

        let url = store.put("jpg", Bytes::from_static(b"jpeg-bytes")).await.unwrap();

        let file_name = url
            .strip_prefix("http://localhost:8080/images/")
            .unwrap();
        assert!(file_name.ends_with(".jpg"));
        let stored = tokio::fs::read(root.join(file_name)).await.unwrap();
        assert_eq!(stored, b"jpeg-bytes");

        tokio::fs::remove_dir_all(&root).await.unwrap();
    }
}
