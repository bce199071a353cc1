//! Local stand-in for object storage. Uploaded files are copied under the
//! upload directory and published by the share server at `/files`.

use chrono::Utc;
use std::path::{Path, PathBuf};
use thiserror::Error;

pub const PROJECT_FILES: &str = "project-files";
pub const UPLOADS: &str = "uploads";
pub const AVATARS: &str = "avatars";

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("File not found: {0}")]
    NotFound(String),

    #[error("Not a file: {0}")]
    NotAFile(String),

    #[error("Upload failed: {0}")]
    Io(#[from] std::io::Error),
}

#[derive(Debug, Clone)]
pub struct Uploads {
    root: PathBuf,
    public_url: String,
}

impl Uploads {
    pub fn new(root: impl Into<PathBuf>, public_url: &str) -> Self {
        Self {
            root: root.into(),
            public_url: public_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn public_url(&self, bucket: &str, key: &str) -> String {
        format!("{}/files/{}/{}", self.public_url, bucket, key)
    }

    /// Copies `source` to `<root>/<bucket>/<key>` and returns its public URL
    pub async fn store(&self, bucket: &str, key: &str, source: &Path) -> Result<String, StorageError> {
        let metadata = tokio::fs::metadata(source)
            .await
            .map_err(|_| StorageError::NotFound(source.display().to_string()))?;
        if !metadata.is_file() {
            return Err(StorageError::NotAFile(source.display().to_string()));
        }

        let target = self.root.join(bucket).join(key);
        if let Some(parent) = target.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        tokio::fs::copy(source, &target).await?;

        tracing::debug!(bucket, key, bytes = metadata.len(), "stored upload");
        Ok(self.public_url(bucket, key))
    }

    /// Stores a file picked in a form; an empty path means nothing was picked
    pub async fn store_optional(
        &self,
        bucket: &str,
        source: &str,
        key_for: impl FnOnce(&str) -> String,
    ) -> Result<Option<String>, StorageError> {
        let source = source.trim();
        if source.is_empty() {
            return Ok(None);
        }
        let path = Path::new(source);
        let key = key_for(&file_name(path));
        self.store(bucket, &key, path).await.map(Some)
    }
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().replace(' ', "_"))
        .unwrap_or_else(|| "file".to_string())
}

fn timestamp() -> i64 {
    Utc::now().timestamp_millis()
}

pub fn quotation_key(name: &str) -> String {
    format!("quotations/{}-{}", timestamp(), name)
}

pub fn logo_key(name: &str) -> String {
    format!("logos/{}-{}", timestamp(), name)
}

pub fn receipt_key(project_id: i32, name: &str) -> String {
    format!("receipts/{}/{}_{}", project_id, timestamp(), name)
}

pub fn avatar_key(profile_id: i32) -> String {
    format!("public/{}-{}", profile_id, timestamp())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn stores_file_under_bucket_and_returns_url() {
        let dir = tempfile::tempdir().unwrap();
        let source = dir.path().join("receipt scan.pdf");
        std::fs::write(&source, b"%PDF-1.4").unwrap();

        let uploads = Uploads::new(dir.path().join("store"), "http://localhost:8080/");
        let url = uploads
            .store(UPLOADS, "receipts/7/1_receipt.pdf", &source)
            .await
            .unwrap();

        assert_eq!(url, "http://localhost:8080/files/uploads/receipts/7/1_receipt.pdf");
        let copied = std::fs::read(dir.path().join("store/uploads/receipts/7/1_receipt.pdf")).unwrap();
        assert_eq!(copied, b"%PDF-1.4");
    }

    #[tokio::test]
    async fn missing_source_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let uploads = Uploads::new(dir.path(), "http://localhost");
        let err = uploads
            .store(AVATARS, "public/1-1", &dir.path().join("nope.png"))
            .await
            .unwrap_err();
        assert!(matches!(err, StorageError::NotFound(_)));
    }

    #[tokio::test]
    async fn empty_path_skips_upload() {
        let dir = tempfile::tempdir().unwrap();
        let uploads = Uploads::new(dir.path(), "http://localhost");
        let stored = uploads.store_optional(PROJECT_FILES, "  ", logo_key).await.unwrap();
        assert!(stored.is_none());
    }

    #[tokio::test]
    async fn optional_upload_builds_key_from_file_name() {
        let dir = tempfile::tempdir().unwrap();
        let source = dir.path().join("brand logo.png");
        std::fs::write(&source, b"png").unwrap();

        let uploads = Uploads::new(dir.path().join("store"), "http://localhost");
        let url = uploads
            .store_optional(PROJECT_FILES, source.to_str().unwrap(), logo_key)
            .await
            .unwrap()
            .unwrap();
        assert!(url.starts_with("http://localhost/files/project-files/logos/"));
        assert!(url.ends_with("-brand_logo.png"));
    }

    #[test]
    fn keys_follow_bucket_layout() {
        assert!(receipt_key(4, "a.pdf").starts_with("receipts/4/"));
        assert!(quotation_key("q.pdf").starts_with("quotations/"));
        assert!(avatar_key(9).starts_with("public/9-"));
    }
}
