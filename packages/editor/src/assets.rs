//! # Asset Uploads
//!
//! Uploaded images become URL strings. The page only ever stores the URL
//! (in `data.src`, `data.images[i].src`, ...) and never looks inside it.

use crc32fast::Hasher;
use std::path::PathBuf;
use tracing::info;

use crate::EditorError;

/// Stores uploaded bytes and hands back a stable URL for them
pub trait AssetStore {
    fn store(&mut self, file_name: &str, bytes: &[u8]) -> Result<String, EditorError>;
}

/// Writes assets into a directory.
///
/// Files are named `<crc32>-<file name>`, so uploading the same bytes under
/// the same name twice yields the same URL.
#[derive(Debug, Clone)]
pub struct DirAssetStore {
    root: PathBuf,
    url_prefix: String,
}

impl DirAssetStore {
    pub fn new(root: PathBuf, url_prefix: impl Into<String>) -> Self {
        Self {
            root,
            url_prefix: url_prefix.into(),
        }
    }

    pub fn root(&self) -> &PathBuf {
        &self.root
    }
}

impl AssetStore for DirAssetStore {
    fn store(&mut self, file_name: &str, bytes: &[u8]) -> Result<String, EditorError> {
        if bytes.is_empty() {
            return Err(EditorError::EmptyAsset(file_name.to_string()));
        }

        let mut hasher = Hasher::new();
        hasher.update(bytes);
        let stored_name = format!("{:08x}-{}", hasher.finalize(), sanitize_file_name(file_name));

        std::fs::create_dir_all(&self.root)?;
        std::fs::write(self.root.join(&stored_name), bytes)?;

        let url = format!("{}/{}", self.url_prefix.trim_end_matches('/'), stored_name);
        info!(%url, size = bytes.len(), "stored asset");
        Ok(url)
    }
}

/// Keep the name safe for a URL path segment
fn sanitize_file_name(name: &str) -> String {
    let base = name.rsplit(['/', '\\']).next().unwrap_or(name);
    let cleaned: String = base
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_') {
                c
            } else {
                '-'
            }
        })
        .collect();

    if cleaned.trim_matches('.').is_empty() {
        "asset".to_string()
    } else {
        cleaned
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sanitize_file_name() {
        assert_eq!(sanitize_file_name("photo.png"), "photo.png");
        assert_eq!(sanitize_file_name("../../etc/passwd"), "passwd");
        assert_eq!(sanitize_file_name("my photo (1).jpg"), "my-photo--1-.jpg");
        assert_eq!(sanitize_file_name(".."), "asset");
    }

    #[test]
    fn test_store_writes_file_and_returns_url() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = DirAssetStore::new(dir.path().join("uploads"), "/uploads/");

        let url = store.store("logo.png", b"\x89PNG").unwrap();
        assert!(url.starts_with("/uploads/"));
        assert!(url.ends_with("-logo.png"));

        let stored = url.trim_start_matches("/uploads/");
        let bytes = std::fs::read(dir.path().join("uploads").join(stored)).unwrap();
        assert_eq!(bytes, b"\x89PNG");

        // Same content, same URL
        assert_eq!(store.store("logo.png", b"\x89PNG").unwrap(), url);
    }

    #[test]
    fn test_empty_upload_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = DirAssetStore::new(dir.path().to_path_buf(), "/a");
        assert!(matches!(store.store("x.png", b""), Err(EditorError::EmptyAsset(_))));
    }
}
