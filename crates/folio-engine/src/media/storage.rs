use std::fs;
use std::path::{Path, PathBuf};

use relative_path::{Component, RelativePath};

#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("File not found: {0}")]
    NotFound(String),
    #[error("Invalid storage path: {0}")]
    InvalidPath(String),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Where uploaded files live. Names are relative paths such as
/// `portfolio/3f2c.png`.
pub trait MediaStorage: Send + Sync {
    fn exists(&self, name: &RelativePath) -> Result<bool, StorageError>;

    fn delete(&self, name: &RelativePath) -> Result<(), StorageError>;

    /// Public URL for a stored file.
    fn url(&self, name: &RelativePath) -> String;

    fn save(&self, name: &RelativePath, bytes: &[u8]) -> Result<(), StorageError>;
}

/// Files on local disk under `root`, served from `base_url`.
#[derive(Debug, Clone)]
pub struct FileSystemStorage {
    root: PathBuf,
    base_url: String,
}

impl FileSystemStorage {
    /// Opens (creating if needed) the storage root.
    pub fn new(root: impl Into<PathBuf>, base_url: impl Into<String>) -> Result<Self, StorageError> {
        let root = root.into();
        fs::create_dir_all(&root)?;
        Ok(Self {
            root,
            base_url: base_url.into(),
        })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn path_for(&self, name: &RelativePath) -> Result<PathBuf, StorageError> {
        let escapes = name
            .components()
            .any(|c| matches!(c, Component::ParentDir));
        if name.as_str().is_empty() || escapes {
            return Err(StorageError::InvalidPath(name.to_string()));
        }
        Ok(name.to_path(&self.root))
    }
}

impl MediaStorage for FileSystemStorage {
    fn exists(&self, name: &RelativePath) -> Result<bool, StorageError> {
        Ok(self.path_for(name)?.is_file())
    }

    fn delete(&self, name: &RelativePath) -> Result<(), StorageError> {
        let path = self.path_for(name)?;
        match fs::remove_file(&path) {
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                Err(StorageError::NotFound(name.to_string()))
            }
            other => Ok(other?),
        }
    }

    fn url(&self, name: &RelativePath) -> String {
        format!("{}/{}", self.base_url.trim_end_matches('/'), name)
    }

    fn save(&self, name: &RelativePath, bytes: &[u8]) -> Result<(), StorageError> {
        let path = self.path_for(name)?;

        // Create parent directories if they don't exist
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        Ok(fs::write(&path, bytes)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tests::create_test_media_dir;

    #[test]
    fn save_and_delete() {
        let dir = create_test_media_dir();
        let storage = FileSystemStorage::new(dir.path(), "/media").unwrap();
        let name = RelativePath::new("portfolio/a.png");

        assert!(!storage.exists(name).unwrap());
        storage.save(name, b"bytes").unwrap();
        assert!(storage.exists(name).unwrap());
        assert_eq!(fs::read(dir.path().join("portfolio/a.png")).unwrap(), b"bytes");
        assert!(dir.path().join("portfolio").is_dir());

        storage.delete(name).unwrap();
        assert!(!storage.exists(name).unwrap());
    }

    #[test]
    fn deleting_missing_file_reports_not_found() {
        let dir = create_test_media_dir();
        let storage = FileSystemStorage::new(dir.path(), "/media").unwrap();
        let result = storage.delete(RelativePath::new("gone.png"));
        assert!(matches!(result, Err(StorageError::NotFound(_))));
    }

    #[test]
    fn parent_components_are_rejected() {
        let dir = create_test_media_dir();
        let storage = FileSystemStorage::new(dir.path(), "/media").unwrap();
        let result = storage.save(RelativePath::new("../secrets.txt"), b"x");
        assert!(matches!(result, Err(StorageError::InvalidPath(_))));
        assert!(storage.exists(RelativePath::new("a/../../b")).is_err());
    }

    #[test]
    fn urls_join_base_and_name() {
        let dir = create_test_media_dir();
        let storage = FileSystemStorage::new(dir.path(), "https://cdn.example.com/media/").unwrap();
        assert_eq!(
            storage.url(RelativePath::new("site/x.jpg")),
            "https://cdn.example.com/media/site/x.jpg"
        );
    }

    #[test]
    fn new_creates_missing_root() {
        let dir = create_test_media_dir();
        let root = dir.path().join("nested").join("media");
        let storage = FileSystemStorage::new(&root, "/media").unwrap();
        assert!(storage.root().is_dir());
    }
}
