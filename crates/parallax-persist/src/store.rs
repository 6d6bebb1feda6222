//! Flat-file JSON document store.
//!
//! Keys are `/`-separated paths relative to the store root. There is no
//! caching and no locking: every read hits the filesystem and concurrent
//! writers to the same key are last-writer-wins.

use serde::de::DeserializeOwned;
use serde::Serialize;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use crate::error::{PersistError, Result};

#[derive(Debug, Clone)]
pub struct FileStore {
    root: PathBuf,
}

impl FileStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
    
    pub fn root(&self) -> &Path {
        &self.root
    }
    
    /// Resolve a key to a path under the root, rejecting traversal
    pub fn path(&self, key: &str) -> Result<PathBuf> {
        if key.is_empty() || key.starts_with('/') {
            return Err(PersistError::InvalidId(format!("invalid key: {key:?}")));
        }
        let mut path = self.root.clone();
        for segment in key.split('/') {
            validate_id(segment)?;
            path.push(segment);
        }
        Ok(path)
    }
    
    /// Serialize `document` as pretty JSON and overwrite the file at `key`
    pub async fn write<T: Serialize + ?Sized>(&self, key: &str, document: &T) -> Result<()> {
        let path = self.path(key)?;
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        let json = serde_json::to_string_pretty(document)?;
        tokio::fs::write(&path, json).await?;
        tracing::debug!(key = %key, "Wrote document");
        Ok(())
    }
    
    /// Read and parse the document at `key`
    pub async fn read<T: DeserializeOwned>(&self, key: &str) -> Result<T> {
        let path = self.path(key)?;
        let content = match tokio::fs::read_to_string(&path).await {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                return Err(PersistError::not_found("document", key));
            }
            Err(e) => return Err(e.into()),
        };
        Ok(serde_json::from_str(&content)?)
    }
    
    pub async fn exists(&self, key: &str) -> Result<bool> {
        let path = self.path(key)?;
        Ok(tokio::fs::try_exists(&path).await?)
    }
    
    /// Delete the file at `key`; `NotFound` if it is absent
    pub async fn remove(&self, key: &str) -> Result<()> {
        let path = self.path(key)?;
        match tokio::fs::remove_file(&path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => {
                Err(PersistError::not_found("document", key))
            }
            Err(e) => Err(e.into()),
        }
    }
    
    /// File names in `dir`, optionally filtered by suffix, sorted by name.
    /// A missing directory lists as empty.
    pub async fn list(&self, dir: &str, suffix: Option<&str>) -> Result<Vec<String>> {
        self.list_entries(dir, false, suffix).await
    }
    
    /// Sub-directory names in `dir`, sorted by name
    pub async fn list_dirs(&self, dir: &str) -> Result<Vec<String>> {
        self.list_entries(dir, true, None).await
    }
    
    pub async fn ensure_dir(&self, dir: &str) -> Result<()> {
        let path = self.path(dir)?;
        tokio::fs::create_dir_all(&path).await?;
        Ok(())
    }
    
    async fn list_entries(&self, dir: &str, dirs: bool, suffix: Option<&str>) -> Result<Vec<String>> {
        let path = self.path(dir)?;
        let mut entries = match tokio::fs::read_dir(&path).await {
            Ok(entries) => entries,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };
        
        let mut names = Vec::new();
        while let Some(entry) = entries.next_entry().await? {
            if entry.file_type().await?.is_dir() != dirs {
                continue;
            }
            let Ok(name) = entry.file_name().into_string() else {
                continue;
            };
            // Skip hidden and temp files
            if name.starts_with('.') {
                continue;
            }
            if suffix.map_or(true, |s| name.ends_with(s)) {
                names.push(name);
            }
        }
        names.sort();
        Ok(names)
    }
}

/// Validate that an id is safe for use as a single path segment.
/// Rejects path separators, `..`, and control characters.
pub fn validate_id(id: &str) -> Result<()> {
    if id.is_empty() {
        return Err(PersistError::InvalidId("id cannot be empty".to_string()));
    }
    if id == "." || id.contains("..") || id.contains('/') || id.contains('\\') {
        return Err(PersistError::InvalidId(format!(
            "id contains invalid characters: {id:?}"
        )));
    }
    if id.chars().any(|c| c.is_control()) {
        return Err(PersistError::InvalidId(format!(
            "id contains control characters: {id:?}"
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{json, Value};
    use tempfile::TempDir;
    
    #[tokio::test]
    async fn test_write_creates_parents_and_pretty_prints() {
        let dir = TempDir::new().unwrap();
        let store = FileStore::new(dir.path());
        
        store.write("a/b/doc.json", &json!({"k": [1, 2]})).await.unwrap();
        
        let raw = std::fs::read_to_string(dir.path().join("a/b/doc.json")).unwrap();
        assert!(raw.contains("\n  \"k\": ["));
        let value: Value = store.read("a/b/doc.json").await.unwrap();
        assert_eq!(value["k"][1], 2);
    }
    
    #[tokio::test]
    async fn test_read_and_remove_missing_are_not_found() {
        let dir = TempDir::new().unwrap();
        let store = FileStore::new(dir.path());
        
        let err = store.read::<Value>("nope.json").await.unwrap_err();
        assert!(err.is_not_found());
        let err = store.remove("nope.json").await.unwrap_err();
        assert!(err.is_not_found());
    }
    
    #[tokio::test]
    async fn test_corrupt_json_is_serialization_error() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("bad.json"), "{not json").unwrap();
        let store = FileStore::new(dir.path());
        
        let err = store.read::<Value>("bad.json").await.unwrap_err();
        assert!(matches!(err, PersistError::Serialization(_)));
    }
    
    #[tokio::test]
    async fn test_list_filters_suffix_and_hidden() {
        let dir = TempDir::new().unwrap();
        let store = FileStore::new(dir.path());
        store.write("d/b.json", &json!(1)).await.unwrap();
        store.write("d/a.json", &json!(1)).await.unwrap();
        store.write("d/notes.txt", &json!(1)).await.unwrap();
        store.write("d/.tmp.json", &json!(1)).await.unwrap();
        store.ensure_dir("d/sub").await.unwrap();
        
        assert_eq!(store.list("d", Some(".json")).await.unwrap(), vec!["a.json", "b.json"]);
        assert_eq!(store.list("d", None).await.unwrap().len(), 3);
        assert_eq!(store.list_dirs("d").await.unwrap(), vec!["sub"]);
        assert!(store.list("missing", None).await.unwrap().is_empty());
    }
    
    #[test]
    fn test_rejects_path_traversal() {
        let store = FileStore::new("/tmp/parallax");
        assert!(store.path("../etc/passwd").is_err());
        assert!(store.path("/abs").is_err());
        assert!(store.path("threads//x.json").is_err());
        assert!(store.path("threads/x.json").is_ok());
        assert!(validate_id("a\\b").is_err());
        assert!(validate_id("a\nb").is_err());
    }
}
