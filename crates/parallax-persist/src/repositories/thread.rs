use parallax_types::{Thread, ThreadMessage};

use crate::error::{PersistError, Result};
use crate::layout::JSON_SUFFIX;
use crate::models::ThreadDocument;
use crate::store::{validate_id, FileStore};

/// Thread id → ordered message history, one JSON file per thread
#[derive(Debug, Clone)]
pub struct ThreadRepository {
    store: FileStore,
    dir: String,
}

impl ThreadRepository {
    pub fn new(store: FileStore, dir: impl Into<String>) -> Self {
        Self {
            store,
            dir: dir.into(),
        }
    }
    
    fn key(&self, thread_id: &str) -> Result<String> {
        validate_id(thread_id)?;
        Ok(format!("{}/{}{}", self.dir, thread_id, JSON_SUFFIX))
    }
    
    pub async fn exists(&self, thread_id: &str) -> Result<bool> {
        self.store.exists(&self.key(thread_id)?).await
    }
    
    /// Load a thread, accepting both the enveloped and the legacy array shape
    pub async fn get(&self, thread_id: &str) -> Result<Thread> {
        let key = self.key(thread_id)?;
        let document: ThreadDocument = self.store.read(&key).await.map_err(|e| {
            if e.is_not_found() {
                PersistError::not_found("thread", thread_id)
            } else {
                e
            }
        })?;
        
        if document.is_legacy() {
            tracing::debug!(thread_id = %thread_id, "Loaded legacy thread format");
        }
        Ok(document.into_thread(thread_id))
    }
    
    /// Like `get`, but `None` for an unknown id
    pub async fn find(&self, thread_id: &str) -> Result<Option<Thread>> {
        match self.get(thread_id).await {
            Ok(thread) => Ok(Some(thread)),
            Err(e) if e.is_not_found() => Ok(None),
            Err(e) => Err(e),
        }
    }
    
    /// Load the thread, or persist and return a fresh empty one
    pub async fn get_or_create(&self, thread_id: &str) -> Result<Thread> {
        if let Some(thread) = self.find(thread_id).await? {
            return Ok(thread);
        }
        
        let thread = Thread::new(thread_id);
        self.save(&thread).await?;
        tracing::info!(thread_id = %thread_id, "Created thread");
        Ok(thread)
    }
    
    /// Overwrite the thread file (always in the enveloped format)
    pub async fn save(&self, thread: &Thread) -> Result<()> {
        let key = self.key(&thread.id)?;
        self.store.write(&key, thread).await
    }
    
    /// Push one message and bump `updatedAt`. No deduplication here.
    pub async fn append(&self, thread_id: &str, message: ThreadMessage) -> Result<Thread> {
        self.append_all(thread_id, vec![message]).await
    }
    
    pub async fn append_all(&self, thread_id: &str, messages: Vec<ThreadMessage>) -> Result<Thread> {
        let mut thread = self
            .find(thread_id)
            .await?
            .unwrap_or_else(|| Thread::new(thread_id));
        thread.messages.extend(messages);
        thread.touch();
        self.save(&thread).await?;
        Ok(thread)
    }
    
    /// Ids of every stored thread, sorted by name
    pub async fn list_ids(&self) -> Result<Vec<String>> {
        let names = self.store.list(&self.dir, Some(JSON_SUFFIX)).await?;
        Ok(names
            .into_iter()
            .filter_map(|name| name.strip_suffix(JSON_SUFFIX).map(str::to_string))
            .collect())
    }
    
    /// Every readable thread, most recently updated first.
    /// Unreadable files are logged and skipped.
    pub async fn list_all(&self) -> Result<Vec<Thread>> {
        let mut threads = Vec::new();
        for id in self.list_ids().await? {
            match self.get(&id).await {
                Ok(thread) => threads.push(thread),
                Err(e) => {
                    tracing::warn!(thread_id = %id, error = %e, "Skipping unreadable thread file");
                }
            }
        }
        threads.sort_by(|a, b| b.updated_at.cmp(&a.updated_at));
        Ok(threads)
    }
    
    pub async fn delete(&self, thread_id: &str) -> Result<()> {
        let key = self.key(thread_id)?;
        self.store.remove(&key).await.map_err(|e| {
            if e.is_not_found() {
                PersistError::not_found("thread", thread_id)
            } else {
                e
            }
        })?;
        tracing::info!(thread_id = %thread_id, "Deleted thread");
        Ok(())
    }
    
    /// Remove every thread file, continuing past per-file failures.
    /// Returns the number of files removed.
    pub async fn delete_all(&self) -> Result<usize> {
        let mut removed = 0;
        for id in self.list_ids().await? {
            match self.delete(&id).await {
                Ok(()) => removed += 1,
                Err(e) => tracing::warn!(thread_id = %id, error = %e, "Failed to delete thread"),
            }
        }
        Ok(removed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;
    
    fn repo(dir: &TempDir) -> ThreadRepository {
        ThreadRepository::new(FileStore::new(dir.path()), "threads")
    }
    
    #[tokio::test]
    async fn test_get_or_create_is_idempotent() {
        let dir = TempDir::new().unwrap();
        let threads = repo(&dir);
        
        let first = threads.get_or_create("t1").await.unwrap();
        assert!(first.messages.is_empty());
        assert!(dir.path().join("threads/t1.json").exists());
        
        let second = threads.get_or_create("t1").await.unwrap();
        assert_eq!(first, second);
    }
    
    #[tokio::test]
    async fn test_sequential_append_matches_batch() {
        let dir = TempDir::new().unwrap();
        let threads = repo(&dir);
        let m1 = ThreadMessage::user("one");
        let m2 = ThreadMessage::assistant("two", "a");
        
        threads.append("seq", m1.clone()).await.unwrap();
        let sequential = threads.append("seq", m2.clone()).await.unwrap();
        let batch = threads.append_all("batch", vec![m1, m2]).await.unwrap();
        
        assert_eq!(sequential.messages, batch.messages);
    }
    
    #[tokio::test]
    async fn test_append_does_not_deduplicate() {
        let dir = TempDir::new().unwrap();
        let threads = repo(&dir);
        
        threads.append("t", ThreadMessage::user("same")).await.unwrap();
        let thread = threads.append("t", ThreadMessage::user("same")).await.unwrap();
        assert_eq!(thread.messages.len(), 2);
    }
    
    #[tokio::test]
    async fn test_list_all_skips_corrupt_and_sorts_by_update() {
        let dir = TempDir::new().unwrap();
        let threads = repo(&dir);
        
        threads.get_or_create("older").await.unwrap();
        tokio::time::sleep(std::time::Duration::from_millis(5)).await;
        threads.append("newer", ThreadMessage::user("hi")).await.unwrap();
        std::fs::write(dir.path().join("threads/broken.json"), "{{{").unwrap();
        
        let listed = threads.list_all().await.unwrap();
        let ids: Vec<&str> = listed.iter().map(|t| t.id.as_str()).collect();
        assert_eq!(ids, vec!["newer", "older"]);
    }
    
    #[tokio::test]
    async fn test_legacy_array_is_read_and_rewritten_enveloped() {
        let dir = TempDir::new().unwrap();
        let threads = repo(&dir);
        std::fs::create_dir_all(dir.path().join("threads")).unwrap();
        std::fs::write(
            dir.path().join("threads/old.json"),
            r#"[{"role":"user","content":"Hello"},{"role":"assistant","content":"Hi","model":"a"}]"#,
        )
        .unwrap();
        
        let thread = threads.append("old", ThreadMessage::user("again")).await.unwrap();
        assert_eq!(thread.messages.len(), 3);
        
        let raw: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(dir.path().join("threads/old.json")).unwrap()).unwrap();
        assert!(raw.is_object());
        assert_eq!(raw["id"], "old");
    }
    
    #[tokio::test]
    async fn test_delete_unknown_is_not_found() {
        let dir = TempDir::new().unwrap();
        let threads = repo(&dir);
        
        let err = threads.delete("ghost").await.unwrap_err();
        assert!(err.is_not_found());
        assert_eq!(err.to_string(), "thread not found: ghost");
    }
    
    #[tokio::test]
    async fn test_delete_all_then_list_is_empty() {
        let dir = TempDir::new().unwrap();
        let threads = repo(&dir);
        for id in ["a", "b", "c"] {
            threads.get_or_create(id).await.unwrap();
        }
        
        assert_eq!(threads.delete_all().await.unwrap(), 3);
        assert!(threads.list_all().await.unwrap().is_empty());
    }
    
    #[tokio::test]
    async fn test_invalid_ids_rejected() {
        let dir = TempDir::new().unwrap();
        let threads = repo(&dir);
        assert!(matches!(
            threads.get_or_create("../escape").await.unwrap_err(),
            PersistError::InvalidId(_)
        ));
    }
}
