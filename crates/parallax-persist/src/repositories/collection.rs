use chrono::Utc;

use crate::error::{PersistError, Result};
use crate::layout::{COLLECTIONS_DIR, JSON_SUFFIX};
use crate::models::Collection;
use crate::store::{validate_id, FileStore};

#[derive(Debug, Clone)]
pub struct CollectionRepository {
    store: FileStore,
}

impl CollectionRepository {
    pub fn new(store: FileStore) -> Self {
        Self { store }
    }
    
    fn key(id: &str) -> Result<String> {
        validate_id(id)?;
        Ok(format!("{}/{}{}", COLLECTIONS_DIR, id, JSON_SUFFIX))
    }
    
    fn validate_name(name: &str) -> Result<()> {
        if name.trim().is_empty() {
            return Err(PersistError::Validation("name is required".to_string()));
        }
        Ok(())
    }
    
    /// All collections, oldest first
    pub async fn list(&self) -> Result<Vec<Collection>> {
        let mut collections = Vec::new();
        for name in self.store.list(COLLECTIONS_DIR, Some(JSON_SUFFIX)).await? {
            let key = format!("{}/{}", COLLECTIONS_DIR, name);
            match self.store.read::<Collection>(&key).await {
                Ok(collection) => collections.push(collection),
                Err(e) => tracing::warn!(file = %name, error = %e, "Skipping unreadable collection file"),
            }
        }
        collections.sort_by(|a, b| a.created_at.cmp(&b.created_at));
        Ok(collections)
    }
    
    pub async fn get(&self, id: &str) -> Result<Collection> {
        self.store.read(&Self::key(id)?).await.map_err(|e| {
            if e.is_not_found() {
                PersistError::not_found("collection", id)
            } else {
                e
            }
        })
    }
    
    pub async fn create(&self, name: &str) -> Result<Collection> {
        Self::validate_name(name)?;
        let collection = Collection {
            id: uuid::Uuid::new_v4().to_string(),
            name: name.trim().to_string(),
            prompts: Vec::new(),
            created_at: Utc::now(),
        };
        self.store.write(&Self::key(&collection.id)?, &collection).await?;
        tracing::info!(collection_id = %collection.id, "Created collection");
        Ok(collection)
    }
    
    pub async fn rename(&self, id: &str, name: &str) -> Result<Collection> {
        Self::validate_name(name)?;
        let mut collection = self.get(id).await?;
        collection.name = name.trim().to_string();
        self.store.write(&Self::key(id)?, &collection).await?;
        Ok(collection)
    }
    
    /// Add a prompt id; adding one already present is a no-op
    pub async fn add_prompt(&self, id: &str, prompt_id: &str) -> Result<Collection> {
        if prompt_id.trim().is_empty() {
            return Err(PersistError::Validation("promptId is required".to_string()));
        }
        let mut collection = self.get(id).await?;
        if !collection.prompts.iter().any(|p| p == prompt_id) {
            collection.prompts.push(prompt_id.to_string());
            self.store.write(&Self::key(id)?, &collection).await?;
        }
        Ok(collection)
    }
    
    pub async fn remove_prompt(&self, id: &str, prompt_id: &str) -> Result<Collection> {
        let mut collection = self.get(id).await?;
        let before = collection.prompts.len();
        collection.prompts.retain(|p| p != prompt_id);
        if collection.prompts.len() != before {
            self.store.write(&Self::key(id)?, &collection).await?;
        }
        Ok(collection)
    }
    
    pub async fn delete(&self, id: &str) -> Result<()> {
        self.store.remove(&Self::key(id)?).await.map_err(|e| {
            if e.is_not_found() {
                PersistError::not_found("collection", id)
            } else {
                e
            }
        })?;
        tracing::info!(collection_id = %id, "Deleted collection");
        Ok(())
    }
}
