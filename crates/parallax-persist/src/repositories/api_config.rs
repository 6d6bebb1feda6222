use parallax_llm::ProviderType;
use std::str::FromStr;

use crate::error::{PersistError, Result};
use crate::layout::APIS_FILE;
use crate::models::{ApiConfigFile, ApiEntry, ApiEntryUpdate, NewApiEntry};

use crate::store::FileStore;

/// Provider credentials in `config/apis.json`
#[derive(Debug, Clone)]
pub struct ApiConfigRepository {
    store: FileStore,
}

impl ApiConfigRepository {
    pub fn new(store: FileStore) -> Self {
        Self { store }
    }
    
    async fn load(&self) -> Result<ApiConfigFile> {
        match self.store.read(APIS_FILE).await {
            Ok(file) => Ok(file),
            Err(e) if e.is_not_found() => Ok(ApiConfigFile::default()),
            Err(e) => Err(e),
        }
    }
    
    async fn save(&self, file: &ApiConfigFile) -> Result<()> {
        self.store.write(APIS_FILE, file).await
    }
    
    fn validate(name: &str, provider: &str, key: &str, url: Option<&str>) -> Result<()> {
        if name.trim().is_empty() {
            return Err(PersistError::Validation("name is required".to_string()));
        }
        if key.trim().is_empty() {
            return Err(PersistError::Validation("key is required".to_string()));
        }
        if provider.trim().is_empty() {
            return Err(PersistError::Validation("provider is required".to_string()));
        }
        let provider = ProviderType::from_str(provider)
            .map_err(|e| PersistError::Validation(e.to_string()))?;
        if provider == ProviderType::Custom && url.map_or(true, |u| u.trim().is_empty()) {
            return Err(PersistError::Validation(
                "url is required for custom providers".to_string(),
            ));
        }
        Ok(())
    }
    
    pub async fn list(&self) -> Result<Vec<ApiEntry>> {
        Ok(self.load().await?.apis)
    }
    
    /// Active entries in file order
    pub async fn active(&self) -> Result<Vec<ApiEntry>> {
        Ok(self.list().await?.into_iter().filter(|e| e.active).collect())
    }
    
    pub async fn get(&self, id: &str) -> Result<ApiEntry> {
        self.list()
            .await?
            .into_iter()
            .find(|e| e.id == id)
            .ok_or_else(|| PersistError::not_found("api", id))
    }
    
    pub async fn add(&self, new: NewApiEntry) -> Result<ApiEntry> {
        Self::validate(&new.name, &new.provider, &new.key, new.url.as_deref())?;
        
        let entry = ApiEntry {
            id: uuid::Uuid::new_v4().to_string(),
            name: new.name.trim().to_string(),
            provider: new.provider.trim().to_ascii_lowercase(),
            key: new.key.trim().to_string(),
            url: new.url.map(|u| u.trim().to_string()).filter(|u| !u.is_empty()),
            active: new.active,
        };
        
        let mut file = self.load().await?;
        file.apis.push(entry.clone());
        self.save(&file).await?;
        tracing::info!(api_id = %entry.id, provider = %entry.provider, "Added API config");
        Ok(entry)
    }
    
    /// Apply a partial update, including toggling `active`
    pub async fn update(&self, id: &str, update: ApiEntryUpdate) -> Result<ApiEntry> {
        let mut file = self.load().await?;
        let entry = file
            .apis
            .iter_mut()
            .find(|e| e.id == id)
            .ok_or_else(|| PersistError::not_found("api", id))?;
        
        let mut next = entry.clone();
        if let Some(name) = update.name {
            next.name = name.trim().to_string();
        }
        if let Some(provider) = update.provider {
            next.provider = provider.trim().to_ascii_lowercase();
        }
        if let Some(key) = update.key {
            next.key = key.trim().to_string();
        }
        if let Some(url) = update.url {
            next.url = Some(url.trim().to_string()).filter(|u| !u.is_empty());
        }
        if let Some(active) = update.active {
            next.active = active;
        }
        Self::validate(&next.name, &next.provider, &next.key, next.url.as_deref())?;
        
        *entry = next.clone();
        self.save(&file).await?;
        Ok(next)
    }
    
    pub async fn delete(&self, id: &str) -> Result<()> {
        let mut file = self.load().await?;
        let before = file.apis.len();
        file.apis.retain(|e| e.id != id);
        if file.apis.len() == before {
            return Err(PersistError::not_found("api", id));
        }
        self.save(&file).await?;
        tracing::info!(api_id = %id, "Deleted API config");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;
    
    fn entry(provider: &str, url: Option<&str>) -> NewApiEntry {
        NewApiEntry {
            name: "main".to_string(),
            provider: provider.to_string(),
            key: "sk-test-1234".to_string(),
            url: url.map(str::to_string),
            active: true,
        }
    }
    
    #[tokio::test]
    async fn test_missing_file_lists_empty() {
        let dir = TempDir::new().unwrap();
        let apis = ApiConfigRepository::new(FileStore::new(dir.path()));
        assert!(apis.list().await.unwrap().is_empty());
    }
    
    #[tokio::test]
    async fn test_add_validates_provider() {
        let dir = TempDir::new().unwrap();
        let apis = ApiConfigRepository::new(FileStore::new(dir.path()));
        
        assert!(matches!(
            apis.add(entry("mistral", None)).await.unwrap_err(),
            PersistError::Validation(_)
        ));
        assert!(matches!(
            apis.add(entry("custom", None)).await.unwrap_err(),
            PersistError::Validation(_)
        ));
        let mut missing_key = entry("openai", None);
        missing_key.key.clear();
        assert!(apis.add(missing_key).await.is_err());
        
        let added = apis.add(entry("Anthropic", None)).await.unwrap();
        assert_eq!(added.provider, "anthropic");
        apis.add(entry("custom", Some("http://localhost:8080/v1"))).await.unwrap();
        assert_eq!(apis.list().await.unwrap().len(), 2);
        assert!(dir.path().join("config/apis.json").exists());
    }
    
    #[tokio::test]
    async fn test_toggle_active_and_delete() {
        let dir = TempDir::new().unwrap();
        let apis = ApiConfigRepository::new(FileStore::new(dir.path()));
        let added = apis.add(entry("openai", None)).await.unwrap();
        
        let toggled = apis
            .update(&added.id, ApiEntryUpdate {
                active: Some(false),
                ..Default::default()
            })
            .await
            .unwrap();
        assert!(!toggled.active);
        assert!(apis.active().await.unwrap().is_empty());
        
        apis.delete(&added.id).await.unwrap();
        assert!(apis.delete(&added.id).await.unwrap_err().is_not_found());
    }
}
