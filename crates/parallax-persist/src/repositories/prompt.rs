use chrono::Utc;

use crate::error::{PersistError, Result};
use crate::layout::{JSON_SUFFIX, PROMPTS_DIR};
use crate::models::{NewPrompt, Prompt, PromptUpdate};
use crate::store::{validate_id, FileStore};

/// Lowercase ASCII slug of a label: runs of other characters collapse to `-`
pub fn slugify(label: &str) -> String {
    let mut slug = String::with_capacity(label.len());
    for c in label.chars() {
        if c.is_ascii_alphanumeric() {
            slug.push(c.to_ascii_lowercase());
        } else if !slug.ends_with('-') && !slug.is_empty() {
            slug.push('-');
        }
    }
    while slug.ends_with('-') {
        slug.pop();
    }
    if slug.is_empty() {
        slug.push_str("prompt");
    }
    slug
}

/// Saved prompts, one file per prompt named after its id and label
#[derive(Debug, Clone)]
pub struct PromptRepository {
    store: FileStore,
}

impl PromptRepository {
    pub fn new(store: FileStore) -> Self {
        Self { store }
    }
    
    fn file_name(prompt: &Prompt) -> String {
        format!("{}-{}{}", prompt.id, slugify(&prompt.label), JSON_SUFFIX)
    }
    
    fn key(file_name: &str) -> String {
        format!("{}/{}", PROMPTS_DIR, file_name)
    }
    
    /// File currently holding the prompt `id` and its contents.
    /// Ids contain dashes, so a name match is only a candidate until the
    /// stored id agrees.
    async fn locate(&self, id: &str) -> Result<Option<(String, Prompt)>> {
        validate_id(id)?;
        let exact = format!("{}{}", id, JSON_SUFFIX);
        let prefix = format!("{}-", id);
        for name in self.store.list(PROMPTS_DIR, Some(JSON_SUFFIX)).await? {
            if name != exact && !name.starts_with(&prefix) {
                continue;
            }
            match self.store.read::<Prompt>(&Self::key(&name)).await {
                Ok(prompt) if prompt.id == id => return Ok(Some((name, prompt))),
                Ok(_) => {}
                Err(e) => tracing::warn!(file = %name, error = %e, "Skipping unreadable prompt file"),
            }
        }
        Ok(None)
    }
    
    /// All prompts ordered by `order` (unordered last), then `timestamp`
    pub async fn list(&self) -> Result<Vec<Prompt>> {
        let mut prompts = Vec::new();
        for name in self.store.list(PROMPTS_DIR, Some(JSON_SUFFIX)).await? {
            match self.store.read::<Prompt>(&Self::key(&name)).await {
                Ok(prompt) => prompts.push(prompt),
                Err(e) => tracing::warn!(file = %name, error = %e, "Skipping unreadable prompt file"),
            }
        }
        prompts.sort_by(|a, b| {
            let a_order = a.order.unwrap_or(i64::MAX);
            let b_order = b.order.unwrap_or(i64::MAX);
            a_order.cmp(&b_order).then(a.timestamp.cmp(&b.timestamp))
        });
        Ok(prompts)
    }
    
    pub async fn get(&self, id: &str) -> Result<Prompt> {
        let (_, prompt) = self
            .locate(id)
            .await?
            .ok_or_else(|| PersistError::not_found("prompt", id))?;
        Ok(prompt)
    }
    
    pub async fn create(&self, new: NewPrompt) -> Result<Prompt> {
        if new.label.trim().is_empty() {
            return Err(PersistError::Validation("label is required".to_string()));
        }
        if new.prompt.trim().is_empty() {
            return Err(PersistError::Validation("prompt is required".to_string()));
        }
        
        let prompt = Prompt {
            id: uuid::Uuid::new_v4().to_string(),
            label: new.label,
            prompt: new.prompt,
            description: new.description,
            timestamp: Utc::now(),
            collection_id: new.collection_id,
            order: new.order,
        };
        self.store.write(&Self::key(&Self::file_name(&prompt)), &prompt).await?;
        tracing::info!(prompt_id = %prompt.id, "Created prompt");
        Ok(prompt)
    }
    
    /// Apply a partial update; a label change renames the file
    pub async fn update(&self, id: &str, update: PromptUpdate) -> Result<Prompt> {
        let (old_name, mut prompt) = self
            .locate(id)
            .await?
            .ok_or_else(|| PersistError::not_found("prompt", id))?;
        
        if let Some(label) = update.label {
            if label.trim().is_empty() {
                return Err(PersistError::Validation("label cannot be empty".to_string()));
            }
            prompt.label = label;
        }
        if let Some(text) = update.prompt {
            if text.trim().is_empty() {
                return Err(PersistError::Validation("prompt cannot be empty".to_string()));
            }
            prompt.prompt = text;
        }
        if update.description.is_some() {
            prompt.description = update.description;
        }
        if update.collection_id.is_some() {
            prompt.collection_id = update.collection_id;
        }
        if update.order.is_some() {
            prompt.order = update.order;
        }
        
        let new_name = Self::file_name(&prompt);
        self.store.write(&Self::key(&new_name), &prompt).await?;
        if new_name != old_name {
            self.store.remove(&Self::key(&old_name)).await?;
            tracing::debug!(from = %old_name, to = %new_name, "Renamed prompt file");
        }
        Ok(prompt)
    }
    
    pub async fn delete(&self, id: &str) -> Result<()> {
        let (name, _) = self
            .locate(id)
            .await?
            .ok_or_else(|| PersistError::not_found("prompt", id))?;
        self.store.remove(&Self::key(&name)).await?;
        tracing::info!(prompt_id = %id, "Deleted prompt");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;
    
    fn new_prompt(label: &str, order: Option<i64>) -> NewPrompt {
        NewPrompt {
            label: label.to_string(),
            prompt: format!("Text of {}", label),
            order,
            ..Default::default()
        }
    }
    
    #[test]
    fn test_slugify() {
        assert_eq!(slugify("Hello, World!"), "hello-world");
        assert_eq!(slugify("  Summarize  this "), "summarize-this");
        assert_eq!(slugify("???"), "prompt");
    }
    
    #[tokio::test]
    async fn test_create_names_file_from_label() {
        let dir = TempDir::new().unwrap();
        let prompts = PromptRepository::new(FileStore::new(dir.path()));
        
        let prompt = prompts.create(new_prompt("My Prompt", None)).await.unwrap();
        let expected = dir.path().join(format!("prompts/{}-my-prompt.json", prompt.id));
        assert!(expected.exists());
        assert_eq!(prompts.get(&prompt.id).await.unwrap(), prompt);
    }
    
    #[tokio::test]
    async fn test_create_requires_label_and_prompt() {
        let dir = TempDir::new().unwrap();
        let prompts = PromptRepository::new(FileStore::new(dir.path()));
        
        let err = prompts.create(NewPrompt::default()).await.unwrap_err();
        assert!(matches!(err, PersistError::Validation(_)));
    }
    
    #[tokio::test]
    async fn test_update_label_renames_file() {
        let dir = TempDir::new().unwrap();
        let prompts = PromptRepository::new(FileStore::new(dir.path()));
        let prompt = prompts.create(new_prompt("Before", None)).await.unwrap();
        
        let updated = prompts
            .update(&prompt.id, PromptUpdate {
                label: Some("After".to_string()),
                ..Default::default()
            })
            .await
            .unwrap();
        
        assert_eq!(updated.label, "After");
        assert!(!dir.path().join(format!("prompts/{}-before.json", prompt.id)).exists());
        assert!(dir.path().join(format!("prompts/{}-after.json", prompt.id)).exists());
    }
    
    #[tokio::test]
    async fn test_list_sorted_by_order() {
        let dir = TempDir::new().unwrap();
        let prompts = PromptRepository::new(FileStore::new(dir.path()));
        prompts.create(new_prompt("unordered", None)).await.unwrap();
        prompts.create(new_prompt("second", Some(2))).await.unwrap();
        prompts.create(new_prompt("first", Some(1))).await.unwrap();
        
        let labels: Vec<String> = prompts.list().await.unwrap().into_iter().map(|p| p.label).collect();
        assert_eq!(labels, vec!["first", "second", "unordered"]);
    }
    
    #[tokio::test]
    async fn test_delete_missing_is_not_found() {
        let dir = TempDir::new().unwrap();
        let prompts = PromptRepository::new(FileStore::new(dir.path()));
        assert!(prompts.delete("nope").await.unwrap_err().is_not_found());
    }
    
    #[tokio::test]
    async fn test_partial_id_does_not_match_another_prompt() {
        let dir = TempDir::new().unwrap();
        let prompts = PromptRepository::new(FileStore::new(dir.path()));
        let prompt = prompts.create(new_prompt("Keep me", None)).await.unwrap();
        
        let first_segment = prompt.id.split('-').next().unwrap();
        assert!(prompts.get(first_segment).await.unwrap_err().is_not_found());
        assert!(prompts.delete(first_segment).await.unwrap_err().is_not_found());
        assert_eq!(prompts.list().await.unwrap().len(), 1);
        assert_eq!(prompts.get(&prompt.id).await.unwrap(), prompt);
    }
}
