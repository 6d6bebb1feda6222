use std::path::PathBuf;

use crate::error::{PersistError, Result};
use crate::store::FileStore;
use crate::PersistClient;

pub struct PersistClientBuilder {
    root: Option<PathBuf>,
    legacy_layout: bool,
    create_dirs: bool,
}

impl PersistClientBuilder {
    pub fn new() -> Self {
        Self {
            root: None,
            legacy_layout: false,
            create_dirs: true,
        }
    }
    
    pub fn root(mut self, root: impl Into<PathBuf>) -> Self {
        self.root = Some(root.into());
        self
    }
    
    /// Store threads under `threadLogs/` instead of `threads/`
    pub fn legacy_layout(mut self, legacy: bool) -> Self {
        self.legacy_layout = legacy;
        self
    }
    
    pub fn create_dirs(mut self, create: bool) -> Self {
        self.create_dirs = create;
        self
    }
    
    pub async fn build(self) -> Result<PersistClient> {
        let root = self
            .root
            .ok_or_else(|| PersistError::Validation("storage root is required".to_string()))?;
        
        let client = PersistClient::new(FileStore::new(root), self.legacy_layout);
        if self.create_dirs {
            client.ensure_layout().await?;
        }
        tracing::info!(
            root = %client.root().display(),
            legacy_layout = self.legacy_layout,
            "Storage ready"
        );
        Ok(client)
    }
}

impl Default for PersistClientBuilder {
    fn default() -> Self {
        Self::new()
    }
}
