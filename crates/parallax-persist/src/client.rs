use std::path::Path;

use crate::layout;
use crate::repositories::{
    ApiConfigRepository, CollectionRepository, ConversationLogRepository, PromptRepository,
    ThreadRepository,
};
use crate::reconciler::ThreadReconciler;
use crate::store::FileStore;
use crate::error::Result;

/// Entry point to every store under one storage root
#[derive(Debug, Clone)]
pub struct PersistClient {
    store: FileStore,
    legacy_layout: bool,
    threads: ThreadRepository,
    reconciler: ThreadReconciler,
    prompts: PromptRepository,
    collections: CollectionRepository,
    apis: ApiConfigRepository,
    logs: ConversationLogRepository,
}

impl PersistClient {
    pub fn builder() -> crate::builder::PersistClientBuilder {
        crate::builder::PersistClientBuilder::new()
    }
    
    pub(crate) fn new(store: FileStore, legacy_layout: bool) -> Self {
        let threads = ThreadRepository::new(store.clone(), layout::threads_dir(legacy_layout));
        Self {
            reconciler: ThreadReconciler::new(threads.clone()),
            threads,
            prompts: PromptRepository::new(store.clone()),
            collections: CollectionRepository::new(store.clone()),
            apis: ApiConfigRepository::new(store.clone()),
            logs: ConversationLogRepository::new(store.clone()),
            store,
            legacy_layout,
        }
    }
    
    /// Create every top-level directory of the layout
    pub async fn ensure_layout(&self) -> Result<()> {
        for dir in layout::all_dirs(self.legacy_layout) {
            self.store.ensure_dir(dir).await?;
        }
        Ok(())
    }
    
    pub fn root(&self) -> &Path {
        self.store.root()
    }
    
    pub fn threads(&self) -> &ThreadRepository {
        &self.threads
    }
    
    pub fn reconciler(&self) -> &ThreadReconciler {
        &self.reconciler
    }
    
    pub fn prompts(&self) -> &PromptRepository {
        &self.prompts
    }
    
    pub fn collections(&self) -> &CollectionRepository {
        &self.collections
    }
    
    pub fn apis(&self) -> &ApiConfigRepository {
        &self.apis
    }
    
    pub fn logs(&self) -> &ConversationLogRepository {
        &self.logs
    }
}
