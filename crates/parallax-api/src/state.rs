use parallax_dispatch::{ChatDispatcher, ProviderRegistry};
use parallax_persist::{PersistClient, Result as PersistResult};
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::config::Config;

/// Shared application state passed to all handlers
/// 
/// The provider registry is rebuilt whenever `apis.json` changes, so a
/// handler takes a snapshot of it per request.
pub struct AppState {
    pub config: Arc<Config>,
    pub persist: Arc<PersistClient>,
    registry: RwLock<Arc<ProviderRegistry>>,
}

impl AppState {
    /// Build state with providers from the environment and active `apis.json` entries
    pub async fn new(config: Config, persist: PersistClient) -> PersistResult<Self> {
        let state = Self::with_registry(config, persist, ProviderRegistry::new());
        state.reload_providers().await?;
        Ok(state)
    }
    
    /// Build state around a fixed registry
    pub fn with_registry(config: Config, persist: PersistClient, registry: ProviderRegistry) -> Self {
        Self {
            config: Arc::new(config),
            persist: Arc::new(persist),
            registry: RwLock::new(Arc::new(registry)),
        }
    }
    
    pub async fn reload_providers(&self) -> PersistResult<()> {
        let entries = self.persist.apis().active().await?;
        let registry = ProviderRegistry::from_sources(&self.config.providers, &entries);
        *self.registry.write().await = Arc::new(registry);
        tracing::info!(active_apis = entries.len(), "Provider registry loaded");
        Ok(())
    }
    
    /// Dispatcher over the current registry
    pub async fn dispatcher(&self) -> ChatDispatcher {
        let registry = Arc::clone(&*self.registry.read().await);
        let llm = &self.config.llm;
        
        let mut builder = ChatDispatcher::builder()
            .registry(registry)
            .timeout(llm.timeout());
        if let Some(max_tokens) = llm.max_tokens {
            builder = builder.max_tokens(max_tokens);
        }
        if let Some(temperature) = llm.temperature {
            builder = builder.temperature(temperature);
        }
        builder.build()
    }
}
