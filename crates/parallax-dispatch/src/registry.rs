use parallax_llm::{ChatClient, ClientFactory, ProviderConfig, ProviderType};
use parallax_persist::ApiEntry;
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use crate::router::{route_model, ModelRoute};
use crate::settings::ProviderSettings;

/// OpenAI-compatible endpoint registered in `apis.json`
#[derive(Clone)]
pub struct CustomEndpoint {
    pub id: String,
    pub name: String,
    pub client: Arc<dyn ChatClient>,
}

impl fmt::Debug for CustomEndpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CustomEndpoint")
            .field("id", &self.id)
            .field("name", &self.name)
            .finish_non_exhaustive()
    }
}

/// Client and provider-side model name chosen for a requested model
#[derive(Clone)]
pub struct ResolvedModel {
    pub client: Arc<dyn ChatClient>,
    pub model: String,
    pub provider: ProviderType,
}

/// Provider type → client, plus the custom endpoints in file order
#[derive(Clone, Default)]
pub struct ProviderRegistry {
    clients: HashMap<ProviderType, Arc<dyn ChatClient>>,
    custom: Vec<CustomEndpoint>,
}

impl fmt::Debug for ProviderRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut providers: Vec<&str> = self.clients.keys().map(|p| p.as_str()).collect();
        providers.sort_unstable();
        f.debug_struct("ProviderRegistry")
            .field("providers", &providers)
            .field("custom", &self.custom)
            .finish()
    }
}

impl ProviderRegistry {
    pub fn new() -> Self {
        Self::default()
    }
    
    /// Build clients from environment keys, then let active `apis.json`
    /// entries override them. Entries that fail to build are logged and skipped.
    pub fn from_sources(settings: &ProviderSettings, entries: &[ApiEntry]) -> Self {
        let mut registry = Self::new();
        
        for provider in ProviderType::ALL {
            let Some(key) = settings.key(provider) else {
                continue;
            };
            match ClientFactory::create_client(ProviderConfig::new(provider, key)) {
                Ok(client) => {
                    registry.clients.insert(provider, client);
                }
                Err(e) => tracing::warn!(provider = %provider, error = %e, "Failed to build provider client"),
            }
        }
        
        for entry in entries.iter().filter(|e| e.active) {
            if let Err(e) = registry.register_entry(entry) {
                tracing::warn!(api_id = %entry.id, provider = %entry.provider, error = %e, "Skipping API config");
            }
        }
        
        tracing::debug!(registry = ?registry, "Provider registry built");
        registry
    }
    
    fn register_entry(&mut self, entry: &ApiEntry) -> anyhow::Result<()> {
        let provider = ProviderType::from_str(&entry.provider)?;
        let mut config = ProviderConfig::new(provider, entry.key.as_str());
        if let Some(url) = entry.url.as_deref().filter(|u| !u.is_empty()) {
            config = config.with_base_url(url);
        }
        let client = ClientFactory::create_client(config)?;
        
        if provider == ProviderType::Custom {
            self.custom.push(CustomEndpoint {
                id: entry.id.clone(),
                name: entry.name.clone(),
                client,
            });
        } else {
            self.clients.insert(provider, client);
        }
        Ok(())
    }
    
    /// Register a client directly, replacing any existing one
    pub fn with_client(mut self, provider: ProviderType, client: Arc<dyn ChatClient>) -> Self {
        if provider == ProviderType::Custom {
            let id = format!("custom-{}", self.custom.len());
            return self.with_custom(id.clone(), id, client);
        }
        self.clients.insert(provider, client);
        self
    }
    
    pub fn with_custom(
        mut self,
        id: impl Into<String>,
        name: impl Into<String>,
        client: Arc<dyn ChatClient>,
    ) -> Self {
        self.custom.push(CustomEndpoint {
            id: id.into(),
            name: name.into(),
            client,
        });
        self
    }
    
    pub fn client(&self, provider: ProviderType) -> Option<Arc<dyn ChatClient>> {
        self.clients.get(&provider).cloned()
    }
    
    pub fn custom_endpoints(&self) -> &[CustomEndpoint] {
        &self.custom
    }
    
    pub fn is_empty(&self) -> bool {
        self.clients.is_empty() && self.custom.is_empty()
    }
    
    /// Pick the client for `model`, or `None` when nothing can serve it.
    ///
    /// `<apiId>/<model>` targets the endpoint with that id (or name). If no
    /// endpoint matches, the whole id is sent to the first custom endpoint.
    pub fn resolve(&self, model: &str) -> Option<ResolvedModel> {
        match route_model(model) {
            ModelRoute::Provider(provider) => self.client(provider).map(|client| ResolvedModel {
                client,
                model: model.to_string(),
                provider,
            }),
            ModelRoute::Custom { api_id, model: name } => {
                let named = api_id.as_deref().and_then(|id| {
                    self.custom.iter().find(|e| e.id == id || e.name == id)
                });
                let (endpoint, model) = match named {
                    Some(endpoint) => (endpoint, name),
                    None => (self.custom.first()?, model.to_string()),
                };
                Some(ResolvedModel {
                    client: Arc::clone(&endpoint.client),
                    model,
                    provider: ProviderType::Custom,
                })
            }
        }
    }
}
