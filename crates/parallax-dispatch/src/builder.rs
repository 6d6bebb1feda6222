use parallax_llm::ChatOptions;
use std::sync::Arc;
use std::time::Duration;

use crate::dispatcher::ChatDispatcher;
use crate::registry::ProviderRegistry;

/// Builder for a `ChatDispatcher`
pub struct ChatDispatcherBuilder {
    registry: Option<Arc<ProviderRegistry>>,
    options: ChatOptions,
    timeout: Option<Duration>,
}

impl ChatDispatcherBuilder {
    pub fn new() -> Self {
        Self {
            registry: None,
            options: ChatOptions::default(),
            timeout: None,
        }
    }
    
    pub fn registry(mut self, registry: impl Into<Arc<ProviderRegistry>>) -> Self {
        self.registry = Some(registry.into());
        self
    }
    
    pub fn max_tokens(mut self, tokens: u32) -> Self {
        self.options = self.options.max_tokens(tokens);
        self
    }
    
    pub fn temperature(mut self, temperature: f32) -> Self {
        self.options = self.options.temperature(temperature);
        self
    }
    
    /// Per-call limit; zero disables it
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = (!timeout.is_zero()).then_some(timeout);
        self
    }
    
    /// An empty registry is allowed: every model then answers with an error entry
    pub fn build(self) -> ChatDispatcher {
        let registry = self.registry.unwrap_or_default();
        ChatDispatcher::with_config(registry, self.options, self.timeout)
    }
}

impl Default for ChatDispatcherBuilder {
    fn default() -> Self {
        Self::new()
    }
}
