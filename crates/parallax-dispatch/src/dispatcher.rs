use futures::future::join_all;
use parallax_llm::{ChatOptions, ChatRequest, Message};
use parallax_persist::filter_for_model;
use parallax_types::{ModelResponse, ThreadMessage};
use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::registry::ProviderRegistry;

/// Sends one prompt to many models at once.
///
/// Each model sees only its own slice of the history. A failing model
/// yields an `"Error: ..."` entry and never affects the others.
#[derive(Debug, Clone)]
pub struct ChatDispatcher {
    registry: Arc<ProviderRegistry>,
    options: ChatOptions,
    timeout: Option<Duration>,
}

impl ChatDispatcher {
    pub fn new(registry: Arc<ProviderRegistry>) -> Self {
        Self {
            registry,
            options: ChatOptions::default(),
            timeout: None,
        }
    }
    
    pub fn builder() -> crate::builder::ChatDispatcherBuilder {
        crate::builder::ChatDispatcherBuilder::new()
    }
    
    pub(crate) fn with_config(
        registry: Arc<ProviderRegistry>,
        options: ChatOptions,
        timeout: Option<Duration>,
    ) -> Self {
        Self {
            registry,
            options,
            timeout,
        }
    }
    
    pub fn registry(&self) -> &ProviderRegistry {
        &self.registry
    }
    
    /// One response per requested model, in request order
    pub async fn dispatch(
        &self,
        prompt: &str,
        models: &[String],
        history: &[ThreadMessage],
    ) -> Vec<ModelResponse> {
        let calls = models
            .iter()
            .map(|model| self.call_model(model, prompt, history));
        join_all(calls).await
    }
    
    async fn call_model(&self, model: &str, prompt: &str, history: &[ThreadMessage]) -> ModelResponse {
        let Some(resolved) = self.registry.resolve(model) else {
            tracing::warn!(model = %model, "No provider configured for model");
            return ModelResponse::error(model, format!("No API configured for model {}", model));
        };
        
        let mut messages: Vec<Message> = filter_for_model(history, model)
            .iter()
            .map(Message::from)
            .collect();
        messages.push(Message::human(prompt));
        
        let request = ChatRequest::new(resolved.model.as_str(), messages).with_options(self.options.clone());
        let started = Instant::now();
        let call = resolved.client.chat(request);
        
        let result = match self.timeout {
            Some(limit) => match tokio::time::timeout(limit, call).await {
                Ok(result) => result,
                Err(_) => Err(anyhow::anyhow!("Request timed out after {}s", limit.as_secs())),
            },
            None => call.await,
        };
        
        match result {
            Ok(response) => {
                tracing::info!(
                    model = %model,
                    provider = %resolved.provider,
                    elapsed_ms = started.elapsed().as_millis() as u64,
                    "Model responded"
                );
                ModelResponse::success(model, response.text(), response.usage)
            }
            Err(e) => {
                tracing::warn!(model = %model, provider = %resolved.provider, error = %e, "Model call failed");
                ModelResponse::error(model, e)
            }
        }
    }
}
