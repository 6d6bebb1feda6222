// Configuration layer for provider-agnostic LLM client creation

use anyhow::{anyhow, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use crate::anthropic::AnthropicClient;
use crate::gemini::GeminiClient;
use crate::openai::{OpenAIClient, DEEPSEEK_API_BASE};
use crate::traits::ChatClient;

/// Type of LLM provider
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderType {
    OpenAI,
    Anthropic,
    DeepSeek,
    Gemini,
    /// Any OpenAI-compatible endpoint reachable at a user-supplied URL
    Custom,
}

impl ProviderType {
    pub const ALL: [ProviderType; 5] = [
        ProviderType::OpenAI,
        ProviderType::Anthropic,
        ProviderType::DeepSeek,
        ProviderType::Gemini,
        ProviderType::Custom,
    ];
    
    pub fn as_str(&self) -> &'static str {
        match self {
            ProviderType::OpenAI => "openai",
            ProviderType::Anthropic => "anthropic",
            ProviderType::DeepSeek => "deepseek",
            ProviderType::Gemini => "gemini",
            ProviderType::Custom => "custom",
        }
    }
}

impl fmt::Display for ProviderType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ProviderType {
    type Err = anyhow::Error;
    
    fn from_str(s: &str) -> Result<Self> {
        let normalized = s.trim().to_ascii_lowercase();
        ProviderType::ALL
            .into_iter()
            .find(|p| p.as_str() == normalized)
            .ok_or_else(|| anyhow!("Unsupported provider: {}", s))
    }
}

/// Complete provider configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderConfig {
    pub provider: ProviderType,
    pub api_key: String,
    /// Base URL override (required for `Custom`)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,
}

impl ProviderConfig {
    pub fn new(provider: ProviderType, api_key: impl Into<String>) -> Self {
        Self {
            provider,
            api_key: api_key.into(),
            base_url: None,
        }
    }
    
    pub fn openai(api_key: impl Into<String>) -> Self {
        Self::new(ProviderType::OpenAI, api_key)
    }
    
    pub fn anthropic(api_key: impl Into<String>) -> Self {
        Self::new(ProviderType::Anthropic, api_key)
    }
    
    pub fn deepseek(api_key: impl Into<String>) -> Self {
        Self::new(ProviderType::DeepSeek, api_key)
    }
    
    pub fn gemini(api_key: impl Into<String>) -> Self {
        Self::new(ProviderType::Gemini, api_key)
    }
    
    /// Create a config for an OpenAI-compatible endpoint
    pub fn custom(api_key: impl Into<String>, base_url: impl Into<String>) -> Self {
        Self::new(ProviderType::Custom, api_key).with_base_url(base_url)
    }
    
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }
    
    /// Get the provider type
    pub fn provider_type(&self) -> ProviderType {
        self.provider
    }
}

/// Factory for creating LLM clients from configuration
pub struct ClientFactory;

impl ClientFactory {
    /// Create a chat client from provider configuration
    pub fn create_client(config: ProviderConfig) -> Result<Arc<dyn ChatClient>> {
        let ProviderConfig { provider, api_key, base_url } = config;
        
        let client: Arc<dyn ChatClient> = match (provider, base_url) {
            (ProviderType::OpenAI, None) => Arc::new(OpenAIClient::new(api_key)?),
            (ProviderType::OpenAI, Some(url)) => Arc::new(OpenAIClient::with_base_url(api_key, url)?),
            (ProviderType::DeepSeek, url) => Arc::new(OpenAIClient::with_base_url(
                api_key,
                url.unwrap_or_else(|| DEEPSEEK_API_BASE.to_string()),
            )?),
            (ProviderType::Anthropic, None) => Arc::new(AnthropicClient::new(api_key)?),
            (ProviderType::Anthropic, Some(url)) => Arc::new(AnthropicClient::with_base_url(api_key, url)?),
            (ProviderType::Gemini, None) => Arc::new(GeminiClient::new(api_key)?),
            (ProviderType::Gemini, Some(url)) => Arc::new(GeminiClient::with_base_url(api_key, url)?),
            (ProviderType::Custom, Some(url)) => Arc::new(OpenAIClient::with_base_url(api_key, url)?),
            (ProviderType::Custom, None) => {
                return Err(anyhow!("Custom provider requires a base URL"));
            }
        };
        
        Ok(client)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_provider_from_str() {
        assert_eq!("openai".parse::<ProviderType>().unwrap(), ProviderType::OpenAI);
        assert_eq!(" Anthropic ".parse::<ProviderType>().unwrap(), ProviderType::Anthropic);
        assert_eq!("custom".parse::<ProviderType>().unwrap(), ProviderType::Custom);
        assert!("mistral".parse::<ProviderType>().is_err());
    }

    #[test]
    fn test_custom_requires_base_url() {
        let config = ProviderConfig::new(ProviderType::Custom, "key");
        assert!(ClientFactory::create_client(config).is_err());
        
        let config = ProviderConfig::custom("key", "http://localhost:11434/v1");
        assert!(ClientFactory::create_client(config).is_ok());
    }

    #[test]
    fn test_every_builtin_provider_builds() {
        for provider in [
            ProviderType::OpenAI,
            ProviderType::Anthropic,
            ProviderType::DeepSeek,
            ProviderType::Gemini,
        ] {
            let config = ProviderConfig::new(provider, "test-key");
            assert!(ClientFactory::create_client(config).is_ok(), "{provider} failed");
        }
    }

    #[test]
    fn test_serde_roundtrip() {
        let config = ProviderConfig::custom("test-key", "http://localhost:8000/v1");

        let json = serde_json::to_string(&config).unwrap();
        assert!(json.contains("\"provider\":\"custom\""));
        let deserialized: ProviderConfig = serde_json::from_str(&json).unwrap();

        assert_eq!(config.provider_type(), deserialized.provider_type());
        assert_eq!(deserialized.base_url.as_deref(), Some("http://localhost:8000/v1"));
    }
}
