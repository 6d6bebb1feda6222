use parallax_llm::ProviderType;
use serde::{Deserialize, Serialize};

/// Provider keys known at process start, before `apis.json` is consulted
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProviderSettings {
    #[serde(default)]
    pub openai_api_key: Option<String>,
    #[serde(default)]
    pub anthropic_api_key: Option<String>,
    #[serde(default)]
    pub deepseek_api_key: Option<String>,
    #[serde(default)]
    pub gemini_api_key: Option<String>,
}

impl ProviderSettings {
    /// Read `OPENAI_API_KEY`, `ANTHROPIC_API_KEY`, `DEEPSEEK_API_KEY` and `GEMINI_API_KEY`
    pub fn from_env() -> Self {
        let read = |name: &str| std::env::var(name).ok().filter(|v| !v.trim().is_empty());
        Self {
            openai_api_key: read("OPENAI_API_KEY"),
            anthropic_api_key: read("ANTHROPIC_API_KEY"),
            deepseek_api_key: read("DEEPSEEK_API_KEY"),
            gemini_api_key: read("GEMINI_API_KEY"),
        }
    }
    
    pub fn key(&self, provider: ProviderType) -> Option<&str> {
        match provider {
            ProviderType::OpenAI => self.openai_api_key.as_deref(),
            ProviderType::Anthropic => self.anthropic_api_key.as_deref(),
            ProviderType::DeepSeek => self.deepseek_api_key.as_deref(),
            ProviderType::Gemini => self.gemini_api_key.as_deref(),
            ProviderType::Custom => None,
        }
    }
}
