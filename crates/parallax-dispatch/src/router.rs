use parallax_llm::ProviderType;

/// Where a model id should be sent
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ModelRoute {
    /// A built-in provider, recognized by model-name prefix
    Provider(ProviderType),
    /// A custom endpoint. `api_id` is set when the model was written as
    /// `<apiId>/<model>`.
    Custom {
        api_id: Option<String>,
        model: String,
    },
}

const OPENAI_PREFIXES: [&str; 5] = ["gpt", "o1", "o3", "o4", "chatgpt"];

/// Route a model id by its name
pub fn route_model(model: &str) -> ModelRoute {
    let lower = model.to_ascii_lowercase();
    
    if lower.starts_with("claude") {
        ModelRoute::Provider(ProviderType::Anthropic)
    } else if lower.starts_with("gemini") {
        ModelRoute::Provider(ProviderType::Gemini)
    } else if lower.starts_with("deepseek") {
        ModelRoute::Provider(ProviderType::DeepSeek)
    } else if OPENAI_PREFIXES.iter().any(|p| lower.starts_with(p)) {
        ModelRoute::Provider(ProviderType::OpenAI)
    } else {
        match model.split_once('/') {
            Some((api_id, name)) if !api_id.is_empty() && !name.is_empty() => ModelRoute::Custom {
                api_id: Some(api_id.to_string()),
                model: name.to_string(),
            },
            _ => ModelRoute::Custom {
                api_id: None,
                model: model.to_string(),
            },
        }
    }
}
