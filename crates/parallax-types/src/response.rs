use parallax_llm::TokenUsage;
use serde::{Deserialize, Serialize};

/// Prefix marking a failed model call in a response batch
pub const ERROR_PREFIX: &str = "Error:";

/// One model's answer in a comparison batch
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelResponse {
    pub model: String,
    pub response: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub usage: Option<TokenUsage>,
}

impl ModelResponse {
    pub fn success(model: impl Into<String>, response: impl Into<String>, usage: Option<TokenUsage>) -> Self {
        Self {
            model: model.into(),
            response: response.into(),
            usage,
        }
    }
    
    /// Failed call, rendered inline as `"Error: <message>"`
    pub fn error(model: impl Into<String>, message: impl std::fmt::Display) -> Self {
        Self {
            model: model.into(),
            response: format!("{} {}", ERROR_PREFIX, message),
            usage: None,
        }
    }
    
    pub fn is_error(&self) -> bool {
        self.response.starts_with(ERROR_PREFIX)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    
    #[test]
    fn test_error_prefix() {
        let failed = ModelResponse::error("b", "timeout");
        assert_eq!(failed.response, "Error: timeout");
        assert!(failed.is_error());
        
        let ok = ModelResponse::success("a", "Hi", None);
        assert!(!ok.is_error());
        
        // The prefix is literal, not a substring match
        let ok = ModelResponse::success("a", "No Error: here", None);
        assert!(!ok.is_error());
    }
}
