// Google Gemini generateContent client

use crate::traits::{ChatClient, ChatRequest, ChatResponse, TokenUsage};
use crate::types::Message;
use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, CONTENT_TYPE};
use serde::{Deserialize, Serialize};
use serde_json::Value;

pub const GEMINI_API_BASE: &str = "https://generativelanguage.googleapis.com";

/// Gemini client (HTTP direct, no SDK)
/// 
/// The API key travels as a `key` query parameter and the assistant role is
/// called `model`.
#[derive(Debug, Clone)]
pub struct GeminiClient {
    http_client: reqwest::Client,
    api_key: String,
    base_url: String,
}

impl GeminiClient {
    pub fn new(api_key: impl Into<String>) -> Result<Self> {
        Self::with_base_url(api_key, GEMINI_API_BASE)
    }
    
    pub fn with_base_url(api_key: impl Into<String>, base_url: impl Into<String>) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        
        let http_client = reqwest::Client::builder()
            .default_headers(headers)
            .build()
            .context("Failed to create HTTP client")?;
        
        Ok(Self {
            http_client,
            api_key: api_key.into(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }
    
    fn build_generate_request(&self, request: &ChatRequest) -> Value {
        let mut system_parts = Vec::new();
        let mut contents = Vec::new();
        
        for message in &request.messages {
            let role = match message {
                Message::System { content } => {
                    system_parts.push(serde_json::json!({ "text": content.to_text() }));
                    continue;
                }
                Message::Human { .. } => "user",
                Message::AI { .. } => "model",
            };
            contents.push(serde_json::json!({
                "role": role,
                "parts": [{ "text": message.content().to_text() }],
            }));
        }
        
        let mut payload = serde_json::json!({ "contents": contents });
        
        if let Some(obj) = payload.as_object_mut() {
            if !system_parts.is_empty() {
                obj.insert(
                    "systemInstruction".to_string(),
                    serde_json::json!({ "parts": system_parts }),
                );
            }
            
            let mut generation_config = serde_json::Map::new();
            if let Some(temp) = request.options.temperature {
                generation_config.insert("temperature".to_string(), serde_json::json!(temp));
            }
            if let Some(max_tokens) = request.options.max_tokens {
                generation_config.insert("maxOutputTokens".to_string(), serde_json::json!(max_tokens));
            }
            if !generation_config.is_empty() {
                obj.insert("generationConfig".to_string(), Value::Object(generation_config));
            }
        }
        
        payload
    }
}

#[async_trait]
impl ChatClient for GeminiClient {
    async fn chat(&self, request: ChatRequest) -> Result<ChatResponse> {
        let payload = self.build_generate_request(&request);
        
        tracing::debug!(model = %request.model, "Sending Gemini generateContent request");
        
        let response = self
            .http_client
            .post(format!(
                "{}/v1beta/models/{}:generateContent",
                self.base_url, request.model
            ))
            .query(&[("key", self.api_key.as_str())])
            .json(&payload)
            .send()
            .await
            .context("Failed to send request")?;
        
        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            anyhow::bail!("Gemini API error ({}): {}", status, error_text);
        }
        
        let raw: GeminiResponse = response
            .json()
            .await
            .context("Failed to parse response")?;
        
        let candidate = raw.candidates.first();
        let text: String = candidate
            .and_then(|c| c.content.as_ref())
            .map(|content| {
                content
                    .parts
                    .iter()
                    .filter_map(|part| part.text.as_deref())
                    .collect()
            })
            .unwrap_or_default();
        
        Ok(ChatResponse {
            content: (!text.is_empty()).then_some(text),
            usage: raw.usage_metadata.as_ref().map(|u| TokenUsage {
                prompt_tokens: u.prompt_token_count,
                completion_tokens: u.candidates_token_count,
                total_tokens: u.total_token_count,
            }),
            finish_reason: candidate.and_then(|c| c.finish_reason.clone()),
            raw: serde_json::to_value(&raw)?,
        })
    }
}

// ============================================================================
// GEMINI-SPECIFIC RESPONSE TYPES
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GeminiResponse {
    #[serde(default)]
    pub candidates: Vec<Candidate>,
    #[serde(default)]
    pub usage_metadata: Option<UsageMetadata>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Candidate {
    pub content: Option<CandidateContent>,
    pub finish_reason: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    pub parts: Vec<Part>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct Part {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct UsageMetadata {
    #[serde(default)]
    pub prompt_token_count: u32,
    #[serde(default)]
    pub candidates_token_count: u32,
    #[serde(default)]
    pub total_token_count: u32,
}

#[cfg(test)]
mod tests {
    use super::*;
    
    #[test]
    fn test_assistant_role_maps_to_model() {
        let client = GeminiClient::new("test-key").unwrap();
        let request = ChatRequest::new(
            "gemini-1.5-pro",
            vec![
                Message::system("Answer in French"),
                Message::human("Hello"),
                Message::ai("Bonjour"),
                Message::human("How are you?"),
            ],
        );
        
        let payload = client.build_generate_request(&request);
        let contents = payload["contents"].as_array().unwrap();
        assert_eq!(contents.len(), 3);
        assert_eq!(contents[1]["role"], "model");
        assert_eq!(payload["systemInstruction"]["parts"][0]["text"], "Answer in French");
        assert!(payload.get("generationConfig").is_none());
    }
}
