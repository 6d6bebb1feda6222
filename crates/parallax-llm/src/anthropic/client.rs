// Anthropic Messages API client

use crate::traits::{ChatClient, ChatRequest, ChatResponse, TokenUsage};
use crate::types::Message;
use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, CONTENT_TYPE};
use serde::{Deserialize, Serialize};
use serde_json::Value;

pub const ANTHROPIC_API_BASE: &str = "https://api.anthropic.com";
pub const ANTHROPIC_VERSION: &str = "2023-06-01";

/// Anthropic requires max_tokens on every request
const DEFAULT_MAX_TOKENS: u32 = 4096;

/// Anthropic client (HTTP direct, no SDK)
/// 
/// Differs from OpenAI in three ways:
/// - Auth header: `x-api-key` plus a pinned `anthropic-version`
/// - System prompts travel in a top-level `system` field, not in `messages`
/// - `max_tokens` is mandatory
#[derive(Debug, Clone)]
pub struct AnthropicClient {
    http_client: reqwest::Client,
    base_url: String,
}

impl AnthropicClient {
    pub fn new(api_key: impl Into<String>) -> Result<Self> {
        Self::with_base_url(api_key, ANTHROPIC_API_BASE)
    }
    
    pub fn with_base_url(api_key: impl Into<String>, base_url: impl Into<String>) -> Result<Self> {
        let api_key = api_key.into();
        
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.insert(
            "x-api-key",
            HeaderValue::from_str(&api_key).context("Invalid API key format")?,
        );
        headers.insert("anthropic-version", HeaderValue::from_static(ANTHROPIC_VERSION));
        
        let http_client = reqwest::Client::builder()
            .default_headers(headers)
            .build()
            .context("Failed to create HTTP client")?;
        
        Ok(Self {
            http_client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }
    
    fn build_messages_request(&self, request: &ChatRequest) -> Value {
        let mut system_parts = Vec::new();
        let mut messages = Vec::new();
        
        for message in &request.messages {
            match message {
                Message::System { content } => system_parts.push(content.to_text()),
                Message::Human { content } => messages.push(serde_json::json!({
                    "role": "user",
                    "content": content.to_text(),
                })),
                Message::AI { content } => messages.push(serde_json::json!({
                    "role": "assistant",
                    "content": content.to_text(),
                })),
            }
        }
        
        let mut payload = serde_json::json!({
            "model": request.model,
            "max_tokens": request.options.max_tokens.unwrap_or(DEFAULT_MAX_TOKENS),
            "messages": messages,
        });
        
        if let Some(obj) = payload.as_object_mut() {
            if !system_parts.is_empty() {
                obj.insert("system".to_string(), serde_json::json!(system_parts.join("\n\n")));
            }
            if let Some(temp) = request.options.temperature {
                obj.insert("temperature".to_string(), serde_json::json!(temp));
            }
        }
        
        payload
    }
}

#[async_trait]
impl ChatClient for AnthropicClient {
    async fn chat(&self, request: ChatRequest) -> Result<ChatResponse> {
        let payload = self.build_messages_request(&request);
        
        tracing::debug!(model = %request.model, "Sending Anthropic messages request");
        
        let response = self
            .http_client
            .post(format!("{}/v1/messages", self.base_url))
            .json(&payload)
            .send()
            .await
            .context("Failed to send request")?;
        
        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            anyhow::bail!("Anthropic API error ({}): {}", status, error_text);
        }
        
        let raw: AnthropicResponse = response
            .json()
            .await
            .context("Failed to parse response")?;
        
        let text: String = raw
            .content
            .iter()
            .filter(|block| block.block_type == "text")
            .filter_map(|block| block.text.as_deref())
            .collect();
        
        Ok(ChatResponse {
            content: (!text.is_empty()).then_some(text),
            usage: raw
                .usage
                .as_ref()
                .map(|u| TokenUsage::new(u.input_tokens, u.output_tokens)),
            finish_reason: raw.stop_reason.clone(),
            raw: serde_json::to_value(&raw)?,
        })
    }
}

// ============================================================================
// ANTHROPIC-SPECIFIC RESPONSE TYPES
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
struct AnthropicResponse {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub content: Vec<ContentBlock>,
    pub stop_reason: Option<String>,
    pub usage: Option<AnthropicUsage>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct ContentBlock {
    #[serde(rename = "type")]
    pub block_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct AnthropicUsage {
    pub input_tokens: u32,
    pub output_tokens: u32,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::traits::ChatOptions;
    
    #[test]
    fn test_system_message_moves_to_top_level() {
        let client = AnthropicClient::new("test-key").unwrap();
        let request = ChatRequest::new(
            "claude-3-5-sonnet-latest",
            vec![Message::system("Be brief"), Message::human("Hello")],
        );
        
        let payload = client.build_messages_request(&request);
        assert_eq!(payload["system"], "Be brief");
        assert_eq!(payload["messages"].as_array().unwrap().len(), 1);
        assert_eq!(payload["max_tokens"], DEFAULT_MAX_TOKENS);
    }
    
    #[test]
    fn test_explicit_max_tokens_wins() {
        let client = AnthropicClient::new("test-key").unwrap();
        let request = ChatRequest::new("claude-3-haiku", vec![Message::human("Hi")])
            .with_options(ChatOptions::new().max_tokens(128));
        
        let payload = client.build_messages_request(&request);
        assert_eq!(payload["max_tokens"], 128);
        assert!(payload.get("system").is_none());
    }
}
