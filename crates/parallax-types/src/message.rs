use chrono::{DateTime, TimeZone, Utc};
use parallax_llm::{Message, TokenUsage};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::response::ERROR_PREFIX;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
    System,
}

/// One entry of a thread's history, as persisted on disk
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ThreadMessage {
    pub role: Role,
    pub content: String,
    
    /// Model that produced an assistant message
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    
    #[serde(default = "Utc::now", deserialize_with = "lenient_timestamp")]
    pub timestamp: DateTime<Utc>,
    
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub usage: Option<TokenUsage>,
}

impl ThreadMessage {
    pub fn new(role: Role, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
            model: None,
            timestamp: Utc::now(),
            usage: None,
        }
    }
    
    pub fn user(content: impl Into<String>) -> Self {
        Self::new(Role::User, content)
    }
    
    pub fn system(content: impl Into<String>) -> Self {
        Self::new(Role::System, content)
    }
    
    pub fn assistant(content: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            model: Some(model.into()),
            ..Self::new(Role::Assistant, content)
        }
    }
    
    pub fn with_usage(mut self, usage: Option<TokenUsage>) -> Self {
        self.usage = usage;
        self
    }
    
    /// Identity used when merging histories: two entries with the same
    /// role, content and model are the same message.
    pub fn dedup_key(&self) -> (Role, &str, Option<&str>) {
        (self.role, self.content.as_str(), self.model.as_deref())
    }
    
    pub fn same_entry(&self, other: &ThreadMessage) -> bool {
        self.dedup_key() == other.dedup_key()
    }
    
    pub fn is_user(&self) -> bool {
        self.role == Role::User
    }
    
    pub fn is_assistant(&self) -> bool {
        self.role == Role::Assistant
    }
    
    /// Failed model call echoed back by a client; never context, never stored
    pub fn is_error(&self) -> bool {
        self.is_assistant() && self.content.starts_with(ERROR_PREFIX)
    }
}

impl From<&ThreadMessage> for Message {
    fn from(message: &ThreadMessage) -> Self {
        match message.role {
            Role::User => Message::human(message.content.as_str()),
            Role::Assistant => Message::ai(message.content.as_str()),
            Role::System => Message::system(message.content.as_str()),
        }
    }
}

/// Accepts RFC 3339 strings, epoch milliseconds, or anything else (→ now).
/// Legacy thread files were written by several generations of the tool.
fn lenient_timestamp<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    let parsed = match value {
        Some(Value::String(s)) => DateTime::parse_from_rfc3339(&s)
            .map(|dt| dt.with_timezone(&Utc))
            .ok(),
        Some(Value::Number(n)) => n
            .as_i64()
            .and_then(|millis| Utc.timestamp_millis_opt(millis).single()),
        _ => None,
    };
    Ok(parsed.unwrap_or_else(Utc::now))
}

#[cfg(test)]
mod tests {
    use super::*;
    
    #[test]
    fn test_assistant_carries_model() {
        let msg = ThreadMessage::assistant("Hi", "gpt-4o");
        assert_eq!(msg.model.as_deref(), Some("gpt-4o"));
        assert!(msg.is_assistant());
    }
    
    #[test]
    fn test_is_error_only_for_assistant_entries() {
        assert!(ThreadMessage::assistant("Error: timeout", "b").is_error());
        assert!(!ThreadMessage::assistant("Hi", "a").is_error());
        assert!(!ThreadMessage::user("Error: in my stack trace").is_error());
    }
    
    #[test]
    fn test_dedup_key_ignores_timestamp_and_usage() {
        let a = ThreadMessage::assistant("Hi", "a");
        let mut b = ThreadMessage::assistant("Hi", "a")
            .with_usage(Some(TokenUsage::new(1, 1)));
        b.timestamp = Utc.timestamp_millis_opt(0).unwrap();
        assert!(a.same_entry(&b));
        
        let c = ThreadMessage::assistant("Hi", "b");
        assert!(!a.same_entry(&c));
    }
    
    #[test]
    fn test_serialization_omits_absent_fields() {
        let json = serde_json::to_value(ThreadMessage::user("Hello")).unwrap();
        assert_eq!(json["role"], "user");
        assert!(json.get("model").is_none());
        assert!(json.get("usage").is_none());
        assert!(json["timestamp"].is_string());
    }
    
    #[test]
    fn test_lenient_timestamp_forms() {
        let msg: ThreadMessage = serde_json::from_str(
            r#"{"role":"user","content":"a","timestamp":"2024-05-01T10:00:00.000Z"}"#,
        ).unwrap();
        assert_eq!(msg.timestamp.to_rfc3339(), "2024-05-01T10:00:00+00:00");
        
        let msg: ThreadMessage = serde_json::from_str(
            r#"{"role":"user","content":"a","timestamp":1714557600000}"#,
        ).unwrap();
        assert_eq!(msg.timestamp.timestamp_millis(), 1714557600000);
        
        let msg: ThreadMessage = serde_json::from_str(
            r#"{"role":"assistant","content":"a","timestamp":"yesterday","usage":null}"#,
        ).unwrap();
        assert!(msg.usage.is_none());
        
        let msg: ThreadMessage = serde_json::from_str(r#"{"role":"user","content":"a"}"#).unwrap();
        assert!(msg.timestamp <= Utc::now());
    }
    
    #[test]
    fn test_into_llm_message() {
        let msg: Message = (&ThreadMessage::assistant("Hi", "m")).into();
        assert_eq!(msg.role(), "assistant");
        assert_eq!(msg.content().as_text(), Some("Hi"));
    }
}
