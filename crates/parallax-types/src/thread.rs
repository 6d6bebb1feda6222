use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::message::ThreadMessage;

/// Enveloped thread record: `{id, messages, models, createdAt, updatedAt}`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Thread {
    pub id: String,
    pub messages: Vec<ThreadMessage>,
    #[serde(default)]
    pub models: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Thread {
    /// Empty thread stamped with the current time
    pub fn new(id: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: id.into(),
            messages: Vec::new(),
            models: Vec::new(),
            created_at: now,
            updated_at: now,
        }
    }
    
    pub fn touch(&mut self) {
        self.updated_at = Utc::now();
    }
    
    /// Merge `models` into the thread's model list, keeping first-seen order
    pub fn add_models<S: AsRef<str>>(&mut self, models: &[S]) {
        for model in models {
            let model = model.as_ref();
            if !self.models.iter().any(|m| m == model) {
                self.models.push(model.to_string());
            }
        }
    }
    
    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }
    
    /// First user message, used as the thread's title and for prompt matching
    pub fn first_prompt(&self) -> Option<&str> {
        self.messages
            .iter()
            .find(|m| m.is_user())
            .map(|m| m.content.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    
    #[test]
    fn test_camel_case_envelope() {
        let thread = Thread::new("t1");
        let json = serde_json::to_value(&thread).unwrap();
        assert!(json.get("createdAt").is_some());
        assert!(json.get("updatedAt").is_some());
        assert_eq!(json["messages"].as_array().unwrap().len(), 0);
    }
    
    #[test]
    fn test_add_models_is_ordered_union() {
        let mut thread = Thread::new("t1");
        thread.add_models(&["b", "a"]);
        thread.add_models(&["a".to_string(), "c".to_string()]);
        assert_eq!(thread.models, vec!["b", "a", "c"]);
    }
    
    #[test]
    fn test_first_prompt_skips_system() {
        let mut thread = Thread::new("t1");
        thread.messages.push(ThreadMessage::system("rules"));
        thread.messages.push(ThreadMessage::user("Hello"));
        assert_eq!(thread.first_prompt(), Some("Hello"));
    }
}
