use chrono::{DateTime, Utc};
use parallax_types::ModelResponse;
use serde::{Deserialize, Serialize};

/// Record of one comparison, written under `logs/<date>/`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConversationLog {
    pub id: String,
    pub timestamp: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thread_id: Option<String>,
    pub prompt: String,
    pub models: Vec<String>,
    pub responses: Vec<ModelResponse>,
}

impl ConversationLog {
    pub fn new(
        thread_id: Option<String>,
        prompt: impl Into<String>,
        models: Vec<String>,
        responses: Vec<ModelResponse>,
    ) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            timestamp: Utc::now(),
            thread_id,
            prompt: prompt.into(),
            models,
            responses,
        }
    }
}
