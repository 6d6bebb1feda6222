use chrono::Utc;
use parallax_types::{Thread, ThreadMessage};
use serde::{Deserialize, Serialize};

/// On-disk thread shape.
///
/// Current files hold the enveloped record; older ones are a bare array of
/// messages. Both are read, only `Enveloped` is ever written.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ThreadDocument {
    Enveloped(Thread),
    Legacy(Vec<ThreadMessage>),
}

impl ThreadDocument {
    pub fn is_legacy(&self) -> bool {
        matches!(self, Self::Legacy(_))
    }
    
    /// Normalize into an enveloped thread owned by the file named `id`
    pub fn into_thread(self, id: &str) -> Thread {
        match self {
            Self::Enveloped(mut thread) => {
                if thread.id != id {
                    tracing::debug!(file_id = %id, record_id = %thread.id, "Thread id differs from file name");
                    thread.id = id.to_string();
                }
                thread
            }
            Self::Legacy(messages) => {
                let created_at = messages.first().map_or_else(Utc::now, |m| m.timestamp);
                let updated_at = messages.last().map_or(created_at, |m| m.timestamp);
                let mut thread = Thread {
                    id: id.to_string(),
                    messages: Vec::new(),
                    models: Vec::new(),
                    created_at,
                    updated_at,
                };
                let models: Vec<&str> = messages
                    .iter()
                    .filter_map(|m| m.model.as_deref())
                    .collect();
                thread.add_models(&models);
                thread.messages = messages;
                thread
            }
        }
    }
}
