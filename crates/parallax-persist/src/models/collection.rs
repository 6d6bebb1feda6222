use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Named, ordered group of prompt ids
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Collection {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub prompts: Vec<String>,
    pub created_at: DateTime<Utc>,
}
