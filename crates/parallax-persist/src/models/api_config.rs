use serde::{Deserialize, Serialize};

/// Contents of `config/apis.json`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ApiConfigFile {
    #[serde(default)]
    pub apis: Vec<ApiEntry>,
}

/// One configured provider credential
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiEntry {
    pub id: String,
    pub name: String,
    pub provider: String,
    pub key: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(default)]
    pub active: bool,
}

impl ApiEntry {
    /// Key with all but the last four characters hidden
    pub fn masked_key(&self) -> String {
        let chars: Vec<char> = self.key.chars().collect();
        if chars.len() <= 4 {
            return "****".to_string();
        }
        let tail: String = chars[chars.len() - 4..].iter().collect();
        format!("****{}", tail)
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NewApiEntry {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub provider: String,
    #[serde(default)]
    pub key: String,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default = "default_active")]
    pub active: bool,
}

fn default_active() -> bool {
    true
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ApiEntryUpdate {
    pub name: Option<String>,
    pub provider: Option<String>,
    pub key: Option<String>,
    pub url: Option<String>,
    pub active: Option<bool>,
}

#[cfg(test)]
mod tests {
    use super::*;
    
    #[test]
    fn test_masked_key() {
        let mut entry = ApiEntry {
            id: "1".to_string(),
            name: "main".to_string(),
            provider: "openai".to_string(),
            key: "sk-abcdef1234".to_string(),
            url: None,
            active: true,
        };
        assert_eq!(entry.masked_key(), "****1234");
        
        entry.key = "abc".to_string();
        assert_eq!(entry.masked_key(), "****");
    }
    
    #[test]
    fn test_new_entry_defaults_active() {
        let entry: NewApiEntry = serde_json::from_str(r#"{"name":"x","provider":"gemini","key":"k"}"#).unwrap();
        assert!(entry.active);
        assert!(entry.url.is_none());
    }
}
