use config::{Config as ConfigLoader, ConfigError, Environment, File};
use parallax_dispatch::ProviderSettings;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub cors: CorsConfig,
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub llm: LlmConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
    
    // Secrets (from ENV only)
    #[serde(skip)]
    pub providers: ProviderSettings,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 3001,
            request_timeout_secs: default_request_timeout(),
        }
    }
}

fn default_request_timeout() -> u64 {
    300
}

#[derive(Debug, Clone, Deserialize)]
pub struct CorsConfig {
    pub enabled: bool,
    #[serde(default)]
    pub origins: Vec<String>,
}

impl Default for CorsConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            origins: vec!["*".to_string()],
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct StorageConfig {
    pub root: PathBuf,
    /// Keep threads under `threadLogs/` like older installs
    #[serde(default)]
    pub legacy_layout: bool,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            root: PathBuf::from("storage"),
            legacy_layout: false,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct LlmConfig {
    /// Sent to providers only when set
    #[serde(default)]
    pub max_tokens: Option<u32>,
    #[serde(default)]
    pub temperature: Option<f32>,
    /// Per-model call limit; 0 disables it
    #[serde(default)]
    pub timeout_secs: u64,
}

impl LlmConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    pub level: String,
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "pretty".to_string(),
        }
    }
}

/// Short environment names mapped onto config keys
const ENV_OVERRIDES: [(&str, &str); 9] = [
    ("SERVER_HOST", "server.host"),
    ("SERVER_PORT", "server.port"),
    ("STORAGE_ROOT", "storage.root"),
    ("STORAGE_LEGACY_LAYOUT", "storage.legacy_layout"),
    ("LLM_MAX_TOKENS", "llm.max_tokens"),
    ("LLM_TEMPERATURE", "llm.temperature"),
    ("LLM_TIMEOUT_SECS", "llm.timeout_secs"),
    ("LOG_LEVEL", "logging.level"),
    ("LOG_FORMAT", "logging.format"),
];

impl Config {
    /// Load configuration from TOML files and environment variables
    /// 
    /// Hierarchy (weakest to strongest):
    /// 1. config/default.toml
    /// 2. config/{ENV}.toml (if ENV is set)
    /// 3. `PARALLAX_<SECTION>__<KEY>` environment variables
    /// 4. The short names in `ENV_OVERRIDES` (SERVER_PORT, LOG_LEVEL, ...)
    pub fn load() -> Result<Self, ConfigError> {
        let env = std::env::var("ENV").unwrap_or_else(|_| "dev".to_string());
        
        let mut builder = ConfigLoader::builder()
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name(&format!("config/{}", env)).required(false))
            .add_source(
                Environment::with_prefix("PARALLAX")
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true)
            );
        
        for (var, key) in ENV_OVERRIDES {
            builder = builder.set_override_option(key, std::env::var(var).ok())?;
        }
        
        let mut cfg: Config = builder.build()?.try_deserialize()?;
        
        // Provider keys are optional; apis.json can supply them instead
        cfg.providers = ProviderSettings::from_env();
        
        Ok(cfg)
    }
    
    /// Load config from a specific path (useful for testing)
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let builder = ConfigLoader::builder()
            .add_source(File::from(path.as_ref()));
        
        let config = builder.build()?;
        config.try_deserialize()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    
    #[test]
    fn test_config_structure() {
        let toml = r#"
            [server]
            host = "0.0.0.0"
            port = 8080
            
            [cors]
            enabled = true
            origins = ["http://localhost:5173"]
            
            [storage]
            root = "/var/lib/parallax"
            legacy_layout = true
            
            [llm]
            max_tokens = 2048
            temperature = 0.7
            timeout_secs = 60
            
            [logging]
            level = "debug"
            format = "json"
        "#;
        
        let config: Config = toml::from_str(toml).unwrap();
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.server.request_timeout_secs, 300);
        assert!(config.storage.legacy_layout);
        assert_eq!(config.llm.max_tokens, Some(2048));
        assert_eq!(config.llm.timeout(), Duration::from_secs(60));
        assert_eq!(config.logging.format, "json");
    }
    
    #[test]
    fn test_missing_sections_use_defaults() {
        let config: Config = toml::from_str("[server]\nhost = \"localhost\"\nport = 9000\n").unwrap();
        assert_eq!(config.storage.root, PathBuf::from("storage"));
        assert!(!config.storage.legacy_layout);
        assert!(config.llm.max_tokens.is_none());
        assert_eq!(config.logging.level, "info");
    }
    
    #[test]
    fn test_from_file() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("test.toml");
        std::fs::write(&path, "[storage]\nroot = \"data-dir\"\n\n[llm]\ntimeout_secs = 5\n").unwrap();
        
        let config = Config::from_file(&path).unwrap();
        assert_eq!(config.storage.root, PathBuf::from("data-dir"));
        assert_eq!(config.llm.timeout_secs, 5);
        assert_eq!(config.server.port, 3001);
    }
}
