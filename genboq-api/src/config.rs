use config::{Config, ConfigError, File};
use serde::{Deserialize, Serialize};
use std::env;
use std::path::{Path, PathBuf};
use std::time::Duration;

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct ApiConfig {
    pub server: ServerConfig,
    #[serde(default)]
    pub llm: LlmConfig,
    pub api_keys: Option<ApiKeysConfig>,
    #[serde(default)]
    pub rates: RatesConfig,
    pub cors: Option<CorsConfig>,
    pub logging: Option<LoggingConfig>,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Idle seconds before a session is discarded; 0 keeps sessions until deleted
    #[serde(default = "default_session_ttl_secs")]
    pub session_ttl_secs: u64,
}

fn default_session_ttl_secs() -> u64 {
    24 * 60 * 60
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct LlmConfig {
    pub model: Option<String>,
    #[serde(default = "default_generation_temperature")]
    pub generation_temperature: f32,
    #[serde(default = "default_refinement_temperature")]
    pub refinement_temperature: f32,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            model: None,
            generation_temperature: default_generation_temperature(),
            refinement_temperature: default_refinement_temperature(),
        }
    }
}

fn default_generation_temperature() -> f32 {
    0.2
}

fn default_refinement_temperature() -> f32 {
    0.1
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct ApiKeysConfig {
    pub gemini_api_key: Option<String>,
}

#[derive(Debug, Deserialize, Serialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum RateSourceKind {
    #[default]
    Fixed,
    Http,
}

#[derive(Debug, Deserialize, Serialize, Clone, Default)]
pub struct RatesConfig {
    #[serde(default)]
    pub source: RateSourceKind,
    pub url: Option<String>,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct CorsConfig {
    pub allowed_origins: Vec<String>,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct LoggingConfig {
    /// Directory for daily-rolling log files; stdout only when unset
    pub directory: Option<PathBuf>,
}

const DEFAULT_CONFIG: &str = r#"
[server]
host = "127.0.0.1"
port = 8080
session_ttl_secs = 86400  # 0 disables idle expiry

[llm]
# model = "gemini-2.5-pro"
generation_temperature = 0.2
refinement_temperature = 0.1

[api_keys]
# gemini_api_key = "your-gemini-key"  # or set GEMINI_API_KEY

[rates]
source = "fixed"  # Options: fixed, http
# url = "https://open.er-api.com/v6/latest/USD"

[cors]
allowed_origins = ["http://localhost:3000"]

[logging]
# directory = "~/.local/share/genboq/logs"
"#;

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            server: ServerConfig {
                host: "127.0.0.1".to_string(),
                port: 8080,
                session_ttl_secs: default_session_ttl_secs(),
            },
            llm: LlmConfig::default(),
            api_keys: None,
            rates: RatesConfig::default(),
            cors: Some(CorsConfig {
                allowed_origins: vec!["http://localhost:3000".to_string()],
            }),
            logging: None,
        }
    }
}

impl ApiConfig {
    /// Loads the default config file, writing it first if it does not exist
    pub fn load() -> Result<(Self, PathBuf), ConfigError> {
        let config_path = get_config_path();
        let config = Self::load_from(&config_path)?;
        Ok((config, config_path))
    }

    pub fn load_from(config_path: &Path) -> Result<Self, ConfigError> {
        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| {
                ConfigError::Message(format!("Failed to create config directory: {e}"))
            })?;
        }

        if !config_path.exists() {
            std::fs::write(config_path, DEFAULT_CONFIG).map_err(|e| {
                ConfigError::Message(format!("Failed to write default config: {e}"))
            })?;
        }

        let builder = Config::builder()
            .add_source(File::from(config_path.to_path_buf()))
            .build()?;

        let mut config: ApiConfig = builder.try_deserialize()?;

        if let Some(logging) = config.logging.as_mut() {
            logging.directory = logging.directory.take().map(expand_tilde);
        }

        Ok(config)
    }

    /// Gemini key from the config file, then `GEMINI_API_KEY`, then `API_KEY`
    pub fn gemini_api_key(&self) -> Option<String> {
        let present = |key: &String| !key.trim().is_empty();
        self.api_keys
            .as_ref()
            .and_then(|keys| keys.gemini_api_key.clone())
            .filter(present)
            .or_else(|| env::var("GEMINI_API_KEY").ok().filter(present))
            .or_else(|| env::var("API_KEY").ok().filter(present))
    }

    pub fn allowed_origins(&self) -> &[String] {
        self.cors
            .as_ref()
            .map(|c| c.allowed_origins.as_slice())
            .unwrap_or_default()
    }

    pub fn session_ttl(&self) -> Option<Duration> {
        match self.server.session_ttl_secs {
            0 => None,
            secs => Some(Duration::from_secs(secs)),
        }
    }

    pub fn log_directory(&self) -> Option<&Path> {
        self.logging.as_ref().and_then(|l| l.directory.as_deref())
    }
}

fn expand_tilde(path: PathBuf) -> PathBuf {
    if !path.starts_with("~") {
        return path;
    }
    match home::home_dir() {
        Some(home) => {
            let path_str = path.to_string_lossy();
            PathBuf::from(path_str.replacen('~', &home.to_string_lossy(), 1))
        }
        None => path,
    }
}

fn get_config_path() -> PathBuf {
    if let Some(config_dir) = dirs::config_dir() {
        config_dir.join("genboq/api.toml")
    } else {
        PathBuf::from("api.toml")
    }
}
