use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::prompt::DEFAULT_CONTEXT_CHARS;

const CONFIG_FILE_PATH: &str = "papermind.toml";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config file: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Model-serving backend the gateway relays to.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct BackendConfig {
    pub base_url: String,
    pub model: String,
    pub temperature: f32,
    pub api_key: Option<String>,
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            base_url: "http://127.0.0.1:5000/v1".to_string(),
            model: "Meta-Llama-3.1-8B-Instruct.Q4_K_M.gguf".to_string(),
            temperature: 0.2,
            api_key: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    /// Where the shells reach the completion gateway.
    pub gateway_url: String,
    pub request_timeout_secs: u64,
    pub health_timeout_secs: u64,
    pub user_id: String,
    pub conversations_dir: PathBuf,
    /// Characters of document text injected into each question.
    pub context_chars: usize,
    pub backend: BackendConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            gateway_url: "http://127.0.0.1:8000".to_string(),
            request_timeout_secs: 60,
            health_timeout_secs: 5,
            user_id: "papermind_user".to_string(),
            conversations_dir: PathBuf::from("conversations"),
            context_chars: DEFAULT_CONTEXT_CHARS,
            backend: BackendConfig::default(),
        }
    }
}

fn papermind_dir() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(std::env::temp_dir)
        .join(".papermind")
}

impl Config {
    /// Reads `~/.papermind/config.toml`, falling back to `./papermind.toml`
    /// and then to the built-in defaults, and applies environment overrides.
    pub fn load() -> Result<Self, ConfigError> {
        let candidates = [papermind_dir().join("config.toml"), PathBuf::from(CONFIG_FILE_PATH)];

        let mut config = match candidates.iter().find(|path| path.exists()) {
            Some(path) => {
                log::debug!("Loading config from {:?}", path);
                Self::from_file(path)?
            }
            None => Config::default(),
        };

        config.apply_env(|key| std::env::var(key).ok());
        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }

    /// Overrides fields from environment-style variables looked up through
    /// `lookup`. Numeric values that do not parse are ignored.
    pub fn apply_env(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(url) = lookup("PAPERMIND_GATEWAY_URL") {
            self.gateway_url = url;
        }
        if let Some(secs) = parse_env(&lookup, "PAPERMIND_TIMEOUT_SECS") {
            self.request_timeout_secs = secs;
        }
        if let Some(user_id) = lookup("PAPERMIND_USER_ID") {
            self.user_id = user_id;
        }
        if let Some(dir) = lookup("PAPERMIND_CONVERSATIONS_DIR") {
            self.conversations_dir = PathBuf::from(dir);
        }
        if let Some(chars) = parse_env(&lookup, "PAPERMIND_CONTEXT_CHARS") {
            self.context_chars = chars;
        }
        if let Some(base_url) = lookup("LLM_BASE_URL") {
            self.backend.base_url = base_url;
        }
        if let Some(model) = lookup("LLM_MODEL") {
            self.backend.model = model;
        }
        if let Some(api_key) = lookup("LLM_API_KEY") {
            self.backend.api_key = Some(api_key).filter(|key| !key.trim().is_empty());
        }
        if let Some(temperature) = parse_env(&lookup, "LLM_TEMPERATURE") {
            self.backend.temperature = temperature;
        }
    }
}

fn parse_env<T: std::str::FromStr>(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &str,
) -> Option<T> {
    let raw = lookup(key)?;
    match raw.trim().parse() {
        Ok(value) => Some(value),
        Err(_) => {
            log::warn!("Ignoring {}={:?}: not a valid value", key, raw);
            None
        }
    }
}
