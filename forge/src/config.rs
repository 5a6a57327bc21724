//! IdeaForge configuration types and loading

use eyre::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

/// API key value treated as "no key configured"
pub const PLACEHOLDER_API_KEY: &str = "mock-key";

/// Overrides `llm.base-url` when set
pub const BASE_URL_ENV: &str = "OPENAI_BASE_URL";

/// Overrides `llm.model` when set
pub const MODEL_ENV: &str = "OPENAI_MODEL";

/// Main IdeaForge configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Log level (TRACE, DEBUG, INFO, WARN, ERROR)
    #[serde(rename = "log-level")]
    pub log_level: Option<String>,

    /// LLM provider configuration
    pub llm: LlmConfig,

    /// Interview behaviour
    pub interview: InterviewConfig,

    /// Where generated documents are written
    pub output: OutputConfig,
}

/// Which gateway implementation serves the interview
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GatewayMode {
    /// Hosted language model
    Live,
    /// Deterministic canned responses
    Offline,
}

impl std::fmt::Display for GatewayMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GatewayMode::Live => write!(f, "live"),
            GatewayMode::Offline => write!(f, "offline"),
        }
    }
}

impl Config {
    /// Load configuration with fallback chain
    ///
    /// 1. Explicit path
    /// 2. `./.ideaforge.yml`
    /// 3. `~/.config/ideaforge/ideaforge.yml`
    /// 4. Defaults
    ///
    /// `OPENAI_BASE_URL` and `OPENAI_MODEL` then override whatever was loaded.
    pub fn load(config_path: Option<&PathBuf>) -> Result<Self> {
        let mut config = Self::load_files(config_path)?;
        config.llm.apply_env_overrides();
        Ok(config)
    }

    fn load_files(config_path: Option<&PathBuf>) -> Result<Self> {
        // If explicit config path provided, try to load it
        if let Some(path) = config_path {
            return Self::load_from_file(path).context(format!("Failed to load config from {}", path.display()));
        }

        for candidate in Self::search_paths() {
            if candidate.exists() {
                match Self::load_from_file(&candidate) {
                    Ok(config) => return Ok(config),
                    Err(e) => {
                        tracing::warn!("Failed to load config from {}: {}", candidate.display(), e);
                    }
                }
            }
        }

        // No config file found, use defaults
        tracing::info!("No config file found, using defaults");
        Ok(Self::default())
    }

    /// Read only the log level, before logging is initialised
    ///
    /// Errors are swallowed; the full load reports them later.
    pub fn load_log_level(config_path: Option<&PathBuf>) -> Option<String> {
        let candidates = match config_path {
            Some(path) => vec![path.clone()],
            None => Self::search_paths(),
        };
        candidates
            .into_iter()
            .filter(|p| p.exists())
            .find_map(|p| Self::load_from_file(&p).ok())
            .and_then(|config| config.log_level)
    }

    fn search_paths() -> Vec<PathBuf> {
        let mut paths = vec![PathBuf::from(".ideaforge.yml")];
        if let Some(config_dir) = dirs::config_dir() {
            paths.push(config_dir.join("ideaforge").join("ideaforge.yml"));
        }
        paths
    }

    fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(&path).context("Failed to read config file")?;

        let config: Self = serde_yaml::from_str(&content).context("Failed to parse config file")?;

        tracing::info!("Loaded config from: {}", path.as_ref().display());
        Ok(config)
    }

    /// Decide between the hosted model and the offline stand-in
    pub fn gateway_mode(&self) -> GatewayMode {
        debug!(offline = self.interview.offline, api_key_env = %self.llm.api_key_env, "gateway_mode: called");
        if self.interview.offline {
            debug!("gateway_mode: offline forced by config");
            return GatewayMode::Offline;
        }
        match self.llm.get_api_key() {
            Some(_) => GatewayMode::Live,
            None => {
                debug!("gateway_mode: no usable API key");
                GatewayMode::Offline
            }
        }
    }
}

/// LLM provider configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LlmConfig {
    /// Provider name (currently only "openai", covering compatible endpoints)
    pub provider: String,

    /// Model identifier
    pub model: String,

    /// Environment variable containing the API key
    #[serde(rename = "api-key-env")]
    pub api_key_env: String,

    /// API base URL, up to and including the version segment
    #[serde(rename = "base-url")]
    pub base_url: String,

    /// Maximum tokens per response
    #[serde(rename = "max-tokens")]
    pub max_tokens: u32,

    /// Request timeout in milliseconds
    #[serde(rename = "timeout-ms")]
    pub timeout_ms: u64,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            provider: "openai".to_string(),
            model: "gpt-5-mini".to_string(),
            api_key_env: "OPENAI_API_KEY".to_string(),
            base_url: "https://api.openai.com/v1".to_string(),
            max_tokens: 16384,
            timeout_ms: 300_000,
        }
    }
}

impl LlmConfig {
    /// Environment beats the config file
    pub fn apply_env_overrides(&mut self) {
        if let Some(base_url) = non_empty_env(BASE_URL_ENV) {
            debug!(%base_url, "apply_env_overrides: base url from environment");
            self.base_url = base_url;
        }
        if let Some(model) = non_empty_env(MODEL_ENV) {
            debug!(%model, "apply_env_overrides: model from environment");
            self.model = model;
        }
    }

    /// The API key, if set to something other than empty or the placeholder
    pub fn get_api_key(&self) -> Option<String> {
        std::env::var(&self.api_key_env)
            .ok()
            .map(|k| k.trim().to_string())
            .filter(|k| !k.is_empty() && k != PLACEHOLDER_API_KEY)
    }
}

fn non_empty_env(name: &str) -> Option<String> {
    std::env::var(name)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Interview behaviour
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct InterviewConfig {
    /// Always use the offline gateway, even when an API key is available
    pub offline: bool,

    /// Simulated latency of each offline gateway call in milliseconds
    #[serde(rename = "offline-latency-ms")]
    pub offline_latency_ms: u64,
}

/// Output configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Root directory; each finished session gets its own subdirectory
    pub dir: PathBuf,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            dir: PathBuf::from("ideaforge-output"),
        }
    }
}
