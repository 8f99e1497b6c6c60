//! Configuration management for MediTriage
//!
//! Provides TOML-based configuration with defaults and validation.
//! Location: ~/.meditriage/config.toml

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use crate::errors::{Result, TriageError};
use crate::provider::{DEFAULT_API_KEY_ENV, DEFAULT_BASE_URL, DEFAULT_MODEL, DEFAULT_TEMPERATURE};
use crate::session::{SessionOptions, DEFAULT_EHR_SYNC_LATENCY, DEFAULT_REMINDER_EVERY};

/// Complete configuration for MediTriage
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub provider: ProviderConfig,
    #[serde(default)]
    pub session: SessionConfig,
    #[serde(default)]
    pub export: ExportConfig,
    #[serde(default)]
    pub telemetry: TelemetryConfig,
    #[serde(default)]
    pub paths: PathsConfig,
}

/// LLM provider connection
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ProviderConfig {
    pub base_url: String,
    pub model: String,
    /// Environment variable read for the API key at request time
    pub api_key_env: String,
    pub temperature: f32,
    pub timeout_secs: u64,
}

/// Dashboard session behavior
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    pub ehr_sync_latency_ms: u64,
    pub disclaimer_reminder_every: u32,
    pub clinician_id: String,
}

/// Export destination
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportConfig {
    pub dir: String,
}

/// Terminal and log output
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TelemetryConfig {
    pub default_verbosity: String,
    pub show_progress: bool,
    pub color_output: bool,
}

/// File system paths configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PathsConfig {
    pub history_file: String,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            model: DEFAULT_MODEL.to_string(),
            api_key_env: DEFAULT_API_KEY_ENV.to_string(),
            temperature: DEFAULT_TEMPERATURE,
            timeout_secs: 60,
        }
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            ehr_sync_latency_ms: DEFAULT_EHR_SYNC_LATENCY.as_millis() as u64,
            disclaimer_reminder_every: DEFAULT_REMINDER_EVERY,
            clinician_id: crate::fixtures::DEMO_CLINICIAN_ID.to_string(),
        }
    }
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            dir: ".".to_string(),
        }
    }
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            default_verbosity: "normal".to_string(),
            show_progress: true,
            color_output: true,
        }
    }
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            history_file: "~/.meditriage/history".to_string(),
        }
    }
}

impl Config {
    /// Load configuration from file or use defaults
    pub fn load(path: Option<&Path>) -> Result<Self> {
        if let Some(config_path) = path {
            Self::load_from_file(config_path)
        } else {
            Self::load_default()
        }
    }

    /// Load configuration from specific file
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| TriageError::Config(format!("Failed to read config: {}", e)))?;

        let config: Config = toml::from_str(&contents)
            .map_err(|e| TriageError::Config(format!("Failed to parse config: {}", e)))?;

        config.validate()?;
        Ok(config)
    }

    /// Load default configuration from standard location or use built-in defaults
    pub fn load_default() -> Result<Self> {
        if let Some(config_path) = Self::default_path() {
            if config_path.exists() {
                return Self::load_from_file(&config_path);
            }
        }

        Ok(Config::default())
    }

    /// Standard config file location
    pub fn default_path() -> Option<PathBuf> {
        dirs::home_dir().map(|home| home.join(".meditriage").join("config.toml"))
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<()> {
        if !(self.provider.base_url.starts_with("http://")
            || self.provider.base_url.starts_with("https://"))
        {
            return Err(TriageError::Config(format!(
                "base_url must be an http(s) URL: {}",
                self.provider.base_url
            )));
        }

        if self.provider.model.trim().is_empty() {
            return Err(TriageError::Config("model must not be empty".to_string()));
        }

        if self.provider.api_key_env.trim().is_empty() {
            return Err(TriageError::Config(
                "api_key_env must name an environment variable".to_string(),
            ));
        }

        if !(0.0..=2.0).contains(&self.provider.temperature) {
            return Err(TriageError::Config(
                "temperature must be between 0.0 and 2.0".to_string(),
            ));
        }

        if self.provider.timeout_secs == 0 {
            return Err(TriageError::Config(
                "timeout_secs must be greater than 0".to_string(),
            ));
        }

        if self.session.disclaimer_reminder_every == 0 {
            return Err(TriageError::Config(
                "disclaimer_reminder_every must be greater than 0".to_string(),
            ));
        }

        match self.telemetry.default_verbosity.as_str() {
            "quiet" | "normal" | "verbose" | "very_verbose" => {}
            _ => {
                return Err(TriageError::Config(format!(
                    "Invalid verbosity level: {}",
                    self.telemetry.default_verbosity
                )))
            }
        }

        Ok(())
    }

    /// Write the default configuration to `path`, refusing to overwrite
    pub fn init_file(path: &Path) -> Result<Self> {
        if path.exists() {
            return Err(TriageError::Config(format!(
                "{} already exists",
                path.display()
            )));
        }

        let config = Self::default();
        config.save(path)?;
        Ok(config)
    }

    /// Save configuration to file
    pub fn save(&self, path: &Path) -> Result<()> {
        let contents = toml::to_string_pretty(self)
            .map_err(|e| TriageError::Config(format!("Failed to serialize config: {}", e)))?;

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .map_err(|e| TriageError::Config(format!("Failed to create config dir: {}", e)))?;
        }

        std::fs::write(path, contents)
            .map_err(|e| TriageError::Config(format!("Failed to write config: {}", e)))?;

        Ok(())
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.provider.timeout_secs)
    }

    pub fn session_options(&self) -> SessionOptions {
        SessionOptions {
            ehr_sync_latency: Duration::from_millis(self.session.ehr_sync_latency_ms),
            reminder_every: self.session.disclaimer_reminder_every,
        }
    }

    /// Expand tilde in paths
    pub fn expand_path(path: &str) -> PathBuf {
        if let Some(rest) = path.strip_prefix("~/") {
            if let Some(home) = dirs::home_dir() {
                return home.join(rest);
            }
        }
        PathBuf::from(path)
    }

    pub fn export_dir(&self) -> PathBuf {
        Self::expand_path(&self.export.dir)
    }

    pub fn history_file(&self) -> PathBuf {
        Self::expand_path(&self.paths.history_file)
    }
}
