//! Configuration management for chatfmt.
//!
//! Parses `chatfmt.toml` configuration files with serde and provides
//! auto-discovery of config files in parent directories.
//!
//! CLI settings can be applied during load via [`CliSettings`].
//!
//! ```toml
//! [input]
//! max_bytes = 65536
//! oversize = "truncate"   # or "reject"
//!
//! [output]
//! role = "bot"
//! ```

use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// CLI settings that override configuration file values.
///
/// All fields are optional. Only non-None values override the loaded config.
#[derive(Debug, Default)]
pub struct CliSettings {
    /// Override maximum input size in bytes.
    pub max_input_bytes: Option<usize>,
    /// Override what happens to oversized input.
    pub oversize: Option<OversizePolicy>,
    /// Override the message wrapper role.
    pub role: Option<String>,
}

/// Configuration filename to search for.
const CONFIG_FILENAME: &str = "chatfmt.toml";

/// Default input limit (64 KiB).
const DEFAULT_MAX_INPUT_BYTES: usize = 64 * 1024;

/// Application configuration.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Input bounding configuration.
    pub input: InputConfig,
    /// Output configuration.
    pub output: OutputConfig,

    /// Path to the config file (set after loading).
    #[serde(skip)]
    pub config_path: Option<PathBuf>,
}

/// Input bounding configuration.
///
/// The renderer itself accepts any length; callers cap input here before
/// handing it over.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct InputConfig {
    /// Maximum accepted input size in bytes.
    pub max_bytes: usize,
    /// What to do with input larger than `max_bytes`.
    pub oversize: OversizePolicy,
}

impl Default for InputConfig {
    fn default() -> Self {
        Self {
            max_bytes: DEFAULT_MAX_INPUT_BYTES,
            oversize: OversizePolicy::default(),
        }
    }
}

/// Handling of input larger than the configured limit.
#[derive(Clone, Copy, Debug, Default, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum OversizePolicy {
    /// Cut the input at the last character boundary within the limit.
    #[default]
    Truncate,
    /// Refuse to render the input.
    Reject,
}

impl FromStr for OversizePolicy {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "truncate" => Ok(Self::Truncate),
            "reject" => Ok(Self::Reject),
            other => Err(ConfigError::Validation(format!(
                "oversize must be \"truncate\" or \"reject\", got \"{other}\""
            ))),
        }
    }
}

/// Output configuration.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Wrap rendered output in a `<div class="msg {role}">` container.
    pub role: Option<String>,
}

/// Configuration error.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// File not found.
    #[error("Configuration file not found: {}", .0.display())]
    NotFound(PathBuf),
    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// TOML parsing error.
    #[error("TOML parse error: {0}")]
    Parse(#[from] toml::de::Error),
    /// Validation error.
    #[error("Configuration error: {0}")]
    Validation(String),
}

impl Config {
    /// Load configuration from file with optional CLI settings.
    ///
    /// If `config_path` is provided, loads from that file.
    /// Otherwise, searches for `chatfmt.toml` in current directory and parents.
    ///
    /// CLI settings are applied after loading, allowing CLI arguments to take
    /// precedence over config file values. The result is validated again after
    /// the overrides.
    ///
    /// # Errors
    ///
    /// Returns error if explicit `config_path` doesn't exist, parsing fails,
    /// or the final configuration is invalid.
    pub fn load(
        config_path: Option<&Path>,
        cli_settings: Option<&CliSettings>,
    ) -> Result<Self, ConfigError> {
        let mut config = if let Some(path) = config_path {
            if !path.exists() {
                return Err(ConfigError::NotFound(path.to_path_buf()));
            }
            Self::load_from_file(path)?
        } else if let Some(discovered) = std::env::current_dir()
            .ok()
            .and_then(|cwd| Self::discover_config(&cwd))
        {
            Self::load_from_file(&discovered)?
        } else {
            Self::default()
        };

        if let Some(settings) = cli_settings {
            config.apply_cli_settings(settings);
            config.validate()?;
        }

        Ok(config)
    }

    /// Apply CLI settings to the configuration.
    fn apply_cli_settings(&mut self, settings: &CliSettings) {
        if let Some(max_bytes) = settings.max_input_bytes {
            self.input.max_bytes = max_bytes;
        }
        if let Some(oversize) = settings.oversize {
            self.input.oversize = oversize;
        }
        if let Some(role) = &settings.role {
            self.output.role = Some(role.clone());
        }
    }

    /// Search for config file in `start` and its parents.
    fn discover_config(start: &Path) -> Option<PathBuf> {
        let mut current = start.to_path_buf();
        loop {
            let candidate = current.join(CONFIG_FILENAME);
            if candidate.exists() {
                return Some(candidate);
            }
            if !current.pop() {
                return None;
            }
        }
    }

    /// Load configuration from a specific file.
    fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let mut config: Self = toml::from_str(&content)?;
        config.config_path = Some(path.to_path_buf());

        // Validate configuration after loading
        config.validate()?;

        Ok(config)
    }

    /// Validate configuration values.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Validation` if any validation fails.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.input.max_bytes == 0 {
            return Err(ConfigError::Validation(
                "input.max_bytes must be greater than 0".to_owned(),
            ));
        }

        if let Some(role) = &self.output.role {
            if role.is_empty() {
                return Err(ConfigError::Validation(
                    "output.role cannot be empty".to_owned(),
                ));
            }
            if !role
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
            {
                return Err(ConfigError::Validation(format!(
                    "output.role may only contain ASCII letters, digits, '-' and '_', got \"{role}\""
                )));
            }
        }

        Ok(())
    }
}
