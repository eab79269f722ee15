//! Configuration loading and typed config structures.
//!
//! The park configuration is a small YAML file (by convention
//! `parkworks.yaml`). Every field has a default, so an empty file, or no
//! file at all, yields a playable setup.
//!
//! ```yaml
//! session:
//!   editor_mode: false
//!   sandbox_mode: false
//!   paused: false
//!   player_id: 0
//! finance:
//!   starting_cash: 10000
//!   no_money: false
//! logging:
//!   level: info
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};

use parkworks_types::Money;

/// Environment variable forcing sandbox mode on or off.
pub const ENV_SANDBOX: &str = "PARKWORKS_SANDBOX";

/// Environment variable forcing editor mode on or off.
pub const ENV_EDITOR: &str = "PARKWORKS_EDITOR";

/// Errors that can occur when loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Failed to read the configuration file from disk.
    #[error("failed to read config file: {source}")]
    Io {
        /// The underlying I/O error.
        #[from]
        source: std::io::Error,
    },

    /// Failed to parse YAML content.
    #[error("failed to parse config YAML: {source}")]
    Yaml {
        /// The underlying YAML parse error.
        source: serde_yml::Error,
    },
}

impl From<serde_yml::Error> for ConfigError {
    fn from(source: serde_yml::Error) -> Self {
        Self::Yaml { source }
    }
}

/// Top-level park configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParkConfig {
    /// Session modes.
    #[serde(default)]
    pub session: SessionConfig,

    /// Starting finances.
    #[serde(default)]
    pub finance: FinanceConfig,

    /// Logging configuration.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl ParkConfig {
    /// Load configuration from a YAML file at the given path.
    ///
    /// Environment variables override YAML values for session modes:
    /// - `PARKWORKS_SANDBOX` overrides `session.sandbox_mode`
    /// - `PARKWORKS_EDITOR` overrides `session.editor_mode`
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Io`] if the file cannot be read, or
    /// [`ConfigError::Yaml`] if the content is not valid YAML.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::parse(&contents)
    }

    /// Parse configuration from a YAML string, applying environment
    /// overrides.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Yaml`] if the string is not valid YAML.
    pub fn parse(yaml: &str) -> Result<Self, ConfigError> {
        let mut config: Self = if yaml.trim().is_empty() {
            Self::default()
        } else {
            serde_yml::from_str(yaml)?
        };
        config
            .session
            .apply_overrides(|key| std::env::var(key).ok());
        Ok(config)
    }
}

/// Session modes applied to every dispatched action.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionConfig {
    /// Start in the scenario editor.
    #[serde(default)]
    pub editor_mode: bool,

    /// Enable sandbox cheats (ownership checks off).
    #[serde(default)]
    pub sandbox_mode: bool,

    /// Start with the game paused.
    #[serde(default)]
    pub paused: bool,

    /// Player id stamped on every issued command.
    #[serde(default)]
    pub player_id: u32,
}

impl SessionConfig {
    /// Override session modes from an environment lookup.
    ///
    /// Accepts `1`/`true`/`yes`/`on` and `0`/`false`/`no`/`off`; other
    /// values are ignored.
    pub fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(value) = lookup(ENV_SANDBOX).as_deref().and_then(parse_switch) {
            self.sandbox_mode = value;
        }
        if let Some(value) = lookup(ENV_EDITOR).as_deref().and_then(parse_switch) {
            self.editor_mode = value;
        }
    }
}

/// Starting finances.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FinanceConfig {
    /// Opening cash in whole currency units.
    #[serde(default = "default_starting_cash")]
    pub starting_cash: i64,

    /// Run without money: nothing is charged and funds are never checked.
    #[serde(default)]
    pub no_money: bool,
}

impl FinanceConfig {
    /// Opening cash as [`Money`].
    pub const fn starting_money(&self) -> Money {
        Money(self.starting_cash.saturating_mul(Money::PRICE_SCALE))
    }
}

impl Default for FinanceConfig {
    fn default() -> Self {
        Self {
            starting_cash: default_starting_cash(),
            no_money: false,
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

fn parse_switch(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

const fn default_starting_cash() -> i64 {
    10_000
}

fn default_log_level() -> String {
    "info".to_owned()
}
