//! Configuration types for styleguard.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::PathBuf;

/// Top-level configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Preset to use (e.g., "recommended", "strict", "minimal").
    #[serde(default)]
    pub preset: Option<String>,

    /// Checker configuration.
    #[serde(default)]
    pub checker: CheckerConfig,

    /// Per-rule configurations.
    #[serde(default)]
    pub rules: HashMap<String, RuleConfig>,
}

impl Config {
    /// Creates a new default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn from_file(path: &std::path::Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;
        Self::parse(&content)
    }

    /// Parses configuration from a TOML string.
    ///
    /// # Errors
    ///
    /// Returns an error if the TOML is invalid.
    pub fn parse(content: &str) -> Result<Self, ConfigError> {
        toml::from_str(content).map_err(|e| ConfigError::Parse {
            message: e.to_string(),
        })
    }

    /// Checks if a rule is enabled.
    #[must_use]
    pub fn is_rule_enabled(&self, rule_name: &str) -> bool {
        self.rules
            .get(rule_name)
            .map_or(true, |c| c.enabled.unwrap_or(true))
    }

    /// Gets the severity override for a rule.
    #[must_use]
    pub fn rule_severity(&self, rule_name: &str) -> Option<crate::Severity> {
        self.rules.get(rule_name).and_then(|c| c.severity)
    }

    /// Rejects `[rules.*]` sections naming rules that are not
    /// registered; runs before any file is processed.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::UnknownRule`] for the first unknown name.
    pub fn validate(&self, known_rules: &[&str]) -> Result<(), ConfigError> {
        for name in self.rules.keys() {
            if !known_rules.contains(&name.as_str()) {
                return Err(ConfigError::UnknownRule { name: name.clone() });
            }
        }
        Ok(())
    }
}

/// Checker-level configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckerConfig {
    /// Root directory to check (default: current directory).
    #[serde(default = "default_root")]
    pub root: PathBuf,

    /// Glob patterns to exclude from checking.
    #[serde(default)]
    pub exclude: Vec<String>,

    /// File extensions to check.
    #[serde(default = "default_extensions")]
    pub extensions: Vec<String>,
}

impl Default for CheckerConfig {
    fn default() -> Self {
        Self {
            root: default_root(),
            exclude: vec![
                "**/vendor/**".to_string(),
                "**/node_modules/**".to_string(),
            ],
            extensions: default_extensions(),
        }
    }
}

fn default_root() -> PathBuf {
    PathBuf::from(".")
}

fn default_extensions() -> Vec<String> {
    vec!["php".to_string(), "inc".to_string()]
}

/// Per-rule configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RuleConfig {
    /// Whether this rule is enabled.
    #[serde(default)]
    pub enabled: Option<bool>,

    /// Severity override for this rule.
    #[serde(default)]
    pub severity: Option<crate::Severity>,

    /// Rule-specific options as key-value pairs.
    #[serde(flatten)]
    pub options: HashMap<String, toml::Value>,
}

impl RuleConfig {
    /// Gets an option value as a specific type.
    #[must_use]
    pub fn get_option<T: serde::de::DeserializeOwned>(&self, key: &str) -> Option<T> {
        self.options
            .get(key)
            .and_then(|v| v.clone().try_into().ok())
    }

    /// Gets a boolean option with a default value.
    #[must_use]
    pub fn get_bool(&self, key: &str, default: bool) -> bool {
        self.options
            .get(key)
            .and_then(toml::Value::as_bool)
            .unwrap_or(default)
    }

    /// Gets an integer option with a default value.
    #[must_use]
    pub fn get_int(&self, key: &str, default: i64) -> i64 {
        self.options
            .get(key)
            .and_then(toml::Value::as_integer)
            .unwrap_or(default)
    }

    /// Gets a string option with a default value.
    #[must_use]
    pub fn get_str<'a>(&'a self, key: &str, default: &'a str) -> &'a str {
        self.options
            .get(key)
            .and_then(|v| v.as_str())
            .unwrap_or(default)
    }

    /// Gets a non-negative integer option, rejecting bad values.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidOption`] when the option is present
    /// but not a non-negative integer.
    pub fn get_limit(&self, rule: &str, key: &str, default: usize) -> Result<usize, ConfigError> {
        match self.options.get(key) {
            None => Ok(default),
            Some(value) => value
                .as_integer()
                .and_then(|n| usize::try_from(n).ok())
                .ok_or_else(|| ConfigError::InvalidOption {
                    rule: rule.to_string(),
                    option: key.to_string(),
                    message: format!("expected a non-negative integer, found {value}"),
                }),
        }
    }
}

/// Configuration errors. All of them are fatal at startup.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// IO error reading config file.
    #[error("Failed to read config file {path}: {source}")]
    Io {
        /// Path that failed to read.
        path: PathBuf,
        /// Underlying IO error.
        source: std::io::Error,
    },

    /// Parse error in config file.
    #[error("Failed to parse config: {message}")]
    Parse {
        /// Parse error message.
        message: String,
    },

    /// A `[rules.*]` section names a rule that is not registered.
    #[error("Unknown rule in configuration: {name}")]
    UnknownRule {
        /// The unrecognized rule name.
        name: String,
    },

    /// A rule option has an unusable value.
    #[error("Invalid option '{option}' for rule '{rule}': {message}")]
    InvalidOption {
        /// Rule the option belongs to.
        rule: String,
        /// Option key.
        option: String,
        /// What was wrong with it.
        message: String,
    },
}
