//! Configuration types for gadgets.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::PathBuf;

/// Top-level configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Analyzer configuration.
    #[serde(default)]
    pub analyzer: AnalyzerConfig,

    /// Telemetry configuration.
    #[serde(default)]
    pub telemetry: TelemetryConfig,

    /// Per-rule configurations, keyed by short name or id.
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

    /// Section for a rule, looked up by short name first, then by id.
    #[must_use]
    pub fn rule_config(&self, short_name: &str, id: &str) -> Option<&RuleConfig> {
        self.rules.get(short_name).or_else(|| self.rules.get(id))
    }

    /// Explicit enabled flag for a rule, if configured.
    #[must_use]
    pub fn rule_enabled(&self, short_name: &str, id: &str) -> Option<bool> {
        self.rule_config(short_name, id).and_then(|c| c.enabled)
    }

    /// Gets the severity override for a rule.
    #[must_use]
    pub fn rule_severity(&self, short_name: &str, id: &str) -> Option<crate::Severity> {
        self.rule_config(short_name, id).and_then(|c| c.severity)
    }

    /// Explicitly enables a rule.
    pub fn enable(&mut self, name: &str) {
        self.rules.entry(name.to_string()).or_default().enabled = Some(true);
    }

    /// Explicitly disables a rule.
    pub fn disable(&mut self, name: &str) {
        self.rules.entry(name.to_string()).or_default().enabled = Some(false);
    }
}

/// Analyzer-level configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalyzerConfig {
    /// Run as an interactive session (interactive-only fixes are attached).
    #[serde(default)]
    pub interactive: bool,

    /// Glob patterns to exclude from analysis.
    #[serde(default)]
    pub exclude: Vec<String>,

    /// Whether to respect .gitignore files.
    #[serde(default = "default_true")]
    pub respect_gitignore: bool,

    /// Maximum number of parallel file analyses.
    #[serde(default)]
    pub parallelism: Option<usize>,
}

impl Default for AnalyzerConfig {
    fn default() -> Self {
        Self {
            interactive: false,
            exclude: vec!["**/target/**".to_string(), "**/build/**".to_string()],
            respect_gitignore: true,
            parallelism: None,
        }
    }
}

fn default_true() -> bool {
    true
}

/// Telemetry configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TelemetryConfig {
    /// Record per-inspection timings.
    #[serde(default)]
    pub enabled: bool,
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
    /// Raw option value.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&toml::Value> {
        self.options.get(key)
    }

    /// Sets an option value.
    #[must_use]
    pub fn with_option(mut self, key: &str, value: impl Into<toml::Value>) -> Self {
        self.options.insert(key.to_string(), value.into());
        self
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
}

/// Configuration errors.
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
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Severity;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert!(config.analyzer.respect_gitignore);
        assert!(!config.analyzer.interactive);
        assert!(!config.telemetry.enabled);
        assert!(config.rules.is_empty());
    }

    #[test]
    fn test_parse_config() {
        let toml = r#"
[analyzer]
interactive = true
exclude = ["**/generated/**"]

[telemetry]
enabled = true

[rules.AnonymousClassMethodCount]
enabled = true
severity = "error"
limit = 2

[rules.MethodWithMultipleReturnPoints]
limit = 3
"#;

        let config = Config::parse(toml).expect("Failed to parse");
        assert!(config.analyzer.interactive);
        assert!(config.telemetry.enabled);
        assert_eq!(
            config.rule_enabled("AnonymousClassMethodCount", "AnonymousInnerClassWithTooManyMethods"),
            Some(true)
        );
        assert_eq!(
            config.rule_severity("AnonymousClassMethodCount", "x"),
            Some(Severity::Error)
        );

        let by_id = config
            .rule_config("MultipleReturnPointsPerMethod", "MethodWithMultipleReturnPoints")
            .unwrap();
        assert_eq!(by_id.get_int("limit", 1), 3);
        assert_eq!(by_id.enabled, None);
    }

    #[test]
    fn test_parse_error() {
        let err = Config::parse("[rules.A\nenabled = ").unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
    }

    #[test]
    fn test_enable_and_disable() {
        let mut config = Config::new();
        config.enable("TodoComment");
        assert_eq!(config.rule_enabled("TodoComment", "TodoComment"), Some(true));
        config.disable("TodoComment");
        assert_eq!(config.rule_enabled("TodoComment", "TodoComment"), Some(false));
    }
}
