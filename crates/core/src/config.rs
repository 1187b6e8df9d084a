//! Configuration management
//!
//! Display defaults live in a TOML file at
//! `$TASKVIEW_CONFIG_DIR/config.toml`, or `~/.config/taskview/config.toml`
//! when the variable is unset. Command-line flags override these values.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::result::{Attribute, Severity};

/// Current configuration schema version
pub const SCHEMA_VERSION: u32 = 1;

/// Environment variable overriding the configuration directory
pub const CONFIG_DIR_ENV: &str = "TASKVIEW_CONFIG_DIR";

/// Default color setting
const DEFAULT_COLOR: &str = "auto";

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Schema version for migration support
    pub schema_version: u32,

    /// Default settings
    #[serde(default)]
    pub defaults: Defaults,
}

/// Default display settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Defaults {
    /// Color mode: "auto", "always", or "never"
    #[serde(default = "default_color")]
    pub color: String,

    /// Show the live progress display
    #[serde(default = "default_true")]
    pub progress: bool,

    /// Hide result entries below this level
    #[serde(default)]
    pub severity_level: Severity,

    /// Result attributes to display
    #[serde(default = "default_vars")]
    pub vars: Vec<Attribute>,

    /// Inventory columns; an empty list shows every attribute
    #[serde(default = "default_columns")]
    pub columns: Vec<String>,
}

fn default_color() -> String {
    DEFAULT_COLOR.to_string()
}

fn default_true() -> bool {
    true
}

fn default_vars() -> Vec<Attribute> {
    Attribute::DEFAULTS.to_vec()
}

/// Inventory columns shown when none are configured
pub fn default_columns() -> Vec<String> {
    ["name", "hostname", "platform", "groups"]
        .into_iter()
        .map(String::from)
        .collect()
}

impl Default for Defaults {
    fn default() -> Self {
        Self {
            color: default_color(),
            progress: true,
            severity_level: Severity::default(),
            vars: default_vars(),
            columns: default_columns(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            schema_version: SCHEMA_VERSION,
            defaults: Defaults::default(),
        }
    }
}

impl Defaults {
    /// Resolve the color mode against terminal detection
    pub fn color_enabled(&self, is_terminal: bool) -> Result<bool> {
        match self.color.as_str() {
            "always" => Ok(true),
            "never" => Ok(false),
            "auto" => Ok(is_terminal),
            other => Err(Error::Config(format!(
                "Unknown color mode '{other}', expected auto, always or never"
            ))),
        }
    }
}

/// Configuration manager handles loading and saving config
#[derive(Debug)]
pub struct ConfigManager {
    config_path: PathBuf,
}

impl ConfigManager {
    /// Create a new ConfigManager with the default config path
    pub fn new() -> Result<Self> {
        let config_dir = match std::env::var_os(CONFIG_DIR_ENV) {
            Some(dir) => PathBuf::from(dir),
            None => dirs::config_dir()
                .ok_or_else(|| Error::Config("Could not determine config directory".into()))?
                .join("taskview"),
        };
        Ok(Self {
            config_path: config_dir.join("config.toml"),
        })
    }

    /// Create a ConfigManager with a custom path (useful for testing)
    pub fn with_path(path: PathBuf) -> Self {
        Self { config_path: path }
    }

    /// Get the configuration file path
    pub fn config_path(&self) -> &PathBuf {
        &self.config_path
    }

    /// Load configuration from disk
    ///
    /// If the configuration file doesn't exist, returns a default configuration.
    pub fn load(&self) -> Result<Config> {
        if !self.config_path.exists() {
            tracing::debug!(path = %self.config_path.display(), "no config file, using defaults");
            return Ok(Config::default());
        }

        let content = std::fs::read_to_string(&self.config_path)?;
        let mut config: Config = toml::from_str(&content)?;

        if config.schema_version > SCHEMA_VERSION {
            return Err(Error::Config(format!(
                "Configuration file version {} is newer than supported version {}. Please upgrade taskview.",
                config.schema_version, SCHEMA_VERSION
            )));
        }
        config.schema_version = SCHEMA_VERSION;

        Ok(config)
    }

    /// Save configuration to disk
    ///
    /// Creates parent directories if they don't exist.
    pub fn save(&self, config: &Config) -> Result<()> {
        if let Some(parent) = self.config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = toml::to_string_pretty(config)?;
        std::fs::write(&self.config_path, content)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn temp_config_manager() -> (ConfigManager, TempDir) {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("config.toml");
        let manager = ConfigManager::with_path(config_path);
        (manager, temp_dir)
    }

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.schema_version, SCHEMA_VERSION);
        assert_eq!(config.defaults.color, "auto");
        assert!(config.defaults.progress);
        assert_eq!(config.defaults.severity_level, Severity::INFO);
        assert_eq!(config.defaults.vars, Attribute::DEFAULTS.to_vec());
        assert_eq!(config.defaults.columns[0], "name");
    }

    #[test]
    fn test_load_nonexistent_returns_default() {
        let (manager, _temp_dir) = temp_config_manager();
        let config = manager.load().unwrap();
        assert_eq!(config.schema_version, SCHEMA_VERSION);
    }

    #[test]
    fn test_save_and_load() {
        let (manager, _temp_dir) = temp_config_manager();

        let mut config = Config::default();
        config.defaults.severity_level = Severity::WARNING;
        config.defaults.vars = vec![Attribute::Exception];

        manager.save(&config).unwrap();
        let loaded = manager.load().unwrap();

        assert_eq!(loaded.defaults.severity_level, Severity::WARNING);
        assert_eq!(loaded.defaults.vars, vec![Attribute::Exception]);
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let (manager, _temp_dir) = temp_config_manager();
        std::fs::write(
            manager.config_path(),
            "schema_version = 1\n[defaults]\nseverity_level = \"debug\"\ncolumns = [\"site\"]\n",
        )
        .unwrap();

        let config = manager.load().unwrap();
        assert_eq!(config.defaults.severity_level, Severity::DEBUG);
        assert_eq!(config.defaults.columns, vec!["site".to_string()]);
        assert_eq!(config.defaults.vars, Attribute::DEFAULTS.to_vec());
        assert!(config.defaults.progress);
    }

    #[test]
    fn test_schema_version_too_new() {
        let (manager, _temp_dir) = temp_config_manager();

        let content = format!(
            r#"
            schema_version = {}
            "#,
            SCHEMA_VERSION + 1
        );
        std::fs::write(manager.config_path(), content).unwrap();

        let result = manager.load();
        assert!(result.is_err());
        assert!(
            result
                .unwrap_err()
                .to_string()
                .contains("newer than supported")
        );
    }

    #[test]
    fn test_color_mode() {
        let mut defaults = Defaults::default();
        assert!(defaults.color_enabled(true).unwrap());
        assert!(!defaults.color_enabled(false).unwrap());
        defaults.color = "always".into();
        assert!(defaults.color_enabled(false).unwrap());
        defaults.color = "rainbow".into();
        assert!(defaults.color_enabled(true).is_err());
    }
}
