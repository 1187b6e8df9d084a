//! config command - Inspect or create the configuration file

use clap::{Args, Subcommand};
use taskview_core::{Config, ConfigManager, Error};

use super::fail;
use crate::exit_code::ExitCode;
use crate::output::{Formatter, OutputConfig};

/// Inspect or create the configuration file
#[derive(Args, Debug)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommands,
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Write a configuration file holding the default settings
    Init {
        /// Replace an existing file
        #[arg(long)]
        force: bool,
    },

    /// Print the effective configuration and where it is read from
    Show,
}

/// Execute the config command
pub fn execute(args: ConfigArgs, output_config: OutputConfig, manager: &ConfigManager) -> ExitCode {
    let formatter = Formatter::new(output_config);
    let path = manager.config_path().display().to_string();

    match args.command {
        ConfigCommands::Init { force } => {
            if manager.config_path().exists() && !force {
                let error = Error::Config(format!("{path} already exists, use --force to replace it"));
                return fail(&formatter, "Refusing to overwrite configuration", &error);
            }
            if let Err(e) = manager.save(&Config::default()) {
                return fail(&formatter, &format!("Failed to write {path}"), &e);
            }
            if formatter.is_json() {
                formatter.json(&serde_json::json!({ "path": path }));
            } else {
                formatter.success(&format!("Wrote default configuration to {path}"));
            }
            ExitCode::Success
        }
        ConfigCommands::Show => {
            let config = match manager.load() {
                Ok(config) => config,
                Err(e) => return fail(&formatter, &format!("Failed to load {path}"), &e),
            };
            if formatter.is_json() {
                formatter.json(&serde_json::json!({ "path": path, "config": config }));
                return ExitCode::Success;
            }
            match toml::to_string_pretty(&config) {
                Ok(content) => {
                    formatter.print(&format!("# {path}\n{content}"));
                    ExitCode::Success
                }
                Err(e) => fail(&formatter, "Failed to format configuration", &Error::from(e)),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use taskview_core::Severity;
    use tempfile::TempDir;

    fn quiet() -> OutputConfig {
        OutputConfig {
            quiet: true,
            ..Default::default()
        }
    }

    #[test]
    fn test_init_writes_loadable_defaults() {
        let temp_dir = TempDir::new().unwrap();
        let manager = ConfigManager::with_path(temp_dir.path().join("nested/config.toml"));
        let args = ConfigArgs {
            command: ConfigCommands::Init { force: false },
        };

        assert_eq!(execute(args, quiet(), &manager), ExitCode::Success);
        let config = manager.load().unwrap();
        assert_eq!(config.defaults.severity_level, Severity::INFO);
    }

    #[test]
    fn test_init_keeps_existing_file_without_force() {
        let temp_dir = TempDir::new().unwrap();
        let manager = ConfigManager::with_path(temp_dir.path().join("config.toml"));
        let existing = "schema_version = 1\n[defaults]\nseverity_level = \"error\"\n";
        std::fs::write(manager.config_path(), existing).unwrap();

        let args = ConfigArgs {
            command: ConfigCommands::Init { force: false },
        };
        assert_eq!(execute(args, quiet(), &manager), ExitCode::UsageError);
        assert_eq!(
            std::fs::read_to_string(manager.config_path()).unwrap(),
            existing
        );

        let args = ConfigArgs {
            command: ConfigCommands::Init { force: true },
        };
        assert_eq!(execute(args, quiet(), &manager), ExitCode::Success);
        assert_eq!(manager.load().unwrap().defaults.severity_level, Severity::INFO);
    }
}
