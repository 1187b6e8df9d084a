//! CLI command definitions and execution
//!
//! Every command loads a JSON dump written by the task runner, renders it
//! through the `output` printers and maps the outcome to an exit code.

use std::io::Read;
use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use taskview_core::{
    AggregatedResult, Attribute, ConfigManager, Defaults, Error, Inventory, Severity,
};

use crate::exit_code::ExitCode;
use crate::output::{Formatter, OutputConfig, ResultOptions};

pub mod completions;
mod config;
mod failed;
mod inventory;
mod replay;
mod results;

/// taskview - render task-runner results in the terminal
///
/// Pretty-prints aggregated results, failed hosts and inventories dumped
/// as JSON by a network-automation task runner.
#[derive(Parser, Debug)]
#[command(name = "taskview")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Output format: human-readable or JSON
    #[arg(long, global = true, default_value = "false")]
    pub json: bool,

    /// Disable colored output
    #[arg(long, global = true, default_value = "false")]
    pub no_color: bool,

    /// Disable progress bar
    #[arg(long, global = true, default_value = "false")]
    pub no_progress: bool,

    /// Suppress non-error output
    #[arg(short, long, global = true, default_value = "false")]
    pub quiet: bool,

    /// Enable debug logging
    #[arg(long, global = true, default_value = "false")]
    pub debug: bool,

    /// Configuration file to use instead of the default location
    #[arg(long, global = true, env = "TASKVIEW_CONFIG")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Print every entry of a recorded result
    Results(results::ResultsArgs),

    /// List hosts with failed tasks
    Failed(failed::FailedArgs),

    /// Print inventory records as a table
    Inventory(inventory::InventoryArgs),

    /// Replay a recorded result through the live progress display
    Replay(replay::ReplayArgs),

    /// Inspect or create the configuration file
    Config(config::ConfigArgs),

    /// Generate shell completions
    Completions(completions::CompletionsArgs),
}

/// Result display flags shared by `results`, `failed` and `replay`
#[derive(clap::Args, Debug, Default)]
pub struct DisplayArgs {
    /// Attributes to show, comma separated (result,diff,exception,severity_level,name,host,changed,failed)
    #[arg(long, value_delimiter = ',')]
    pub vars: Option<Vec<String>>,

    /// Hide entries below this level (debug, info, warning, error, critical or a number)
    #[arg(long)]
    pub severity: Option<String>,
}

impl DisplayArgs {
    /// Merge flags over configured defaults
    pub fn options(&self, defaults: &Defaults) -> taskview_core::Result<ResultOptions> {
        let vars = match &self.vars {
            Some(vars) => vars
                .iter()
                .map(|v| v.parse::<Attribute>())
                .collect::<taskview_core::Result<Vec<_>>>()?,
            None => defaults.vars.clone(),
        };
        let severity_level = match &self.severity {
            Some(level) => level.parse::<Severity>()?,
            None => defaults.severity_level,
        };
        Ok(ResultOptions {
            vars,
            severity_level,
        })
    }
}

/// Read a file, or stdin when the path is `-`
fn read_input(path: &Path) -> taskview_core::Result<String> {
    if path == Path::new("-") {
        let mut buf = String::new();
        std::io::stdin().read_to_string(&mut buf)?;
        return Ok(buf);
    }
    Ok(std::fs::read_to_string(path)?)
}

pub(crate) fn load_result(path: &Path) -> taskview_core::Result<AggregatedResult> {
    tracing::debug!(path = %path.display(), "loading aggregated result");
    AggregatedResult::from_json(&read_input(path)?)
}

pub(crate) fn load_inventory(path: &Path) -> taskview_core::Result<Inventory> {
    tracing::debug!(path = %path.display(), "loading inventory");
    Inventory::from_json(&read_input(path)?)
}

/// Report an error through the formatter and turn it into an exit code
pub(crate) fn fail(formatter: &Formatter, context: &str, error: &Error) -> ExitCode {
    formatter.error(&format!("{context}: {error}"));
    ExitCode::from_i32(error.exit_code()).unwrap_or(ExitCode::GeneralError)
}

fn config_manager(path: Option<&PathBuf>) -> taskview_core::Result<ConfigManager> {
    match path {
        Some(path) => Ok(ConfigManager::with_path(path.clone())),
        None => ConfigManager::new(),
    }
}

/// Execute the CLI command and return an exit code
pub async fn execute(cli: Cli) -> ExitCode {
    let command = match cli.command {
        Commands::Completions(args) => return completions::execute(args),
        command => command,
    };

    // Used until the configuration file has been read
    let flags = OutputConfig {
        json: cli.json,
        no_color: cli.no_color,
        no_progress: cli.no_progress,
        quiet: cli.quiet,
    };
    let manager = match config_manager(cli.config.as_ref()) {
        Ok(manager) => manager,
        Err(e) => return fail(&Formatter::new(flags), "Failed to locate configuration", &e),
    };

    // `config` must work even when the current file does not parse
    let command = match command {
        Commands::Config(args) => {
            flags.apply_to_terminal();
            return config::execute(args, flags, &manager);
        }
        command => command,
    };

    let defaults = match manager.load() {
        Ok(config) => config.defaults,
        Err(e) => return fail(&Formatter::new(flags), "Failed to load configuration", &e),
    };

    let color = match defaults.color_enabled(console::colors_enabled()) {
        Ok(color) => color,
        Err(e) => {
            Formatter::new(flags)
                .warning(&format!("{e}, falling back to terminal detection"));
            console::colors_enabled()
        }
    };
    let output_config = OutputConfig {
        no_color: flags.no_color || !color,
        no_progress: flags.no_progress || !defaults.progress,
        ..flags
    };
    output_config.apply_to_terminal();

    match command {
        Commands::Results(args) => results::execute(args, output_config, &defaults),
        Commands::Failed(args) => failed::execute(args, output_config, &defaults),
        Commands::Inventory(args) => inventory::execute(args, output_config, &defaults),
        Commands::Replay(args) => replay::execute(args, output_config, &defaults).await,
        Commands::Config(args) => config::execute(args, output_config, &manager),
        Commands::Completions(args) => completions::execute(args),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_display_args_override_defaults() {
        let args = DisplayArgs {
            vars: Some(vec!["exception".into(), "diff".into()]),
            severity: Some("warning".into()),
        };
        let options = args.options(&Defaults::default()).unwrap();
        assert_eq!(options.vars, vec![Attribute::Exception, Attribute::Diff]);
        assert_eq!(options.severity_level, Severity::WARNING);
    }

    #[test]
    fn test_display_args_fall_back_to_defaults() {
        let options = DisplayArgs::default()
            .options(&Defaults::default())
            .unwrap();
        assert_eq!(options, ResultOptions::default());
    }

    #[test]
    fn test_display_args_reject_unknown_attribute() {
        let args = DisplayArgs {
            vars: Some(vec!["stdout".into()]),
            severity: None,
        };
        assert!(matches!(
            args.options(&Defaults::default()),
            Err(Error::InvalidAttribute(_))
        ));
    }

    #[test]
    fn test_parse_results_command() {
        let cli = Cli::try_parse_from([
            "taskview",
            "results",
            "run.json",
            "--vars",
            "result,diff",
            "--severity",
            "debug",
            "--no-color",
        ])
        .unwrap();
        assert!(cli.no_color);
        match cli.command {
            Commands::Results(args) => {
                assert_eq!(args.file, PathBuf::from("run.json"));
                assert_eq!(
                    args.display.vars,
                    Some(vec!["result".to_string(), "diff".to_string()])
                );
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn test_load_result_missing_file() {
        let err = load_result(Path::new("/definitely/not/here.json")).unwrap_err();
        assert_eq!(err.exit_code(), 3);
    }
}
