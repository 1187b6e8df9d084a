//! replay command - Drive the progress display from a recorded result

use std::path::PathBuf;
use std::time::Duration;

use clap::Args;
use taskview_core::Defaults;

use super::{DisplayArgs, fail, load_result};
use crate::exit_code::ExitCode;
use crate::output::{Formatter, OutputConfig, ProgressReporter, ResultPrinter};

/// Replay a recorded result through the live progress display
#[derive(Args, Debug)]
pub struct ReplayArgs {
    /// Aggregated result JSON file, `-` for stdin
    pub file: PathBuf,

    /// Pause after each host, in milliseconds
    #[arg(long, default_value = "100")]
    pub pace_ms: u64,

    /// Print the results once the replay finishes
    #[arg(long)]
    pub print: bool,

    #[command(flatten)]
    pub display: DisplayArgs,
}

/// Execute the replay command
pub async fn execute(args: ReplayArgs, output_config: OutputConfig, defaults: &Defaults) -> ExitCode {
    let formatter = Formatter::new(output_config);

    let options = match args.display.options(defaults) {
        Ok(options) => options,
        Err(e) => return fail(&formatter, "Invalid display options", &e),
    };
    let result = match load_result(&args.file) {
        Ok(result) => result,
        Err(e) => {
            return fail(
                &formatter,
                &format!("Failed to load {}", args.file.display()),
                &e,
            );
        }
    };

    let reporter = ProgressReporter::new(formatter.config());
    crate::replay::replay(&result, &reporter, Duration::from_millis(args.pace_ms)).await;

    let snapshot = reporter.snapshot();
    if formatter.is_json() && !args.print {
        formatter.json(&serde_json::json!({
            "total": snapshot.total,
            "completed": snapshot.completed,
            "failed": snapshot.failed,
            "changed": snapshot.changed,
        }));
    }

    if args.print {
        let printer = ResultPrinter::new(options).with_colors(formatter.colors_enabled());
        if formatter.is_json() {
            formatter.json(&printer.blocks(&result));
        } else {
            formatter.print(&printer.render(&result));
        }
    } else if !formatter.is_json() {
        formatter.success(&format!(
            "{} hosts: {} ok, {} failed, {} changed",
            snapshot.finished_units(),
            snapshot.completed,
            snapshot.failed,
            snapshot.changed
        ));
    }

    ExitCode::for_run(snapshot.failed > 0)
}
