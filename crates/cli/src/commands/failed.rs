//! failed command - List hosts with failed tasks

use std::path::PathBuf;

use clap::Args;
use taskview_core::Defaults;

use super::{DisplayArgs, fail, load_result};
use crate::exit_code::ExitCode;
use crate::output::{FailedHostsPrinter, Formatter, OutputConfig, ResultPrinter};

/// List hosts with failed tasks
#[derive(Args, Debug)]
pub struct FailedArgs {
    /// Aggregated result JSON file, `-` for stdin
    pub file: PathBuf,

    /// Show every result entry of the failed hosts instead of task names
    #[arg(long)]
    pub details: bool,

    #[command(flatten)]
    pub display: DisplayArgs,
}

/// Execute the failed command
pub fn execute(args: FailedArgs, output_config: OutputConfig, defaults: &Defaults) -> ExitCode {
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

    let printer = FailedHostsPrinter::new(options.clone())
        .with_colors(formatter.colors_enabled())
        .detailed(args.details);
    if formatter.is_json() {
        if args.details {
            let results = ResultPrinter::new(options);
            let blocks: Vec<_> = result
                .failed_hosts()
                .flat_map(|host| results.host_blocks(host))
                .collect();
            formatter.json(&blocks);
        } else {
            formatter.json(&printer.failed_hosts(&result));
        }
    } else {
        formatter.print(&printer.render(&result));
    }

    ExitCode::for_run(result.failed())
}
