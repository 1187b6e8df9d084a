//! results command - Print every entry of a recorded result

use std::path::PathBuf;

use clap::Args;
use taskview_core::Defaults;

use super::{DisplayArgs, fail, load_result};
use crate::exit_code::ExitCode;
use crate::output::{Formatter, OutputConfig, ResultPrinter};

/// Print every entry of a recorded result
#[derive(Args, Debug)]
pub struct ResultsArgs {
    /// Aggregated result JSON file, `-` for stdin
    pub file: PathBuf,

    #[command(flatten)]
    pub display: DisplayArgs,
}

/// Execute the results command
pub fn execute(args: ResultsArgs, output_config: OutputConfig, defaults: &Defaults) -> ExitCode {
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

    let printer = ResultPrinter::new(options).with_colors(formatter.colors_enabled());
    if formatter.is_json() {
        formatter.json(&printer.blocks(&result));
    } else {
        formatter.print(&printer.render(&result));
    }

    ExitCode::for_run(result.failed())
}
