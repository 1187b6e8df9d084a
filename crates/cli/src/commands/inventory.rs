//! inventory command - Print inventory records as a table

use std::path::PathBuf;

use clap::Args;
use serde::Serialize;
use taskview_core::Defaults;

use super::{fail, load_inventory};
use crate::exit_code::ExitCode;
use crate::output::{Formatter, InventoryOptions, InventoryPrinter, OutputConfig};

/// Print inventory records as a table
#[derive(Args, Debug)]
pub struct InventoryArgs {
    /// Inventory JSON file with `hosts` and `groups` arrays, `-` for stdin
    pub file: PathBuf,

    /// Columns to show, comma separated
    #[arg(long, value_delimiter = ',', conflicts_with = "all")]
    pub columns: Option<Vec<String>>,

    /// Show every attribute found in the inventory
    #[arg(long)]
    pub all: bool,
}

/// JSON output for the inventory command
#[derive(Debug, Serialize)]
struct InventoryOutput {
    columns: Vec<String>,
    rows: Vec<Vec<String>>,
}

/// Execute the inventory command
pub fn execute(args: InventoryArgs, output_config: OutputConfig, defaults: &Defaults) -> ExitCode {
    let formatter = Formatter::new(output_config);

    let inventory = match load_inventory(&args.file) {
        Ok(inventory) => inventory,
        Err(e) => {
            return fail(
                &formatter,
                &format!("Failed to load {}", args.file.display()),
                &e,
            );
        }
    };

    let options = if args.all {
        InventoryOptions::all()
    } else {
        InventoryOptions::new(args.columns.unwrap_or_else(|| defaults.columns.clone()))
    };
    let printer = InventoryPrinter::new(options).with_colors(formatter.colors_enabled());
    if formatter.is_json() {
        formatter.json(&InventoryOutput {
            columns: printer.columns(&inventory),
            rows: printer.rows(&inventory),
        });
    } else {
        formatter.print(&printer.render(&inventory));
    }

    ExitCode::Success
}
