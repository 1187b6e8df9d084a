//! Output formatting utilities
//!
//! Printers for aggregated results, failed hosts and inventories, plus the
//! live progress reporter a task runner drives while a run is in flight.
//! Printers write to any `io::Write`; the `print_*` functions below target
//! stdout and hold its lock for the whole rendering so concurrent callers
//! never interleave.

mod failed;
mod formatter;
mod inventory;
mod progress;
mod results;

use std::io;

use taskview_core::{AggregatedResult, Inventory};

pub use failed::{FailedHost, FailedHostsPrinter};
pub use formatter::Formatter;
pub use inventory::{InventoryOptions, InventoryPrinter};
pub use progress::{HostProgress, ProgressReporter, ProgressState, RunState};
pub use results::{Block, BlockField, BlockStyle, ResultOptions, ResultPrinter};

/// Output configuration derived from CLI flags
#[derive(Debug, Clone, Copy, Default)]
pub struct OutputConfig {
    /// Use JSON output format
    pub json: bool,
    /// Disable colored output
    pub no_color: bool,
    /// Disable progress bar
    pub no_progress: bool,
    /// Suppress non-error output
    pub quiet: bool,
}

impl OutputConfig {
    /// Switch off console's global color detection when colors are disabled
    ///
    /// Printers take an explicit color flag, but the progress display and
    /// stderr messages style through console's process-wide switches.
    pub fn apply_to_terminal(&self) {
        if self.no_color || self.json {
            console::set_colors_enabled(false);
            console::set_colors_enabled_stderr(false);
        }
    }
}

/// Print every entry of an aggregated result to stdout
pub fn print_result(result: &AggregatedResult, options: &ResultOptions) -> io::Result<()> {
    let printer = ResultPrinter::new(options.clone()).with_colors(console::colors_enabled());
    printer.print(&mut io::stdout().lock(), result)
}

/// Print the hosts that failed and their failing tasks to stdout
pub fn print_failed_hosts(result: &AggregatedResult, options: &ResultOptions) -> io::Result<()> {
    let printer = FailedHostsPrinter::new(options.clone()).with_colors(console::colors_enabled());
    printer.print(&mut io::stdout().lock(), result)
}

/// Print inventory records as a table to stdout
pub fn print_inventory(inventory: &Inventory, options: &InventoryOptions) -> io::Result<()> {
    let printer = InventoryPrinter::new(options.clone()).with_colors(console::colors_enabled());
    printer.print(&mut io::stdout().lock(), inventory)
}
