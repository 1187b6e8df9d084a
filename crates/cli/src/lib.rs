//! taskview: terminal presentation for task-runner results
//!
//! Printers for aggregated results, failed hosts and inventories, and a
//! progress reporter to register with the runner before a run. The
//! `commands` module wraps them in the `taskview` binary.

pub mod commands;
pub mod exit_code;
pub mod output;
pub mod replay;

pub use output::{
    FailedHostsPrinter, InventoryOptions, InventoryPrinter, ProgressReporter, ResultOptions,
    ResultPrinter, print_failed_hosts, print_inventory, print_result,
};
