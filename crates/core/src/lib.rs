//! taskview-core: data model for the taskview presentation layer
//!
//! This crate provides the types the printers and the progress reporter read:
//! - Aggregated result trees with severity and status
//! - Inventory host and group records
//! - The `Processor` lifecycle trait a task runner calls into
//! - Display configuration loaded from TOML
//!
//! Nothing here executes tasks; a task runner produces these values and
//! hands them over for display.

pub mod config;
pub mod error;
pub mod inventory;
pub mod result;
pub mod traits;

pub use config::{Config, ConfigManager, Defaults};
pub use error::{Error, Result};
pub use inventory::{Inventory, InventoryRecord, RecordKind};
pub use result::{AggregatedResult, Attribute, HostResult, ResultNode, Severity, Status, TaskResult};
#[cfg(any(test, feature = "mock"))]
pub use traits::MockProcessor;
pub use traits::{Processor, TaskInfo};
