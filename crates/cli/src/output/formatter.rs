//! Output formatter for human-readable and JSON output
//!
//! Decides where rendered text goes and whether it is colored. Commands
//! hand rendered blocks or tables to the formatter instead of printing
//! directly.

use console::Style;
use serde::Serialize;

use super::OutputConfig;

/// Formatter for CLI output
///
/// Handles both human-readable and JSON output formats based on configuration.
/// When JSON mode is enabled, all output is strict JSON without colors or progress.
#[derive(Debug, Clone)]
pub struct Formatter {
    config: OutputConfig,
}

impl Formatter {
    /// Create a new formatter with the given configuration
    pub fn new(config: OutputConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &OutputConfig {
        &self.config
    }

    /// Check if JSON output mode is enabled
    pub fn is_json(&self) -> bool {
        self.config.json
    }

    /// Check if quiet mode is enabled
    pub fn is_quiet(&self) -> bool {
        self.config.quiet
    }

    /// Check if colors are enabled
    pub fn colors_enabled(&self) -> bool {
        !self.config.no_color && !self.config.json
    }

    /// Apply this formatter's color setting to a style
    pub fn style(&self, style: Style) -> Style {
        style.force_styling(self.colors_enabled())
    }

    /// Output a success message
    pub fn success(&self, message: &str) {
        if self.is_quiet() || self.is_json() {
            return;
        }
        println!("{} {message}", self.style(Style::new().green()).apply_to("✓"));
    }

    /// Output an error message
    ///
    /// Errors are always printed, even in quiet mode.
    pub fn error(&self, message: &str) {
        if self.config.json {
            let error = serde_json::json!({
                "error": message
            });
            eprintln!(
                "{}",
                serde_json::to_string_pretty(&error).unwrap_or_else(|_| message.to_string())
            );
        } else {
            let cross = self
                .style(Style::new().red().for_stderr())
                .apply_to("✗");
            eprintln!("{cross} {message}");
        }
    }

    /// Output a warning message
    pub fn warning(&self, message: &str) {
        if self.is_quiet() || self.is_json() {
            return;
        }
        let sign = self
            .style(Style::new().yellow().for_stderr())
            .apply_to("⚠");
        eprintln!("{sign} {message}");
    }

    /// Output JSON directly
    pub fn json<T: Serialize>(&self, value: &T) {
        if self.is_quiet() {
            return;
        }
        match serde_json::to_string_pretty(value) {
            Ok(json) => println!("{json}"),
            Err(e) => eprintln!("Error serializing output: {e}"),
        }
    }

    /// Print rendered text as-is (respects quiet mode)
    pub fn print(&self, rendered: &str) {
        if self.is_quiet() || rendered.is_empty() {
            return;
        }
        print!("{rendered}");
    }
}

impl Default for Formatter {
    fn default() -> Self {
        Self::new(OutputConfig::default())
    }
}
