//! Failed-hosts printer
//!
//! Lists hosts with at least one failed entry, host name first and the
//! failing task names aligned beneath it:
//!
//! ```text
//! r1: fail_task
//!     other_task
//! ```

use std::io::{self, Write};

use console::Style;
use serde::Serialize;
use taskview_core::AggregatedResult;

use super::results::{ResultOptions, ResultPrinter};

/// A host and the names of its failed entries, nested ones included
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FailedHost {
    pub host: String,
    pub tasks: Vec<String>,
}

/// Renders the failed hosts of an aggregated result
#[derive(Debug, Clone)]
pub struct FailedHostsPrinter {
    results: ResultPrinter,
    colors: bool,
    detailed: bool,
}

impl FailedHostsPrinter {
    pub fn new(options: ResultOptions) -> Self {
        Self {
            results: ResultPrinter::new(options),
            colors: false,
            detailed: false,
        }
    }

    pub fn with_colors(mut self, colors: bool) -> Self {
        self.colors = colors;
        self.results = self.results.with_colors(colors);
        self
    }

    /// Render every result block of a failed host instead of a listing
    pub fn detailed(mut self, detailed: bool) -> Self {
        self.detailed = detailed;
        self
    }

    pub fn failed_hosts(&self, result: &AggregatedResult) -> Vec<FailedHost> {
        result
            .failed_hosts()
            .map(|host| FailedHost {
                host: host.host.clone(),
                tasks: host
                    .failed_tasks()
                    .into_iter()
                    .map(|task| task.name.clone())
                    .collect(),
            })
            .collect()
    }

    pub fn render(&self, result: &AggregatedResult) -> String {
        if self.detailed {
            return self.render_detailed(result);
        }

        let host_style = Style::new().red().bold().force_styling(self.colors);
        let mut out = String::new();
        for failed in self.failed_hosts(result) {
            let label = format!("{}:", failed.host);
            let width = console::measure_text_width(&label);
            for (i, task) in failed.tasks.iter().enumerate() {
                if i == 0 {
                    out.push_str(&format!("{} {task}\n", host_style.apply_to(&label)));
                } else {
                    out.push_str(&format!("{:width$} {task}\n", ""));
                }
            }
        }
        out
    }

    fn render_detailed(&self, result: &AggregatedResult) -> String {
        result
            .failed_hosts()
            .flat_map(|host| self.results.host_blocks(host))
            .map(|block| block.render(self.colors))
            .collect()
    }

    /// Write the rendered listing to `out`; nothing when no host failed
    pub fn print<W: Write>(&self, out: &mut W, result: &AggregatedResult) -> io::Result<()> {
        let rendered = self.render(result);
        if rendered.is_empty() {
            return Ok(());
        }
        out.write_all(rendered.as_bytes())?;
        out.flush()
    }
}
