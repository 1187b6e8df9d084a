//! Result printer
//!
//! Turns an aggregated result into one block per task entry: a header with
//! status glyph, host and task name, then the selected attributes aligned
//! on `=`. Nested subtasks are indented beneath their parent.

use std::io::{self, Write};

use console::Style;
use serde::Serialize;
use taskview_core::{AggregatedResult, Attribute, HostResult, Severity, Status, TaskResult};

/// Which entries and attributes the result printer shows
#[derive(Debug, Clone, PartialEq)]
pub struct ResultOptions {
    /// Attributes to render, in this order
    pub vars: Vec<Attribute>,
    /// Entries below this level are omitted
    pub severity_level: Severity,
}

impl Default for ResultOptions {
    fn default() -> Self {
        Self {
            vars: Attribute::DEFAULTS.to_vec(),
            severity_level: Severity::INFO,
        }
    }
}

impl ResultOptions {
    pub fn with_vars(mut self, vars: Vec<Attribute>) -> Self {
        self.vars = vars;
        self
    }

    pub fn with_severity_level(mut self, severity_level: Severity) -> Self {
        self.severity_level = severity_level;
        self
    }
}

/// Visual category of a block
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum BlockStyle {
    Ok,
    Changed,
    Failed,
    Skipped,
}

impl BlockStyle {
    /// Failure outranks a change
    pub fn of(result: &TaskResult) -> Self {
        match result.status {
            Status::Failed => BlockStyle::Failed,
            Status::Skipped => BlockStyle::Skipped,
            Status::Success if result.changed => BlockStyle::Changed,
            Status::Success => BlockStyle::Ok,
        }
    }

    pub const fn glyph(self) -> &'static str {
        match self {
            BlockStyle::Ok => "✓",
            BlockStyle::Changed => "✎",
            BlockStyle::Failed => "✗",
            BlockStyle::Skipped => "⊘",
        }
    }

    pub fn style(self) -> Style {
        match self {
            BlockStyle::Ok => Style::new().green(),
            BlockStyle::Changed => Style::new().yellow(),
            BlockStyle::Failed => Style::new().red().bold(),
            BlockStyle::Skipped => Style::new().dim(),
        }
    }
}

/// One rendered attribute of a block
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BlockField {
    pub attribute: Attribute,
    pub value: String,
}

/// Render model of one task entry
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Block {
    pub host: String,
    pub task: String,
    /// Nesting depth, 0 for top-level entries
    pub depth: usize,
    pub style: BlockStyle,
    pub fields: Vec<BlockField>,
}

const INDENT: &str = "  ";

impl Block {
    /// Render the block as text, one line per header or value line
    pub fn render(&self, colors: bool) -> String {
        let pad = INDENT.repeat(self.depth);
        let style = self.style.style().force_styling(colors);
        let mut out = format!(
            "{pad}{}\n",
            style.apply_to(format!("{} {} | {}", self.style.glyph(), self.host, self.task))
        );

        let width = self
            .fields
            .iter()
            .map(|f| f.attribute.as_str().len())
            .max()
            .unwrap_or(0);
        let key_style = Style::new().cyan().force_styling(colors);
        for field in &self.fields {
            let mut lines = field.value.lines();
            let first = lines.next().unwrap_or_default();
            let key = format!("{:>width$}", field.attribute.as_str());
            out.push_str(&format!(
                "{pad}{INDENT}{} = {first}\n",
                key_style.apply_to(key)
            ));
            for line in lines {
                out.push_str(&format!("{pad}{INDENT}{:width$}   {line}\n", ""));
            }
        }
        out
    }
}

/// Renders aggregated results as styled blocks
#[derive(Debug, Clone)]
pub struct ResultPrinter {
    options: ResultOptions,
    colors: bool,
}

impl ResultPrinter {
    pub fn new(options: ResultOptions) -> Self {
        Self {
            options,
            colors: false,
        }
    }

    pub fn with_colors(mut self, colors: bool) -> Self {
        self.colors = colors;
        self
    }

    pub fn options(&self) -> &ResultOptions {
        &self.options
    }

    /// Blocks for every visible entry, hosts then tasks in input order
    pub fn blocks(&self, result: &AggregatedResult) -> Vec<Block> {
        result
            .hosts
            .iter()
            .flat_map(|host| self.host_blocks(host))
            .collect()
    }

    /// Blocks for the visible entries of one host
    ///
    /// A block is indented once per visible ancestor, so an entry whose
    /// parent is filtered out moves up to the parent's level.
    pub fn host_blocks(&self, host: &HostResult) -> Vec<Block> {
        // visibility of the ancestors of the current entry, by depth
        let mut ancestors: Vec<bool> = Vec::new();
        let mut blocks = Vec::new();
        for (depth, entry) in host.walk() {
            ancestors.truncate(depth);
            let visible = entry.severity_level >= self.options.severity_level;
            if visible {
                let shown_depth = ancestors.iter().filter(|&&shown| shown).count();
                blocks.push(self.block(&host.host, shown_depth, entry));
            } else {
                tracing::debug!(
                    host = %host.host,
                    task = %entry.name,
                    severity = %entry.severity_level,
                    "entry below severity threshold"
                );
            }
            ancestors.push(visible);
        }
        blocks
    }

    fn block(&self, host: &str, depth: usize, entry: &TaskResult) -> Block {
        let mut fields: Vec<BlockField> = Vec::new();
        for &attribute in &self.options.vars {
            if fields.iter().any(|f| f.attribute == attribute) {
                continue;
            }
            if let Some(value) = entry.attribute(attribute) {
                fields.push(BlockField { attribute, value });
            }
        }

        Block {
            host: entry.host.clone().unwrap_or_else(|| host.to_string()),
            task: entry.name.clone(),
            depth,
            style: BlockStyle::of(entry),
            fields,
        }
    }

    /// Render the whole aggregated result; empty when nothing is visible
    pub fn render(&self, result: &AggregatedResult) -> String {
        let blocks = self.blocks(result);
        if blocks.is_empty() {
            return String::new();
        }

        let mut out = String::new();
        if !result.name.is_empty() {
            let title = if result.failed() {
                Style::new().red().bold()
            } else {
                Style::new().green().bold()
            };
            out.push_str(&format!(
                "{}\n",
                title.force_styling(self.colors).apply_to(&result.name)
            ));
        }
        for block in &blocks {
            out.push_str(&block.render(self.colors));
        }
        out
    }

    /// Write the rendered result to `out`
    pub fn print<W: Write>(&self, out: &mut W, result: &AggregatedResult) -> io::Result<()> {
        let rendered = self.render(result);
        if rendered.is_empty() {
            return Ok(());
        }
        out.write_all(rendered.as_bytes())?;
        out.flush()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use taskview_core::ResultNode;

    fn hello_world() -> AggregatedResult {
        AggregatedResult::new("hello_world").with_host(
            HostResult::new("r1", "hello_world").with_entry(
                TaskResult::new("hello_world")
                    .with_result("r1 says hello world!")
                    .with_severity(Severity(20)),
            ),
        )
    }

    fn greet_and_count() -> AggregatedResult {
        AggregatedResult::new("greet_and_count").with_host(
            HostResult::new("r1", "greet_and_count").with_entry(ResultNode::composite(
                TaskResult::new("greet_and_count").with_result("r1 counted even times!"),
                vec![
                    TaskResult::new("Greeting is the polite thing to do")
                        .with_result("r1 says hi!")
                        .into(),
                    TaskResult::new("Counting beans")
                        .with_result("[0, 1, 2]")
                        .with_severity(Severity::DEBUG)
                        .into(),
                    TaskResult::new("We should say bye too")
                        .with_result("r1 says bye!")
                        .with_changed(true)
                        .into(),
                ],
            )),
        )
    }

    #[test]
    fn test_single_success_is_one_green_block() {
        let printer = ResultPrinter::new(ResultOptions::default()).with_colors(true);
        let blocks = printer.blocks(&hello_world());
        assert_eq!(blocks.len(), 1);
        assert_eq!(blocks[0].host, "r1");
        assert_eq!(blocks[0].task, "hello_world");
        assert_eq!(blocks[0].style, BlockStyle::Ok);
        assert!(blocks[0].render(true).starts_with("\u{1b}[32m"));
    }

    #[test]
    fn test_changed_is_yellow_and_skipped_is_dim() {
        let result = AggregatedResult::new("mixed").with_host(
            HostResult::new("r1", "mixed")
                .with_entry(TaskResult::new("configure").with_changed(true))
                .with_entry(TaskResult::skipped("reload")),
        );
        let printer = ResultPrinter::new(ResultOptions::default()).with_colors(true);
        let blocks = printer.blocks(&result);
        assert_eq!(blocks[0].style, BlockStyle::Changed);
        assert!(blocks[0].render(true).starts_with("\u{1b}[33m✎ r1 | configure"));
        assert_eq!(blocks[1].style, BlockStyle::Skipped);
        assert!(blocks[1].render(true).starts_with("\u{1b}[2m⊘ r1 | reload"));
    }

    #[test]
    fn test_hidden_parent_does_not_indent_children() {
        let result = AggregatedResult::new("run")
            .with_host(HostResult::new("r1", "a").with_entry(TaskResult::new("a")))
            .with_host(HostResult::new("r2", "parent").with_entry(ResultNode::composite(
                TaskResult::new("parent").with_severity(Severity::DEBUG),
                vec![ResultNode::composite(
                    TaskResult::new("child").with_severity(Severity::WARNING),
                    vec![TaskResult::new("grandchild").into()],
                )],
            )));
        let printer = ResultPrinter::new(ResultOptions::default().with_vars(vec![]));

        let blocks = printer.blocks(&result);
        let depths: Vec<(&str, usize)> = blocks
            .iter()
            .map(|b| (b.task.as_str(), b.depth))
            .collect();
        assert_eq!(depths, vec![("a", 0), ("child", 0), ("grandchild", 1)]);

        let rendered = printer.render(&result);
        let lines: Vec<&str> = rendered.lines().collect();
        assert_eq!(
            lines,
            vec!["run", "✓ r1 | a", "✓ r2 | child", "  ✓ r2 | grandchild"]
        );
    }

    #[test]
    fn test_plain_rendering() {
        let printer = ResultPrinter::new(ResultOptions::default());
        insta::assert_snapshot!(printer.render(&hello_world()), @r"
        hello_world
        ✓ r1 | hello_world
                  result = r1 says hello world!
          severity_level = INFO
                    name = hello_world
        ");
    }

    #[test]
    fn test_failure_is_red_and_shows_exception() {
        let result = AggregatedResult::new("fail").with_host(
            HostResult::new("r1", "fail_task")
                .with_entry(TaskResult::failed("fail_task", "timeout")),
        );
        let printer = ResultPrinter::new(ResultOptions::default()).with_colors(true);
        let blocks = printer.blocks(&result);
        assert_eq!(blocks.len(), 1);
        assert_eq!(blocks[0].style, BlockStyle::Failed);
        let text = blocks[0].render(true);
        assert!(text.contains("\u{1b}[31m"));
        assert!(text.contains("timeout"));
    }

    #[test]
    fn test_severity_threshold_filters_entries() {
        let result = greet_and_count();
        let info = ResultPrinter::new(ResultOptions::default());
        assert_eq!(info.blocks(&result).len(), 3);

        let debug = ResultPrinter::new(
            ResultOptions::default().with_severity_level(Severity::DEBUG),
        );
        assert_eq!(debug.blocks(&result).len(), 4);

        let error = ResultPrinter::new(
            ResultOptions::default().with_severity_level(Severity::ERROR),
        );
        assert!(error.blocks(&result).is_empty());
        assert_eq!(error.render(&result), "");
    }

    #[test]
    fn test_nested_entries_are_indented() {
        let printer = ResultPrinter::new(ResultOptions::default().with_vars(vec![]));
        let rendered = printer.render(&greet_and_count());
        let lines: Vec<&str> = rendered.lines().collect();
        assert_eq!(
            lines,
            vec![
                "greet_and_count",
                "✓ r1 | greet_and_count",
                "  ✓ r1 | Greeting is the polite thing to do",
                "  ✎ r1 | We should say bye too",
            ]
        );
    }

    #[test]
    fn test_absent_attributes_are_omitted() {
        let printer = ResultPrinter::new(
            ResultOptions::default().with_vars(vec![Attribute::Diff, Attribute::Result]),
        );
        let blocks = printer.blocks(&hello_world());
        let attrs: Vec<Attribute> = blocks[0].fields.iter().map(|f| f.attribute).collect();
        assert_eq!(attrs, vec![Attribute::Result]);
    }

    #[test]
    fn test_attribute_filter_is_idempotent() {
        let once = ResultPrinter::new(
            ResultOptions::default().with_vars(vec![Attribute::Result, Attribute::Name]),
        );
        let twice = ResultPrinter::new(ResultOptions::default().with_vars(vec![
            Attribute::Result,
            Attribute::Name,
            Attribute::Result,
            Attribute::Name,
        ]));
        let result = greet_and_count();
        assert_eq!(once.render(&result), twice.render(&result));
    }

    #[test]
    fn test_multiline_values_are_aligned() {
        let result = AggregatedResult::new("").with_host(
            HostResult::new("host1", "t").with_entry(
                TaskResult::new("t")
                    .with_result("line one\nline two")
                    .with_diff("-a\n+b"),
            ),
        );
        let printer = ResultPrinter::new(
            ResultOptions::default().with_vars(vec![Attribute::Result, Attribute::Diff]),
        );
        let rendered = printer.render(&result);
        let lines: Vec<&str> = rendered.lines().collect();
        assert_eq!(
            lines,
            vec![
                "✓ host1 | t",
                "  result = line one",
                "           line two",
                "    diff = -a",
                "           +b",
            ]
        );
    }

    #[test]
    fn test_empty_result_writes_nothing() {
        let printer = ResultPrinter::new(ResultOptions::default());
        let mut out = Vec::new();
        printer
            .print(&mut out, &AggregatedResult::new("nothing"))
            .unwrap();
        assert!(out.is_empty());
    }

    #[test]
    fn test_block_style_mapping() {
        assert_eq!(BlockStyle::of(&TaskResult::new("a")), BlockStyle::Ok);
        assert_eq!(
            BlockStyle::of(&TaskResult::new("a").with_changed(true)),
            BlockStyle::Changed
        );
        assert_eq!(
            BlockStyle::of(&TaskResult::failed("a", "x").with_changed(true)),
            BlockStyle::Failed
        );
        assert_eq!(BlockStyle::of(&TaskResult::skipped("a")), BlockStyle::Skipped);
    }
}
