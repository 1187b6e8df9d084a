//! Task result tree
//!
//! A run produces an [`AggregatedResult`]: one [`HostResult`] per host, each
//! holding an ordered list of [`ResultNode`]s. A node is either a plain task
//! result or a composite task that ran subtasks beneath it.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize};

use crate::error::{Error, Result};

/// Numeric importance of a result entry, higher is more severe
///
/// Uses the standard logging levels of the task runner.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct Severity(pub u32);

impl Severity {
    pub const DEBUG: Severity = Severity(10);
    pub const INFO: Severity = Severity(20);
    pub const WARNING: Severity = Severity(30);
    pub const ERROR: Severity = Severity(40);
    pub const CRITICAL: Severity = Severity(50);

    /// Level name for the standard levels
    pub const fn name(self) -> Option<&'static str> {
        match self.0 {
            10 => Some("DEBUG"),
            20 => Some("INFO"),
            30 => Some("WARNING"),
            40 => Some("ERROR"),
            50 => Some("CRITICAL"),
            _ => None,
        }
    }
}

impl Default for Severity {
    fn default() -> Self {
        Self::INFO
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.name() {
            Some(name) => write!(f, "{name}"),
            None => write!(f, "{}", self.0),
        }
    }
}

impl FromStr for Severity {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let s = s.trim();
        if let Ok(level) = s.parse::<u32>() {
            return Ok(Severity(level));
        }
        match s.to_ascii_lowercase().as_str() {
            "debug" => Ok(Self::DEBUG),
            "info" => Ok(Self::INFO),
            "warn" | "warning" => Ok(Self::WARNING),
            "error" => Ok(Self::ERROR),
            "critical" | "fatal" => Ok(Self::CRITICAL),
            _ => Err(Error::InvalidSeverity(s.to_string())),
        }
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum SeverityRepr {
    Level(u32),
    Name(String),
}

impl<'de> Deserialize<'de> for Severity {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        match SeverityRepr::deserialize(deserializer)? {
            SeverityRepr::Level(level) => Ok(Severity(level)),
            SeverityRepr::Name(name) => name.parse().map_err(serde::de::Error::custom),
        }
    }
}

/// Outcome of a single task on a single host
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    #[default]
    Success,
    #[serde(alias = "failure")]
    Failed,
    Skipped,
}

/// Result of one task (or subtask) on one host
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaskResult {
    /// Task name
    pub name: String,

    /// Host the task ran against
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub host: Option<String>,

    #[serde(default)]
    pub status: Status,

    /// Whether the task changed anything on the host
    #[serde(default)]
    pub changed: bool,

    #[serde(default)]
    pub severity_level: Severity,

    /// Textual result payload
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result: Option<String>,

    /// Diff of the change, if the task reports one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub diff: Option<String>,

    /// Exception text of a failed task
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exception: Option<String>,
}

impl TaskResult {
    /// Create a successful, unchanged result at INFO severity
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            host: None,
            status: Status::Success,
            changed: false,
            severity_level: Severity::INFO,
            result: None,
            diff: None,
            exception: None,
        }
    }

    /// Create a failed result carrying an exception text
    pub fn failed(name: impl Into<String>, exception: impl Into<String>) -> Self {
        Self {
            status: Status::Failed,
            severity_level: Severity::ERROR,
            exception: Some(exception.into()),
            ..Self::new(name)
        }
    }

    /// Create a skipped result
    pub fn skipped(name: impl Into<String>) -> Self {
        Self {
            status: Status::Skipped,
            ..Self::new(name)
        }
    }

    pub fn with_host(mut self, host: impl Into<String>) -> Self {
        self.host = Some(host.into());
        self
    }

    pub fn with_result(mut self, result: impl Into<String>) -> Self {
        self.result = Some(result.into());
        self
    }

    pub fn with_diff(mut self, diff: impl Into<String>) -> Self {
        self.diff = Some(diff.into());
        self
    }

    pub fn with_severity(mut self, severity: Severity) -> Self {
        self.severity_level = severity;
        self
    }

    pub fn with_changed(mut self, changed: bool) -> Self {
        self.changed = changed;
        self
    }

    pub fn with_status(mut self, status: Status) -> Self {
        self.status = status;
        self
    }

    pub fn is_failed(&self) -> bool {
        self.status == Status::Failed
    }

    /// Text value of an attribute, `None` when absent or empty
    pub fn attribute(&self, attribute: Attribute) -> Option<String> {
        let non_empty = |value: &Option<String>| value.clone().filter(|v| !v.is_empty());
        match attribute {
            Attribute::Name => Some(self.name.clone()).filter(|n| !n.is_empty()),
            Attribute::Host => non_empty(&self.host),
            Attribute::Result => non_empty(&self.result),
            Attribute::Diff => non_empty(&self.diff),
            Attribute::Exception => non_empty(&self.exception),
            Attribute::SeverityLevel => Some(self.severity_level.to_string()),
            Attribute::Changed => Some(self.changed.to_string()),
            Attribute::Failed => Some(self.is_failed().to_string()),
        }
    }
}

/// A node of a host's result tree
///
/// Serialized untagged: an object carrying a `children` array is a
/// composite, anything else is a plain task.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ResultNode {
    Composite {
        #[serde(flatten)]
        result: TaskResult,
        children: Vec<ResultNode>,
    },
    Task(TaskResult),
}

impl ResultNode {
    pub fn composite(result: TaskResult, children: Vec<ResultNode>) -> Self {
        Self::Composite { result, children }
    }

    /// The result carried by this node itself
    pub fn result(&self) -> &TaskResult {
        match self {
            Self::Composite { result, .. } | Self::Task(result) => result,
        }
    }

    pub fn children(&self) -> &[ResultNode] {
        match self {
            Self::Composite { children, .. } => children,
            Self::Task(_) => &[],
        }
    }

    /// True if this node or any descendant failed
    pub fn failed(&self) -> bool {
        self.walk().any(|(_, r)| r.is_failed())
    }

    /// True if this node or any descendant changed something
    pub fn changed(&self) -> bool {
        self.walk().any(|(_, r)| r.changed)
    }

    /// Depth-first, pre-order walk yielding `(depth, result)`
    pub fn walk(&self) -> Walk<'_> {
        Walk {
            stack: vec![(0, self)],
        }
    }
}

impl From<TaskResult> for ResultNode {
    fn from(result: TaskResult) -> Self {
        Self::Task(result)
    }
}

/// Pre-order iterator over a result tree
pub struct Walk<'a> {
    stack: Vec<(usize, &'a ResultNode)>,
}

impl<'a> Iterator for Walk<'a> {
    type Item = (usize, &'a TaskResult);

    fn next(&mut self) -> Option<Self::Item> {
        let (depth, node) = self.stack.pop()?;
        self.stack
            .extend(node.children().iter().rev().map(|child| (depth + 1, child)));
        Some((depth, node.result()))
    }
}

/// All results of one task run on one host
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HostResult {
    pub host: String,

    /// Name of the top-level task
    #[serde(default)]
    pub name: String,

    #[serde(default)]
    pub entries: Vec<ResultNode>,
}

impl HostResult {
    pub fn new(host: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            host: host.into(),
            name: name.into(),
            entries: Vec::new(),
        }
    }

    pub fn with_entry(mut self, entry: impl Into<ResultNode>) -> Self {
        self.entries.push(entry.into());
        self
    }

    pub fn failed(&self) -> bool {
        self.entries.iter().any(ResultNode::failed)
    }

    pub fn changed(&self) -> bool {
        self.entries.iter().any(ResultNode::changed)
    }

    /// Every entry of the host, nested ones included, in tree order
    pub fn walk(&self) -> impl Iterator<Item = (usize, &TaskResult)> {
        self.entries.iter().flat_map(ResultNode::walk)
    }

    /// Failed entries anywhere in the tree, in tree order
    pub fn failed_tasks(&self) -> Vec<&TaskResult> {
        self.walk()
            .map(|(_, r)| r)
            .filter(|r| r.is_failed())
            .collect()
    }
}

/// Outcome of one run across all hosts, in host order
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AggregatedResult {
    #[serde(default)]
    pub name: String,

    #[serde(default)]
    pub hosts: Vec<HostResult>,
}

impl AggregatedResult {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            hosts: Vec::new(),
        }
    }

    pub fn with_host(mut self, host: HostResult) -> Self {
        self.hosts.push(host);
        self
    }

    /// Load a result dump from JSON
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn get(&self, host: &str) -> Option<&HostResult> {
        self.hosts.iter().find(|h| h.host == host)
    }

    pub fn failed(&self) -> bool {
        self.hosts.iter().any(HostResult::failed)
    }

    /// Hosts with at least one failed entry anywhere in their tree
    pub fn failed_hosts(&self) -> impl Iterator<Item = &HostResult> {
        self.hosts.iter().filter(|h| h.failed())
    }

    pub fn len(&self) -> usize {
        self.hosts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.hosts.is_empty()
    }
}

/// Result attribute that can be displayed for an entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Attribute {
    Name,
    Host,
    Result,
    Diff,
    Exception,
    SeverityLevel,
    Changed,
    Failed,
}

impl Attribute {
    /// Attributes shown when the caller does not choose
    pub const DEFAULTS: [Attribute; 5] = [
        Attribute::Result,
        Attribute::Diff,
        Attribute::Exception,
        Attribute::SeverityLevel,
        Attribute::Name,
    ];

    pub const fn as_str(self) -> &'static str {
        match self {
            Attribute::Name => "name",
            Attribute::Host => "host",
            Attribute::Result => "result",
            Attribute::Diff => "diff",
            Attribute::Exception => "exception",
            Attribute::SeverityLevel => "severity_level",
            Attribute::Changed => "changed",
            Attribute::Failed => "failed",
        }
    }

    /// Parse a comma-separated attribute list such as `result,diff`
    pub fn parse_list(list: &str) -> Result<Vec<Attribute>> {
        list.split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::parse)
            .collect()
    }
}

impl fmt::Display for Attribute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Attribute {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "name" => Ok(Attribute::Name),
            "host" => Ok(Attribute::Host),
            "result" => Ok(Attribute::Result),
            "diff" => Ok(Attribute::Diff),
            "exception" => Ok(Attribute::Exception),
            "severity_level" | "severity" => Ok(Attribute::SeverityLevel),
            "changed" => Ok(Attribute::Changed),
            "failed" => Ok(Attribute::Failed),
            other => Err(Error::InvalidAttribute(other.to_string())),
        }
    }
}
