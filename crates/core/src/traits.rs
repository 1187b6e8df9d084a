//! Processor trait definition
//!
//! A processor observes one run of the task runner. The runner calls the
//! lifecycle methods synchronously as tasks start and finish; processors
//! only observe and never influence execution.

use serde::{Deserialize, Serialize};

use crate::result::{AggregatedResult, HostResult};

/// Static facts about the task being run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskInfo {
    /// Task name
    pub name: String,

    /// Number of hosts the task runs against
    pub hosts: usize,

    /// Number of top-level tasks per host, nested subtasks not counted
    #[serde(default = "default_tasks")]
    pub tasks: usize,
}

fn default_tasks() -> usize {
    1
}

impl TaskInfo {
    pub fn new(name: impl Into<String>, hosts: usize) -> Self {
        Self {
            name: name.into(),
            hosts,
            tasks: default_tasks(),
        }
    }

    pub fn with_tasks(mut self, tasks: usize) -> Self {
        self.tasks = tasks;
        self
    }

    /// Best-effort number of host task completions to expect
    pub fn total_units(&self) -> u64 {
        (self.hosts as u64).saturating_mul(self.tasks as u64)
    }
}

/// Lifecycle hooks invoked by the task runner
///
/// Methods take `&self` and implementors must be `Sync`: a runner that
/// executes hosts in parallel may call in from several threads at once.
#[cfg_attr(any(test, feature = "mock"), mockall::automock)]
pub trait Processor: Send + Sync {
    /// A run is starting
    fn task_started(&self, task: &TaskInfo);

    /// The run finished; `result` holds every host's outcome
    fn task_completed(&self, task: &TaskInfo, result: &AggregatedResult);

    /// The task started on one host
    fn task_instance_started(&self, task: &TaskInfo, host: &str);

    /// The task finished on one host
    fn task_instance_completed(&self, task: &TaskInfo, host: &str, result: &HostResult);

    /// A nested subtask started on one host
    fn subtask_instance_started(&self, task: &TaskInfo, host: &str);

    /// A nested subtask finished on one host
    fn subtask_instance_completed(&self, task: &TaskInfo, host: &str, result: &HostResult);
}
