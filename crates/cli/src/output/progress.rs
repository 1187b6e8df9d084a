//! Live progress reporting for a task run
//!
//! [`ProgressReporter`] implements the runner's `Processor` hooks. It keeps
//! per-host counters and mirrors them on an `indicatif` display: an overall
//! bar, success/changed/failed/running gauges and one row per host.
//!
//! Counters always reflect every callback received. The display is only
//! drawn between `task_started` and `task_completed`, and the overall bar
//! never moves past its length when the runner reports more completions
//! than expected.

use std::collections::{BTreeMap, HashMap};
use std::sync::{Mutex, MutexGuard, PoisonError};

use console::Style;
use indicatif::{MultiProgress, ProgressBar, ProgressDrawTarget, ProgressStyle};
use taskview_core::{AggregatedResult, HostResult, Processor, TaskInfo};

use super::OutputConfig;

/// Lifecycle of one reporter; a reporter serves exactly one run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunState {
    Idle,
    Running,
    Finished,
}

/// Counters for one host
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HostProgress {
    pub completed: u64,
    pub failed: u64,
    pub changed: u64,
    pub subtasks_started: u64,
    pub subtasks_completed: u64,
    /// A host task is currently in flight
    pub running: bool,
}

/// Snapshot of everything the reporter has been told
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProgressState {
    pub state: RunState,
    /// Expected host task completions, hosts × tasks
    pub total: u64,
    pub completed: u64,
    pub failed: u64,
    pub changed: u64,
    /// Host tasks started but not completed yet
    pub running: u64,
    pub hosts: BTreeMap<String, HostProgress>,
}

impl Default for ProgressState {
    fn default() -> Self {
        Self {
            state: RunState::Idle,
            total: 0,
            completed: 0,
            failed: 0,
            changed: 0,
            running: 0,
            hosts: BTreeMap::new(),
        }
    }
}

impl ProgressState {
    /// Host task completions received, successful or not
    pub fn finished_units(&self) -> u64 {
        self.completed + self.failed
    }
}

fn bar_style(template: &str) -> ProgressStyle {
    ProgressStyle::default_bar()
        .template(template)
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("━╸ ")
}

fn row_style() -> ProgressStyle {
    ProgressStyle::default_spinner()
        .template("  {spinner:.yellow} {prefix:.bold} {msg}")
        .unwrap_or_else(|_| ProgressStyle::default_spinner())
}

/// Final message of a host row, styled for stderr
fn outcome_message(failed: bool, changed: bool) -> String {
    if failed {
        Style::new().red().for_stderr().apply_to("✗ failed").to_string()
    } else if changed {
        Style::new().yellow().for_stderr().apply_to("✎ changed").to_string()
    } else {
        Style::new().green().for_stderr().apply_to("✓ ok").to_string()
    }
}

/// Advance by one unless the bar is already full
fn advance_clamped(bar: &ProgressBar) {
    match bar.length() {
        Some(len) if bar.position() >= len => {}
        _ => bar.inc(1),
    }
}

/// The indicatif widgets of a running display
///
/// Dropping it before [`LiveDisplay::finish`] abandons every bar, so the
/// terminal is released even when the run unwinds.
struct LiveDisplay {
    multi: MultiProgress,
    overall: ProgressBar,
    successful: ProgressBar,
    changed: ProgressBar,
    failed: ProgressBar,
    running: ProgressBar,
    rows: HashMap<String, ProgressBar>,
    finished: bool,
}

impl LiveDisplay {
    fn start(target: ProgressDrawTarget, task: &TaskInfo, total: u64) -> Self {
        let multi = MultiProgress::with_draw_target(target);

        let overall = multi.add(ProgressBar::new(total));
        overall.set_style(bar_style(
            "{prefix:.cyan.bold} [{bar:60.cyan/blue}] {pos:>5}/{len} {elapsed_precise} ({eta})",
        ));
        overall.set_prefix(task.name.clone());

        let gauge = |label: &str, color: &str| {
            let bar = multi.add(ProgressBar::new(total));
            bar.set_style(bar_style(&format!(
                "{{prefix:>12.{color}}} [{{bar:60.{color}}}] {{pos:>5}}/{{len}}"
            )));
            bar.set_prefix(label.to_string());
            bar
        };
        let successful = gauge("Successful:", "green");
        let changed = gauge("Changed:", "yellow");
        let failed = gauge("Failed:", "red");
        let running = gauge("Running:", "yellow");

        Self {
            multi,
            overall,
            successful,
            changed,
            failed,
            running,
            rows: HashMap::new(),
            finished: false,
        }
    }

    fn host_started(&mut self, host: &str, running: u64) {
        self.running.set_position(running);
        let row = self.rows.entry(host.to_string()).or_insert_with(|| {
            let row = self.multi.add(ProgressBar::new_spinner());
            row.set_style(row_style());
            row.set_prefix(host.to_string());
            row
        });
        row.set_message("running");
    }

    fn subtask(&self, host: &str, progress: &HostProgress) {
        if let Some(row) = self.rows.get(host) {
            row.set_message(format!(
                "running, {}/{} subtasks done",
                progress.subtasks_completed, progress.subtasks_started
            ));
            row.tick();
        }
    }

    fn host_completed(&mut self, host: &str, failed: bool, changed: bool, running: u64) {
        self.running.set_position(running);
        advance_clamped(&self.overall);
        if failed {
            advance_clamped(&self.failed);
        } else {
            advance_clamped(&self.successful);
        }
        if changed {
            advance_clamped(&self.changed);
        }

        let message = outcome_message(failed, changed);
        if let Some(row) = self.rows.get(host) {
            row.finish_with_message(message);
        } else {
            let row = self.multi.add(ProgressBar::new_spinner());
            row.set_style(row_style());
            row.set_prefix(host.to_string());
            row.finish_with_message(message);
            self.rows.insert(host.to_string(), row);
        }
    }

    fn bars(&self) -> impl Iterator<Item = &ProgressBar> {
        [
            &self.overall,
            &self.successful,
            &self.changed,
            &self.failed,
            &self.running,
        ]
        .into_iter()
        .chain(self.rows.values())
    }

    fn finish(mut self) {
        for bar in self.bars() {
            bar.finish();
        }
        self.finished = true;
    }
}

impl Drop for LiveDisplay {
    fn drop(&mut self) {
        if !self.finished {
            for bar in self.bars() {
                bar.abandon();
            }
        }
    }
}

struct Inner {
    state: ProgressState,
    display: Option<LiveDisplay>,
}

/// Progress display driven by the task runner's lifecycle hooks
///
/// Calls may arrive from several runner threads; the counters sit behind a
/// mutex so updates never tear.
pub struct ProgressReporter {
    target: Mutex<Option<ProgressDrawTarget>>,
    inner: Mutex<Inner>,
}

impl ProgressReporter {
    /// Reporter drawing on stderr, or hidden when the output config
    /// suppresses progress
    pub fn new(config: &OutputConfig) -> Self {
        if config.quiet || config.json || config.no_progress {
            Self::hidden()
        } else {
            Self::with_draw_target(ProgressDrawTarget::stderr())
        }
    }

    /// Reporter that tracks counters without drawing anything
    pub fn hidden() -> Self {
        Self::with_draw_target(ProgressDrawTarget::hidden())
    }

    pub fn with_draw_target(target: ProgressDrawTarget) -> Self {
        Self {
            target: Mutex::new(Some(target)),
            inner: Mutex::new(Inner {
                state: ProgressState::default(),
                display: None,
            }),
        }
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Copy of the current counters
    pub fn snapshot(&self) -> ProgressState {
        self.lock().state.clone()
    }

    pub fn state(&self) -> RunState {
        self.lock().state.state
    }
}

impl Processor for ProgressReporter {
    fn task_started(&self, task: &TaskInfo) {
        let mut inner = self.lock();
        if inner.state.state != RunState::Idle {
            tracing::warn!(task = %task.name, state = ?inner.state.state, "run already started, ignoring");
            return;
        }

        let total = task.total_units();
        let target = self
            .target
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take()
            .unwrap_or_else(ProgressDrawTarget::hidden);
        tracing::debug!(task = %task.name, hosts = task.hosts, total, "starting progress display");

        inner.state.state = RunState::Running;
        inner.state.total = total;
        inner.display = Some(LiveDisplay::start(target, task, total));
    }

    fn task_completed(&self, task: &TaskInfo, result: &AggregatedResult) {
        let mut inner = self.lock();
        if inner.state.state != RunState::Running {
            tracing::warn!(task = %task.name, state = ?inner.state.state, "run completed without running");
        }
        inner.state.state = RunState::Finished;
        if let Some(display) = inner.display.take() {
            display.finish();
        }
        tracing::debug!(
            task = %task.name,
            completed = inner.state.completed,
            failed = inner.state.failed,
            failed_hosts = result.failed_hosts().count(),
            "progress display closed"
        );
    }

    fn task_instance_started(&self, task: &TaskInfo, host: &str) {
        let mut inner = self.lock();
        if inner.state.state != RunState::Running {
            tracing::warn!(task = %task.name, host, "host started outside of a running task");
        }

        let Inner { state, display } = &mut *inner;
        let entry = state.hosts.entry(host.to_string()).or_default();
        if !entry.running {
            entry.running = true;
            state.running += 1;
        }
        if let Some(display) = display {
            display.host_started(host, state.running);
        }
    }

    fn task_instance_completed(&self, task: &TaskInfo, host: &str, result: &HostResult) {
        let mut inner = self.lock();
        if inner.state.state != RunState::Running {
            tracing::warn!(task = %task.name, host, "host completed outside of a running task");
        }

        let failed = result.failed();
        let changed = result.changed();
        let Inner { state, display } = &mut *inner;
        let entry = state.hosts.entry(host.to_string()).or_default();
        if entry.running {
            entry.running = false;
            state.running = state.running.saturating_sub(1);
        }
        if failed {
            entry.failed += 1;
            state.failed += 1;
        } else {
            entry.completed += 1;
            state.completed += 1;
        }
        if changed {
            entry.changed += 1;
            state.changed += 1;
        }
        if let Some(display) = display {
            display.host_completed(host, failed, changed, state.running);
        }
    }

    fn subtask_instance_started(&self, _task: &TaskInfo, host: &str) {
        let mut inner = self.lock();
        let Inner { state, display } = &mut *inner;
        let entry = state.hosts.entry(host.to_string()).or_default();
        entry.subtasks_started += 1;
        if let Some(display) = display {
            display.subtask(host, entry);
        }
    }

    fn subtask_instance_completed(&self, _task: &TaskInfo, host: &str, _result: &HostResult) {
        let mut inner = self.lock();
        let Inner { state, display } = &mut *inner;
        let entry = state.hosts.entry(host.to_string()).or_default();
        entry.subtasks_completed += 1;
        if let Some(display) = display {
            display.subtask(host, entry);
        }
    }
}
