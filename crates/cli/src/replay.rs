//! Replay of a recorded run
//!
//! Feeds a recorded [`AggregatedResult`] through the lifecycle hooks of a
//! [`Processor`], host by host in recorded order, the way the task runner
//! would have reported it live. Nothing is executed; outcomes come from the
//! recording.

use std::time::Duration;

use taskview_core::{AggregatedResult, HostResult, Processor, ResultNode, TaskInfo};

/// Nested nodes beneath `node`, pre-order
fn subtasks(node: &ResultNode) -> Vec<&ResultNode> {
    let mut out = Vec::new();
    for child in node.children() {
        out.push(child);
        out.extend(subtasks(child));
    }
    out
}

/// Replays `result` into `processor`, pausing `pace` after each host
pub async fn replay(result: &AggregatedResult, processor: &dyn Processor, pace: Duration) {
    let task = TaskInfo::new(result.name.clone(), result.len());
    tracing::debug!(task = %task.name, hosts = task.hosts, "replaying recorded run");

    processor.task_started(&task);
    for host in &result.hosts {
        processor.task_instance_started(&task, &host.host);

        for node in host.entries.iter().flat_map(subtasks) {
            processor.subtask_instance_started(&task, &host.host);
            let sub = HostResult {
                host: host.host.clone(),
                name: node.result().name.clone(),
                entries: vec![node.clone()],
            };
            processor.subtask_instance_completed(&task, &host.host, &sub);
        }

        processor.task_instance_completed(&task, &host.host, host);
        if !pace.is_zero() {
            tokio::time::sleep(pace).await;
        }
    }
    processor.task_completed(&task, result);
}
