// src/engine/selection.rs

//! "What runs next": priority selection with a tool-change tie-break.

use crate::job::Job;
use crate::types::{Priority, Tool};

/// The view of a job the selection algorithm needs.
pub trait Schedulable {
    fn is_ready(&self) -> bool;
    /// Priority of the next task to dispatch.
    fn priority(&self) -> Priority;
    fn needs_tool_change(&self, equipped: Option<Tool>) -> bool;
}

impl Schedulable for Job {
    fn is_ready(&self) -> bool {
        Job::is_ready(self)
    }

    fn priority(&self) -> Priority {
        self.current_priority().unwrap_or(Priority::NEG_INFINITY)
    }

    fn needs_tool_change(&self, equipped: Option<Tool>) -> bool {
        Job::needs_tool_change(self, equipped)
    }
}

/// Index of the job that should be advanced next, or `None` if no job is
/// ready.
///
/// Ready jobs are ranked by priority, highest first, with earlier entries
/// winning ties. If the best one reaches `threshold` it is returned as is.
/// Otherwise jobs whose next task can use the `equipped` tool are preferred,
/// and priority only decides among jobs with the same tool-change need.
pub fn highest_priority<J: Schedulable>(
    jobs: &[J],
    equipped: Option<Tool>,
    threshold: Priority,
) -> Option<usize> {
    let mut ready: Vec<(usize, &J)> = jobs
        .iter()
        .enumerate()
        .filter(|(_, job)| job.is_ready())
        .collect();

    // Both sorts are stable, so equal keys keep registration order.
    ready.sort_by(|(_, a), (_, b)| b.priority().total_cmp(&a.priority()));

    let &(top_index, top) = ready.first()?;
    if top.priority() >= threshold {
        return Some(top_index);
    }

    ready.sort_by(|(_, a), (_, b)| {
        a.needs_tool_change(equipped)
            .cmp(&b.needs_tool_change(equipped))
            .then_with(|| b.priority().total_cmp(&a.priority()))
    });

    ready.first().map(|&(index, _)| index)
}
