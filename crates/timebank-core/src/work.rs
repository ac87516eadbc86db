//! Work units and their outcomes

use serde::{Deserialize, Serialize};
use std::fmt;
use tokio_util::sync::CancellationToken;

/// A caller-supplied task to run under a time budget.
///
/// The task runs on its own OS thread and receives a
/// [`CancellationToken`] that is cancelled when the budget is exhausted.
/// Work that never looks at the token cannot be stopped: the supervisor
/// stops accounting for it, but its thread runs until the task returns.
pub struct WorkUnit {
    task: Box<dyn FnOnce(CancellationToken) + Send + 'static>,
}

impl WorkUnit {
    /// Cooperative work that polls or waits on the cancellation token
    pub fn new<F>(task: F) -> Self
    where
        F: FnOnce(CancellationToken) + Send + 'static,
    {
        Self {
            task: Box::new(task),
        }
    }

    /// Work that ignores cancellation entirely
    pub fn opaque<F>(task: F) -> Self
    where
        F: FnOnce() + Send + 'static,
    {
        Self::new(move |_| task())
    }

    pub(crate) fn run(self, cancel: CancellationToken) {
        (self.task)(cancel)
    }
}

impl fmt::Debug for WorkUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WorkUnit").finish_non_exhaustive()
    }
}

/// Terminal state of one supervised execution
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Outcome {
    /// The work finished before the budget ran out, or the principal is exempt
    Completed,
    /// The budget was exhausted for a metered principal
    BudgetExceeded,
}

impl Outcome {
    pub fn is_completed(self) -> bool {
        self == Outcome::Completed
    }
}

impl From<Outcome> for bool {
    fn from(outcome: Outcome) -> bool {
        outcome.is_completed()
    }
}
