//! Step-mode controller state and evaluation previews.
//!
//! Step mode lets an operator inspect the queue before committing to an
//! evaluation. While the controller is waiting or transitioning the tick
//! loop is frozen entirely: simulated time does not advance until the
//! host acknowledges.

use mergeflow_types::CommitId;

/// Controller state for step-mode evaluation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StepState {
    /// Ticks run freely; heads evaluate as they resolve.
    #[default]
    Free,
    /// A head is resolved and the engine is frozen awaiting an
    /// acknowledgment.
    Waiting,
    /// Acknowledged; the host is animating the pending action. The
    /// engine stays frozen until [`crate::Simulation::finish_step`].
    Transitioning,
}

impl StepState {
    /// Whether ticks are currently frozen.
    pub fn is_frozen(&self) -> bool {
        matches!(self, StepState::Waiting | StepState::Transitioning)
    }
}

/// Non-destructive description of what the next evaluation would do.
#[derive(Debug, Clone, PartialEq)]
pub enum Preview {
    /// Head is not resolved (or the queue is empty); nothing to do.
    None,
    /// A run of consecutive successes would merge.
    Merge {
        /// Number of consecutive successes from the head.
        count: usize,
        /// Sum of their CI durations, ms.
        useful_delta_ms: f64,
        /// Human-readable description naming up to 3 commits.
        description: String,
    },
    /// The head failed and would be rejected, restarting the window.
    Reject {
        /// The failing head.
        id: CommitId,
        /// CI time the window restart would throw away, ms.
        wasted_delta_ms: f64,
        /// Human-readable description.
        description: String,
    },
}

impl Preview {
    /// Whether this preview describes an actual pending action.
    pub fn is_actionable(&self) -> bool {
        !matches!(self, Preview::None)
    }
}
