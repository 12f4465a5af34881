//! The commit entity and its CI lifecycle.
//!
//! A commit's CI attempt is deliberately two-phase: the outcome is decided
//! when CI starts (`ci_outcome`) but only revealed on the visible status
//! (`ci_status`) once the full sampled duration has elapsed. This models
//! real CI, where a run must complete before its result is knowable, and
//! lets observers render a truthful in-progress state.

use crate::CommitId;
use serde::{Deserialize, Serialize};

/// Visible CI state of a commit, as an observer sees it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CiStatus {
    /// No CI attempt in flight.
    Idle,
    /// CI running; outcome decided but not yet revealed.
    Running,
    /// CI completed and passed.
    Success,
    /// CI completed and failed.
    Fail,
}

impl CiStatus {
    /// Whether the commit has a revealed terminal result for this attempt.
    pub fn is_resolved(&self) -> bool {
        matches!(self, CiStatus::Success | CiStatus::Fail)
    }
}

/// Outcome decided at CI start, revealed only at completion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CiOutcome {
    Success,
    Fail,
}

impl CiOutcome {
    /// The visible status this outcome reveals as.
    pub fn revealed(&self) -> CiStatus {
        match self {
            CiOutcome::Success => CiStatus::Success,
            CiOutcome::Fail => CiStatus::Fail,
        }
    }
}

/// A candidate change waiting to be tested against trunk.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Commit {
    /// Stable identity within a run.
    pub id: CommitId,
    /// Display label; deterministic from the generation index.
    pub name: String,
    /// Synthetic creation timestamp, ms; strictly increasing with index.
    pub created_at_ms: u64,
    /// Visible CI state.
    pub ci_status: CiStatus,
    /// Sampled duration of the current attempt, ms; 0 while idle.
    pub ci_duration_ms: f64,
    /// Time accumulated in the current attempt, ms.
    pub ci_elapsed_ms: f64,
    /// Outcome decided at CI start; `None` while idle.
    pub ci_outcome: Option<CiOutcome>,
    /// Number of times CI has been (re)started for this commit.
    pub ci_runs: u32,
    /// Duration sampled on the very first attempt, frozen thereafter.
    /// Feeds the sequential baseline only.
    pub first_run_duration_ms: f64,
}

impl Commit {
    /// Create a fresh idle commit.
    pub fn new(id: CommitId, name: String, created_at_ms: u64) -> Self {
        Self {
            id,
            name,
            created_at_ms,
            ci_status: CiStatus::Idle,
            ci_duration_ms: 0.0,
            ci_elapsed_ms: 0.0,
            ci_outcome: None,
            ci_runs: 0,
            first_run_duration_ms: 0.0,
        }
    }

    /// Whether the current attempt has a revealed terminal result.
    pub fn is_resolved(&self) -> bool {
        self.ci_status.is_resolved()
    }

    /// Fraction of the current attempt completed, in `[0, 1]`.
    pub fn progress(&self) -> f64 {
        if self.ci_duration_ms > 0.0 {
            (self.ci_elapsed_ms / self.ci_duration_ms).min(1.0)
        } else {
            0.0
        }
    }

    /// Discard the current attempt and return to idle.
    ///
    /// Run count and first-run duration are preserved: they describe the
    /// commit's history across attempts, not the attempt being discarded.
    pub fn clear_attempt(&mut self) {
        self.ci_status = CiStatus::Idle;
        self.ci_elapsed_ms = 0.0;
        self.ci_duration_ms = 0.0;
        self.ci_outcome = None;
    }
}
