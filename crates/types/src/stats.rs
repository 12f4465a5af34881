//! Accumulated statistics for a single simulation run.

use crate::CommitId;
use serde::{Deserialize, Serialize};

/// Monotonically accumulating counters for one run.
///
/// Mutated only by the simulation engine; everything else reads. The
/// derived quantities (waste ratio, time saved) are pure functions of the
/// accumulated state and live here so observers never re-derive them
/// inconsistently.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RunStats {
    /// Commits merged, ordered by resolution time (most recent last).
    pub merged: Vec<CommitId>,
    /// Commits rejected, ordered by resolution time (most recent last).
    pub rejected: Vec<CommitId>,
    /// CI (re)starts beyond the first, across all commits.
    pub total_reruns: u32,
    /// CI time thrown away by window restarts, ms.
    pub wasted_ci_time_ms: f64,
    /// CI time credited to commits that left the queue, ms.
    pub useful_ci_time_ms: f64,
    /// Simulated time elapsed, ms.
    pub wall_clock_time_ms: f64,
    /// Sum of first-run durations over departed commits, ms.
    ///
    /// The baseline for "how long had we tested one commit at a time":
    /// rerun durations never contribute.
    pub sequential_ci_time_ms: f64,
}

impl RunStats {
    /// Create empty stats for a fresh run.
    pub fn new() -> Self {
        Self::default()
    }

    /// Commits that have left the queue so far.
    pub fn processed(&self) -> usize {
        self.merged.len() + self.rejected.len()
    }

    /// Wasted CI time divided by useful CI time.
    ///
    /// `None` when nothing has been spent yet; positive infinity when
    /// there is waste but no useful time to compare it against.
    pub fn waste_ratio(&self) -> Option<f64> {
        if self.useful_ci_time_ms > 0.0 {
            Some(self.wasted_ci_time_ms / self.useful_ci_time_ms)
        } else if self.wasted_ci_time_ms > 0.0 {
            Some(f64::INFINITY)
        } else {
            None
        }
    }

    /// Wall-clock time saved against the sequential baseline, ms.
    ///
    /// Floored at zero: batching can only be reported as saving time,
    /// never as owing it.
    pub fn time_saved_ms(&self) -> f64 {
        (self.sequential_ci_time_ms - self.wall_clock_time_ms).max(0.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_stats() {
        let stats = RunStats::new();
        assert_eq!(stats.processed(), 0);
        assert_eq!(stats.waste_ratio(), None);
        assert_eq!(stats.time_saved_ms(), 0.0);
    }

    #[test]
    fn test_waste_ratio() {
        let mut stats = RunStats::new();
        stats.useful_ci_time_ms = 200_000.0;
        stats.wasted_ci_time_ms = 50_000.0;
        assert_eq!(stats.waste_ratio(), Some(0.25));

        // Waste with no useful time is infinite overhead
        stats.useful_ci_time_ms = 0.0;
        assert_eq!(stats.waste_ratio(), Some(f64::INFINITY));
    }

    #[test]
    fn test_time_saved_floors_at_zero() {
        let mut stats = RunStats::new();
        stats.sequential_ci_time_ms = 900_000.0;
        stats.wall_clock_time_ms = 600_000.0;
        assert_eq!(stats.time_saved_ms(), 300_000.0);

        // Batching that ran slower than sequential reports zero savings
        stats.wall_clock_time_ms = 1_200_000.0;
        assert_eq!(stats.time_saved_ms(), 0.0);
    }

    #[test]
    fn test_processed_counts_both_lanes() {
        let mut stats = RunStats::new();
        stats.merged.push(CommitId(0));
        stats.merged.push(CommitId(1));
        stats.rejected.push(CommitId(2));
        assert_eq!(stats.processed(), 3);
    }
}
