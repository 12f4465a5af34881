//! Completed-run snapshots for run-over-run comparison.

use crate::CostInputs;
use mergeflow_types::RunStats;
use serde::{Deserialize, Serialize};

/// Immutable summary of a finished run, captured so the next run can be
/// compared against it after the live stats reset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunRecord {
    pub merged: usize,
    pub rejected: usize,
    pub processed: usize,
    /// Concurrency limit the run was configured with.
    pub concurrency: usize,
    pub reruns: u32,
    pub wall_clock_time_ms: f64,
    pub sequential_ci_time_ms: f64,
    pub useful_ci_time_ms: f64,
    pub wasted_ci_time_ms: f64,
    pub total_cost: f64,
    pub wasted_cost: f64,
}

impl RunRecord {
    /// Snapshot `stats` at the cost rate in effect when the run ended.
    pub fn capture(stats: &RunStats, concurrency: usize, cost: &CostInputs) -> Self {
        Self {
            merged: stats.merged.len(),
            rejected: stats.rejected.len(),
            processed: stats.processed(),
            concurrency,
            reruns: stats.total_reruns,
            wall_clock_time_ms: stats.wall_clock_time_ms,
            sequential_ci_time_ms: stats.sequential_ci_time_ms,
            useful_ci_time_ms: stats.useful_ci_time_ms,
            wasted_ci_time_ms: stats.wasted_ci_time_ms,
            total_cost: cost.total_cost(stats),
            wasted_cost: cost.wasted_cost(stats),
        }
    }

    /// Wall-clock time saved over sequential processing, floored at zero.
    pub fn time_saved_ms(&self) -> f64 {
        (self.sequential_ci_time_ms - self.wall_clock_time_ms).max(0.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mergeflow_types::CommitId;

    fn stats() -> RunStats {
        let mut s = RunStats::default();
        s.merged = vec![CommitId(0), CommitId(1), CommitId(2)];
        s.rejected = vec![CommitId(3)];
        s.total_reruns = 5;
        s.wall_clock_time_ms = 1_800_000.0;
        s.sequential_ci_time_ms = 3_600_000.0;
        s.useful_ci_time_ms = 2_700_000.0;
        s.wasted_ci_time_ms = 900_000.0;
        s
    }

    #[test]
    fn test_capture_counts_and_costs() {
        // $0.01/min per runner, 2 runners: $0.02/min of CI time.
        let rec = RunRecord::capture(&stats(), 10, &CostInputs::new(0.01, 2));
        assert_eq!(rec.merged, 3);
        assert_eq!(rec.rejected, 1);
        assert_eq!(rec.processed, 4);
        assert_eq!(rec.concurrency, 10);
        assert_eq!(rec.reruns, 5);
        // (2_700_000 + 900_000) ms = 60 min of CI at $0.02/min.
        assert!((rec.total_cost - 1.2).abs() < 1e-9);
        assert!((rec.wasted_cost - 0.3).abs() < 1e-9);
    }

    #[test]
    fn test_time_saved_floors_at_zero() {
        let mut s = stats();
        s.wall_clock_time_ms = 5_000_000.0;
        let rec = RunRecord::capture(&s, 1, &CostInputs::default());
        assert_eq!(rec.time_saved_ms(), 0.0);

        let rec = RunRecord::capture(&stats(), 1, &CostInputs::default());
        assert!((rec.time_saved_ms() - 1_800_000.0).abs() < 1e-9);
    }
}
