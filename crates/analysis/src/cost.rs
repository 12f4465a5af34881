//! Dollar-cost model for CI time.

use mergeflow_types::RunStats;
use serde::{Deserialize, Serialize};

const MS_PER_MINUTE: f64 = 60_000.0;

/// Pricing inputs for the cost model.
///
/// Used only by the analysis layer; the engine never sees these.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CostInputs {
    /// Dollars per runner-minute.
    pub rate_per_runner_minute: f64,
    /// Runners consumed by one CI attempt.
    pub runner_count: u32,
}

impl CostInputs {
    /// Create pricing inputs, clamping to sane values: a negative rate
    /// is treated as free, and at least one runner is always billed.
    pub fn new(rate_per_runner_minute: f64, runner_count: u32) -> Self {
        Self {
            rate_per_runner_minute: rate_per_runner_minute.max(0.0),
            runner_count: runner_count.max(1),
        }
    }

    /// Dollars per CI-minute across all runners.
    pub fn cost_per_minute(&self) -> f64 {
        self.rate_per_runner_minute * self.runner_count as f64
    }

    /// Total dollars spent on CI this run, useful and wasted alike.
    pub fn total_cost(&self, stats: &RunStats) -> f64 {
        let ci_minutes = (stats.useful_ci_time_ms + stats.wasted_ci_time_ms) / MS_PER_MINUTE;
        ci_minutes * self.cost_per_minute()
    }

    /// Dollars spent on CI that was thrown away.
    pub fn wasted_cost(&self, stats: &RunStats) -> f64 {
        (stats.wasted_ci_time_ms / MS_PER_MINUTE) * self.cost_per_minute()
    }
}

impl Default for CostInputs {
    fn default() -> Self {
        Self {
            rate_per_runner_minute: 0.008,
            runner_count: 1,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_inputs_are_clamped() {
        let inputs = CostInputs::new(-0.5, 0);
        assert_eq!(inputs.rate_per_runner_minute, 0.0);
        assert_eq!(inputs.runner_count, 1);
    }

    #[test]
    fn test_total_and_wasted_cost() {
        let inputs = CostInputs::new(0.01, 4);
        let mut stats = RunStats::new();
        stats.useful_ci_time_ms = 90.0 * 60_000.0; // 90 CI-minutes
        stats.wasted_ci_time_ms = 10.0 * 60_000.0; // 10 CI-minutes

        // 100 minutes * 4 runners * $0.01
        assert!((inputs.total_cost(&stats) - 4.0).abs() < 1e-9);
        assert!((inputs.wasted_cost(&stats) - 0.4).abs() < 1e-9);
    }

    #[test]
    fn test_zero_rate_costs_nothing() {
        let inputs = CostInputs::new(0.0, 8);
        let mut stats = RunStats::new();
        stats.useful_ci_time_ms = 1e9;
        assert_eq!(inputs.total_cost(&stats), 0.0);
    }
}
