//! Closed-form throughput and cost estimates.
//!
//! Models one evaluation cycle of the queue: the active window of size
//! `b` runs CI, the head either merges a run of consecutive successes or
//! rejects the first failure. With independent per-commit success
//! probability `p`, the expected number merged per cycle is the expected
//! position of the first failure (or `b` when everything passes):
//!
//! ```text
//! E[merged] = sum_{k=0}^{b-1} k * p^k * (1-p)  +  b * p^b
//! ```
//!
//! A cycle also removes the rejected head when there is one, which
//! happens with probability `1 - p^b`. From expected removals per cycle
//! the model derives cycle count, wall-clock time, total CI runs, and
//! cost, and from `p` alone the recommended window size.

use crate::CostInputs;
use serde::{Deserialize, Serialize};

/// Upper bound of the recommendation and the curve's x-axis.
pub const MAX_CONCURRENCY: usize = 50;

/// Guard against a division by a vanishing removal rate.
const MIN_REMOVED_PER_CYCLE: f64 = 1e-4;
const DEGENERATE_CYCLES: f64 = 9_999.0;

/// Expected commits merged per evaluation cycle with window size `b` and
/// per-commit success probability `p`.
pub fn expected_merges_per_cycle(p: f64, b: usize) -> f64 {
    let pb = p.powi(b as i32);
    let mut merged = 0.0;
    for k in 0..b {
        merged += k as f64 * p.powi(k as i32) * (1.0 - p);
    }
    merged + b as f64 * pb
}

/// Projected outcome of a full run at a given window size.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ConcurrencyEstimate {
    /// Window size the estimate is for.
    pub concurrency: usize,
    /// Expected evaluation cycles to drain the queue.
    pub cycles: f64,
    /// Estimated wall-clock time, minutes.
    pub wall_clock_minutes: f64,
    /// Estimated total CI attempts across the run.
    pub total_runs: f64,
    /// Estimated total dollar cost.
    pub total_cost: f64,
    /// Total runs relative to the sequential baseline (1x = one run per
    /// commit), floored at 1.
    pub cost_multiplier: f64,
}

/// Estimate a full run of `total_commits` at window size `b`.
///
/// `success_rate` is a percentage; `base_ci_minutes` stands in for every
/// run's duration (jitter averages out).
pub fn estimate_at_concurrency(
    b: usize,
    success_rate: f64,
    total_commits: usize,
    base_ci_minutes: f64,
    cost: &CostInputs,
) -> ConcurrencyEstimate {
    let p = (success_rate / 100.0).clamp(0.0, 1.0);
    let pb = p.powi(b as i32);
    let merged = expected_merges_per_cycle(p, b);

    // Merges plus the rejection that ends the cycle, when there is one.
    let removed = merged + (1.0 - pb);
    let cycles = if removed > MIN_REMOVED_PER_CYCLE {
        total_commits as f64 / removed
    } else {
        DEGENERATE_CYCLES
    };

    // The final cycle is typically partial; the 0.5-cycle discount is an
    // empirical smoothing term, not derived.
    let total_runs = (cycles - 0.5).max(1.0) * b as f64;
    let total_cost = total_runs * base_ci_minutes * cost.cost_per_minute();

    ConcurrencyEstimate {
        concurrency: b,
        cycles,
        wall_clock_minutes: cycles * base_ci_minutes,
        total_runs,
        total_cost,
        cost_multiplier: (total_runs / total_commits as f64).max(1.0),
    }
}

/// The window size that maximizes throughput without flooding CI with
/// doomed runs: `round(1 / (1-p))`, clamped to `[1, MAX_CONCURRENCY]`.
///
/// At 100% success there is no penalty for maximal parallelism; at 0%
/// every parallel run beyond the head is guaranteed waste.
pub fn optimal_concurrency(success_rate: f64) -> usize {
    let p = success_rate / 100.0;
    if p >= 1.0 {
        return MAX_CONCURRENCY;
    }
    if p <= 0.0 {
        return 1;
    }
    ((1.0 / (1.0 - p)).round() as usize).clamp(1, MAX_CONCURRENCY)
}

/// One point of the cost/wall-clock-vs-concurrency curve.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CurvePoint {
    pub concurrency: usize,
    pub cost_multiplier: f64,
    pub wall_clock_minutes: f64,
}

/// The full curve for window sizes `1..=MAX_CONCURRENCY`, ready for a
/// collaborator to chart.
pub fn concurrency_curve(
    success_rate: f64,
    total_commits: usize,
    base_ci_minutes: f64,
    cost: &CostInputs,
) -> Vec<CurvePoint> {
    (1..=MAX_CONCURRENCY)
        .map(|b| {
            let est = estimate_at_concurrency(b, success_rate, total_commits, base_ci_minutes, cost);
            CurvePoint {
                concurrency: b,
                cost_multiplier: est.cost_multiplier,
                wall_clock_minutes: est.wall_clock_minutes,
            }
        })
        .collect()
}
