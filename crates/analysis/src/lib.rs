//! Derived metrics for merge-queue runs.
//!
//! Everything here is a pure function of accumulated [`RunStats`] and
//! configuration values: dollar costs, the closed-form expected-throughput
//! model behind the "optimal concurrency" recommendation, end-of-run
//! records for run-over-run comparison, and the display formatting shared
//! by presentation collaborators.
//!
//! [`RunStats`]: mergeflow_types::RunStats

mod cost;
mod estimate;
mod format;
mod record;

pub use cost::CostInputs;
pub use estimate::{
    concurrency_curve, estimate_at_concurrency, expected_merges_per_cycle, optimal_concurrency,
    ConcurrencyEstimate, CurvePoint, MAX_CONCURRENCY,
};
pub use format::{format_card_time, format_ci_time, format_cost};
pub use record::RunRecord;
