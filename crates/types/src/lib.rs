//! Core types for the Mergeflow merge-queue simulator.
//!
//! This crate holds the entity model shared by the engine, the analysis
//! layer, and the host drivers: commit identifiers, the per-commit CI
//! lifecycle, the deterministic commit generator, and the accumulated
//! run statistics. It contains no simulation logic and no randomness;
//! everything here is deterministic given its inputs.

mod commit;
mod generate;
mod identifiers;
mod stats;

pub use commit::{CiOutcome, CiStatus, Commit};
pub use generate::{commit_name, generate_commits, COMMIT_SPACING_MS};
pub use identifiers::CommitId;
pub use stats::RunStats;
