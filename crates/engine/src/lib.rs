//! Merge-queue simulation engine.
//!
//! Models a batching admission queue the way CI systems run one: the
//! first `concurrency_limit` queued commits (the active window) run CI in
//! parallel against trunk, consecutive passing heads merge together, and
//! a failing head is rejected and invalidates the in-flight work of
//! everything that was testing behind it.
//!
//! The engine is tick-driven and fully deterministic given a seed. A host
//! loop supplies simulated-millisecond deltas through
//! [`Simulation::advance`]; the engine mutates the commit/queue model and
//! returns plain data describing what changed. All rendering, timing, and
//! persistence concerns belong to the caller.
//!
//! # Architecture
//!
//! ```text
//! ┌────────────────────────────────────────────────────────┐
//! │                      Simulation                        │
//! │                                                        │
//! │  advance(dt) ──► start CI ──► elapse ──► reveal        │
//! │                                   │                    │
//! │                                   ▼                    │
//! │        head resolved? ── step mode ──► Waiting         │
//! │                │                        (freeze)       │
//! │                ▼                                       │
//! │        evaluate(): merge run of successes,             │
//! │        or reject head + restart active window          │
//! └────────────────────────────────────────────────────────┘
//! ```

mod config;
mod sim;
mod step;

pub use config::{ConfigError, Preset, RejectionCredit, SimConfig, MAX_CONCURRENCY};
pub use sim::{EvalResult, Simulation, TickResult, MIN_CI_DURATION_MS};
pub use step::{Preview, StepState};
