//! Instantaneous / batch driver.

use mergeflow_engine::Simulation;
use thiserror::Error;
use tracing::{info, warn};

/// The batch run hit its iteration cap before the queue drained.
///
/// Termination is normally guaranteed by the commit count (every
/// rejection removes exactly one commit), so hitting the cap means the
/// configuration or engine state is somehow degenerate. Surfaced rather
/// than silently looping.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InstantRunError {
    #[error("simulation did not converge after {iterations} iterations")]
    DidNotConverge { iterations: usize },
}

/// Run the whole simulation synchronously with event-driven time jumps.
///
/// Each iteration starts CI for idle window members, jumps simulated
/// time to the next CI completion, and lets the engine evaluate. There
/// is no fixed tick size: wall-clock accumulation is exact.
///
/// Step mode is suspended for the duration and restored afterwards; a
/// batch run has nobody to acknowledge steps.
pub fn run_instant(sim: &mut Simulation) -> Result<(), InstantRunError> {
    let step_mode = sim.config().step_mode;
    // Disabling step mode flushes any evaluation left pending by an
    // earlier interactive session.
    sim.set_step_mode(false);

    // Generous safety net; the commit count is the real terminator.
    let max_iterations = sim.config().total_commits * sim.config().concurrency_limit * 10;

    let mut iterations = 0;
    let result = loop {
        if sim.is_complete() {
            info!(
                merged = sim.stats().merged.len(),
                rejected = sim.stats().rejected.len(),
                "instant run complete"
            );
            break Ok(());
        }
        if iterations >= max_iterations {
            warn!(iterations, "instant run hit iteration cap");
            break Err(InstantRunError::DidNotConverge { iterations });
        }
        iterations += 1;

        // Start CI for idle window members (and evaluate any head left
        // resolved from the previous jump) without advancing time.
        sim.advance(0.0);

        match sim.next_completion_in() {
            // Jump to the next completion; the engine evaluates inline.
            Some(dt) => {
                sim.advance(dt);
            }
            // Nothing running: either the queue drained or every window
            // commit resolved and the next loop evaluates it.
            None => {
                if sim.is_complete() {
                    break Ok(());
                }
            }
        }
    };

    sim.set_step_mode(step_mode);
    result
}
