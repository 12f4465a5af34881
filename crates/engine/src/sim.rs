//! The tick-driven simulation state machine.

use crate::{ConfigError, Preview, RejectionCredit, SimConfig, StepState};
use indexmap::IndexMap;
use mergeflow_types::{generate_commits, CiOutcome, CiStatus, Commit, CommitId, RunStats};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use std::collections::VecDeque;
use tracing::{debug, info, trace};

/// Floor on sampled CI durations, ms. Prevents degenerate near-zero runs
/// that would complete in the tick they started.
pub const MIN_CI_DURATION_MS: f64 = 30_000.0;

/// What one `advance` call did.
#[derive(Debug, Clone, Default)]
pub struct TickResult {
    /// CI attempts started this tick.
    pub started: usize,
    /// CI attempts that revealed their outcome this tick.
    pub completed: usize,
    /// The tick was a no-op because the step controller is holding the
    /// engine frozen.
    pub frozen: bool,
    /// A resolved head put the controller into [`StepState::Waiting`].
    pub entered_step_wait: bool,
    /// The queue is empty; the run is over.
    pub finished: bool,
    /// Continuous-mode evaluation performed this tick, if any.
    pub evaluation: Option<EvalResult>,
}

/// What one evaluation pass did.
#[derive(Debug, Clone, Default)]
pub struct EvalResult {
    /// Heads merged, in order.
    pub merged: Vec<CommitId>,
    /// Head rejected, if the pass ended on a failure.
    pub rejected: Option<CommitId>,
    /// CI time newly credited as useful, ms.
    pub useful_delta_ms: f64,
    /// CI time newly written off, ms.
    pub wasted_delta_ms: f64,
}

impl EvalResult {
    /// Whether any commit left the queue.
    pub fn moved(&self) -> bool {
        !self.merged.is_empty() || self.rejected.is_some()
    }
}

/// A single merge-queue simulation run.
///
/// Owns the commit set, the queue, the RNG, and the accumulated
/// statistics. All mutation goes through [`advance`](Self::advance), the
/// evaluation methods, and [`reset`](Self::reset); observers get
/// read-only views between ticks.
pub struct Simulation {
    config: SimConfig,
    rng: ChaCha8Rng,
    commits: IndexMap<CommitId, Commit>,
    queue: VecDeque<CommitId>,
    stats: RunStats,
    step_state: StepState,
    finished: bool,
}

impl Simulation {
    /// Validate the configuration and build a fresh run.
    pub fn new(config: SimConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let mut sim = Self {
            config,
            rng: ChaCha8Rng::seed_from_u64(0),
            commits: IndexMap::new(),
            queue: VecDeque::new(),
            stats: RunStats::new(),
            step_state: StepState::Free,
            finished: false,
        };
        sim.reset();
        Ok(sim)
    }

    /// Discard all in-flight state and regenerate the run from config.
    ///
    /// Safe to call at any time, including mid-step and mid-transition.
    /// Reseeds the RNG, so the same config replays identically.
    pub fn reset(&mut self) {
        self.rng = ChaCha8Rng::seed_from_u64(self.config.seed);
        let commits = generate_commits(self.config.total_commits);
        self.queue = commits.iter().map(|c| c.id).collect();
        self.commits = commits.into_iter().map(|c| (c.id, c)).collect();
        self.stats = RunStats::new();
        self.step_state = StepState::Free;
        self.finished = false;
    }

    /// Advance simulated time by `dt` milliseconds.
    ///
    /// Within one tick, CI starts happen before elapsed-time advancement,
    /// which happens before head evaluation. While the step controller is
    /// waiting or transitioning the call is a frozen no-op: simulated
    /// time does not pass.
    pub fn advance(&mut self, dt: f64) -> TickResult {
        debug_assert!(dt >= 0.0, "advance called with negative dt");
        let mut tick = TickResult::default();

        if self.queue.is_empty() {
            if !self.finished {
                self.finished = true;
                info!(
                    merged = self.stats.merged.len(),
                    rejected = self.stats.rejected.len(),
                    wall_clock_ms = self.stats.wall_clock_time_ms,
                    "simulation complete"
                );
            }
            tick.finished = true;
            return tick;
        }

        if self.step_state.is_frozen() {
            tick.frozen = true;
            return tick;
        }

        self.stats.wall_clock_time_ms += dt;

        // 1. Start CI for idle commits in the active window.
        let window = self.active_window_len();
        for i in 0..window {
            let id = self.queue[i];
            if self.commits[&id].ci_status == CiStatus::Idle {
                self.start_ci(id);
                tick.started += 1;
            }
        }

        // 2. Advance running CI; reveal outcomes at completion.
        for i in 0..window {
            let id = self.queue[i];
            let commit = &mut self.commits[&id];
            if commit.ci_status == CiStatus::Running {
                commit.ci_elapsed_ms += dt;
                if commit.ci_elapsed_ms >= commit.ci_duration_ms {
                    commit.ci_elapsed_ms = commit.ci_duration_ms;
                    debug_assert!(commit.ci_outcome.is_some(), "running commit without outcome");
                    if let Some(outcome) = commit.ci_outcome {
                        commit.ci_status = outcome.revealed();
                        tick.completed += 1;
                    }
                }
            }
        }

        // 3. Evaluate if the head is resolved -- either newly completed or
        //    left over from an earlier tick.
        if self.head().is_some_and(Commit::is_resolved) {
            if self.config.step_mode {
                self.step_state = StepState::Waiting;
                tick.entered_step_wait = true;
            } else {
                tick.evaluation = Some(self.evaluate());
            }
        }

        tick
    }

    /// Evaluate the queue head until nothing more can be decided.
    ///
    /// Merges every consecutive success from the head, then handles at
    /// most one failure: the failing head is rejected and the rest of the
    /// active window restarts. New CI starts on the next tick.
    pub fn evaluate(&mut self) -> EvalResult {
        let mut result = EvalResult::default();
        let mut removed = 0usize;

        while let Some(&id) = self.queue.front() {
            match self.commits[&id].ci_status {
                CiStatus::Success => {
                    self.queue.pop_front();
                    removed += 1;
                    self.credit_merge(id, &mut result);
                }
                CiStatus::Fail => {
                    self.queue.pop_front();
                    removed += 1;
                    self.credit_rejection(id, &mut result);
                    result.wasted_delta_ms += self.restart_active_window(removed);
                    break;
                }
                CiStatus::Running | CiStatus::Idle => break,
            }
        }

        result
    }

    /// Evaluate exactly one logical action: the run of consecutive
    /// successes from the head, or a single rejection. Never both.
    pub fn evaluate_step(&mut self) -> EvalResult {
        let mut result = EvalResult::default();
        let mut removed = 0usize;

        while let Some(&id) = self.queue.front() {
            if self.commits[&id].ci_status != CiStatus::Success {
                break;
            }
            self.queue.pop_front();
            removed += 1;
            self.credit_merge(id, &mut result);
        }

        if removed == 0 {
            if let Some(&id) = self.queue.front() {
                if self.commits[&id].ci_status == CiStatus::Fail {
                    self.queue.pop_front();
                    removed += 1;
                    self.credit_rejection(id, &mut result);
                    result.wasted_delta_ms += self.restart_active_window(removed);
                }
            }
        }

        result
    }

    /// Describe what the next evaluation would do, without mutating.
    pub fn preview_evaluation(&self) -> Preview {
        let Some(head) = self.head() else {
            return Preview::None;
        };

        match head.ci_status {
            CiStatus::Fail => {
                // Same scan the restart would do, minus the head itself.
                let window = self
                    .config
                    .concurrency_limit
                    .min(self.queue.len())
                    .saturating_sub(1);
                let mut wasted = 0.0;
                for i in 1..=window {
                    let commit = &self.commits[&self.queue[i]];
                    wasted += Self::discarded_time(commit);
                }
                Preview::Reject {
                    id: head.id,
                    wasted_delta_ms: wasted,
                    description: format!(
                        "Reject \"{}\". CI failed. Remaining active window will restart CI.",
                        head.name
                    ),
                }
            }
            CiStatus::Success => {
                let mut count = 0;
                let mut useful = 0.0;
                for &id in &self.queue {
                    let commit = &self.commits[&id];
                    if commit.ci_status != CiStatus::Success {
                        break;
                    }
                    count += 1;
                    useful += commit.ci_duration_ms;
                }
                let names: Vec<&str> = self
                    .queue
                    .iter()
                    .take(count.min(3))
                    .map(|id| self.commits[id].name.as_str())
                    .collect();
                let description = if count == 1 {
                    format!("Merge \"{}\" into main.", names[0])
                } else {
                    let overflow = if count > 3 {
                        format!(" (+{} more)", count - 3)
                    } else {
                        String::new()
                    };
                    format!(
                        "Merge {} commits into main: {}{}.",
                        count,
                        names.join(", "),
                        overflow
                    )
                };
                Preview::Merge {
                    count,
                    useful_delta_ms: useful,
                    description,
                }
            }
            CiStatus::Running | CiStatus::Idle => Preview::None,
        }
    }

    /// Acknowledge a step-mode wait.
    ///
    /// Returns the preview of the pending action and moves the controller
    /// to [`StepState::Transitioning`] so the host can animate before
    /// calling [`finish_step`](Self::finish_step). A [`Preview::None`]
    /// simply unfreezes. `None` if the controller was not waiting.
    pub fn begin_step(&mut self) -> Option<Preview> {
        if self.step_state != StepState::Waiting {
            return None;
        }
        let preview = self.preview_evaluation();
        self.step_state = if preview.is_actionable() {
            StepState::Transitioning
        } else {
            StepState::Free
        };
        Some(preview)
    }

    /// Perform the acknowledged single evaluation step.
    ///
    /// If the new head is already resolved and step mode is still on, the
    /// controller re-enters [`StepState::Waiting`]; otherwise ticks
    /// resume. `None` if no step was in flight.
    pub fn finish_step(&mut self) -> Option<EvalResult> {
        if self.step_state != StepState::Transitioning {
            return None;
        }
        let result = self.evaluate_step();
        let head_ready = self.head().is_some_and(Commit::is_resolved);
        self.step_state = if self.config.step_mode && head_ready {
            StepState::Waiting
        } else {
            StepState::Free
        };
        Some(result)
    }

    /// Acknowledge and perform one step in a single call, for hosts with
    /// no transition animation.
    pub fn step(&mut self) -> Option<EvalResult> {
        match self.begin_step()? {
            Preview::None => None,
            _ => self.finish_step(),
        }
    }

    /// Toggle step mode.
    ///
    /// Disabling step mode while the controller is waiting performs the
    /// pending evaluation in full (the continuous algorithm, not a single
    /// step) before resuming, so a resolved head is never left hanging.
    pub fn set_step_mode(&mut self, enabled: bool) -> Option<EvalResult> {
        self.config.step_mode = enabled;
        if !enabled && self.step_state == StepState::Waiting {
            self.step_state = StepState::Free;
            return Some(self.evaluate());
        }
        None
    }

    /// Length of the active window: the queue prefix allowed to run CI.
    pub fn active_window_len(&self) -> usize {
        self.config.concurrency_limit.min(self.queue.len())
    }

    /// Minimum remaining CI time among running window commits, ms.
    ///
    /// The event-driven jump size for batch mode; `None` when nothing is
    /// running.
    pub fn next_completion_in(&self) -> Option<f64> {
        let mut min_remaining: Option<f64> = None;
        for i in 0..self.active_window_len() {
            let commit = &self.commits[&self.queue[i]];
            if commit.ci_status == CiStatus::Running {
                let remaining = commit.ci_duration_ms - commit.ci_elapsed_ms;
                min_remaining = Some(match min_remaining {
                    Some(current) if current <= remaining => current,
                    _ => remaining,
                });
            }
        }
        min_remaining
    }

    /// Whether every commit has left the queue.
    pub fn is_complete(&self) -> bool {
        self.queue.is_empty()
    }

    /// The head commit, if the queue is non-empty.
    pub fn head(&self) -> Option<&Commit> {
        self.queue.front().map(|id| &self.commits[id])
    }

    /// Queue contents in order, head first.
    pub fn queue_commits(&self) -> impl Iterator<Item = &Commit> + '_ {
        self.queue.iter().map(|id| &self.commits[id])
    }

    /// Number of commits still queued.
    pub fn queue_len(&self) -> usize {
        self.queue.len()
    }

    /// Look up a commit by id, whether queued or departed.
    pub fn commit(&self, id: CommitId) -> Option<&Commit> {
        self.commits.get(&id)
    }

    /// Accumulated statistics for this run.
    pub fn stats(&self) -> &RunStats {
        &self.stats
    }

    /// The active configuration.
    pub fn config(&self) -> &SimConfig {
        &self.config
    }

    /// Current step-controller state.
    pub fn step_state(&self) -> StepState {
        self.step_state
    }

    /// Start a CI attempt for a queued commit.
    fn start_ci(&mut self, id: CommitId) {
        let base_ms = self.config.base_ci_minutes * 60_000.0;
        let jitter_ms = self.config.ci_jitter_minutes * 60_000.0;
        let min_ms = (base_ms - jitter_ms).max(MIN_CI_DURATION_MS);
        let max_ms = (base_ms + jitter_ms).max(min_ms);
        let duration = if max_ms > min_ms {
            self.rng.gen_range(min_ms..max_ms)
        } else {
            max_ms
        };
        let p = (self.config.success_rate / 100.0).clamp(0.0, 1.0);
        let outcome = if self.rng.gen_bool(p) {
            CiOutcome::Success
        } else {
            CiOutcome::Fail
        };

        let commit = &mut self.commits[&id];
        commit.ci_status = CiStatus::Running;
        commit.ci_elapsed_ms = 0.0;
        commit.ci_duration_ms = duration;
        commit.ci_outcome = Some(outcome);
        if commit.ci_runs == 0 {
            // Frozen for the sequential baseline; reruns never touch it.
            commit.first_run_duration_ms = duration;
        }
        commit.ci_runs += 1;
        if commit.ci_runs > 1 {
            self.stats.total_reruns += 1;
        }
        trace!(commit = %id, duration_ms = duration, run = commit.ci_runs, "ci started");
    }

    /// Dequeue credit shared by merges and rejections.
    fn credit_merge(&mut self, id: CommitId, result: &mut EvalResult) {
        let (duration, first_run) = {
            let commit = &self.commits[&id];
            (commit.ci_duration_ms, commit.first_run_duration_ms)
        };
        self.stats.merged.push(id);
        self.stats.useful_ci_time_ms += duration;
        self.stats.sequential_ci_time_ms += first_run;
        result.merged.push(id);
        result.useful_delta_ms += duration;
        debug!(commit = %id, duration_ms = duration, "merged");
    }

    fn credit_rejection(&mut self, id: CommitId, result: &mut EvalResult) {
        let (duration, first_run) = {
            let commit = &self.commits[&id];
            (commit.ci_duration_ms, commit.first_run_duration_ms)
        };
        self.stats.rejected.push(id);
        self.stats.sequential_ci_time_ms += first_run;
        match self.config.rejection_credit {
            RejectionCredit::Useful => {
                self.stats.useful_ci_time_ms += duration;
                result.useful_delta_ms += duration;
            }
            RejectionCredit::Wasted => {
                self.stats.wasted_ci_time_ms += duration;
                result.wasted_delta_ms += duration;
            }
        }
        result.rejected = Some(id);
        debug!(commit = %id, duration_ms = duration, "rejected");
    }

    /// Reset the remainder of the active window after a head failure.
    ///
    /// `already_removed` is how many items this evaluation pass dequeued
    /// before the restart (consecutive successes plus the failing head).
    /// The window is measured against the pre-pass queue length: slots
    /// are fixed-size, and recomputing fresh against the shrunken queue
    /// would undercount the commits whose work is being invalidated.
    fn restart_active_window(&mut self, already_removed: usize) -> f64 {
        let original_len = self.queue.len() + already_removed;
        let original_window = self.config.concurrency_limit.min(original_len);
        let remaining = original_window.saturating_sub(already_removed);
        debug_assert!(remaining <= self.queue.len(), "restart window exceeds queue");

        let mut wasted = 0.0;
        for i in 0..remaining {
            let id = self.queue[i];
            let commit = &mut self.commits[&id];
            wasted += Self::discarded_time(commit);
            commit.clear_attempt();
        }
        self.stats.wasted_ci_time_ms += wasted;
        if remaining > 0 {
            debug!(restarted = remaining, wasted_ms = wasted, "active window restarted");
        }
        wasted
    }

    /// CI time thrown away if this commit's attempt is discarded now:
    /// elapsed time for a running attempt, the full duration for one that
    /// finished but never got evaluated.
    fn discarded_time(commit: &Commit) -> f64 {
        match commit.ci_status {
            CiStatus::Running if commit.ci_elapsed_ms > 0.0 => commit.ci_elapsed_ms,
            CiStatus::Success | CiStatus::Fail if commit.ci_duration_ms > 0.0 => {
                commit.ci_duration_ms
            }
            _ => 0.0,
        }
    }
}
