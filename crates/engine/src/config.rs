//! Configuration for a simulation run.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Upper bound on the concurrency limit, shared with the analysis layer's
/// concurrency curve.
pub const MAX_CONCURRENCY: usize = 50;

/// Invalid configuration, rejected before a run starts.
///
/// The engine assumes validated input and never re-checks per tick.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("concurrency limit must be at least 1")]
    ZeroConcurrency,

    #[error("total commits must be at least 1")]
    ZeroCommits,

    #[error("success rate must be within [0, 100], got {0}")]
    SuccessRateOutOfRange(f64),

    #[error("CI duration and jitter must be non-negative, got {0}")]
    NegativeDuration(f64),

    #[error("speed multiplier must be non-negative, got {0}")]
    NegativeSpeed(f64),
}

/// How a rejected head's CI time is credited.
///
/// Whether a failing run "did its job" by identifying a bad commit, or is
/// just more burned CI, is a policy choice; both views exist in practice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RejectionCredit {
    /// The failing run correctly identified a bad commit.
    #[default]
    Useful,
    /// The failing run is counted with the restart waste.
    Wasted,
}

/// Configuration for a simulation run.
///
/// All fields are plain data so the collaborator configuration layer can
/// persist them; [`SimConfig::validate`] is the single gate a caller must
/// pass before constructing a [`crate::Simulation`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimConfig {
    /// CI pass probability, percent in `[0, 100]`.
    pub success_rate: f64,

    /// Active window size: commits testing in parallel. At least 1.
    pub concurrency_limit: usize,

    /// Queue size at reset. At least 1.
    pub total_commits: usize,

    /// Base CI duration, minutes.
    pub base_ci_minutes: f64,

    /// Uniform jitter around the base duration, minutes.
    pub ci_jitter_minutes: f64,

    /// Real-time driver scaling: simulated ms per wall-clock ms.
    pub speed_multiplier: f64,

    /// Pause before every head evaluation for an explicit acknowledgment.
    pub step_mode: bool,

    /// Crediting policy for a rejected head's CI time.
    pub rejection_credit: RejectionCredit,

    /// RNG seed; the same seed reproduces a run exactly.
    pub seed: u64,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            success_rate: 70.0,
            concurrency_limit: 10,
            total_commits: 100,
            base_ci_minutes: 15.0,
            ci_jitter_minutes: 10.0,
            speed_multiplier: 240.0,
            step_mode: true,
            rejection_credit: RejectionCredit::default(),
            seed: 12345,
        }
    }
}

impl SimConfig {
    /// Set the CI success rate, percent.
    pub fn with_success_rate(mut self, rate: f64) -> Self {
        self.success_rate = rate;
        self
    }

    /// Set the active window size.
    pub fn with_concurrency_limit(mut self, limit: usize) -> Self {
        self.concurrency_limit = limit;
        self
    }

    /// Set the number of commits generated at reset.
    pub fn with_total_commits(mut self, total: usize) -> Self {
        self.total_commits = total;
        self
    }

    /// Set the base CI duration and jitter, in minutes.
    pub fn with_ci_duration(mut self, base_minutes: f64, jitter_minutes: f64) -> Self {
        self.base_ci_minutes = base_minutes;
        self.ci_jitter_minutes = jitter_minutes;
        self
    }

    /// Set the real-time speed multiplier.
    pub fn with_speed_multiplier(mut self, speed: f64) -> Self {
        self.speed_multiplier = speed;
        self
    }

    /// Enable or disable step mode.
    pub fn with_step_mode(mut self, enabled: bool) -> Self {
        self.step_mode = enabled;
        self
    }

    /// Set the rejection crediting policy.
    pub fn with_rejection_credit(mut self, credit: RejectionCredit) -> Self {
        self.rejection_credit = credit;
        self
    }

    /// Set the RNG seed.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Check all ranges. Must pass before a simulation is constructed.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.concurrency_limit == 0 {
            return Err(ConfigError::ZeroConcurrency);
        }
        if self.total_commits == 0 {
            return Err(ConfigError::ZeroCommits);
        }
        if !(0.0..=100.0).contains(&self.success_rate) {
            return Err(ConfigError::SuccessRateOutOfRange(self.success_rate));
        }
        if self.base_ci_minutes < 0.0 {
            return Err(ConfigError::NegativeDuration(self.base_ci_minutes));
        }
        if self.ci_jitter_minutes < 0.0 {
            return Err(ConfigError::NegativeDuration(self.ci_jitter_minutes));
        }
        if self.speed_multiplier < 0.0 {
            return Err(ConfigError::NegativeSpeed(self.speed_multiplier));
        }
        Ok(())
    }
}

/// Canned configurations covering the interesting regions of the
/// parameter space.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Preset {
    Default,
    MostlyGreen,
    FlakyCi,
    Disaster,
    FastAndFurious,
}

impl Preset {
    /// All presets, in display order.
    pub const ALL: [Preset; 5] = [
        Preset::Default,
        Preset::MostlyGreen,
        Preset::FlakyCi,
        Preset::Disaster,
        Preset::FastAndFurious,
    ];

    /// Human-readable label.
    pub fn label(&self) -> &'static str {
        match self {
            Preset::Default => "Default",
            Preset::MostlyGreen => "Mostly Green",
            Preset::FlakyCi => "Flaky CI",
            Preset::Disaster => "Disaster Mode",
            Preset::FastAndFurious => "Fast & Furious",
        }
    }

    /// The configuration this preset stands for.
    ///
    /// Step mode and the crediting policy are left at their defaults;
    /// presets only shape the queue and CI distribution.
    pub fn config(&self) -> SimConfig {
        let base = SimConfig::default();
        match self {
            Preset::Default => base,
            Preset::MostlyGreen => base
                .with_success_rate(95.0)
                .with_ci_duration(10.0, 5.0),
            Preset::FlakyCi => base.with_success_rate(50.0),
            Preset::Disaster => base
                .with_success_rate(15.0)
                .with_total_commits(60)
                .with_ci_duration(20.0, 10.0)
                .with_speed_multiplier(3600.0),
            Preset::FastAndFurious => base
                .with_success_rate(80.0)
                .with_concurrency_limit(20)
                .with_total_commits(200)
                .with_ci_duration(5.0, 3.0)
                .with_speed_multiplier(10800.0),
        }
    }
}
