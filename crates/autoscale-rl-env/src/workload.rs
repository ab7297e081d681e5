//! Synthetic workload: a diurnal sine cycle with multiplicative noise

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rand_distr::{Distribution, Uniform};
use serde::{Deserialize, Serialize};

use autoscale_rl_core::{RLError, Result};

/// Source of incoming request rates, one draw per simulated step
pub trait WorkloadSource: Send {
    /// Requests arriving during `step_index`; never negative
    fn incoming_rate(&mut self, step_index: u64) -> f64;
}

/// Shape of the diurnal workload
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorkloadConfig {
    /// Baseline requests per step
    pub base_rate: f64,
    /// Steps in one simulated day
    pub period_steps: u32,
    /// Relative swing of the daily cycle around the baseline
    pub amplitude: f64,
    /// Lower bound of the multiplicative noise
    pub noise_low: f64,
    /// Upper bound of the multiplicative noise
    pub noise_high: f64,
}

impl Default for WorkloadConfig {
    fn default() -> Self {
        Self {
            base_rate: 5.0,
            period_steps: 24,
            amplitude: 0.5,
            noise_low: 0.8,
            noise_high: 1.2,
        }
    }
}

impl WorkloadConfig {
    /// Same cycle with the noise pinned to 1.0
    #[must_use]
    pub fn noiseless(mut self) -> Self {
        self.noise_low = 1.0;
        self.noise_high = 1.0;
        self
    }

    /// Reject shapes that cannot produce a valid rate
    pub fn validate(&self) -> Result<()> {
        let finite = [self.base_rate, self.amplitude, self.noise_low, self.noise_high]
            .iter()
            .all(|v| v.is_finite());
        if !finite {
            return Err(RLError::InvalidConfig("workload parameters must be finite".into()));
        }
        if self.period_steps == 0 {
            return Err(RLError::InvalidConfig("workload period must be at least one step".into()));
        }
        if self.base_rate < 0.0 {
            return Err(RLError::InvalidConfig(format!(
                "base_rate {} must be non-negative",
                self.base_rate
            )));
        }
        if self.noise_low < 0.0 || self.noise_low > self.noise_high {
            return Err(RLError::InvalidConfig(format!(
                "noise bounds [{}, {}] must satisfy 0 <= low <= high",
                self.noise_low, self.noise_high
            )));
        }
        Ok(())
    }

    /// Deterministic part of the rate: baseline scaled by the daily cycle
    #[must_use]
    pub fn cycle_rate(&self, step_index: u64) -> f64 {
        #[allow(clippy::cast_precision_loss)]
        let phase = (step_index % u64::from(self.period_steps)) as f64 / f64::from(self.period_steps);
        let cycle_factor = (2.0 * std::f64::consts::PI * phase).sin();
        self.base_rate * (1.0 + self.amplitude * cycle_factor)
    }
}

/// Diurnal workload generator with an owned, injectable random source
#[derive(Debug, Clone)]
pub struct DiurnalWorkload<R = StdRng> {
    config: WorkloadConfig,
    noise: Uniform<f64>,
    rng: R,
}

impl DiurnalWorkload<StdRng> {
    /// Generator seeded from `seed`, or from OS entropy when `None`
    pub fn seeded(config: WorkloadConfig, seed: Option<u64>) -> Result<Self> {
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self::with_rng(config, rng)
    }
}

impl<R: Rng> DiurnalWorkload<R> {
    /// Generator drawing noise from `rng`
    pub fn with_rng(config: WorkloadConfig, rng: R) -> Result<Self> {
        config.validate()?;
        let noise = Uniform::new_inclusive(config.noise_low, config.noise_high);
        Ok(Self { config, noise, rng })
    }

    /// Workload shape
    #[must_use]
    pub fn config(&self) -> &WorkloadConfig {
        &self.config
    }

    /// Draw the request rate for `step_index`
    pub fn generate(&mut self, step_index: u64) -> f64 {
        let noise = self.noise.sample(&mut self.rng);
        (self.config.cycle_rate(step_index) * noise).max(0.0)
    }
}

impl<R: Rng + Send> WorkloadSource for DiurnalWorkload<R> {
    fn incoming_rate(&mut self, step_index: u64) -> f64 {
        self.generate(step_index)
    }
}

/// Replays a fixed sequence of rates, repeating the last one when exhausted
#[derive(Debug, Clone)]
pub struct ScriptedWorkload {
    rates: Vec<f64>,
    cursor: usize,
}

impl ScriptedWorkload {
    /// Workload replaying `rates` in order
    #[must_use]
    pub fn new(rates: Vec<f64>) -> Self {
        Self { rates, cursor: 0 }
    }

    /// The same rate at every step
    #[must_use]
    pub fn constant(rate: f64) -> Self {
        Self::new(vec![rate])
    }
}

impl WorkloadSource for ScriptedWorkload {
    fn incoming_rate(&mut self, _step_index: u64) -> f64 {
        let rate = self
            .rates
            .get(self.cursor)
            .or_else(|| self.rates.last())
            .copied()
            .unwrap_or(0.0);
        self.cursor += 1;
        rate.max(0.0)
    }
}
