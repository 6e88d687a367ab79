//! Temperature and visit-scale schedules, and the Boltzmann acceptance rule.

use super::config::{AnnealConfig, DecayType};

/// Temperature and visit scale as pure functions of the iteration index.
///
/// Built once per run from a validated [`AnnealConfig`].
///
/// # Examples
///
/// ```
/// use u_anneal::sa::{AnnealConfig, DecayType, Schedule};
///
/// let config = AnnealConfig::default()
///     .with_init_temp(100.0)
///     .with_final_temp(1.0)
///     .with_niter(3)
///     .with_decay_type(DecayType::Exponential);
/// let schedule = Schedule::new(&config);
/// assert_eq!(schedule.temperature(0), 100.0);
/// assert!((schedule.temperature(1) - 10.0).abs() < 1e-9);
/// assert_eq!(schedule.temperature(2), 1.0);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Schedule {
    init_temp: f64,
    final_temp: f64,
    last: usize,
    decay_type: DecayType,
    decay_factor: f64,
    init_visit_scale: f64,
    min_visit_scale: f64,
}

impl Schedule {
    pub fn new(config: &AnnealConfig) -> Self {
        let last = config.niter.saturating_sub(1);
        // Unused when there is a single iteration
        let decay_factor = if last > 0 {
            (config.final_temp / config.init_temp).ln() / last as f64
        } else {
            0.0
        };
        Self {
            init_temp: config.init_temp,
            final_temp: config.final_temp,
            last,
            decay_type: config.decay_type,
            decay_factor,
            init_visit_scale: config.init_visit_scale,
            min_visit_scale: config.min_visit_scale,
        }
    }

    /// Temperature at iteration `k`.
    ///
    /// Exactly `init_temp` at `k = 0` and exactly `final_temp` at the last
    /// iteration.
    pub fn temperature(&self, k: usize) -> f64 {
        if k == 0 || self.last == 0 {
            return self.init_temp;
        }
        if k == self.last {
            return self.final_temp;
        }
        match self.decay_type {
            DecayType::Exponential => self.init_temp * (self.decay_factor * k as f64).exp(),
            DecayType::Linear => {
                // Keeps precision when final_temp is orders of magnitude
                // below init_temp
                let frac = k as f64 / self.last as f64;
                self.init_temp - frac * self.init_temp + frac * self.final_temp
            }
        }
    }

    /// Visit scale at `temperature`: proportional to it, floored at
    /// `min_visit_scale`.
    pub fn visit_scale(&self, temperature: f64) -> f64 {
        (self.init_visit_scale * (temperature / self.init_temp)).max(self.min_visit_scale)
    }
}

/// Boltzmann acceptance probability `min(1, exp(-delta / temperature))`.
///
/// Non-positive `delta` gives exactly `1` without evaluating `exp`, so large
/// improvements never overflow. Underflow is clamped to `f64::MIN_POSITIVE`,
/// keeping the result in `(0, 1]` for any finite `delta`. A `NaN` delta
/// (cost function returned `NaN`) gives `0`.
pub fn acceptance_probability(delta: f64, temperature: f64) -> f64 {
    let exponent = -delta / temperature;
    if exponent.is_nan() {
        0.0
    } else if exponent >= 0.0 {
        1.0
    } else {
        exponent.exp().max(f64::MIN_POSITIVE)
    }
}

/// Accepts when `probability >= random_draw`, never for a zero probability.
///
/// `random_draw` comes from `[0, 1)`, so without the zero check a draw of
/// exactly `0.0` would accept a `NaN` candidate.
pub fn is_accepted(probability: f64, random_draw: f64) -> bool {
    probability > 0.0 && probability >= random_draw
}
