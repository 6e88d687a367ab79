//! Annealing configuration and temperature decay types.

use std::str::FromStr;

use rand::rngs::StdRng;
use rand::SeedableRng;

use super::error::ConfigError;

/// Shape of the temperature schedule between `init_temp` and `final_temp`.
///
/// Both shapes hit `init_temp` at the first iteration and `final_temp` at
/// the last one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum DecayType {
    /// `T_k = T_0 * exp(a * k)` with `a = ln(T_final / T_0) / (niter - 1)`.
    #[default]
    #[cfg_attr(feature = "serde", serde(alias = "exp"))]
    Exponential,

    /// `T_k` moves from `T_0` to `T_final` in equal steps.
    Linear,
}

impl FromStr for DecayType {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "exp" | "exponential" => Ok(DecayType::Exponential),
            "linear" => Ok(DecayType::Linear),
            _ => Err(ConfigError::UnknownDecayType(s.to_string())),
        }
    }
}

/// Configuration for a simulated annealing run.
///
/// Temperatures are in the same units as the cost function. As a rule of
/// thumb, `init_temp` is close to the average cost over the domain and the
/// initial visit scale is about ten times a continuous dimension's width, or
/// the average number of options for discrete dimensions.
///
/// # Examples
///
/// ```
/// use u_anneal::sa::{AnnealConfig, DecayType};
///
/// let config = AnnealConfig::default()
///     .with_init_temp(125.0)
///     .with_final_temp(1.0)
///     .with_niter(5000)
///     .with_decay_type(DecayType::Exponential)
///     .with_init_visit_scale(5.0)
///     .with_min_visit_scale(1.0)
///     .with_seed(7);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct AnnealConfig {
    /// Temperature at the first iteration.
    pub init_temp: f64,

    /// Temperature at the last iteration.
    ///
    /// Should be below `init_temp`; otherwise the schedule never cools.
    pub final_temp: f64,

    /// Number of iterations, each making one cost function call.
    pub niter: usize,

    /// Shape of the temperature schedule.
    pub decay_type: DecayType,

    /// Visit scale at the first iteration.
    ///
    /// Standard deviation of the Gaussian step for continuous domains;
    /// number of random swaps for discrete domains.
    pub init_visit_scale: f64,

    /// Floor for the visit scale as it decays with temperature.
    pub min_visit_scale: f64,

    /// Random seed for reproducibility.
    pub seed: Option<u64>,
}

impl Default for AnnealConfig {
    fn default() -> Self {
        Self {
            init_temp: 1000.0,
            final_temp: 1e-2,
            niter: 1000,
            decay_type: DecayType::default(),
            init_visit_scale: 1000.0,
            min_visit_scale: 1.0,
            seed: None,
        }
    }
}

impl AnnealConfig {
    pub fn with_init_temp(mut self, t: f64) -> Self {
        self.init_temp = t;
        self
    }

    pub fn with_final_temp(mut self, t: f64) -> Self {
        self.final_temp = t;
        self
    }

    pub fn with_niter(mut self, n: usize) -> Self {
        self.niter = n;
        self
    }

    pub fn with_decay_type(mut self, decay_type: DecayType) -> Self {
        self.decay_type = decay_type;
        self
    }

    pub fn with_init_visit_scale(mut self, scale: f64) -> Self {
        self.init_visit_scale = scale;
        self
    }

    pub fn with_min_visit_scale(mut self, scale: f64) -> Self {
        self.min_visit_scale = scale;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Validates the configuration.
    ///
    /// Temperatures below `f64::MIN_POSITIVE` are rejected since the
    /// acceptance probability divides by temperature and the exponential
    /// schedule takes its logarithm.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.niter == 0 {
            return Err(ConfigError::NoIterations);
        }
        check_temperature("init_temp", self.init_temp)?;
        check_temperature("final_temp", self.final_temp)?;
        check_visit_scale("init_visit_scale", self.init_visit_scale)?;
        check_visit_scale("min_visit_scale", self.min_visit_scale)?;
        Ok(())
    }

    /// Creates the random generator for a run.
    pub fn rng(&self) -> StdRng {
        match self.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::seed_from_u64(rand::random()),
        }
    }
}

fn check_temperature(name: &'static str, value: f64) -> Result<(), ConfigError> {
    // NaN fails both comparisons
    if value.is_finite() && value >= f64::MIN_POSITIVE {
        Ok(())
    } else {
        Err(ConfigError::InvalidTemperature { name, value })
    }
}

fn check_visit_scale(name: &'static str, value: f64) -> Result<(), ConfigError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(ConfigError::InvalidVisitScale { name, value })
    }
}
