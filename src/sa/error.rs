//! Error types for annealing runs.

use thiserror::Error;

/// A configuration or domain rejected before any iteration runs.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("niter must be at least 1")]
    NoIterations,

    #[error("search domain has no dimensions")]
    EmptyDomain,

    #[error("dimension {dim}: bounds must be finite, got [{min}, {max}]")]
    NonFiniteBounds { dim: usize, min: f64, max: f64 },

    #[error("dimension {dim}: min must be less than max, got [{min}, {max}]")]
    InvalidBounds { dim: usize, min: f64, max: f64 },

    #[error("dimension {dim}: option set is empty")]
    EmptyOptions { dim: usize },

    #[error("{name} must be finite and at least {min:e}, got {value}", min = f64::MIN_POSITIVE)]
    InvalidTemperature { name: &'static str, value: f64 },

    #[error("{name} must be finite and positive, got {value}")]
    InvalidVisitScale { name: &'static str, value: f64 },

    #[error("unknown decay type {0:?} (expected \"exp\" or \"linear\")")]
    UnknownDecayType(String),
}

/// Failure of an annealing run with a fallible cost function.
///
/// `Cost` carries the cost function's own error untouched; the run is
/// aborted at the first failure and no partial result is kept.
#[derive(Debug, Error)]
pub enum AnnealError<E> {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("cost function failed")]
    Cost(#[source] E),
}

impl<E> AnnealError<E> {
    /// Returns the cost function error, if that is what stopped the run.
    pub fn into_cost(self) -> Option<E> {
        match self {
            AnnealError::Cost(e) => Some(e),
            AnnealError::Config(_) => None,
        }
    }
}
