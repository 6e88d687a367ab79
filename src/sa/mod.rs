//! Simulated Annealing (SA).
//!
//! A single-solution trajectory metaheuristic inspired by the physical
//! annealing process. Accepts worsening moves with a probability that
//! decreases over time (temperature), allowing the search to escape
//! local optima.
//!
//! The temperature follows an exponential or linear schedule fixed by the
//! iteration count, and the size of each move (the visit scale) shrinks in
//! proportion to it. Domains are either continuous boxes with periodic
//! boundaries or per-dimension discrete option lists.
//!
//! # References
//!
//! - Kirkpatrick, Gelatt & Vecchi (1983), "Optimization by Simulated Annealing"
//! - Metropolis et al. (1953), "Equation of State Calculations by Fast
//!   Computing Machines"

mod config;
mod domain;
mod error;
mod runner;
mod schedule;
mod trace;

pub use config::{AnnealConfig, DecayType};
pub use domain::{Bounds, Continuous, Discrete, DomainKind, SearchDomain};
pub use error::{AnnealError, ConfigError};
pub use runner::{minimize, AnnealResult, AnnealRunner};
pub use schedule::{acceptance_probability, is_accepted, Schedule};
pub use trace::{CsvTrace, LogTrace, NoTrace, TraceRecord, TraceSink, TIMESTAMP_FORMAT};
