//! Simulated annealing over continuous and discrete search domains.
//!
//! The [`sa`] module minimizes a caller-supplied cost function over either
//! a box of `(min, max)` ranges with wrap-around edges or a list of discrete
//! option sets, one per dimension:
//!
//! - **Schedules**: exponential or linear temperature decay from
//!   `init_temp` to `final_temp` over exactly `niter` iterations.
//! - **Visiting**: Gaussian steps with periodic wrapping for continuous
//!   domains; random option swaps for discrete ones. The step size decays
//!   with temperature down to a configured floor.
//! - **Acceptance**: Boltzmann criterion `min(1, exp(-delta / T))`.
//! - **Tracing**: optional per-iteration records to a log, a CSV file, or
//!   memory.
//!
//! # Examples
//!
//! ```
//! use u_anneal::sa::{minimize, AnnealConfig, Continuous};
//!
//! let domain = Continuous::new([(-5.0, 5.0), (-5.0, 5.0)]);
//! let config = AnnealConfig::default()
//!     .with_init_temp(10.0)
//!     .with_final_temp(1e-3)
//!     .with_niter(3000)
//!     .with_init_visit_scale(2.0)
//!     .with_min_visit_scale(0.01)
//!     .with_seed(42);
//!
//! let result = minimize(|x: &[f64]| x.iter().map(|v| v * v).sum(), &domain, &config).unwrap();
//! assert!(result.best_cost < 0.5);
//! ```

pub mod sa;
