//! SA execution loop.
//!
//! # Algorithm
//!
//! 1. Validate configuration and domain; draw a uniform initial candidate
//!    and evaluate it
//! 2. For each iteration `k` in `0..niter`:
//!    a. Compute `T(k)` and the visit scale
//!    b. Visit: generate a candidate from the current state
//!    c. Accept it with probability `min(1, exp(-delta / T))`
//! 3. Return the final accepted state (and, separately, the best seen)

use std::convert::Infallible;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use chrono::Local;
use rand::Rng;
use tracing::{debug, info, warn};

use super::config::AnnealConfig;
use super::domain::SearchDomain;
use super::error::{AnnealError, ConfigError};
use super::schedule::{acceptance_probability, is_accepted, Schedule};
use super::trace::{NoTrace, TraceRecord, TraceSink};

/// Result of a Simulated Annealing run.
#[derive(Debug, Clone)]
pub struct AnnealResult<V: Clone> {
    /// The final accepted candidate.
    ///
    /// This is where the chain ended, not necessarily the lowest cost seen;
    /// see [`best`](Self::best) for that.
    pub solution: Vec<V>,

    /// Cost of `solution`.
    pub cost: f64,

    /// Lowest-cost candidate accepted during the run (including the initial
    /// one).
    pub best: Vec<V>,

    /// Cost of `best`.
    pub best_cost: f64,

    /// Iteration at which `best` was accepted; `None` for the initial state.
    pub best_iteration: Option<usize>,

    /// Iterations completed.
    pub iterations: usize,

    /// Cost function calls, including the initial evaluation.
    pub evaluations: usize,

    /// Number of accepted moves (including improvements).
    pub accepted_moves: usize,

    /// Number of strictly improving moves.
    pub improving_moves: usize,

    /// Temperature of the last completed iteration.
    pub final_temperature: f64,

    /// Whether cancelled externally.
    pub cancelled: bool,
}

/// Minimizes `cost` over `domain`.
///
/// Shorthand for [`AnnealRunner::run`] with the cost function first.
///
/// # Examples
///
/// ```
/// use u_anneal::sa::{minimize, AnnealConfig, Discrete};
///
/// let domain = Discrete::new(vec![vec![1, 2, 3]; 4]);
/// let config = AnnealConfig::default()
///     .with_init_temp(10.0)
///     .with_final_temp(0.01)
///     .with_niter(2000)
///     .with_init_visit_scale(2.0)
///     .with_min_visit_scale(1.0)
///     .with_seed(3);
/// let result = minimize(|x: &[i32]| x.iter().sum::<i32>() as f64, &domain, &config).unwrap();
/// assert_eq!(result.best_cost, 4.0);
/// ```
pub fn minimize<D, F>(
    cost: F,
    domain: &D,
    config: &AnnealConfig,
) -> Result<AnnealResult<D::Value>, ConfigError>
where
    D: SearchDomain,
    F: FnMut(&[D::Value]) -> f64,
{
    AnnealRunner::run(domain, config, cost)
}

/// Executes the Simulated Annealing algorithm.
pub struct AnnealRunner;

impl AnnealRunner {
    /// Runs SA optimization with an infallible cost function.
    pub fn run<D, F>(
        domain: &D,
        config: &AnnealConfig,
        cost: F,
    ) -> Result<AnnealResult<D::Value>, ConfigError>
    where
        D: SearchDomain,
        F: FnMut(&[D::Value]) -> f64,
    {
        Self::run_with_cancel(domain, config, cost, None)
    }

    /// Runs SA with an optional cancellation token, polled before each
    /// iteration.
    pub fn run_with_cancel<D, F>(
        domain: &D,
        config: &AnnealConfig,
        mut cost: F,
        cancel: Option<Arc<AtomicBool>>,
    ) -> Result<AnnealResult<D::Value>, ConfigError>
    where
        D: SearchDomain,
        F: FnMut(&[D::Value]) -> f64,
    {
        let mut rng = config.rng();
        Self::try_run_with(
            domain,
            config,
            |x: &[D::Value]| Ok::<_, Infallible>(cost(x)),
            &mut rng,
            &mut NoTrace,
            cancel.as_deref(),
        )
        .map_err(|e| match e {
            AnnealError::Config(e) => e,
            AnnealError::Cost(never) => match never {},
        })
    }

    /// Runs SA with a fallible cost function.
    ///
    /// The first cost function error aborts the run and is returned as
    /// [`AnnealError::Cost`].
    pub fn try_run<D, F, E>(
        domain: &D,
        config: &AnnealConfig,
        cost: F,
    ) -> Result<AnnealResult<D::Value>, AnnealError<E>>
    where
        D: SearchDomain,
        F: FnMut(&[D::Value]) -> Result<f64, E>,
    {
        let mut rng = config.rng();
        Self::try_run_with(domain, config, cost, &mut rng, &mut NoTrace, None)
    }

    /// Runs SA with a caller-supplied generator, trace sink and optional
    /// cancellation flag.
    ///
    /// `config.seed` is ignored here; the caller owns the generator.
    pub fn try_run_with<D, F, E, R>(
        domain: &D,
        config: &AnnealConfig,
        mut cost: F,
        rng: &mut R,
        trace: &mut dyn TraceSink<D::Value>,
        cancel: Option<&AtomicBool>,
    ) -> Result<AnnealResult<D::Value>, AnnealError<E>>
    where
        D: SearchDomain,
        F: FnMut(&[D::Value]) -> Result<f64, E>,
        R: Rng,
    {
        config.validate()?;
        domain.validate()?;
        if config.final_temp >= config.init_temp {
            warn!(
                init_temp = config.init_temp,
                final_temp = config.final_temp,
                "final_temp is not below init_temp; the schedule does not cool"
            );
        }

        let schedule = Schedule::new(config);
        info!(
            kind = ?domain.kind(),
            dim = domain.dim(),
            niter = config.niter,
            decay = ?config.decay_type,
            "starting simulated annealing"
        );

        // Initialize
        let mut current = domain.sample(rng);
        let mut current_cost = cost(&current).map_err(AnnealError::Cost)?;
        let mut best = current.clone();
        let mut best_cost = current_cost;
        let mut best_iteration = None;

        let mut iterations = 0usize;
        let mut accepted_moves = 0usize;
        let mut improving_moves = 0usize;
        let mut final_temperature = config.init_temp;
        let mut cancelled = false;

        for k in 0..config.niter {
            if cancel.is_some_and(|flag| flag.load(Ordering::Relaxed)) {
                cancelled = true;
                break;
            }

            let temperature = schedule.temperature(k);
            let visit_scale = schedule.visit_scale(temperature);

            let candidate = domain.visit(&current, visit_scale, rng);
            let candidate_cost = cost(&candidate).map_err(AnnealError::Cost)?;
            let delta = candidate_cost - current_cost;

            // Boltzmann acceptance criterion
            let probability = acceptance_probability(delta, temperature);
            let random_draw: f64 = rng.random();
            let accepted = is_accepted(probability, random_draw);

            let record = TraceRecord {
                iteration: k,
                temperature,
                visit_scale,
                current,
                current_cost,
                candidate,
                candidate_cost,
                acceptance_probability: probability,
                random_draw,
                accepted,
                timestamp: Local::now(),
            };
            if let Err(e) = trace.record(&record) {
                warn!(iteration = k, error = %e, "failed to write trace record");
            }
            let TraceRecord {
                current: previous,
                candidate,
                ..
            } = record;

            if accepted {
                if delta < 0.0 {
                    improving_moves += 1;
                }
                current = candidate;
                current_cost = candidate_cost;
                accepted_moves += 1;

                if current_cost < best_cost {
                    best.clone_from(&current);
                    best_cost = current_cost;
                    best_iteration = Some(k);
                }
            } else {
                current = previous;
            }

            iterations += 1;
            final_temperature = temperature;
        }

        if let Err(e) = trace.finish() {
            warn!(error = %e, "failed to finish trace");
        }

        debug!(
            iterations,
            accepted_moves, improving_moves, cancelled, "annealing loop finished"
        );
        info!(cost = current_cost, best_cost, "simulated annealing done");

        Ok(AnnealResult {
            solution: current,
            cost: current_cost,
            best,
            best_cost,
            best_iteration,
            iterations,
            evaluations: iterations + 1,
            accepted_moves,
            improving_moves,
            final_temperature,
            cancelled,
        })
    }
}
