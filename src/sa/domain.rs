//! Search domains and the visiting (candidate generation) functions.
//!
//! A domain is either [`Continuous`], a box of `(min, max)` ranges with
//! periodic boundaries, or [`Discrete`], one finite option list per
//! dimension. Both implement the sealed [`SearchDomain`] trait, so the
//! runner handles exactly these two kinds.

use rand::Rng;
use rand_distr::StandardNormal;

use super::error::ConfigError;

mod sealed {
    pub trait Sealed {}
}

/// The two kinds of search domain.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DomainKind {
    Continuous,
    Discrete,
}

/// A space of candidates the annealer can sample and move through.
///
/// A candidate is a `Vec<Self::Value>` with one entry per dimension.
pub trait SearchDomain: sealed::Sealed {
    /// Element type of a candidate.
    type Value: Clone;

    /// Which kind of domain this is.
    fn kind(&self) -> DomainKind;

    /// Number of dimensions.
    fn dim(&self) -> usize;

    /// Checks the domain is usable before a run starts.
    fn validate(&self) -> Result<(), ConfigError>;

    /// Draws a candidate uniformly from the domain.
    fn sample<R: Rng>(&self, rng: &mut R) -> Vec<Self::Value>;

    /// Generates a new candidate from `current`.
    ///
    /// `visit_scale` is the Gaussian standard deviation for continuous
    /// domains and the swap count (rounded) for discrete ones.
    fn visit<R: Rng>(
        &self,
        current: &[Self::Value],
        visit_scale: f64,
        rng: &mut R,
    ) -> Vec<Self::Value>;

    /// Whether every entry of `candidate` lies in its dimension.
    fn contains(&self, candidate: &[Self::Value]) -> bool;
}

/// Closed interval `[min, max]` of one continuous dimension.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub min: f64,
    pub max: f64,
}

impl Bounds {
    pub fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    pub fn width(&self) -> f64 {
        self.max - self.min
    }

    pub fn contains(&self, x: f64) -> bool {
        x >= self.min && x <= self.max
    }

    /// Folds `x` back into the interval as if its ends were joined.
    ///
    /// In-range values are returned unchanged. Out-of-range values map to
    /// `min + (x - min) mod (max - min)`. A non-finite `x` (an overflowed
    /// step) has no position on the circle and maps to `max`.
    ///
    /// ```
    /// use u_anneal::sa::Bounds;
    ///
    /// let b = Bounds::new(2.0, 8.0);
    /// assert_eq!(b.periodic_wrap(-2.0), 4.0);
    /// assert_eq!(b.periodic_wrap(17.0), 5.0);
    /// assert_eq!(b.periodic_wrap(8.0), 8.0);
    /// ```
    pub fn periodic_wrap(&self, x: f64) -> f64 {
        if self.contains(x) {
            return x;
        }
        if !x.is_finite() {
            return self.max;
        }
        let wrapped = self.min + (x - self.min).rem_euclid(self.width());
        // rem_euclid may round up to the full width for tiny negatives
        wrapped.min(self.max)
    }
}

impl From<(f64, f64)> for Bounds {
    fn from((min, max): (f64, f64)) -> Self {
        Self::new(min, max)
    }
}

/// Continuous domain: one [`Bounds`] per dimension, with wrap-around edges.
///
/// # Examples
///
/// ```
/// use u_anneal::sa::{Continuous, SearchDomain};
///
/// let domain = Continuous::new([(-5.0, 5.0), (-5.0, 5.0)]);
/// assert_eq!(domain.dim(), 2);
/// assert!(domain.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Continuous {
    bounds: Vec<Bounds>,
}

impl Continuous {
    pub fn new<I, B>(bounds: I) -> Self
    where
        I: IntoIterator<Item = B>,
        B: Into<Bounds>,
    {
        Self {
            bounds: bounds.into_iter().map(Into::into).collect(),
        }
    }

    pub fn bounds(&self) -> &[Bounds] {
        &self.bounds
    }
}

impl sealed::Sealed for Continuous {}

impl SearchDomain for Continuous {
    type Value = f64;

    fn kind(&self) -> DomainKind {
        DomainKind::Continuous
    }

    fn dim(&self) -> usize {
        self.bounds.len()
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.bounds.is_empty() {
            return Err(ConfigError::EmptyDomain);
        }
        for (dim, b) in self.bounds.iter().enumerate() {
            if !b.min.is_finite() || !b.max.is_finite() || !b.width().is_finite() {
                return Err(ConfigError::NonFiniteBounds {
                    dim,
                    min: b.min,
                    max: b.max,
                });
            }
            if b.min >= b.max {
                return Err(ConfigError::InvalidBounds {
                    dim,
                    min: b.min,
                    max: b.max,
                });
            }
        }
        Ok(())
    }

    fn sample<R: Rng>(&self, rng: &mut R) -> Vec<f64> {
        self.bounds
            .iter()
            .map(|b| rng.random_range(b.min..b.max))
            .collect()
    }

    fn visit<R: Rng>(&self, current: &[f64], visit_scale: f64, rng: &mut R) -> Vec<f64> {
        current
            .iter()
            .zip(&self.bounds)
            .map(|(&x, b)| {
                let z: f64 = rng.sample(StandardNormal);
                b.periodic_wrap(x + visit_scale * z)
            })
            .collect()
    }

    fn contains(&self, candidate: &[f64]) -> bool {
        candidate.len() == self.bounds.len()
            && candidate
                .iter()
                .zip(&self.bounds)
                .all(|(&x, b)| b.contains(x))
    }
}

/// Discrete domain: a non-empty option list per dimension.
///
/// Options can be any clonable, comparable type.
///
/// # Examples
///
/// ```
/// use u_anneal::sa::{Discrete, SearchDomain};
///
/// let domain = Discrete::new(vec![vec!["a", "b", "c"], vec!["u", "v"]]);
/// assert_eq!(domain.dim(), 2);
/// assert!(domain.contains(&["b", "v"]));
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Discrete<T> {
    options: Vec<Vec<T>>,
}

impl<T> Discrete<T> {
    pub fn new(options: Vec<Vec<T>>) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &[Vec<T>] {
        &self.options
    }
}

impl<T: Clone + PartialEq> sealed::Sealed for Discrete<T> {}

impl<T: Clone + PartialEq> SearchDomain for Discrete<T> {
    type Value = T;

    fn kind(&self) -> DomainKind {
        DomainKind::Discrete
    }

    fn dim(&self) -> usize {
        self.options.len()
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.options.is_empty() {
            return Err(ConfigError::EmptyDomain);
        }
        match self.options.iter().position(Vec::is_empty) {
            Some(dim) => Err(ConfigError::EmptyOptions { dim }),
            None => Ok(()),
        }
    }

    fn sample<R: Rng>(&self, rng: &mut R) -> Vec<T> {
        self.options.iter().map(|opts| pick(opts, rng)).collect()
    }

    /// Overwrites a random dimension with a random option, `round(visit_scale)`
    /// times. The same dimension may be hit more than once, and a swap may
    /// pick the value already there.
    fn visit<R: Rng>(&self, current: &[T], visit_scale: f64, rng: &mut R) -> Vec<T> {
        let mut candidate = current.to_vec();
        if candidate.is_empty() {
            return candidate;
        }
        let swaps = visit_scale.round_ties_even().max(0.0) as usize;
        for _ in 0..swaps {
            let index = rng.random_range(0..candidate.len());
            candidate[index] = pick(&self.options[index], rng);
        }
        candidate
    }

    fn contains(&self, candidate: &[T]) -> bool {
        candidate.len() == self.options.len()
            && candidate
                .iter()
                .zip(&self.options)
                .all(|(v, opts)| opts.contains(v))
    }
}

/// Uniform choice from a validated, non-empty option list.
fn pick<T: Clone, R: Rng>(options: &[T], rng: &mut R) -> T {
    options[rng.random_range(0..options.len())].clone()
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_periodic_wrap_examples() {
        let b = Bounds::new(2.0, 8.0);
        let xs = [-2.0, 17.0, 8.0, 9.0, 2.0, 1.0];
        let wrapped: Vec<f64> = xs.iter().map(|&x| b.periodic_wrap(x)).collect();
        assert_eq!(wrapped, vec![4.0, 5.0, 8.0, 3.0, 2.0, 7.0]);
    }

    #[test]
    fn test_periodic_wrap_near_edges() {
        let b = Bounds::new(-5.0, 5.0);
        let eps = 1e-9;
        for x in [b.min - eps, b.max + eps, -1e-300 - 5.0] {
            let w = b.periodic_wrap(x);
            assert!(b.contains(w), "{x} wrapped to {w}");
        }
    }

    #[test]
    fn test_periodic_wrap_non_finite_maps_to_max() {
        let b = Bounds::new(-5.0, 5.0);
        assert_eq!(b.periodic_wrap(f64::INFINITY), 5.0);
        assert_eq!(b.periodic_wrap(f64::NEG_INFINITY), 5.0);
        assert_eq!(b.periodic_wrap(f64::NAN), 5.0);
    }

    #[test]
    fn test_continuous_visit_overflowing_step_stays_in_domain() {
        let domain = Continuous::new([(-5.0, 5.0); 3]);
        let mut rng = StdRng::seed_from_u64(17);
        let x = domain.visit(&[0.0, 1.0, -1.0], f64::MAX, &mut rng);
        assert!(domain.contains(&x), "{x:?}");
    }

    #[test]
    fn test_continuous_validation() {
        assert_eq!(
            Continuous::new(Vec::<(f64, f64)>::new()).validate(),
            Err(ConfigError::EmptyDomain)
        );
        assert!(matches!(
            Continuous::new([(0.0, 1.0), (2.0, 2.0)]).validate(),
            Err(ConfigError::InvalidBounds { dim: 1, .. })
        ));
        assert!(matches!(
            Continuous::new([(3.0, 1.0)]).validate(),
            Err(ConfigError::InvalidBounds { dim: 0, .. })
        ));
        assert!(matches!(
            Continuous::new([(0.0, f64::INFINITY)]).validate(),
            Err(ConfigError::NonFiniteBounds { dim: 0, .. })
        ));
        assert!(matches!(
            Continuous::new([(f64::NAN, 1.0)]).validate(),
            Err(ConfigError::NonFiniteBounds { dim: 0, .. })
        ));
    }

    #[test]
    fn test_discrete_validation() {
        assert_eq!(
            Discrete::<u8>::new(vec![]).validate(),
            Err(ConfigError::EmptyDomain)
        );
        assert_eq!(
            Discrete::new(vec![vec![1, 2], vec![]]).validate(),
            Err(ConfigError::EmptyOptions { dim: 1 })
        );
        assert!(Discrete::new(vec![vec!['x']]).validate().is_ok());
    }

    #[test]
    fn test_continuous_sample_in_domain() {
        let domain = Continuous::new([(-5.0, 5.0), (100.0, 100.5), (-1e-3, 0.0)]);
        let mut rng = StdRng::seed_from_u64(42);
        for _ in 0..1000 {
            assert!(domain.contains(&domain.sample(&mut rng)));
        }
    }

    #[test]
    fn test_discrete_zero_swaps_keeps_candidate() {
        let domain = Discrete::new(vec![vec!["a", "b", "c", "d"]; 5]);
        let mut rng = StdRng::seed_from_u64(1);
        let current = vec!["a"; 5];
        // 0.4 rounds to zero swaps
        assert_eq!(domain.visit(&current, 0.4, &mut rng), current);
    }

    #[test]
    fn test_discrete_swaps_bounded_by_scale() {
        let domain = Discrete::new(vec![vec![0u8, 1]; 20]);
        let mut rng = StdRng::seed_from_u64(3);
        let current = vec![0u8; 20];
        for _ in 0..200 {
            let next = domain.visit(&current, 3.0, &mut rng);
            let changed = next.iter().filter(|&&v| v != 0).count();
            assert!(changed <= 3, "{changed} entries changed by 3 swaps");
        }
    }

    #[test]
    fn test_discrete_visit_ties_to_even() {
        // 2.5 rounds to 2 swaps, so at most 2 dimensions change
        let domain = Discrete::new(vec![vec![0u8, 1]; 50]);
        let mut rng = StdRng::seed_from_u64(9);
        let current = vec![0u8; 50];
        for _ in 0..200 {
            let next = domain.visit(&current, 2.5, &mut rng);
            assert!(next.iter().filter(|&&v| v != 0).count() <= 2);
        }
    }

    proptest! {
        #[test]
        fn prop_wrap_in_range_is_identity(min in -1e6f64..1e6, width in 1e-3f64..1e6, t in 0.0f64..=1.0) {
            let b = Bounds::new(min, min + width);
            let x = (b.min + t * width).min(b.max);
            prop_assert_eq!(b.periodic_wrap(x), x);
        }

        #[test]
        fn prop_wrap_lands_in_range_and_is_idempotent(min in -1e3f64..1e3, width in 1e-2f64..1e3, x in -1e7f64..1e7) {
            let b = Bounds::new(min, min + width);
            let once = b.periodic_wrap(x);
            prop_assert!(b.contains(once), "{} -> {} outside [{}, {}]", x, once, b.min, b.max);
            prop_assert_eq!(b.periodic_wrap(once), once);
        }

        #[test]
        fn prop_continuous_visit_stays_in_domain(seed in any::<u64>(), scale in 1e-3f64..1e4) {
            let domain = Continuous::new([(-5.0, 5.0), (0.0, 1.0), (-1e3, 2e3)]);
            let mut rng = StdRng::seed_from_u64(seed);
            let mut x = domain.sample(&mut rng);
            for _ in 0..50 {
                x = domain.visit(&x, scale, &mut rng);
                prop_assert!(domain.contains(&x), "{:?} escaped the domain", x);
            }
        }

        #[test]
        fn prop_discrete_visit_stays_in_domain(seed in any::<u64>(), scale in 0.0f64..40.0) {
            let domain = Discrete::new(vec![
                vec!["a".to_string(), "b".to_string()],
                vec!["x".to_string()],
                vec!["p".to_string(), "q".to_string(), "r".to_string()],
            ]);
            let mut rng = StdRng::seed_from_u64(seed);
            let mut x = domain.sample(&mut rng);
            prop_assert!(domain.contains(&x));
            for _ in 0..50 {
                x = domain.visit(&x, scale, &mut rng);
                prop_assert!(domain.contains(&x), "{:?} escaped the domain", x);
            }
        }
    }
}
