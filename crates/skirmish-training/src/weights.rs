//! Weight vector construction.
//!
//! Fresh controllers start from weights drawn uniformly from `[-1.0, 1.0)`
//! with the controller's own seeded generator, so two controllers built with
//! the same seed start from the same point.

use rand::Rng;
use skirmish_evaluator::{feature::FEATURE_COUNT, q_function::WeightVector};

/// Creates a weight vector by applying a function to each feature index.
///
/// # Examples
///
/// ```
/// use skirmish_training::weights;
///
/// let weights = weights::from_fn(|i| 1.0 / (i as f64 + 1.0));
/// assert_eq!(weights.as_slice(), &[1.0, 0.5, 1.0 / 3.0, 0.25, 0.2]);
/// ```
pub fn from_fn<F>(f: F) -> WeightVector
where
    F: FnMut(usize) -> f64,
{
    WeightVector::from(std::array::from_fn::<f64, FEATURE_COUNT, F>(f))
}

/// Generates a weight vector sampled independently from `[-1.0, 1.0)`.
pub fn random<R>(rng: &mut R) -> WeightVector
where
    R: Rng + ?Sized,
{
    from_fn(|_| rng.random_range(-1.0..1.0))
}
