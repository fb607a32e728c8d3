//! Linear state-action value function.
//!
//! Q values are a plain dot product of the weight vector and a
//! [`FeatureVector`]:
//!
//! ```text
//! Q(s, a) = w₀·f₀ + w₁·f₁ + ... + w₄·f₄
//! ```
//!
//! Weights are learned online with one-step temporal-difference updates
//! (semi-gradient TD(0)):
//!
//! ```text
//! wᵢ ← wᵢ + α · (r + γ · max Q(s', a') - Q(s, a)) · fᵢ(s, a)
//! ```
//!
//! with `γ =` [`DISCOUNT`] and `α =` [`LEARNING_RATE`]. There is no gradient
//! clipping or feature scaling, so large raw features move their weights the
//! most.

use crate::feature::{FEATURE_COUNT, FeatureVector};

/// Discount factor `γ` applied to the next state's value.
pub const DISCOUNT: f64 = 0.9;

/// Step size `α` of the TD update.
pub const LEARNING_RATE: f64 = 0.0001;

#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::Display, derive_more::Error)]
#[display("weight vector has {weights} entries but feature vector has {features}")]
pub struct DimensionMismatchError {
    pub weights: usize,
    pub features: usize,
}

/// Dot product of two equally long slices.
///
/// ```
/// use skirmish_evaluator::q_function::dot;
///
/// assert_eq!(dot(&[1.0, 2.0], &[3.0, -1.0]), Ok(1.0));
/// assert!(dot(&[1.0], &[1.0, 2.0]).is_err());
/// ```
pub fn dot(weights: &[f64], features: &[f64]) -> Result<f64, DimensionMismatchError> {
    if weights.len() != features.len() {
        return Err(DimensionMismatchError {
            weights: weights.len(),
            features: features.len(),
        });
    }
    Ok(weights.iter().zip(features).map(|(w, f)| w * f).sum())
}

/// Weights of the linear Q function, one per feature.
///
/// The length is checked against [`FEATURE_COUNT`] on construction, so a
/// `WeightVector` always lines up with the vectors produced by
/// [`FeatureExtractor`](crate::feature::FeatureExtractor).
#[derive(Debug, Clone, PartialEq)]
pub struct WeightVector(Vec<f64>);

impl WeightVector {
    pub fn new(values: Vec<f64>) -> Result<Self, DimensionMismatchError> {
        if values.len() != FEATURE_COUNT {
            return Err(DimensionMismatchError {
                weights: values.len(),
                features: FEATURE_COUNT,
            });
        }
        Ok(Self(values))
    }

    #[must_use]
    pub fn as_slice(&self) -> &[f64] {
        &self.0
    }

    #[must_use]
    pub fn into_vec(self) -> Vec<f64> {
        self.0
    }
}

impl From<[f64; FEATURE_COUNT]> for WeightVector {
    fn from(values: [f64; FEATURE_COUNT]) -> Self {
        Self(values.to_vec())
    }
}

impl TryFrom<Vec<f64>> for WeightVector {
    type Error = DimensionMismatchError;

    fn try_from(values: Vec<f64>) -> Result<Self, Self::Error> {
        Self::new(values)
    }
}

/// Outcome of one TD update, mostly for logging.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TdUpdate {
    /// `Q(s, a)` under the weights before the update.
    pub old_q: f64,
    /// `r + γ · max Q(s', a') - Q(s, a)`.
    pub td_error: f64,
}

#[derive(Debug, Clone)]
pub struct LinearQFunction {
    weights: WeightVector,
}

impl LinearQFunction {
    #[must_use]
    pub fn new(weights: WeightVector) -> Self {
        Self { weights }
    }

    #[must_use]
    pub fn weights(&self) -> &WeightVector {
        &self.weights
    }

    pub fn evaluate(&self, features: &FeatureVector) -> Result<f64, DimensionMismatchError> {
        dot(self.weights.as_slice(), features.as_slice())
    }

    /// Moves the weights toward `reward + γ · next_state_best_q`.
    ///
    /// `old_features` are the features of the action chosen at the previous
    /// decision; the old Q value is computed from the current (not yet
    /// updated) weights. Every weight is updated from the same TD error.
    pub fn update(
        &mut self,
        reward: f64,
        old_features: &FeatureVector,
        next_state_best_q: f64,
    ) -> Result<TdUpdate, DimensionMismatchError> {
        let old_q = self.evaluate(old_features)?;
        let td_error = reward + DISCOUNT * next_state_best_q - old_q;
        for (w, f) in self.weights.0.iter_mut().zip(old_features.as_slice()) {
            *w += LEARNING_RATE * td_error * f;
        }
        Ok(TdUpdate { old_q, td_error })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn q(weights: [f64; FEATURE_COUNT]) -> LinearQFunction {
        LinearQFunction::new(WeightVector::new(weights.to_vec()).unwrap())
    }

    #[test]
    fn test_weight_vector_length_is_checked() {
        let err = WeightVector::new(vec![0.5; 3]).unwrap_err();
        assert_eq!(
            err,
            DimensionMismatchError {
                weights: 3,
                features: FEATURE_COUNT
            }
        );
        assert_eq!(
            err.to_string(),
            "weight vector has 3 entries but feature vector has 5"
        );
        assert!(WeightVector::try_from(vec![0.0; FEATURE_COUNT]).is_ok());
    }

    #[test]
    fn test_evaluate_is_dot_product() {
        let q = q([0.0, 1.0, 1.0, 1.0, 1.0]);
        let features = FeatureVector::new([1.0, 3.0, 6.0, 2.0, -1.0]);
        assert_eq!(q.evaluate(&features), Ok(10.0));

        let q = self::q([0.5, -2.0, 0.25, 4.0, 1.0]);
        let features = FeatureVector::new([1.0, 2.0, 4.0, 0.0, -1.0]);
        assert_eq!(q.evaluate(&features), Ok(0.5 - 4.0 + 1.0 + 0.0 - 1.0));
    }

    #[test]
    fn test_zero_features_leave_weights_unchanged() {
        let mut q = q([0.3, -0.7, 0.1, 0.9, -0.2]);
        let before = q.weights().clone();
        let update = q.update(0.0, &FeatureVector::ZERO, 12.5).unwrap();
        assert_eq!(q.weights(), &before);
        assert_eq!(update.old_q, 0.0);

        // a non-zero reward still cannot move weights with zero features
        q.update(-100.0, &FeatureVector::ZERO, 0.0).unwrap();
        assert_eq!(q.weights(), &before);
    }

    #[test]
    fn test_update_follows_td_rule() {
        let mut q = q([1.0, 0.0, 0.0, 0.0, 0.0]);
        let features = FeatureVector::new([1.0, 2.0, 0.0, 0.0, -1.0]);
        let update = q.update(10.0, &features, 5.0).unwrap();

        // old Q = 1, target = 10 + 0.9 * 5 = 14.5
        assert_eq!(update.old_q, 1.0);
        assert!((update.td_error - 13.5).abs() < 1e-12);
        let step = LEARNING_RATE * 13.5;
        let expected = [1.0 + step, 2.0 * step, 0.0, 0.0, -step];
        for (w, e) in q.weights().as_slice().iter().zip(expected) {
            assert!((w - e).abs() < 1e-12, "{w} != {e}");
        }
    }
}
