//! Epsilon-greedy target selection.
//!
//! # Greedy Choice
//!
//! The greedy target is the candidate with the highest Q value, starting from
//! a baseline of `0.0` with the first candidate as the default. A candidate
//! only replaces the current best if its Q value is strictly greater, so ties
//! go to the earlier candidate, and when every Q value is `<= 0.0` the first
//! candidate is chosen.
//!
//! # Exploration
//!
//! One number `r` is drawn uniformly from `[0, 1)`. If `r > ε` the greedy
//! target is returned. Otherwise the same `r` picks the candidate at index
//! `round(r · n)`, clamped to the last index. One call consumes exactly one
//! random number.

use rand::Rng;
use skirmish_engine::UnitId;

use crate::{
    feature::{DecisionContext, FeatureExtractor, FeatureVector},
    q_function::{DimensionMismatchError, LinearQFunction},
};

/// Default exploration probability.
pub const EPSILON: f64 = 0.02;

#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::IsVariant)]
pub enum Exploration {
    /// Draw a random number and explore with probability ε.
    EpsilonGreedy,
    /// Always take the greedy target without drawing.
    Greedy,
}

/// A chosen target together with what was known about it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Selection {
    pub target: UnitId,
    pub q_value: f64,
    pub features: FeatureVector,
    pub explored: bool,
}

#[derive(Debug, Clone, Copy)]
pub struct EpsilonGreedyPolicy {
    epsilon: f64,
}

impl Default for EpsilonGreedyPolicy {
    fn default() -> Self {
        Self::new(EPSILON)
    }
}

impl EpsilonGreedyPolicy {
    #[must_use]
    pub const fn new(epsilon: f64) -> Self {
        Self { epsilon }
    }

    #[must_use]
    pub fn epsilon(&self) -> f64 {
        self.epsilon
    }

    /// Index of the greedy choice among `q_values`, or `None` if empty.
    ///
    /// ```
    /// use skirmish_evaluator::policy::EpsilonGreedyPolicy;
    ///
    /// assert_eq!(EpsilonGreedyPolicy::greedy_index(&[0.5, 2.0, 2.0]), Some(1));
    /// // nothing beats the 0.0 baseline
    /// assert_eq!(EpsilonGreedyPolicy::greedy_index(&[-3.0, -1.0]), Some(0));
    /// ```
    #[must_use]
    pub fn greedy_index(q_values: &[f64]) -> Option<usize> {
        if q_values.is_empty() {
            return None;
        }
        let mut best_value = 0.0;
        let mut best_index = 0;
        for (i, q) in q_values.iter().enumerate() {
            if *q > best_value {
                best_value = *q;
                best_index = i;
            }
        }
        Some(best_index)
    }

    /// Chooses an index among `q_values`.
    ///
    /// Returns the index and whether it came from exploration.
    pub fn select_index<R>(
        &self,
        q_values: &[f64],
        exploration: Exploration,
        rng: &mut R,
    ) -> Option<(usize, bool)>
    where
        R: Rng + ?Sized,
    {
        let greedy = Self::greedy_index(q_values)?;
        if exploration.is_greedy() {
            return Some((greedy, false));
        }
        let r: f64 = rng.random();
        if r > self.epsilon {
            return Some((greedy, false));
        }
        Some((exploration_index(r, q_values.len()), true))
    }

    /// Evaluates every candidate for `attacker` and picks one.
    ///
    /// Returns `Ok(None)` when there are no candidates.
    #[expect(clippy::too_many_arguments)]
    pub fn select_target<R>(
        &self,
        q_function: &LinearQFunction,
        extractor: &FeatureExtractor,
        ctx: &DecisionContext<'_>,
        attacker: UnitId,
        candidates: &[UnitId],
        exploration: Exploration,
        rng: &mut R,
    ) -> Result<Option<Selection>, DimensionMismatchError>
    where
        R: Rng + ?Sized,
    {
        let scored = score_candidates(q_function, extractor, ctx, attacker, candidates)?;
        let q_values: Vec<f64> = scored.iter().map(|(_, q, _)| *q).collect();
        let Some((index, explored)) = self.select_index(&q_values, exploration, rng) else {
            return Ok(None);
        };
        let (target, q_value, features) = scored[index];
        Ok(Some(Selection {
            target,
            q_value,
            features,
            explored,
        }))
    }

    /// The greedy candidate and its Q value, without touching the random
    /// stream. Used as `max Q(s', a')` in TD updates.
    pub fn best_value(
        q_function: &LinearQFunction,
        extractor: &FeatureExtractor,
        ctx: &DecisionContext<'_>,
        attacker: UnitId,
        candidates: &[UnitId],
    ) -> Result<Option<(UnitId, f64)>, DimensionMismatchError> {
        let scored = score_candidates(q_function, extractor, ctx, attacker, candidates)?;
        let q_values: Vec<f64> = scored.iter().map(|(_, q, _)| *q).collect();
        Ok(Self::greedy_index(&q_values).map(|i| (scored[i].0, scored[i].1)))
    }
}

#[expect(
    clippy::cast_possible_truncation,
    clippy::cast_precision_loss,
    clippy::cast_sign_loss
)]
fn exploration_index(r: f64, len: usize) -> usize {
    let index = (r * len as f64).round() as usize;
    index.min(len - 1)
}

fn score_candidates(
    q_function: &LinearQFunction,
    extractor: &FeatureExtractor,
    ctx: &DecisionContext<'_>,
    attacker: UnitId,
    candidates: &[UnitId],
) -> Result<Vec<(UnitId, f64, FeatureVector)>, DimensionMismatchError> {
    candidates
        .iter()
        .map(|&target| {
            let features = extractor.extract(ctx, attacker, target);
            let q = q_function.evaluate(&features)?;
            Ok((target, q, features))
        })
        .collect()
}
