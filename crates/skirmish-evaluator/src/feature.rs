//! Feature extraction for (attacker, candidate target) pairs.
//!
//! Every candidate target is described by the same five numbers, in a fixed
//! order that the weight vector relies on:
//!
//! | index | feature | value |
//! |---|---|---|
//! | 0 | [`FeatureKind::Bias`] | always `1.0` |
//! | 1 | [`FeatureKind::Distance`] | Chebyshev distance `max(|dx|, |dy|)` |
//! | 2 | [`FeatureKind::HealthDifference`] | `attacker.hp - defender.hp` |
//! | 3 | [`FeatureKind::ContestedTarget`] | other own units already sent at the defender this turn |
//! | 4 | [`FeatureKind::Reciprocal`] | `-1.0` if the defender is going after the attacker, else `1.0` |
//!
//! Dead or unknown units take part as [`Combatant::Dead`], i.e. at the origin
//! with zero health.
//!
//! The raw values are not normalized. Distance and health difference can be
//! an order of magnitude larger than the other features and dominate both
//! the Q value and the size of TD updates.

use std::ops::Index;

use serde::{Deserialize, Serialize};
use skirmish_engine::{AttackOrder, HistoryView, StateView, UnitId};

use crate::{combatant::Combatant, memory::TargetMemory, roster::Roster};

/// Number of features per (attacker, target) pair.
pub const FEATURE_COUNT: usize = FeatureKind::ALL.len();

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FeatureKind {
    Bias,
    Distance,
    HealthDifference,
    ContestedTarget,
    Reciprocal,
}

impl FeatureKind {
    /// All features, in weight-vector order.
    pub const ALL: [FeatureKind; 5] = [
        FeatureKind::Bias,
        FeatureKind::Distance,
        FeatureKind::HealthDifference,
        FeatureKind::ContestedTarget,
        FeatureKind::Reciprocal,
    ];

    #[must_use]
    pub const fn index(self) -> usize {
        self as usize
    }

    #[must_use]
    pub const fn id(self) -> &'static str {
        match self {
            FeatureKind::Bias => "bias",
            FeatureKind::Distance => "distance",
            FeatureKind::HealthDifference => "health_difference",
            FeatureKind::ContestedTarget => "contested_target",
            FeatureKind::Reciprocal => "reciprocal",
        }
    }

    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            FeatureKind::Bias => "Bias",
            FeatureKind::Distance => "Chebyshev Distance",
            FeatureKind::HealthDifference => "Health Difference",
            FeatureKind::ContestedTarget => "Contested Target Count",
            FeatureKind::Reciprocal => "Reciprocal Targeting",
        }
    }

    fn compute(self, pair: &PairAnalysis) -> f64 {
        match self {
            FeatureKind::Bias => 1.0,
            FeatureKind::Distance => f64::from(
                pair.attacker
                    .position()
                    .chebyshev_distance(pair.defender.position()),
            ),
            FeatureKind::HealthDifference => {
                f64::from(pair.attacker.hp()) - f64::from(pair.defender.hp())
            }
            FeatureKind::ContestedTarget => f64::from(pair.contested_count),
            FeatureKind::Reciprocal => {
                if pair.defender_targets_attacker {
                    -1.0
                } else {
                    1.0
                }
            }
        }
    }
}

/// Feature values of one (attacker, target) pair, in [`FeatureKind::ALL`] order.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FeatureVector([f64; FEATURE_COUNT]);

impl FeatureVector {
    /// Stand-in for "no previous decision on record".
    pub const ZERO: Self = Self([0.0; FEATURE_COUNT]);

    #[must_use]
    pub const fn new(values: [f64; FEATURE_COUNT]) -> Self {
        Self(values)
    }

    #[must_use]
    pub fn as_slice(&self) -> &[f64] {
        &self.0
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl Index<FeatureKind> for FeatureVector {
    type Output = f64;

    fn index(&self, kind: FeatureKind) -> &f64 {
        &self.0[kind.index()]
    }
}

impl From<[f64; FEATURE_COUNT]> for FeatureVector {
    fn from(values: [f64; FEATURE_COUNT]) -> Self {
        Self(values)
    }
}

/// Everything feature extraction may look at while a turn is being decided.
#[derive(Debug, Clone, Copy)]
pub struct DecisionContext<'a> {
    pub state: &'a StateView,
    pub history: &'a HistoryView,
    pub roster: &'a Roster,
    pub targets: &'a TargetMemory,
    /// Orders already issued during the current turn.
    pub issued: &'a [AttackOrder],
}

/// Resolved inputs for one (attacker, defender) pair.
#[derive(Debug, Clone, Copy)]
struct PairAnalysis {
    attacker: Combatant,
    defender: Combatant,
    contested_count: u32,
    defender_targets_attacker: bool,
}

impl PairAnalysis {
    fn new(ctx: &DecisionContext<'_>, attacker: UnitId, defender: UnitId) -> Self {
        let contested = ctx
            .issued
            .iter()
            .filter(|order| {
                order.target == defender
                    && order.attacker != attacker
                    && ctx.roster.side_of(order.attacker).is_some_and(|s| s.is_own())
            })
            .count();
        Self {
            attacker: Combatant::resolve(attacker, ctx.state, ctx.history),
            defender: Combatant::resolve(defender, ctx.state, ctx.history),
            contested_count: u32::try_from(contested).unwrap_or(u32::MAX),
            defender_targets_attacker: ctx.targets.is_targeting(defender, attacker),
        }
    }
}

/// Computes [`FeatureVector`]s for (attacker, candidate target) pairs.
#[derive(Debug, Clone, Copy, Default)]
pub struct FeatureExtractor;

impl FeatureExtractor {
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    #[must_use]
    pub const fn feature_count(&self) -> usize {
        FEATURE_COUNT
    }

    #[must_use]
    pub fn extract(
        &self,
        ctx: &DecisionContext<'_>,
        attacker: UnitId,
        defender: UnitId,
    ) -> FeatureVector {
        let pair = PairAnalysis::new(ctx, attacker, defender);
        FeatureVector(FeatureKind::ALL.map(|kind| kind.compute(&pair)))
    }
}
