//! Target evaluation for skirmish units.
//!
//! This crate scores (attacker, candidate target) pairs and picks targets:
//!
//! 1. **Feature Extraction** ([`feature`]) - Describes a pair with five hand-crafted
//!    numbers (bias, distance, health difference, contested count, reciprocal targeting).
//!
//! 2. **Q Function** ([`q_function`]) - Scores a pair as the dot product of a weight
//!    vector and its features, and moves the weights with TD(0) updates.
//!
//! 3. **Policy** ([`policy`]) - Picks one target per unit, greedily or with
//!    epsilon-greedy exploration.
//!
//! 4. **Reward** ([`reward`]) - Scores what happened to a unit on the previous turn.
//!
//! # Architecture
//!
//! ```text
//! Policy (pick a target)
//!     ↓ uses
//! LinearQFunction (score a pair)
//!     ↓ uses
//! FeatureExtractor (describe a pair)
//!     ↓ reads
//! StateView + HistoryView + Roster + TargetMemory
//! ```
//!
//! # Supporting Modules
//!
//! - [`combatant`] - Resolves a unit id to either a live snapshot or the dead state
//! - [`roster`] - Own and enemy ids of the current episode, with batched removals
//! - [`memory`] - Who each unit was last seen going after
//!
//! # Example
//!
//! ```rust
//! use skirmish_engine::{HistoryView, Position, Side, StateView, UnitId, UnitView};
//! use skirmish_evaluator::{
//!     feature::{DecisionContext, FeatureExtractor},
//!     memory::TargetMemory,
//!     q_function::{LinearQFunction, WeightVector},
//!     roster::Roster,
//! };
//!
//! let state = StateView::new(
//!     0,
//!     [
//!         UnitView { id: UnitId(0), side: Side::Own, position: Position::new(0, 0), hp: 10 },
//!         UnitView { id: UnitId(1), side: Side::Enemy, position: Position::new(3, 1), hp: 4 },
//!     ],
//! );
//! let history = HistoryView::new();
//! let mut roster = Roster::new();
//! roster.populate(&state);
//! let targets = TargetMemory::new();
//! let ctx = DecisionContext {
//!     state: &state,
//!     history: &history,
//!     roster: &roster,
//!     targets: &targets,
//!     issued: &[],
//! };
//!
//! let features = FeatureExtractor::new().extract(&ctx, UnitId(0), UnitId(1));
//! let q = LinearQFunction::new(WeightVector::new(vec![0.0, 1.0, 1.0, 1.0, 1.0]).unwrap());
//! assert_eq!(q.evaluate(&features), Ok(10.0));
//! ```
//!
//! # Current Limitations
//!
//! - **Raw features**: Nothing is normalized, so distance and health difference
//!   dominate the Q value.
//! - **Linear model**: Feature interactions cannot be expressed.
//! - **Partial view of enemies**: Enemy intentions are only inferred from damage they dealt.

pub mod combatant;
pub mod feature;
pub mod memory;
pub mod policy;
pub mod q_function;
pub mod reward;
pub mod roster;
