//! Per-unit reward for the previous turn.
//!
//! ```text
//! attacker died last turn:   reward = -100
//! otherwise:                 reward = kill + dealt - taken + ordered
//!
//! where:
//!   kill    = 30 if the attacker's last target died last turn, else 0
//!   dealt   = damage of the attacker's first hit last turn, else 0
//!   taken   = total damage the attacker received last turn
//!   ordered = 10 if the attacker was given an order last turn, else 0
//! ```
//!
//! The `ordered` bonus does not depend on what the order achieved.

use skirmish_engine::{HistoryView, StateView, UnitId};

use crate::memory::TargetMemory;

pub const DEATH_PENALTY: f64 = -100.0;
pub const KILL_BONUS: f64 = 30.0;
pub const ORDER_BONUS: f64 = 10.0;

/// The terms a reward was built from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RewardBreakdown {
    pub died: bool,
    pub killed_target: bool,
    pub damage_dealt: u32,
    pub damage_taken: u32,
    pub ordered: bool,
}

impl RewardBreakdown {
    #[must_use]
    pub fn total(&self) -> f64 {
        if self.died {
            return DEATH_PENALTY;
        }
        let kill = if self.killed_target { KILL_BONUS } else { 0.0 };
        let ordered = if self.ordered { ORDER_BONUS } else { 0.0 };
        kill + f64::from(self.damage_dealt) - f64::from(self.damage_taken) + ordered
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct RewardModel;

impl RewardModel {
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// Scores what happened to `attacker` on the turn before `state`.
    ///
    /// Every enemy seen damaging `attacker` is recorded in `targets` as going
    /// after it. This also happens when the attacker died, although the
    /// reward is then the death penalty alone.
    pub fn evaluate(
        &self,
        attacker: UnitId,
        state: &StateView,
        history: &HistoryView,
        targets: &mut TargetMemory,
    ) -> RewardBreakdown {
        let last_turn = state.previous_turn();
        let damage = history.damage_logs(last_turn);

        let mut damage_taken: u32 = 0;
        for hit in damage.iter().filter(|hit| hit.defender == attacker) {
            damage_taken = damage_taken.saturating_add(hit.damage);
            targets.record(hit.attacker, attacker);
        }

        if history.died_on(attacker, last_turn) {
            return RewardBreakdown {
                died: true,
                ..RewardBreakdown::default()
            };
        }

        let killed_target = targets
            .last_target(attacker)
            .is_some_and(|target| history.died_on(target, last_turn));
        let damage_dealt = damage
            .iter()
            .find(|hit| hit.attacker == attacker)
            .map_or(0, |hit| hit.damage);
        let ordered = history.command_issued(attacker, last_turn).is_some();

        RewardBreakdown {
            died: false,
            killed_target,
            damage_dealt,
            damage_taken,
            ordered,
        }
    }

    pub fn reward(
        &self,
        attacker: UnitId,
        state: &StateView,
        history: &HistoryView,
        targets: &mut TargetMemory,
    ) -> f64 {
        self.evaluate(attacker, state, history, targets).total()
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use skirmish_engine::{AttackOrder, DamageLog, DeathLog, Position, Side, TurnLog, UnitView};

    use super::*;

    const ME: UnitId = UnitId(0);
    const FOE: UnitId = UnitId(5);
    const OTHER_FOE: UnitId = UnitId(6);

    fn state(turn: u32) -> StateView {
        StateView::new(
            turn,
            [UnitView {
                id: ME,
                side: Side::Own,
                position: Position::ORIGIN,
                hp: 20,
            }],
        )
    }

    fn history_with(last_turn: TurnLog) -> HistoryView {
        let mut history = HistoryView::new();
        history.push_turn(TurnLog::default());
        history.push_turn(last_turn);
        history
    }

    fn hit(attacker: UnitId, defender: UnitId, damage: u32) -> DamageLog {
        DamageLog {
            attacker,
            defender,
            damage,
        }
    }

    fn death(unit: UnitId, side: Side) -> DeathLog {
        DeathLog { unit, side }
    }

    #[test]
    fn test_death_overrides_everything() {
        let history = history_with(TurnLog {
            damage: vec![hit(ME, FOE, 9), hit(FOE, ME, 4)],
            deaths: vec![death(ME, Side::Own), death(FOE, Side::Enemy)],
            commands_issued: BTreeMap::from([(ME, AttackOrder::new(ME, FOE))]),
            ..TurnLog::default()
        });
        let mut targets = TargetMemory::new();
        targets.record(ME, FOE);

        let reward = RewardModel::new().reward(ME, &state(2), &history, &mut targets);
        assert_eq!(reward, -100.0);
        // the killer is still remembered
        assert_eq!(targets.last_target(FOE), Some(ME));
    }

    #[test]
    fn test_kill_with_damage_and_order() {
        let history = history_with(TurnLog {
            damage: vec![hit(ME, FOE, 7), hit(FOE, ME, 3), hit(OTHER_FOE, ME, 2)],
            deaths: vec![death(FOE, Side::Enemy)],
            commands_issued: BTreeMap::from([(ME, AttackOrder::new(ME, FOE))]),
            ..TurnLog::default()
        });
        let mut targets = TargetMemory::new();
        targets.record(ME, FOE);

        let breakdown = RewardModel::new().evaluate(ME, &state(2), &history, &mut targets);
        assert_eq!(
            breakdown,
            RewardBreakdown {
                died: false,
                killed_target: true,
                damage_dealt: 7,
                damage_taken: 5,
                ordered: true,
            }
        );
        assert_eq!(breakdown.total(), 30.0 + 7.0 - 5.0 + 10.0);
        assert_eq!(targets.last_target(OTHER_FOE), Some(ME));
    }

    #[test]
    fn test_kill_without_order() {
        let history = history_with(TurnLog {
            damage: vec![hit(ME, FOE, 4)],
            deaths: vec![death(FOE, Side::Enemy)],
            ..TurnLog::default()
        });
        let mut targets = TargetMemory::new();
        targets.record(ME, FOE);
        let reward = RewardModel::new().reward(ME, &state(2), &history, &mut targets);
        assert_eq!(reward, 34.0);
    }

    #[test]
    fn test_death_of_someone_else_is_no_kill() {
        let history = history_with(TurnLog {
            deaths: vec![death(OTHER_FOE, Side::Enemy)],
            ..TurnLog::default()
        });
        let mut targets = TargetMemory::new();
        targets.record(ME, FOE);
        let reward = RewardModel::new().reward(ME, &state(2), &history, &mut targets);
        assert_eq!(reward, 0.0);
    }

    #[test]
    fn test_only_first_hit_counts_as_dealt() {
        let history = history_with(TurnLog {
            damage: vec![hit(ME, FOE, 4), hit(ME, OTHER_FOE, 6)],
            ..TurnLog::default()
        });
        let mut targets = TargetMemory::new();
        let reward = RewardModel::new().reward(ME, &state(2), &history, &mut targets);
        assert_eq!(reward, 4.0);
    }

    #[test]
    fn test_damage_taken_saturates() {
        let history = history_with(TurnLog {
            damage: vec![hit(FOE, ME, u32::MAX), hit(OTHER_FOE, ME, 1)],
            ..TurnLog::default()
        });
        let mut targets = TargetMemory::new();
        let breakdown = RewardModel::new().evaluate(ME, &state(2), &history, &mut targets);
        assert_eq!(breakdown.damage_taken, u32::MAX);
        assert_eq!(breakdown.total(), -f64::from(u32::MAX));
        assert_eq!(targets.last_target(OTHER_FOE), Some(ME));
    }

    #[test]
    fn test_first_turn_is_neutral() {
        let mut targets = TargetMemory::new();
        let reward = RewardModel::new().reward(ME, &state(0), &HistoryView::new(), &mut targets);
        assert_eq!(reward, 0.0);
    }
}
