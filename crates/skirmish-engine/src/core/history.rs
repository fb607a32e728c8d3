use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::unit::{Side, UnitId};

/// An order for `attacker` to close in on `target` and attack it until either
/// unit dies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AttackOrder {
    pub attacker: UnitId,
    pub target: UnitId,
}

impl AttackOrder {
    #[must_use]
    pub const fn new(attacker: UnitId, target: UnitId) -> Self {
        Self { attacker, target }
    }
}

/// One hit landed during a turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DamageLog {
    pub attacker: UnitId,
    pub defender: UnitId,
    pub damage: u32,
}

/// One unit removed from the battlefield during a turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeathLog {
    pub unit: UnitId,
    pub side: Side,
}

/// Progress of a unit's standing order at the end of a turn.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, derive_more::IsVariant,
)]
#[serde(rename_all = "snake_case")]
pub enum ActionFeedback {
    /// The order is finished (its target is gone).
    Completed,
    /// The unit could not make progress this turn and may be blocked.
    Stuck,
    /// The order is still being carried out.
    Incomplete,
    /// The order could not be carried out at all (e.g. unknown target).
    Failed,
}

/// Everything the host recorded about a single turn.
#[derive(Debug, Clone, Default)]
pub struct TurnLog {
    pub damage: Vec<DamageLog>,
    pub deaths: Vec<DeathLog>,
    pub command_feedback: BTreeMap<UnitId, ActionFeedback>,
    pub commands_issued: BTreeMap<UnitId, AttackOrder>,
}

/// Per-turn event history of the current episode.
///
/// Queries for a turn that has not been recorded (including "the turn before
/// turn 0") return empty results rather than failing.
#[derive(Debug, Clone, Default)]
pub struct HistoryView {
    turns: Vec<TurnLog>,
}

impl HistoryView {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends the log of the next turn.
    pub fn push_turn(&mut self, log: TurnLog) {
        self.turns.push(log);
    }

    /// Number of turns recorded so far.
    #[must_use]
    pub fn len(&self) -> usize {
        self.turns.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }

    fn turn_log(&self, turn: Option<u32>) -> Option<&TurnLog> {
        let index = usize::try_from(turn?).ok()?;
        self.turns.get(index)
    }

    #[must_use]
    pub fn damage_logs(&self, turn: Option<u32>) -> &[DamageLog] {
        self.turn_log(turn).map_or(&[], |log| &log.damage)
    }

    #[must_use]
    pub fn death_logs(&self, turn: Option<u32>) -> &[DeathLog] {
        self.turn_log(turn).map_or(&[], |log| &log.deaths)
    }

    /// Whether `unit` appears in the death log of `turn`.
    #[must_use]
    pub fn died_on(&self, unit: UnitId, turn: Option<u32>) -> bool {
        self.death_logs(turn).iter().any(|d| d.unit == unit)
    }

    pub fn command_feedback(
        &self,
        turn: Option<u32>,
    ) -> impl Iterator<Item = (UnitId, ActionFeedback)> + '_ {
        self.turn_log(turn)
            .into_iter()
            .flat_map(|log| log.command_feedback.iter().map(|(id, fb)| (*id, *fb)))
    }

    #[must_use]
    pub fn command_issued(&self, unit: UnitId, turn: Option<u32>) -> Option<&AttackOrder> {
        self.turn_log(turn)?.commands_issued.get(&unit)
    }
}
