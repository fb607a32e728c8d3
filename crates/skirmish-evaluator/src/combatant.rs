//! Alive/dead resolution of the units a decision refers to.
//!
//! Features and rewards regularly look at units that are already gone: the
//! target an attacker was chasing, or the attacker itself on the turn after it
//! fell. Instead of failing, such units resolve to [`Combatant::Dead`], which
//! reads as position origin and zero health where a number is needed.

use skirmish_engine::{HistoryView, Position, StateView, UnitId, UnitView};

#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::IsVariant)]
pub enum Combatant {
    Alive(UnitView),
    Dead(UnitId),
}

impl Combatant {
    /// Resolves `id` against the current snapshot.
    ///
    /// A unit is dead if the death log of the previous turn names it, or if
    /// the snapshot no longer contains it.
    #[must_use]
    pub fn resolve(id: UnitId, state: &StateView, history: &HistoryView) -> Self {
        if history.died_on(id, state.previous_turn()) {
            return Combatant::Dead(id);
        }
        match state.unit(id) {
            Some(view) => Combatant::Alive(*view),
            None => Combatant::Dead(id),
        }
    }

    #[must_use]
    pub fn id(&self) -> UnitId {
        match self {
            Combatant::Alive(view) => view.id,
            Combatant::Dead(id) => *id,
        }
    }

    #[must_use]
    pub fn position(&self) -> Position {
        match self {
            Combatant::Alive(view) => view.position,
            Combatant::Dead(_) => Position::ORIGIN,
        }
    }

    #[must_use]
    pub fn hp(&self) -> u32 {
        match self {
            Combatant::Alive(view) => view.hp,
            Combatant::Dead(_) => 0,
        }
    }
}

#[cfg(test)]
mod tests {
    use skirmish_engine::{DeathLog, Side, TurnLog};

    use super::*;

    fn view(id: u32, x: i32, y: i32, hp: u32) -> UnitView {
        UnitView {
            id: UnitId(id),
            side: Side::Enemy,
            position: Position::new(x, y),
            hp,
        }
    }

    #[test]
    fn test_visible_unit_is_alive() {
        let state = StateView::new(0, [view(1, 4, 2, 9)]);
        let c = Combatant::resolve(UnitId(1), &state, &HistoryView::new());
        assert!(c.is_alive());
        assert_eq!(c.position(), Position::new(4, 2));
        assert_eq!(c.hp(), 9);
    }

    #[test]
    fn test_unknown_unit_is_dead() {
        let state = StateView::new(0, []);
        let c = Combatant::resolve(UnitId(3), &state, &HistoryView::new());
        assert_eq!(c, Combatant::Dead(UnitId(3)));
        assert_eq!(c.position(), Position::ORIGIN);
        assert_eq!(c.hp(), 0);
    }

    #[test]
    fn test_death_log_wins_over_snapshot() {
        let state = StateView::new(1, [view(1, 4, 2, 9)]);
        let mut history = HistoryView::new();
        history.push_turn(TurnLog {
            deaths: vec![DeathLog {
                unit: UnitId(1),
                side: Side::Enemy,
            }],
            ..TurnLog::default()
        });
        let c = Combatant::resolve(UnitId(1), &state, &history);
        assert!(c.is_dead());
        assert_eq!(c.id(), UnitId(1));
    }
}
