use skirmish_engine::{HistoryView, StateView};
use skirmish_evaluator::roster::Roster;

/// Decides on which turns new targets are handed out.
///
/// Orders stay in force while the engine is still carrying them out, so the
/// controller only re-plans when something worth reacting to happened on the
/// previous turn:
///
/// - an own unit finished its order or got stuck, or
/// - any unit died.
///
/// The first turn of an episode always is a decision epoch.
#[derive(Debug, Clone, Copy, Default)]
pub struct EventDetector;

impl EventDetector {
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    #[must_use]
    pub fn is_decision_epoch(
        &self,
        state: &StateView,
        history: &HistoryView,
        roster: &Roster,
    ) -> bool {
        let Some(last_turn) = state.previous_turn() else {
            return true;
        };
        let order_settled = history.command_feedback(Some(last_turn)).any(|(id, fb)| {
            roster.side_of(id).is_some_and(|side| side.is_own())
                && (fb.is_completed() || fb.is_stuck())
        });
        order_settled || !history.death_logs(Some(last_turn)).is_empty()
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use skirmish_engine::{ActionFeedback, DeathLog, Position, Side, TurnLog, UnitId, UnitView};

    use super::*;

    fn setup() -> (StateView, Roster) {
        let unit = |id, side| UnitView {
            id: UnitId(id),
            side,
            position: Position::ORIGIN,
            hp: 10,
        };
        let state = StateView::new(0, [unit(0, Side::Own), unit(1, Side::Enemy)]);
        let mut roster = Roster::new();
        roster.populate(&state);
        (StateView::new(1, state.units().copied()), roster)
    }

    fn history_with(log: TurnLog) -> HistoryView {
        let mut history = HistoryView::new();
        history.push_turn(log);
        history
    }

    fn feedback(id: u32, fb: ActionFeedback) -> TurnLog {
        TurnLog {
            command_feedback: BTreeMap::from([(UnitId(id), fb)]),
            ..TurnLog::default()
        }
    }

    #[test]
    fn test_first_turn_is_epoch() {
        let (state, roster) = setup();
        let first = StateView::new(0, state.units().copied());
        assert!(EventDetector::new().is_decision_epoch(&first, &HistoryView::new(), &roster));
    }

    #[test]
    fn test_settled_orders_trigger_epoch() {
        let (state, roster) = setup();
        let detector = EventDetector::new();
        for fb in [ActionFeedback::Completed, ActionFeedback::Stuck] {
            let history = history_with(feedback(0, fb));
            assert!(detector.is_decision_epoch(&state, &history, &roster), "{fb:?}");
        }
        for fb in [ActionFeedback::Incomplete, ActionFeedback::Failed] {
            let history = history_with(feedback(0, fb));
            assert!(!detector.is_decision_epoch(&state, &history, &roster), "{fb:?}");
        }
    }

    #[test]
    fn test_enemy_feedback_is_ignored() {
        let (state, roster) = setup();
        let history = history_with(feedback(1, ActionFeedback::Completed));
        assert!(!EventDetector::new().is_decision_epoch(&state, &history, &roster));
    }

    #[test]
    fn test_any_death_triggers_epoch() {
        let (state, roster) = setup();
        let history = history_with(TurnLog {
            deaths: vec![DeathLog {
                unit: UnitId(7),
                side: Side::Enemy,
            }],
            ..TurnLog::default()
        });
        assert!(EventDetector::new().is_decision_epoch(&state, &history, &roster));
    }

    #[test]
    fn test_quiet_turn_is_not_epoch() {
        let (state, roster) = setup();
        let history = history_with(TurnLog::default());
        assert!(!EventDetector::new().is_decision_epoch(&state, &history, &roster));
    }
}
