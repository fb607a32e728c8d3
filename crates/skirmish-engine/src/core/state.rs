use std::collections::BTreeMap;

use super::unit::{Side, UnitId, UnitView};

/// The host's view of the battlefield on one turn.
///
/// Only living units are present. A unit that died on an earlier turn is
/// simply absent; callers that need to tell "dead" from "unknown" consult the
/// death log in [`HistoryView`](super::history::HistoryView).
#[derive(Debug, Clone, Default)]
pub struct StateView {
    turn: u32,
    units: BTreeMap<UnitId, UnitView>,
}

impl StateView {
    #[must_use]
    pub fn new<I>(turn: u32, units: I) -> Self
    where
        I: IntoIterator<Item = UnitView>,
    {
        Self {
            turn,
            units: units
                .into_iter()
                .filter(UnitView::is_alive)
                .map(|u| (u.id, u))
                .collect(),
        }
    }

    /// Current turn number, starting at 0.
    #[must_use]
    pub fn turn(&self) -> u32 {
        self.turn
    }

    /// The previous turn number, or `None` on turn 0.
    #[must_use]
    pub fn previous_turn(&self) -> Option<u32> {
        self.turn.checked_sub(1)
    }

    #[must_use]
    pub fn unit(&self, id: UnitId) -> Option<&UnitView> {
        self.units.get(&id)
    }

    pub fn units(&self) -> impl Iterator<Item = &UnitView> + '_ {
        self.units.values()
    }

    /// Ids of the living units of `side`, in ascending order.
    pub fn unit_ids(&self, side: Side) -> impl Iterator<Item = UnitId> + '_ {
        self.units
            .values()
            .filter(move |u| u.side == side)
            .map(|u| u.id)
    }
}
