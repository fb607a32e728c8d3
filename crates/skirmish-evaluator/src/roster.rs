use std::collections::BTreeSet;

use skirmish_engine::{Side, StateView, UnitId};

/// The units known to be alive on each side during an episode.
///
/// Ids enter the roster only through [`Roster::populate`] at the start of an
/// episode. Deaths are queued with [`Roster::queue_removal`] while a turn is
/// processed and dropped together by [`Roster::apply_removals`], so every
/// unit handled within one turn sees the same roster. An id is never in both
/// sides, and a removed id does not come back until the next `populate`.
#[derive(Debug, Clone, Default)]
pub struct Roster {
    own: BTreeSet<UnitId>,
    enemy: BTreeSet<UnitId>,
    removed: BTreeSet<UnitId>,
    pending: BTreeSet<UnitId>,
}

impl Roster {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the roster with the living units of `state`.
    pub fn populate(&mut self, state: &StateView) {
        self.own = state.unit_ids(Side::Own).collect();
        self.enemy = state.unit_ids(Side::Enemy).collect();
        self.removed.clear();
        self.pending.clear();
    }

    pub fn own(&self) -> impl Iterator<Item = UnitId> + '_ {
        self.own.iter().copied()
    }

    pub fn enemies(&self) -> impl Iterator<Item = UnitId> + '_ {
        self.enemy.iter().copied()
    }

    #[must_use]
    pub fn own_count(&self) -> usize {
        self.own.len()
    }

    #[must_use]
    pub fn enemy_count(&self) -> usize {
        self.enemy.len()
    }

    #[must_use]
    pub fn side_of(&self, id: UnitId) -> Option<Side> {
        if self.own.contains(&id) {
            Some(Side::Own)
        } else if self.enemy.contains(&id) {
            Some(Side::Enemy)
        } else {
            None
        }
    }

    #[must_use]
    pub fn is_removed(&self, id: UnitId) -> bool {
        self.removed.contains(&id)
    }

    /// Queues `id` for removal at the end of the turn.
    ///
    /// Returns `false` if the id is not on the roster.
    pub fn queue_removal(&mut self, id: UnitId) -> bool {
        if self.side_of(id).is_none() {
            return false;
        }
        self.pending.insert(id)
    }

    /// Drops every queued id and returns them in ascending order.
    pub fn apply_removals(&mut self) -> Vec<UnitId> {
        let pending = std::mem::take(&mut self.pending);
        for id in &pending {
            self.own.remove(id);
            self.enemy.remove(id);
            self.removed.insert(*id);
        }
        pending.into_iter().collect()
    }
}
