use std::collections::BTreeMap;

use skirmish_engine::{AttackOrder, UnitId};

/// Who each unit was last seen going after.
///
/// Own units are recorded when they are given an order. Enemy orders are not
/// observable, so an enemy is recorded as targeting whichever own unit it was
/// last seen damaging.
#[derive(Debug, Clone, Default)]
pub struct TargetMemory {
    last_targets: BTreeMap<UnitId, UnitId>,
}

impl TargetMemory {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, attacker: UnitId, target: UnitId) {
        self.last_targets.insert(attacker, target);
    }

    pub fn record_order(&mut self, order: &AttackOrder) {
        self.record(order.attacker, order.target);
    }

    #[must_use]
    pub fn last_target(&self, unit: UnitId) -> Option<UnitId> {
        self.last_targets.get(&unit).copied()
    }

    #[must_use]
    pub fn is_targeting(&self, unit: UnitId, target: UnitId) -> bool {
        self.last_target(unit) == Some(target)
    }

    pub fn clear(&mut self) {
        self.last_targets.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_latest_record_wins() {
        let mut memory = TargetMemory::new();
        memory.record(UnitId(1), UnitId(5));
        memory.record_order(&AttackOrder::new(UnitId(1), UnitId(6)));
        assert_eq!(memory.last_target(UnitId(1)), Some(UnitId(6)));
        assert!(memory.is_targeting(UnitId(1), UnitId(6)));
        assert!(!memory.is_targeting(UnitId(2), UnitId(6)));

        memory.clear();
        assert_eq!(memory.last_target(UnitId(1)), None);
    }
}
