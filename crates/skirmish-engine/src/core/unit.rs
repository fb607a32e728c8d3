use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

/// Identifier of a combat unit, unique within an episode.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    derive_more::Display,
    derive_more::From,
)]
#[serde(transparent)]
#[display("#{_0}")]
pub struct UnitId(pub u32);

/// The side a unit fights for.
///
/// `Own` units are the ones the agent issues orders to; `Enemy` units are
/// driven by the host.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, derive_more::IsVariant,
)]
#[serde(rename_all = "snake_case")]
pub enum Side {
    Own,
    Enemy,
}

impl Side {
    #[must_use]
    pub const fn opponent(self) -> Self {
        match self {
            Side::Own => Side::Enemy,
            Side::Enemy => Side::Own,
        }
    }
}

/// A grid cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Position {
    pub x: i32,
    pub y: i32,
}

impl Position {
    pub const ORIGIN: Self = Self { x: 0, y: 0 };

    #[must_use]
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Number of king moves needed to reach `other`: `max(|dx|, |dy|)`.
    ///
    /// ```
    /// use skirmish_engine::Position;
    ///
    /// assert_eq!(Position::new(0, 0).chebyshev_distance(Position::new(3, 1)), 3);
    /// assert_eq!(Position::new(2, -4).chebyshev_distance(Position::new(1, 1)), 5);
    /// ```
    #[must_use]
    pub fn chebyshev_distance(self, other: Self) -> u32 {
        u32::max(self.x.abs_diff(other.x), self.y.abs_diff(other.y))
    }

    /// Returns the position one step closer to `target` along both axes.
    #[must_use]
    pub fn step_toward(self, target: Self) -> Self {
        Self {
            x: step_axis(self.x, target.x),
            y: step_axis(self.y, target.y),
        }
    }
}

fn step_axis(from: i32, to: i32) -> i32 {
    match to.cmp(&from) {
        Ordering::Greater => from + 1,
        Ordering::Less => from - 1,
        Ordering::Equal => from,
    }
}

/// Snapshot of a single unit as seen on one turn.
///
/// A `UnitView` is a plain value: it is built by the host for each turn and
/// never updated in place.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnitView {
    pub id: UnitId,
    pub side: Side,
    pub position: Position,
    pub hp: u32,
}

impl UnitView {
    #[must_use]
    pub fn is_alive(&self) -> bool {
        self.hp > 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_step_toward_moves_diagonally() {
        let from = Position::new(0, 0);
        assert_eq!(from.step_toward(Position::new(5, -3)), Position::new(1, -1));
        assert_eq!(from.step_toward(Position::new(0, 4)), Position::new(0, 1));
        assert_eq!(from.step_toward(from), from);
    }

    #[test]
    fn test_step_toward_at_coordinate_extremes() {
        let from = Position::new(i32::MIN, i32::MAX);
        let to = Position::new(i32::MAX, i32::MIN);
        assert_eq!(from.step_toward(to), Position::new(i32::MIN + 1, i32::MAX - 1));
        assert_eq!(to.step_toward(from), Position::new(i32::MAX - 1, i32::MIN + 1));
    }

    #[test]
    fn test_chebyshev_distance_is_symmetric() {
        let a = Position::new(-2, 7);
        let b = Position::new(4, 3);
        assert_eq!(a.chebyshev_distance(b), 6);
        assert_eq!(b.chebyshev_distance(a), 6);
    }

    #[test]
    fn test_unit_id_serializes_transparently() {
        let json = serde_json::to_string(&UnitId(42)).unwrap();
        assert_eq!(json, "42");
        assert_eq!(UnitId(42).to_string(), "#42");
    }

    #[test]
    fn test_opponent() {
        assert_eq!(Side::Own.opponent(), Side::Enemy);
        assert!(Side::Enemy.opponent().is_own());
    }
}
