//! Battlefield model shared between a combat host and the agents it drives.
//!
//! The [`core`] module holds the values a host hands to an agent every turn:
//! unit snapshots ([`UnitView`]), the per-turn [`StateView`], and the episode
//! [`HistoryView`] with its damage, death, feedback and issued-order logs.
//! The [`engine`] module holds the [`Agent`] callback trait and [`Arena`], a
//! deterministic reference host.

pub use self::{core::*, engine::*};

pub mod core;
pub mod engine;

#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::Display, derive_more::Error)]
pub enum ArenaConfigError {
    #[display("arena must be at least 4 cells wide and 1 cell high")]
    TooSmall,
    #[display("both sides need at least one unit")]
    EmptySide,
    #[display("more units on one side than rows in the arena")]
    TooManyUnits,
    #[display("unit hp and damage must be positive with min_damage <= max_damage")]
    InvalidCombatStats,
}
