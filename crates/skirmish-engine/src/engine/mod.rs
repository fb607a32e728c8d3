//! Host-side orchestration.
//!
//! - [`Agent`] - the callback contract between a host and a controlling agent
//! - [`Arena`] - a small seeded grid battle that drives an [`Agent`] through
//!   whole episodes
//!
//! # Turn Flow
//!
//! 1. [`Agent::on_episode_start`] receives the turn-0 snapshot
//! 2. For each turn, [`Agent::on_turn`] receives the snapshot and the history of
//!    all previous turns and returns attack orders
//! 3. The host resolves movement and attacks and appends a
//!    [`TurnLog`](crate::TurnLog) to the history
//! 4. [`Agent::on_episode_end`] receives the terminal snapshot once one side
//!    is eliminated or the turn limit is reached

pub use self::{agent::*, arena::*};

mod agent;
mod arena;
