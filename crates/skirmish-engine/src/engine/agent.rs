use std::ops::ControlFlow;

use crate::core::{AttackOrder, HistoryView, StateView};

/// Callbacks a host makes into the controlling agent.
///
/// The host calls [`Agent::on_episode_start`] once with the initial snapshot,
/// then [`Agent::on_turn`] once per turn (waiting for the returned orders
/// before resolving the turn), and finally [`Agent::on_episode_end`] with the
/// terminal snapshot and the complete history.
pub trait Agent {
    /// Prepares for a new episode.
    ///
    /// Returning [`ControlFlow::Break`] tells the host that the agent does not
    /// want to play any more episodes; no turn callbacks follow.
    fn on_episode_start(&mut self, state: &StateView) -> ControlFlow<()>;

    /// Returns the orders for this turn. Units without a new order keep
    /// following their previous one.
    fn on_turn(&mut self, state: &StateView, history: &HistoryView) -> Vec<AttackOrder>;

    fn on_episode_end(&mut self, state: &StateView, history: &HistoryView);
}

impl<A> Agent for &mut A
where
    A: Agent + ?Sized,
{
    fn on_episode_start(&mut self, state: &StateView) -> ControlFlow<()> {
        (**self).on_episode_start(state)
    }

    fn on_turn(&mut self, state: &StateView, history: &HistoryView) -> Vec<AttackOrder> {
        (**self).on_turn(state, history)
    }

    fn on_episode_end(&mut self, state: &StateView, history: &HistoryView) {
        (**self).on_episode_end(state, history);
    }
}
