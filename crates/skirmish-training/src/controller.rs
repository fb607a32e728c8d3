//! The learning agent.
//!
//! [`Controller`] plugs the evaluator pieces into the host's [`Agent`]
//! callbacks. Per turn:
//!
//! ```text
//! snapshot + history
//!     ↓
//! RewardModel         reward of every own unit for the previous turn
//!     ↓
//! EventDetector       is this a decision epoch?
//!     ↓ yes, for every own unit
//! LinearQFunction     TD(0) update with the unit's last chosen features
//!     ↓
//! EpsilonGreedyPolicy pick a target, remember its features
//!     ↓
//! attack orders
//! ```
//!
//! Weight updates only happen in learning episodes. Units that died on the
//! previous turn receive a terminal update (no next-state value) and no order.
//! Deaths reported for the previous turn are removed from the roster once the
//! turn has been handled.

use std::{collections::BTreeMap, ops::ControlFlow};

use rand::SeedableRng as _;
use rand_pcg::Pcg32;
use skirmish_engine::{Agent, AttackOrder, HistoryView, StateView, UnitId};
use skirmish_evaluator::{
    combatant::Combatant,
    feature::{DecisionContext, FeatureExtractor, FeatureVector},
    memory::TargetMemory,
    policy::{EpsilonGreedyPolicy, Exploration},
    q_function::{DimensionMismatchError, LinearQFunction, WeightVector},
    reward::RewardModel,
    roster::Roster,
};

use crate::{
    config::AgentConfig,
    event::EventDetector,
    report::PerformanceReport,
    schedule::{EpisodeMode, EpisodeScheduler},
    weight_store::WeightStore,
    weights,
};

#[derive(Debug)]
pub struct Controller {
    config: AgentConfig,
    q_function: LinearQFunction,
    policy: EpsilonGreedyPolicy,
    extractor: FeatureExtractor,
    reward_model: RewardModel,
    detector: EventDetector,
    scheduler: EpisodeScheduler,
    evaluation_runs: u32,
    roster: Roster,
    targets: TargetMemory,
    previous_features: BTreeMap<UnitId, FeatureVector>,
    rng: Pcg32,
    store: WeightStore,
    cumulative_reward: f64,
    last_episode_reward: Option<f64>,
    report: PerformanceReport,
}

impl Controller {
    /// Creates a controller, loading its weights from the weight file if
    /// requested.
    ///
    /// A missing or unreadable file, or one holding the wrong number of
    /// weights, is logged and replaced by random weights.
    #[must_use]
    pub fn new(config: AgentConfig) -> Self {
        let mut rng = Pcg32::seed_from_u64(config.seed);
        let store = WeightStore::new(config.weights_path.clone());
        let weights = initial_weights(&config, &store, &mut rng);
        Self::from_parts(config, weights, rng, store)
    }

    /// Creates a controller starting from `weights`, ignoring
    /// [`AgentConfig::load_weights`].
    #[must_use]
    pub fn with_weights(config: AgentConfig, weights: WeightVector) -> Self {
        let rng = Pcg32::seed_from_u64(config.seed);
        let store = WeightStore::new(config.weights_path.clone());
        Self::from_parts(config, weights, rng, store)
    }

    fn from_parts(
        config: AgentConfig,
        weights: WeightVector,
        rng: Pcg32,
        store: WeightStore,
    ) -> Self {
        log::debug!("Initial weights: {:?}", weights.as_slice());
        Self {
            config,
            q_function: LinearQFunction::new(weights),
            policy: EpsilonGreedyPolicy::default(),
            extractor: FeatureExtractor::new(),
            reward_model: RewardModel::new(),
            detector: EventDetector::new(),
            scheduler: EpisodeScheduler::new(),
            evaluation_runs: 0,
            roster: Roster::new(),
            targets: TargetMemory::new(),
            previous_features: BTreeMap::new(),
            rng,
            store,
            cumulative_reward: 0.0,
            last_episode_reward: None,
            report: PerformanceReport::new(),
        }
    }

    #[must_use]
    pub fn config(&self) -> &AgentConfig {
        &self.config
    }

    #[must_use]
    pub fn weights(&self) -> &WeightVector {
        self.q_function.weights()
    }

    #[must_use]
    pub fn mode(&self) -> EpisodeMode {
        if self.config.learning {
            self.scheduler.mode()
        } else {
            EpisodeMode::Evaluating
        }
    }

    #[must_use]
    pub fn scheduler(&self) -> &EpisodeScheduler {
        &self.scheduler
    }

    /// Cumulative reward of the most recently finished episode.
    #[must_use]
    pub fn last_episode_reward(&self) -> Option<f64> {
        self.last_episode_reward
    }

    /// Averaged cumulative reward of every finished evaluation block.
    #[must_use]
    pub fn evaluation_averages(&self) -> &[f64] {
        self.report.averages()
    }

    fn exploration(&self) -> Exploration {
        if self.mode().is_learning() || self.config.evaluation_exploration {
            Exploration::EpsilonGreedy
        } else {
            Exploration::Greedy
        }
    }

    /// Rewards of every own unit on the roster for the previous turn.
    fn turn_rewards(&mut self, state: &StateView, history: &HistoryView) -> BTreeMap<UnitId, f64> {
        let own: Vec<UnitId> = self.roster.own().collect();
        own.into_iter()
            .map(|id| {
                let breakdown = self
                    .reward_model
                    .evaluate(id, state, history, &mut self.targets);
                log::trace!("turn {}: unit {id} {breakdown:?}", state.turn());
                (id, breakdown.total())
            })
            .collect()
    }

    /// Updates the weights for `attacker` and picks its next target.
    ///
    /// Returns the new order, or `None` if the unit died or there is nothing
    /// left to attack.
    fn decide(
        &mut self,
        attacker: UnitId,
        reward: f64,
        state: &StateView,
        history: &HistoryView,
        candidates: &[UnitId],
        issued: &[AttackOrder],
    ) -> Result<Option<AttackOrder>, DimensionMismatchError> {
        let learning = self.mode().is_learning();
        let exploration = self.exploration();
        let old_features = self
            .previous_features
            .get(&attacker)
            .copied()
            .unwrap_or(FeatureVector::ZERO);

        if Combatant::resolve(attacker, state, history).is_dead() {
            if learning {
                let update = self.q_function.update(reward, &old_features, 0.0)?;
                log::debug!(
                    "unit {attacker} died: reward {reward:.2}, td error {:.4}",
                    update.td_error
                );
            }
            self.previous_features.remove(&attacker);
            return Ok(None);
        }

        let ctx = DecisionContext {
            state,
            history,
            roster: &self.roster,
            targets: &self.targets,
            issued,
        };

        if learning {
            let next_best = EpsilonGreedyPolicy::best_value(
                &self.q_function,
                &self.extractor,
                &ctx,
                attacker,
                candidates,
            )?
            .map_or(0.0, |(_, q)| q);
            let update = self.q_function.update(reward, &old_features, next_best)?;
            log::debug!(
                "unit {attacker}: reward {reward:.2}, old q {:.4}, td error {:.4}",
                update.old_q,
                update.td_error
            );
        }

        let selection = self.policy.select_target(
            &self.q_function,
            &self.extractor,
            &ctx,
            attacker,
            candidates,
            exploration,
            &mut self.rng,
        )?;
        let Some(selection) = selection else {
            return Ok(None);
        };
        if selection.explored {
            log::trace!("unit {attacker} explores target {}", selection.target);
        }

        let order = AttackOrder::new(attacker, selection.target);
        self.targets.record_order(&order);
        self.previous_features.insert(attacker, selection.features);
        Ok(Some(order))
    }

    fn save_weights(&self) {
        if let Err(e) = self.store.save(self.q_function.weights().as_slice()) {
            log::warn!("Failed to save weights: {e}");
        }
    }
}

fn initial_weights(config: &AgentConfig, store: &WeightStore, rng: &mut Pcg32) -> WeightVector {
    if config.load_weights {
        match store.load().map(WeightVector::new) {
            Ok(Ok(weights)) => {
                log::info!("Loaded weights from {}", store.path().display());
                return weights;
            }
            Ok(Err(e)) => log::error!(
                "Ignoring weights in {}: {e}; using random weights",
                store.path().display()
            ),
            Err(e) => log::warn!("Failed to load weights: {e}; using random weights"),
        }
    }
    weights::random(rng)
}

impl Agent for Controller {
    fn on_episode_start(&mut self, state: &StateView) -> ControlFlow<()> {
        if self.config.learning {
            let mode = self.scheduler.advance();
            if mode.is_learning() && self.scheduler.episode() > self.config.episodes {
                log::info!("Finished {} learning episodes", self.config.episodes);
                return ControlFlow::Break(());
            }
            match mode {
                EpisodeMode::Learning => {
                    log::info!("Beginning learning episode {}", self.scheduler.episode());
                }
                EpisodeMode::Evaluating => log::info!(
                    "Beginning evaluation episode {}",
                    self.scheduler.evaluation_episode()
                ),
            }
        } else {
            if self.evaluation_runs >= self.config.episodes {
                log::info!("Finished {} evaluation episodes", self.config.episodes);
                return ControlFlow::Break(());
            }
            self.evaluation_runs += 1;
            log::info!("Beginning evaluation episode {}", self.evaluation_runs);
        }

        self.roster.populate(state);
        self.targets.clear();
        self.previous_features.clear();
        self.cumulative_reward = 0.0;
        ControlFlow::Continue(())
    }

    fn on_turn(&mut self, state: &StateView, history: &HistoryView) -> Vec<AttackOrder> {
        let rewards = self.turn_rewards(state, history);
        self.cumulative_reward += rewards.values().sum::<f64>();

        let mut orders = vec![];
        if self.detector.is_decision_epoch(state, history, &self.roster) {
            let own: Vec<UnitId> = self.roster.own().collect();
            let candidates: Vec<UnitId> = self
                .roster
                .enemies()
                .filter(|id| Combatant::resolve(*id, state, history).is_alive())
                .collect();
            for attacker in own {
                let reward = rewards.get(&attacker).copied().unwrap_or(0.0);
                match self.decide(attacker, reward, state, history, &candidates, &orders) {
                    Ok(Some(order)) => orders.push(order),
                    Ok(None) => {}
                    Err(e) => {
                        log::error!("Skipping unit {attacker} on turn {}: {e}", state.turn());
                    }
                }
            }
        }

        if let Some(last_turn) = state.previous_turn() {
            for death in history.death_logs(Some(last_turn)) {
                self.roster.queue_removal(death.unit);
            }
            let removed = self.roster.apply_removals();
            if !removed.is_empty() {
                log::debug!("turn {}: removed {removed:?} from the roster", state.turn());
            }
        }

        orders
    }

    fn on_episode_end(&mut self, state: &StateView, history: &HistoryView) {
        let rewards = self.turn_rewards(state, history);
        self.cumulative_reward += rewards.values().sum::<f64>();
        self.last_episode_reward = Some(self.cumulative_reward);
        log::info!(
            "Episode finished after {} turns: cumulative reward {:.2}",
            state.turn(),
            self.cumulative_reward
        );

        if !self.config.learning {
            return;
        }
        self.save_weights();

        if self.scheduler.mode().is_evaluating() {
            self.report.record(self.cumulative_reward);
            if self.scheduler.is_last_evaluation_episode()
                && let Some(average) = self.report.finish_block()
            {
                log::info!("Evaluation block average: {average:.2}");
                print!("{}", self.report.table());
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use skirmish_engine::{ActionFeedback, DamageLog, DeathLog, Position, Side, TurnLog, UnitView};
    use tempfile::TempDir;

    use super::*;

    fn config(dir: &TempDir) -> AgentConfig {
        AgentConfig {
            weights_path: dir.path().join("weights.txt"),
            ..AgentConfig::default()
        }
    }

    fn unit(id: u32, side: Side, x: i32, y: i32, hp: u32) -> UnitView {
        UnitView {
            id: UnitId(id),
            side,
            position: Position::new(x, y),
            hp,
        }
    }

    fn start(controller: &mut Controller) -> StateView {
        let state = StateView::new(
            0,
            [
                unit(0, Side::Own, 0, 0, 10),
                unit(1, Side::Own, 0, 2, 10),
                unit(2, Side::Enemy, 3, 1, 4),
                unit(3, Side::Enemy, 4, 4, 8),
            ],
        );
        assert!(controller.on_episode_start(&state).is_continue());
        state
    }

    #[test]
    fn test_first_turn_orders_every_unit() {
        let dir = TempDir::new().unwrap();
        let mut controller = Controller::new(config(&dir));
        let state = start(&mut controller);
        let before = controller.weights().clone();

        let orders = controller.on_turn(&state, &HistoryView::new());
        let attackers: Vec<_> = orders.iter().map(|o| o.attacker).collect();
        assert_eq!(attackers, [UnitId(0), UnitId(1)]);
        assert!(
            orders
                .iter()
                .all(|o| [UnitId(2), UnitId(3)].contains(&o.target))
        );
        // the first update only sees zero features
        assert_eq!(controller.weights(), &before);
    }

    #[test]
    fn test_quiet_turn_issues_nothing() {
        let dir = TempDir::new().unwrap();
        let mut controller = Controller::new(config(&dir));
        let state = start(&mut controller);
        let mut history = HistoryView::new();
        controller.on_turn(&state, &history);

        history.push_turn(TurnLog {
            command_feedback: BTreeMap::from([(UnitId(0), ActionFeedback::Incomplete)]),
            ..TurnLog::default()
        });
        let next = StateView::new(1, state.units().copied());
        assert!(controller.on_turn(&next, &history).is_empty());
    }

    #[test]
    fn test_dead_unit_gets_no_order_and_leaves_roster() {
        let dir = TempDir::new().unwrap();
        let mut controller = Controller::new(config(&dir));
        let state = start(&mut controller);
        let mut history = HistoryView::new();
        controller.on_turn(&state, &history);
        let before = controller.weights().clone();

        history.push_turn(TurnLog {
            damage: vec![DamageLog {
                attacker: UnitId(2),
                defender: UnitId(0),
                damage: 10,
            }],
            deaths: vec![DeathLog {
                unit: UnitId(0),
                side: Side::Own,
            }],
            ..TurnLog::default()
        });
        let next = StateView::new(1, state.units().copied().filter(|u| u.id != UnitId(0)));
        let orders = controller.on_turn(&next, &history);

        assert_eq!(orders.len(), 1);
        assert_eq!(orders[0].attacker, UnitId(1));
        assert_ne!(controller.weights(), &before);
        assert_eq!(controller.roster.side_of(UnitId(0)), None);
        assert!(controller.roster.is_removed(UnitId(0)));
        assert!(controller.targets.is_targeting(UnitId(2), UnitId(0)));
    }

    #[test]
    fn test_evaluation_only_never_learns() {
        let dir = TempDir::new().unwrap();
        let mut controller = Controller::new(AgentConfig {
            learning: false,
            episodes: 1,
            ..config(&dir)
        });
        let state = start(&mut controller);
        assert!(controller.mode().is_evaluating());
        let before = controller.weights().clone();

        let mut history = HistoryView::new();
        controller.on_turn(&state, &history);
        history.push_turn(TurnLog {
            damage: vec![DamageLog {
                attacker: UnitId(0),
                defender: UnitId(2),
                damage: 4,
            }],
            deaths: vec![DeathLog {
                unit: UnitId(2),
                side: Side::Enemy,
            }],
            ..TurnLog::default()
        });
        let next = StateView::new(1, state.units().copied().filter(|u| u.id != UnitId(2)));
        let orders = controller.on_turn(&next, &history);
        assert!(orders.iter().all(|o| o.target == UnitId(3)));
        controller.on_episode_end(&next, &history);

        assert_eq!(controller.weights(), &before);
        assert!(!dir.path().join("weights.txt").exists());
        assert!(controller.on_episode_start(&state).is_break());
    }

    #[test]
    fn test_greedy_evaluation_draws_no_random_numbers() {
        let dir = TempDir::new().unwrap();
        // Q = distance, so the farther enemy wins for both units
        let weights = weights::from_fn(|i| if i == 1 { 1.0 } else { 0.0 });
        let run = |seed| {
            let mut controller = Controller::with_weights(
                AgentConfig {
                    learning: false,
                    evaluation_exploration: false,
                    seed,
                    ..config(&dir)
                },
                weights.clone(),
            );
            let state = start(&mut controller);
            let rng_before = controller.rng.clone();
            let orders = controller.on_turn(&state, &HistoryView::new());
            assert_eq!(controller.rng, rng_before);
            orders
        };

        let orders = run(1);
        assert_eq!(
            orders,
            [
                AttackOrder::new(UnitId(0), UnitId(3)),
                AttackOrder::new(UnitId(1), UnitId(3)),
            ]
        );
        assert_eq!(run(99), orders);
    }

    #[test]
    fn test_wrong_length_weights_fall_back_to_random() {
        let dir = TempDir::new().unwrap();
        WeightStore::new(dir.path().join("weights.txt"))
            .save(&[1.0, 2.0, 3.0])
            .unwrap();
        let loaded = Controller::new(AgentConfig {
            load_weights: true,
            ..config(&dir)
        });
        let fresh = Controller::new(config(&dir));
        assert_eq!(loaded.weights(), fresh.weights());
    }

    #[test]
    fn test_loads_saved_weights() {
        let dir = TempDir::new().unwrap();
        let saved = [0.5, -0.25, 0.125, 1.0, -1.0];
        WeightStore::new(dir.path().join("weights.txt"))
            .save(&saved)
            .unwrap();
        let controller = Controller::new(AgentConfig {
            load_weights: true,
            ..config(&dir)
        });
        assert_eq!(controller.weights().as_slice(), &saved);
    }
}
