use std::collections::{BTreeMap, HashSet};

use arrayvec::ArrayVec;
use rand::{Rng as _, SeedableRng as _};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use crate::{
    ArenaConfigError,
    core::{
        ActionFeedback, AttackOrder, DamageLog, DeathLog, HistoryView, Position, Side, StateView,
        TurnLog, UnitId, UnitView,
    },
};

use super::agent::Agent;

/// Parameters of an arena battle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArenaConfig {
    pub width: i32,
    pub height: i32,
    pub own_units: u32,
    pub enemy_units: u32,
    pub unit_hp: u32,
    pub min_damage: u32,
    pub max_damage: u32,
    /// The episode ends after this many turns even if both sides survive.
    pub turn_limit: u32,
}

impl Default for ArenaConfig {
    fn default() -> Self {
        Self {
            width: 16,
            height: 12,
            own_units: 5,
            enemy_units: 5,
            unit_hp: 60,
            min_damage: 2,
            max_damage: 8,
            turn_limit: 400,
        }
    }
}

impl ArenaConfig {
    pub fn validate(&self) -> Result<(), ArenaConfigError> {
        let rows = u32::try_from(self.height).unwrap_or(0);
        if self.width < 4 || self.height < 1 {
            return Err(ArenaConfigError::TooSmall);
        }
        if self.own_units == 0 || self.enemy_units == 0 {
            return Err(ArenaConfigError::EmptySide);
        }
        if self.own_units > rows || self.enemy_units > rows {
            return Err(ArenaConfigError::TooManyUnits);
        }
        if self.unit_hp == 0 || self.min_damage == 0 || self.min_damage > self.max_damage {
            return Err(ArenaConfigError::InvalidCombatStats);
        }
        Ok(())
    }
}

/// Result of one arena episode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EpisodeOutcome {
    pub turns: u32,
    pub own_survivors: usize,
    pub enemy_survivors: usize,
}

impl EpisodeOutcome {
    /// The side left standing, or `None` if the turn limit ended the battle.
    #[must_use]
    pub fn winner(&self) -> Option<Side> {
        match (self.own_survivors, self.enemy_survivors) {
            (0, 0) => None,
            (_, 0) => Some(Side::Own),
            (0, _) => Some(Side::Enemy),
            _ => None,
        }
    }
}

/// Small grid-combat host for driving an [`Agent`].
///
/// Units stand on a `width × height` grid, own units on the left edge and
/// enemies on the right. Each turn every unit with a standing order either
/// attacks its target (when within one cell) or steps one cell toward it.
/// Enemies are scripted to attack the closest own unit. Damage rolls come
/// from a seeded [`Pcg32`], so a given seed and agent always replay the same
/// battle.
#[derive(Debug, Clone)]
pub struct Arena {
    config: ArenaConfig,
    rng: Pcg32,
}

impl Arena {
    pub fn with_seed(config: ArenaConfig, seed: u64) -> Result<Self, ArenaConfigError> {
        config.validate()?;
        Ok(Self {
            config,
            rng: Pcg32::seed_from_u64(seed),
        })
    }

    #[must_use]
    pub fn config(&self) -> &ArenaConfig {
        &self.config
    }

    /// Plays one episode with `agent` controlling the own side.
    ///
    /// Returns `None` if the agent declined to start the episode.
    pub fn run_episode<A>(&mut self, mut agent: A) -> Option<EpisodeOutcome>
    where
        A: Agent,
    {
        let mut battle = Battle::new(&self.config);
        let mut history = HistoryView::new();
        let mut turn = 0;

        if agent.on_episode_start(&battle.snapshot(turn)).is_break() {
            return None;
        }

        while !battle.is_over() && turn < self.config.turn_limit {
            let state = battle.snapshot(turn);
            let orders = agent.on_turn(&state, &history);
            let turn_log = battle.resolve_turn(&orders, &self.config, &mut self.rng);
            history.push_turn(turn_log);
            turn += 1;
        }

        let state = battle.snapshot(turn);
        agent.on_episode_end(&state, &history);

        let outcome = EpisodeOutcome {
            turns: turn,
            own_survivors: state.unit_ids(Side::Own).count(),
            enemy_survivors: state.unit_ids(Side::Enemy).count(),
        };
        log::debug!("arena episode finished: {outcome:?}");
        Some(outcome)
    }
}

#[derive(Debug)]
struct Battle {
    units: BTreeMap<UnitId, UnitView>,
    standing_orders: BTreeMap<UnitId, UnitId>,
    width: i32,
    height: i32,
}

impl Battle {
    fn new(config: &ArenaConfig) -> Self {
        let mut units = BTreeMap::new();
        let mut next_id = 0;
        let mut spawn = |side, count: u32, x| {
            let spacing = config.height / i32::try_from(count).unwrap_or(1).max(1);
            for row in 0..count {
                let id = UnitId(next_id);
                next_id += 1;
                let y = i32::try_from(row).unwrap_or(0) * spacing.max(1);
                units.insert(
                    id,
                    UnitView {
                        id,
                        side,
                        position: Position::new(x, y),
                        hp: config.unit_hp,
                    },
                );
            }
        };
        spawn(Side::Own, config.own_units, 1);
        spawn(Side::Enemy, config.enemy_units, config.width - 2);

        Self {
            units,
            standing_orders: BTreeMap::new(),
            width: config.width,
            height: config.height,
        }
    }

    fn snapshot(&self, turn: u32) -> StateView {
        StateView::new(turn, self.units.values().copied())
    }

    fn side_count(&self, side: Side) -> usize {
        self.units.values().filter(|u| u.side == side).count()
    }

    fn is_over(&self) -> bool {
        self.side_count(Side::Own) == 0 || self.side_count(Side::Enemy) == 0
    }

    fn in_bounds(&self, p: Position) -> bool {
        (0..self.width).contains(&p.x) && (0..self.height).contains(&p.y)
    }

    fn resolve_turn(
        &mut self,
        orders: &[AttackOrder],
        config: &ArenaConfig,
        rng: &mut Pcg32,
    ) -> TurnLog {
        let mut turn_log = TurnLog::default();

        for order in orders {
            let valid = matches!(self.units.get(&order.attacker), Some(u) if u.side.is_own())
                && matches!(self.units.get(&order.target), Some(u) if u.side.is_enemy());
            if valid {
                self.standing_orders.insert(order.attacker, order.target);
                turn_log.commands_issued.insert(order.attacker, *order);
            } else {
                log::warn!("arena rejected invalid order: {order:?}");
                turn_log
                    .command_feedback
                    .insert(order.attacker, ActionFeedback::Failed);
            }
        }
        self.assign_enemy_targets();

        let acting: Vec<UnitId> = self.units.keys().copied().collect();
        for id in acting {
            let Some(actor) = self.units.get(&id).copied() else {
                // killed earlier this turn
                continue;
            };
            let Some(target_id) = self.standing_orders.get(&id).copied() else {
                continue;
            };
            let feedback = match self.units.get(&target_id).copied() {
                None => {
                    self.standing_orders.remove(&id);
                    ActionFeedback::Completed
                }
                Some(target) if actor.position.chebyshev_distance(target.position) <= 1 => {
                    let damage = rng.random_range(config.min_damage..=config.max_damage);
                    turn_log.damage.push(DamageLog {
                        attacker: id,
                        defender: target_id,
                        damage,
                    });
                    if self.apply_damage(target_id, damage) {
                        turn_log.deaths.push(DeathLog {
                            unit: target_id,
                            side: target.side,
                        });
                        self.standing_orders.remove(&id);
                        ActionFeedback::Completed
                    } else {
                        ActionFeedback::Incomplete
                    }
                }
                Some(target) => {
                    if self.step_toward(id, target.position) {
                        ActionFeedback::Incomplete
                    } else {
                        ActionFeedback::Stuck
                    }
                }
            };
            if actor.side.is_own() {
                turn_log.command_feedback.insert(id, feedback);
            }
        }

        turn_log
    }

    /// Points every enemy without a living target at its closest own unit.
    fn assign_enemy_targets(&mut self) {
        let enemies: Vec<UnitView> = self
            .units
            .values()
            .filter(|u| u.side.is_enemy())
            .copied()
            .collect();
        for enemy in enemies {
            let has_target = self
                .standing_orders
                .get(&enemy.id)
                .is_some_and(|t| self.units.contains_key(t));
            if has_target {
                continue;
            }
            let closest = self
                .units
                .values()
                .filter(|u| u.side.is_own())
                .min_by_key(|u| (enemy.position.chebyshev_distance(u.position), u.id));
            if let Some(target) = closest {
                self.standing_orders.insert(enemy.id, target.id);
            }
        }
    }

    /// Returns `true` if the unit died.
    fn apply_damage(&mut self, id: UnitId, damage: u32) -> bool {
        let Some(unit) = self.units.get_mut(&id) else {
            return false;
        };
        unit.hp = unit.hp.saturating_sub(damage);
        if unit.hp > 0 {
            return false;
        }
        self.units.remove(&id);
        self.standing_orders.remove(&id);
        true
    }

    /// Moves the unit one cell closer to `goal`. Returns `false` if every
    /// closer cell is occupied or off the grid.
    fn step_toward(&mut self, id: UnitId, goal: Position) -> bool {
        let Some(from) = self.units.get(&id).map(|u| u.position) else {
            return false;
        };
        let occupied: HashSet<Position> = self.units.values().map(|u| u.position).collect();
        let current = from.chebyshev_distance(goal);

        let mut candidates: ArrayVec<Position, 8> = ArrayVec::new();
        for dx in -1..=1 {
            for dy in -1..=1 {
                let p = Position::new(from.x + dx, from.y + dy);
                if p != from && p.chebyshev_distance(goal) < current {
                    candidates.push(p);
                }
            }
        }
        let direct = from.step_toward(goal);
        candidates.sort_by_key(|p| (*p != direct, p.x.abs_diff(goal.x) + p.y.abs_diff(goal.y)));

        let Some(next) = candidates
            .into_iter()
            .find(|p| self.in_bounds(*p) && !occupied.contains(p))
        else {
            return false;
        };
        if let Some(unit) = self.units.get_mut(&id) {
            unit.position = next;
        }
        true
    }
}
