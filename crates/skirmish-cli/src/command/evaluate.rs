use std::path::PathBuf;

use anyhow::Context;
use skirmish_engine::{Arena, ArenaConfig, Side};
use skirmish_evaluator::q_function::WeightVector;
use skirmish_training::{
    config::{AgentConfig, DEFAULT_EPISODES, DEFAULT_SEED},
    controller::Controller,
    weight_store::{DEFAULT_PATH, WeightStore},
};

#[derive(Debug, Clone, clap::Args)]
pub(crate) struct EvaluateArg {
    /// Number of episodes to play
    #[arg(default_value_t = DEFAULT_EPISODES)]
    episodes: u32,
    /// Weight file path
    #[arg(long, default_value = DEFAULT_PATH)]
    weights: PathBuf,
    /// Seed for exploration and the arena
    #[arg(long, default_value_t = DEFAULT_SEED)]
    seed: u64,
    /// Keep epsilon-greedy exploration instead of always picking the greedy target
    #[arg(long)]
    explore: bool,
    /// Maximum number of turns per episode
    #[arg(long, default_value_t = ArenaConfig::default().turn_limit)]
    turn_limit: u32,
}

pub(crate) fn run(arg: &EvaluateArg) -> anyhow::Result<()> {
    let EvaluateArg {
        episodes,
        weights,
        seed,
        explore,
        turn_limit,
    } = arg;

    let values = WeightStore::new(weights.clone())
        .load()
        .with_context(|| format!("Failed to load weights from {}", weights.display()))?;
    let weight_vector = WeightVector::new(values)
        .with_context(|| format!("Unusable weights in {}", weights.display()))?;

    let config = AgentConfig {
        episodes: *episodes,
        weights_path: weights.clone(),
        seed: *seed,
        evaluation_exploration: *explore,
        learning: false,
        ..AgentConfig::default()
    };
    let arena_config = ArenaConfig {
        turn_limit: *turn_limit,
        ..ArenaConfig::default()
    };
    let mut arena = Arena::with_seed(arena_config, *seed).context("Failed to set up the arena")?;
    let mut controller = Controller::with_weights(config, weight_vector);

    let mut rewards = vec![];
    let mut wins = 0;
    while let Some(outcome) = arena.run_episode(&mut controller) {
        if outcome.winner() == Some(Side::Own) {
            wins += 1;
        }
        if let Some(reward) = controller.last_episode_reward() {
            rewards.push(reward);
        }
    }
    anyhow::ensure!(!rewards.is_empty(), "No episodes were played");

    #[expect(clippy::cast_precision_loss)]
    let average = rewards.iter().sum::<f64>() / rewards.len() as f64;
    println!("Episodes played:           {}", rewards.len());
    println!("Episodes won:              {wins}");
    println!("Average cumulative reward: {average:.2}");

    Ok(())
}
