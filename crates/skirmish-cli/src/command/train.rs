use std::path::PathBuf;

use anyhow::Context;
use skirmish_engine::{Arena, ArenaConfig};
use skirmish_training::{
    config::{AgentConfig, DEFAULT_SEED},
    controller::Controller,
    weight_store::DEFAULT_PATH,
};

use crate::{schema::training_summary::TrainingSummary, util};

const SUMMARY_NAME: &str = "skirmish-td0";

#[derive(Debug, Clone, clap::Args)]
pub(crate) struct TrainArg {
    /// Number of learning episodes [default: 10]
    episodes: Option<String>,
    /// Whether to start from the weight file ("true" or "false") [default: false]
    load_weights: Option<String>,
    /// Weight file path
    #[arg(long, default_value = DEFAULT_PATH)]
    weights: PathBuf,
    /// Seed for initial weights, exploration and the arena
    #[arg(long, default_value_t = DEFAULT_SEED)]
    seed: u64,
    /// Always pick the greedy target in evaluation episodes
    #[arg(long)]
    greedy_evaluation: bool,
    /// Maximum number of turns per episode
    #[arg(long, default_value_t = ArenaConfig::default().turn_limit)]
    turn_limit: u32,
    /// Write a JSON training summary to this file (`-` for stdout)
    #[arg(long)]
    summary: Option<PathBuf>,
}

pub(crate) fn run(arg: &TrainArg) -> anyhow::Result<()> {
    let TrainArg {
        episodes,
        load_weights,
        weights,
        seed,
        greedy_evaluation,
        turn_limit,
        summary,
    } = arg;

    let config = AgentConfig {
        weights_path: weights.clone(),
        seed: *seed,
        evaluation_exploration: !greedy_evaluation,
        ..AgentConfig::from_args(episodes.as_deref(), load_weights.as_deref())
    };
    log::info!("Running {} episodes", config.episodes);

    let arena_config = ArenaConfig {
        turn_limit: *turn_limit,
        ..ArenaConfig::default()
    };
    let mut arena = Arena::with_seed(arena_config, *seed).context("Failed to set up the arena")?;
    let mut controller = Controller::new(config);

    let mut played = 0;
    while let Some(outcome) = arena.run_episode(&mut controller) {
        played += 1;
        log::debug!(
            "episode {played} ({}): {} turns, winner {:?}",
            controller.mode(),
            outcome.turns,
            outcome.winner()
        );
    }
    log::info!("Training completed after {played} episodes");
    log::info!("Final weights: {:?}", controller.weights().as_slice());

    if let Some(path) = summary {
        let summary = TrainingSummary::from_controller(SUMMARY_NAME, &controller);
        util::save_json(&summary, path)?;
        log::info!("Training summary saved to {}", path.display());
    }

    Ok(())
}
