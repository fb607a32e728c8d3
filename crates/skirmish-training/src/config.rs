use std::path::PathBuf;

use crate::weight_store::DEFAULT_PATH;

/// Episodes run when no count is given.
pub const DEFAULT_EPISODES: u32 = 10;

/// Seed of the controller's random stream when none is given.
pub const DEFAULT_SEED: u64 = 12345;

/// Startup configuration of a [`Controller`](crate::controller::Controller).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AgentConfig {
    /// Learning episodes to run before the controller stops
    pub episodes: u32,
    /// Start from the weight file instead of random weights
    pub load_weights: bool,
    /// Location of the weight file
    pub weights_path: PathBuf,
    /// Seed of the random stream used for initial weights and exploration
    pub seed: u64,
    /// Keep epsilon-greedy exploration during evaluation episodes
    ///
    /// When disabled, evaluation episodes always pick the greedy target.
    pub evaluation_exploration: bool,
    /// Run the learning/evaluation schedule
    ///
    /// When disabled every episode is an evaluation episode, the weights are
    /// never updated and the weight file is never written.
    pub learning: bool,
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            episodes: DEFAULT_EPISODES,
            load_weights: false,
            weights_path: PathBuf::from(DEFAULT_PATH),
            seed: DEFAULT_SEED,
            evaluation_exploration: true,
            learning: true,
        }
    }
}

impl AgentConfig {
    /// Builds a configuration from the two positional startup arguments.
    ///
    /// Missing or unparsable values are reported with a warning and replaced
    /// by their defaults; this never fails.
    ///
    /// ```
    /// use skirmish_training::config::AgentConfig;
    ///
    /// let config = AgentConfig::from_args(Some("25"), Some("TRUE"));
    /// assert_eq!(config.episodes, 25);
    /// assert!(config.load_weights);
    ///
    /// let config = AgentConfig::from_args(Some("many"), None);
    /// assert_eq!(config.episodes, 10);
    /// assert!(!config.load_weights);
    /// ```
    #[must_use]
    pub fn from_args(episodes: Option<&str>, load_weights: Option<&str>) -> Self {
        let mut config = Self::default();

        match episodes.map(|s| s.trim().parse::<u32>()) {
            Some(Ok(episodes)) => config.episodes = episodes,
            Some(Err(e)) => log::warn!(
                "Invalid number of episodes {:?} ({e}), defaulting to {DEFAULT_EPISODES}",
                episodes.unwrap_or_default()
            ),
            None => log::warn!("Number of episodes not specified, defaulting to {DEFAULT_EPISODES}"),
        }

        match load_weights.map(parse_flag) {
            Some(Some(load)) => config.load_weights = load,
            Some(None) => log::warn!(
                "Invalid load-weights flag {:?}, defaulting to not loading",
                load_weights.unwrap_or_default()
            ),
            None => log::warn!("Load-weights flag not specified, defaulting to not loading"),
        }

        config
    }
}

fn parse_flag(s: &str) -> Option<bool> {
    let s = s.trim();
    if s.eq_ignore_ascii_case("true") {
        Some(true)
    } else if s.eq_ignore_ascii_case("false") {
        Some(false)
    } else {
        None
    }
}
