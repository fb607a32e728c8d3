//! Alternation between learning and evaluation episodes.
//!
//! Training runs in blocks: [`LEARNING_BLOCK`] learning episodes, then a block
//! of evaluation episodes in which the weights are frozen and only the
//! cumulative reward is measured. The scheduler is advanced once at the start
//! of every episode:
//!
//! ```text
//! episode > 0, episode % 10 == 0, evaluation counter > 5  → Learning,   counter = 0, episode += 1
//! episode > 0, episode % 10 == 0                          → Evaluating, counter += 1
//! otherwise                                               → Learning,   episode += 1
//! ```
//!
//! The evaluation counter runs `1..=6` within a block, so every evaluation
//! block holds one more episode than [`EVALUATION_BLOCK`].

/// Learning episodes between two evaluation blocks.
pub const LEARNING_BLOCK: u32 = 10;

/// Evaluation counter value after which the block ends.
pub const EVALUATION_BLOCK: u32 = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::Display, derive_more::IsVariant)]
pub enum EpisodeMode {
    #[display("learning")]
    Learning,
    #[display("evaluating")]
    Evaluating,
}

#[derive(Debug, Clone)]
pub struct EpisodeScheduler {
    episode: u32,
    evaluation_episode: u32,
    mode: EpisodeMode,
}

impl Default for EpisodeScheduler {
    fn default() -> Self {
        Self::new()
    }
}

impl EpisodeScheduler {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            episode: 0,
            evaluation_episode: 0,
            mode: EpisodeMode::Learning,
        }
    }

    /// Moves to the next episode and returns its mode.
    pub fn advance(&mut self) -> EpisodeMode {
        let block_done = self.episode > 0 && self.episode.is_multiple_of(LEARNING_BLOCK);
        if block_done && self.evaluation_episode > EVALUATION_BLOCK {
            self.evaluation_episode = 0;
            self.episode += 1;
            self.mode = EpisodeMode::Learning;
        } else if block_done {
            self.evaluation_episode += 1;
            self.mode = EpisodeMode::Evaluating;
        } else {
            self.episode += 1;
            self.mode = EpisodeMode::Learning;
        }
        self.mode
    }

    /// Index of the current (or most recent) learning episode, starting at 1.
    #[must_use]
    pub fn episode(&self) -> u32 {
        self.episode
    }

    /// Position within the current evaluation block, starting at 1.
    #[must_use]
    pub fn evaluation_episode(&self) -> u32 {
        self.evaluation_episode
    }

    #[must_use]
    pub fn mode(&self) -> EpisodeMode {
        self.mode
    }

    /// Whether the current episode closes its evaluation block.
    #[must_use]
    pub fn is_last_evaluation_episode(&self) -> bool {
        self.mode.is_evaluating() && self.evaluation_episode > EVALUATION_BLOCK
    }
}
