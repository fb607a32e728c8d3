//! Online training of the target-selection weights.
//!
//! This crate turns the evaluator pieces into a learning agent. The
//! [`controller::Controller`] implements the host's
//! [`Agent`](skirmish_engine::Agent) callbacks and learns the weights of a
//! linear Q function while it plays, using one-step temporal-difference
//! updates (TD(0)).
//!
//! # How Training Works
//!
//! 1. **Episode start** - The scheduler decides whether this is a learning or an
//!    evaluation episode; the roster is rebuilt from the initial snapshot
//! 2. **Decision epochs** - On turns where an order settled or a unit died, every
//!    own unit is rewarded for the previous turn, its weights are updated and a
//!    new target is chosen
//! 3. **Episode end** - The weights are written to the weight file; evaluation
//!    episodes contribute their cumulative reward to the performance table
//! 4. **Repeat** - Until the configured number of learning episodes has been played
//!
//! # Architecture
//!
//! ```text
//! EpisodeScheduler (learning or evaluating?)
//!     ↓ drives
//! Controller (per-turn orchestration)
//!     ↓ asks
//! EventDetector (decide now?)
//!     ↓ then uses
//! RewardModel → LinearQFunction.update → EpsilonGreedyPolicy (skirmish-evaluator)
//!     ↓ produces
//! Attack orders
//! ```
//!
//! # Modules
//!
//! - [`config`] - Startup configuration with fail-soft parsing
//! - [`controller`] - The learning agent
//! - [`event`] - Decision-epoch detection
//! - [`report`] - Averaged evaluation rewards and the performance table
//! - [`schedule`] - Learning/evaluation block alternation
//! - [`weight_store`] - Plain-text weight persistence
//! - [`weights`] - Weight initialization
//!
//! # Example
//!
//! ```rust,no_run
//! use skirmish_engine::{Arena, ArenaConfig};
//! use skirmish_training::{config::AgentConfig, controller::Controller};
//!
//! let mut arena = Arena::with_seed(ArenaConfig::default(), 1).unwrap();
//! let mut controller = Controller::new(AgentConfig::default());
//! while arena.run_episode(&mut controller).is_some() {}
//! println!("{:?}", controller.weights());
//! ```
//!
//! # Current Limitations
//!
//! - **Single shared weight vector**: All units learn into the same weights, with no
//!   credit assignment between them.
//! - **Fixed hyperparameters**: Learning rate, discount and ε are constants.
//! - **Evaluation noise**: Evaluation blocks are short and keep exploring by default, so
//!   block averages are noisy.

pub mod config;
pub mod controller;
pub mod event;
pub mod report;
pub mod schedule;
pub mod weight_store;
pub mod weights;
