//! Grid agent with tabular Q-learning
//!
//! This crate provides:
//! - A bounded 2D grid and a turn engine that moves a single agent on it
//! - A tabular Q-learning agent with decaying exploration
//! - Pluggable reward policies (single goal, cell sequence, manual, points delta)
//! - A headless runner with observers for progress, metrics and JSONL export

pub mod cli;
pub mod config;
pub mod error;
pub mod export;
pub mod game;
pub mod grid;
pub mod pipeline;
pub mod ports;
pub mod q_learning;
pub mod rewards;
pub mod types;

pub use config::{GameConfig, RewardPolicyConfig};
pub use error::{Error, Result};
pub use game::{Game, LearningMode, ScoringRule};
pub use grid::GridBounds;
pub use ports::{Learner, Observer, RewardPolicy};
pub use q_learning::{ExplorationSchedule, QLearningAgent};
pub use types::{Action, ActionValues, Feedback, PlayerState, Position, Transition, TurnResult};
