//! Headless driver that plays a fixed number of turns

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::{
    Result,
    game::Game,
    ports::Observer,
    types::{Position, TurnResult},
};

/// Run configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunConfig {
    /// Number of turns to play
    pub turns: u64,

    /// Learn from the last deferred transition once the turns are done
    pub flush_at_end: bool,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            turns: 1_000,
            flush_at_end: true,
        }
    }
}

/// Result of a run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunSummary {
    /// Turns played during this run
    pub turns: u64,

    /// Sum of rewards delivered to the learner (including a final flush)
    pub total_reward: f64,

    /// Number of delivered rewards that were non-zero
    pub rewarded_turns: u64,

    /// Mean delivered reward per learning update
    pub mean_reward: f64,

    pub final_position: Position,

    pub final_points: i64,

    pub final_epsilon: f64,

    /// States stored by a tabular learner
    pub visited_states: Option<usize>,
}

impl RunSummary {
    /// Save summary to JSON file
    pub fn save<P: AsRef<std::path::Path>>(&self, path: P) -> Result<()> {
        let file = std::fs::File::create(path)?;
        serde_json::to_writer_pretty(file, self)?;
        Ok(())
    }

    /// Load summary from JSON file
    pub fn load<P: AsRef<std::path::Path>>(path: P) -> Result<Self> {
        let file = std::fs::File::open(path)?;
        let summary = serde_json::from_reader(file)?;
        Ok(summary)
    }
}

#[derive(Debug, Default)]
struct RewardTally {
    total: f64,
    deliveries: u64,
    non_zero: u64,
}

impl RewardTally {
    fn record(&mut self, reward: Option<f64>) {
        if let Some(reward) = reward {
            self.total += reward;
            self.deliveries += 1;
            if reward != 0.0 {
                self.non_zero += 1;
            }
        }
    }

    fn mean(&self) -> f64 {
        if self.deliveries == 0 {
            0.0
        } else {
            self.total / self.deliveries as f64
        }
    }
}

/// Plays turns on a [`Game`] and reports them to observers.
pub struct SimulationRunner {
    config: RunConfig,
    observers: Vec<Box<dyn Observer>>,
}

impl SimulationRunner {
    /// Create a new runner
    pub fn new(config: RunConfig) -> Self {
        Self {
            config,
            observers: Vec::new(),
        }
    }

    /// Add an observer to the runner
    pub fn with_observer(mut self, observer: Box<dyn Observer>) -> Self {
        self.observers.push(observer);
        self
    }

    pub fn config(&self) -> &RunConfig {
        &self.config
    }

    /// Play the configured number of turns.
    pub fn run(&mut self, game: &mut Game) -> Result<RunSummary> {
        info!(
            turns = self.config.turns,
            learner = game.learner().name(),
            reward_policy = game.reward_policy().name(),
            mode = %game.learning_mode(),
            "starting run"
        );

        for observer in &mut self.observers {
            observer.on_run_start(self.config.turns)?;
        }

        let mut tally = RewardTally::default();
        for _ in 0..self.config.turns {
            let result = game.take_turn()?;
            tally.record(result.reward());
            self.notify_turn(&result, game)?;
        }

        if self.config.flush_at_end
            && let Some(feedback) = game.flush()?
        {
            tally.record(Some(feedback.reward));
            for observer in &mut self.observers {
                observer.on_flush(&feedback)?;
            }
        }

        let summary = RunSummary {
            turns: self.config.turns,
            total_reward: tally.total,
            rewarded_turns: tally.non_zero,
            mean_reward: tally.mean(),
            final_position: game.position(),
            final_points: game.points(),
            final_epsilon: game.epsilon(),
            visited_states: game.learner().visited_states(),
        };

        for observer in &mut self.observers {
            observer.on_run_end(&summary)?;
        }

        info!(
            total_reward = summary.total_reward,
            final_points = summary.final_points,
            final_epsilon = summary.final_epsilon,
            "run finished"
        );

        Ok(summary)
    }

    fn notify_turn(&mut self, result: &TurnResult, game: &Game) -> Result<()> {
        for observer in &mut self.observers {
            observer.on_turn(result, game.learner())?;
        }
        Ok(())
    }
}
