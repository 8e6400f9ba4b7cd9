//! Configuration for building a [`Game`].
//!
//! The configuration is a plain serde structure so it can be written as JSON
//! and overridden from the command line. Every field has a default matching
//! the classic 7×7 setup.

use std::{fmt, path::Path, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::{
    Error, Result,
    game::{Game, LearningMode, ScoringRule},
    grid::GridBounds,
    ports::{Learner, RewardPolicy},
    q_learning::{ExplorationSchedule, QLearningAgent},
    rewards::{ManualReward, PointsDeltaReward, SequenceReward, SingleGoalReward},
    types::Position,
};

/// Which reward policy the game is built with.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RewardPolicyConfig {
    /// Reward for jumping on `target` (grid center when omitted).
    SingleGoal {
        #[serde(default)]
        target: Option<Position>,
        #[serde(default = "default_goal_reward")]
        reward: f64,
    },
    /// Ring walk around `center` (grid center when omitted).
    Sequence {
        #[serde(default)]
        center: Option<Position>,
        #[serde(default = "default_sequence_bonus")]
        bonus: f64,
        #[serde(default = "default_sequence_penalty")]
        penalty: f64,
    },
    /// Operator-set reward, starting at `reward`.
    Manual {
        #[serde(default)]
        reward: f64,
    },
    /// Change in game points.
    PointsDelta,
}

fn default_goal_reward() -> f64 {
    1.0
}

fn default_sequence_bonus() -> f64 {
    10.0
}

fn default_sequence_penalty() -> f64 {
    -1.0
}

impl RewardPolicyConfig {
    pub fn single_goal() -> Self {
        RewardPolicyConfig::SingleGoal {
            target: None,
            reward: default_goal_reward(),
        }
    }

    pub fn sequence() -> Self {
        RewardPolicyConfig::Sequence {
            center: None,
            bonus: default_sequence_bonus(),
            penalty: default_sequence_penalty(),
        }
    }

    pub fn manual() -> Self {
        RewardPolicyConfig::Manual { reward: 0.0 }
    }

    /// Instantiate the policy for a grid.
    ///
    /// # Errors
    ///
    /// Fails if a target or sequence does not fit in `bounds`.
    pub fn build(&self, bounds: &GridBounds) -> Result<Box<dyn RewardPolicy>> {
        let policy: Box<dyn RewardPolicy> = match *self {
            RewardPolicyConfig::SingleGoal { target, reward } => {
                let target = bounds.check(target.unwrap_or_else(|| bounds.center()))?;
                Box::new(SingleGoalReward::with_reward(target, reward))
            }
            RewardPolicyConfig::Sequence {
                center,
                bonus,
                penalty,
            } => {
                let center = center.unwrap_or_else(|| bounds.center());
                Box::new(SequenceReward::with_payouts(center, bounds, bonus, penalty)?)
            }
            RewardPolicyConfig::Manual { reward } => Box::new(ManualReward::with_reward(reward)),
            RewardPolicyConfig::PointsDelta => Box::new(PointsDeltaReward),
        };
        Ok(policy)
    }
}

impl Default for RewardPolicyConfig {
    fn default() -> Self {
        Self::single_goal()
    }
}

impl fmt::Display for RewardPolicyConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            RewardPolicyConfig::SingleGoal { .. } => "single-goal",
            RewardPolicyConfig::Sequence { .. } => "sequence",
            RewardPolicyConfig::Manual { .. } => "manual",
            RewardPolicyConfig::PointsDelta => "points-delta",
        };
        f.write_str(label)
    }
}

impl FromStr for RewardPolicyConfig {
    type Err = Error;

    /// Parses a policy name into its default parameters.
    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().replace('_', "-").as_str() {
            "single-goal" | "goal" | "auto" => Ok(Self::single_goal()),
            "sequence" | "path" => Ok(Self::sequence()),
            "manual" => Ok(Self::manual()),
            "points-delta" | "points" => Ok(RewardPolicyConfig::PointsDelta),
            _ => Err(Error::ParseRewardPolicy {
                input: s.to_string(),
                expected: "single-goal, sequence, manual, points-delta".to_string(),
            }),
        }
    }
}

/// Configuration for creating a [`Game`] with a Q-learning agent.
///
/// # Examples
///
/// ```
/// use gridlearn::config::{GameConfig, RewardPolicyConfig};
/// use gridlearn::game::LearningMode;
///
/// let mut game = GameConfig::default()
///     .with_grid(5, 5)
///     .with_reward_policy(RewardPolicyConfig::sequence())
///     .with_learning_mode(LearningMode::Deferred)
///     .with_seed(42)
///     .build()?;
/// game.take_turn()?;
/// # Ok::<(), gridlearn::Error>(())
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    pub grid_length_x: usize,
    pub grid_length_z: usize,
    /// Starting cell (grid center when omitted)
    pub start: Option<Position>,
    /// Learning rate α
    pub learning_rate: f64,
    /// Discount factor γ
    pub discount_factor: f64,
    pub exploration: ExplorationSchedule,
    pub reward_policy: RewardPolicyConfig,
    pub learning_mode: LearningMode,
    pub scoring: ScoringRule,
    /// Random seed for reproducibility
    pub seed: Option<u64>,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            grid_length_x: 7,
            grid_length_z: 7,
            start: None,
            learning_rate: 0.1,
            discount_factor: 0.9,
            exploration: ExplorationSchedule::default(),
            reward_policy: RewardPolicyConfig::default(),
            learning_mode: LearningMode::default(),
            scoring: ScoringRule::default(),
            seed: None,
        }
    }
}

impl GameConfig {
    /// Load a configuration from a JSON file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let file = std::fs::File::open(path).map_err(|source| Error::Io {
            operation: format!("open config {}", path.display()),
            source,
        })?;
        let config: Self = serde_json::from_reader(std::io::BufReader::new(file))?;
        config.validate()?;
        Ok(config)
    }

    /// Save the configuration as pretty JSON.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let file = std::fs::File::create(path)?;
        serde_json::to_writer_pretty(file, self)?;
        Ok(())
    }

    pub fn with_grid(mut self, length_x: usize, length_z: usize) -> Self {
        self.grid_length_x = length_x;
        self.grid_length_z = length_z;
        self
    }

    pub fn with_start(mut self, start: Position) -> Self {
        self.start = Some(start);
        self
    }

    pub fn with_learning_rate(mut self, learning_rate: f64) -> Self {
        self.learning_rate = learning_rate;
        self
    }

    pub fn with_discount_factor(mut self, discount_factor: f64) -> Self {
        self.discount_factor = discount_factor;
        self
    }

    pub fn with_exploration(mut self, exploration: ExplorationSchedule) -> Self {
        self.exploration = exploration;
        self
    }

    pub fn with_reward_policy(mut self, reward_policy: RewardPolicyConfig) -> Self {
        self.reward_policy = reward_policy;
        self
    }

    pub fn with_learning_mode(mut self, mode: LearningMode) -> Self {
        self.learning_mode = mode;
        self
    }

    pub fn with_scoring(mut self, scoring: ScoringRule) -> Self {
        self.scoring = scoring;
        self
    }

    /// Set the random seed for deterministic behavior.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn bounds(&self) -> Result<GridBounds> {
        GridBounds::new(self.grid_length_x, self.grid_length_z)
    }

    /// Starting cell, defaulting to the grid center.
    pub fn start_position(&self) -> Result<Position> {
        let bounds = self.bounds()?;
        bounds.check(self.start.unwrap_or_else(|| bounds.center()))
    }

    /// Check every field for consistency.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidConfiguration`] (or a bounds error) for the
    /// first problem found.
    pub fn validate(&self) -> Result<()> {
        let bounds = self.bounds()?;
        self.start_position()?;
        check_unit_interval("learning_rate", self.learning_rate)?;
        check_unit_interval("discount_factor", self.discount_factor)?;
        self.exploration.validate()?;
        self.scoring.validate()?;
        self.reward_policy.build(&bounds)?;
        Ok(())
    }

    /// Build the Q-learning agent described by this configuration.
    ///
    /// A configured seed is applied through [`Learner::set_rng_seed`].
    pub fn build_agent(&self) -> Result<QLearningAgent> {
        let mut agent = QLearningAgent::new(
            self.learning_rate,
            self.discount_factor,
            self.exploration.clone(),
        );
        if let Some(seed) = self.seed {
            agent.set_rng_seed(seed)?;
        }
        Ok(agent)
    }

    /// Build a game with the configured reward policy.
    pub fn build(&self) -> Result<Game> {
        let bounds = self.bounds()?;
        let policy = self.reward_policy.build(&bounds)?;
        self.build_with_reward_policy(policy)
    }

    /// Build a game with a caller-supplied reward policy.
    ///
    /// Used to keep a [`crate::rewards::ManualRewardHandle`] for a policy
    /// that is about to be boxed into the game.
    pub fn build_with_reward_policy(&self, policy: Box<dyn RewardPolicy>) -> Result<Game> {
        self.validate()?;
        let game = Game::new(
            self.bounds()?,
            self.start_position()?,
            Box::new(self.build_agent()?),
            policy,
        )?
        .with_scoring(self.scoring)
        .with_learning_mode(self.learning_mode);
        Ok(game)
    }
}

fn check_unit_interval(name: &str, value: f64) -> Result<()> {
    if (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(Error::config(format!("{name} must be in [0, 1] (got {value})")))
    }
}
