//! Turn engine

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::scoring::ScoringRule;
use crate::{
    Error, Result,
    grid::GridBounds,
    ports::{Learner, RewardPolicy},
    types::{Action, ActionValues, Feedback, PlayerState, Position, Transition, TurnResult},
};

/// When a transition's reward reaches the learner.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LearningMode {
    /// Reward and learn within the turn that produced the transition.
    #[default]
    Immediate,
    /// Reward and learn at the start of the following turn. The final
    /// transition is only learned from through [`Game::flush`].
    Deferred,
}

impl fmt::Display for LearningMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            LearningMode::Immediate => "immediate",
            LearningMode::Deferred => "deferred",
        };
        f.write_str(label)
    }
}

impl FromStr for LearningMode {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "immediate" => Ok(LearningMode::Immediate),
            "deferred" => Ok(LearningMode::Deferred),
            _ => Err(Error::ParseLearningMode {
                input: s.to_string(),
                expected: "immediate, deferred".to_string(),
            }),
        }
    }
}

/// Single-agent grid game.
///
/// Owns the agent state and drives one learner and one reward policy through
/// strictly sequential turns.
///
/// # Examples
///
/// ```
/// use gridlearn::{
///     game::Game,
///     grid::GridBounds,
///     q_learning::{ExplorationSchedule, QLearningAgent},
///     rewards::SingleGoalReward,
/// };
///
/// let bounds = GridBounds::new(7, 7)?;
/// let agent = QLearningAgent::new(0.1, 0.9, ExplorationSchedule::geometric(1.2, 0.999));
/// let mut game = Game::new(
///     bounds,
///     bounds.center(),
///     Box::new(agent),
///     Box::new(SingleGoalReward::new(bounds.center())),
/// )?;
///
/// let result = game.take_turn()?;
/// assert!(bounds.contains(result.position()));
/// # Ok::<(), gridlearn::Error>(())
/// ```
pub struct Game {
    bounds: GridBounds,
    state: PlayerState,
    learner: Box<dyn Learner>,
    reward_policy: Box<dyn RewardPolicy>,
    scoring: ScoringRule,
    mode: LearningMode,
    pending: Option<Transition>,
    turn: u64,
}

impl Game {
    /// Create a game with the agent at `start`.
    ///
    /// Uses the default [`ScoringRule`] and immediate learning.
    ///
    /// # Errors
    ///
    /// Returns [`Error::PositionOutOfBounds`] if `start` is off the grid.
    pub fn new(
        bounds: GridBounds,
        start: Position,
        learner: Box<dyn Learner>,
        reward_policy: Box<dyn RewardPolicy>,
    ) -> Result<Self> {
        let start = bounds.check(start)?;
        Ok(Self {
            bounds,
            state: PlayerState::new(start),
            learner,
            reward_policy,
            scoring: ScoringRule::default(),
            mode: LearningMode::default(),
            pending: None,
            turn: 0,
        })
    }

    pub fn with_scoring(mut self, scoring: ScoringRule) -> Self {
        self.scoring = scoring;
        self
    }

    pub fn with_learning_mode(mut self, mode: LearningMode) -> Self {
        self.mode = mode;
        self
    }

    /// Play one turn.
    ///
    /// Asks the learner for an action, moves the agent within the grid,
    /// updates points and hands the rewarded transition to the learner
    /// (immediately or at the start of the next turn, depending on the
    /// [`LearningMode`]).
    pub fn take_turn(&mut self) -> Result<TurnResult> {
        let mut feedback = match self.mode {
            LearningMode::Immediate => None,
            LearningMode::Deferred => self.deliver_pending()?,
        };

        let old_state = self.state;
        let action = self.learner.choose_action(old_state.position)?;
        let new_state = self.apply(old_state, action);
        self.state = new_state;
        self.turn += 1;

        let transition = Transition {
            action,
            old_state,
            new_state,
        };

        match self.mode {
            LearningMode::Immediate => feedback = Some(self.deliver(transition)?),
            LearningMode::Deferred => self.pending = Some(transition),
        }

        debug!(
            turn = self.turn,
            %action,
            from = %old_state.position,
            to = %new_state.position,
            points = new_state.points,
            reward = ?feedback.map(|f| f.reward),
            "turn complete"
        );

        Ok(TurnResult {
            turn: self.turn,
            transition,
            feedback,
        })
    }

    /// Learn from the transition still waiting for its reward.
    ///
    /// Only meaningful under deferred learning; returns `Ok(None)` when
    /// nothing is pending.
    pub fn flush(&mut self) -> Result<Option<Feedback>> {
        self.deliver_pending()
    }

    /// Transition awaiting its reward under deferred learning.
    pub fn pending(&self) -> Option<&Transition> {
        self.pending.as_ref()
    }

    fn deliver_pending(&mut self) -> Result<Option<Feedback>> {
        match self.pending.take() {
            Some(transition) => self.deliver(transition).map(Some),
            None => Ok(None),
        }
    }

    fn deliver(&mut self, transition: Transition) -> Result<Feedback> {
        let reward = self.reward_policy.reward(&transition);
        let feedback = Feedback { transition, reward };
        self.learner.learn(&feedback)?;
        Ok(feedback)
    }

    fn apply(&self, old_state: PlayerState, action: Action) -> PlayerState {
        let next = self.bounds.try_step(old_state.position, action);
        let blocked = next.is_none();
        let position = next.unwrap_or(old_state.position);
        let center_jump = action == Action::Jump && position == self.bounds.center();

        PlayerState {
            position,
            points: old_state
                .points
                .saturating_add(self.scoring.delta(blocked, center_jump)),
        }
    }

    pub fn state(&self) -> PlayerState {
        self.state
    }

    pub fn position(&self) -> Position {
        self.state.position
    }

    pub fn points(&self) -> i64 {
        self.state.points
    }

    /// Number of turns played so far.
    pub fn turn(&self) -> u64 {
        self.turn
    }

    pub fn bounds(&self) -> GridBounds {
        self.bounds
    }

    pub fn learning_mode(&self) -> LearningMode {
        self.mode
    }

    pub fn scoring(&self) -> ScoringRule {
        self.scoring
    }

    pub fn epsilon(&self) -> f64 {
        self.learner.epsilon()
    }

    pub fn action_spread(&self, position: Position) -> ActionValues {
        self.learner.action_spread(position)
    }

    pub fn learner(&self) -> &dyn Learner {
        self.learner.as_ref()
    }

    pub fn reward_policy(&self) -> &dyn RewardPolicy {
        self.reward_policy.as_ref()
    }

    /// Put the agent back at `start`, clear points and any pending
    /// transition, and reset the reward policy. Learned values are kept.
    pub fn restart(&mut self, start: Position) -> Result<()> {
        self.state = PlayerState::new(self.bounds.check(start)?);
        self.pending = None;
        self.turn = 0;
        self.reward_policy.reset();
        Ok(())
    }
}

impl fmt::Debug for Game {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Game")
            .field("bounds", &self.bounds)
            .field("state", &self.state)
            .field("learner", &self.learner.name())
            .field("reward_policy", &self.reward_policy.name())
            .field("mode", &self.mode)
            .field("turn", &self.turn)
            .finish()
    }
}
