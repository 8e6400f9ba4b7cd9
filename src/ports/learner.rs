//! Learner port - abstraction for decision policies
//!
//! Tabular Q-learning is the main implementation; any other policy (a random
//! baseline, a function approximator) plugs into the engine through the same
//! trait.

use crate::{
    Result,
    types::{Action, ActionValues, Feedback, Position},
};

/// Decision policy driven by the turn engine.
///
/// # Event Sequence
///
/// Per turn the engine calls [`Learner::choose_action`] once and
/// [`Learner::learn`] at most once (never for the first turn under deferred
/// learning). Diagnostic reads ([`Learner::action_spread`],
/// [`Learner::epsilon`]) may happen at any time and must not change state.
///
/// # Examples
///
/// ```
/// use gridlearn::{Action, Position, ports::Learner};
/// use gridlearn::q_learning::{ExplorationSchedule, QLearningAgent};
///
/// let mut agent = QLearningAgent::new(0.1, 0.9, ExplorationSchedule::geometric(1.0, 0.99))
///     .with_seed(7);
/// let action = agent.choose_action(Position::new(3, 3))?;
/// assert!(Action::ALL.contains(&action));
/// # Ok::<(), gridlearn::Error>(())
/// ```
pub trait Learner: Send {
    /// Pick the next action for the agent standing at `position`.
    ///
    /// Implementations with an exploration schedule advance it by exactly one
    /// step per call.
    fn choose_action(&mut self, position: Position) -> Result<Action>;

    /// Incorporate the reward observed for a completed transition.
    ///
    /// # Default Implementation
    ///
    /// Does nothing, suitable for non-adaptive policies.
    fn learn(&mut self, _feedback: &Feedback) -> Result<()> {
        Ok(())
    }

    /// Read-only snapshot of the per-action estimates at `position`.
    ///
    /// Positions that were never visited report all zeros.
    fn action_spread(&self, position: Position) -> ActionValues;

    /// Current exploration rate.
    fn epsilon(&self) -> f64;

    /// Learner name, used in logs and summaries.
    fn name(&self) -> &str;

    /// Forget everything learned and restart the exploration schedule.
    fn reset(&mut self) -> Result<()> {
        Ok(())
    }

    /// Reseed the internal random number generator.
    fn set_rng_seed(&mut self, _seed: u64) -> Result<()> {
        Ok(())
    }

    /// Number of states the learner has stored estimates for, if tabular.
    fn visited_states(&self) -> Option<usize> {
        None
    }

    /// Enable downcasting to concrete types.
    fn as_any(&self) -> &dyn std::any::Any;
}
