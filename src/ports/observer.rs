//! Observer port - abstraction for run observation and data collection
//!
//! Observers replace the rendering loop of an interactive front end: they see
//! every turn the runner executes and may collect metrics, write files or log.

use crate::{
    Result,
    pipeline::RunSummary,
    ports::Learner,
    types::{Feedback, TurnResult},
};

/// Observer trait for monitoring simulation runs
///
/// # Event Sequence
///
/// 1. `on_run_start(total_turns)` - once at the beginning
/// 2. `on_turn(result, learner)` - after every completed turn
/// 3. `on_flush(feedback)` - if the final deferred transition was learned
/// 4. `on_run_end(summary)` - once at the end
///
/// # Examples
///
/// ```
/// use gridlearn::{ports::{Learner, Observer}, TurnResult};
///
/// struct JumpCounter {
///     jumps: usize,
/// }
///
/// impl Observer for JumpCounter {
///     fn on_turn(&mut self, result: &TurnResult, _learner: &dyn Learner) -> gridlearn::Result<()> {
///         if !result.action().is_move() {
///             self.jumps += 1;
///         }
///         Ok(())
///     }
/// }
/// ```
pub trait Observer: Send {
    /// Called when a run starts.
    ///
    /// # Default Implementation
    ///
    /// Does nothing. Override to initialize observation state.
    fn on_run_start(&mut self, _total_turns: u64) -> Result<()> {
        Ok(())
    }

    /// Called after each turn, once learning for that turn has happened.
    ///
    /// The learner is passed read-only so observers can sample epsilon or the
    /// action spread without affecting the run.
    fn on_turn(&mut self, _result: &TurnResult, _learner: &dyn Learner) -> Result<()> {
        Ok(())
    }

    /// Called when the runner flushes a pending deferred transition.
    fn on_flush(&mut self, _feedback: &Feedback) -> Result<()> {
        Ok(())
    }

    /// Called when the run completes.
    fn on_run_end(&mut self, _summary: &RunSummary) -> Result<()> {
        Ok(())
    }
}
