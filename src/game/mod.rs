//! Turn engine and points bookkeeping
//!
//! One turn runs to completion synchronously:
//!
//! 1. the learner chooses an action for the current position
//! 2. the grid applies the move (or rejects it at the boundary)
//! 3. the scoring rule updates points
//! 4. the reward policy scores the transition
//! 5. the learner learns from the rewarded transition
//!
//! Steps 4 and 5 run either in the same turn or at the start of the next one,
//! see [`LearningMode`].

pub mod engine;
pub mod scoring;

pub use engine::{Game, LearningMode};
pub use scoring::ScoringRule;
