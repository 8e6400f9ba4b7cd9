//! Tabular Q-learning
//!
//! The agent keeps one row of five action values per visited grid cell and
//! picks actions ε-greedily:
//!
//! - **explore** with probability ε: a uniformly random action
//! - **exploit** otherwise: a uniformly random action among the row maxima
//!
//! Epsilon follows an [`ExplorationSchedule`] that advances once per chosen
//! action. After each transition the stored value moves toward the one-step
//! Bellman target `r + γ·max_a' Q(s',a')` with weight α.
//!
//! ## Usage Example
//!
//! ```
//! use gridlearn::q_learning::{ExplorationSchedule, QLearningAgent};
//!
//! let agent = QLearningAgent::new(
//!     0.1, // learning_rate
//!     0.9, // discount_factor
//!     ExplorationSchedule::linear(1.0, 0.3, 500),
//! )
//! .with_seed(42);
//! ```

pub mod agent;
pub mod baseline;
pub mod q_table;
pub mod schedule;

// Public re-exports
pub use agent::QLearningAgent;
pub use baseline::RandomLearner;
pub use q_table::QTable;
pub use schedule::ExplorationSchedule;
