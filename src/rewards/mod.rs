//! Reward policies
//!
//! Each policy implements [`RewardPolicy`](crate::ports::RewardPolicy) and is
//! chosen when the game is built:
//!
//! - [`SingleGoalReward`] - pays out for jumping on one target cell
//! - [`SequenceReward`] - escalating reward for walking a ring of cells in order
//! - [`ManualReward`] - whatever an operator set last
//! - [`PointsDeltaReward`] - the change in game points

pub mod manual;
pub mod points;
pub mod sequence;
pub mod single_goal;

pub use manual::{ManualReward, ManualRewardHandle};
pub use points::PointsDeltaReward;
pub use sequence::SequenceReward;
pub use single_goal::SingleGoalReward;
