//! Ports (trait boundaries) between the turn engine and its collaborators.
//!
//! The engine owns one learner and one reward policy behind these traits and
//! never inspects which concrete variant it holds. The training pipeline
//! reports turns to observers through the same mechanism.

pub mod learner;
pub mod observer;
pub mod reward;

pub use learner::Learner;
pub use observer::Observer;
pub use reward::RewardPolicy;
