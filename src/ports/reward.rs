//! Reward policy port

use crate::types::Transition;

/// Converts a completed transition into a scalar learning signal.
///
/// Policies may keep internal progress (see
/// [`crate::rewards::SequenceReward`]), so the engine calls
/// [`RewardPolicy::reward`] exactly once per transition, in turn order.
pub trait RewardPolicy: Send {
    fn reward(&mut self, transition: &Transition) -> f64;

    fn name(&self) -> &str;

    /// Drop any progress tracked across transitions.
    fn reset(&mut self) {}

    /// Enable downcasting to concrete types.
    fn as_any(&self) -> &dyn std::any::Any;
}
