use crate::{ports::RewardPolicy, types::Transition};

/// Uses the change in game points as the reward.
///
/// With the default scoring rule this teaches the agent to avoid walls
/// (`-10`), to jump in the center (`+100`) and that idling costs `-1`.
#[derive(Debug, Clone, Copy, Default)]
pub struct PointsDeltaReward;

impl RewardPolicy for PointsDeltaReward {
    fn reward(&mut self, transition: &Transition) -> f64 {
        transition.points_delta() as f64
    }

    fn name(&self) -> &str {
        "points-delta"
    }

    fn as_any(&self) -> &dyn std::any::Any {
        self
    }
}
