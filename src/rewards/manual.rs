use std::sync::{Arc, Mutex, PoisonError};

use crate::{ports::RewardPolicy, types::Transition};

/// Shared setter for a [`ManualReward`].
///
/// The policy itself is boxed into the game, so the operator keeps a cloned
/// handle to change the reward between turns.
#[derive(Debug, Clone, Default)]
pub struct ManualRewardHandle {
    value: Arc<Mutex<f64>>,
}

impl ManualRewardHandle {
    pub fn set_reward(&self, value: f64) {
        *self.value.lock().unwrap_or_else(PoisonError::into_inner) = value;
    }

    pub fn reward(&self) -> f64 {
        *self.value.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Returns the reward most recently set by an operator (initially `0`).
#[derive(Debug, Clone, Default)]
pub struct ManualReward {
    handle: ManualRewardHandle,
}

impl ManualReward {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_reward(value: f64) -> Self {
        let policy = Self::new();
        policy.set_reward(value);
        policy
    }

    pub fn handle(&self) -> ManualRewardHandle {
        self.handle.clone()
    }

    pub fn set_reward(&self, value: f64) {
        self.handle.set_reward(value);
    }

    pub fn current(&self) -> f64 {
        self.handle.reward()
    }
}

impl RewardPolicy for ManualReward {
    fn reward(&mut self, _transition: &Transition) -> f64 {
        self.handle.reward()
    }

    fn name(&self) -> &str {
        "manual"
    }

    fn as_any(&self) -> &dyn std::any::Any {
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Action, PlayerState, Position};

    fn any_transition() -> Transition {
        let state = PlayerState::new(Position::new(0, 0));
        Transition {
            action: Action::Jump,
            old_state: state,
            new_state: state,
        }
    }

    #[test]
    fn defaults_to_zero() {
        let mut policy = ManualReward::new();
        assert_eq!(policy.current(), 0.0);
        assert_eq!(policy.reward(&any_transition()), 0.0);
    }

    #[test]
    fn handle_updates_boxed_policy() {
        let policy = ManualReward::new();
        let handle = policy.handle();
        let mut boxed: Box<dyn RewardPolicy> = Box::new(policy);

        handle.set_reward(10.0);
        assert_eq!(boxed.reward(&any_transition()), 10.0);
        handle.set_reward(-2.5);
        assert_eq!(boxed.reward(&any_transition()), -2.5);
    }
}
