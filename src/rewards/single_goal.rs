use crate::{
    ports::RewardPolicy,
    types::{Action, Position, Transition},
};

/// Rewards a [`Action::Jump`] performed on the target cell.
///
/// Since jumping never moves the agent, the reward depends only on standing
/// on the target when jumping, not on how the agent got there.
#[derive(Debug, Clone, PartialEq)]
pub struct SingleGoalReward {
    target: Position,
    reward: f64,
}

impl SingleGoalReward {
    pub fn new(target: Position) -> Self {
        Self::with_reward(target, 1.0)
    }

    pub fn with_reward(target: Position, reward: f64) -> Self {
        Self { target, reward }
    }

    pub fn target(&self) -> Position {
        self.target
    }
}

impl RewardPolicy for SingleGoalReward {
    fn reward(&mut self, transition: &Transition) -> f64 {
        if transition.action == Action::Jump && transition.new_state.position == self.target {
            self.reward
        } else {
            0.0
        }
    }

    fn name(&self) -> &str {
        "single-goal"
    }

    fn as_any(&self) -> &dyn std::any::Any {
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::PlayerState;

    fn transition(action: Action, from: Position, to: Position) -> Transition {
        Transition {
            action,
            old_state: PlayerState::new(from),
            new_state: PlayerState::new(to),
        }
    }

    #[test]
    fn jump_on_target_pays() {
        let target = Position::new(3, 3);
        let mut policy = SingleGoalReward::new(target);
        assert_eq!(policy.reward(&transition(Action::Jump, target, target)), 1.0);
    }

    #[test]
    fn arriving_on_target_does_not_pay() {
        let target = Position::new(3, 3);
        let mut policy = SingleGoalReward::with_reward(target, 5.0);
        let from = Position::new(2, 3);
        assert_eq!(policy.reward(&transition(Action::MoveXPos, from, target)), 0.0);
        assert_eq!(policy.reward(&transition(Action::Jump, from, from)), 0.0);
        assert_eq!(policy.reward(&transition(Action::Jump, target, target)), 5.0);
    }
}
