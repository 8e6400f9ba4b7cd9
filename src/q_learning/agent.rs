//! ε-greedy Q-learning agent
//!
//! Wraps a [`QTable`] with an exploration schedule and a seedable RNG and
//! exposes it through the [`Learner`] port.

use rand::{Rng, SeedableRng, rngs::StdRng, seq::IndexedRandom};
use tracing::trace;

use crate::{
    Result,
    ports::Learner,
    q_learning::{ExplorationSchedule, q_table::QTable},
    types::{Action, ActionValues, Feedback, Position},
};

fn build_rng(seed: Option<u64>) -> StdRng {
    if let Some(seed) = seed {
        StdRng::seed_from_u64(seed)
    } else {
        StdRng::from_rng(&mut rand::rng())
    }
}

/// Q-learning agent (off-policy TD control)
///
/// Learns the optimal action values by always updating toward the maximum
/// next-state value, regardless of the action the agent will actually take.
#[derive(Debug, Clone)]
pub struct QLearningAgent {
    q_table: QTable,
    schedule: ExplorationSchedule,
    rng: StdRng,
    rng_seed: Option<u64>,
}

impl QLearningAgent {
    /// Create a new Q-learning agent
    ///
    /// # Arguments
    ///
    /// * `learning_rate` - α parameter (0.0 to 1.0)
    /// * `discount_factor` - γ parameter (0.0 to 1.0)
    /// * `schedule` - How epsilon decays per chosen action
    pub fn new(learning_rate: f64, discount_factor: f64, schedule: ExplorationSchedule) -> Self {
        Self {
            q_table: QTable::new(learning_rate, discount_factor),
            schedule,
            rng: build_rng(None),
            rng_seed: None,
        }
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng = StdRng::seed_from_u64(seed);
        self.rng_seed = Some(seed);
        self
    }

    pub fn q_table(&self) -> &QTable {
        &self.q_table
    }

    pub fn schedule(&self) -> &ExplorationSchedule {
        &self.schedule
    }

    /// Greedy choice among tied maxima, uniform over the ties.
    fn exploit(&mut self, state: Position) -> Action {
        let best = self.q_table.row(state).best_actions();
        match best.choose(&mut self.rng) {
            Some(&action) => action,
            // A row always holds five values; stay total anyway.
            None => self.explore(),
        }
    }

    fn explore(&mut self) -> Action {
        Action::ALL[self.rng.random_range(0..Action::COUNT)]
    }

    fn reset_rng(&mut self) {
        self.rng = build_rng(self.rng_seed);
    }
}

impl Learner for QLearningAgent {
    fn choose_action(&mut self, position: Position) -> Result<Action> {
        // Every state the agent stands in gets a row, explored or not.
        self.q_table.row_mut(position);
        let epsilon = self.schedule.advance();
        let action = if self.rng.random::<f64>() < epsilon {
            let action = self.explore();
            trace!(%position, epsilon, %action, "exploring");
            action
        } else {
            let action = self.exploit(position);
            trace!(%position, epsilon, %action, "exploiting");
            action
        };
        Ok(action)
    }

    fn learn(&mut self, feedback: &Feedback) -> Result<()> {
        let transition = &feedback.transition;
        let state = transition.old_state.position;
        let old_q = self.q_table.get(state, transition.action);
        let new_q = self.q_table.q_learning_update(
            state,
            transition.action,
            feedback.reward,
            transition.new_state.position,
        );
        trace!(
            %state,
            action = %transition.action,
            reward = feedback.reward,
            old_q,
            new_q,
            "Q-learning update"
        );
        Ok(())
    }

    fn action_spread(&self, position: Position) -> ActionValues {
        self.q_table.row(position)
    }

    fn epsilon(&self) -> f64 {
        self.schedule.epsilon()
    }

    fn name(&self) -> &str {
        "Q-Learning"
    }

    fn reset(&mut self) -> Result<()> {
        self.q_table.reset();
        self.schedule.restart();
        self.reset_rng();
        Ok(())
    }

    fn set_rng_seed(&mut self, seed: u64) -> Result<()> {
        self.rng = StdRng::seed_from_u64(seed);
        self.rng_seed = Some(seed);
        Ok(())
    }

    fn visited_states(&self) -> Option<usize> {
        Some(self.q_table.size())
    }

    fn as_any(&self) -> &dyn std::any::Any {
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{PlayerState, Transition};

    fn feedback(from: Position, action: Action, to: Position, reward: f64) -> Feedback {
        Feedback {
            transition: Transition {
                action,
                old_state: PlayerState::new(from),
                new_state: PlayerState::new(to),
            },
            reward,
        }
    }

    #[test]
    fn greedy_agent_picks_best_action() {
        let mut agent = QLearningAgent::new(0.5, 0.9, ExplorationSchedule::constant(0.0)).with_seed(1);
        let state = Position::new(2, 2);
        agent.learn(&feedback(state, Action::MoveZNeg, Position::new(2, 1), 1.0)).unwrap();
        for _ in 0..20 {
            assert_eq!(agent.choose_action(state).unwrap(), Action::MoveZNeg);
        }
    }

    #[test]
    fn ties_are_broken_across_all_maxima() {
        let mut agent = QLearningAgent::new(0.5, 0.9, ExplorationSchedule::constant(0.0)).with_seed(3);
        let state = Position::new(0, 0);
        let mut seen = std::collections::HashSet::new();
        for _ in 0..200 {
            seen.insert(agent.choose_action(state).unwrap());
        }
        assert_eq!(seen.len(), Action::COUNT);
    }

    #[test]
    fn choose_action_inserts_row_but_spread_does_not() {
        let mut agent = QLearningAgent::new(0.1, 0.9, ExplorationSchedule::constant(0.0)).with_seed(5);
        assert_eq!(agent.action_spread(Position::new(1, 1)), ActionValues::zeros());
        assert_eq!(agent.visited_states(), Some(0));
        agent.choose_action(Position::new(1, 1)).unwrap();
        assert_eq!(agent.visited_states(), Some(1));
    }

    #[test]
    fn exploring_choice_also_inserts_row() {
        let mut agent = QLearningAgent::new(0.1, 0.9, ExplorationSchedule::constant(1.0)).with_seed(5);
        agent.choose_action(Position::new(4, 0)).unwrap();
        agent.choose_action(Position::new(0, 4)).unwrap();
        assert_eq!(agent.visited_states(), Some(2));
        assert!(agent.q_table().contains(Position::new(4, 0)));
    }

    #[test]
    fn set_rng_seed_matches_with_seed() {
        let schedule = ExplorationSchedule::geometric(1.0, 0.99);
        let mut seeded = QLearningAgent::new(0.1, 0.9, schedule.clone()).with_seed(17);
        let mut reseeded = QLearningAgent::new(0.1, 0.9, schedule);
        reseeded.set_rng_seed(17).unwrap();
        for step in 0..100 {
            let position = Position::new(step % 5, step % 3);
            assert_eq!(
                seeded.choose_action(position).unwrap(),
                reseeded.choose_action(position).unwrap()
            );
        }
    }

    #[test]
    fn epsilon_decays_on_every_choice() {
        let mut agent = QLearningAgent::new(0.1, 0.9, ExplorationSchedule::geometric(1.0, 0.5)).with_seed(9);
        agent.choose_action(Position::new(0, 0)).unwrap();
        assert_eq!(agent.epsilon(), 0.5);
        agent.choose_action(Position::new(0, 0)).unwrap();
        assert_eq!(agent.epsilon(), 0.25);
    }

    #[test]
    fn reset_clears_table_and_schedule() {
        let mut agent = QLearningAgent::new(0.1, 0.9, ExplorationSchedule::geometric(1.0, 0.5)).with_seed(9);
        agent.choose_action(Position::new(0, 0)).unwrap();
        agent.learn(&feedback(Position::new(0, 0), Action::Jump, Position::new(0, 0), 1.0)).unwrap();
        agent.reset().unwrap();
        assert_eq!(agent.visited_states(), Some(0));
        assert_eq!(agent.epsilon(), 1.0);
    }

    #[test]
    fn same_seed_gives_same_choices() {
        let mut first = QLearningAgent::new(0.1, 0.9, ExplorationSchedule::geometric(1.0, 0.99)).with_seed(42);
        let mut second = QLearningAgent::new(0.1, 0.9, ExplorationSchedule::geometric(1.0, 0.99)).with_seed(42);
        for step in 0..100 {
            let position = Position::new(step % 7, (step / 7) % 7);
            assert_eq!(
                first.choose_action(position).unwrap(),
                second.choose_action(position).unwrap()
            );
        }
    }
}
