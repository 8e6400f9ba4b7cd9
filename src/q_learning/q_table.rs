//! Q-table implementation for temporal difference learning

use std::collections::HashMap;

use crate::types::{Action, ActionValues, Position};

/// Q-table mapping positions to one value per action.
///
/// Rows are created all-zero the first time [`QTable::row_mut`] touches a
/// position, so every stored position always carries all five actions.
/// Read-only accessors never insert.
#[derive(Debug, Clone)]
pub struct QTable {
    rows: HashMap<Position, ActionValues>,
    /// Learning rate α
    learning_rate: f64,
    /// Discount factor γ
    discount_factor: f64,
}

impl QTable {
    /// Create a new Q-table
    pub fn new(learning_rate: f64, discount_factor: f64) -> Self {
        Self {
            rows: HashMap::new(),
            learning_rate,
            discount_factor,
        }
    }

    /// Get the Q-value for a state-action pair, zero if never stored.
    pub fn get(&self, state: Position, action: Action) -> f64 {
        self.rows.get(&state).map_or(0.0, |row| row.get(action))
    }

    /// Copy of the row at `state`, or all zeros. Does not insert.
    pub fn row(&self, state: Position) -> ActionValues {
        self.rows.get(&state).copied().unwrap_or_default()
    }

    /// Mutable row at `state`, inserted all-zero on first touch.
    pub fn row_mut(&mut self, state: Position) -> &mut ActionValues {
        self.rows.entry(state).or_default()
    }

    pub fn set(&mut self, state: Position, action: Action, value: f64) {
        self.row_mut(state).set(action, value);
    }

    /// Maximum Q-value over all actions at `state` (zero for unseen states).
    pub fn max_q(&self, state: Position) -> f64 {
        self.row(state).max_value()
    }

    /// Q-learning update: off-policy TD control
    ///
    /// Q(s,a) ← (1-α)·Q(s,a) + α·(r + γ·max_a' Q(s',a'))
    ///
    /// Both rows are created if missing. Repeated calls with the same inputs
    /// contract the stored value toward the Bellman target rather than
    /// leaving it unchanged. Returns the new value.
    pub fn q_learning_update(
        &mut self,
        state: Position,
        action: Action,
        reward: f64,
        next_state: Position,
    ) -> f64 {
        self.row_mut(next_state);
        let max_next_q = self.max_q(next_state);
        let current_q = self.get(state, action);
        let td_target = reward + self.discount_factor * max_next_q;
        let new_q = (1.0 - self.learning_rate) * current_q + self.learning_rate * td_target;
        self.set(state, action, new_q);
        new_q
    }

    /// Reset all Q-values
    pub fn reset(&mut self) {
        self.rows.clear();
    }

    /// Number of positions with a stored row
    pub fn size(&self) -> usize {
        self.rows.len()
    }

    pub fn contains(&self, state: Position) -> bool {
        self.rows.contains_key(&state)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_qtable_initialization() {
        let qtable = QTable::new(0.5, 0.99);
        let state = Position::new(1, 1);
        assert_eq!(qtable.get(state, Action::Jump), 0.0);
        assert_eq!(qtable.row(state), ActionValues::zeros());
        assert_eq!(qtable.size(), 0);
    }

    #[test]
    fn test_row_mut_inserts_full_row() {
        let mut qtable = QTable::new(0.5, 0.99);
        let state = Position::new(2, 0);
        qtable.row_mut(state);
        assert!(qtable.contains(state));
        assert_eq!(qtable.row(state), ActionValues::zeros());
    }

    #[test]
    fn test_max_q() {
        let mut qtable = QTable::new(0.5, 0.99);
        let state = Position::new(0, 0);
        qtable.set(state, Action::MoveXPos, 0.5);
        qtable.set(state, Action::MoveZPos, 1.5);
        qtable.set(state, Action::Jump, 0.8);
        assert_eq!(qtable.max_q(state), 1.5);
    }

    #[test]
    fn test_max_q_ignores_negative_only_rows() {
        let mut qtable = QTable::new(0.5, 0.99);
        let state = Position::new(0, 0);
        qtable.set(state, Action::MoveXPos, -3.0);
        assert_eq!(qtable.max_q(state), 0.0);
    }

    #[test]
    fn test_q_learning_update() {
        let mut qtable = QTable::new(0.5, 0.99);
        let state = Position::new(3, 3);
        let next_state = Position::new(4, 3);

        qtable.set(next_state, Action::MoveXNeg, 1.0);
        qtable.set(next_state, Action::Jump, 2.0);

        qtable.q_learning_update(state, Action::MoveXPos, 0.0, next_state);

        // Q(s,a) = 0.5 * 0.0 + 0.5 * (0.0 + 0.99 * 2.0) = 0.99
        let updated_q = qtable.get(state, Action::MoveXPos);
        assert!((updated_q - 0.99).abs() < 1e-12);
    }

    #[test]
    fn test_update_creates_next_row() {
        let mut qtable = QTable::new(0.1, 0.9);
        qtable.q_learning_update(Position::new(0, 0), Action::MoveXPos, 1.0, Position::new(1, 0));
        assert_eq!(qtable.size(), 2);
        assert!((qtable.get(Position::new(0, 0), Action::MoveXPos) - 0.1).abs() < 1e-12);
    }
}
