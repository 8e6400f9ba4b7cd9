//! Core value types shared by the turn engine, learners and reward policies.

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

/// A cell on the grid.
///
/// `x` and `z` follow the floor-plane naming of the rendered scene; both are
/// zero-based column indices bounded by the grid dimensions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Position {
    pub x: usize,
    pub z: usize,
}

impl Position {
    pub const fn new(x: usize, z: usize) -> Self {
        Self { x, z }
    }
}

impl From<(usize, usize)> for Position {
    fn from((x, z): (usize, usize)) -> Self {
        Self { x, z }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.z)
    }
}

/// The closed set of moves available to the agent each turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Action {
    MoveXPos,
    MoveXNeg,
    MoveZPos,
    MoveZNeg,
    Jump,
}

impl Action {
    /// Number of actions; also the width of every value-table row.
    pub const COUNT: usize = 5;

    /// All actions in index order.
    pub const ALL: [Action; Action::COUNT] = [
        Action::MoveXPos,
        Action::MoveXNeg,
        Action::MoveZPos,
        Action::MoveZNeg,
        Action::Jump,
    ];

    /// Stable index of this action (`0..5`).
    pub const fn index(self) -> usize {
        match self {
            Action::MoveXPos => 0,
            Action::MoveXNeg => 1,
            Action::MoveZPos => 2,
            Action::MoveZNeg => 3,
            Action::Jump => 4,
        }
    }

    /// Resolve an index back to an action.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::UnknownAction`] for indices outside `0..5`.
    pub fn from_index(index: usize) -> crate::Result<Self> {
        Action::ALL
            .get(index)
            .copied()
            .ok_or(crate::Error::UnknownAction { index })
    }

    /// Short machine-friendly name, used in CSV headers and logs.
    pub const fn as_str(self) -> &'static str {
        match self {
            Action::MoveXPos => "move_x_pos",
            Action::MoveXNeg => "move_x_neg",
            Action::MoveZPos => "move_z_pos",
            Action::MoveZNeg => "move_z_neg",
            Action::Jump => "jump",
        }
    }

    /// Human-readable label.
    pub const fn describe(self) -> &'static str {
        match self {
            Action::MoveXPos => "Move positive x",
            Action::MoveXNeg => "Move negative x",
            Action::MoveZPos => "Move positive z",
            Action::MoveZNeg => "Move negative z",
            Action::Jump => "Jump",
        }
    }

    pub const fn is_move(self) -> bool {
        !matches!(self, Action::Jump)
    }
}

impl TryFrom<usize> for Action {
    type Error = crate::Error;

    fn try_from(index: usize) -> Result<Self, Self::Error> {
        Action::from_index(index)
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Action {
    type Err = crate::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "move_x_pos" | "move-x-pos" | "x+" => Ok(Action::MoveXPos),
            "move_x_neg" | "move-x-neg" | "x-" => Ok(Action::MoveXNeg),
            "move_z_pos" | "move-z-pos" | "z+" => Ok(Action::MoveZPos),
            "move_z_neg" | "move-z-neg" | "z-" => Ok(Action::MoveZNeg),
            "jump" => Ok(Action::Jump),
            _ => Err(crate::Error::ParseAction {
                input: s.to_string(),
                expected: "move_x_pos, move_x_neg, move_z_pos, move_z_neg, jump".to_string(),
            }),
        }
    }
}

/// One value per action, indexed by [`Action::index`].
///
/// This is both the storage row of the value table and the read-only
/// snapshot handed out for diagnostics, so every action always has an entry.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ActionValues(pub [f64; Action::COUNT]);

impl ActionValues {
    pub const fn zeros() -> Self {
        ActionValues([0.0; Action::COUNT])
    }

    pub fn get(&self, action: Action) -> f64 {
        self.0[action.index()]
    }

    pub fn set(&mut self, action: Action, value: f64) {
        self.0[action.index()] = value;
    }

    /// Largest stored value.
    pub fn max_value(&self) -> f64 {
        self.0.iter().copied().fold(f64::NEG_INFINITY, f64::max)
    }

    /// Every action whose value equals the maximum.
    pub fn best_actions(&self) -> Vec<Action> {
        let max = self.max_value();
        self.iter()
            .filter(|&(_, value)| value == max)
            .map(|(action, _)| action)
            .collect()
    }

    /// The unique greedy action, or `None` when several actions tie.
    pub fn unique_best(&self) -> Option<Action> {
        match self.best_actions().as_slice() {
            [only] => Some(*only),
            _ => None,
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (Action, f64)> + '_ {
        Action::ALL.iter().map(|&action| (action, self.get(action)))
    }
}

/// Snapshot of the agent at the end of a turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerState {
    pub position: Position,
    pub points: i64,
}

impl PlayerState {
    pub const fn new(position: Position) -> Self {
        Self {
            position,
            points: 0,
        }
    }
}

/// What happened during one turn, before any reward is attached.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Transition {
    pub action: Action,
    pub old_state: PlayerState,
    pub new_state: PlayerState,
}

impl Transition {
    /// Whether the position changed during this transition.
    pub fn moved(&self) -> bool {
        self.old_state.position != self.new_state.position
    }

    pub fn points_delta(&self) -> i64 {
        self.new_state.points - self.old_state.points
    }
}

/// A transition together with the reward assigned to it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Feedback {
    pub transition: Transition,
    pub reward: f64,
}

/// Result of [`crate::game::Game::take_turn`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TurnResult {
    /// One-based turn counter.
    pub turn: u64,
    /// The transition produced this turn.
    pub transition: Transition,
    /// Feedback delivered to the learner during this turn.
    ///
    /// Under immediate learning this is this turn's own transition. Under
    /// deferred learning it is the previous turn's transition, and `None` on
    /// the first turn.
    pub feedback: Option<Feedback>,
}

impl TurnResult {
    pub fn action(&self) -> Action {
        self.transition.action
    }

    pub fn position(&self) -> Position {
        self.transition.new_state.position
    }

    /// Reward delivered to the learner this turn, if any.
    pub fn reward(&self) -> Option<f64> {
        self.feedback.map(|feedback| feedback.reward)
    }
}
