//! Path-sequence reward
//!
//! The target path is the ring of eight cells around a center cell, walked
//! counter-clockwise starting east of the center:
//!
//! ```text
//!  z+1   3  2  1
//!  z     4  .  0
//!  z-1   5  6  7
//!       x-1 x x+1
//! ```
//!
//! Every step that continues the ring earns the current progress, closing
//! the full ring earns a bonus, and stepping back along the ring is
//! penalised. Any other move drops progress to zero.

use tracing::trace;

use crate::{
    Error, Result,
    grid::GridBounds,
    ports::RewardPolicy,
    types::{Position, Transition},
};

/// Number of cells in the target ring.
pub const SEQUENCE_LENGTH: usize = 8;

const OFFSETS: [(isize, isize); SEQUENCE_LENGTH] = [
    (1, 0),
    (1, 1),
    (0, 1),
    (-1, 1),
    (-1, 0),
    (-1, -1),
    (0, -1),
    (1, -1),
];

/// Rewards walking the ring around `center` in order.
#[derive(Debug, Clone, PartialEq)]
pub struct SequenceReward {
    cells: [Position; SEQUENCE_LENGTH],
    progress: usize,
    bonus: f64,
    penalty: f64,
}

impl SequenceReward {
    /// Ring around `center` with the default bonus (`10`) and penalty (`-1`).
    ///
    /// # Errors
    ///
    /// Returns [`Error::SequenceOutOfBounds`] if any ring cell is off the grid.
    pub fn new(center: Position, bounds: &GridBounds) -> Result<Self> {
        Self::with_payouts(center, bounds, 10.0, -1.0)
    }

    pub fn with_payouts(
        center: Position,
        bounds: &GridBounds,
        bonus: f64,
        penalty: f64,
    ) -> Result<Self> {
        let out_of_bounds = || Error::SequenceOutOfBounds {
            x: center.x,
            z: center.z,
            length_x: bounds.length_x(),
            length_z: bounds.length_z(),
        };

        let mut cells = [center; SEQUENCE_LENGTH];
        for (cell, (dx, dz)) in cells.iter_mut().zip(OFFSETS) {
            let x = center.x.checked_add_signed(dx).ok_or_else(out_of_bounds)?;
            let z = center.z.checked_add_signed(dz).ok_or_else(out_of_bounds)?;
            *cell = Position::new(x, z);
            if !bounds.contains(*cell) {
                return Err(out_of_bounds());
            }
        }

        Ok(Self {
            cells,
            progress: 0,
            bonus,
            penalty,
        })
    }

    pub fn cells(&self) -> &[Position; SEQUENCE_LENGTH] {
        &self.cells
    }

    /// Number of consecutive ring steps taken so far.
    pub fn progress(&self) -> usize {
        self.progress
    }

    fn index_of(&self, position: Position) -> Option<usize> {
        self.cells.iter().position(|&cell| cell == position)
    }

    fn next_index(index: usize) -> usize {
        (index + 1) % SEQUENCE_LENGTH
    }

    fn previous_index(index: usize) -> usize {
        (index + SEQUENCE_LENGTH - 1) % SEQUENCE_LENGTH
    }
}

impl RewardPolicy for SequenceReward {
    fn reward(&mut self, transition: &Transition) -> f64 {
        if !transition.action.is_move() {
            return 0.0;
        }

        let new_index = self.index_of(transition.new_state.position);

        if self.progress == 0 {
            return match new_index {
                Some(_) => {
                    self.progress = 1;
                    trace!(position = %transition.new_state.position, "sequence started");
                    1.0
                }
                None => 0.0,
            };
        }

        let (Some(old_index), Some(new_index)) =
            (self.index_of(transition.old_state.position), new_index)
        else {
            self.progress = 0;
            return 0.0;
        };

        if new_index == Self::next_index(old_index) {
            self.progress += 1;
            if self.progress == SEQUENCE_LENGTH {
                self.progress = 0;
                trace!("sequence completed");
                return self.bonus;
            }
            return self.progress as f64;
        }

        self.progress = 0;
        if new_index == Self::previous_index(old_index) {
            self.penalty
        } else {
            0.0
        }
    }

    fn name(&self) -> &str {
        "sequence"
    }

    fn reset(&mut self) {
        self.progress = 0;
    }

    fn as_any(&self) -> &dyn std::any::Any {
        self
    }
}
