//! Grid boundary rules.
//!
//! The environment has no state beyond its dimensions: a directional move
//! that would leave the grid is rejected and the agent stays put on that
//! axis, and [`Action::Jump`] never changes position.

use serde::{Deserialize, Serialize};

use crate::{
    Error, Result,
    types::{Action, Position},
};

/// Dimensions of the grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GridBounds {
    length_x: usize,
    length_z: usize,
}

impl GridBounds {
    /// Create bounds for a `length_x` by `length_z` grid.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidConfiguration`] if either side is zero.
    pub fn new(length_x: usize, length_z: usize) -> Result<Self> {
        if length_x == 0 || length_z == 0 {
            return Err(Error::config(format!(
                "grid dimensions must be positive (got {length_x}x{length_z})"
            )));
        }
        Ok(Self { length_x, length_z })
    }

    pub fn length_x(&self) -> usize {
        self.length_x
    }

    pub fn length_z(&self) -> usize {
        self.length_z
    }

    pub fn cell_count(&self) -> usize {
        self.length_x * self.length_z
    }

    /// Center cell, rounding down on even sides.
    pub fn center(&self) -> Position {
        Position::new(self.length_x / 2, self.length_z / 2)
    }

    pub fn contains(&self, position: Position) -> bool {
        position.x < self.length_x && position.z < self.length_z
    }

    /// Fails with [`Error::PositionOutOfBounds`] unless `position` is on the grid.
    pub fn check(&self, position: Position) -> Result<Position> {
        if self.contains(position) {
            Ok(position)
        } else {
            Err(Error::PositionOutOfBounds {
                x: position.x,
                z: position.z,
                length_x: self.length_x,
                length_z: self.length_z,
            })
        }
    }

    /// Apply `action`, returning `None` if a move would cross the boundary.
    pub fn try_step(&self, position: Position, action: Action) -> Option<Position> {
        let Position { x, z } = position;
        match action {
            Action::MoveXPos if x + 1 < self.length_x => Some(Position::new(x + 1, z)),
            Action::MoveXNeg if x > 0 => Some(Position::new(x - 1, z)),
            Action::MoveZPos if z + 1 < self.length_z => Some(Position::new(x, z + 1)),
            Action::MoveZNeg if z > 0 => Some(Position::new(x, z - 1)),
            Action::Jump => Some(position),
            _ => None,
        }
    }

    /// Total version of [`GridBounds::try_step`]: a rejected move is a no-op.
    pub fn step(&self, position: Position, action: Action) -> Position {
        self.try_step(position, action).unwrap_or(position)
    }

    /// Every cell, `x`-major.
    pub fn positions(&self) -> impl Iterator<Item = Position> + '_ {
        (0..self.length_x).flat_map(move |x| (0..self.length_z).map(move |z| Position::new(x, z)))
    }
}
