//! CSV export of per-cell action values
//!
//! Writes one row per grid cell with the learner's estimate for each action
//! and the greedy action, the tabular equivalent of drawing a policy arrow on
//! every cell.

use std::{io::Write, path::Path};

use serde::Serialize;

use crate::{Result, grid::GridBounds, ports::Learner, types::Action};

/// A single row in the spread CSV export
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SpreadRecord {
    pub x: usize,
    pub z: usize,
    pub move_x_pos: f64,
    pub move_x_neg: f64,
    pub move_z_pos: f64,
    pub move_z_neg: f64,
    pub jump: f64,
    /// Greedy action, empty when several actions tie
    pub best: Option<Action>,
}

/// Exporter for action-spread CSV files
pub struct SpreadCsvExporter;

impl SpreadCsvExporter {
    /// Collect one record per cell, `x`-major.
    pub fn records(learner: &dyn Learner, bounds: &GridBounds) -> Vec<SpreadRecord> {
        bounds
            .positions()
            .map(|position| {
                let spread = learner.action_spread(position);
                SpreadRecord {
                    x: position.x,
                    z: position.z,
                    move_x_pos: spread.get(Action::MoveXPos),
                    move_x_neg: spread.get(Action::MoveXNeg),
                    move_z_pos: spread.get(Action::MoveZPos),
                    move_z_neg: spread.get(Action::MoveZNeg),
                    jump: spread.get(Action::Jump),
                    best: spread.unique_best(),
                }
            })
            .collect()
    }

    /// Write the spread of every cell to `writer`.
    pub fn write<W: Write>(writer: W, learner: &dyn Learner, bounds: &GridBounds) -> Result<()> {
        let mut csv = csv::Writer::from_writer(writer);
        for record in Self::records(learner, bounds) {
            csv.serialize(record)?;
        }
        csv.flush()?;
        Ok(())
    }

    /// Write the spread of every cell to a file at `path`.
    pub fn export<P: AsRef<Path>>(path: P, learner: &dyn Learner, bounds: &GridBounds) -> Result<()> {
        let file = std::fs::File::create(path)?;
        Self::write(std::io::BufWriter::new(file), learner, bounds)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        q_learning::{ExplorationSchedule, QLearningAgent},
        types::{Feedback, PlayerState, Position, Transition},
    };

    #[test]
    fn writes_header_and_one_row_per_cell() {
        let bounds = GridBounds::new(2, 3).unwrap();
        let mut agent = QLearningAgent::new(0.5, 0.9, ExplorationSchedule::constant(0.0));
        let cell = Position::new(1, 2);
        agent
            .learn(&Feedback {
                transition: Transition {
                    action: Action::Jump,
                    old_state: PlayerState::new(cell),
                    new_state: PlayerState::new(cell),
                },
                reward: 2.0,
            })
            .unwrap();

        let mut buffer = Vec::new();
        SpreadCsvExporter::write(&mut buffer, &agent, &bounds).unwrap();
        let text = String::from_utf8(buffer).unwrap();
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(
            lines[0],
            "x,z,move_x_pos,move_x_neg,move_z_pos,move_z_neg,jump,best"
        );
        assert_eq!(lines.len(), 1 + bounds.cell_count());
        assert_eq!(lines[1], "0,0,0.0,0.0,0.0,0.0,0.0,");
        assert_eq!(lines[6], "1,2,0.0,0.0,0.0,0.0,1.0,jump");
    }
}
