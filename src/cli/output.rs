//! Terminal report helpers for CLI commands

use std::fmt::Display;

use crate::{game::Game, types::Action};

const REPORT_WIDTH: usize = 60;

/// Print `title` between rules of `rule` characters.
///
/// Top-level sections use `'='` above and below, subsections a single `'-'`
/// underline.
pub fn heading(title: &str, rule: char) {
    let line: String = std::iter::repeat_n(rule, REPORT_WIDTH).collect();
    if rule == '=' {
        println!("\n{line}\n{title}\n{line}");
    } else {
        println!("\n{title}\n{}", &line[..REPORT_WIDTH / 3 * 2]);
    }
}

/// Print one aligned `label: value` report line.
pub fn field(label: &str, value: impl Display) {
    println!("  {:<22}{value}", format!("{label}:"));
}

/// `1234567` as `1,234,567`.
pub fn group_thousands(n: u64) -> String {
    let digits = n.to_string();
    let head = digits.len() % 3;
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, digit) in digits.chars().enumerate() {
        if i > 0 && (i + 3 - head) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }
    grouped
}

fn action_glyph(action: Option<Action>) -> char {
    match action {
        Some(Action::MoveXPos) => '>',
        Some(Action::MoveXNeg) => '<',
        Some(Action::MoveZPos) => 'v',
        Some(Action::MoveZNeg) => '^',
        Some(Action::Jump) => 'J',
        None => '.',
    }
}

/// Greedy action per cell, one string per `z` row, the agent's cell bracketed.
///
/// Cells whose best action is tied show `.`.
pub fn policy_rows(game: &Game) -> Vec<String> {
    let bounds = game.bounds();
    (0..bounds.length_z())
        .map(|z| {
            bounds
                .positions()
                .filter(|position| position.z == z)
                .map(|position| {
                    let glyph = action_glyph(game.action_spread(position).unique_best());
                    if position == game.position() {
                        format!("[{glyph}]")
                    } else {
                        format!(" {glyph} ")
                    }
                })
                .collect()
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        grid::GridBounds,
        q_learning::{ExplorationSchedule, QLearningAgent},
        rewards::SingleGoalReward,
        types::Position,
    };

    #[test]
    fn groups_thousands() {
        assert_eq!(group_thousands(0), "0");
        assert_eq!(group_thousands(999), "999");
        assert_eq!(group_thousands(1_000), "1,000");
        assert_eq!(group_thousands(12_345), "12,345");
        assert_eq!(group_thousands(1_234_567), "1,234,567");
    }

    #[test]
    fn policy_map_marks_agent_and_learned_jump() {
        let bounds = GridBounds::new(3, 2).unwrap();
        let goal = Position::new(1, 1);
        let agent = QLearningAgent::new(1.0, 0.0, ExplorationSchedule::constant(1.0)).with_seed(0);
        let mut game = Game::new(
            bounds,
            goal,
            Box::new(agent),
            Box::new(SingleGoalReward::new(goal)),
        )
        .unwrap();
        while game.action_spread(goal).unique_best() != Some(Action::Jump) {
            game.restart(goal).unwrap();
            game.take_turn().unwrap();
        }
        game.restart(Position::new(0, 0)).unwrap();

        assert_eq!(policy_rows(&game), vec!["[.] .  . ", " .  J  . "]);
    }
}
