//! Observer pattern for simulation runs
//!
//! Observers allow composable data collection during a run without coupling
//! the turn loop to specific output formats.

use std::{
    collections::VecDeque,
    fs::File,
    io::{BufWriter, Write},
    path::Path,
};

use indicatif::{ProgressBar, ProgressStyle};
use serde::{Deserialize, Serialize};
use tracing::info;

use super::RunSummary;
use crate::{
    Result,
    ports::{Learner, Observer},
    types::{Action, ActionValues, Feedback, Position, TurnResult},
};

/// One line of the JSONL export
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TurnRecord {
    pub turn: u64,
    pub action: Action,
    pub from: Position,
    pub to: Position,
    pub points: i64,
    /// Reward delivered this turn, if any
    pub reward: Option<f64>,
    /// Whether the delivered reward belonged to an earlier transition
    pub deferred: bool,
    pub epsilon: f64,
    /// Action values at the cell the agent left, after learning
    pub spread: ActionValues,
}

impl TurnRecord {
    fn new(result: &TurnResult, learner: &dyn Learner) -> Self {
        let transition = &result.transition;
        Self {
            turn: result.turn,
            action: transition.action,
            from: transition.old_state.position,
            to: transition.new_state.position,
            points: transition.new_state.points,
            reward: result.reward(),
            deferred: result
                .feedback
                .is_some_and(|feedback| feedback.transition != *transition),
            epsilon: learner.epsilon(),
            spread: learner.action_spread(transition.old_state.position),
        }
    }
}

/// Progress bar observer - Shows run progress
pub struct ProgressObserver {
    progress_bar: Option<ProgressBar>,
    total_reward: f64,
}

impl ProgressObserver {
    /// Create a new progress observer
    pub fn new() -> Self {
        Self {
            progress_bar: None,
            total_reward: 0.0,
        }
    }
}

impl Default for ProgressObserver {
    fn default() -> Self {
        Self::new()
    }
}

impl Observer for ProgressObserver {
    fn on_run_start(&mut self, total_turns: u64) -> Result<()> {
        let pb = ProgressBar::new(total_turns);
        pb.set_style(
            ProgressStyle::default_bar()
                .template("[{elapsed_precise}] {bar:40.cyan/blue} {pos}/{len} turns ({msg})")
                .map_err(|e| crate::Error::ProgressBarTemplate {
                    message: e.to_string(),
                })?
                .progress_chars("=>-"),
        );
        self.progress_bar = Some(pb);
        Ok(())
    }

    fn on_turn(&mut self, result: &TurnResult, learner: &dyn Learner) -> Result<()> {
        self.total_reward += result.reward().unwrap_or(0.0);
        if let Some(pb) = &self.progress_bar {
            pb.set_position(result.turn);
            if result.turn.is_multiple_of(100) {
                pb.set_message(format!(
                    "reward {:.1}, ε {:.3}",
                    self.total_reward,
                    learner.epsilon()
                ));
            }
        }
        Ok(())
    }

    fn on_run_end(&mut self, summary: &RunSummary) -> Result<()> {
        if let Some(pb) = &self.progress_bar {
            pb.finish_with_message(format!(
                "reward {:.1}, ε {:.3}",
                summary.total_reward, summary.final_epsilon
            ));
        }
        Ok(())
    }
}

/// Metrics observer - Tracks reward and action statistics
pub struct MetricsObserver {
    window: usize,
    recent_rewards: VecDeque<f64>,
    total_reward: f64,
    deliveries: u64,
    turns: u64,
    action_counts: [u64; Action::COUNT],
    blocked_moves: u64,
}

impl MetricsObserver {
    /// Create a new metrics observer averaging over the last 100 rewards
    pub fn new() -> Self {
        Self::with_window(100)
    }

    pub fn with_window(window: usize) -> Self {
        Self {
            window: window.max(1),
            recent_rewards: VecDeque::new(),
            total_reward: 0.0,
            deliveries: 0,
            turns: 0,
            action_counts: [0; Action::COUNT],
            blocked_moves: 0,
        }
    }

    fn record_reward(&mut self, reward: f64) {
        self.total_reward += reward;
        self.deliveries += 1;
        if self.recent_rewards.len() == self.window {
            self.recent_rewards.pop_front();
        }
        self.recent_rewards.push_back(reward);
    }

    pub fn total_reward(&self) -> f64 {
        self.total_reward
    }

    /// Mean of the most recent delivered rewards
    pub fn recent_mean_reward(&self) -> f64 {
        if self.recent_rewards.is_empty() {
            0.0
        } else {
            self.recent_rewards.iter().sum::<f64>() / self.recent_rewards.len() as f64
        }
    }

    pub fn action_count(&self, action: Action) -> u64 {
        self.action_counts[action.index()]
    }

    /// Get metrics summary
    pub fn summary(&self) -> MetricsSummary {
        MetricsSummary {
            turns: self.turns,
            deliveries: self.deliveries,
            total_reward: self.total_reward,
            recent_mean_reward: self.recent_mean_reward(),
            blocked_moves: self.blocked_moves,
            action_counts: Action::ALL
                .iter()
                .map(|&action| (action, self.action_count(action)))
                .collect(),
        }
    }
}

/// Summary of run metrics
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MetricsSummary {
    pub turns: u64,
    pub deliveries: u64,
    pub total_reward: f64,
    pub recent_mean_reward: f64,
    pub blocked_moves: u64,
    pub action_counts: Vec<(Action, u64)>,
}

impl Default for MetricsObserver {
    fn default() -> Self {
        Self::new()
    }
}

impl Observer for MetricsObserver {
    fn on_turn(&mut self, result: &TurnResult, _learner: &dyn Learner) -> Result<()> {
        self.turns += 1;
        self.action_counts[result.action().index()] += 1;
        if result.action().is_move() && !result.transition.moved() {
            self.blocked_moves += 1;
        }
        if let Some(reward) = result.reward() {
            self.record_reward(reward);
        }
        Ok(())
    }

    fn on_flush(&mut self, feedback: &Feedback) -> Result<()> {
        self.record_reward(feedback.reward);
        Ok(())
    }
}

/// JSONL observer - Exports one [`TurnRecord`] per line
pub struct JsonlObserver {
    writer: BufWriter<File>,
}

impl JsonlObserver {
    /// Create a new JSONL observer
    pub fn new<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = File::create(path)?;
        Ok(Self {
            writer: BufWriter::new(file),
        })
    }
}

impl Observer for JsonlObserver {
    fn on_turn(&mut self, result: &TurnResult, learner: &dyn Learner) -> Result<()> {
        serde_json::to_writer(&mut self.writer, &TurnRecord::new(result, learner))?;
        writeln!(&mut self.writer)?;
        Ok(())
    }

    fn on_run_end(&mut self, _summary: &RunSummary) -> Result<()> {
        self.writer.flush()?;
        Ok(())
    }
}

/// Logging observer - emits a `tracing` event every `interval` turns
pub struct LoggingObserver {
    interval: u64,
    reward_since_last: f64,
}

impl LoggingObserver {
    pub fn new(interval: u64) -> Self {
        Self {
            interval: interval.max(1),
            reward_since_last: 0.0,
        }
    }
}

impl Observer for LoggingObserver {
    fn on_turn(&mut self, result: &TurnResult, learner: &dyn Learner) -> Result<()> {
        self.reward_since_last += result.reward().unwrap_or(0.0);
        if result.turn.is_multiple_of(self.interval) {
            info!(
                turn = result.turn,
                position = %result.position(),
                points = result.transition.new_state.points,
                epsilon = learner.epsilon(),
                reward = self.reward_since_last,
                "progress"
            );
            self.reward_since_last = 0.0;
        }
        Ok(())
    }

    fn on_run_end(&mut self, summary: &RunSummary) -> Result<()> {
        info!(
            turns = summary.turns,
            total_reward = summary.total_reward,
            visited_states = ?summary.visited_states,
            "summary"
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        game::{Game, LearningMode},
        grid::GridBounds,
        pipeline::{RunConfig, SimulationRunner},
        q_learning::RandomLearner,
        rewards::PointsDeltaReward,
    };

    #[test]
    fn metrics_window_keeps_latest_rewards() {
        let mut metrics = MetricsObserver::with_window(2);
        metrics.record_reward(1.0);
        metrics.record_reward(3.0);
        metrics.record_reward(5.0);
        assert_eq!(metrics.total_reward(), 9.0);
        assert_eq!(metrics.recent_mean_reward(), 4.0);
    }

    #[test]
    fn metrics_count_every_turn() {
        let bounds = GridBounds::new(3, 3).unwrap();
        let mut game = Game::new(
            bounds,
            Position::new(0, 0),
            Box::new(RandomLearner::with_seed("Agent".to_string(), 5)),
            Box::new(PointsDeltaReward),
        )
        .unwrap()
        .with_learning_mode(LearningMode::Immediate);

        let mut metrics = MetricsObserver::new();
        let learner_view = RandomLearner::with_seed("view".to_string(), 0);
        for _ in 0..30 {
            let result = game.take_turn().unwrap();
            metrics.on_turn(&result, &learner_view).unwrap();
        }
        let summary = metrics.summary();
        assert_eq!(summary.turns, 30);
        assert_eq!(summary.deliveries, 30);
        assert_eq!(summary.action_counts.iter().map(|(_, n)| n).sum::<u64>(), 30);
        assert_eq!(summary.total_reward, game.points() as f64);
    }

    #[test]
    fn jsonl_writes_one_line_per_turn() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("turns.jsonl");
        let bounds = GridBounds::new(3, 3).unwrap();
        let mut game = Game::new(
            bounds,
            Position::new(1, 1),
            Box::new(RandomLearner::with_seed("Agent".to_string(), 8)),
            Box::new(PointsDeltaReward),
        )
        .unwrap();

        SimulationRunner::new(RunConfig {
            turns: 12,
            flush_at_end: true,
        })
        .with_observer(Box::new(JsonlObserver::new(&path).unwrap()))
        .run(&mut game)
        .unwrap();

        let contents = std::fs::read_to_string(&path).unwrap();
        let records: Vec<TurnRecord> = contents
            .lines()
            .map(|line| serde_json::from_str(line).unwrap())
            .collect();
        assert_eq!(records.len(), 12);
        assert_eq!(records[0].turn, 1);
        assert_eq!(records[11].turn, 12);
        assert!(records.iter().all(|record| !record.deferred));
    }
}
