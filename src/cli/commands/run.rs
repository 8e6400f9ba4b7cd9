//! Run command - Play turns with a Q-learning agent and report the result

use std::{
    path::{Path, PathBuf},
    sync::{Arc, Mutex, MutexGuard, PoisonError},
};

use anyhow::{Context, Result, anyhow};
use clap::Parser;

use crate::{
    cli::output::{field, group_thousands, heading, policy_rows},
    config::{GameConfig, RewardPolicyConfig},
    export::SpreadCsvExporter,
    game::{Game, LearningMode},
    pipeline::{
        JsonlObserver, LoggingObserver, MetricsObserver, ProgressObserver, RunConfig, RunSummary,
        SimulationRunner,
    },
    ports::{Learner, Observer},
    q_learning::ExplorationSchedule,
    types::{Action, Feedback, Position, TurnResult},
};

#[derive(Parser, Debug)]
#[command(about = "Train an agent on the grid", allow_negative_numbers = true)]
pub struct RunArgs {
    /// JSON configuration file; flags below override its values
    #[arg(long, short = 'c')]
    pub config: Option<PathBuf>,

    /// Number of turns to play
    #[arg(long, short = 't', default_value_t = 1_000)]
    pub turns: u64,

    /// Grid length along x
    #[arg(long)]
    pub grid_x: Option<usize>,

    /// Grid length along z
    #[arg(long)]
    pub grid_z: Option<usize>,

    /// Starting cell as `x,z` (defaults to the grid center)
    #[arg(long)]
    pub start: Option<String>,

    /// Learning rate α (0.0-1.0)
    #[arg(long)]
    pub learning_rate: Option<f64>,

    /// Discount factor γ (0.0-1.0)
    #[arg(long)]
    pub discount: Option<f64>,

    /// Initial epsilon for geometric decay
    #[arg(long)]
    pub epsilon: Option<f64>,

    /// Geometric epsilon decay per chosen action
    #[arg(long)]
    pub epsilon_decay: Option<f64>,

    /// Linear epsilon schedule as `max,min,period` (replaces geometric decay)
    #[arg(long)]
    pub linear_epsilon: Option<String>,

    /// Reward policy (single-goal, sequence, manual, points-delta)
    #[arg(long, short = 'r')]
    pub reward: Option<String>,

    /// Reward returned by the manual policy
    #[arg(long)]
    pub manual_reward: Option<f64>,

    /// When rewards reach the learner (immediate or deferred)
    #[arg(long, short = 'm')]
    pub mode: Option<String>,

    /// Random seed for reproducibility
    #[arg(long)]
    pub seed: Option<u64>,

    /// Do not learn from the last deferred transition at the end of the run
    #[arg(long, default_value_t = false)]
    pub no_flush: bool,

    /// Optional file for JSONL turn records
    #[arg(long)]
    pub observations: Option<PathBuf>,

    /// Optional path for writing a summary JSON file
    #[arg(long)]
    pub summary: Option<PathBuf>,

    /// Optional path for a CSV of action values per cell
    #[arg(long)]
    pub spread_csv: Option<PathBuf>,

    /// Show progress bar
    #[arg(long, default_value_t = false)]
    pub progress: bool,

    /// Log a progress line every N turns (0 disables)
    #[arg(long, default_value_t = 0)]
    pub log_every: u64,

    /// Print the greedy action for every cell after the run
    #[arg(long, default_value_t = false)]
    pub show_policy: bool,
}

fn parse_position(value: &str, flag: &str) -> Result<Position> {
    let (x, z) = value
        .split_once(',')
        .ok_or_else(|| anyhow!("Invalid value '{value}' for {flag} (expected 'x,z')"))?;
    let x = x
        .trim()
        .parse()
        .with_context(|| format!("Invalid x coordinate in {flag}"))?;
    let z = z
        .trim()
        .parse()
        .with_context(|| format!("Invalid z coordinate in {flag}"))?;
    Ok(Position::new(x, z))
}

fn parse_linear_schedule(value: &str) -> Result<ExplorationSchedule> {
    let parts: Vec<&str> = value.split(',').map(str::trim).collect();
    let [max, min, period] = parts.as_slice() else {
        return Err(anyhow!(
            "Invalid linear epsilon '{value}' (expected 'max,min,period')"
        ));
    };
    Ok(ExplorationSchedule::linear(
        max.parse().context("Invalid linear epsilon max")?,
        min.parse().context("Invalid linear epsilon min")?,
        period.parse().context("Invalid linear epsilon period")?,
    ))
}

/// Merge the optional config file with command-line overrides.
pub fn resolve_config(args: &RunArgs) -> Result<GameConfig> {
    let mut config = match &args.config {
        Some(path) => GameConfig::load(path)
            .with_context(|| format!("Failed to load config {}", path.display()))?,
        None => GameConfig::default(),
    };

    if let Some(x) = args.grid_x {
        config.grid_length_x = x;
    }
    if let Some(z) = args.grid_z {
        config.grid_length_z = z;
    }
    if let Some(start) = &args.start {
        config.start = Some(parse_position(start, "--start")?);
    }
    if let Some(rate) = args.learning_rate {
        config.learning_rate = rate;
    }
    if let Some(discount) = args.discount {
        config.discount_factor = discount;
    }

    if let Some(linear) = &args.linear_epsilon {
        config.exploration = parse_linear_schedule(linear)?;
    } else if args.epsilon.is_some() || args.epsilon_decay.is_some() {
        let (initial, decay, floor) = match config.exploration {
            ExplorationSchedule::Geometric {
                initial,
                decay,
                floor,
                ..
            } => (initial, decay, floor),
            ExplorationSchedule::Linear { max, .. } => (max, 1.0, 0.0),
        };
        config.exploration = ExplorationSchedule::geometric_with_floor(
            args.epsilon.unwrap_or(initial),
            args.epsilon_decay.unwrap_or(decay),
            floor,
        );
    }

    if let Some(reward) = &args.reward {
        config.reward_policy = reward.parse::<RewardPolicyConfig>()?;
    }
    if let Some(value) = args.manual_reward {
        config.reward_policy = RewardPolicyConfig::Manual { reward: value };
    }
    if let Some(mode) = &args.mode {
        config.learning_mode = mode.parse::<LearningMode>()?;
    }
    if let Some(seed) = args.seed {
        config.seed = Some(seed);
    }

    config.validate()?;
    Ok(config)
}

fn print_policy(game: &Game) {
    heading("Greedy policy (rows: z, columns: x)", '-');
    for row in policy_rows(game) {
        println!("  {row}");
    }
}

fn print_summary(config: &GameConfig, summary: &RunSummary, metrics: &MetricsObserver) {
    heading("Run Summary", '=');
    field("Turns", group_thousands(summary.turns));
    field("Reward policy", &config.reward_policy);
    field("Learning mode", config.learning_mode);
    field("Total reward", format!("{:.2}", summary.total_reward));
    field("Mean reward", format!("{:.4}", summary.mean_reward));
    field("Recent mean", format!("{:.4}", metrics.recent_mean_reward()));
    field("Final position", summary.final_position);
    field("Final points", summary.final_points);
    field("Final epsilon", format!("{:.4}", summary.final_epsilon));
    if let Some(states) = summary.visited_states {
        field("Visited states", states);
    }

    heading("Actions", '-');
    for action in Action::ALL {
        field(action.describe(), group_thousands(metrics.action_count(action)));
    }
}

/// Metrics observer the command can still read once the runner owns it.
struct SharedMetrics(Arc<Mutex<MetricsObserver>>);

impl SharedMetrics {
    fn lock(&self) -> MutexGuard<'_, MetricsObserver> {
        self.0.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Observer for SharedMetrics {
    fn on_turn(&mut self, result: &TurnResult, learner: &dyn Learner) -> crate::Result<()> {
        self.lock().on_turn(result, learner)
    }

    fn on_flush(&mut self, feedback: &Feedback) -> crate::Result<()> {
        self.lock().on_flush(feedback)
    }
}

fn write_outputs(args: &RunArgs, game: &Game, summary: &RunSummary) -> Result<()> {
    if let Some(path) = &args.summary {
        summary
            .save(path)
            .with_context(|| format!("Failed to write summary {}", path.display()))?;
        println!("Summary written to {}", path.display());
    }
    if let Some(path) = &args.spread_csv {
        export_spread(path, game)?;
        println!("Action values written to {}", path.display());
    }
    Ok(())
}

fn export_spread(path: &Path, game: &Game) -> Result<()> {
    SpreadCsvExporter::export(path, game.learner(), &game.bounds())
        .with_context(|| format!("Failed to write spread CSV {}", path.display()))
}

pub fn execute(args: RunArgs) -> Result<()> {
    let config = resolve_config(&args)?;
    let mut game = config.build()?;

    let metrics = Arc::new(Mutex::new(MetricsObserver::new()));
    let mut runner = SimulationRunner::new(RunConfig {
        turns: args.turns,
        flush_at_end: !args.no_flush,
    })
    .with_observer(Box::new(SharedMetrics(Arc::clone(&metrics))));

    if args.progress {
        runner = runner.with_observer(Box::new(ProgressObserver::new()));
    }
    if args.log_every > 0 {
        runner = runner.with_observer(Box::new(LoggingObserver::new(args.log_every)));
    }
    if let Some(path) = &args.observations {
        let observer = JsonlObserver::new(path)
            .with_context(|| format!("Failed to create observations file {}", path.display()))?;
        runner = runner.with_observer(Box::new(observer));
    }

    let summary = runner.run(&mut game)?;

    let metrics = metrics.lock().unwrap_or_else(PoisonError::into_inner);
    print_summary(&config, &summary, &metrics);
    if args.show_policy {
        print_policy(&game);
    }
    write_outputs(&args, &game, &summary)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args<I: IntoIterator<Item = &'static str>>(extra: I) -> RunArgs {
        RunArgs::parse_from(std::iter::once("gridlearn-run").chain(extra))
    }

    #[test]
    fn parses_positions() {
        assert_eq!(parse_position("2, 5", "--start").unwrap(), Position::new(2, 5));
        assert!(parse_position("2;5", "--start").is_err());
        assert!(parse_position("a,5", "--start").is_err());
    }

    #[test]
    fn flags_override_defaults() {
        let config = resolve_config(&args([
            "--grid-x",
            "5",
            "--grid-z",
            "6",
            "--reward",
            "sequence",
            "--mode",
            "deferred",
            "--linear-epsilon",
            "1.0,0.3,500",
            "--seed",
            "9",
        ]))
        .unwrap();
        assert_eq!(config.grid_length_x, 5);
        assert_eq!(config.grid_length_z, 6);
        assert_eq!(config.reward_policy, RewardPolicyConfig::sequence());
        assert_eq!(config.learning_mode, LearningMode::Deferred);
        assert_eq!(config.exploration, ExplorationSchedule::linear(1.0, 0.3, 500));
        assert_eq!(config.seed, Some(9));
    }

    #[test]
    fn epsilon_flags_keep_geometric_floor() {
        let config = resolve_config(&args(["--epsilon", "0.5"])).unwrap();
        assert_eq!(config.exploration, ExplorationSchedule::geometric(0.5, 0.999));
    }

    #[test]
    fn manual_reward_flag_selects_manual_policy() {
        let config = resolve_config(&args(["--manual-reward", "-3"])).unwrap();
        assert_eq!(config.reward_policy, RewardPolicyConfig::Manual { reward: -3.0 });
    }

    #[test]
    fn invalid_values_are_reported() {
        assert!(resolve_config(&args(["--reward", "cookies"])).is_err());
        assert!(resolve_config(&args(["--learning-rate", "2"])).is_err());
        assert!(resolve_config(&args(["--linear-epsilon", "1.0,0.3"])).is_err());
    }
}
