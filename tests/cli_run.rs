use clap::Parser;
use gridlearn::{
    cli::commands::run::{RunArgs, execute},
    pipeline::{RunSummary, TurnRecord},
};
use tempfile::tempdir;

fn parse_args<I, T>(args: I) -> RunArgs
where
    I: IntoIterator<Item = T>,
    T: Into<std::ffi::OsString> + Clone,
{
    RunArgs::parse_from(args)
}

#[test]
fn run_writes_summary_spread_and_observations() {
    let tmp = tempdir().unwrap();
    let summary_path = tmp.path().join("summary.json");
    let spread_path = tmp.path().join("spread.csv");
    let observations_path = tmp.path().join("turns.jsonl");

    let args = parse_args([
        "gridlearn-run",
        "--turns",
        "40",
        "--grid-x",
        "5",
        "--grid-z",
        "4",
        "--seed",
        "7",
        "--summary",
        summary_path.to_str().unwrap(),
        "--spread-csv",
        spread_path.to_str().unwrap(),
        "--observations",
        observations_path.to_str().unwrap(),
    ]);

    execute(args).expect("run should succeed");

    let summary = RunSummary::load(&summary_path).unwrap();
    assert_eq!(summary.turns, 40);
    assert!(summary.visited_states.is_some());

    let spread = std::fs::read_to_string(&spread_path).unwrap();
    assert_eq!(spread.lines().count(), 1 + 5 * 4);

    let observations = std::fs::read_to_string(&observations_path).unwrap();
    let records: Vec<TurnRecord> = observations
        .lines()
        .map(|line| serde_json::from_str(line).unwrap())
        .collect();
    assert_eq!(records.len(), 40);
    assert_eq!(records.last().unwrap().turn, 40);
}

#[test]
fn deferred_run_flushes_by_default() {
    let tmp = tempdir().unwrap();
    let summary_path = tmp.path().join("summary.json");

    let args = parse_args([
        "gridlearn-run",
        "--turns",
        "25",
        "--reward",
        "points-delta",
        "--mode",
        "deferred",
        "--seed",
        "3",
        "--summary",
        summary_path.to_str().unwrap(),
    ]);
    execute(args).unwrap();

    let summary = RunSummary::load(&summary_path).unwrap();
    // Every transition is delivered once the last one is flushed.
    assert_eq!(summary.total_reward, summary.final_points as f64);
    assert_eq!(summary.rewarded_turns, 25);
}

#[test]
fn run_reads_config_file() {
    let tmp = tempdir().unwrap();
    let config_path = tmp.path().join("config.json");
    let summary_path = tmp.path().join("summary.json");
    std::fs::write(
        &config_path,
        r#"{
            "grid_length_x": 3,
            "grid_length_z": 3,
            "start": { "x": 0, "z": 0 },
            "reward_policy": { "kind": "manual", "reward": 2.0 }
        }"#,
    )
    .unwrap();

    let args = parse_args([
        "gridlearn-run",
        "--config",
        config_path.to_str().unwrap(),
        "--turns",
        "10",
        "--summary",
        summary_path.to_str().unwrap(),
    ]);
    execute(args).unwrap();

    let summary = RunSummary::load(&summary_path).unwrap();
    assert_eq!(summary.total_reward, 20.0);
    assert!(summary.final_position.x < 3 && summary.final_position.z < 3);
}

#[test]
fn invalid_config_fails() {
    let args = parse_args(["gridlearn-run", "--grid-x", "0", "--turns", "1"]);
    assert!(execute(args).is_err());
}
