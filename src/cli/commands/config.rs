//! Config command - Print or write the default configuration

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;

use crate::config::{GameConfig, RewardPolicyConfig};

#[derive(Parser, Debug)]
#[command(about = "Print the default configuration as JSON")]
pub struct ConfigArgs {
    /// Start from the defaults of this reward policy
    #[arg(long, short = 'r')]
    pub reward: Option<String>,

    /// Write to this file instead of stdout
    #[arg(long, short = 'o')]
    pub output: Option<PathBuf>,
}

/// Default configuration, with the requested reward policy applied.
pub fn default_config(args: &ConfigArgs) -> Result<GameConfig> {
    let mut config = GameConfig::default();
    if let Some(reward) = &args.reward {
        config.reward_policy = reward.parse::<RewardPolicyConfig>()?;
    }
    Ok(config)
}

pub fn execute(args: ConfigArgs) -> Result<()> {
    let config = default_config(&args)?;
    match &args.output {
        Some(path) => {
            config
                .save(path)
                .with_context(|| format!("Failed to write config {}", path.display()))?;
            println!("Configuration written to {}", path.display());
        }
        None => println!("{}", serde_json::to_string_pretty(&config)?),
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn written_config_loads_back() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("gridlearn.json");
        execute(ConfigArgs {
            reward: Some("sequence".to_string()),
            output: Some(path.clone()),
        })
        .unwrap();

        let loaded = GameConfig::load(&path).unwrap();
        assert_eq!(loaded.reward_policy, RewardPolicyConfig::sequence());
        assert_eq!(loaded.grid_length_x, 7);
    }
}
