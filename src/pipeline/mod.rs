//! Headless simulation pipeline
//!
//! This module provides:
//! - A runner that plays a fixed number of turns on a [`crate::game::Game`]
//! - Observers that record or report each turn

pub mod observers;
pub mod runner;

// Re-export observer implementations (adapters)
pub use observers::{
    JsonlObserver, LoggingObserver, MetricsObserver, MetricsSummary, ProgressObserver, TurnRecord,
};
pub use runner::{RunConfig, RunSummary, SimulationRunner};

pub use crate::ports::{Learner, Observer};
