//! Command-line interface for running grid agents

pub mod commands;
pub mod output;
