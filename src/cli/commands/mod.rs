//! Subcommands of the `gridlearn` binary

pub mod config;
pub mod run;
