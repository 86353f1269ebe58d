//! Command-line front end for frabsched.
//!
//! Fetches one or more schedules, normalizes them and prints the events as
//! text or JSON.

pub mod cli;
pub mod commands;
pub mod config;
pub mod error;
pub mod output;

pub use cli::Cli;
pub use error::{CliError, CliResult};
