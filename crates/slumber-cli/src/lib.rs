//! Sleep timeline editor CLI library.
//!
//! Drives edit sessions from JSON entries and gesture scripts.

mod cli;
pub mod commands;
mod config;

pub use cli::{Cli, Commands};
pub use config::Config;
