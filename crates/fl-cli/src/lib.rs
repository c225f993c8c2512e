//! Activity timeline CLI library.
//!
//! This crate provides the CLI interface for focusline.

mod cli;
pub mod commands;
mod config;

pub use cli::{Cli, Commands, RangeArgs};
pub use config::Config;
