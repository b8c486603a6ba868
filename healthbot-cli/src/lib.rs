//! Command-line front end for HealthBot.
//!
//! The binary parses [`cli::Cli`], loads the configuration, builds one
//! [`healthbot_core::AppContext`] and dispatches to [`commands`]. Replies are
//! typed out by [`render::type_out`], which stops as soon as its stop signal
//! flips.

pub mod cli;
pub mod commands;
pub mod render;
pub mod telemetry;

pub use cli::{Cli, Command, IndexAction};
