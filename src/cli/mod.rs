//! CLI module
//!
//! Command-line interface for harvesting albums.
//!
//! # Commands
//!
//! - `info` - Show album metadata
//! - `links` - Write the link manifest
//! - `download` - Download every image
//! - `token` - Decode an access token from a session cookie

mod commands;
mod runner;

pub use commands::{Cli, Commands, OutputFormat, Overrides};
pub use runner::Runner;
