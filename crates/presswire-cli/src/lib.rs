//! Presswire CLI library.
//!
//! Argument parsing, provider selection, command execution and output
//! formatting for the `presswire` binary.

pub mod cli;
pub mod commands;
pub mod output;
pub mod provider;

pub use cli::{Cli, Command};
pub use provider::Backend;
