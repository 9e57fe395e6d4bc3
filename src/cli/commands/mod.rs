//! CLI command implementations.
//!
//! Each command implements the [`Command`] trait, which provides a uniform
//! interface for executing commands and reporting results.
//!
//! # Architecture
//!
//! Commands are dispatched via [`CommandDispatcher`], which routes CLI
//! subcommands to their implementations. Commands that talk to uv receive
//! it as a [`crate::converge::PackageManager`], so tests can swap it out.

pub mod completions;
pub mod dispatcher;
pub mod env;
pub mod init;
pub mod sync;

pub use dispatcher::{Command, CommandDispatcher, CommandResult};
