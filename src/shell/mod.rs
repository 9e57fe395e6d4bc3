//! External process execution.

pub mod command;
pub mod platform;

pub use command::{display_command, execute, execute_quiet, CommandOptions, CommandResult};
pub use platform::is_ci;
