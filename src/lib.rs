//! uvfile - declarative management of `uv tool` installs.
//!
//! A UVFile lists the command-line tools a machine should have, one
//! `uv tool install` line per tool. uvfile compares it with what uv reports
//! as installed and runs the installs and uninstalls needed to close the gap.
//!
//! # Modules
//!
//! - [`cli`] - Command-line interface and argument parsing
//! - [`config`] - Settings resolved from flags and environment
//! - [`converge`] - Running a sync through the package manager
//! - [`error`] - Error types and result aliases
//! - [`manifest`] - Reading and writing the UVFile
//! - [`receipt`] - Reading uv's listing and per-tool receipts
//! - [`reconcile`] - Equivalence checks and sync planning
//! - [`render`] - Turning tool specs into uv arguments
//! - [`requirement`] - The requirement and tool model
//! - [`shell`] - Process execution
//! - [`ui`] - Prompts, spinners, and terminal output
//!
//! # Example
//!
//! ```
//! use uvfile::manifest::codec::decode_line;
//! use uvfile::render::install_args;
//!
//! let tool = decode_line("mytool --with 'pkg[extra]>=1.0' --python 3.11").unwrap();
//! assert_eq!(
//!     install_args(&tool, false),
//!     ["mytool", "--with", "pkg[extra]>=1.0", "--python", "3.11"]
//! );
//! ```

pub mod cli;
pub mod config;
pub mod converge;
pub mod error;
pub mod manifest;
pub mod receipt;
pub mod reconcile;
pub mod render;
pub mod requirement;
pub mod shell;
pub mod ui;

pub use error::{Result, UvfileError};
