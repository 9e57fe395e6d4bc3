//! Convergence of installed tools toward the UVFile.
//!
//! - [`manager`] - the [`PackageManager`] seam and its `uv` implementation
//! - [`orchestrator`] - plans a sync and runs (or prints) its commands

pub mod manager;
pub mod orchestrator;

pub use manager::{PackageManager, UvCli};
pub use orchestrator::{converge, ConvergeOptions, ConvergeReport};
