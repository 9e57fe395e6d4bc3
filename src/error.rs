//! Error types for uvfile operations.
//!
//! This module defines [`UvfileError`], the primary error type used throughout
//! the application, and a [`Result`] type alias for convenience.
//!
//! # Error Handling Strategy
//!
//! - Manifest problems are fatal and surface before any `uv` command runs
//! - Receipt problems are recovered by the reader (the tool is skipped)
//! - A failing `uv` invocation aborts the remaining plan
//! - Use `anyhow::Error` (via `UvfileError::Other`) for unexpected errors

use std::path::PathBuf;
use thiserror::Error;

/// Core error type for uvfile operations.
#[derive(Debug, Error)]
pub enum UvfileError {
    /// Manifest file not found at the configured location.
    #[error("UVFile not found: {path}")]
    ManifestNotFound { path: PathBuf },

    /// A manifest line could not be parsed.
    #[error("Failed to parse {path} line {line}: {message}")]
    ManifestParse {
        path: PathBuf,
        line: usize,
        message: String,
    },

    /// A single requirement string is malformed.
    #[error("Invalid requirement '{input}': {message}")]
    RequirementParse { input: String, message: String },

    /// An installed tool's receipt could not be interpreted.
    #[error("Failed to parse receipt at {path}: {message}")]
    ReceiptParse { path: PathBuf, message: String },

    /// Two tools in one collection share a primary name.
    #[error("Tool '{name}' is listed more than once in {origin}")]
    AmbiguousState { name: String, origin: String },

    /// External command failed.
    #[error("Command failed with {}: {command}", exit_status(.code))]
    CommandFailed { command: String, code: Option<i32> },

    /// A plan action failed; the actions after it were not attempted.
    #[error(
        "Command failed with {}: {command} ({} completed, {} not attempted)",
        exit_status(.code),
        .completed.len(),
        .remaining.len()
    )]
    ConvergenceAborted {
        command: String,
        code: Option<i32>,
        completed: Vec<String>,
        remaining: Vec<String>,
    },

    /// IO error wrapper.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Generic wrapped error for anyhow interop.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Describe how a process ended. `None` means it was killed by a signal.
fn exit_status(code: &Option<i32>) -> String {
    match code {
        Some(code) => format!("exit code {}", code),
        None => "signal".to_string(),
    }
}

/// Result type alias for uvfile operations.
pub type Result<T> = std::result::Result<T, UvfileError>;
