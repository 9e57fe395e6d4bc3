//! Run settings.
//!
//! Everything a command needs from the command line and environment,
//! resolved once in `main` and passed down.

use std::path::PathBuf;

use crate::cli::Cli;
use crate::ui::OutputMode;

/// Resolved settings for one invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    /// The UVFile to read or write.
    pub manifest_path: PathBuf,
    /// The uv executable.
    pub uv_program: String,
    pub output_mode: OutputMode,
}

impl Settings {
    pub fn new(manifest_path: impl Into<PathBuf>, uv_program: &str) -> Self {
        Self {
            manifest_path: manifest_path.into(),
            uv_program: uv_program.to_string(),
            output_mode: OutputMode::Normal,
        }
    }

    pub fn with_output_mode(mut self, mode: OutputMode) -> Self {
        self.output_mode = mode;
        self
    }
}

impl From<&Cli> for Settings {
    fn from(cli: &Cli) -> Self {
        Settings::new(cli.uvfile.clone(), &cli.uv)
            .with_output_mode(OutputMode::from_flags(cli.verbose, cli.quiet))
    }
}
