//! The package manager seam.

use crate::error::{Result, UvfileError};
use crate::receipt::{parse_tool_list, read_installed, InstalledTool, ListedTool};
use crate::reconcile::Action;
use crate::shell::{display_command, execute, execute_quiet, CommandOptions, CommandResult};

/// Operations uvfile needs from the tool installer.
pub trait PackageManager {
    /// Program name, as shown in printed command lines.
    fn program(&self) -> &str;

    /// Tools currently installed, in the installer's listing order.
    fn list_tools(&self) -> Result<Vec<ListedTool>>;

    /// Run `tool install` with the given arguments.
    fn install(&self, args: &[String]) -> Result<CommandResult>;

    /// Run `tool uninstall <name>`.
    fn uninstall(&self, name: &str) -> Result<CommandResult>;

    /// Installed tools with their receipts attached.
    fn installed_tools(&self) -> Result<Vec<InstalledTool>> {
        Ok(read_installed(&self.list_tools()?))
    }

    /// The full command line an action runs.
    fn command_line(&self, action: &Action) -> String {
        let mut args = vec!["tool".to_string()];
        args.extend(action.tool_args());
        display_command(self.program(), &args)
    }

    /// Run one action.
    fn apply(&self, action: &Action) -> Result<CommandResult> {
        match action {
            Action::Uninstall { name } => self.uninstall(name),
            Action::Install { .. } => {
                // tool_args() leads with "install"
                let args = action.tool_args();
                self.install(&args[1..])
            }
        }
    }
}

/// [`PackageManager`] backed by the `uv` binary.
#[derive(Debug, Clone)]
pub struct UvCli {
    program: String,
    stream_output: bool,
}

impl UvCli {
    /// Run `program` for every uv invocation.
    pub fn new(program: &str) -> Self {
        Self {
            program: program.to_string(),
            stream_output: false,
        }
    }

    /// Let install and uninstall print straight to the terminal instead of
    /// capturing their output.
    pub fn stream_output(mut self, stream: bool) -> Self {
        self.stream_output = stream;
        self
    }

    fn tool_command(&self, args: Vec<String>) -> Result<CommandResult> {
        let mut full = vec!["tool".to_string()];
        full.extend(args);
        let options = CommandOptions {
            capture_stdout: !self.stream_output,
            capture_stderr: !self.stream_output,
            ..Default::default()
        };
        execute(&self.program, &full, &options)
    }
}

impl PackageManager for UvCli {
    fn program(&self) -> &str {
        &self.program
    }

    fn list_tools(&self) -> Result<Vec<ListedTool>> {
        let args: Vec<String> = ["tool", "list", "--show-paths"]
            .iter()
            .map(|s| s.to_string())
            .collect();
        let result = execute_quiet(&self.program, &args, None)?;
        if !result.success {
            tracing::debug!(
                "{} failed: {}",
                display_command(&self.program, &args),
                result.stderr.trim()
            );
            return Err(UvfileError::CommandFailed {
                command: display_command(&self.program, &args),
                code: result.exit_code,
            });
        }
        Ok(parse_tool_list(&result.stdout))
    }

    fn install(&self, args: &[String]) -> Result<CommandResult> {
        let mut full = vec!["install".to_string()];
        full.extend(args.iter().cloned());
        self.tool_command(full)
    }

    fn uninstall(&self, name: &str) -> Result<CommandResult> {
        self.tool_command(vec!["uninstall".to_string(), name.to_string()])
    }
}
