//! Init command implementation.
//!
//! The `uvfile init` command snapshots the installed tools into a UVFile.

use crate::cli::args::InitArgs;
use crate::config::Settings;
use crate::converge::PackageManager;
use crate::error::Result;
use crate::manifest::Manifest;
use crate::requirement::ToolSpec;
use crate::ui::{Prompt, UserInterface};

use super::dispatcher::{Command, CommandResult};

/// The init command implementation.
pub struct InitCommand<'a> {
    settings: &'a Settings,
    manager: &'a dyn PackageManager,
    args: InitArgs,
}

impl<'a> InitCommand<'a> {
    pub fn new(settings: &'a Settings, manager: &'a dyn PackageManager, args: InitArgs) -> Self {
        Self {
            settings,
            manager,
            args,
        }
    }

    /// Ask before replacing an existing UVFile. `None` means carry on;
    /// otherwise the command stops with the given result.
    fn check_overwrite(&self, ui: &mut dyn UserInterface) -> Result<Option<CommandResult>> {
        let path = &self.settings.manifest_path;
        if self.args.force || !path.exists() {
            return Ok(None);
        }

        let question = format!("{} already exists. Overwrite?", path.display());
        if ui.confirm(&Prompt::new("overwrite", &question, false))? {
            return Ok(None);
        }

        if ui.is_interactive() {
            ui.message("Aborted.");
            Ok(Some(CommandResult::success()))
        } else {
            ui.warning(&format!(
                "{} already exists. Use --force to overwrite.",
                path.display()
            ));
            Ok(Some(CommandResult::failure(1)))
        }
    }
}

impl Command for InitCommand<'_> {
    fn execute(&self, ui: &mut dyn UserInterface) -> Result<CommandResult> {
        if let Some(result) = self.check_overwrite(ui)? {
            return Ok(result);
        }

        let installed = self.manager.installed_tools()?;
        let mut tools: Vec<ToolSpec> = Vec::with_capacity(installed.len());
        for tool in installed {
            match tool.spec {
                Some(spec) => tools.push(spec),
                None => ui.warning(&format!(
                    "Skipping {}: its uv receipt could not be read",
                    tool.name
                )),
            }
        }

        Manifest::save(&self.settings.manifest_path, &tools)?;

        ui.success(&format!("UVFile initialized with {} tools.", tools.len()));
        Ok(CommandResult::success())
    }
}
