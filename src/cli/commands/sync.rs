//! Sync command implementation.
//!
//! The `uvfile sync` command converges installed tools toward the UVFile.

use crate::cli::args::SyncArgs;
use crate::config::Settings;
use crate::converge::{converge, ConvergeOptions, PackageManager};
use crate::error::{Result, UvfileError};
use crate::manifest::Manifest;
use crate::reconcile::SyncPolicy;
use crate::ui::UserInterface;

use super::dispatcher::{Command, CommandResult};

/// The sync command implementation.
pub struct SyncCommand<'a> {
    settings: &'a Settings,
    manager: &'a dyn PackageManager,
    args: SyncArgs,
}

impl<'a> SyncCommand<'a> {
    pub fn new(settings: &'a Settings, manager: &'a dyn PackageManager, args: SyncArgs) -> Self {
        Self {
            settings,
            manager,
            args,
        }
    }

    fn options(&self) -> ConvergeOptions {
        ConvergeOptions {
            policy: SyncPolicy {
                reinstall: self.args.reinstall,
                uninstall: self.args.uninstall,
                strict: self.args.strict,
            },
            dry_run: self.args.dry_run,
        }
    }
}

impl Command for SyncCommand<'_> {
    fn execute(&self, ui: &mut dyn UserInterface) -> Result<CommandResult> {
        let manifest = Manifest::load(&self.settings.manifest_path)?;

        match converge(self.manager, manifest.tools(), self.options(), ui) {
            Ok(report) => {
                if report.action_count() == 0 {
                    ui.success("All tools are up to date.");
                } else if !report.dry_run {
                    ui.success(&format!(
                        "Ran {} uv command{}.",
                        report.action_count(),
                        if report.action_count() == 1 { "" } else { "s" }
                    ));
                }
                Ok(CommandResult::success())
            }
            Err(e) => {
                let UvfileError::ConvergenceAborted {
                    completed,
                    remaining,
                    ..
                } = &e
                else {
                    return Err(e);
                };
                ui.error(&e.to_string());
                report_commands(ui, "Completed:", completed);
                report_commands(ui, "Not run:", remaining);
                Ok(CommandResult::failure(1))
            }
        }
    }
}

fn report_commands(ui: &mut dyn UserInterface, heading: &str, commands: &[String]) {
    if commands.is_empty() {
        return;
    }
    ui.report(heading);
    for command in commands {
        ui.report(&format!("  {}", command));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::receipt::{InstalledTool, ListedTool};
    use crate::requirement::{parse_requirement, ToolSpec};
    use crate::shell::CommandResult as ProcessResult;
    use crate::ui::{MockUI, OutputMode};
    use std::cell::RefCell;
    use std::fs;
    use std::time::Duration;
    use tempfile::TempDir;

    #[derive(Default)]
    struct Recorder {
        installed: Vec<InstalledTool>,
        exit_code: i32,
        calls: RefCell<Vec<String>>,
    }

    impl Recorder {
        fn result(&self) -> ProcessResult {
            ProcessResult {
                exit_code: Some(self.exit_code),
                stdout: String::new(),
                stderr: String::new(),
                duration: Duration::ZERO,
                success: self.exit_code == 0,
            }
        }
    }

    impl PackageManager for Recorder {
        fn program(&self) -> &str {
            "uv"
        }

        fn list_tools(&self) -> Result<Vec<ListedTool>> {
            Ok(Vec::new())
        }

        fn installed_tools(&self) -> Result<Vec<InstalledTool>> {
            Ok(self.installed.clone())
        }

        fn install(&self, args: &[String]) -> Result<ProcessResult> {
            self.calls.borrow_mut().push(format!("install {}", args.join(" ")));
            Ok(self.result())
        }

        fn uninstall(&self, name: &str) -> Result<ProcessResult> {
            self.calls.borrow_mut().push(format!("uninstall {}", name));
            Ok(self.result())
        }
    }

    /// Uninstalls succeed, installs fail.
    struct FailingInstall {
        installed: Vec<InstalledTool>,
    }

    impl PackageManager for FailingInstall {
        fn program(&self) -> &str {
            "uv"
        }

        fn list_tools(&self) -> Result<Vec<ListedTool>> {
            Ok(Vec::new())
        }

        fn installed_tools(&self) -> Result<Vec<InstalledTool>> {
            Ok(self.installed.clone())
        }

        fn install(&self, _args: &[String]) -> Result<ProcessResult> {
            Ok(ProcessResult {
                exit_code: Some(1),
                stdout: String::new(),
                stderr: String::new(),
                duration: Duration::ZERO,
                success: false,
            })
        }

        fn uninstall(&self, _name: &str) -> Result<ProcessResult> {
            Ok(ProcessResult {
                exit_code: Some(0),
                stdout: String::new(),
                stderr: String::new(),
                duration: Duration::ZERO,
                success: true,
            })
        }
    }

    fn manifest(temp: &TempDir, body: &str) -> Settings {
        let path = temp.path().join("UVFile");
        fs::write(&path, body).unwrap();
        Settings::new(path, "uv")
    }

    #[test]
    fn missing_manifest_is_an_error() {
        let temp = TempDir::new().unwrap();
        let settings = Settings::new(temp.path().join("UVFile"), "uv");
        let manager = Recorder::default();
        let mut ui = MockUI::new();

        let cmd = SyncCommand::new(&settings, &manager, SyncArgs::default());
        let err = cmd.execute(&mut ui).unwrap_err();

        assert!(matches!(err, UvfileError::ManifestNotFound { .. }));
    }

    #[test]
    fn installs_declared_tools() {
        let temp = TempDir::new().unwrap();
        let settings = manifest(&temp, "ruff\nblack>=24 --python 3.12\n");
        let manager = Recorder::default();
        let mut ui = MockUI::new();

        let cmd = SyncCommand::new(&settings, &manager, SyncArgs::default());
        let result = cmd.execute(&mut ui).unwrap();

        assert!(result.success);
        assert_eq!(
            *manager.calls.borrow(),
            vec!["install ruff", "install black>=24 --python 3.12"]
        );
        assert!(ui.has_success("Ran 2 uv commands."));
    }

    #[test]
    fn up_to_date_reports_nothing_to_do() {
        let temp = TempDir::new().unwrap();
        let settings = manifest(&temp, "ruff\n");
        let manager = Recorder {
            installed: vec![InstalledTool::new(
                "ruff",
                ToolSpec::new(parse_requirement("ruff", false).unwrap()),
            )],
            ..Default::default()
        };
        let mut ui = MockUI::new();

        let cmd = SyncCommand::new(&settings, &manager, SyncArgs::default());
        cmd.execute(&mut ui).unwrap();

        assert!(manager.calls.borrow().is_empty());
        assert!(ui.has_success("All tools are up to date."));
    }

    #[test]
    fn dry_run_prints_commands() {
        let temp = TempDir::new().unwrap();
        let settings = manifest(&temp, "ruff\n");
        let manager = Recorder::default();
        let mut ui = MockUI::new();
        let args = SyncArgs {
            dry_run: true,
            ..Default::default()
        };

        let cmd = SyncCommand::new(&settings, &manager, args);
        cmd.execute(&mut ui).unwrap();

        assert!(manager.calls.borrow().is_empty());
        assert_eq!(ui.reports(), &["Would run: uv tool install ruff"]);
        assert!(ui.successes().is_empty());
    }

    #[test]
    fn failed_install_lists_remaining_commands() {
        let temp = TempDir::new().unwrap();
        let settings = manifest(&temp, "ruff\nmypy\n");
        let manager = Recorder {
            exit_code: 1,
            ..Default::default()
        };
        let mut ui = MockUI::new();

        let cmd = SyncCommand::new(&settings, &manager, SyncArgs::default());
        let result = cmd.execute(&mut ui).unwrap();

        assert_eq!(result.exit_code, 1);
        assert!(ui.has_error("uv tool install ruff"));
        assert!(ui.has_report("Not run:"));
        assert!(ui.has_report("uv tool install mypy"));
        assert!(!ui.has_report("Completed:"));
        assert_eq!(manager.calls.borrow().len(), 1);
    }

    #[test]
    fn quiet_abort_names_completed_and_skipped_commands() {
        let temp = TempDir::new().unwrap();
        let settings = manifest(&temp, "ruff
");
        let manager = FailingInstall {
            installed: vec![InstalledTool::new(
                "mypy",
                ToolSpec::new(parse_requirement("mypy", false).unwrap()),
            )],
        };
        let mut ui = MockUI::with_mode(OutputMode::Quiet);
        let args = SyncArgs {
            uninstall: true,
            ..Default::default()
        };

        let cmd = SyncCommand::new(&settings, &manager, args);
        let result = cmd.execute(&mut ui).unwrap();

        assert_eq!(result.exit_code, 1);
        assert_eq!(
            ui.reports(),
            &["Completed:", "  uv tool uninstall mypy"]
        );
        assert!(ui.has_error("1 completed, 0 not attempted"));
    }

    #[test]
    fn malformed_manifest_fails_before_running() {
        let temp = TempDir::new().unwrap();
        let settings = manifest(&temp, "ruff --frobnicate\n");
        let manager = Recorder::default();
        let mut ui = MockUI::new();

        let cmd = SyncCommand::new(&settings, &manager, SyncArgs::default());
        let err = cmd.execute(&mut ui).unwrap_err();

        assert!(matches!(err, UvfileError::ManifestParse { line: 1, .. }));
        assert!(manager.calls.borrow().is_empty());
    }
}
