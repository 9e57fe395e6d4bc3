//! Running a sync plan.

use crate::error::{Result, UvfileError};
use crate::reconcile::{plan, Action, ActionPlan, SyncPolicy};
use crate::requirement::ToolSpec;
use crate::ui::UserInterface;

use super::manager::PackageManager;

/// How a sync should run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ConvergeOptions {
    pub policy: SyncPolicy,
    /// Print the commands instead of running them.
    pub dry_run: bool,
}

/// What a sync did.
#[derive(Debug, Clone, Default)]
pub struct ConvergeReport {
    /// The plan that was computed.
    pub plan: ActionPlan,
    /// Command lines, in execution order. For a dry run, the commands that
    /// would have run.
    pub commands: Vec<String>,
    pub dry_run: bool,
}

impl ConvergeReport {
    /// Number of commands run (or printed for a dry run).
    pub fn action_count(&self) -> usize {
        self.commands.len()
    }
}

fn progress_label(action: &Action) -> String {
    match action {
        Action::Uninstall { name } => format!("Uninstalling: {}", name),
        Action::Install { .. } => format!("Installing: {}", action.tool_name()),
    }
}

fn spinner_label(action: &Action) -> (String, String) {
    let name = action.tool_name();
    match action {
        Action::Uninstall { .. } => (
            format!("Uninstalling {}", name),
            format!("Uninstalled {}", name),
        ),
        Action::Install { .. } => (format!("Installing {}", name), format!("Installed {}", name)),
    }
}

/// Bring installed tools in line with `declared`.
///
/// Removals run first, then installs in declaration order. The first failing
/// command stops the run with [`UvfileError::ConvergenceAborted`], which lists
/// what already ran and what never did. A dry run only prints.
pub fn converge(
    manager: &dyn PackageManager,
    declared: &[ToolSpec],
    options: ConvergeOptions,
    ui: &mut dyn UserInterface,
) -> Result<ConvergeReport> {
    let installed = manager.installed_tools()?;
    let plan = plan(declared, &installed, options.policy)?;

    for name in &plan.unchanged {
        ui.progress(&format!("Skipping {}, already installed.", name));
    }

    let actions = plan.actions();
    let commands: Vec<String> = actions.iter().map(|a| manager.command_line(a)).collect();

    if options.dry_run {
        for command in &commands {
            ui.report(&format!("Would run: {}", command));
        }
        return Ok(ConvergeReport {
            plan,
            commands,
            dry_run: true,
        });
    }

    for (index, action) in actions.iter().enumerate() {
        let command = &commands[index];
        ui.progress(&progress_label(action));
        tracing::info!("Running: {}", command);

        let (running, done) = spinner_label(action);
        let mut spinner = ui.start_spinner(&running);

        let (code, stderr) = match manager.apply(action) {
            Ok(result) if result.success => {
                spinner.finish_success(&done);
                continue;
            }
            Ok(result) => (result.exit_code, result.stderr),
            Err(UvfileError::CommandFailed { code, .. }) => (code, String::new()),
            Err(e) => {
                spinner.finish_error(&format!("{} failed", command));
                return Err(e);
            }
        };

        spinner.finish_error(&format!("{} failed", command));
        let stderr = stderr.trim();
        if !stderr.is_empty() {
            ui.message(stderr);
        }

        return Err(UvfileError::ConvergenceAborted {
            command: command.clone(),
            code,
            completed: commands[..index].to_vec(),
            remaining: commands[index + 1..].to_vec(),
        });
    }

    Ok(ConvergeReport {
        plan,
        commands,
        dry_run: false,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::receipt::{InstalledTool, ListedTool};
    use crate::requirement::parse_requirement;
    use crate::shell::CommandResult;
    use crate::ui::MockUI;
    use std::cell::RefCell;
    use std::path::PathBuf;
    use std::time::Duration;

    /// Installer double: a fixed installed set, a call log and an optional
    /// tool whose install fails.
    #[derive(Default)]
    struct FakeManager {
        installed: Vec<InstalledTool>,
        fail_on: Option<String>,
        calls: RefCell<Vec<Vec<String>>>,
    }

    impl FakeManager {
        fn with_installed(installed: Vec<InstalledTool>) -> Self {
            Self {
                installed,
                ..Default::default()
            }
        }

        fn calls(&self) -> Vec<Vec<String>> {
            self.calls.borrow().clone()
        }

        fn outcome(&self, name: &str) -> CommandResult {
            let failed = self.fail_on.as_deref() == Some(name);
            CommandResult {
                exit_code: Some(if failed { 2 } else { 0 }),
                stdout: String::new(),
                stderr: if failed {
                    "error: no solution found".to_string()
                } else {
                    String::new()
                },
                duration: Duration::ZERO,
                success: !failed,
            }
        }
    }

    impl PackageManager for FakeManager {
        fn program(&self) -> &str {
            "uv"
        }

        fn list_tools(&self) -> Result<Vec<ListedTool>> {
            unreachable!("installed_tools is overridden")
        }

        fn installed_tools(&self) -> Result<Vec<InstalledTool>> {
            Ok(self.installed.clone())
        }

        fn install(&self, args: &[String]) -> Result<CommandResult> {
            let mut call = vec!["install".to_string()];
            call.extend(args.iter().cloned());
            self.calls.borrow_mut().push(call);
            let name = parse_requirement(&args[0], false)
                .map(|r| r.name().unwrap_or_default().to_string())
                .unwrap_or_default();
            Ok(self.outcome(&name))
        }

        fn uninstall(&self, name: &str) -> Result<CommandResult> {
            self.calls
                .borrow_mut()
                .push(vec!["uninstall".to_string(), name.to_string()]);
            Ok(self.outcome(name))
        }
    }

    fn tool(s: &str) -> ToolSpec {
        ToolSpec::new(parse_requirement(s, false).unwrap())
    }

    fn installed(name: &str, spec: &str) -> InstalledTool {
        InstalledTool::new(name, tool(spec))
    }

    fn options(dry_run: bool, policy: SyncPolicy) -> ConvergeOptions {
        ConvergeOptions { policy, dry_run }
    }

    #[test]
    fn installs_missing_tool() {
        let manager = FakeManager::default();
        let mut ui = MockUI::new();

        let report = converge(
            &manager,
            &[tool("ruff")],
            options(false, SyncPolicy::default()),
            &mut ui,
        )
        .unwrap();

        assert_eq!(manager.calls(), vec![vec!["install", "ruff"]]);
        assert_eq!(report.commands, vec!["uv tool install ruff"]);
        assert_eq!(ui.spinners(), &["Installing ruff"]);
        assert_eq!(ui.progress_lines(), &["Installing: ruff"]);
    }

    #[test]
    fn satisfied_tool_runs_nothing() {
        let manager = FakeManager::with_installed(vec![installed("black", "black>=24")]);
        let mut ui = MockUI::new();

        let report = converge(
            &manager,
            &[tool("black>=24")],
            options(false, SyncPolicy::default()),
            &mut ui,
        )
        .unwrap();

        assert!(manager.calls().is_empty());
        assert_eq!(report.action_count(), 0);
        assert_eq!(report.plan.unchanged, vec!["black"]);
        assert_eq!(ui.progress_lines(), &["Skipping black, already installed."]);
    }

    #[test]
    fn dry_run_never_executes() {
        let manager = FakeManager::with_installed(vec![installed("httpie", "httpie")]);
        let mut ui = MockUI::new();
        let policy = SyncPolicy {
            strict: true,
            ..Default::default()
        };

        let report = converge(&manager, &[tool("ruff")], options(true, policy), &mut ui).unwrap();

        assert!(manager.calls().is_empty());
        assert!(report.dry_run);
        assert_eq!(
            ui.reports(),
            &[
                "Would run: uv tool uninstall httpie",
                "Would run: uv tool install ruff --reinstall",
            ]
        );
        assert!(ui.spinners().is_empty());
    }

    #[test]
    fn quiet_dry_run_still_prints_plan() {
        let manager = FakeManager::default();
        let mut ui = MockUI::with_mode(crate::ui::OutputMode::Quiet);

        converge(
            &manager,
            &[tool("ruff")],
            options(true, SyncPolicy::default()),
            &mut ui,
        )
        .unwrap();

        assert_eq!(ui.reports(), &["Would run: uv tool install ruff"]);
        assert!(ui.messages().is_empty());
    }

    #[test]
    fn removals_run_before_installs() {
        let manager = FakeManager::with_installed(vec![
            installed("black", "black>=24"),
            installed("httpie", "httpie"),
        ]);
        let mut ui = MockUI::new();
        let policy = SyncPolicy {
            uninstall: true,
            ..Default::default()
        };

        converge(
            &manager,
            &[tool("ruff"), tool("black>=24")],
            options(false, policy),
            &mut ui,
        )
        .unwrap();

        assert_eq!(
            manager.calls(),
            vec![vec!["uninstall", "httpie"], vec!["install", "ruff"]]
        );
    }

    #[test]
    fn first_failure_aborts_with_report() {
        let manager = FakeManager {
            fail_on: Some("black".to_string()),
            ..Default::default()
        };
        let mut ui = MockUI::new();

        let err = converge(
            &manager,
            &[tool("ruff"), tool("black"), tool("mypy")],
            options(false, SyncPolicy::default()),
            &mut ui,
        )
        .unwrap_err();

        match err {
            UvfileError::ConvergenceAborted {
                command,
                code,
                completed,
                remaining,
            } => {
                assert_eq!(command, "uv tool install black");
                assert_eq!(code, Some(2));
                assert_eq!(completed, vec!["uv tool install ruff"]);
                assert_eq!(remaining, vec!["uv tool install mypy"]);
            }
            other => panic!("unexpected error: {:?}", other),
        }

        // mypy was never attempted
        assert_eq!(manager.calls().len(), 2);
        assert!(ui.has_message("no solution found"));
    }

    #[test]
    fn duplicate_declared_tools_fail_before_running() {
        let manager = FakeManager::default();
        let mut ui = MockUI::new();

        let err = converge(
            &manager,
            &[tool("ruff"), tool("ruff>=0.5")],
            options(false, SyncPolicy::default()),
            &mut ui,
        )
        .unwrap_err();

        assert!(matches!(err, UvfileError::AmbiguousState { .. }));
        assert!(manager.calls().is_empty());
    }

    #[test]
    fn receiptless_tool_is_reinstalled() {
        let manager = FakeManager::with_installed(vec![InstalledTool {
            name: "ruff".to_string(),
            path: PathBuf::from("/tools/ruff"),
            spec: None,
        }]);
        let mut ui = MockUI::new();

        converge(
            &manager,
            &[tool("ruff")],
            options(false, SyncPolicy::default()),
            &mut ui,
        )
        .unwrap();

        assert_eq!(manager.calls(), vec![vec!["install", "ruff"]]);
    }
}
