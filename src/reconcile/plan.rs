//! Sync planning.
//!
//! [`plan`] compares the UVFile against the installed tools and decides what
//! to install, reinstall and remove. It is a pure function: no I/O, no
//! process execution.

use std::collections::{HashMap, HashSet};

use crate::error::{Result, UvfileError};
use crate::receipt::InstalledTool;
use crate::render::install_args;
use crate::requirement::ToolSpec;

use super::equivalence::difference;

/// Flags controlling how far a sync goes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SyncPolicy {
    /// Reinstall every declared tool, even when already satisfied.
    pub reinstall: bool,
    /// Remove installed tools missing from the UVFile.
    pub uninstall: bool,
    /// Both of the above.
    pub strict: bool,
}

impl SyncPolicy {
    pub fn forces_reinstall(&self) -> bool {
        self.reinstall || self.strict
    }

    pub fn removes_undeclared(&self) -> bool {
        self.uninstall || self.strict
    }
}

/// One step of a sync.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    /// `uv tool uninstall <name>`
    Uninstall { name: String },
    /// `uv tool install <args>`
    Install { tool: ToolSpec, reinstall: bool },
}

impl Action {
    /// Name of the tool this action touches.
    pub fn tool_name(&self) -> &str {
        match self {
            Action::Uninstall { name } => name,
            Action::Install { tool, .. } => tool.name().unwrap_or_default(),
        }
    }

    /// Arguments following `uv tool`.
    pub fn tool_args(&self) -> Vec<String> {
        match self {
            Action::Uninstall { name } => vec!["uninstall".to_string(), name.clone()],
            Action::Install { tool, reinstall } => {
                let mut args = vec!["install".to_string()];
                args.extend(install_args(tool, *reinstall));
                args
            }
        }
    }
}

/// The result of planning a sync.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ActionPlan {
    /// Declared tools that are missing or differ from what is installed.
    pub to_install: Vec<ToolSpec>,
    /// Declared tools already satisfied but forced by policy.
    pub to_reinstall: Vec<ToolSpec>,
    /// Installed tools not in the UVFile, in uv's listing order.
    pub to_remove: Vec<String>,
    /// Declared tools that need nothing.
    pub unchanged: Vec<String>,
    /// Whether install commands carry `--reinstall`.
    pub force: bool,
}

impl ActionPlan {
    /// Whether the plan has nothing to do.
    pub fn is_empty(&self) -> bool {
        self.to_install.is_empty() && self.to_reinstall.is_empty() && self.to_remove.is_empty()
    }

    /// The plan as an ordered list of actions: removals first, then installs
    /// and reinstalls in UVFile order.
    pub fn actions(&self) -> Vec<Action> {
        let removals = self.to_remove.iter().map(|name| Action::Uninstall { name: name.clone() });
        let installs = self
            .to_install
            .iter()
            .chain(&self.to_reinstall)
            .map(|tool| Action::Install {
                tool: tool.clone(),
                reinstall: self.force,
            });
        removals.chain(installs).collect()
    }
}

/// Plan a sync of `declared` against `installed`.
///
/// Fails with [`UvfileError::AmbiguousState`] if either side lists a tool
/// name twice.
pub fn plan(
    declared: &[ToolSpec],
    installed: &[InstalledTool],
    policy: SyncPolicy,
) -> Result<ActionPlan> {
    let mut declared_names = HashSet::new();
    for tool in declared {
        let name = tool.name().unwrap_or_default();
        if !declared_names.insert(name) {
            return Err(UvfileError::AmbiguousState {
                name: name.to_string(),
                origin: "the UVFile".to_string(),
            });
        }
    }

    let mut by_name: HashMap<&str, &InstalledTool> = HashMap::new();
    for tool in installed {
        if by_name.insert(tool.name.as_str(), tool).is_some() {
            return Err(UvfileError::AmbiguousState {
                name: tool.name.clone(),
                origin: "the installed tools".to_string(),
            });
        }
    }

    let force = policy.forces_reinstall();
    let mut result = ActionPlan {
        force,
        ..Default::default()
    };

    for tool in declared {
        let name = tool.name().unwrap_or_default();
        match by_name.get(name).map(|i| i.spec.as_ref()) {
            None => {
                tracing::debug!("{}: not installed", name);
                result.to_install.push(tool.clone());
            }
            Some(None) => {
                tracing::debug!("{}: installed without a readable receipt", name);
                result.to_install.push(tool.clone());
            }
            Some(Some(current)) => match difference(tool, current) {
                Some(diff) => {
                    tracing::debug!("{}: {}", name, diff);
                    result.to_install.push(tool.clone());
                }
                None if force => {
                    tracing::debug!("{}: up to date, reinstall forced", name);
                    result.to_reinstall.push(tool.clone());
                }
                None => {
                    tracing::debug!("{}: up to date", name);
                    result.unchanged.push(name.to_string());
                }
            },
        }
    }

    if policy.removes_undeclared() {
        result.to_remove = installed
            .iter()
            .filter(|tool| !declared_names.contains(tool.name.as_str()))
            .map(|tool| tool.name.clone())
            .collect();
    }

    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::requirement::parse_requirement;

    fn declared(primary: &str) -> ToolSpec {
        ToolSpec::new(parse_requirement(primary, false).unwrap())
    }

    fn installed(primary: &str) -> InstalledTool {
        let spec = declared(primary);
        let name = spec.name().unwrap().to_string();
        InstalledTool::new(&name, spec)
    }

    fn names(tools: &[ToolSpec]) -> Vec<&str> {
        tools.iter().filter_map(|t| t.name()).collect()
    }

    #[test]
    fn installs_missing_tool() {
        let plan = plan(&[declared("ruff")], &[], SyncPolicy::default()).unwrap();
        assert_eq!(names(&plan.to_install), vec!["ruff"]);
        assert!(plan.to_reinstall.is_empty());
        assert!(plan.to_remove.is_empty());
        assert_eq!(
            plan.actions()[0].tool_args(),
            vec!["install", "ruff"]
        );
    }

    #[test]
    fn equivalent_tool_needs_nothing() {
        let plan = plan(
            &[declared("black>=24")],
            &[installed("black>=24")],
            SyncPolicy::default(),
        )
        .unwrap();
        assert!(plan.is_empty());
        assert_eq!(plan.unchanged, vec!["black"]);
    }

    #[test]
    fn mismatched_tool_is_installed() {
        let plan = plan(
            &[declared("black==24.1.0")],
            &[installed("black==23.0.0")],
            SyncPolicy::default(),
        )
        .unwrap();
        assert_eq!(names(&plan.to_install), vec!["black"]);
        assert!(!plan.force);
        assert_eq!(
            plan.actions()[0].tool_args(),
            vec!["install", "black==24.1.0"]
        );
    }

    #[test]
    fn strict_reinstalls_and_removes() {
        let policy = SyncPolicy {
            strict: true,
            ..Default::default()
        };
        let plan = plan(
            &[declared("ruff")],
            &[installed("ruff"), installed("mypy")],
            policy,
        )
        .unwrap();

        assert!(plan.to_install.is_empty());
        assert_eq!(names(&plan.to_reinstall), vec!["ruff"]);
        assert_eq!(plan.to_remove, vec!["mypy"]);

        let actions = plan.actions();
        assert_eq!(actions[0], Action::Uninstall { name: "mypy".into() });
        assert_eq!(
            actions[1].tool_args(),
            vec!["install", "ruff", "--reinstall"]
        );
    }

    #[test]
    fn uninstall_only_does_not_force_reinstall() {
        let policy = SyncPolicy {
            uninstall: true,
            ..Default::default()
        };
        let plan = plan(
            &[declared("ruff")],
            &[installed("ruff"), installed("mypy")],
            policy,
        )
        .unwrap();
        assert!(plan.to_reinstall.is_empty());
        assert_eq!(plan.to_remove, vec!["mypy"]);
    }

    #[test]
    fn reinstall_only_does_not_remove() {
        let policy = SyncPolicy {
            reinstall: true,
            ..Default::default()
        };
        let plan = plan(
            &[declared("ruff")],
            &[installed("ruff"), installed("mypy")],
            policy,
        )
        .unwrap();
        assert_eq!(names(&plan.to_reinstall), vec!["ruff"]);
        assert!(plan.to_remove.is_empty());
    }

    #[test]
    fn default_policy_never_removes() {
        let plan = plan(&[], &[installed("mypy")], SyncPolicy::default()).unwrap();
        assert!(plan.to_remove.is_empty());
    }

    #[test]
    fn removals_follow_listing_order() {
        let policy = SyncPolicy {
            uninstall: true,
            ..Default::default()
        };
        let listed = [installed("zed"), installed("ruff"), installed("alpha")];
        let plan = plan(&[declared("ruff")], &listed, policy).unwrap();
        assert_eq!(plan.to_remove, vec!["zed", "alpha"]);
    }

    #[test]
    fn receipt_less_tool_is_installed_and_not_removed() {
        let ghost = InstalledTool {
            name: "ghost".into(),
            path: Default::default(),
            spec: None,
        };
        let policy = SyncPolicy {
            uninstall: true,
            ..Default::default()
        };
        let plan = plan(&[declared("ghost")], &[ghost], policy).unwrap();
        assert_eq!(names(&plan.to_install), vec!["ghost"]);
        assert!(plan.to_remove.is_empty());
    }

    #[test]
    fn receipt_less_undeclared_tool_is_removed() {
        let ghost = InstalledTool {
            name: "ghost".into(),
            path: Default::default(),
            spec: None,
        };
        let policy = SyncPolicy {
            strict: true,
            ..Default::default()
        };
        let plan = plan(&[], &[ghost], policy).unwrap();
        assert_eq!(plan.to_remove, vec!["ghost"]);
    }

    #[test]
    fn duplicate_declared_names_are_ambiguous() {
        let err = plan(
            &[declared("ruff"), declared("Ruff>=0.5")],
            &[],
            SyncPolicy::default(),
        )
        .unwrap_err();
        assert!(matches!(err, UvfileError::AmbiguousState { .. }));
    }

    #[test]
    fn duplicate_installed_names_are_ambiguous() {
        let err = plan(
            &[],
            &[installed("ruff"), installed("ruff")],
            SyncPolicy::default(),
        )
        .unwrap_err();
        assert!(matches!(err, UvfileError::AmbiguousState { .. }));
    }

    #[test]
    fn declared_names_are_partitioned() {
        let decl = [
            declared("ruff"),
            declared("black>=24"),
            declared("isort"),
            declared("mypy==1.0"),
        ];
        let inst = [
            installed("black>=24"),
            installed("mypy==0.9"),
            installed("flake8"),
        ];
        for policy in [
            SyncPolicy::default(),
            SyncPolicy {
                reinstall: true,
                ..Default::default()
            },
            SyncPolicy {
                uninstall: true,
                ..Default::default()
            },
            SyncPolicy {
                strict: true,
                ..Default::default()
            },
        ] {
            let plan = plan(&decl, &inst, policy).unwrap();

            let install: HashSet<&str> = names(&plan.to_install).into_iter().collect();
            let reinstall: HashSet<&str> = names(&plan.to_reinstall).into_iter().collect();
            let unchanged: HashSet<&str> = plan.unchanged.iter().map(String::as_str).collect();

            assert!(install.is_disjoint(&reinstall));
            assert!(install.is_disjoint(&unchanged));
            assert!(reinstall.is_disjoint(&unchanged));

            let all: HashSet<&str> = install
                .iter()
                .chain(&reinstall)
                .chain(&unchanged)
                .copied()
                .collect();
            let expected: HashSet<&str> = names(&decl).into_iter().collect();
            assert_eq!(all, expected);

            if policy.removes_undeclared() {
                assert_eq!(plan.to_remove, vec!["flake8"]);
            } else {
                assert!(plan.to_remove.is_empty());
            }
        }
    }

    #[test]
    fn second_plan_after_applying_first_is_idle() {
        let decl = vec![
            declared("ruff"),
            declared("black==24.1.0"),
            ToolSpec::new(parse_requirement("mytool", false).unwrap())
                .with_override(parse_requirement("pkg[extra]>=1.0", false).unwrap())
                .with_interpreter(Some("3.11")),
        ];
        let inst = vec![installed("black==23.0.0"), installed("mypy")];
        let policy = SyncPolicy {
            uninstall: true,
            ..Default::default()
        };

        let first = plan(&decl, &inst, policy).unwrap();
        assert!(!first.is_empty());

        // Apply the first plan to the installed state.
        let mut after: Vec<InstalledTool> = inst
            .into_iter()
            .filter(|t| !first.to_remove.contains(&t.name))
            .collect();
        for tool in first.to_install.iter().chain(&first.to_reinstall) {
            let name = tool.name().unwrap();
            after.retain(|t| t.name != name);
            after.push(InstalledTool::new(name, tool.clone()));
        }

        let second = plan(&decl, &after, policy).unwrap();
        assert!(second.to_install.is_empty());
        assert!(second.to_reinstall.is_empty());
        assert!(second.to_remove.is_empty());
        assert!(second.is_empty());
    }
}
