//! Command synthesis.
//!
//! Turns requirements back into `uv tool install` arguments. The same
//! argument list is what the UVFile stores for each tool, so the output must
//! stay deterministic.

use crate::requirement::{RequirementSpec, Source, ToolSpec};

/// Flag that forces uv to rebuild an already-installed tool.
pub const REINSTALL_FLAG: &str = "--reinstall";

/// How a requirement appears in an install command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderMode {
    /// The tool being installed.
    Primary,
    /// A dependency override (`--with` / `--with-editable`).
    Dependency,
}

/// Render the requirement token itself, without any flag.
///
/// Registry requirements render as `name[extras]constraint`; the other
/// sources as `name@location` (or the bare location when unnamed).
pub fn fragment(requirement: &RequirementSpec) -> String {
    let name = requirement.name().unwrap_or_default();
    match requirement.source() {
        Source::Registry => {
            let mut out = name.to_string();
            let extras = requirement.extra_names();
            if !extras.is_empty() {
                let joined: Vec<&str> = extras.iter().map(String::as_str).collect();
                out.push('[');
                out.push_str(&joined.join(","));
                out.push(']');
            }
            if let Some(constraint) = requirement.version_constraint() {
                out.push_str(constraint);
            }
            out
        }
        Source::VersionControl { url } => with_name(requirement, &format!("git+{}", url)),
        Source::Directory { path } => with_name(requirement, path),
        Source::Editable { path_or_url } => with_name(requirement, path_or_url),
    }
}

fn with_name(requirement: &RequirementSpec, location: &str) -> String {
    match requirement.name() {
        Some(name) => format!("{}@{}", name, location),
        None => location.to_string(),
    }
}

/// Render a requirement as command arguments in the given mode.
pub fn requirement_args(requirement: &RequirementSpec, mode: RenderMode) -> Vec<String> {
    let token = fragment(requirement);
    match (mode, requirement.is_editable()) {
        (RenderMode::Primary, false) => vec![token],
        (RenderMode::Primary, true) => vec!["--editable".to_string(), token],
        (RenderMode::Dependency, false) => vec!["--with".to_string(), token],
        (RenderMode::Dependency, true) => vec!["--with-editable".to_string(), token],
    }
}

/// Render the arguments that follow `uv tool install` for a tool.
///
/// Order: primary, overrides as declared, `--python`, then `--reinstall`
/// when `reinstall` is set.
pub fn install_args(tool: &ToolSpec, reinstall: bool) -> Vec<String> {
    let mut args = requirement_args(tool.primary(), RenderMode::Primary);
    for dependency in tool.overrides() {
        args.extend(requirement_args(dependency, RenderMode::Dependency));
    }
    if let Some(python) = tool.interpreter() {
        args.push("--python".to_string());
        args.push(python.to_string());
    }
    if reinstall {
        args.push(REINSTALL_FLAG.to_string());
    }
    args
}
