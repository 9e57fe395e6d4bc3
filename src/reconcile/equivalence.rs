//! Equivalence of declared and installed tools.
//!
//! Two tools are equivalent when installing one would produce the other:
//! same primary requirement, the same set of overrides (in any order), and
//! the same interpreter pin. A false positive here hides drift; a false
//! negative reinstalls the tool on every sync.

use std::collections::BTreeSet;
use std::fmt;

use crate::render::{requirement_args, RenderMode};
use crate::requirement::{GitLocation, RequirementSpec, Source, ToolSpec};

/// The first reason two tools differ.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Difference {
    /// Primary requirements differ (name, source, constraint or extras).
    Primary { declared: String, installed: String },
    /// The override sets differ.
    Overrides {
        missing: Vec<String>,
        unexpected: Vec<String>,
    },
    /// Interpreter pins differ.
    Interpreter {
        declared: Option<String>,
        installed: Option<String>,
    },
}

impl fmt::Display for Difference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Difference::Primary {
                declared,
                installed,
            } => write!(f, "requirement {} != installed {}", declared, installed),
            Difference::Overrides {
                missing,
                unexpected,
            } => write!(
                f,
                "overrides differ (missing: [{}], unexpected: [{}])",
                missing.join(", "),
                unexpected.join(", ")
            ),
            Difference::Interpreter {
                declared,
                installed,
            } => write!(
                f,
                "python {} != installed {}",
                declared.as_deref().unwrap_or("<none>"),
                installed.as_deref().unwrap_or("<none>")
            ),
        }
    }
}

/// Whether two requirements describe the same installation.
///
/// Constraint and extras are only compared for registry sources. Git refs
/// compare the same whether written `@ref` or as a receipt query.
pub fn requirements_equivalent(a: &RequirementSpec, b: &RequirementSpec) -> bool {
    if a.name() != b.name() {
        return false;
    }
    match (a.source(), b.source()) {
        (Source::Registry, Source::Registry) => {
            a.version_constraint() == b.version_constraint() && a.extra_names() == b.extra_names()
        }
        (Source::VersionControl { url: x }, Source::VersionControl { url: y }) => {
            GitLocation::parse(x) == GitLocation::parse(y)
        }
        (Source::Directory { path: x }, Source::Directory { path: y }) => x == y,
        (Source::Editable { path_or_url: x }, Source::Editable { path_or_url: y }) => x == y,
        _ => false,
    }
}

fn override_set(tool: &ToolSpec) -> BTreeSet<String> {
    tool.overrides()
        .iter()
        .map(|r| requirement_args(r, RenderMode::Dependency).join(" "))
        .collect()
}

/// Find how `declared` differs from `installed`, if at all.
pub fn difference(declared: &ToolSpec, installed: &ToolSpec) -> Option<Difference> {
    if !requirements_equivalent(declared.primary(), installed.primary()) {
        return Some(Difference::Primary {
            declared: declared.primary().to_string(),
            installed: installed.primary().to_string(),
        });
    }

    let wanted = override_set(declared);
    let present = override_set(installed);
    if wanted != present {
        return Some(Difference::Overrides {
            missing: wanted.difference(&present).cloned().collect(),
            unexpected: present.difference(&wanted).cloned().collect(),
        });
    }

    // An absent pin and an empty pin are the same; ToolSpec already folds
    // empty pins to None.
    if declared.interpreter().unwrap_or_default() != installed.interpreter().unwrap_or_default() {
        return Some(Difference::Interpreter {
            declared: declared.interpreter().map(str::to_string),
            installed: installed.interpreter().map(str::to_string),
        });
    }

    None
}

/// Whether two tools are equivalent.
pub fn tools_equivalent(a: &ToolSpec, b: &ToolSpec) -> bool {
    difference(a, b).is_none()
}
