//! Canonical requirement and tool types.
//!
//! Every constructor normalizes its input, so a requirement read from the
//! UVFile and the same requirement read from a `uv-receipt.toml` end up with
//! identical field values.

use std::collections::BTreeSet;
use std::fmt;
use std::sync::LazyLock;

use regex::Regex;

static NAME_SEPARATORS: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[-_.]+").unwrap());

/// Normalize a package or extra name (lowercase, `-_.` runs become `-`).
pub fn normalize_name(name: &str) -> String {
    NAME_SEPARATORS
        .replace_all(name.trim(), "-")
        .to_lowercase()
}

/// Normalize a version specifier.
///
/// Whitespace is dropped and comma-separated clauses are sorted, so
/// `">= 24, <25"` and `"<25,>=24"` compare equal. Returns `None` for an
/// empty specifier.
pub fn normalize_constraint(constraint: &str) -> Option<String> {
    let compact: String = constraint
        .chars()
        .filter(|c| !c.is_whitespace() && *c != '(' && *c != ')')
        .collect();
    let mut clauses: Vec<&str> = compact.split(',').filter(|c| !c.is_empty()).collect();
    if clauses.is_empty() {
        return None;
    }
    clauses.sort_unstable();
    clauses.dedup();
    Some(clauses.join(","))
}

/// Where a requirement is installed from.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Source {
    /// Package index, resolved by name and version constraint.
    Registry,
    /// Git repository. Stored without the `git+` scheme prefix.
    VersionControl { url: String },
    /// Local source tree, installed as a regular (non-editable) package.
    Directory { path: String },
    /// Local checkout or URL installed in editable mode.
    Editable { path_or_url: String },
}

/// One installable reference.
///
/// Version constraint and extras only apply to [`Source::Registry`]; the
/// builders discard them for the other sources.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RequirementSpec {
    name: Option<String>,
    version_constraint: Option<String>,
    extras: BTreeSet<String>,
    source: Source,
}

impl RequirementSpec {
    /// A registry requirement with no version constraint.
    pub fn registry(name: &str) -> Self {
        Self {
            name: Some(normalize_name(name)),
            version_constraint: None,
            extras: BTreeSet::new(),
            source: Source::Registry,
        }
    }

    /// A requirement with an explicit source and optional name.
    pub fn with_source(name: Option<&str>, source: Source) -> Self {
        Self {
            name: name.map(normalize_name),
            version_constraint: None,
            extras: BTreeSet::new(),
            source,
        }
    }

    /// Set the version constraint (registry sources only).
    pub fn constraint(mut self, constraint: &str) -> Self {
        if self.source == Source::Registry {
            self.version_constraint = normalize_constraint(constraint);
        }
        self
    }

    /// Add extras (registry sources only).
    pub fn extras<I, S>(mut self, extras: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        if self.source == Source::Registry {
            self.extras.extend(
                extras
                    .into_iter()
                    .map(|e| normalize_name(e.as_ref()))
                    .filter(|e| !e.is_empty()),
            );
        }
        self
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn version_constraint(&self) -> Option<&str> {
        self.version_constraint.as_deref()
    }

    pub fn extra_names(&self) -> &BTreeSet<String> {
        &self.extras
    }

    pub fn source(&self) -> &Source {
        &self.source
    }

    /// Whether this requirement is installed in editable mode.
    pub fn is_editable(&self) -> bool {
        matches!(self.source, Source::Editable { .. })
    }
}

impl fmt::Display for RequirementSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&crate::render::fragment(self))
    }
}

/// One declared or installed tool.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolSpec {
    primary: RequirementSpec,
    overrides: Vec<RequirementSpec>,
    interpreter: Option<String>,
}

impl ToolSpec {
    pub fn new(primary: RequirementSpec) -> Self {
        Self {
            primary,
            overrides: Vec::new(),
            interpreter: None,
        }
    }

    /// Append a dependency override.
    pub fn with_override(mut self, requirement: RequirementSpec) -> Self {
        self.overrides.push(requirement);
        self
    }

    /// Pin the interpreter. An empty pin means no pin.
    pub fn with_interpreter(mut self, interpreter: Option<&str>) -> Self {
        self.interpreter = interpreter
            .map(str::trim)
            .filter(|p| !p.is_empty())
            .map(str::to_string);
        self
    }

    pub fn primary(&self) -> &RequirementSpec {
        &self.primary
    }

    pub fn overrides(&self) -> &[RequirementSpec] {
        &self.overrides
    }

    pub fn interpreter(&self) -> Option<&str> {
        self.interpreter.as_deref()
    }

    /// The tool name, taken from the primary requirement.
    pub fn name(&self) -> Option<&str> {
        self.primary.name()
    }
}
