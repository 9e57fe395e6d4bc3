//! Requirement string parsing.
//!
//! Accepts the subset of PEP 508 that `uv tool install` takes on its command
//! line: `name[extras]specifier`, `name[extras] @ url-or-path`, or a bare
//! url/path.

use std::sync::LazyLock;

use regex::Regex;

use crate::error::{Result, UvfileError};

use super::spec::{RequirementSpec, Source};

static REQUIREMENT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^(?P<name>[A-Za-z0-9](?:[A-Za-z0-9._-]*[A-Za-z0-9])?)\s*(?:\[(?P<extras>[^\]]*)\])?\s*(?P<rest>.*)$",
    )
    .unwrap()
});

static CLAUSE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(===|==|!=|<=|>=|~=|<|>)\s*[A-Za-z0-9.*+!_-]+$").unwrap());

static EXTRA: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^[A-Za-z0-9._-]+$").unwrap());

static SCHEME: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z][A-Za-z0-9+.-]*://").unwrap());

static WINDOWS_DRIVE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^[A-Za-z]:[\\/]").unwrap());

fn parse_error(input: &str, message: impl Into<String>) -> UvfileError {
    UvfileError::RequirementParse {
        input: input.to_string(),
        message: message.into(),
    }
}

/// Parse a requirement string.
///
/// `editable` comes from the surrounding flag (`--editable` or
/// `--with-editable`) and turns any url/path into [`Source::Editable`].
pub fn parse_requirement(input: &str, editable: bool) -> Result<RequirementSpec> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err(parse_error(input, "empty requirement"));
    }
    if trimmed.contains(';') {
        return Err(parse_error(input, "environment markers are not supported"));
    }

    if looks_like_location(trimmed) {
        let source = classify_location(input, trimmed, editable)?;
        return Ok(RequirementSpec::with_source(None, source));
    }

    let caps = REQUIREMENT
        .captures(trimmed)
        .ok_or_else(|| parse_error(input, "expected a package name"))?;
    let name = &caps["name"];
    let rest = caps.name("rest").map_or("", |m| m.as_str()).trim();

    if let Some(location) = rest.strip_prefix('@') {
        let location = location.trim();
        if location.is_empty() {
            return Err(parse_error(input, "missing url or path after '@'"));
        }
        let source = classify_location(input, location, editable)?;
        return Ok(RequirementSpec::with_source(Some(name), source));
    }

    if editable {
        return Err(parse_error(
            input,
            "editable requirements need a path or url (name@path)",
        ));
    }

    let extras = match caps.name("extras") {
        Some(m) => parse_extras(input, m.as_str())?,
        None => Vec::new(),
    };
    let requirement = RequirementSpec::registry(name).extras(extras);

    match parse_constraint(input, rest)? {
        Some(constraint) => Ok(requirement.constraint(&constraint)),
        None => Ok(requirement),
    }
}

fn parse_extras(input: &str, raw: &str) -> Result<Vec<String>> {
    raw.split(',')
        .map(str::trim)
        .filter(|e| !e.is_empty())
        .map(|e| {
            if EXTRA.is_match(e) {
                Ok(e.to_string())
            } else {
                Err(parse_error(input, format!("invalid extra '{}'", e)))
            }
        })
        .collect()
}

fn parse_constraint(input: &str, rest: &str) -> Result<Option<String>> {
    let rest = rest
        .strip_prefix('(')
        .and_then(|r| r.strip_suffix(')'))
        .unwrap_or(rest)
        .trim();
    if rest.is_empty() {
        return Ok(None);
    }

    let mut clauses = Vec::new();
    for clause in rest.split(',').map(str::trim) {
        if !CLAUSE.is_match(clause) {
            return Err(parse_error(
                input,
                format!("invalid version specifier '{}'", clause),
            ));
        }
        clauses.push(clause);
    }
    Ok(Some(clauses.join(",")))
}

/// Whether a raw requirement is a bare url or filesystem path.
fn looks_like_location(s: &str) -> bool {
    if s.starts_with('.') || s.starts_with('/') || s.starts_with('~') {
        return true;
    }
    if SCHEME.is_match(s) || WINDOWS_DRIVE.is_match(s) {
        return true;
    }
    let head = s.split('@').next().unwrap_or(s);
    head.contains('/') || head.contains('\\')
}

fn classify_location(input: &str, location: &str, editable: bool) -> Result<Source> {
    if editable {
        let path_or_url = location.strip_prefix("file://").unwrap_or(location);
        return Ok(Source::Editable {
            path_or_url: path_or_url.to_string(),
        });
    }

    if let Some(url) = location.strip_prefix("git+") {
        if url.is_empty() {
            return Err(parse_error(input, "missing repository url after 'git+'"));
        }
        return Ok(Source::VersionControl {
            url: url.to_string(),
        });
    }

    if let Some(path) = location.strip_prefix("file://") {
        return Ok(Source::Directory {
            path: path.to_string(),
        });
    }

    if SCHEME.is_match(location) {
        if is_git_url(location) {
            return Ok(Source::VersionControl {
                url: location.to_string(),
            });
        }
        return Err(parse_error(
            input,
            "direct archive urls are not supported; use git+<url> or a local path",
        ));
    }

    Ok(Source::Directory {
        path: location.to_string(),
    })
}

fn is_git_url(url: &str) -> bool {
    let base = url.split(['#', '?']).next().unwrap_or(url);
    base.ends_with(".git") || base.contains(".git@")
}
