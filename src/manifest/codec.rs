//! UVFile text encoding and decoding.
//!
//! Each non-empty, non-comment line is one tool:
//!
//! ```text
//! <requirement> [--python VERSION] [--editable] [--with REQ]... [--with-editable REQ]...
//! ```
//!
//! Lines are split with shell quoting rules, so requirements containing
//! spaces or shell metacharacters must be quoted. Unknown flags are rejected.

use std::collections::HashSet;
use std::path::Path;

use crate::error::{Result, UvfileError};
use crate::render::install_args;
use crate::requirement::{parse_requirement, RequirementSpec, ToolSpec};

/// First line of every generated UVFile.
pub const MANIFEST_HEADER: &str = "# UVFile: Auto-generated file to track installed uv tools";

/// Decode UVFile text into tools, in file order.
///
/// `origin` only labels errors. Duplicate tool names are rejected.
pub fn decode(text: &str, origin: &Path) -> Result<Vec<ToolSpec>> {
    let mut tools = Vec::new();
    let mut seen = HashSet::new();

    for (index, raw) in text.lines().enumerate() {
        let line = raw.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        let tool = decode_line(line).map_err(|message| UvfileError::ManifestParse {
            path: origin.to_path_buf(),
            line: index + 1,
            message,
        })?;

        let name = tool.name().unwrap_or_default().to_string();
        if !seen.insert(name.clone()) {
            return Err(UvfileError::AmbiguousState {
                name,
                origin: origin.display().to_string(),
            });
        }
        tools.push(tool);
    }

    Ok(tools)
}

/// Decode a single tool line.
pub fn decode_line(line: &str) -> std::result::Result<ToolSpec, String> {
    let tokens = shell_words::split(line).map_err(|e| format!("invalid quoting: {}", e))?;

    let mut requirement: Option<String> = None;
    let mut python: Option<String> = None;
    let mut editable = false;
    let mut with: Vec<String> = Vec::new();
    let mut with_editable: Vec<String> = Vec::new();

    let mut iter = tokens.into_iter();
    while let Some(token) = iter.next() {
        match token.as_str() {
            "--python" => python = Some(flag_value(&mut iter, "--python")?),
            "--editable" | "-e" => editable = true,
            "--with" => with.push(flag_value(&mut iter, "--with")?),
            "--with-editable" => with_editable.push(flag_value(&mut iter, "--with-editable")?),
            t if t.starts_with("--python=") => python = Some(t["--python=".len()..].to_string()),
            t if t.starts_with("--with=") => with.push(t["--with=".len()..].to_string()),
            t if t.starts_with("--with-editable=") => {
                with_editable.push(t["--with-editable=".len()..].to_string())
            }
            t if t.starts_with('-') && t.len() > 1 => {
                return Err(format!("unknown flag '{}'", t));
            }
            _ => {
                if let Some(existing) = &requirement {
                    return Err(format!(
                        "unexpected argument '{}' after requirement '{}'",
                        token, existing
                    ));
                }
                requirement = Some(token);
            }
        }
    }

    let requirement = requirement.ok_or_else(|| "missing tool requirement".to_string())?;
    let primary = named_requirement(&requirement, editable)?;

    let mut tool = ToolSpec::new(primary);
    for raw in &with {
        tool = tool.with_override(named_requirement(raw, false)?);
    }
    for raw in &with_editable {
        tool = tool.with_override(named_requirement(raw, true)?);
    }
    Ok(tool.with_interpreter(python.as_deref()))
}

fn flag_value(
    iter: &mut impl Iterator<Item = String>,
    flag: &str,
) -> std::result::Result<String, String> {
    iter.next().ok_or_else(|| format!("{} requires a value", flag))
}

fn named_requirement(raw: &str, editable: bool) -> std::result::Result<RequirementSpec, String> {
    let requirement = parse_requirement(raw, editable).map_err(|e| e.to_string())?;
    if requirement.name().is_none() {
        return Err(format!(
            "requirement '{}' has no package name; write it as <name>@{}",
            raw, raw
        ));
    }
    Ok(requirement)
}

/// Encode tools as UVFile text, one line per tool after the header.
pub fn encode(tools: &[ToolSpec]) -> String {
    let mut out = String::from(MANIFEST_HEADER);
    out.push_str("\n\n");
    for tool in tools {
        out.push_str(&encode_line(tool));
        out.push('\n');
    }
    out
}

/// Encode one tool as a shell-quoted line.
pub fn encode_line(tool: &ToolSpec) -> String {
    shell_words::join(install_args(tool, false))
}
