//! Parsing of `uv tool list --show-paths` output.

use std::path::PathBuf;

use crate::requirement::normalize_name;

/// One tool line from the uv listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListedTool {
    /// Normalized tool name.
    pub name: String,
    /// Installed version as printed by uv (e.g. `v0.5.0`).
    pub version: Option<String>,
    /// The tool's environment directory, holding `uv-receipt.toml`.
    pub path: PathBuf,
}

/// Parse the listing, preserving uv's order.
///
/// Tool lines look like `name version (path)`. Entry point lines start
/// with `-` and are skipped, as is anything that does not match.
pub fn parse_tool_list(output: &str) -> Vec<ListedTool> {
    output
        .lines()
        .map(str::trim_end)
        .filter(|line| !line.trim().is_empty())
        .filter(|line| !line.trim_start().starts_with('-'))
        .filter_map(|line| {
            let parsed = parse_line(line);
            if parsed.is_none() {
                tracing::debug!("Ignoring unrecognized tool list line: {}", line);
            }
            parsed
        })
        .collect()
}

fn parse_line(line: &str) -> Option<ListedTool> {
    let body = line.trim().strip_suffix(')')?;
    let (head, path) = body.split_once(" (")?;
    if path.is_empty() {
        return None;
    }

    let mut words = head.split_whitespace();
    let name = words.next()?;
    let version = words.next().map(str::to_string);

    Some(ListedTool {
        name: normalize_name(name),
        version,
        path: PathBuf::from(path),
    })
}
