//! `uv-receipt.toml` decoding.
//!
//! uv writes one receipt per installed tool. Its `requirements` list holds
//! the primary requirement first and every `--with` override after it, each
//! entry tagged with at most one of `git`, `directory` or `editable`.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Context;
use serde::Deserialize;

use crate::error::{Result, UvfileError};
use crate::requirement::{GitLocation, RequirementSpec, Source, ToolSpec};

use super::listing::ListedTool;

/// File name uv uses for tool receipts.
pub const RECEIPT_FILE: &str = "uv-receipt.toml";

#[derive(Debug, Deserialize)]
struct ReceiptFile {
    tool: ReceiptTool,
}

#[derive(Debug, Deserialize)]
struct ReceiptTool {
    #[serde(default)]
    requirements: Vec<ReceiptRequirement>,
    #[serde(default)]
    python: Option<String>,
}

/// One entry of the receipt's `requirements` list.
#[derive(Debug, Default, Deserialize)]
pub struct ReceiptRequirement {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub specifier: Option<String>,
    #[serde(default)]
    pub extras: Vec<String>,
    #[serde(default)]
    pub git: Option<String>,
    #[serde(default)]
    pub directory: Option<String>,
    #[serde(default)]
    pub editable: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub path: Option<String>,
}

impl ReceiptRequirement {
    /// Map this entry onto the requirement model.
    pub fn to_requirement(&self) -> std::result::Result<RequirementSpec, String> {
        let name = self
            .name
            .as_deref()
            .filter(|n| !n.trim().is_empty())
            .ok_or_else(|| "requirement entry has no name".to_string())?;

        if self.url.is_some() || self.path.is_some() {
            return Err(format!(
                "'{}' uses an archive source, which is not supported",
                name
            ));
        }

        let mut sources = Vec::new();
        if let Some(git) = &self.git {
            let url = git.strip_prefix("git+").unwrap_or(git);
            sources.push(Source::VersionControl {
                url: GitLocation::parse(url).to_url(),
            });
        }
        if let Some(directory) = &self.directory {
            sources.push(Source::Directory {
                path: directory.clone(),
            });
        }
        if let Some(editable) = &self.editable {
            sources.push(Source::Editable {
                path_or_url: editable.clone(),
            });
        }

        match sources.len() {
            0 => Ok(RequirementSpec::registry(name)
                .extras(&self.extras)
                .constraint(self.specifier.as_deref().unwrap_or_default())),
            1 => Ok(RequirementSpec::with_source(Some(name), sources.remove(0))),
            _ => Err(format!("'{}' declares more than one source", name)),
        }
    }
}

/// Decode receipt TOML text into a tool.
pub fn parse_receipt(content: &str, path: &Path) -> Result<ToolSpec> {
    let receipt_error = |message: String| UvfileError::ReceiptParse {
        path: path.to_path_buf(),
        message,
    };

    let receipt: ReceiptFile = toml::from_str(content)
        .with_context(|| format!("invalid TOML in {}", path.display()))
        .map_err(|e| receipt_error(format!("{:#}", e)))?;

    let mut entries = receipt.tool.requirements.iter();
    let primary = entries
        .next()
        .ok_or_else(|| receipt_error("receipt lists no requirements".to_string()))?
        .to_requirement()
        .map_err(receipt_error)?;

    let mut tool = ToolSpec::new(primary);
    for entry in entries {
        tool = tool.with_override(entry.to_requirement().map_err(receipt_error)?);
    }
    Ok(tool.with_interpreter(receipt.tool.python.as_deref()))
}

/// Read and decode the receipt in a tool directory.
pub fn read_receipt(tool_dir: &Path) -> Result<ToolSpec> {
    let path = tool_dir.join(RECEIPT_FILE);
    let content = fs::read_to_string(&path)?;
    parse_receipt(&content, &path)
}

/// A tool uv reports as installed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstalledTool {
    /// Name from the listing; authoritative for "is installed".
    pub name: String,
    /// The tool's environment directory.
    pub path: PathBuf,
    /// The tool as recorded in its receipt, if the receipt was readable.
    pub spec: Option<ToolSpec>,
}

impl InstalledTool {
    /// An installed tool with a known specification.
    pub fn new(name: &str, spec: ToolSpec) -> Self {
        Self {
            name: name.to_string(),
            path: PathBuf::new(),
            spec: Some(spec),
        }
    }
}

/// Attach receipts to listed tools.
///
/// A missing or unreadable receipt is logged and leaves `spec` empty; the
/// tool still counts as installed.
pub fn read_installed(listed: &[ListedTool]) -> Vec<InstalledTool> {
    listed
        .iter()
        .map(|tool| {
            let spec = match read_receipt(&tool.path) {
                Ok(spec) => {
                    tracing::debug!(
                        "Read receipt for {} {}",
                        tool.name,
                        tool.version.as_deref().unwrap_or("(unknown version)")
                    );
                    if spec.name() != Some(tool.name.as_str()) {
                        tracing::warn!(
                            "Receipt for '{}' names '{}'",
                            tool.name,
                            spec.name().unwrap_or_default()
                        );
                    }
                    Some(spec)
                }
                Err(UvfileError::Io(e)) => {
                    tracing::warn!(
                        "Skipping receipt for '{}' at {}: {}",
                        tool.name,
                        tool.path.join(RECEIPT_FILE).display(),
                        e
                    );
                    None
                }
                Err(e) => {
                    tracing::warn!("Skipping receipt for '{}': {}", tool.name, e);
                    None
                }
            };

            InstalledTool {
                name: tool.name.clone(),
                path: tool.path.clone(),
                spec,
            }
        })
        .collect()
}
