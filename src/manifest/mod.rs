//! UVFile loading and saving.
//!
//! The text format lives in [`codec`]; this module adds the file handling
//! around it and anchors relative source paths to the UVFile's directory.

pub mod codec;

pub use codec::{decode, decode_line, encode, encode_line, MANIFEST_HEADER};

use std::fs;
use std::path::{Component, Path, PathBuf};

use crate::error::{Result, UvfileError};
use crate::requirement::{RequirementSpec, Source, ToolSpec};

/// A decoded UVFile.
#[derive(Debug, Clone)]
pub struct Manifest {
    path: PathBuf,
    tools: Vec<ToolSpec>,
}

impl Manifest {
    /// Load and decode the UVFile at `path`.
    ///
    /// Relative `Directory` and `Editable` paths are made absolute against
    /// the UVFile's directory, matching what uv records in its receipts.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(UvfileError::ManifestNotFound {
                path: path.to_path_buf(),
            });
        }

        let content = fs::read_to_string(path)?;
        let tools = decode(&content, path)?;
        let base = base_dir(path)?;
        let tools: Vec<ToolSpec> = tools
            .iter()
            .map(|tool| resolve_tool(tool, &base))
            .collect();

        tracing::debug!("Loaded {} tools from {}", tools.len(), path.display());

        Ok(Self {
            path: path.to_path_buf(),
            tools,
        })
    }

    /// Encode `tools` and write them to `path`, replacing any existing file.
    pub fn save(path: &Path, tools: &[ToolSpec]) -> Result<()> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, encode(tools))?;
        tracing::debug!("Wrote {} tools to {}", tools.len(), path.display());
        Ok(())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn tools(&self) -> &[ToolSpec] {
        &self.tools
    }
}

fn base_dir(path: &Path) -> Result<PathBuf> {
    let parent = path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));
    Ok(std::path::absolute(parent)?)
}

fn resolve_tool(tool: &ToolSpec, base: &Path) -> ToolSpec {
    let mut resolved = ToolSpec::new(resolve_requirement(tool.primary(), base));
    for dependency in tool.overrides() {
        resolved = resolved.with_override(resolve_requirement(dependency, base));
    }
    resolved.with_interpreter(tool.interpreter())
}

fn resolve_requirement(requirement: &RequirementSpec, base: &Path) -> RequirementSpec {
    let source = match requirement.source() {
        Source::Directory { path } if is_relative_path(path) => Source::Directory {
            path: join_lexically(base, path),
        },
        Source::Editable { path_or_url } if is_relative_path(path_or_url) => Source::Editable {
            path_or_url: join_lexically(base, path_or_url),
        },
        _ => return requirement.clone(),
    };
    RequirementSpec::with_source(requirement.name(), source)
}

fn is_relative_path(location: &str) -> bool {
    !location.contains("://") && !location.starts_with('~') && Path::new(location).is_relative()
}

/// Join `relative` onto `base`, folding `.` and `..` without touching the
/// filesystem.
fn join_lexically(base: &Path, relative: &str) -> String {
    let mut out = PathBuf::new();
    for component in base.join(relative).components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                out.pop();
            }
            other => out.push(other.as_os_str()),
        }
    }
    out.to_string_lossy().into_owned()
}
