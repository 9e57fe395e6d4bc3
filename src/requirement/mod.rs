//! Requirement model.
//!
//! A [`ToolSpec`] is one tool with its primary [`RequirementSpec`], the
//! dependency overrides forced alongside it, and an optional interpreter pin.
//! Both the UVFile and `uv-receipt.toml` are decoded into these types.
//!
//! # Example
//!
//! ```
//! use uvfile::requirement::{parse_requirement, Source};
//!
//! let req = parse_requirement("black[d]>=24", false).unwrap();
//! assert_eq!(req.name(), Some("black"));
//! assert_eq!(req.version_constraint(), Some(">=24"));
//! assert_eq!(req.source(), &Source::Registry);
//! ```

pub mod git;
pub mod parse;
pub mod spec;

pub use git::GitLocation;
pub use parse::parse_requirement;
pub use spec::{normalize_constraint, normalize_name, RequirementSpec, Source, ToolSpec};
