//! Reconciliation of declared and installed tools.
//!
//! - [`equivalence`] - whether an installed tool already satisfies a declared one
//! - [`plan`] - the install/reinstall/remove sets for a sync

pub mod equivalence;
pub mod plan;

pub use equivalence::{difference, requirements_equivalent, tools_equivalent, Difference};
pub use plan::{plan, Action, ActionPlan, SyncPolicy};
