//! Installed-state reading.
//!
//! uv's own listing decides which tools are installed; each tool's
//! `uv-receipt.toml` then supplies how it was installed. Receipts are a
//! best-effort detail source and never fail a run.

pub mod listing;
pub mod reader;

pub use listing::{parse_tool_list, ListedTool};
pub use reader::{
    parse_receipt, read_installed, read_receipt, InstalledTool, ReceiptRequirement, RECEIPT_FILE,
};
