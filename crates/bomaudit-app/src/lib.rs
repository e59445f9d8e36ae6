//! Use case orchestration for bomaudit.
//!
//! This crate provides the application layer: use cases that coordinate the domain, repo, and
//! render layers. It is intentionally thin and delegates heavy lifting to the appropriate layers.
//!
//! The CLI crate depends on this; it only handles argument parsing, retrieval and process spawning.

#![forbid(unsafe_code)]

mod check;
mod config;
mod explain;
mod index;
mod render;
mod report;

pub use check::{
    ANALYZE_LOG_FILE, COMPLIANCE_FILE, CheckInput, CheckOutput, GRAPH_FILE, default_out_dir,
    exit_code_for, run_check,
};
pub use config::{load_config, resolve_from_text};
pub use explain::{ExplainOutput, format_explanation, format_not_found, run_explain};
pub use index::run_index;
pub use render::{render_markdown, render_table, write_json, write_text};
pub use report::{parse_compliance_json, serialize_analyze_log, serialize_compliance, to_renderable};
