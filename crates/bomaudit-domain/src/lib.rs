//! Pure dependency consistency evaluation (no IO).
//!
//! Input: a dependency graph, a provider directory and per-artifact usage metadata, all
//! constructed elsewhere.
//! Output: detector findings, archive-backed verdicts and the assembled reports.

#![forbid(unsafe_code)]

pub mod fingerprint;
pub mod input;
pub mod model;
pub mod policy;
pub mod report;
pub mod validate;

mod checks;
mod engine;

#[cfg(test)]
mod proptest;
#[cfg(test)]
mod test_support;

pub use engine::{Detection, detect};
pub use input::AuditInput;
pub use policy::{AuditPolicy, DEFAULT_SKIP_PREFIXES, SearchScope};
pub use report::{AssembledReport, ComplianceRow, assemble};
pub use validate::{
    ArchiveProbe, CheckedFinding, ProbeError, ProbeTarget, SkippedProbe, Validation, validate,
};
