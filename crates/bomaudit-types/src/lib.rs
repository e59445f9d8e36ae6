//! Stable DTOs and IDs used across the bomaudit workspace.
//!
//! This crate is intentionally boring:
//! - the canonical artifact identifier derived from package URLs
//! - finding records and verdicts emitted by the audit
//! - the on-disk report shapes (`analyze_log.json`, `compliance_result.json`)
//! - stable category codes and the explain registry

#![forbid(unsafe_code)]

pub mod artifact;
pub mod explain;
pub mod finding;
pub mod ids;
pub mod report;
pub mod scope;

pub use artifact::{ArtifactId, PurlError};
pub use explain::{Explanation, lookup_explanation};
pub use finding::{
    Finding, FindingCategory, IncorrectDirectRecord, MissingDirectRecord, MissingTransitiveRecord,
    TransitiveEdgeRecord, Verdict,
};
pub use report::{
    AnalyzeLog, CategoryResult, ComplianceResult, ComplianceSummary, Evidence, SCHEMA_ANALYZE_LOG_V1,
    SCHEMA_COMPLIANCE_V1, SkippedFinding, UncollectedLog, UnresolvedLog, ValidatedFinding,
};
pub use scope::SearchScope;
