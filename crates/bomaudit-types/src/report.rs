use crate::{
    ArtifactId, Finding, FindingCategory, IncorrectDirectRecord, MissingDirectRecord,
    MissingTransitiveRecord, SearchScope, TransitiveEdgeRecord, Verdict,
};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Stable schema identifiers for bomaudit outputs.
pub const SCHEMA_ANALYZE_LOG_V1: &str = "bomaudit.analyze_log.v1";
pub const SCHEMA_COMPLIANCE_V1: &str = "bomaudit.compliance.v1";

/// Artifacts referenced by the manifest whose provider data is not available.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct UncollectedLog {
    /// Direct dependencies with no (or an unknown) provider directory entry.
    #[serde(default)]
    pub first_level: Vec<ArtifactId>,
    /// Per second-level node, its declared children with no provider directory entry.
    #[serde(default)]
    pub second_level: BTreeMap<ArtifactId, Vec<ArtifactId>>,
    /// Second-level nodes skipped because their own usage metadata could not be loaded.
    #[serde(default)]
    pub metadata_unavailable: Vec<ArtifactId>,
}

impl UncollectedLog {
    pub fn is_empty(&self) -> bool {
        self.first_level.is_empty()
            && self.second_level.is_empty()
            && self.metadata_unavailable.is_empty()
    }
}

/// References the metadata analyzer could not resolve statically.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct UnresolvedLog {
    /// Unresolved references of the audited artifact.
    #[serde(default)]
    pub first_level: Vec<String>,
    /// Unresolved references per second-level node.
    #[serde(default)]
    pub second_level: BTreeMap<ArtifactId, Vec<String>>,
}

/// Raw detector output, written as `analyze_log.json`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct AnalyzeLog {
    pub schema: String,
    pub scope: SearchScope,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub artifact: Option<ArtifactId>,
    pub missing_log: Vec<MissingDirectRecord>,
    pub incorrect_log: Vec<IncorrectDirectRecord>,
    pub incorrect_transitive_deps_log: Vec<TransitiveEdgeRecord>,
    pub incorrect_transitive_relationship_log: Vec<TransitiveEdgeRecord>,
    pub missing_transitive_dependency_log: Vec<MissingTransitiveRecord>,
    pub missing_transitive_relationship_log: Vec<MissingTransitiveRecord>,
    pub uncollected: UncollectedLog,
    pub unresolved: UnresolvedLog,
}

impl AnalyzeLog {
    pub fn empty(scope: SearchScope, artifact: Option<ArtifactId>) -> Self {
        Self {
            schema: SCHEMA_ANALYZE_LOG_V1.to_string(),
            scope,
            artifact,
            missing_log: Vec::new(),
            incorrect_log: Vec::new(),
            incorrect_transitive_deps_log: Vec::new(),
            incorrect_transitive_relationship_log: Vec::new(),
            missing_transitive_dependency_log: Vec::new(),
            missing_transitive_relationship_log: Vec::new(),
            uncollected: UncollectedLog::default(),
            unresolved: UnresolvedLog::default(),
        }
    }

    /// Append a finding to the log that holds its kind.
    pub fn record(&mut self, finding: Finding) {
        match finding {
            Finding::MissingDirect(r) => self.missing_log.push(r),
            Finding::IncorrectDirect(r) => self.incorrect_log.push(r),
            Finding::IncorrectTransitive(r) => self.incorrect_transitive_deps_log.push(r),
            Finding::IncorrectTransitiveSharedParent(r) => {
                self.incorrect_transitive_relationship_log.push(r)
            }
            Finding::MissingTransitive(r) => self.missing_transitive_dependency_log.push(r),
            Finding::MissingTransitiveSharedParent(r) => {
                self.missing_transitive_relationship_log.push(r)
            }
        }
    }

    pub fn finding_count(&self) -> usize {
        self.missing_log.len()
            + self.incorrect_log.len()
            + self.incorrect_transitive_deps_log.len()
            + self.incorrect_transitive_relationship_log.len()
            + self.missing_transitive_dependency_log.len()
            + self.missing_transitive_relationship_log.len()
    }
}

/// Literal references probed in an archive, split by outcome.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct Evidence {
    #[serde(default)]
    pub found: Vec<String>,
    #[serde(default)]
    pub not_found: Vec<String>,
    /// Class entries holding each found reference.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub matches: BTreeMap<String, Vec<String>>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct ValidatedFinding {
    pub fingerprint: String,
    pub finding: Finding,
    pub verdict: Verdict,
    pub evidence: Evidence,
    /// Why a verdict stayed `undetermined` (uncollected providers, unresolved references).
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub qualifiers: Vec<String>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct CategoryResult {
    pub findings: Vec<ValidatedFinding>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct SkippedFinding {
    pub fingerprint: String,
    pub finding: Finding,
    pub reason: String,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct ComplianceSummary {
    pub detected: u32,
    pub confirmed: u32,
    pub undetermined: u32,
    pub refuted: u32,
    pub skipped: u32,
}

/// Post-validation verdicts, written as `compliance_result.json`.
///
/// Each category is keyed by its label. Refuted findings are dropped from the categories and only
/// counted in the summary.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct ComplianceResult {
    pub schema: String,
    pub scope: SearchScope,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub artifact: Option<ArtifactId>,
    #[serde(rename = "M1:Missing Direct Dependency", default)]
    pub missing_direct: CategoryResult,
    #[serde(rename = "M2:Missing Transitive Dependency", default)]
    pub missing_transitive: CategoryResult,
    #[serde(rename = "M3:Missing Transitive Relationship", default)]
    pub missing_transitive_relationship: CategoryResult,
    #[serde(rename = "N1:Incorrect Direct Dependency", default)]
    pub incorrect_direct: CategoryResult,
    #[serde(rename = "N2:Incorrect Transitive Dependency", default)]
    pub incorrect_transitive: CategoryResult,
    #[serde(rename = "N3:Incorrect Transitive Relationship", default)]
    pub incorrect_transitive_relationship: CategoryResult,
    pub summary: ComplianceSummary,
    #[serde(default)]
    pub skipped: Vec<SkippedFinding>,
}

impl ComplianceResult {
    pub fn empty(scope: SearchScope, artifact: Option<ArtifactId>) -> Self {
        Self {
            schema: SCHEMA_COMPLIANCE_V1.to_string(),
            scope,
            artifact,
            missing_direct: CategoryResult::default(),
            missing_transitive: CategoryResult::default(),
            missing_transitive_relationship: CategoryResult::default(),
            incorrect_direct: CategoryResult::default(),
            incorrect_transitive: CategoryResult::default(),
            incorrect_transitive_relationship: CategoryResult::default(),
            summary: ComplianceSummary::default(),
            skipped: Vec::new(),
        }
    }

    pub fn category(&self, category: FindingCategory) -> &CategoryResult {
        match category {
            FindingCategory::MissingDirect => &self.missing_direct,
            FindingCategory::MissingTransitive => &self.missing_transitive,
            FindingCategory::MissingTransitiveRelationship => &self.missing_transitive_relationship,
            FindingCategory::IncorrectDirect => &self.incorrect_direct,
            FindingCategory::IncorrectTransitive => &self.incorrect_transitive,
            FindingCategory::IncorrectTransitiveRelationship => {
                &self.incorrect_transitive_relationship
            }
        }
    }

    pub fn category_mut(&mut self, category: FindingCategory) -> &mut CategoryResult {
        match category {
            FindingCategory::MissingDirect => &mut self.missing_direct,
            FindingCategory::MissingTransitive => &mut self.missing_transitive,
            FindingCategory::MissingTransitiveRelationship => {
                &mut self.missing_transitive_relationship
            }
            FindingCategory::IncorrectDirect => &mut self.incorrect_direct,
            FindingCategory::IncorrectTransitive => &mut self.incorrect_transitive,
            FindingCategory::IncorrectTransitiveRelationship => {
                &mut self.incorrect_transitive_relationship
            }
        }
    }

    /// All retained findings in category order.
    pub fn findings(&self) -> impl Iterator<Item = (FindingCategory, &ValidatedFinding)> + '_ {
        FindingCategory::ALL
            .into_iter()
            .flat_map(move |c| self.category(c).findings.iter().map(move |f| (c, f)))
    }

    pub fn has_confirmed(&self) -> bool {
        self.summary.confirmed > 0
    }
}
