use crate::ArtifactId;
use crate::ids;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// The root artifact uses a package that no declared dependency provides.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize, JsonSchema)]
pub struct MissingDirectRecord {
    pub artifact: ArtifactId,
    pub usage: String,
}

/// A direct dependency whose provided packages the root never uses.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize, JsonSchema)]
pub struct IncorrectDirectRecord {
    pub artifact: ArtifactId,
    pub dependency: ArtifactId,
    pub provided_packages: Vec<String>,
}

/// A declared second-level edge whose target provides nothing the source uses.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize, JsonSchema)]
pub struct TransitiveEdgeRecord {
    pub from: ArtifactId,
    pub to: ArtifactId,
    pub provided_packages: Vec<String>,
}

/// A second-level artifact uses a package none of its reachable providers export.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize, JsonSchema)]
pub struct MissingTransitiveRecord {
    pub node: ArtifactId,
    pub usage: String,
}

/// A single detector signal.
///
/// Every variant has a fixed record shape; the `kind` tag selects it on the wire.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize, JsonSchema)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Finding {
    MissingDirect(MissingDirectRecord),
    IncorrectDirect(IncorrectDirectRecord),
    IncorrectTransitive(TransitiveEdgeRecord),
    IncorrectTransitiveSharedParent(TransitiveEdgeRecord),
    MissingTransitive(MissingTransitiveRecord),
    MissingTransitiveSharedParent(MissingTransitiveRecord),
}

impl Finding {
    pub fn category(&self) -> FindingCategory {
        match self {
            Finding::MissingDirect(_) => FindingCategory::MissingDirect,
            Finding::IncorrectDirect(_) => FindingCategory::IncorrectDirect,
            Finding::IncorrectTransitive(_) => FindingCategory::IncorrectTransitive,
            Finding::IncorrectTransitiveSharedParent(_) => {
                FindingCategory::IncorrectTransitiveRelationship
            }
            Finding::MissingTransitive(_) => FindingCategory::MissingTransitive,
            Finding::MissingTransitiveSharedParent(_) => {
                FindingCategory::MissingTransitiveRelationship
            }
        }
    }

    /// Human-readable participants, as shown in the review table.
    ///
    /// Missing findings name the consumer and the unprovided package, incorrect direct findings
    /// name the dependency, transitive edges render as `from -> to`.
    pub fn participants(&self) -> String {
        match self {
            Finding::MissingDirect(r) => r.usage.clone(),
            Finding::IncorrectDirect(r) => r.dependency.to_string(),
            Finding::IncorrectTransitive(r) | Finding::IncorrectTransitiveSharedParent(r) => {
                format!("{} -> {}", r.from, r.to)
            }
            Finding::MissingTransitive(r) | Finding::MissingTransitiveSharedParent(r) => {
                format!("{} -> {}", r.node, r.usage)
            }
        }
    }

    /// The artifact whose usage triggered the finding.
    pub fn consumer(&self) -> &ArtifactId {
        match self {
            Finding::MissingDirect(r) => &r.artifact,
            Finding::IncorrectDirect(r) => &r.artifact,
            Finding::IncorrectTransitive(r) | Finding::IncorrectTransitiveSharedParent(r) => {
                &r.from
            }
            Finding::MissingTransitive(r) | Finding::MissingTransitiveSharedParent(r) => &r.node,
        }
    }

    pub fn is_missing(&self) -> bool {
        self.category().is_missing()
    }
}

/// The six reporting categories.
///
/// Declaration order is the order categories appear in reports and tables.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, JsonSchema,
)]
pub enum FindingCategory {
    #[serde(rename = "M1:Missing Direct Dependency")]
    MissingDirect,
    #[serde(rename = "M2:Missing Transitive Dependency")]
    MissingTransitive,
    #[serde(rename = "M3:Missing Transitive Relationship")]
    MissingTransitiveRelationship,
    #[serde(rename = "N1:Incorrect Direct Dependency")]
    IncorrectDirect,
    #[serde(rename = "N2:Incorrect Transitive Dependency")]
    IncorrectTransitive,
    #[serde(rename = "N3:Incorrect Transitive Relationship")]
    IncorrectTransitiveRelationship,
}

impl FindingCategory {
    pub const ALL: [FindingCategory; 6] = [
        FindingCategory::MissingDirect,
        FindingCategory::MissingTransitive,
        FindingCategory::MissingTransitiveRelationship,
        FindingCategory::IncorrectDirect,
        FindingCategory::IncorrectTransitive,
        FindingCategory::IncorrectTransitiveRelationship,
    ];

    pub fn code(self) -> &'static str {
        match self {
            FindingCategory::MissingDirect => ids::CODE_MISSING_DIRECT,
            FindingCategory::MissingTransitive => ids::CODE_MISSING_TRANSITIVE,
            FindingCategory::MissingTransitiveRelationship => {
                ids::CODE_MISSING_TRANSITIVE_RELATIONSHIP
            }
            FindingCategory::IncorrectDirect => ids::CODE_INCORRECT_DIRECT,
            FindingCategory::IncorrectTransitive => ids::CODE_INCORRECT_TRANSITIVE,
            FindingCategory::IncorrectTransitiveRelationship => {
                ids::CODE_INCORRECT_TRANSITIVE_RELATIONSHIP
            }
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            FindingCategory::MissingDirect => ids::LABEL_MISSING_DIRECT,
            FindingCategory::MissingTransitive => ids::LABEL_MISSING_TRANSITIVE,
            FindingCategory::MissingTransitiveRelationship => {
                ids::LABEL_MISSING_TRANSITIVE_RELATIONSHIP
            }
            FindingCategory::IncorrectDirect => ids::LABEL_INCORRECT_DIRECT,
            FindingCategory::IncorrectTransitive => ids::LABEL_INCORRECT_TRANSITIVE,
            FindingCategory::IncorrectTransitiveRelationship => {
                ids::LABEL_INCORRECT_TRANSITIVE_RELATIONSHIP
            }
        }
    }

    /// Accepts either the short code (`M1`) or the full label.
    pub fn from_code_or_label(identifier: &str) -> Option<Self> {
        let needle = identifier.trim();
        Self::ALL
            .into_iter()
            .find(|c| c.code().eq_ignore_ascii_case(needle) || c.label() == needle)
    }

    pub fn is_missing(self) -> bool {
        matches!(
            self,
            FindingCategory::MissingDirect
                | FindingCategory::MissingTransitive
                | FindingCategory::MissingTransitiveRelationship
        )
    }
}

/// Outcome of checking a finding against archive contents.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum Verdict {
    /// Corroborated by archive evidence with no missing-data explanation left.
    Confirmed,
    /// Archive evidence contradicts the detector; the finding is dropped.
    Refuted,
    /// Evidence agrees, but uncollected or unresolved data could explain it away.
    Undetermined,
}
