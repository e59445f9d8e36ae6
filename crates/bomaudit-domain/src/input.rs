use crate::model::{ArtifactMetadata, DependencyGraph, ProviderDirectory};
use bomaudit_types::ArtifactId;
use std::collections::BTreeMap;

/// Read-only context shared by detection and validation.
#[derive(Clone, Debug, Default)]
pub struct AuditInput {
    pub graph: DependencyGraph,
    pub directory: ProviderDirectory,
    /// Usage metadata of the audited artifact (the manifest root).
    pub root_metadata: Option<ArtifactMetadata>,
    /// Usage metadata of second-level artifacts, keyed by artifact.
    pub metadata: BTreeMap<ArtifactId, ArtifactMetadata>,
}

impl AuditInput {
    /// The manifest root as an artifact, when the root is unique and its reference parses.
    pub fn root_artifact(&self) -> Option<ArtifactId> {
        self.graph
            .root()
            .and_then(|r| ArtifactId::from_purl(r).ok())
    }
}
