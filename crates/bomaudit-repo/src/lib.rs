//! Filesystem adapters: manifests, analyzer metadata, the provider directory, the metadata
//! database layout, and extracted archives.
//!
//! This crate is allowed to do filesystem IO. It should not spawn external processes or touch
//! the network; retrieval and tagging are driven by the CLI.

#![forbid(unsafe_code)]

pub mod archive;
pub mod directory;
pub mod layout;
pub mod manifest;
pub mod metadata;

pub use archive::{ArchiveContentIndex, ArchiveEvidence, ScratchWorkspace};
pub use directory::IndexStats;
pub use layout::{MetaDbLayout, discover_artifact_jars, shortest_jar};
pub use manifest::{BomDocument, declared_artifacts, graph_from_bom, load_graph, parse_bom};
pub use metadata::load_metadata;

/// Fuzz-friendly API for testing parsing robustness without filesystem access.
/// These functions are designed to never panic on any input.
pub mod fuzz {
    use bomaudit_types::ArtifactId;

    /// Parse arbitrary text as a manifest and build its graph.
    ///
    /// Returns `Ok(node_count)` on valid JSON, `Err(...)` otherwise. **Never panics** on any input.
    pub fn parse_manifest(text: &str) -> anyhow::Result<usize> {
        let doc = super::manifest::parse_bom(text)?;
        let graph = super::manifest::graph_from_bom(&doc);
        let _ = graph.direct_dependencies();
        let _ = graph.second_level_nodes();
        let _ = super::manifest::declared_artifacts(&doc);
        Ok(graph.node_count())
    }

    /// Parse arbitrary text as a package URL. **Never panics** on any input.
    pub fn parse_purl(text: &str) -> anyhow::Result<ArtifactId> {
        Ok(ArtifactId::from_purl(text)?)
    }

    /// Parse arbitrary text as analyzer metadata. **Never panics** on any input.
    pub fn parse_metadata(text: &str) -> anyhow::Result<usize> {
        let meta: bomaudit_domain::model::ArtifactMetadata = serde_json::from_str(text)?;
        Ok(meta.usage_set(bomaudit_domain::DEFAULT_SKIP_PREFIXES).len())
    }
}
