use crate::input::AuditInput;
use crate::model::{ArtifactMetadata, DependencyGraph, PackageUsage, ProviderDirectory};
use crate::validate::{ArchiveProbe, ProbeError, ProbeTarget};
use bomaudit_types::ArtifactId;
use std::collections::{BTreeMap, BTreeSet};

pub fn purl(name: &str) -> String {
    format!("pkg:maven/org.example/{name}@1.0?type=jar")
}

pub fn id(name: &str) -> ArtifactId {
    ArtifactId::new("org.example", name, "1.0")
}

/// `(node, children)` pairs over short names.
pub fn graph(edges: &[(&str, &[&str])]) -> DependencyGraph {
    DependencyGraph::from_entries(
        edges
            .iter()
            .map(|(from, to)| (purl(from), to.iter().map(|t| purl(t)).collect::<Vec<_>>())),
    )
}

/// `(artifact, provided packages)` pairs over short names.
pub fn directory(entries: &[(&str, &[&str])]) -> ProviderDirectory {
    let mut dir = ProviderDirectory::new();
    for (name, packages) in entries {
        dir.insert_known(id(name), packages.iter().copied());
    }
    dir
}

/// `(own package, used packages)` pairs.
pub fn metadata(packages: &[(&str, &[&str])]) -> ArtifactMetadata {
    ArtifactMetadata {
        packages: packages
            .iter()
            .map(|(name, uses)| {
                (
                    name.to_string(),
                    PackageUsage {
                        uses: uses.iter().map(|u| u.to_string()).collect(),
                        ..PackageUsage::default()
                    },
                )
            })
            .collect(),
    }
}

pub fn input(
    graph: DependencyGraph,
    directory: ProviderDirectory,
    root_metadata: Option<ArtifactMetadata>,
) -> AuditInput {
    AuditInput {
        graph,
        directory,
        root_metadata,
        metadata: BTreeMap::new(),
    }
}

/// In-memory archive contents keyed by probe target.
#[derive(Default)]
pub struct FakeProbe {
    contents: BTreeMap<ProbeTarget, BTreeSet<String>>,
    failing: BTreeSet<ProbeTarget>,
    pub calls: Vec<(ProbeTarget, String)>,
}

impl FakeProbe {
    pub fn with(mut self, target: ProbeTarget, references: &[&str]) -> Self {
        self.contents
            .entry(target)
            .or_default()
            .extend(references.iter().map(|r| r.to_string()));
        self
    }

    pub fn failing(mut self, target: ProbeTarget) -> Self {
        self.failing.insert(target);
        self
    }
}

impl ArchiveProbe for FakeProbe {
    /// Each known reference lives in one class named after it.
    fn referencing_classes(
        &mut self,
        target: &ProbeTarget,
        reference: &str,
    ) -> Result<Vec<String>, ProbeError> {
        self.calls.push((target.clone(), reference.to_string()));
        if self.failing.contains(target) {
            let name = match target {
                ProbeTarget::Root => "root".to_string(),
                ProbeTarget::Dependency(id) => id.to_string(),
            };
            return Err(ProbeError::ArchiveMissing(name));
        }
        let known = self
            .contents
            .get(target)
            .is_some_and(|refs| refs.contains(reference));
        Ok(if known {
            vec![format!("{}.class", reference.replace('.', "/"))]
        } else {
            Vec::new()
        })
    }
}
