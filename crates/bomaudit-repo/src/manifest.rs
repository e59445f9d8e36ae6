use anyhow::Context;
use bomaudit_domain::model::DependencyGraph;
use bomaudit_types::ArtifactId;
use camino::Utf8Path;
use serde::Deserialize;
use std::collections::BTreeSet;
use tracing::{debug, warn};

/// The parts of a CycloneDX document the audit reads.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct BomDocument {
    #[serde(default)]
    pub components: Option<Vec<BomComponent>>,
    #[serde(default)]
    pub dependencies: Option<Vec<BomDependency>>,
}

#[derive(Clone, Debug, Default, Deserialize)]
pub struct BomComponent {
    #[serde(default)]
    pub purl: Option<String>,
}

#[derive(Clone, Debug, Deserialize)]
pub struct BomDependency {
    #[serde(rename = "ref")]
    pub reference: String,
    #[serde(rename = "dependsOn", default)]
    pub depends_on: Option<Vec<String>>,
}

pub fn parse_bom(text: &str) -> anyhow::Result<BomDocument> {
    serde_json::from_str(text).context("parse manifest JSON")
}

pub fn load_bom(path: &Utf8Path) -> anyhow::Result<BomDocument> {
    let text = std::fs::read_to_string(path).with_context(|| format!("read {path}"))?;
    parse_bom(&text).with_context(|| format!("parse {path}"))
}

/// Declared edges as a graph. A missing or null `dependencies` list gives an empty graph.
pub fn graph_from_bom(doc: &BomDocument) -> DependencyGraph {
    let Some(dependencies) = doc.dependencies.as_ref() else {
        return DependencyGraph::new();
    };
    DependencyGraph::from_entries(dependencies.iter().map(|d| {
        (
            d.reference.as_str(),
            d.depends_on.clone().unwrap_or_default(),
        )
    }))
}

/// Load the manifest graph, degrading to an empty graph on any failure.
pub fn load_graph(path: &Utf8Path) -> DependencyGraph {
    match load_bom(path) {
        Ok(doc) => {
            if doc.dependencies.is_none() {
                warn!(manifest = %path, "manifest has no dependencies list; nothing to analyze");
            }
            let graph = graph_from_bom(&doc);
            debug!(manifest = %path, nodes = graph.node_count(), "loaded dependency graph");
            graph
        }
        Err(err) => {
            warn!(manifest = %path, error = %format!("{err:#}"), "unusable manifest; treating as empty");
            DependencyGraph::new()
        }
    }
}

/// Sorted distinct artifacts of every component and `dependsOn` entry: the download list.
pub fn declared_artifacts(doc: &BomDocument) -> Vec<ArtifactId> {
    let component_purls = doc
        .components
        .iter()
        .flatten()
        .filter_map(|c| c.purl.as_deref());
    let dependency_purls = doc
        .dependencies
        .iter()
        .flatten()
        .flat_map(|d| d.depends_on.iter().flatten())
        .map(String::as_str);

    let mut out = BTreeSet::new();
    for purl in component_purls.chain(dependency_purls) {
        match ArtifactId::from_purl(purl) {
            Ok(id) => {
                out.insert(id);
            }
            Err(err) => debug!(purl, error = %err, "skipping unparseable package url"),
        }
    }
    out.into_iter().collect()
}
