use bomaudit_types::ArtifactId;
use petgraph::Direction;
use petgraph::graph::{DiGraph, NodeIndex};
use serde::Deserialize;
use serde_json::{Map, Value};
use std::collections::{BTreeMap, BTreeSet};

/// Declared "depends on" edges of one manifest.
///
/// Nodes are raw manifest references (package URLs). Node indices follow first appearance in the
/// manifest, and every listing below is returned in that order so output stays deterministic.
#[derive(Clone, Debug, Default)]
pub struct DependencyGraph {
    graph: DiGraph<String, ()>,
    node_index: BTreeMap<String, NodeIndex>,
}

impl DependencyGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from `(ref, dependsOn)` entries.
    ///
    /// Entries without dependencies still add their node. Repeated edges collapse into one.
    pub fn from_entries<I, R, D>(entries: I) -> Self
    where
        I: IntoIterator<Item = (R, Vec<D>)>,
        R: AsRef<str>,
        D: AsRef<str>,
    {
        let mut graph = Self::new();
        for (reference, depends_on) in entries {
            let from = graph.ensure_node(reference.as_ref());
            for dep in depends_on {
                let to = graph.ensure_node(dep.as_ref());
                graph.graph.update_edge(from, to, ());
            }
        }
        graph
    }

    pub fn ensure_node(&mut self, reference: &str) -> NodeIndex {
        if let Some(&idx) = self.node_index.get(reference) {
            return idx;
        }
        let idx = self.graph.add_node(reference.to_string());
        self.node_index.insert(reference.to_string(), idx);
        idx
    }

    pub fn add_edge(&mut self, from: &str, to: &str) {
        let a = self.ensure_node(from);
        let b = self.ensure_node(to);
        self.graph.update_edge(a, b, ());
    }

    pub fn is_empty(&self) -> bool {
        self.graph.node_count() == 0
    }

    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    pub fn contains(&self, reference: &str) -> bool {
        self.node_index.contains_key(reference)
    }

    pub fn nodes(&self) -> Vec<&str> {
        self.graph
            .node_indices()
            .map(|idx| self.graph[idx].as_str())
            .collect()
    }

    pub fn in_degree(&self, reference: &str) -> usize {
        self.node_index
            .get(reference)
            .map(|&idx| {
                self.graph
                    .neighbors_directed(idx, Direction::Incoming)
                    .count()
            })
            .unwrap_or(0)
    }

    pub fn parents(&self, reference: &str) -> Vec<&str> {
        self.neighbors(reference, Direction::Incoming)
    }

    pub fn successors(&self, reference: &str) -> Vec<&str> {
        self.neighbors(reference, Direction::Outgoing)
    }

    fn neighbors(&self, reference: &str, direction: Direction) -> Vec<&str> {
        let Some(&idx) = self.node_index.get(reference) else {
            return Vec::new();
        };
        // petgraph yields neighbors newest-edge first; restore manifest order.
        let mut found: Vec<NodeIndex> = self.graph.neighbors_directed(idx, direction).collect();
        found.sort();
        found.dedup();
        found
            .into_iter()
            .map(|n| self.graph[n].as_str())
            .collect()
    }

    /// Every node with in-degree zero.
    pub fn roots(&self) -> Vec<&str> {
        self.graph
            .node_indices()
            .filter(|&idx| {
                self.graph
                    .neighbors_directed(idx, Direction::Incoming)
                    .next()
                    .is_none()
            })
            .map(|idx| self.graph[idx].as_str())
            .collect()
    }

    /// The unique in-degree-zero node, or `None` when there are zero or several.
    pub fn root(&self) -> Option<&str> {
        match self.roots().as_slice() {
            [only] => Some(*only),
            _ => None,
        }
    }

    /// Children of the root; empty without a unique root.
    pub fn direct_dependencies(&self) -> Vec<&str> {
        match self.root() {
            Some(root) => self.successors(root),
            None => Vec::new(),
        }
    }

    /// Children of the direct dependencies, deduplicated in first-seen order.
    pub fn second_level_nodes(&self) -> Vec<&str> {
        let mut seen = BTreeSet::new();
        let mut out = Vec::new();
        for direct in self.direct_dependencies() {
            for child in self.successors(direct) {
                if seen.insert(child) {
                    out.push(child);
                }
            }
        }
        out
    }

    /// Nested `{ node: { child: { ... } } }` object starting at the root.
    ///
    /// A node already on the current path is emitted as an empty object, so cycles terminate.
    /// Without a unique root every in-degree-zero node becomes a top-level key.
    pub fn nested_tree(&self) -> Value {
        let mut top = Map::new();
        let starts = match self.root() {
            Some(root) => vec![root],
            None => self.roots(),
        };
        for start in starts {
            let mut path = Vec::new();
            top.insert(start.to_string(), self.subtree(start, &mut path));
        }
        Value::Object(top)
    }

    fn subtree<'a>(&'a self, node: &'a str, path: &mut Vec<&'a str>) -> Value {
        if path.contains(&node) {
            return Value::Object(Map::new());
        }
        path.push(node);
        let mut children = Map::new();
        for child in self.successors(node) {
            children.insert(child.to_string(), self.subtree(child, path));
        }
        path.pop();
        Value::Object(children)
    }
}

/// Provider data for one artifact.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ProviderEntry {
    /// Metadata was collected; the set may legitimately be empty.
    Known(BTreeSet<String>),
    /// The artifact was seen but its metadata could not be collected.
    Unknown,
}

/// Artifact → provided packages, loaded once per run and shared read-only.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ProviderDirectory {
    entries: BTreeMap<ArtifactId, ProviderEntry>,
}

impl ProviderDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, id: ArtifactId, entry: ProviderEntry) {
        self.entries.insert(id, entry);
    }

    pub fn insert_known<I, S>(&mut self, id: ArtifactId, packages: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.entries.insert(
            id,
            ProviderEntry::Known(packages.into_iter().map(Into::into).collect()),
        );
    }

    pub fn get(&self, id: &ArtifactId) -> Option<&ProviderEntry> {
        self.entries.get(id)
    }

    /// Collected packages of `id`. `None` for absent and `Unknown` entries alike.
    pub fn known(&self, id: &ArtifactId) -> Option<&BTreeSet<String>> {
        match self.entries.get(id) {
            Some(ProviderEntry::Known(packages)) => Some(packages),
            _ => None,
        }
    }

    pub fn is_collected(&self, id: &ArtifactId) -> bool {
        self.known(id).is_some()
    }

    pub fn contains_key(&self, id: &ArtifactId) -> bool {
        self.entries.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&ArtifactId, &ProviderEntry)> {
        self.entries.iter()
    }

    /// Union of the collected packages of `ids`.
    pub fn provided_packages<'a, I>(&self, ids: I) -> BTreeSet<String>
    where
        I: IntoIterator<Item = &'a ArtifactId>,
    {
        ids.into_iter()
            .filter_map(|id| self.known(id))
            .flat_map(|packages| packages.iter().cloned())
            .collect()
    }

    /// Package → artifacts providing it.
    pub fn inverse(&self) -> BTreeMap<String, BTreeSet<ArtifactId>> {
        let mut out: BTreeMap<String, BTreeSet<ArtifactId>> = BTreeMap::new();
        for (id, entry) in &self.entries {
            if let ProviderEntry::Known(packages) = entry {
                for package in packages {
                    out.entry(package.clone()).or_default().insert(id.clone());
                }
            }
        }
        out
    }
}

/// Per-package usage as reported by the metadata analyzer.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize, serde::Serialize)]
pub struct PackageUsage {
    #[serde(default, deserialize_with = "null_as_empty")]
    pub uses: Vec<String>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub reflected: Vec<String>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub unresolved_dynamic: Vec<String>,
}

/// `{"packages": {<name>: {"uses": [..], "reflected": [..], "unresolved_dynamic": [..]}}}`
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize, serde::Serialize)]
pub struct ArtifactMetadata {
    #[serde(default, deserialize_with = "null_as_default")]
    pub packages: BTreeMap<String, PackageUsage>,
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    Option::<Vec<String>>::deserialize(deserializer).map(Option::unwrap_or_default)
}

fn null_as_default<'de, D>(deserializer: D) -> Result<BTreeMap<String, PackageUsage>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    Option::<BTreeMap<String, PackageUsage>>::deserialize(deserializer)
        .map(Option::unwrap_or_default)
}

impl ArtifactMetadata {
    /// Packages exported by the artifact. The analyzer uses an empty key for the default package.
    pub fn provided_packages(&self) -> BTreeSet<String> {
        self.packages
            .keys()
            .filter(|k| !k.is_empty())
            .cloned()
            .collect()
    }

    /// External packages referenced statically or reflectively.
    pub fn usage_set<S: AsRef<str>>(&self, skip_prefixes: &[S]) -> UsageSet {
        let internal = self.provided_packages();
        let used = self
            .packages
            .values()
            .flat_map(|p| p.uses.iter().chain(p.reflected.iter()))
            .filter(|name| !name.is_empty())
            .filter(|name| !internal.contains(name.as_str()))
            .filter(|name| {
                !skip_prefixes
                    .iter()
                    .any(|prefix| name.starts_with(prefix.as_ref()))
            })
            .cloned()
            .collect();
        UsageSet(used)
    }

    pub fn unresolved_dynamic(&self) -> UnresolvedSet {
        UnresolvedSet(
            self.packages
                .values()
                .flat_map(|p| p.unresolved_dynamic.iter())
                .filter(|name| !name.is_empty())
                .cloned()
                .collect(),
        )
    }
}

/// External packages one artifact references, sorted.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct UsageSet(pub BTreeSet<String>);

impl UsageSet {
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn contains(&self, package: &str) -> bool {
        self.0.contains(package)
    }

    pub fn iter(&self) -> impl Iterator<Item = &String> {
        self.0.iter()
    }
}

/// References the analyzer could not resolve statically.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct UnresolvedSet(pub BTreeSet<String>);

impl UnresolvedSet {
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn to_vec(&self) -> Vec<String> {
        self.0.iter().cloned().collect()
    }
}
