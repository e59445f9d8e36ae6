use super::Node;
use crate::model::UsageSet;
use bomaudit_types::ArtifactId;
use bomaudit_types::artifact::KEY_SEPARATOR;
use std::collections::BTreeSet;

pub fn resolve(reference: &str) -> Option<Node<'_>> {
    ArtifactId::from_purl(reference)
        .ok()
        .map(|id| Node { reference, id })
}

/// Unparseable references are dropped; they can never match a directory entry.
pub fn resolve_all(references: Vec<&str>) -> Vec<Node<'_>> {
    references.into_iter().filter_map(resolve).collect()
}

/// Segment before the first key separator; whole name for plain package names.
pub fn namespace_head(name: &str) -> &str {
    name.split(KEY_SEPARATOR).next().unwrap_or(name)
}

/// True when any used identifier shares its leading segment with a provided one.
pub fn overlaps(usage: &UsageSet, provided: &BTreeSet<String>) -> bool {
    let provided_heads: BTreeSet<&str> = provided.iter().map(|p| namespace_head(p)).collect();
    usage
        .iter()
        .any(|u| provided_heads.contains(namespace_head(u)))
}

/// Sorted list form used in finding records.
pub fn to_sorted_vec(packages: &BTreeSet<String>) -> Vec<String> {
    packages.iter().cloned().collect()
}
