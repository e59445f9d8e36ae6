use crate::checks::{self, AuditContext};
use crate::input::AuditInput;
use crate::policy::{AuditPolicy, SearchScope};
use bomaudit_types::{ArtifactId, Finding, UncollectedLog, UnresolvedLog};

/// Detector output for one run.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Detection {
    pub scope: SearchScope,
    pub root: Option<ArtifactId>,
    pub findings: Vec<Finding>,
    pub uncollected: UncollectedLog,
    pub unresolved: UnresolvedLog,
}

impl Detection {
    pub fn new(scope: SearchScope, root: Option<ArtifactId>) -> Self {
        Self {
            scope,
            root,
            findings: Vec::new(),
            uncollected: UncollectedLog::default(),
            unresolved: UnresolvedLog::default(),
        }
    }

    pub(crate) fn note_uncollected_direct(&mut self, id: ArtifactId) {
        if !self.uncollected.first_level.contains(&id) {
            self.uncollected.first_level.push(id);
        }
    }

    pub(crate) fn note_uncollected_child(&mut self, parent: &ArtifactId, child: ArtifactId) {
        let children = self
            .uncollected
            .second_level
            .entry(parent.clone())
            .or_default();
        if !children.contains(&child) {
            children.push(child);
        }
    }

    pub(crate) fn note_metadata_unavailable(&mut self, id: ArtifactId) {
        if !self.uncollected.metadata_unavailable.contains(&id) {
            self.uncollected.metadata_unavailable.push(id);
        }
    }

    /// Providers of `consumer`'s dependencies whose data was never collected.
    pub fn uncollected_for(&self, consumer: &ArtifactId) -> &[ArtifactId] {
        if self.root.as_ref() == Some(consumer) {
            return &self.uncollected.first_level;
        }
        self.uncollected
            .second_level
            .get(consumer)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// References `consumer` makes that the analyzer could not resolve.
    pub fn unresolved_for(&self, consumer: &ArtifactId) -> &[String] {
        if self.root.as_ref() == Some(consumer) {
            return &self.unresolved.first_level;
        }
        self.unresolved
            .second_level
            .get(consumer)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }
}

/// Run the four detection procedures.
///
/// Manifests without a unique root produce no findings; missing metadata is logged, never raised.
pub fn detect(input: &AuditInput, policy: &AuditPolicy) -> Detection {
    let ctx = AuditContext::new(input, policy);
    let mut out = Detection::new(policy.scope, ctx.root.as_ref().map(|r| r.id.clone()));

    checks::run_all(&ctx, &mut out);

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{directory, graph, id, input, metadata, purl};
    use bomaudit_types::{Finding, MissingDirectRecord};

    #[test]
    fn ambiguous_root_yields_nothing() {
        let g = graph(&[("r", &["a"]), ("other", &["a"])]);
        let inp = input(g, directory(&[]), Some(metadata(&[("r.pkg", &["p"])])));
        for scope in [SearchScope::Global, SearchScope::Layer] {
            let det = detect(&inp, &AuditPolicy::with_scope(scope));
            assert!(det.findings.is_empty());
            assert!(det.root.is_none());
            assert!(det.uncollected.is_empty());
        }
    }

    #[test]
    fn empty_graph_yields_nothing() {
        let inp = input(graph(&[]), directory(&[]), None);
        let det = detect(&inp, &AuditPolicy::default());
        assert!(det.findings.is_empty());
    }

    #[test]
    fn missing_root_metadata_still_tracks_uncollected_direct() {
        let g = graph(&[("r", &["a", "b"])]);
        let inp = input(g, directory(&[("a", &["x"])]), None);
        let det = detect(&inp, &AuditPolicy::default());
        assert!(det.findings.is_empty());
        assert_eq!(det.uncollected.first_level, vec![id("b")]);
    }

    #[test]
    fn uncollected_and_unresolved_lookup_by_consumer() {
        let g = graph(&[("r", &["a"]), ("a", &["s"]), ("s", &["t"])]);
        let mut inp = input(g, directory(&[]), Some(metadata(&[("r.pkg", &["p"])])));
        let mut s_meta = metadata(&[("s.pkg", &["q"])]);
        if let Some(usage) = s_meta.packages.get_mut("s.pkg") {
            usage.unresolved_dynamic = vec!["dyn.Target".to_string()];
        }
        inp.metadata.insert(id("s"), s_meta);

        let det = detect(&inp, &AuditPolicy::default());
        assert_eq!(det.uncollected_for(&id("r")), &[id("a")]);
        assert_eq!(det.uncollected_for(&id("s")), &[id("t")]);
        assert_eq!(det.unresolved_for(&id("s")), &["dyn.Target".to_string()]);
        assert!(det.unresolved_for(&id("r")).is_empty());
        assert!(det.findings.contains(&Finding::MissingDirect(MissingDirectRecord {
            artifact: id("r"),
            usage: "p".to_string(),
        })));
        assert_eq!(inp.graph.root(), Some(purl("r").as_str()));
    }
}
