//! Property-based tests for the domain crate.
//!
//! These tests use proptest to verify invariants around:
//! - root uniqueness gating all analysis
//! - `layer` findings being a superset of `global` findings
//! - shared-parent separation for transitive findings
//! - validation only narrowing the finding set

use crate::engine::detect;
use crate::input::AuditInput;
use crate::model::{DependencyGraph, ProviderDirectory, ProviderEntry};
use crate::policy::{AuditPolicy, SearchScope};
use crate::test_support::{FakeProbe, id, metadata, purl};
use crate::validate::{ProbeTarget, validate};
use bomaudit_types::{Finding, Verdict};
use proptest::prelude::*;
use std::collections::{BTreeMap, BTreeSet};

const NODES: usize = 6;
const POOL: &[&str] = &["p0", "p1", "p2", "x.a", "x.b", "java.lang"];

fn name(i: usize) -> String {
    format!("n{i}")
}

// ============================================================================
// Strategies
// ============================================================================

/// Forward edges only, optionally hanging every orphan below `n0` so most graphs have one root.
fn arb_graph() -> impl Strategy<Value = DependencyGraph> {
    (
        prop::collection::vec((0..NODES, 0..NODES), 0..14),
        any::<bool>(),
    )
        .prop_map(|(pairs, single_root)| {
            let mut children: BTreeMap<usize, BTreeSet<usize>> = BTreeMap::new();
            for (a, b) in pairs {
                let (lo, hi) = if a < b { (a, b) } else { (b, a) };
                if lo != hi {
                    children.entry(lo).or_default().insert(hi);
                }
            }
            if single_root {
                let targets: BTreeSet<usize> = children.values().flatten().copied().collect();
                for orphan in 1..NODES {
                    if !targets.contains(&orphan) {
                        children.entry(0).or_default().insert(orphan);
                    }
                }
            }
            let entries = (0..NODES).map(|i| {
                let deps: Vec<String> = children
                    .get(&i)
                    .map(|c| c.iter().map(|j| purl(&name(*j))).collect())
                    .unwrap_or_default();
                (purl(&name(i)), deps)
            });
            DependencyGraph::from_entries(entries)
        })
}

fn arb_packages() -> impl Strategy<Value = Vec<&'static str>> {
    prop::sample::subsequence(POOL, 0..=POOL.len())
}

/// 0 = absent, 1 = unknown, 2 = known.
fn arb_directory() -> impl Strategy<Value = ProviderDirectory> {
    prop::collection::vec((0u8..3, arb_packages()), NODES).prop_map(|entries| {
        let mut dir = ProviderDirectory::new();
        for (i, (state, packages)) in entries.into_iter().enumerate() {
            match state {
                1 => dir.insert(id(&name(i)), ProviderEntry::Unknown),
                2 => dir.insert_known(id(&name(i)), packages),
                _ => {}
            }
        }
        dir
    })
}

fn arb_input() -> impl Strategy<Value = AuditInput> {
    (
        arb_graph(),
        arb_directory(),
        prop::collection::vec(prop::option::of(arb_packages()), NODES),
    )
        .prop_map(|(graph, directory, usages)| {
            let mut root_metadata = None;
            let mut per_node = BTreeMap::new();
            let root = graph.root().map(str::to_string);
            for (i, usage) in usages.into_iter().enumerate() {
                let Some(usage) = usage else { continue };
                let own = format!("own.{i}");
                let meta = metadata(&[(own.as_str(), usage.as_slice())]);
                if root.as_deref() == Some(purl(&name(i)).as_str()) {
                    root_metadata = Some(meta.clone());
                }
                per_node.insert(id(&name(i)), meta);
            }
            AuditInput {
                graph,
                directory,
                root_metadata,
                metadata: per_node,
            }
        })
}

fn findings(input: &AuditInput, scope: SearchScope) -> BTreeSet<Finding> {
    detect(input, &AuditPolicy::with_scope(scope))
        .findings
        .into_iter()
        .collect()
}

// ============================================================================
// Properties
// ============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(256))]

    #[test]
    fn no_unique_root_means_no_findings(input in arb_input()) {
        if input.graph.root().is_none() {
            for scope in [SearchScope::Global, SearchScope::Layer] {
                let det = detect(&input, &AuditPolicy::with_scope(scope));
                prop_assert!(det.findings.is_empty());
                prop_assert!(det.uncollected.is_empty());
            }
        }
    }

    #[test]
    fn layer_findings_are_a_superset_of_global(input in arb_input()) {
        let global = findings(&input, SearchScope::Global);
        let layer = findings(&input, SearchScope::Layer);
        prop_assert!(
            global.is_subset(&layer),
            "global-only findings: {:?}",
            global.difference(&layer).collect::<Vec<_>>()
        );
    }

    #[test]
    fn multi_parent_nodes_never_land_in_single_parent_logs(input in arb_input()) {
        for scope in [SearchScope::Global, SearchScope::Layer] {
            let det = detect(&input, &AuditPolicy::with_scope(scope));
            for finding in &det.findings {
                match finding {
                    Finding::IncorrectTransitive(r) => {
                        let to = purl(&r.to.artifact);
                        prop_assert!(input.graph.in_degree(&to) <= 1);
                    }
                    Finding::MissingTransitive(r) => {
                        let node = purl(&r.node.artifact);
                        prop_assert!(input.graph.in_degree(&node) <= 1);
                    }
                    _ => {}
                }
            }
        }
    }

    #[test]
    fn detection_is_deterministic(input in arb_input()) {
        let policy = AuditPolicy::with_scope(SearchScope::Layer);
        prop_assert_eq!(detect(&input, &policy), detect(&input, &policy));
    }

    #[test]
    fn validation_only_narrows(
        input in arb_input(),
        archive in arb_packages(),
        broken in prop::option::of(0..NODES),
    ) {
        let det = detect(&input, &AuditPolicy::with_scope(SearchScope::Layer));
        let mut probe = FakeProbe::default().with(ProbeTarget::Root, &archive);
        for i in 0..NODES {
            probe = probe.with(ProbeTarget::Dependency(id(&name(i))), &archive);
        }
        if let Some(i) = broken {
            probe = probe.failing(ProbeTarget::Dependency(id(&name(i))));
        }

        let validation = validate(&det, &mut probe);
        prop_assert_eq!(validation.checked.len() + validation.skipped.len(), det.findings.len());
        for kept in validation.retained() {
            prop_assert!(det.findings.contains(&kept.finding));
            prop_assert_ne!(kept.verdict, Verdict::Refuted);
        }
    }
}
