use super::{AuditContext, Node};
use crate::engine::Detection;
use crate::policy::SearchScope;
use bomaudit_types::{Finding, MissingTransitiveRecord};
use std::collections::BTreeSet;

pub fn run(ctx: &AuditContext<'_>, out: &mut Detection) {
    let directory = &ctx.input.directory;
    let global = match ctx.policy.scope {
        SearchScope::Global => Some(directory.provided_packages(&ctx.all)),
        SearchScope::Layer => None,
    };
    // Packages provided by each second-level node together with its children.
    let subtrees: Vec<BTreeSet<String>> = ctx
        .second
        .iter()
        .map(|node| subtree_packages(ctx, node))
        .collect();

    for (position, node) in ctx.second.iter().enumerate() {
        let Some(meta) = ctx.input.metadata.get(&node.id) else {
            out.note_metadata_unavailable(node.id.clone());
            continue;
        };

        let unresolved = meta.unresolved_dynamic();
        if !unresolved.is_empty() {
            out.unresolved
                .second_level
                .insert(node.id.clone(), unresolved.to_vec());
        }

        let usage = meta.usage_set(&ctx.policy.skip_prefixes);
        let layer;
        let provided = match &global {
            Some(all) => all,
            None => {
                let children = ctx.children(node);
                layer = directory.provided_packages(children.iter().map(|c| &c.id));
                &layer
            }
        };
        // Every incoming edge counts, including ones from other second-level nodes.
        let many_parents = ctx.input.graph.in_degree(node.reference) > 1;

        for package in usage.iter() {
            if provided.contains(package) {
                continue;
            }
            let in_sibling = subtrees
                .iter()
                .enumerate()
                .any(|(other, packages)| other != position && packages.contains(package));
            let record = MissingTransitiveRecord {
                node: node.id.clone(),
                usage: package.clone(),
            };
            if many_parents || in_sibling {
                out.findings
                    .push(Finding::MissingTransitiveSharedParent(record));
            } else {
                out.findings.push(Finding::MissingTransitive(record));
            }
        }
    }
}

fn subtree_packages(ctx: &AuditContext<'_>, node: &Node<'_>) -> BTreeSet<String> {
    let children = ctx.children(node);
    ctx.input
        .directory
        .provided_packages(std::iter::once(&node.id).chain(children.iter().map(|c| &c.id)))
}
