use super::{AuditContext, utils};
use crate::engine::Detection;
use bomaudit_types::{Finding, TransitiveEdgeRecord};

pub fn run(ctx: &AuditContext<'_>, out: &mut Detection) {
    for node in &ctx.second {
        let usage = ctx.usage_of(&node.id);
        if usage.is_none() {
            out.note_metadata_unavailable(node.id.clone());
        }

        for child in ctx.children(node) {
            let Some(provided) = ctx.input.directory.known(&child.id) else {
                out.note_uncollected_child(&node.id, child.id.clone());
                continue;
            };
            let Some(usage) = usage.as_ref() else {
                continue;
            };
            if usage.is_empty() || provided.is_empty() || utils::overlaps(usage, provided) {
                continue;
            }

            let record = TransitiveEdgeRecord {
                from: node.id.clone(),
                to: child.id.clone(),
                provided_packages: utils::to_sorted_vec(provided),
            };
            // Several parents reach this child; no single edge can carry the blame.
            if ctx.input.graph.in_degree(child.reference) <= 1 {
                out.findings.push(Finding::IncorrectTransitive(record));
            } else {
                out.findings
                    .push(Finding::IncorrectTransitiveSharedParent(record));
            }
        }
    }
}
