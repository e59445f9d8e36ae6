use super::{AuditContext, utils};
use crate::engine::Detection;
use bomaudit_types::{Finding, IncorrectDirectRecord};

pub fn run(ctx: &AuditContext<'_>, out: &mut Detection) {
    for dep in &ctx.direct {
        let Some(provided) = ctx.input.directory.known(&dep.id) else {
            out.note_uncollected_direct(dep.id.clone());
            continue;
        };
        let (Some(root), Some(usage)) = (&ctx.root, &ctx.root_usage) else {
            continue;
        };
        if usage.is_empty() || provided.is_empty() || utils::overlaps(usage, provided) {
            continue;
        }
        out.findings
            .push(Finding::IncorrectDirect(IncorrectDirectRecord {
                artifact: root.id.clone(),
                dependency: dep.id.clone(),
                provided_packages: utils::to_sorted_vec(provided),
            }));
    }
}
