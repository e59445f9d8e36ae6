use super::AuditContext;
use crate::engine::Detection;
use crate::policy::SearchScope;
use bomaudit_types::{Finding, MissingDirectRecord};

pub fn run(ctx: &AuditContext<'_>, out: &mut Detection) {
    let Some(root) = &ctx.root else {
        return;
    };
    let (Some(usage), Some(meta)) = (&ctx.root_usage, ctx.input.root_metadata.as_ref()) else {
        out.note_metadata_unavailable(root.id.clone());
        return;
    };

    out.unresolved.first_level = meta.unresolved_dynamic().to_vec();

    let directory = &ctx.input.directory;
    let provided = match ctx.policy.scope {
        SearchScope::Global => directory.provided_packages(&ctx.all),
        SearchScope::Layer => directory.provided_packages(ctx.direct.iter().map(|n| &n.id)),
    };

    for package in usage.iter() {
        if provided.contains(package) {
            continue;
        }
        out.findings.push(Finding::MissingDirect(MissingDirectRecord {
            artifact: root.id.clone(),
            usage: package.clone(),
        }));
    }
}
