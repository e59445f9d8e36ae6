//! The `check` use case: detect, validate, and write the audit outputs.

use crate::render::write_json;
use anyhow::Context;
use bomaudit_domain::{AuditInput, assemble, detect, validate};
use bomaudit_repo::{ArchiveEvidence, MetaDbLayout, ScratchWorkspace, directory, load_metadata};
use bomaudit_settings::ResolvedConfig;
use bomaudit_types::{AnalyzeLog, ArtifactId, ComplianceResult};
use camino::{Utf8Path, Utf8PathBuf};
use std::collections::BTreeMap;
use tracing::{debug, info, warn};

pub const ANALYZE_LOG_FILE: &str = "analyze_log.json";
pub const GRAPH_FILE: &str = "sbom_deps_graph.json";
pub const COMPLIANCE_FILE: &str = "compliance_result.json";
const WORKSPACE_DIR: &str = "workspace";
const UNROOTED_DIR: &str = "unrooted";

/// Input for the check use case.
#[derive(Clone, Debug)]
pub struct CheckInput<'a> {
    /// CycloneDX manifest of the audited artifact.
    pub sbom: &'a Utf8Path,
    /// The audited archive.
    pub jar: &'a Utf8Path,
    pub config: &'a ResolvedConfig,
    /// Defaults to [`default_out_dir`].
    pub out_dir: Option<&'a Utf8Path>,
    /// Analyzer output for the audited archive; defaults to the root's `meta_info.json` in the
    /// metadata database.
    pub root_metadata: Option<&'a Utf8Path>,
}

/// Output from the check use case.
#[derive(Clone, Debug)]
pub struct CheckOutput {
    pub out_dir: Utf8PathBuf,
    pub analyze_log: AnalyzeLog,
    pub compliance: ComplianceResult,
}

/// `audits_root/group/artifact/version` for a rooted manifest, otherwise
/// `audits_root/unrooted/<manifest stem>`.
pub fn default_out_dir(
    layout: &MetaDbLayout,
    root: Option<&ArtifactId>,
    sbom: &Utf8Path,
) -> Utf8PathBuf {
    match root {
        Some(root) => layout.audit_dir(root),
        None => layout
            .audits_root
            .join(UNROOTED_DIR)
            .join(sbom.file_stem().unwrap_or("manifest")),
    }
}

/// Run detection and validation for one manifest and archive, writing `analyze_log.json`,
/// `sbom_deps_graph.json` and `compliance_result.json` into the output directory.
pub fn run_check(input: CheckInput<'_>) -> anyhow::Result<CheckOutput> {
    let layout = MetaDbLayout::new(&input.config.metadb, &input.config.results);
    let policy = &input.config.policy;

    let directory = match directory::load_or_default(&layout.directory_path) {
        Ok(directory) => directory,
        Err(err) => {
            warn!(
                path = %layout.directory_path,
                error = %format!("{err:#}"),
                "unreadable provider directory; every dependency counts as uncollected"
            );
            Default::default()
        }
    };
    let graph = bomaudit_repo::load_graph(input.sbom);

    let mut audit = AuditInput {
        graph,
        directory,
        root_metadata: None,
        metadata: BTreeMap::new(),
    };
    let root = audit.root_artifact();
    if root.is_none() {
        warn!(
            manifest = %input.sbom,
            roots = audit.graph.roots().len(),
            "no unique root; no findings will be produced"
        );
    }

    let root_metadata_path = match (input.root_metadata, root.as_ref()) {
        (Some(path), _) => Some(path.to_path_buf()),
        (None, Some(root)) => Some(layout.metadata_path(root)),
        (None, None) => None,
    };
    audit.root_metadata = root_metadata_path.as_deref().and_then(load_metadata);

    for reference in audit.graph.second_level_nodes() {
        let Ok(id) = ArtifactId::from_purl(reference) else {
            debug!(reference, "second-level reference is not a package URL");
            continue;
        };
        let path = layout.metadata_path(&id);
        if !path.is_file() {
            debug!(artifact = %id, "no analyzer output");
            continue;
        }
        if let Some(meta) = load_metadata(&path) {
            audit.metadata.insert(id, meta);
        }
    }

    let detection = detect(&audit, policy);
    info!(
        scope = %policy.scope,
        findings = detection.findings.len(),
        uncollected = detection.uncollected.first_level.len(),
        "detection finished"
    );

    let out_dir = match input.out_dir {
        Some(dir) => dir.to_path_buf(),
        None => default_out_dir(&layout, root.as_ref(), input.sbom),
    };
    std::fs::create_dir_all(&out_dir).with_context(|| format!("create {out_dir}"))?;
    write_json(&out_dir.join(GRAPH_FILE), &audit.graph.nested_tree())?;

    let mut evidence = ArchiveEvidence::new(
        ScratchWorkspace::new(out_dir.join(WORKSPACE_DIR)),
        input.jar,
        layout.assets_root.clone(),
    );
    let validation = validate(&detection, &mut evidence);

    let report = assemble(&detection, &validation);
    write_json(&out_dir.join(ANALYZE_LOG_FILE), &report.analyze_log)?;
    write_json(&out_dir.join(COMPLIANCE_FILE), &report.compliance)?;

    let summary = &report.compliance.summary;
    info!(
        out_dir = %out_dir,
        detected = summary.detected,
        confirmed = summary.confirmed,
        undetermined = summary.undetermined,
        refuted = summary.refuted,
        skipped = summary.skipped,
        "compliance check finished"
    );

    Ok(CheckOutput {
        out_dir,
        analyze_log: report.analyze_log,
        compliance: report.compliance,
    })
}

/// Map a compliance result to exit code: 0 = nothing confirmed, 2 = confirmed findings.
pub fn exit_code_for(result: &ComplianceResult) -> i32 {
    if result.has_confirmed() { 2 } else { 0 }
}
