//! Bulk metadata generation with the external analyzer.
//!
//! Tasks are independent: each runs `<command> [args..] <jar>` and stores stdout as the
//! artifact's `meta_info.json`. A task whose output already exists does nothing.

use anyhow::Context;
use bomaudit_repo::{MetaDbLayout, discover_artifact_jars};
use bomaudit_settings::TaggerSettings;
use bomaudit_types::ArtifactId;
use camino::{Utf8Path, Utf8PathBuf};
use rayon::prelude::*;
use std::process::Command;
use tracing::{debug, info, warn};

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TagJob {
    pub id: ArtifactId,
    pub jar: Utf8PathBuf,
    pub output: Utf8PathBuf,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TagStats {
    pub tagged: u32,
    pub already_tagged: u32,
    pub failed: u32,
}

enum Outcome {
    Tagged,
    AlreadyTagged,
    Failed,
}

/// One job per downloaded artifact, using its shortest jar.
pub fn asset_jobs(layout: &MetaDbLayout) -> anyhow::Result<Vec<TagJob>> {
    let jars = discover_artifact_jars(&layout.assets_root).context("discover downloaded jars")?;
    Ok(jars
        .into_iter()
        .map(|(id, jar)| TagJob {
            output: layout.metadata_path(&id),
            id,
            jar,
        })
        .collect())
}

pub fn root_job(layout: &MetaDbLayout, root: ArtifactId, jar: &Utf8Path) -> TagJob {
    TagJob {
        output: layout.metadata_path(&root),
        id: root,
        jar: jar.to_path_buf(),
    }
}

pub fn tag_all(jobs: &[TagJob], tagger: &TaggerSettings) -> TagStats {
    let outcomes: Vec<Outcome> = jobs.par_iter().map(|job| run_job(job, tagger)).collect();

    let mut stats = TagStats::default();
    for outcome in outcomes {
        match outcome {
            Outcome::Tagged => stats.tagged += 1,
            Outcome::AlreadyTagged => stats.already_tagged += 1,
            Outcome::Failed => stats.failed += 1,
        }
    }
    info!(
        tagged = stats.tagged,
        already_tagged = stats.already_tagged,
        failed = stats.failed,
        "tagging finished"
    );
    stats
}

fn run_job(job: &TagJob, tagger: &TaggerSettings) -> Outcome {
    if job.output.exists() {
        debug!(artifact = %job.id, "metadata already present");
        return Outcome::AlreadyTagged;
    }
    match invoke(job, tagger) {
        Ok(()) => {
            debug!(artifact = %job.id, output = %job.output, "tagged");
            Outcome::Tagged
        }
        Err(err) => {
            warn!(
                artifact = %job.id,
                jar = %job.jar,
                error = %format!("{err:#}"),
                "tagging failed"
            );
            Outcome::Failed
        }
    }
}

fn invoke(job: &TagJob, tagger: &TaggerSettings) -> anyhow::Result<()> {
    let output = Command::new(&tagger.command)
        .args(&tagger.args)
        .arg(job.jar.as_std_path())
        .output()
        .with_context(|| format!("spawn {}", tagger.command))?;
    if !output.status.success() {
        anyhow::bail!(
            "{} exited with {}: {}",
            tagger.command,
            output.status,
            String::from_utf8_lossy(&output.stderr).trim()
        );
    }

    if let Some(parent) = job.output.parent() {
        std::fs::create_dir_all(parent).with_context(|| format!("create {parent}"))?;
    }
    let partial = Utf8PathBuf::from(format!("{}.partial", job.output));
    std::fs::write(&partial, &output.stdout).with_context(|| format!("write {partial}"))?;
    std::fs::rename(&partial, &job.output).with_context(|| format!("rename to {}", job.output))
}
