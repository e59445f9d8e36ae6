use anyhow::Context;
use bomaudit_domain::model::ArtifactMetadata;
use camino::Utf8Path;
use tracing::warn;

pub fn read_metadata(path: &Utf8Path) -> anyhow::Result<ArtifactMetadata> {
    let text = std::fs::read_to_string(path).with_context(|| format!("read {path}"))?;
    serde_json::from_str(&text).with_context(|| format!("parse {path}"))
}

/// Analyzer metadata for one artifact, or `None` when missing or malformed.
pub fn load_metadata(path: &Utf8Path) -> Option<ArtifactMetadata> {
    if !path.exists() {
        return None;
    }
    match read_metadata(path) {
        Ok(meta) => Some(meta),
        Err(err) => {
            warn!(path = %path, error = %format!("{err:#}"), "skipping unreadable metadata");
            None
        }
    }
}
