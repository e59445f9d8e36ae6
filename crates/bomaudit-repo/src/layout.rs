use anyhow::Context;
use bomaudit_types::ArtifactId;
use camino::{Utf8Path, Utf8PathBuf};
use std::path::PathBuf;
use walkdir::WalkDir;

pub const ASSETS_DIR: &str = "maven_asset_deps";
pub const DIRECTORY_FILE: &str = "metadata/jar_to_pkgs_dic.json";
pub const INVERSE_FILE: &str = "metadata/pkg_to_jar_dic.json";
pub const TAGS_DIR: &str = "jarpkgtags";
pub const AUDITS_DIR: &str = "audit_results";
pub const META_INFO_FILE: &str = "meta_info.json";

/// Where downloaded archives, analyzer output, the provider directory and audit results live.
///
/// Everything below the two roots is keyed by `group/artifact/version`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MetaDbLayout {
    pub assets_root: Utf8PathBuf,
    pub tags_root: Utf8PathBuf,
    pub directory_path: Utf8PathBuf,
    pub inverse_path: Utf8PathBuf,
    pub audits_root: Utf8PathBuf,
}

impl MetaDbLayout {
    pub fn new(metadb: &Utf8Path, results: &Utf8Path) -> Self {
        Self {
            assets_root: metadb.join(ASSETS_DIR),
            tags_root: results.join(TAGS_DIR),
            directory_path: metadb.join(DIRECTORY_FILE),
            inverse_path: metadb.join(INVERSE_FILE),
            audits_root: results.join(AUDITS_DIR),
        }
    }

    pub fn asset_dir(&self, id: &ArtifactId) -> Utf8PathBuf {
        self.assets_root.join(id.relative_dir())
    }

    pub fn metadata_path(&self, id: &ArtifactId) -> Utf8PathBuf {
        self.tags_root.join(id.relative_dir()).join(META_INFO_FILE)
    }

    pub fn audit_dir(&self, id: &ArtifactId) -> Utf8PathBuf {
        self.audits_root.join(id.relative_dir())
    }
}

/// The `*.jar` with the shortest file name in `dir` (ties broken by name).
///
/// Classifier jars (`-sources`, `-tests`, ...) always have longer names than the main jar.
pub fn shortest_jar(dir: &Utf8Path) -> anyhow::Result<Option<Utf8PathBuf>> {
    if !dir.is_dir() {
        return Ok(None);
    }
    let mut best: Option<(usize, String)> = None;
    for entry in dir.read_dir_utf8().with_context(|| format!("read dir {dir}"))? {
        let entry = entry.with_context(|| format!("read entry in {dir}"))?;
        let name = entry.file_name();
        if !name.ends_with(".jar") || !entry.path().is_file() {
            continue;
        }
        let candidate = (name.len(), name.to_string());
        if best.as_ref().is_none_or(|b| candidate < *b) {
            best = Some(candidate);
        }
    }
    Ok(best.map(|(_, name)| dir.join(name)))
}

/// One shortest jar per `group/artifact/version` directory below `root`, sorted by artifact.
pub fn discover_artifact_jars(root: &Utf8Path) -> anyhow::Result<Vec<(ArtifactId, Utf8PathBuf)>> {
    if !root.is_dir() {
        return Ok(Vec::new());
    }
    let mut out = Vec::new();
    for entry in WalkDir::new(root)
        .min_depth(3)
        .max_depth(3)
        .sort_by_file_name()
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_dir())
    {
        let Some(dir) = pathbuf_to_utf8(entry.path().to_path_buf()) else {
            continue;
        };
        let Some(id) = artifact_from_dir(root, &dir) else {
            continue;
        };
        if let Some(jar) = shortest_jar(&dir)? {
            out.push((id, jar));
        }
    }
    out.sort();
    Ok(out)
}

/// `root/group/artifact/version` → artifact id.
pub fn artifact_from_dir(root: &Utf8Path, dir: &Utf8Path) -> Option<ArtifactId> {
    let rel = dir.strip_prefix(root).ok()?;
    let parts: Vec<&str> = rel.components().map(|c| c.as_str()).collect();
    match parts.as_slice() {
        [.., group, artifact, version] => Some(ArtifactId::new(*group, *artifact, *version)),
        _ => None,
    }
}

pub(crate) fn pathbuf_to_utf8(path: PathBuf) -> Option<Utf8PathBuf> {
    Utf8PathBuf::from_path_buf(path).ok()
}
