//! Scratch extraction of archives and literal-reference lookup over compiled classes.

use crate::layout::shortest_jar;
use bomaudit_domain::validate::{ArchiveProbe, ProbeError, ProbeTarget};
use camino::{Utf8Path, Utf8PathBuf};
use std::collections::{BTreeMap, BTreeSet};
use std::fs::File;
use std::io::{self, BufReader};
use tracing::debug;
use walkdir::WalkDir;

const UNJAR_DIR: &str = "unjar";
const DEPS_DIR: &str = "deps";

/// Run-owned work directory.
///
/// The audited archive extracts to `<work>/unjar/`, dependency archives to
/// `<work>/deps/<jar name>/unjar/` next to a copy of the jar. An existing `unjar/` directory is
/// reused as is.
#[derive(Clone, Debug)]
pub struct ScratchWorkspace {
    work_dir: Utf8PathBuf,
}

impl ScratchWorkspace {
    pub fn new(work_dir: impl Into<Utf8PathBuf>) -> Self {
        Self {
            work_dir: work_dir.into(),
        }
    }

    pub fn work_dir(&self) -> &Utf8Path {
        &self.work_dir
    }

    pub fn extract_root(&self, archive: &Utf8Path) -> Result<Utf8PathBuf, ProbeError> {
        let dest = self.work_dir.join(UNJAR_DIR);
        extract_once(archive, &dest)?;
        Ok(dest)
    }

    pub fn extract_dependency(&self, archive: &Utf8Path) -> Result<Utf8PathBuf, ProbeError> {
        let name = archive
            .file_name()
            .ok_or_else(|| ProbeError::ArchiveMissing(archive.to_string()))?;
        let slot = self.work_dir.join(DEPS_DIR).join(name);
        let dest = slot.join(UNJAR_DIR);
        if dest.is_dir() {
            return Ok(dest);
        }

        let copy = slot.join(name);
        std::fs::create_dir_all(&slot).map_err(|e| extraction_error(archive, e))?;
        if !copy.exists() {
            std::fs::copy(archive, &copy).map_err(|e| extraction_error(archive, e))?;
        }
        extract_once(&copy, &dest)?;
        Ok(dest)
    }
}

fn extraction_error(archive: &Utf8Path, err: impl std::fmt::Display) -> ProbeError {
    ProbeError::Extraction {
        archive: archive.to_string(),
        message: err.to_string(),
    }
}

/// Extract `archive` into `dest` unless `dest` already exists.
///
/// Entries are written to a sibling `.partial` directory which is renamed into place, so an
/// interrupted run never leaves a half-filled `dest` behind.
fn extract_once(archive: &Utf8Path, dest: &Utf8Path) -> Result<(), ProbeError> {
    if dest.is_dir() {
        debug!(dest = %dest, "reusing extracted archive");
        return Ok(());
    }
    if !archive.is_file() {
        return Err(ProbeError::ArchiveMissing(archive.to_string()));
    }

    let partial = Utf8PathBuf::from(format!("{dest}.partial"));
    if partial.exists() {
        std::fs::remove_dir_all(&partial).map_err(|e| extraction_error(archive, e))?;
    }
    std::fs::create_dir_all(&partial).map_err(|e| extraction_error(archive, e))?;

    let file = File::open(archive).map_err(|e| extraction_error(archive, e))?;
    let mut zip =
        zip::ZipArchive::new(BufReader::new(file)).map_err(|e| extraction_error(archive, e))?;
    for i in 0..zip.len() {
        let mut entry = zip.by_index(i).map_err(|e| extraction_error(archive, e))?;
        // Entries escaping the destination are ignored.
        let Some(relative) = entry.enclosed_name() else {
            continue;
        };
        let out_path = partial.as_std_path().join(relative);
        if entry.is_dir() {
            std::fs::create_dir_all(&out_path).map_err(|e| extraction_error(archive, e))?;
            continue;
        }
        if let Some(parent) = out_path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| extraction_error(archive, e))?;
        }
        let mut out = File::create(&out_path).map_err(|e| extraction_error(archive, e))?;
        io::copy(&mut entry, &mut out).map_err(|e| extraction_error(archive, e))?;
    }

    std::fs::rename(&partial, dest).map_err(|e| extraction_error(archive, e))?;
    debug!(archive = %archive, dest = %dest, entries = zip.len(), "extracted archive");
    Ok(())
}

/// Symbols of every `.class` file of one extracted tree, read once.
///
/// Class bytes are split into runs of identifier bytes (`[A-Za-z0-9_$./-]`) with `/` folded to
/// `.`, so `org.slf4j` also finds the internal form `org/slf4j`. Only the symbol table is kept;
/// a reference matches every class holding a symbol that contains it. Answers are cached per
/// reference.
#[derive(Debug, Default)]
pub struct ArchiveContentIndex {
    /// Class entries relative to the extracted root, `/`-separated, in walk order.
    entries: Vec<String>,
    symbols: BTreeMap<String, BTreeSet<usize>>,
    cache: BTreeMap<String, Vec<String>>,
}

impl ArchiveContentIndex {
    pub fn load(root: &Utf8Path) -> Result<Self, ProbeError> {
        let read_error = |message: String| ProbeError::Read {
            archive: root.to_string(),
            message,
        };

        let mut index = Self::default();
        for entry in WalkDir::new(root).sort_by_file_name() {
            let entry = entry.map_err(|e| read_error(e.to_string()))?;
            if !entry.file_type().is_file() {
                continue;
            }
            let Ok(path) = Utf8PathBuf::from_path_buf(entry.path().to_path_buf()) else {
                continue;
            };
            if path.extension() != Some("class") {
                continue;
            }
            let bytes = std::fs::read(&path).map_err(|e| read_error(format!("{path}: {e}")))?;
            let slot = index.entries.len();
            index.entries.push(entry_name(root, &path));
            for symbol in class_symbols(&bytes) {
                index.symbols.entry(symbol).or_default().insert(slot);
            }
        }

        debug!(
            root = %root,
            classes = index.entries.len(),
            symbols = index.symbols.len(),
            "indexed compiled classes"
        );
        Ok(index)
    }

    pub fn class_count(&self) -> usize {
        self.entries.len()
    }

    /// Class entries referencing `reference`. An empty reference matches nothing.
    pub fn referencing_classes(&mut self, reference: &str) -> Vec<String> {
        let needle = reference.trim().replace('/', ".");
        if needle.is_empty() {
            return Vec::new();
        }
        if let Some(hit) = self.cache.get(&needle) {
            return hit.clone();
        }

        let slots: BTreeSet<usize> = self
            .symbols
            .iter()
            .filter(|(symbol, _)| symbol.contains(&needle))
            .flat_map(|(_, slots)| slots.iter().copied())
            .collect();
        let hit: Vec<String> = slots
            .into_iter()
            .filter_map(|slot| self.entries.get(slot).cloned())
            .collect();
        self.cache.insert(needle, hit.clone());
        hit
    }
}

fn entry_name(root: &Utf8Path, path: &Utf8Path) -> String {
    let relative = path.strip_prefix(root).unwrap_or(path);
    relative
        .components()
        .map(|c| c.as_str())
        .collect::<Vec<_>>()
        .join("/")
}

fn is_symbol_byte(b: u8) -> bool {
    b.is_ascii_alphanumeric() || matches!(b, b'_' | b'$' | b'.' | b'/' | b'-')
}

fn class_symbols(bytes: &[u8]) -> BTreeSet<String> {
    bytes
        .split(|b| !is_symbol_byte(*b))
        .filter(|run| !run.is_empty())
        .map(|run| {
            run.iter()
                .map(|&b| if b == b'/' { '.' } else { char::from(b) })
                .collect::<String>()
        })
        .collect()
}

/// [`ArchiveProbe`] over the audited archive and the metadata database's dependency archives.
pub struct ArchiveEvidence {
    workspace: ScratchWorkspace,
    root_archive: Utf8PathBuf,
    assets_root: Utf8PathBuf,
    indexes: BTreeMap<ProbeTarget, ArchiveContentIndex>,
}

impl ArchiveEvidence {
    pub fn new(
        workspace: ScratchWorkspace,
        root_archive: impl Into<Utf8PathBuf>,
        assets_root: impl Into<Utf8PathBuf>,
    ) -> Self {
        Self {
            workspace,
            root_archive: root_archive.into(),
            assets_root: assets_root.into(),
            indexes: BTreeMap::new(),
        }
    }

    fn index_for(&mut self, target: &ProbeTarget) -> Result<&mut ArchiveContentIndex, ProbeError> {
        if !self.indexes.contains_key(target) {
            let dir = match target {
                ProbeTarget::Root => self.workspace.extract_root(&self.root_archive)?,
                ProbeTarget::Dependency(id) => {
                    let asset_dir = self.assets_root.join(id.relative_dir());
                    let jar = shortest_jar(&asset_dir)
                        .map_err(|e| ProbeError::Read {
                            archive: asset_dir.to_string(),
                            message: format!("{e:#}"),
                        })?
                        .ok_or_else(|| ProbeError::ArchiveMissing(id.to_string()))?;
                    self.workspace.extract_dependency(&jar)?
                }
            };
            let index = ArchiveContentIndex::load(&dir)?;
            self.indexes.insert(target.clone(), index);
        }
        self.indexes
            .get_mut(target)
            .ok_or_else(|| ProbeError::ArchiveMissing(format!("{target:?}")))
    }
}

impl ArchiveProbe for ArchiveEvidence {
    fn referencing_classes(
        &mut self,
        target: &ProbeTarget,
        reference: &str,
    ) -> Result<Vec<String>, ProbeError> {
        Ok(self.index_for(target)?.referencing_classes(reference))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bomaudit_test_util::{JarBuilder, utf8};
    use bomaudit_types::ArtifactId;
    use tempfile::TempDir;

    fn sample_jar(path: &Utf8Path) {
        JarBuilder::new()
            .class("com/acme/App.class", &["org.slf4j.Logger", "com.acme.Util"])
            .class("com/acme/Util.class", &[])
            .resource("META-INF/MANIFEST.MF", "Main-Class: com.fasterxml.Hidden\n")
            .write(path)
            .expect("write jar");
    }

    #[test]
    fn extraction_is_idempotent() {
        let tmp = TempDir::new().expect("temp dir");
        let root = utf8(tmp.path());
        let jar = root.join("app.jar");
        sample_jar(&jar);

        let workspace = ScratchWorkspace::new(root.join("work"));
        let first = workspace.extract_root(&jar).expect("extract");
        assert!(first.join("com/acme/App.class").is_file());

        // A marker survives the second call: nothing is re-extracted.
        std::fs::write(first.join("marker"), "x").expect("write marker");
        let second = workspace.extract_root(&jar).expect("extract again");
        assert_eq!(first, second);
        assert!(second.join("marker").is_file());
    }

    #[test]
    fn dependency_extraction_keeps_a_copy_of_the_jar() {
        let tmp = TempDir::new().expect("temp dir");
        let root = utf8(tmp.path());
        let jar = root.join("assets/lib-1.0.jar");
        sample_jar(&jar);

        let workspace = ScratchWorkspace::new(root.join("work"));
        let dest = workspace.extract_dependency(&jar).expect("extract");
        assert_eq!(dest, root.join("work/deps/lib-1.0.jar/unjar"));
        assert!(root.join("work/deps/lib-1.0.jar/lib-1.0.jar").is_file());
    }

    #[test]
    fn missing_archive_is_an_error() {
        let tmp = TempDir::new().expect("temp dir");
        let root = utf8(tmp.path());
        let workspace = ScratchWorkspace::new(root.join("work"));
        let err = workspace
            .extract_root(&root.join("absent.jar"))
            .unwrap_err();
        assert!(matches!(err, ProbeError::ArchiveMissing(_)));
    }

    #[test]
    fn corrupt_archive_is_an_extraction_error() {
        let tmp = TempDir::new().expect("temp dir");
        let root = utf8(tmp.path());
        let jar = root.join("broken.jar");
        std::fs::write(&jar, "definitely not a zip").expect("write");
        let workspace = ScratchWorkspace::new(root.join("work"));
        let err = workspace.extract_root(&jar).unwrap_err();
        assert!(matches!(err, ProbeError::Extraction { .. }));
        assert!(!root.join("work/unjar").exists());
    }

    #[test]
    fn dotted_names_match_class_symbols_only() {
        let tmp = TempDir::new().expect("temp dir");
        let root = utf8(tmp.path());
        let jar = root.join("app.jar");
        sample_jar(&jar);
        let dir = ScratchWorkspace::new(root.join("work"))
            .extract_root(&jar)
            .expect("extract");

        let mut index = ArchiveContentIndex::load(&dir).expect("index");
        assert_eq!(index.class_count(), 2);
        assert_eq!(
            index.referencing_classes("org.slf4j"),
            vec!["com/acme/App.class".to_string()]
        );
        assert_eq!(index.referencing_classes("org.slf4j.Logger").len(), 1);
        assert!(index.referencing_classes("com.fasterxml").is_empty());
        assert!(index.referencing_classes("org.apache").is_empty());
        assert_eq!(index.referencing_classes("com/acme/Util").len(), 1);
    }

    #[test]
    fn empty_reference_matches_nothing() {
        let tmp = TempDir::new().expect("temp dir");
        let root = utf8(tmp.path());
        let jar = root.join("app.jar");
        sample_jar(&jar);
        let dir = ScratchWorkspace::new(root.join("work"))
            .extract_root(&jar)
            .expect("extract");

        let mut index = ArchiveContentIndex::load(&dir).expect("index");
        assert!(index.referencing_classes("").is_empty());
        assert!(index.referencing_classes("  ").is_empty());
    }

    #[test]
    fn symbols_split_on_non_identifier_bytes() {
        let bytes = b"\xca\xfe\xba\xbe\0Lorg/a/Api;\x01(Ljava/lang/String;)V";
        let symbols = class_symbols(bytes);
        assert!(symbols.contains("Lorg.a.Api"));
        assert!(symbols.contains("Ljava.lang.String"));
        assert!(!symbols.iter().any(|s| s.contains(';')));
    }

    #[test]
    fn evidence_resolves_dependency_archives_from_assets() {
        let tmp = TempDir::new().expect("temp dir");
        let root = utf8(tmp.path());
        let app = root.join("app.jar");
        sample_jar(&app);
        JarBuilder::new()
            .class("org/dep/Api.class", &["org.other.Thing"])
            .write(&root.join("assets/org.dep/dep/2.0/dep-2.0.jar"))
            .expect("write dep");

        let mut evidence = ArchiveEvidence::new(
            ScratchWorkspace::new(root.join("work")),
            &app,
            root.join("assets"),
        );
        let dep = ProbeTarget::Dependency(ArtifactId::new("org.dep", "dep", "2.0"));
        assert_eq!(
            evidence.referencing_classes(&dep, "org.other").expect("lookup"),
            vec!["org/dep/Api.class".to_string()]
        );
        assert!(
            !evidence
                .referencing_classes(&ProbeTarget::Root, "org.slf4j")
                .expect("lookup")
                .is_empty()
        );

        let absent = ProbeTarget::Dependency(ArtifactId::new("org.none", "none", "1"));
        assert!(matches!(
            evidence.referencing_classes(&absent, "x"),
            Err(ProbeError::ArchiveMissing(_))
        ));
    }
}
