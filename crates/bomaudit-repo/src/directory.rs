//! Persisted provider directory: `group|artifact|version` → provided packages.
//!
//! On disk the directory is a JSON object whose values are arrays of package names, or `null` for
//! artifacts whose analyzer output exists but could not be read. The inverse file maps each
//! package to the artifacts providing it.

use crate::layout::{META_INFO_FILE, artifact_from_dir, pathbuf_to_utf8};
use crate::metadata::read_metadata;
use anyhow::Context;
use bomaudit_domain::model::{ProviderDirectory, ProviderEntry};
use bomaudit_types::ArtifactId;
use camino::{Utf8Path, Utf8PathBuf};
use rayon::prelude::*;
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};
use tracing::{debug, info, warn};
use walkdir::WalkDir;

type Persisted = BTreeMap<String, Option<Vec<String>>>;

/// Counters reported by [`enlarge`].
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct IndexStats {
    pub scanned: u32,
    pub added: u32,
    /// Previously unknown entries whose metadata is now readable.
    pub upgraded: u32,
    pub already_present: u32,
    pub read_errors: u32,
    pub empty_package_lists: u32,
}

pub fn load(path: &Utf8Path) -> anyhow::Result<ProviderDirectory> {
    let text = std::fs::read_to_string(path).with_context(|| format!("read {path}"))?;
    let persisted: Persisted =
        serde_json::from_str(&text).with_context(|| format!("parse {path}"))?;

    let mut dir = ProviderDirectory::new();
    for (key, packages) in persisted {
        let id = match key.parse::<ArtifactId>() {
            Ok(id) => id,
            Err(err) => {
                warn!(key = %key, error = %err, "skipping malformed directory key");
                continue;
            }
        };
        let entry = match packages {
            Some(packages) => ProviderEntry::Known(packages.into_iter().collect()),
            None => ProviderEntry::Unknown,
        };
        dir.insert(id, entry);
    }
    Ok(dir)
}

/// Like [`load`], but a missing file is an empty directory.
pub fn load_or_default(path: &Utf8Path) -> anyhow::Result<ProviderDirectory> {
    if !path.exists() {
        debug!(path = %path, "no provider directory yet; starting empty");
        return Ok(ProviderDirectory::new());
    }
    load(path)
}

pub fn save(dir: &ProviderDirectory, path: &Utf8Path) -> anyhow::Result<()> {
    let persisted: Persisted = dir
        .iter()
        .map(|(id, entry)| {
            let packages = match entry {
                ProviderEntry::Known(packages) => Some(packages.iter().cloned().collect()),
                ProviderEntry::Unknown => None,
            };
            (id.to_string(), packages)
        })
        .collect();
    write_json(path, &persisted)
}

pub fn save_inverse(dir: &ProviderDirectory, path: &Utf8Path) -> anyhow::Result<()> {
    let inverse: BTreeMap<String, Vec<String>> = dir
        .inverse()
        .into_iter()
        .map(|(package, ids)| (package, ids.iter().map(ToString::to_string).collect()))
        .collect();
    write_json(path, &inverse)
}

fn write_json<T: Serialize>(path: &Utf8Path, value: &T) -> anyhow::Result<()> {
    if let Some(parent) = path.parent()
        && !parent.as_str().is_empty()
    {
        std::fs::create_dir_all(parent).with_context(|| format!("create {parent}"))?;
    }
    let text = serde_json::to_string_pretty(value).context("serialize directory")?;
    std::fs::write(path, text).with_context(|| format!("write {path}"))
}

/// Add analyzer output found under `tags_root/**/meta_info.json` to `dir`.
///
/// Only new keys are added; an `Unknown` entry is replaced once its metadata becomes readable.
/// Files are parsed in parallel and merged in path order.
pub fn enlarge(dir: &mut ProviderDirectory, tags_root: &Utf8Path) -> anyhow::Result<IndexStats> {
    let mut stats = IndexStats::default();
    if !tags_root.is_dir() {
        warn!(root = %tags_root, "no analyzer output directory; nothing to index");
        return Ok(stats);
    }

    let candidates: Vec<(ArtifactId, Utf8PathBuf)> = WalkDir::new(tags_root)
        .sort_by_file_name()
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file() && e.file_name() == META_INFO_FILE)
        .filter_map(|e| pathbuf_to_utf8(e.path().to_path_buf()))
        .filter_map(|path| {
            let parent = path.parent()?;
            let id = artifact_from_dir(tags_root, parent)?;
            Some((id, path))
        })
        .collect();

    let pending: Vec<&(ArtifactId, Utf8PathBuf)> = candidates
        .iter()
        .filter(|(id, _)| {
            stats.scanned += 1;
            if dir.is_collected(id) {
                stats.already_present += 1;
                false
            } else {
                true
            }
        })
        .collect();

    let parsed: Vec<(ArtifactId, Option<BTreeSet<String>>)> = pending
        .par_iter()
        .map(|(id, path)| match read_metadata(path) {
            Ok(meta) => (id.clone(), Some(meta.provided_packages())),
            Err(err) => {
                warn!(path = %path, error = %format!("{err:#}"), "unreadable analyzer output");
                (id.clone(), None)
            }
        })
        .collect();

    for (id, packages) in parsed {
        let was_unknown = dir.contains_key(&id);
        match packages {
            Some(packages) => {
                if packages.is_empty() {
                    stats.empty_package_lists += 1;
                }
                if was_unknown {
                    stats.upgraded += 1;
                } else {
                    stats.added += 1;
                }
                dir.insert(id, ProviderEntry::Known(packages));
            }
            None => {
                stats.read_errors += 1;
                if !was_unknown {
                    dir.insert(id, ProviderEntry::Unknown);
                }
            }
        }
    }

    info!(
        scanned = stats.scanned,
        added = stats.added,
        upgraded = stats.upgraded,
        read_errors = stats.read_errors,
        empty = stats.empty_package_lists,
        "provider directory enlarged"
    );
    Ok(stats)
}

#[cfg(test)]
mod tests {
    use super::*;
    use bomaudit_test_util::{meta_info, utf8, write_json as write_fixture};
    use tempfile::TempDir;

    fn id(name: &str) -> ArtifactId {
        ArtifactId::new("org.example", name, "1.0")
    }

    #[test]
    fn save_and_load_keep_unknown_distinct_from_empty() {
        let tmp = TempDir::new().expect("temp dir");
        let path = utf8(tmp.path()).join("metadata/jar_to_pkgs_dic.json");

        let mut dir = ProviderDirectory::new();
        dir.insert_known(id("a"), ["org.a", "org.a.impl"]);
        dir.insert_known(id("empty"), Vec::<String>::new());
        dir.insert(id("unknown"), ProviderEntry::Unknown);
        save(&dir, &path).expect("save");

        let text = std::fs::read_to_string(&path).expect("read");
        let json: serde_json::Value = serde_json::from_str(&text).expect("json");
        assert_eq!(json["org.example|empty|1.0"], serde_json::json!([]));
        assert!(json["org.example|unknown|1.0"].is_null());

        let back = load(&path).expect("load");
        assert_eq!(back, dir);
    }

    #[test]
    fn load_skips_malformed_keys() {
        let tmp = TempDir::new().expect("temp dir");
        let path = utf8(tmp.path()).join("dir.json");
        std::fs::write(&path, r#"{"bad-key": ["x"], "g|a|1": ["y"]}"#).expect("write");
        let dir = load(&path).expect("load");
        assert_eq!(dir.len(), 1);
        assert!(dir.is_collected(&ArtifactId::new("g", "a", "1")));
    }

    #[test]
    fn inverse_maps_packages_to_providers() {
        let tmp = TempDir::new().expect("temp dir");
        let path = utf8(tmp.path()).join("inverse.json");
        let mut dir = ProviderDirectory::new();
        dir.insert_known(id("a"), ["shared", "only.a"]);
        dir.insert_known(id("b"), ["shared"]);
        save_inverse(&dir, &path).expect("save");

        let json: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&path).expect("read")).expect("json");
        assert_eq!(
            json["shared"],
            serde_json::json!(["org.example|a|1.0", "org.example|b|1.0"])
        );
    }

    #[test]
    fn enlarge_adds_new_keys_and_counts_problems() {
        let tmp = TempDir::new().expect("temp dir");
        let tags = utf8(tmp.path()).join("jarpkgtags");

        write_fixture(
            &tags.join("org.example/a/1.0/meta_info.json"),
            &meta_info(&[("org.a", &["org.b"])]),
        )
        .expect("write");
        write_fixture(
            &tags.join("org.example/empty/1.0/meta_info.json"),
            &meta_info(&[]),
        )
        .expect("write");
        write_fixture(
            &tags.join("org.example/known/1.0/meta_info.json"),
            &meta_info(&[("org.new", &[])]),
        )
        .expect("write");
        let broken = tags.join("org.example/broken/1.0/meta_info.json");
        std::fs::create_dir_all(broken.parent().expect("parent")).expect("mkdir");
        std::fs::write(&broken, "not json").expect("write");

        let mut dir = ProviderDirectory::new();
        dir.insert_known(id("known"), ["org.old"]);

        let stats = enlarge(&mut dir, &tags).expect("enlarge");
        assert_eq!(
            stats,
            IndexStats {
                scanned: 4,
                added: 2,
                upgraded: 0,
                already_present: 1,
                read_errors: 1,
                empty_package_lists: 1,
            }
        );
        assert_eq!(dir.get(&id("broken")), Some(&ProviderEntry::Unknown));
        assert_eq!(
            dir.known(&id("known")).expect("kept").iter().next().map(String::as_str),
            Some("org.old")
        );

        // Fixing the broken output upgrades the unknown entry on the next run.
        write_fixture(&broken, &meta_info(&[("org.fixed", &[])])).expect("write");
        let stats = enlarge(&mut dir, &tags).expect("enlarge again");
        assert_eq!(stats.upgraded, 1);
        assert_eq!(stats.added, 0);
        assert!(dir.is_collected(&id("broken")));
    }
}
