//! Shared fixture builders for the bomaudit workspace.
//!
//! Tests across repo, app, cli and xtask need the same on-disk shapes: jar archives with
//! compiled-class entries, analyzer metadata, and CycloneDX manifests. Jars are built at test
//! time so no binary fixtures live in the tree.

use camino::{Utf8Path, Utf8PathBuf};
use serde_json::{Value, json};
use std::fs::File;
use std::io::{self, Write};
use zip::ZipWriter;
use zip::write::SimpleFileOptions;

/// Leading bytes of every compiled class.
pub const CLASS_MAGIC: &[u8] = &[0xCA, 0xFE, 0xBA, 0xBE];

/// `pkg:maven/<group>/<artifact>@<version>?type=jar`
pub fn purl(group: &str, artifact: &str, version: &str) -> String {
    format!("pkg:maven/{group}/{artifact}@{version}?type=jar")
}

/// `group|artifact|version`
pub fn key(group: &str, artifact: &str, version: &str) -> String {
    format!("{group}|{artifact}|{version}")
}

/// In-memory description of a jar archive.
#[derive(Clone, Debug, Default)]
pub struct JarBuilder {
    entries: Vec<(String, Vec<u8>)>,
}

impl JarBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// A `.class` entry whose constant pool mentions `references` in internal (slash) form.
    pub fn class(mut self, path: &str, references: &[&str]) -> Self {
        let mut bytes = CLASS_MAGIC.to_vec();
        for reference in references {
            bytes.push(0);
            bytes.extend_from_slice(reference.replace('.', "/").as_bytes());
        }
        self.entries.push((path.to_string(), bytes));
        self
    }

    /// A non-class entry; its content never counts as evidence.
    pub fn resource(mut self, path: &str, contents: &str) -> Self {
        self.entries
            .push((path.to_string(), contents.as_bytes().to_vec()));
        self
    }

    pub fn write(&self, path: &Utf8Path) -> io::Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let mut zip = ZipWriter::new(File::create(path)?);
        let options = SimpleFileOptions::default();
        for (name, bytes) in &self.entries {
            zip.start_file(name.as_str(), options)?;
            zip.write_all(bytes)?;
        }
        zip.finish()?;
        Ok(())
    }
}

/// Analyzer output: `(own package, used packages)` pairs.
pub fn meta_info(packages: &[(&str, &[&str])]) -> Value {
    let mut map = serde_json::Map::new();
    for (name, uses) in packages {
        map.insert(name.to_string(), json!({ "uses": uses }));
    }
    json!({ "packages": map })
}

/// CycloneDX-like manifest from `(ref, dependsOn)` purl pairs.
///
/// Every reference also appears as a component.
pub fn sbom(edges: &[(&str, &[&str])]) -> Value {
    let mut components: Vec<String> = Vec::new();
    for (from, to) in edges {
        for purl in std::iter::once(from).chain(to.iter()) {
            if !components.iter().any(|c| c == purl) {
                components.push(purl.to_string());
            }
        }
    }
    let components: Vec<Value> = components.iter().map(|p| json!({ "purl": p })).collect();
    let dependencies: Vec<Value> = edges
        .iter()
        .map(|(from, to)| json!({ "ref": from, "dependsOn": to }))
        .collect();
    json!({
        "bomFormat": "CycloneDX",
        "specVersion": "1.5",
        "components": components,
        "dependencies": dependencies,
    })
}

pub fn write_json(path: &Utf8Path, value: &Value) -> io::Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let text = serde_json::to_string_pretty(value).map_err(io::Error::other)?;
    std::fs::write(path, text)
}

pub fn utf8(path: &std::path::Path) -> Utf8PathBuf {
    Utf8PathBuf::from_path_buf(path.to_path_buf()).unwrap_or_else(|p| {
        Utf8PathBuf::from(p.to_string_lossy().into_owned())
    })
}
