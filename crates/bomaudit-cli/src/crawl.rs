//! Artifact retrieval from a Maven-layout repository.
//!
//! Each declared artifact's directory listing is fetched once, saved as `response.html`, and every
//! main jar linked from it is downloaded. Failures are logged and skipped; nothing is retried.

use anyhow::Context;
use bomaudit_repo::{BomDocument, MetaDbLayout, declared_artifacts};
use bomaudit_settings::CrawlSettings;
use bomaudit_types::ArtifactId;
use camino::Utf8Path;
use regex::Regex;
use std::sync::LazyLock;
use std::time::Duration;
use tracing::{debug, info, warn};

const LISTING_FILE: &str = "response.html";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(120);

/// Checksums, signatures, docs, sources and test jars are never downloaded.
const SKIP_TERMS: &[&str] = &[
    ".asc", ".md5", ".sha1", ".sha256", ".sha512", "-javadoc.", "source", "-tests",
];

static HREF: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)<a\s[^>]*?href\s*=\s*"([^"]*)""#).expect("href pattern is valid")
});

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CrawlStats {
    pub declared: u32,
    pub already_present: u32,
    pub fetched: u32,
    pub files: u32,
    pub failed: u32,
}

pub fn artifact_folder_url(repository_url: &str, id: &ArtifactId) -> String {
    format!(
        "{repository_url}{}/{}/{}/",
        id.group.replace('.', "/"),
        id.artifact,
        id.version
    )
}

/// File links of a directory listing, in page order. Sub-directories and parent links are dropped.
pub fn listing_links(html: &str) -> Vec<String> {
    HREF.captures_iter(html)
        .filter_map(|c| c.get(1))
        .map(|m| m.as_str().to_string())
        .filter(|href| !href.is_empty() && !href.ends_with('/') && !href.starts_with(['?', '#']))
        .collect()
}

pub fn wanted_file(link: &str) -> bool {
    let lower = link.to_ascii_lowercase();
    lower.ends_with(".jar") && !SKIP_TERMS.iter().any(|term| lower.contains(term))
}

/// Download every declared artifact of `doc` that is not yet under `assets_root`.
pub fn crawl(
    doc: &BomDocument,
    layout: &MetaDbLayout,
    settings: &CrawlSettings,
) -> anyhow::Result<CrawlStats> {
    let client = reqwest::blocking::Client::builder()
        .user_agent(concat!("bomaudit/", env!("CARGO_PKG_VERSION")))
        .timeout(REQUEST_TIMEOUT)
        .build()
        .context("build HTTP client")?;
    let delay = Duration::from_millis(settings.delay_ms);

    let artifacts = declared_artifacts(doc);
    let mut stats = CrawlStats {
        declared: artifacts.len() as u32,
        ..CrawlStats::default()
    };

    for id in &artifacts {
        let dir = layout.asset_dir(id);
        if dir.exists() {
            stats.already_present += 1;
            debug!(artifact = %id, "assets already present");
            continue;
        }

        let url = artifact_folder_url(&settings.repository_url, id);
        match fetch_artifact(&client, &url, &dir) {
            Ok(files) => {
                stats.fetched += 1;
                stats.files += files;
                info!(artifact = %id, files, "fetched artifact");
            }
            Err(err) => {
                stats.failed += 1;
                warn!(
                    artifact = %id,
                    url = %url,
                    error = %format!("{err:#}"),
                    "retrieval failed; skipping"
                );
            }
        }
        std::thread::sleep(delay);
    }

    info!(
        declared = stats.declared,
        present = stats.already_present,
        fetched = stats.fetched,
        failed = stats.failed,
        "crawl finished"
    );
    Ok(stats)
}

fn fetch_artifact(
    client: &reqwest::blocking::Client,
    folder_url: &str,
    dir: &Utf8Path,
) -> anyhow::Result<u32> {
    let response = client
        .get(folder_url)
        .send()
        .with_context(|| format!("GET {folder_url}"))?;
    let status = response.status();
    if !status.is_success() {
        anyhow::bail!("listing returned HTTP {status}");
    }
    let html = response.text().context("read listing body")?;

    std::fs::create_dir_all(dir).with_context(|| format!("create {dir}"))?;
    std::fs::write(dir.join(LISTING_FILE), &html)
        .with_context(|| format!("write {LISTING_FILE}"))?;

    let mut files = 0;
    for link in listing_links(&html) {
        if !wanted_file(&link) {
            continue;
        }
        let name = link.rsplit('/').next().unwrap_or(&link);
        let dest = dir.join(name);
        if dest.exists() {
            continue;
        }
        let file_url = format!("{folder_url}{name}");
        match download(client, &file_url, &dest) {
            Ok(()) => files += 1,
            Err(err) => {
                warn!(url = %file_url, error = %format!("{err:#}"), "download failed; skipping");
            }
        }
    }
    Ok(files)
}

fn download(client: &reqwest::blocking::Client, url: &str, dest: &Utf8Path) -> anyhow::Result<()> {
    let bytes = client
        .get(url)
        .send()
        .and_then(|r| r.error_for_status())
        .and_then(|r| r.bytes())
        .with_context(|| format!("GET {url}"))?;
    std::fs::write(dest, &bytes).with_context(|| format!("write {dest}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn folder_url_uses_group_path() {
        let id = ArtifactId::new("org.apache.commons", "commons-lang3", "3.12.0");
        assert_eq!(
            artifact_folder_url("https://repo1.maven.org/maven2/", &id),
            "https://repo1.maven.org/maven2/org/apache/commons/commons-lang3/3.12.0/"
        );
    }

    #[test]
    fn listing_links_keep_files_only() {
        let html = r#"
<html><body><pre>
<a href="../">../</a>
<a href="sub/" title="sub/">sub/</a>
<a href="lib-1.0.jar" title="lib-1.0.jar">lib-1.0.jar</a>
<a href="lib-1.0.jar.sha1">lib-1.0.jar.sha1</a>
<A HREF="lib-1.0-sources.jar">lib-1.0-sources.jar</A>
<a href="?C=N;O=D">Name</a>
</pre></body></html>"#;
        assert_eq!(
            listing_links(html),
            vec!["lib-1.0.jar", "lib-1.0.jar.sha1", "lib-1.0-sources.jar"]
        );
    }

    #[test]
    fn wanted_file_filters_classifiers_and_checksums() {
        assert!(wanted_file("lib-1.0.jar"));
        assert!(wanted_file("lib-1.0-linux-x86_64.jar"));
        for skipped in [
            "lib-1.0.jar.sha1",
            "lib-1.0.jar.asc",
            "lib-1.0.jar.md5",
            "lib-1.0-javadoc.jar",
            "lib-1.0-sources.jar",
            "lib-1.0-tests.jar",
            "lib-1.0.pom",
        ] {
            assert!(!wanted_file(skipped), "{skipped} should be skipped");
        }
    }

    #[test]
    fn crawl_skips_present_artifacts_without_network() {
        let tmp = tempfile::TempDir::new().expect("temp dir");
        let root = bomaudit_test_util::utf8(tmp.path());
        let layout = MetaDbLayout::new(&root.join("metaDB"), &root.join("results"));
        let doc = bomaudit_repo::parse_bom(
            r#"{"components":[{"purl":"pkg:maven/org.x/x@1.0?type=jar"}]}"#,
        )
        .expect("bom");
        std::fs::create_dir_all(layout.asset_dir(&ArtifactId::new("org.x", "x", "1.0")))
            .expect("mkdir");

        let stats = crawl(
            &doc,
            &layout,
            &CrawlSettings {
                repository_url: "http://127.0.0.1:9/".to_string(),
                delay_ms: 0,
            },
        )
        .expect("crawl");
        assert_eq!(stats.declared, 1);
        assert_eq!(stats.already_present, 1);
        assert_eq!(stats.fetched + stats.failed, 0);
    }
}
