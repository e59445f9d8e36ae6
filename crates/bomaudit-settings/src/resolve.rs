use crate::model::BomauditConfigV1;
use anyhow::Context;
use bomaudit_domain::policy::{AuditPolicy, DEFAULT_SKIP_PREFIXES, SearchScope};
use camino::Utf8PathBuf;

pub const DEFAULT_METADB: &str = "metaDB";
pub const DEFAULT_RESULTS: &str = "results";
pub const DEFAULT_REPOSITORY_URL: &str = "https://repo1.maven.org/maven2/";
pub const DEFAULT_DELAY_MS: u64 = 2000;
pub const DEFAULT_TAGGER: &str = "jarpkgtags";

#[derive(Clone, Debug, Default)]
pub struct Overrides {
    pub scope: Option<String>,
    pub metadb: Option<String>,
    pub results: Option<String>,
    pub log_level: Option<String>,
    pub log_format: Option<String>,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum LogFormat {
    #[default]
    Pretty,
    Compact,
    Json,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LogSettings {
    /// An `EnvFilter` directive; `RUST_LOG` still wins at runtime.
    pub level: String,
    pub format: LogFormat,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CrawlSettings {
    /// Always ends with `/`.
    pub repository_url: String,
    pub delay_ms: u64,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TaggerSettings {
    pub command: String,
    pub args: Vec<String>,
}

#[derive(Clone, Debug)]
pub struct ResolvedConfig {
    pub policy: AuditPolicy,
    pub metadb: Utf8PathBuf,
    pub results: Utf8PathBuf,
    pub crawl: CrawlSettings,
    pub tagger: TaggerSettings,
    pub log: LogSettings,
}

pub fn resolve_config(
    cfg: BomauditConfigV1,
    overrides: Overrides,
) -> anyhow::Result<ResolvedConfig> {
    let scope = match overrides.scope.or(cfg.scope) {
        Some(s) => parse_scope(&s)?,
        None => SearchScope::default(),
    };

    let mut skip_prefixes: Vec<String> = match cfg.usage.skip_prefixes {
        Some(prefixes) => prefixes,
        None => DEFAULT_SKIP_PREFIXES.iter().map(|p| p.to_string()).collect(),
    };
    for extra in cfg.usage.extra_skip_prefixes {
        if !skip_prefixes.contains(&extra) {
            skip_prefixes.push(extra);
        }
    }
    if let Some(empty) = skip_prefixes.iter().position(|p| p.trim().is_empty()) {
        anyhow::bail!("usage.skip_prefixes[{empty}] is empty; it would skip every package");
    }

    let metadb = overrides
        .metadb
        .or(cfg.paths.metadb)
        .unwrap_or_else(|| DEFAULT_METADB.to_string());
    let results = overrides
        .results
        .or(cfg.paths.results)
        .unwrap_or_else(|| DEFAULT_RESULTS.to_string());

    let repository_url = cfg
        .crawl
        .repository_url
        .as_deref()
        .map(parse_repository_url)
        .transpose()
        .context("invalid crawl.repository_url")?
        .unwrap_or_else(|| DEFAULT_REPOSITORY_URL.to_string());

    let command = cfg
        .tagger
        .command
        .unwrap_or_else(|| DEFAULT_TAGGER.to_string());
    if command.trim().is_empty() {
        anyhow::bail!("tagger.command must not be empty");
    }

    let level = overrides
        .log_level
        .or(cfg.log.level)
        .unwrap_or_else(|| "info".to_string());
    if level.trim().is_empty() {
        anyhow::bail!("log level must not be empty");
    }
    let format = match overrides.log_format.or(cfg.log.format) {
        Some(f) => parse_log_format(&f)?,
        None => LogFormat::default(),
    };

    Ok(ResolvedConfig {
        policy: AuditPolicy {
            scope,
            skip_prefixes,
        },
        metadb: Utf8PathBuf::from(metadb),
        results: Utf8PathBuf::from(results),
        crawl: CrawlSettings {
            repository_url,
            delay_ms: cfg.crawl.delay_ms.unwrap_or(DEFAULT_DELAY_MS),
        },
        tagger: TaggerSettings {
            command,
            args: cfg.tagger.args,
        },
        log: LogSettings { level, format },
    })
}

fn parse_scope(v: &str) -> anyhow::Result<SearchScope> {
    v.parse::<SearchScope>()
        .map_err(|err| anyhow::anyhow!("invalid scope: {err}"))
}

fn parse_log_format(v: &str) -> anyhow::Result<LogFormat> {
    match v {
        "pretty" => Ok(LogFormat::Pretty),
        "compact" => Ok(LogFormat::Compact),
        "json" => Ok(LogFormat::Json),
        other => anyhow::bail!("unknown log format: {other} (expected pretty, compact or json)"),
    }
}

fn parse_repository_url(v: &str) -> anyhow::Result<String> {
    if !(v.starts_with("https://") || v.starts_with("http://")) {
        anyhow::bail!("expected an http(s) URL, got {v}");
    }
    if v.ends_with('/') {
        Ok(v.to_string())
    } else {
        Ok(format!("{v}/"))
    }
}
