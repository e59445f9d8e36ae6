use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// `bomaudit.toml` schema v1.
///
/// This is a *user-facing* config model: every field is optional so a missing file and an empty
/// file mean the same thing.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(deny_unknown_fields)]
pub struct BomauditConfigV1 {
    /// Optional schema string for tooling (`bomaudit.config.v1`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub schema: Option<String>,

    /// Provider search scope: `global` (default) or `layer`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scope: Option<String>,

    #[serde(default)]
    pub paths: PathsConfig,

    #[serde(default)]
    pub crawl: CrawlConfig,

    #[serde(default)]
    pub tagger: TaggerConfig,

    #[serde(default)]
    pub usage: UsageConfig,

    #[serde(default)]
    pub log: LogConfig,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(deny_unknown_fields)]
pub struct PathsConfig {
    /// Root of downloaded archives and the provider directory.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadb: Option<String>,

    /// Root of analyzer output and audit results.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub results: Option<String>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(deny_unknown_fields)]
pub struct CrawlConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub repository_url: Option<String>,

    /// Pause between two artifacts, in milliseconds.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub delay_ms: Option<u64>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(deny_unknown_fields)]
pub struct TaggerConfig {
    /// Analyzer executable; invoked as `<command> [args..] <jar>`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub command: Option<String>,

    #[serde(default)]
    pub args: Vec<String>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(deny_unknown_fields)]
pub struct UsageConfig {
    /// Replaces the built-in runtime namespace prefixes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub skip_prefixes: Option<Vec<String>>,

    /// Appended to the effective prefixes.
    #[serde(default)]
    pub extra_skip_prefixes: Vec<String>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(deny_unknown_fields)]
pub struct LogConfig {
    /// `trace`, `debug`, `info` (default), `warn` or `error`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub level: Option<String>,

    /// `pretty` (default), `compact` or `json`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,
}
