//! Config parsing and resolution.
//!
//! This crate is intentionally IO-free: it parses and resolves configuration provided as strings.

#![forbid(unsafe_code)]

mod model;
mod resolve;

pub use model::{
    BomauditConfigV1, CrawlConfig, LogConfig, PathsConfig, TaggerConfig, UsageConfig,
};
pub use resolve::{
    CrawlSettings, LogFormat, LogSettings, Overrides, ResolvedConfig, TaggerSettings,
};

/// Parse `bomaudit.toml` (or equivalent) into a typed model.
pub fn parse_config_toml(input: &str) -> anyhow::Result<BomauditConfigV1> {
    let cfg: BomauditConfigV1 = toml::from_str(input)?;
    Ok(cfg)
}

/// Resolve the effective config (CLI overrides > config file > built-in defaults).
pub fn resolve_config(
    cfg: BomauditConfigV1,
    overrides: Overrides,
) -> anyhow::Result<ResolvedConfig> {
    resolve::resolve_config(cfg, overrides)
}
