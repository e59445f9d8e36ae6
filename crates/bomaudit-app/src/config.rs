//! Configuration loading: file text to [`ResolvedConfig`].

use anyhow::Context;
use bomaudit_settings::{BomauditConfigV1, Overrides, ResolvedConfig};
use camino::Utf8Path;
use tracing::debug;

/// Parse and resolve config text. Empty text means built-in defaults.
pub fn resolve_from_text(config_text: &str, overrides: Overrides) -> anyhow::Result<ResolvedConfig> {
    let cfg = if config_text.trim().is_empty() {
        BomauditConfigV1::default()
    } else {
        bomaudit_settings::parse_config_toml(config_text).context("parse config")?
    };
    bomaudit_settings::resolve_config(cfg, overrides).context("resolve config")
}

/// Read `path` (a missing file is the same as an empty one) and resolve it.
pub fn load_config(path: &Utf8Path, overrides: Overrides) -> anyhow::Result<ResolvedConfig> {
    let text = if path.exists() {
        std::fs::read_to_string(path).with_context(|| format!("read config {path}"))?
    } else {
        debug!(config = %path, "config file not found; using defaults");
        String::new()
    };
    resolve_from_text(&text, overrides).with_context(|| format!("config {path}"))
}
