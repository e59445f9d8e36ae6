//! Render use cases and output writers.

use anyhow::Context;
use bomaudit_render::RenderableReport;
use camino::Utf8Path;
use serde::Serialize;

pub fn render_table(report: &RenderableReport) -> String {
    bomaudit_render::render_table(report)
}

pub fn render_markdown(report: &RenderableReport) -> String {
    bomaudit_render::render_markdown(report)
}

/// Pretty-printed JSON with a trailing newline; parent directories are created.
pub fn write_json<T: Serialize>(path: &Utf8Path, value: &T) -> anyhow::Result<()> {
    let mut bytes = serde_json::to_vec_pretty(value).with_context(|| format!("serialize {path}"))?;
    bytes.push(b'\n');
    write_bytes(path, &bytes)
}

pub fn write_text(path: &Utf8Path, text: &str) -> anyhow::Result<()> {
    write_bytes(path, text.as_bytes())
}

fn write_bytes(path: &Utf8Path, bytes: &[u8]) -> anyhow::Result<()> {
    if let Some(parent) = path.parent()
        && !parent.as_str().is_empty()
    {
        std::fs::create_dir_all(parent).with_context(|| format!("create {parent}"))?;
    }
    std::fs::write(path, bytes).with_context(|| format!("write {path}"))
}
