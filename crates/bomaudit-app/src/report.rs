use anyhow::Context;
use bomaudit_render::{
    RenderableReport, RenderableRow, RenderableSkip, RenderableSummary, RenderableVerdict,
};
use bomaudit_types::{AnalyzeLog, ComplianceResult, SCHEMA_COMPLIANCE_V1, Verdict};

pub fn parse_compliance_json(text: &str) -> anyhow::Result<ComplianceResult> {
    let value: serde_json::Value = serde_json::from_str(text).context("parse report json")?;

    let schema = value
        .get("schema")
        .and_then(|v| v.as_str())
        .unwrap_or_default()
        .to_string();
    if schema != SCHEMA_COMPLIANCE_V1 {
        anyhow::bail!("unknown report schema: {schema:?} (expected {SCHEMA_COMPLIANCE_V1})");
    }
    serde_json::from_value(value).context("parse compliance result")
}

pub fn serialize_compliance(result: &ComplianceResult) -> anyhow::Result<Vec<u8>> {
    serde_json::to_vec_pretty(result).context("serialize compliance result")
}

pub fn serialize_analyze_log(log: &AnalyzeLog) -> anyhow::Result<Vec<u8>> {
    serde_json::to_vec_pretty(log).context("serialize analyze log")
}

pub fn to_renderable(result: &ComplianceResult) -> RenderableReport {
    let rows = result
        .findings()
        .map(|(category, f)| RenderableRow {
            label: category.label().to_string(),
            participants: f.finding.participants(),
            verdict: renderable_verdict(f.verdict),
            qualifiers: f.qualifiers.clone(),
        })
        .collect();

    let skipped = result
        .skipped
        .iter()
        .map(|s| RenderableSkip {
            label: s.finding.category().label().to_string(),
            participants: s.finding.participants(),
            reason: s.reason.clone(),
        })
        .collect();

    let s = &result.summary;
    RenderableReport {
        artifact: result.artifact.as_ref().map(ToString::to_string),
        scope: result.scope.to_string(),
        rows,
        skipped,
        summary: RenderableSummary {
            detected: s.detected,
            confirmed: s.confirmed,
            undetermined: s.undetermined,
            refuted: s.refuted,
            skipped: s.skipped,
        },
    }
}

fn renderable_verdict(v: Verdict) -> RenderableVerdict {
    match v {
        Verdict::Confirmed => RenderableVerdict::Confirmed,
        Verdict::Undetermined => RenderableVerdict::Undetermined,
        Verdict::Refuted => RenderableVerdict::Refuted,
    }
}
