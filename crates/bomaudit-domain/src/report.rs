use crate::engine::Detection;
use crate::fingerprint::fingerprint_for_finding;
use crate::validate::Validation;
use bomaudit_types::{
    AnalyzeLog, ComplianceResult, FindingCategory, SkippedFinding, ValidatedFinding, Verdict,
};

/// One line of the human review table.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ComplianceRow {
    pub category: FindingCategory,
    pub participants: String,
    pub verdict: Verdict,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AssembledReport {
    pub analyze_log: AnalyzeLog,
    pub compliance: ComplianceResult,
    pub rows: Vec<ComplianceRow>,
}

/// Merge detector and validator output. No decisions are made here.
pub fn assemble(detection: &Detection, validation: &Validation) -> AssembledReport {
    let mut analyze_log = AnalyzeLog::empty(detection.scope, detection.root.clone());
    for finding in &detection.findings {
        analyze_log.record(finding.clone());
    }
    analyze_log.uncollected = detection.uncollected.clone();
    analyze_log.unresolved = detection.unresolved.clone();

    let mut compliance = ComplianceResult::empty(detection.scope, detection.root.clone());
    for checked in validation.retained() {
        compliance
            .category_mut(checked.finding.category())
            .findings
            .push(ValidatedFinding {
                fingerprint: fingerprint_for_finding(&checked.finding),
                finding: checked.finding.clone(),
                verdict: checked.verdict,
                evidence: checked.evidence.clone(),
                qualifiers: checked.qualifiers.clone(),
            });
    }
    compliance.skipped = validation
        .skipped
        .iter()
        .map(|s| SkippedFinding {
            fingerprint: fingerprint_for_finding(&s.finding),
            finding: s.finding.clone(),
            reason: s.reason.clone(),
        })
        .collect();

    compliance.summary.detected = detection.findings.len() as u32;
    compliance.summary.confirmed = validation.count(Verdict::Confirmed) as u32;
    compliance.summary.undetermined = validation.count(Verdict::Undetermined) as u32;
    compliance.summary.refuted = validation.count(Verdict::Refuted) as u32;
    compliance.summary.skipped = validation.skipped.len() as u32;

    let rows = compliance
        .findings()
        .map(|(category, f)| ComplianceRow {
            category,
            participants: f.finding.participants(),
            verdict: f.verdict,
        })
        .collect();

    AssembledReport {
        analyze_log,
        compliance,
        rows,
    }
}
