//! Archive-backed validation of detector findings.
//!
//! Each finding is checked against the literal content of the consuming artifact's extracted
//! archive. Validation only narrows: a finding is either kept with a verdict, refuted, or skipped
//! because its archive could not be probed.

use crate::engine::Detection;
use bomaudit_types::{ArtifactId, Evidence, Finding, Verdict};

/// Which archive a probe runs against.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ProbeTarget {
    /// The audited artifact (the manifest root).
    Root,
    /// A dependency artifact, resolved through the metadata database.
    Dependency(ArtifactId),
}

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum ProbeError {
    #[error("no archive available for {0}")]
    ArchiveMissing(String),
    #[error("failed to extract {archive}: {message}")]
    Extraction { archive: String, message: String },
    #[error("failed to read extracted content of {archive}: {message}")]
    Read { archive: String, message: String },
}

/// Literal reference lookup over an artifact's compiled classes.
pub trait ArchiveProbe {
    /// Class entries of `target` whose content references `reference`, empty when none does.
    fn referencing_classes(
        &mut self,
        target: &ProbeTarget,
        reference: &str,
    ) -> Result<Vec<String>, ProbeError>;
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CheckedFinding {
    pub finding: Finding,
    pub verdict: Verdict,
    pub evidence: Evidence,
    pub qualifiers: Vec<String>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SkippedProbe {
    pub finding: Finding,
    pub reason: String,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Validation {
    /// One entry per probed finding, in detection order, refuted ones included.
    pub checked: Vec<CheckedFinding>,
    pub skipped: Vec<SkippedProbe>,
}

impl Validation {
    pub fn retained(&self) -> impl Iterator<Item = &CheckedFinding> {
        self.checked
            .iter()
            .filter(|c| c.verdict != Verdict::Refuted)
    }

    pub fn count(&self, verdict: Verdict) -> usize {
        self.checked.iter().filter(|c| c.verdict == verdict).count()
    }
}

pub fn validate(detection: &Detection, probe: &mut dyn ArchiveProbe) -> Validation {
    let mut out = Validation::default();

    for finding in &detection.findings {
        let target = target_for(detection, finding.consumer());
        let outcome = match finding {
            Finding::MissingDirect(r) => check_missing(detection, probe, &target, finding, &r.usage),
            Finding::MissingTransitive(r) | Finding::MissingTransitiveSharedParent(r) => {
                check_missing(detection, probe, &target, finding, &r.usage)
            }
            Finding::IncorrectDirect(r) => {
                check_incorrect(detection, probe, &target, finding, &r.provided_packages)
            }
            Finding::IncorrectTransitive(r) | Finding::IncorrectTransitiveSharedParent(r) => {
                check_incorrect(detection, probe, &target, finding, &r.provided_packages)
            }
        };

        match outcome {
            Ok(checked) => out.checked.push(checked),
            Err(err) => out.skipped.push(SkippedProbe {
                finding: finding.clone(),
                reason: err.to_string(),
            }),
        }
    }

    out
}

fn target_for(detection: &Detection, consumer: &ArtifactId) -> ProbeTarget {
    if detection.root.as_ref() == Some(consumer) {
        ProbeTarget::Root
    } else {
        ProbeTarget::Dependency(consumer.clone())
    }
}

/// The consumer claims to use `usage`. Absent from its classes means the usage signal was wrong.
fn check_missing(
    detection: &Detection,
    probe: &mut dyn ArchiveProbe,
    target: &ProbeTarget,
    finding: &Finding,
    usage: &str,
) -> Result<CheckedFinding, ProbeError> {
    let mut evidence = Evidence::default();
    let classes = probe.referencing_classes(target, usage)?;
    if classes.is_empty() {
        evidence.not_found.push(usage.to_string());
        return Ok(CheckedFinding {
            finding: finding.clone(),
            verdict: Verdict::Refuted,
            evidence,
            qualifiers: Vec::new(),
        });
    }
    evidence.found.push(usage.to_string());
    evidence.matches.insert(usage.to_string(), classes);

    let qualifiers: Vec<String> = detection
        .uncollected_for(finding.consumer())
        .iter()
        .map(|id| format!("uncollected provider: {id}"))
        .collect();
    let verdict = if qualifiers.is_empty() {
        Verdict::Confirmed
    } else {
        Verdict::Undetermined
    };

    Ok(CheckedFinding {
        finding: finding.clone(),
        verdict,
        evidence,
        qualifiers,
    })
}

/// The dependency is suspected unused. Any provided package referenced by the consumer refutes it.
fn check_incorrect(
    detection: &Detection,
    probe: &mut dyn ArchiveProbe,
    target: &ProbeTarget,
    finding: &Finding,
    provided: &[String],
) -> Result<CheckedFinding, ProbeError> {
    let mut evidence = Evidence::default();
    // A blank package name is a substring of everything.
    for package in provided.iter().filter(|p| !p.trim().is_empty()) {
        let classes = probe.referencing_classes(target, package)?;
        if classes.is_empty() {
            evidence.not_found.push(package.clone());
        } else {
            evidence.found.push(package.clone());
            evidence.matches.insert(package.clone(), classes);
        }
    }

    if !evidence.found.is_empty() {
        return Ok(CheckedFinding {
            finding: finding.clone(),
            verdict: Verdict::Refuted,
            evidence,
            qualifiers: Vec::new(),
        });
    }

    let qualifiers: Vec<String> = detection
        .unresolved_for(finding.consumer())
        .iter()
        .map(|r| format!("unresolved reference: {r}"))
        .collect();
    let verdict = if qualifiers.is_empty() {
        Verdict::Confirmed
    } else {
        Verdict::Undetermined
    };

    Ok(CheckedFinding {
        finding: finding.clone(),
        verdict,
        evidence,
        qualifiers,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::policy::SearchScope;
    use crate::test_support::{FakeProbe, id};
    use bomaudit_types::{IncorrectDirectRecord, MissingDirectRecord, MissingTransitiveRecord};

    fn detection(findings: Vec<Finding>) -> Detection {
        let mut det = Detection::new(SearchScope::Global, Some(id("r")));
        det.findings = findings;
        det
    }

    fn missing_direct(usage: &str) -> Finding {
        Finding::MissingDirect(MissingDirectRecord {
            artifact: id("r"),
            usage: usage.to_string(),
        })
    }

    fn incorrect_direct(dep: &str, provided: &[&str]) -> Finding {
        Finding::IncorrectDirect(IncorrectDirectRecord {
            artifact: id("r"),
            dependency: id(dep),
            provided_packages: provided.iter().map(|p| p.to_string()).collect(),
        })
    }

    #[test]
    fn missing_usage_absent_from_archive_is_refuted() {
        let det = detection(vec![missing_direct("p")]);
        let mut probe = FakeProbe::default();
        let v = validate(&det, &mut probe);
        assert_eq!(v.checked[0].verdict, Verdict::Refuted);
        assert_eq!(v.retained().count(), 0);
    }

    #[test]
    fn missing_usage_found_is_confirmed() {
        let det = detection(vec![missing_direct("p")]);
        let mut probe = FakeProbe::default().with(ProbeTarget::Root, &["p"]);
        let v = validate(&det, &mut probe);
        assert_eq!(v.checked[0].verdict, Verdict::Confirmed);
        assert_eq!(v.checked[0].evidence.found, vec!["p".to_string()]);
        assert_eq!(
            v.checked[0].evidence.matches.get("p"),
            Some(&vec!["p.class".to_string()])
        );
    }

    #[test]
    fn missing_usage_with_uncollected_provider_is_undetermined() {
        let mut det = detection(vec![missing_direct("p")]);
        det.uncollected.first_level.push(id("b"));
        let mut probe = FakeProbe::default().with(ProbeTarget::Root, &["p"]);
        let v = validate(&det, &mut probe);
        assert_eq!(v.checked[0].verdict, Verdict::Undetermined);
        assert_eq!(
            v.checked[0].qualifiers,
            vec!["uncollected provider: org.example|b|1.0".to_string()]
        );
    }

    #[test]
    fn missing_transitive_probes_the_node_archive() {
        let finding = Finding::MissingTransitive(MissingTransitiveRecord {
            node: id("s"),
            usage: "q".to_string(),
        });
        let det = detection(vec![finding]);
        let mut probe = FakeProbe::default().with(ProbeTarget::Dependency(id("s")), &["q"]);
        let v = validate(&det, &mut probe);
        assert_eq!(v.checked[0].verdict, Verdict::Confirmed);
        assert_eq!(
            probe.calls,
            vec![(ProbeTarget::Dependency(id("s")), "q".to_string())]
        );
    }

    #[test]
    fn incorrect_direct_with_no_reference_is_confirmed() {
        let det = detection(vec![incorrect_direct("a", &["x.y.Z"])]);
        let mut probe = FakeProbe::default();
        let v = validate(&det, &mut probe);
        assert_eq!(v.checked[0].verdict, Verdict::Confirmed);
        assert_eq!(v.checked[0].evidence.not_found, vec!["x.y.Z".to_string()]);
    }

    #[test]
    fn incorrect_direct_with_reference_is_refuted() {
        let det = detection(vec![incorrect_direct("a", &["x.y", "x.z"])]);
        let mut probe = FakeProbe::default().with(ProbeTarget::Root, &["x.z"]);
        let v = validate(&det, &mut probe);
        assert_eq!(v.checked[0].verdict, Verdict::Refuted);
        assert_eq!(v.checked[0].evidence.found, vec!["x.z".to_string()]);
        assert_eq!(v.checked[0].evidence.not_found, vec!["x.y".to_string()]);
        assert_eq!(v.checked[0].evidence.matches.len(), 1);
        assert!(v.checked[0].evidence.matches.contains_key("x.z"));
    }

    #[test]
    fn blank_provided_package_never_refutes() {
        let det = detection(vec![incorrect_direct("a", &["", " ", "x.y"])]);
        let mut archive = FakeProbe::default().with(ProbeTarget::Root, &["", " "]);
        let v = validate(&det, &mut archive);
        assert_eq!(v.checked[0].verdict, Verdict::Confirmed);
        assert_eq!(v.checked[0].evidence.not_found, vec!["x.y".to_string()]);
        assert!(v.checked[0].evidence.found.is_empty());
        assert_eq!(archive.calls, vec![(ProbeTarget::Root, "x.y".to_string())]);
    }

    #[test]
    fn incorrect_direct_with_unresolved_references_is_undetermined() {
        let mut det = detection(vec![incorrect_direct("a", &["x.y"])]);
        det.unresolved.first_level.push("Class.forName(name)".to_string());
        let mut probe = FakeProbe::default();
        let v = validate(&det, &mut probe);
        assert_eq!(v.checked[0].verdict, Verdict::Undetermined);
    }

    #[test]
    fn probe_failure_skips_only_that_finding() {
        let det = detection(vec![
            Finding::MissingTransitive(MissingTransitiveRecord {
                node: id("broken"),
                usage: "q".to_string(),
            }),
            missing_direct("p"),
        ]);
        let mut probe = FakeProbe::default()
            .with(ProbeTarget::Root, &["p"])
            .failing(ProbeTarget::Dependency(id("broken")));
        let v = validate(&det, &mut probe);
        assert_eq!(v.skipped.len(), 1);
        assert!(v.skipped[0].reason.contains("broken"));
        assert_eq!(v.checked.len(), 1);
        assert_eq!(v.checked[0].verdict, Verdict::Confirmed);
    }
}
