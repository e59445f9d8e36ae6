use crate::{RenderableReport, RenderableVerdict};

pub fn render_markdown(report: &RenderableReport) -> String {
    let mut out = String::new();

    out.push_str("# SBOM compliance report\n\n");
    out.push_str(&format!(
        "- Artifact: `{}`\n- Scope: {}\n",
        report.artifact.as_deref().unwrap_or("(no unique root)"),
        report.scope
    ));
    let s = &report.summary;
    out.push_str(&format!(
        "- Findings: {} detected, {} confirmed, {} undetermined, {} refuted, {} skipped\n\n",
        s.detected, s.confirmed, s.undetermined, s.refuted, s.skipped
    ));

    if report.rows.is_empty() {
        out.push_str("No non-compliance found.\n");
    } else {
        out.push_str("## Findings\n\n");
        out.push_str("| Non-Compliance Type | Dependency | Flag |\n");
        out.push_str("|---|---|---|\n");
        for row in &report.rows {
            let flag = match row.verdict {
                RenderableVerdict::Confirmed => "**confirmed**",
                other => other.as_str(),
            };
            out.push_str(&format!(
                "| {} | `{}` | {} |\n",
                escape_cell(&row.label),
                escape_cell(&row.participants),
                flag
            ));
        }

        let qualified: Vec<_> = report
            .rows
            .iter()
            .filter(|r| !r.qualifiers.is_empty())
            .collect();
        if !qualified.is_empty() {
            out.push_str("\n## Undetermined evidence\n\n");
            for row in qualified {
                out.push_str(&format!("- `{}` ({})\n", row.participants, row.label));
                for q in &row.qualifiers {
                    out.push_str(&format!("  - {q}\n"));
                }
            }
        }
    }

    if !report.skipped.is_empty() {
        out.push_str("\n## Skipped\n\n");
        for skip in &report.skipped {
            out.push_str(&format!(
                "- `{}` ({}): {}\n",
                skip.participants, skip.label, skip.reason
            ));
        }
    }

    out
}

fn escape_cell(v: &str) -> String {
    v.replace('|', "\\|")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{RenderableRow, RenderableSkip, RenderableSummary};

    fn empty() -> RenderableReport {
        RenderableReport {
            artifact: None,
            scope: "layer".to_string(),
            rows: Vec::new(),
            skipped: Vec::new(),
            summary: RenderableSummary::default(),
        }
    }

    #[test]
    fn renders_empty_report() {
        let md = render_markdown(&empty());
        assert!(md.contains("(no unique root)"));
        assert!(md.contains("Scope: layer"));
        assert!(md.contains("No non-compliance found."));
        assert!(!md.contains("## Skipped"));
    }

    #[test]
    fn renders_rows_qualifiers_and_skips() {
        let report = RenderableReport {
            artifact: Some("com.app|app|1.0".to_string()),
            scope: "global".to_string(),
            rows: vec![
                RenderableRow {
                    label: "M1:Missing Direct Dependency".to_string(),
                    participants: "org.shared".to_string(),
                    verdict: RenderableVerdict::Confirmed,
                    qualifiers: Vec::new(),
                },
                RenderableRow {
                    label: "N1:Incorrect Direct Dependency".to_string(),
                    participants: "org.example|x|1.0".to_string(),
                    verdict: RenderableVerdict::Undetermined,
                    qualifiers: vec!["unresolved reference: com.dyn.Loader".to_string()],
                },
            ],
            skipped: vec![RenderableSkip {
                label: "M2:Missing Transitive Dependency".to_string(),
                participants: "org.example|a|1.0 -> org.y".to_string(),
                reason: "archive not found for org.example|a|1.0".to_string(),
            }],
            summary: RenderableSummary {
                detected: 4,
                confirmed: 1,
                undetermined: 1,
                refuted: 1,
                skipped: 1,
            },
        };

        insta::assert_snapshot!(render_markdown(&report), @r"
        # SBOM compliance report

        - Artifact: `com.app|app|1.0`
        - Scope: global
        - Findings: 4 detected, 1 confirmed, 1 undetermined, 1 refuted, 1 skipped

        ## Findings

        | Non-Compliance Type | Dependency | Flag |
        |---|---|---|
        | M1:Missing Direct Dependency | `org.shared` | **confirmed** |
        | N1:Incorrect Direct Dependency | `org.example\|x\|1.0` | undetermined |

        ## Undetermined evidence

        - `org.example|x|1.0` (N1:Incorrect Direct Dependency)
          - unresolved reference: com.dyn.Loader

        ## Skipped

        - `org.example|a|1.0 -> org.y` (M2:Missing Transitive Dependency): archive not found for org.example|a|1.0
        ");
    }
}
