//! The `explain` use case: look up finding category documentation.

use bomaudit_types::explain::{self, Explanation};

/// Output from the explain use case.
#[derive(Clone, Debug)]
pub enum ExplainOutput {
    /// Found an explanation for the identifier.
    Found(Explanation),
    /// Unknown identifier; includes the available codes.
    NotFound {
        identifier: String,
        available_codes: Vec<&'static str>,
    },
}

/// Look up an explanation for a code (`M1`) or label (`M1:Missing Direct Dependency`).
pub fn run_explain(identifier: &str) -> ExplainOutput {
    match explain::lookup_explanation(identifier) {
        Some(exp) => ExplainOutput::Found(exp),
        None => ExplainOutput::NotFound {
            identifier: identifier.to_string(),
            available_codes: explain::all_codes(),
        },
    }
}

/// Format an explanation for terminal display.
pub fn format_explanation(exp: &Explanation) -> String {
    let mut out = String::new();

    out.push_str(exp.label);
    out.push('\n');
    out.push_str(&"=".repeat(exp.label.len()));
    out.push_str("\n\n");
    out.push_str(exp.description);
    out.push_str("\n\n");
    out.push_str("Validation\n");
    out.push_str("----------\n");
    out.push_str(exp.validation);
    out.push_str("\n\n");
    out.push_str("Remediation\n");
    out.push_str("-----------\n");
    out.push_str(exp.remediation);
    out.push('\n');

    out
}

/// Format the "not found" error message for terminal display.
pub fn format_not_found(identifier: &str, codes: &[&'static str]) -> String {
    let mut out = String::new();

    out.push_str(&format!("Unknown category code or label: {identifier}\n\n"));
    out.push_str("Available codes:\n");
    for code in codes {
        out.push_str(&format!("  - {code}\n"));
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn explain_accepts_codes_and_labels() {
        for identifier in ["N3", "n3", "N3:Incorrect Transitive Relationship"] {
            match run_explain(identifier) {
                ExplainOutput::Found(exp) => assert_eq!(exp.code, "N3"),
                ExplainOutput::NotFound { .. } => panic!("{identifier} should resolve"),
            }
        }
    }

    #[test]
    fn explain_unknown_lists_codes() {
        let ExplainOutput::NotFound {
            identifier,
            available_codes,
        } = run_explain("Z9")
        else {
            panic!("Z9 should not resolve");
        };
        let text = format_not_found(&identifier, &available_codes);
        assert!(text.contains("Unknown category code or label: Z9"));
        for code in ["M1", "M2", "M3", "N1", "N2", "N3"] {
            assert!(text.contains(&format!("  - {code}\n")), "{code} missing");
        }
    }

    #[test]
    fn formatted_explanation_has_all_sections() {
        let ExplainOutput::Found(exp) = run_explain("M1") else {
            panic!("M1 should resolve");
        };
        let text = format_explanation(&exp);
        assert!(text.starts_with("M1:Missing Direct Dependency\n===="));
        assert!(text.contains("\nValidation\n"));
        assert!(text.contains("\nRemediation\n"));
    }
}
