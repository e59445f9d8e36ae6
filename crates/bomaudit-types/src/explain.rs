//! Explain registry for finding categories.
//!
//! Maps category codes and labels to human-readable explanations with remediation guidance.

use crate::FindingCategory;

/// Explanation entry for a finding category.
#[derive(Debug, Clone)]
pub struct Explanation {
    pub code: &'static str,
    pub label: &'static str,
    /// What the detector compares and when it fires.
    pub description: &'static str,
    /// How validation decides the verdict.
    pub validation: &'static str,
    /// How to fix the manifest.
    pub remediation: &'static str,
}

/// Look up an explanation by code (`M1`) or label (`M1:Missing Direct Dependency`).
///
/// Returns `None` if the identifier is not recognized.
pub fn lookup_explanation(identifier: &str) -> Option<Explanation> {
    FindingCategory::from_code_or_label(identifier).map(explain)
}

/// List all known codes.
pub fn all_codes() -> Vec<&'static str> {
    FindingCategory::ALL.iter().map(|c| c.code()).collect()
}

pub fn explain(category: FindingCategory) -> Explanation {
    let (description, validation, remediation) = match category {
        FindingCategory::MissingDirect => (
            "\
The audited artifact uses a package that none of its providers export. Under the `global`
scope every artifact in the manifest counts as a provider; under `layer` only the direct
dependencies do.",
            "\
The audited archive is searched for the package. Not found means the usage metadata was wrong
and the finding is dropped. Found with uncollected direct dependencies is `undetermined`,
otherwise `confirmed`.",
            "Declare the artifact that provides the package as a direct dependency.",
        ),
        FindingCategory::MissingTransitive => (
            "\
A second-level artifact uses a package that none of its providers export, and the node has a
single declared parent.",
            "\
The second-level archive is searched for the package. Not found drops the finding; found with
uncollected children is `undetermined`, otherwise `confirmed`.",
            "Declare the providing artifact as a dependency of the second-level artifact.",
        ),
        FindingCategory::MissingTransitiveRelationship => (
            "\
Same signal as M2, but the node has several declared parents or a sibling subtree already
provides the package. The gap may come from which parent edge was walked rather than a missing
declaration.",
            "Validated exactly like M2.",
            "Check which parent should own the dependency and declare it on that edge.",
        ),
        FindingCategory::IncorrectDirect => (
            "\
A direct dependency provides packages, the audited artifact uses packages, and the two sets do
not overlap on their leading segment.",
            "\
The audited archive is searched for each provided package. Any hit means the dependency is
used after all and the finding is dropped. No hit with unresolved dynamic references is
`undetermined`, otherwise `confirmed`.",
            "Remove the dependency declaration or replace it with the artifact actually used.",
        ),
        FindingCategory::IncorrectTransitive => (
            "\
A second-level artifact declares a child whose provided packages it never uses. The child has a
single declared parent.",
            "\
The second-level archive is searched for each provided package of the child; any hit drops the
finding.",
            "Remove the edge from the second-level artifact to the unused child.",
        ),
        FindingCategory::IncorrectTransitiveRelationship => (
            "\
Same signal as N2, but the child is reached through several parents, so a single edge cannot be
blamed.",
            "Validated exactly like N2.",
            "Review every parent of the child and drop the edges that do not use it.",
        ),
    };

    Explanation {
        code: category.code(),
        label: category.label(),
        description,
        validation,
        remediation,
    }
}
