//! Stable identifiers for finding categories.
//!
//! `code` is the short discriminator (`M1`, `N2`, ...). `label` is the human form used as the key
//! in `compliance_result.json` and in the review table.

// Missing declarations
pub const CODE_MISSING_DIRECT: &str = "M1";
pub const CODE_MISSING_TRANSITIVE: &str = "M2";
pub const CODE_MISSING_TRANSITIVE_RELATIONSHIP: &str = "M3";

// False declarations
pub const CODE_INCORRECT_DIRECT: &str = "N1";
pub const CODE_INCORRECT_TRANSITIVE: &str = "N2";
pub const CODE_INCORRECT_TRANSITIVE_RELATIONSHIP: &str = "N3";

pub const LABEL_MISSING_DIRECT: &str = "M1:Missing Direct Dependency";
pub const LABEL_MISSING_TRANSITIVE: &str = "M2:Missing Transitive Dependency";
pub const LABEL_MISSING_TRANSITIVE_RELATIONSHIP: &str = "M3:Missing Transitive Relationship";
pub const LABEL_INCORRECT_DIRECT: &str = "N1:Incorrect Direct Dependency";
pub const LABEL_INCORRECT_TRANSITIVE: &str = "N2:Incorrect Transitive Dependency";
pub const LABEL_INCORRECT_TRANSITIVE_RELATIONSHIP: &str = "N3:Incorrect Transitive Relationship";

// Tool-level
pub const CODE_RUNTIME_ERROR: &str = "runtime_error";
