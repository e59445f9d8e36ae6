pub use bomaudit_types::SearchScope;

/// JDK and runtime namespaces never attributed to a declared dependency.
pub const DEFAULT_SKIP_PREFIXES: &[&str] = &[
    "java.",
    "javax.",
    "sun.misc",
    "org.xml.sax",
    "sun.nio.ch",
    "org.w3c.dom",
    "com.sun.",
];

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AuditPolicy {
    pub scope: SearchScope,
    /// Used packages starting with any of these are ignored.
    pub skip_prefixes: Vec<String>,
}

impl AuditPolicy {
    pub fn with_scope(scope: SearchScope) -> Self {
        Self {
            scope,
            ..Self::default()
        }
    }
}

impl Default for AuditPolicy {
    fn default() -> Self {
        Self {
            scope: SearchScope::Global,
            skip_prefixes: DEFAULT_SKIP_PREFIXES
                .iter()
                .map(|p| p.to_string())
                .collect(),
        }
    }
}
