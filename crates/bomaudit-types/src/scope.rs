use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Where a used package may be provided from.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema,
)]
#[serde(rename_all = "lowercase")]
pub enum SearchScope {
    /// Any artifact in the manifest may provide the package.
    #[default]
    Global,
    /// Only the comparison layer (direct children, or the node's own children) may provide it.
    Layer,
}

impl SearchScope {
    pub fn as_str(self) -> &'static str {
        match self {
            SearchScope::Global => "global",
            SearchScope::Layer => "layer",
        }
    }
}

impl fmt::Display for SearchScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SearchScope {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "global" => Ok(SearchScope::Global),
            "layer" => Ok(SearchScope::Layer),
            other => Err(format!("unknown scope: {other} (expected global or layer)")),
        }
    }
}
