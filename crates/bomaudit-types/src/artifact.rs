use schemars::{JsonSchema, Schema, SchemaGenerator};
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::fmt;
use std::str::FromStr;

/// Separator used by the canonical `group|artifact|version` key.
pub const KEY_SEPARATOR: char = '|';

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum PurlError {
    #[error("package url must start with `pkg:`: {0}")]
    MissingScheme(String),
    #[error("package url has no type segment: {0}")]
    MissingType(String),
    #[error("package url has no `@version`: {0}")]
    MissingVersion(String),
    #[error("package url has no group/name pair: {0}")]
    MissingName(String),
    #[error("artifact key must be `group|artifact|version`: {0}")]
    MalformedKey(String),
}

/// Canonical artifact identifier.
///
/// Rendered as `group|artifact|version`; that string is also the key used by the persisted
/// provider directory and the serialized form in every report.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ArtifactId {
    pub group: String,
    pub artifact: String,
    pub version: String,
}

impl ArtifactId {
    pub fn new(
        group: impl Into<String>,
        artifact: impl Into<String>,
        version: impl Into<String>,
    ) -> Self {
        Self {
            group: group.into(),
            artifact: artifact.into(),
            version: version.into(),
        }
    }

    /// Parse `pkg:<type>/<group>/<artifact>@<version>[?qualifiers][#subpath]`.
    ///
    /// Qualifiers such as `?type=jar` and the subpath are dropped; they never take part in
    /// artifact identity.
    pub fn from_purl(purl: &str) -> Result<Self, PurlError> {
        let trimmed = purl.trim();
        let without_subpath = trimmed.split('#').next().unwrap_or_default();
        let without_qualifiers = without_subpath.split('?').next().unwrap_or_default();

        let rest = without_qualifiers
            .strip_prefix("pkg:")
            .ok_or_else(|| PurlError::MissingScheme(purl.to_string()))?;
        let (ty, coordinates) = rest
            .split_once('/')
            .ok_or_else(|| PurlError::MissingType(purl.to_string()))?;
        if ty.is_empty() {
            return Err(PurlError::MissingType(purl.to_string()));
        }

        let (name_path, version) = coordinates
            .rsplit_once('@')
            .ok_or_else(|| PurlError::MissingVersion(purl.to_string()))?;
        if version.is_empty() {
            return Err(PurlError::MissingVersion(purl.to_string()));
        }

        let (group, artifact) = name_path
            .rsplit_once('/')
            .ok_or_else(|| PurlError::MissingName(purl.to_string()))?;
        if group.is_empty() || artifact.is_empty() {
            return Err(PurlError::MissingName(purl.to_string()));
        }

        Ok(Self::new(group, artifact, version))
    }

    /// `group/artifact/version`, the relative directory used by on-disk layouts.
    pub fn relative_dir(&self) -> String {
        format!("{}/{}/{}", self.group, self.artifact, self.version)
    }
}

impl fmt::Display for ArtifactId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}{sep}{}{sep}{}",
            self.group,
            self.artifact,
            self.version,
            sep = KEY_SEPARATOR
        )
    }
}

impl FromStr for ArtifactId {
    type Err = PurlError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parts: Vec<&str> = s.split(KEY_SEPARATOR).collect();
        match parts.as_slice() {
            [group, artifact, version] if !group.is_empty() && !artifact.is_empty() => {
                Ok(Self::new(*group, *artifact, *version))
            }
            _ => Err(PurlError::MalformedKey(s.to_string())),
        }
    }
}

impl TryFrom<String> for ArtifactId {
    type Error = PurlError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<ArtifactId> for String {
    fn from(value: ArtifactId) -> Self {
        value.to_string()
    }
}

impl JsonSchema for ArtifactId {
    fn schema_name() -> Cow<'static, str> {
        "ArtifactId".into()
    }

    fn json_schema(generator: &mut SchemaGenerator) -> Schema {
        <String as JsonSchema>::json_schema(generator)
    }
}
