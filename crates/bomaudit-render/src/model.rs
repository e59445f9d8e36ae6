#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RenderableVerdict {
    Confirmed,
    Undetermined,
    Refuted,
}

impl RenderableVerdict {
    pub fn as_str(self) -> &'static str {
        match self {
            RenderableVerdict::Confirmed => "confirmed",
            RenderableVerdict::Undetermined => "undetermined",
            RenderableVerdict::Refuted => "refuted",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RenderableRow {
    /// Category label, e.g. `M1:Missing Direct Dependency`.
    pub label: String,
    pub participants: String,
    pub verdict: RenderableVerdict,
    pub qualifiers: Vec<String>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RenderableSkip {
    pub label: String,
    pub participants: String,
    pub reason: String,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RenderableSummary {
    pub detected: u32,
    pub confirmed: u32,
    pub undetermined: u32,
    pub refuted: u32,
    pub skipped: u32,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RenderableReport {
    /// `group|artifact|version` of the audited root, if one was identified.
    pub artifact: Option<String>,
    pub scope: String,
    pub rows: Vec<RenderableRow>,
    pub skipped: Vec<RenderableSkip>,
    pub summary: RenderableSummary,
}
