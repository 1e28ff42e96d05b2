//! Domain entities shown in the screen tables and returned by providers.

use std::fmt;

/// Suffix appended to the display name of entries that are not selectable yet.
pub const COMING_SOON_SUFFIX: &str = " (Coming Soon)";

fn display_name(name: &str, available: bool) -> String {
    if available {
        name.to_string()
    } else {
        format!("{name}{COMING_SOON_SUFFIX}")
    }
}

/// A cloud vendor offered on the first screen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CloudProvider {
    pub id: String,
    pub name: String,
    pub description: String,
    pub available: bool,
}

impl CloudProvider {
    pub fn new(id: &str, name: &str, description: &str, available: bool) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            description: description.to_string(),
            available,
        }
    }

    /// Name as rendered in the table, including the "(Coming Soon)" marker.
    pub fn display_name(&self) -> String {
        display_name(&self.name, self.available)
    }
}

/// A cloud service such as CodePipeline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Service {
    pub id: String,
    pub name: String,
    pub description: String,
    pub available: bool,
}

impl Service {
    pub fn new(id: &str, name: &str, description: &str, available: bool) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            description: description.to_string(),
            available,
        }
    }

    /// Name as rendered in the table, including the "(Coming Soon)" marker.
    pub fn display_name(&self) -> String {
        display_name(&self.name, self.available)
    }
}

/// A grouping of operations inside a service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Category {
    pub id: String,
    pub name: String,
    pub description: String,
    pub available: bool,
}

impl Category {
    pub fn new(id: &str, name: &str, description: &str, available: bool) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            description: description.to_string(),
            available,
        }
    }

    /// Name as rendered in the table, including the "(Coming Soon)" marker.
    pub fn display_name(&self) -> String {
        display_name(&self.name, self.available)
    }
}

/// An operator-facing operation (e.g. "Pipeline Approvals").
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Operation {
    pub id: String,
    pub name: String,
    pub description: String,
}

impl Operation {
    pub fn new(id: &str, name: &str, description: &str) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            description: description.to_string(),
        }
    }
}

/// A manual approval gate that is currently waiting on a decision.
///
/// Approvals are identified by the `(pipeline, stage, action)` triple; the
/// token is only needed when submitting the result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApprovalAction {
    pub pipeline_name: String,
    pub stage_name: String,
    pub action_name: String,
    pub token: String,
}

impl ApprovalAction {
    pub fn key(&self) -> (&str, &str, &str) {
        (&self.pipeline_name, &self.stage_name, &self.action_name)
    }

    /// Returns true when `row` holds this approval's pipeline, stage and action.
    pub fn matches_row(&self, row: &[String]) -> bool {
        match row {
            [pipeline, stage, action, ..] => self.key() == (pipeline.as_str(), stage.as_str(), action.as_str()),
            _ => false,
        }
    }
}

impl fmt::Display for ApprovalAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}/{}", self.pipeline_name, self.stage_name, self.action_name)
    }
}

/// Latest known state of one pipeline stage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StageStatus {
    pub name: String,
    pub status: String,
    pub last_updated: String,
}

/// A pipeline and its stages in declaration order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PipelineStatus {
    pub name: String,
    pub stages: Vec<StageStatus>,
}

impl PipelineStatus {
    pub fn stage_summary(&self) -> String {
        format!("{} stages", self.stages.len())
    }
}

/// Credentials scope a provider adapter is constructed for.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ProviderContext {
    pub profile: String,
    pub region: String,
}

impl ProviderContext {
    pub fn new(profile: impl Into<String>, region: impl Into<String>) -> Self {
        Self {
            profile: profile.into(),
            region: region.into(),
        }
    }
}

impl fmt::Display for ProviderContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.profile, self.region)
    }
}
