//! JSON shapes emitted by `aws codepipeline ... --output json`.

use chrono::{DateTime, Utc};
use serde::Deserialize;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ListPipelinesOutput {
    #[serde(default)]
    pub pipelines: Vec<PipelineSummary>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct PipelineSummary {
    pub name: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct PipelineStateOutput {
    pub pipeline_name: String,
    #[serde(default)]
    pub stage_states: Vec<StageState>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct StageState {
    pub stage_name: String,
    #[serde(default)]
    pub action_states: Vec<ActionState>,
    pub latest_execution: Option<StageExecution>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct StageExecution {
    pub status: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ActionState {
    pub action_name: String,
    pub latest_execution: Option<ActionExecution>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ActionExecution {
    pub status: Option<String>,
    pub token: Option<String>,
    pub last_status_change: Option<Timestamp>,
}

/// The CLI prints timestamps as ISO-8601 text or as epoch seconds depending on
/// `cli_timestamp_format`.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub(crate) enum Timestamp {
    Text(String),
    Epoch(f64),
}

impl Timestamp {
    pub fn to_utc(&self) -> Option<DateTime<Utc>> {
        match self {
            Timestamp::Text(text) => DateTime::parse_from_rfc3339(text.trim())
                .ok()
                .map(|parsed| parsed.with_timezone(&Utc)),
            Timestamp::Epoch(seconds) => {
                let whole = seconds.trunc() as i64;
                let nanos = (seconds.fract() * 1e9).round() as u32;
                DateTime::from_timestamp(whole, nanos.min(999_999_999))
            }
        }
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct GetPipelineOutput {
    pub pipeline: PipelineDeclaration,
}

#[derive(Debug, Deserialize)]
pub(crate) struct PipelineDeclaration {
    #[serde(default)]
    pub stages: Vec<StageDeclaration>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct StageDeclaration {
    #[serde(default)]
    pub actions: Vec<ActionDeclaration>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ActionDeclaration {
    pub name: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct StartExecutionOutput {
    pub pipeline_execution_id: Option<String>,
}
