//! AWS CodePipeline adapter backed by the AWS CLI.
//!
//! Every capability maps onto one or more `aws codepipeline` sub-commands run
//! with `--profile`, `--region` and `--output json`. Each CLI call is bounded
//! by the adapter's timeout.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use cloudgate_types::{ApprovalAction, PipelineStatus, ProviderContext, ProviderError, StageStatus};
use futures_util::{StreamExt, TryStreamExt, stream};
use serde::de::DeserializeOwned;
use serde_json::json;
use tokio::time::timeout;
use tracing::{debug, info};

use crate::runner::{CommandRunner, ProcessRunner};
use crate::wire::{GetPipelineOutput, ListPipelinesOutput, PipelineStateOutput, StageState, StartExecutionOutput};
use crate::{ProviderAdapter, ProviderFactory};

const PROVIDER_NAME: &str = "aws";
const DEFAULT_CLI: &str = "aws";
const IN_PROGRESS: &str = "InProgress";
const UNKNOWN_STATUS: &str = "Unknown";
const NOT_AVAILABLE: &str = "N/A";
const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";
/// Upper bound on `get-pipeline-state` processes running at once.
const STATE_FETCH_CONCURRENCY: usize = 8;

/// Builds [`AwsCliProvider`]s that share one CLI location, runner and timeout.
#[derive(Clone)]
pub struct AwsCliFactory {
    cli: PathBuf,
    timeout: Duration,
    runner: Arc<dyn CommandRunner>,
}

impl AwsCliFactory {
    /// `cli` defaults to `aws` looked up on `PATH`.
    pub fn new(cli: Option<PathBuf>, timeout: Duration) -> Self {
        Self {
            cli: cli.unwrap_or_else(|| PathBuf::from(DEFAULT_CLI)),
            timeout,
            runner: Arc::new(ProcessRunner),
        }
    }

    /// Replace the process runner (used by tests).
    pub fn with_runner(mut self, runner: Arc<dyn CommandRunner>) -> Self {
        self.runner = runner;
        self
    }
}

impl ProviderFactory for AwsCliFactory {
    fn construct(&self, profile: &str, region: &str) -> Result<Box<dyn ProviderAdapter>, ProviderError> {
        if profile.trim().is_empty() {
            return Err(ProviderError::construction(PROVIDER_NAME, "no AWS profile selected"));
        }
        if region.trim().is_empty() {
            return Err(ProviderError::construction(PROVIDER_NAME, "no AWS region selected"));
        }
        let program = self
            .runner
            .resolve(&self.cli)
            .map_err(|error| ProviderError::construction(PROVIDER_NAME, format!("{error:#}")))?;

        Ok(Box::new(AwsCliProvider {
            context: ProviderContext::new(profile.trim(), region.trim()),
            program,
            timeout: self.timeout,
            runner: Arc::clone(&self.runner),
        }))
    }
}

/// CodePipeline capabilities for one profile and region.
pub struct AwsCliProvider {
    context: ProviderContext,
    program: PathBuf,
    timeout: Duration,
    runner: Arc<dyn CommandRunner>,
}

impl AwsCliProvider {
    async fn codepipeline<T: DeserializeOwned>(&self, operation: &str, subcommand: &str, extra: &[String]) -> Result<T, ProviderError> {
        let mut args = vec!["codepipeline".to_string(), subcommand.to_string()];
        args.extend_from_slice(extra);
        args.extend([
            "--profile".to_string(),
            self.context.profile.clone(),
            "--region".to_string(),
            self.context.region.clone(),
            "--output".to_string(),
            "json".to_string(),
        ]);

        let stdout = timeout(self.timeout, self.runner.run(&self.program, &args))
            .await
            .map_err(|_| ProviderError::capability(operation, format!("timed out after {}s", self.timeout.as_secs())))?
            .map_err(|error| ProviderError::capability(operation, format!("{error:#}")))?;

        // Some sub-commands print nothing on success.
        let body = if stdout.trim().is_empty() { "{}" } else { stdout.as_str() };
        serde_json::from_str(body).map_err(|error| ProviderError::capability(operation, format!("unexpected CLI output: {error}")))
    }

    async fn pipeline_names(&self, operation: &str) -> Result<Vec<String>, ProviderError> {
        let output: ListPipelinesOutput = self.codepipeline(operation, "list-pipelines", &[]).await?;
        Ok(output.pipelines.into_iter().map(|summary| summary.name).collect())
    }

    async fn pipeline_states(&self, operation: &str) -> Result<Vec<PipelineStateOutput>, ProviderError> {
        let names = self.pipeline_names(operation).await?;
        debug!(count = names.len(), "fetching pipeline states");
        // `buffered` keeps the listing order of the results.
        stream::iter(names)
            .map(|name| async move {
                let args = ["--name".to_string(), name];
                self.codepipeline::<PipelineStateOutput>(operation, "get-pipeline-state", &args)
                    .await
            })
            .buffered(STATE_FETCH_CONCURRENCY)
            .try_collect()
            .await
    }

    async fn source_action_name(&self, operation: &str, pipeline_name: &str) -> Result<String, ProviderError> {
        let output: GetPipelineOutput = self
            .codepipeline(operation, "get-pipeline", &["--name".to_string(), pipeline_name.to_string()])
            .await?;
        output
            .pipeline
            .stages
            .into_iter()
            .next()
            .and_then(|stage| stage.actions.into_iter().next())
            .map(|action| action.name)
            .ok_or_else(|| ProviderError::capability(operation, format!("pipeline '{pipeline_name}' has no source action")))
    }
}

#[async_trait]
impl ProviderAdapter for AwsCliProvider {
    fn context(&self) -> &ProviderContext {
        &self.context
    }

    async fn list_pending_approvals(&self) -> Result<Vec<ApprovalAction>, ProviderError> {
        let states = self.pipeline_states("list pending approvals").await?;
        Ok(states.iter().flat_map(pending_approvals).collect())
    }

    async fn list_pipelines(&self) -> Result<Vec<PipelineStatus>, ProviderError> {
        let states = self.pipeline_states("list pipelines").await?;
        Ok(states
            .into_iter()
            .map(|state| PipelineStatus {
                name: state.pipeline_name,
                stages: state.stage_states.iter().map(stage_status).collect(),
            })
            .collect())
    }

    async fn submit_approval(&self, approval: &ApprovalAction, approve: bool, comment: &str) -> Result<(), ProviderError> {
        let status = if approve { "Approved" } else { "Rejected" };
        let result = json!({ "summary": comment, "status": status }).to_string();
        let args = [
            "--pipeline-name".to_string(),
            approval.pipeline_name.clone(),
            "--stage-name".to_string(),
            approval.stage_name.clone(),
            "--action-name".to_string(),
            approval.action_name.clone(),
            "--token".to_string(),
            approval.token.clone(),
            "--result".to_string(),
            result,
        ];
        let _: serde_json::Value = self.codepipeline("submit approval", "put-approval-result", &args).await?;
        info!(%approval, status, "approval result submitted");
        Ok(())
    }

    async fn start_pipeline_execution(&self, pipeline_name: &str, commit_id: &str) -> Result<(), ProviderError> {
        let operation = "start pipeline execution";
        let mut args = vec!["--name".to_string(), pipeline_name.to_string()];
        if !commit_id.is_empty() {
            let action_name = self.source_action_name(operation, pipeline_name).await?;
            let revisions = json!([{
                "actionName": action_name,
                "revisionType": "COMMIT_ID",
                "revisionValue": commit_id,
            }]);
            args.push("--source-revisions".to_string());
            args.push(revisions.to_string());
        }
        let output: StartExecutionOutput = self.codepipeline(operation, "start-pipeline-execution", &args).await?;
        info!(
            pipeline = pipeline_name,
            execution_id = output.pipeline_execution_id.as_deref().unwrap_or("unknown"),
            "pipeline execution started"
        );
        Ok(())
    }
}

fn pending_approvals(state: &PipelineStateOutput) -> Vec<ApprovalAction> {
    state
        .stage_states
        .iter()
        .flat_map(|stage| {
            stage.action_states.iter().filter_map(|action| {
                let execution = action.latest_execution.as_ref()?;
                if execution.status.as_deref() != Some(IN_PROGRESS) {
                    return None;
                }
                let token = execution.token.clone()?;
                Some(ApprovalAction {
                    pipeline_name: state.pipeline_name.clone(),
                    stage_name: stage.stage_name.clone(),
                    action_name: action.action_name.clone(),
                    token,
                })
            })
        })
        .collect()
}

fn stage_status(stage: &StageState) -> StageStatus {
    let status = stage
        .latest_execution
        .as_ref()
        .map(|execution| execution.status.clone())
        .unwrap_or_else(|| UNKNOWN_STATUS.to_string());
    let last_updated = stage
        .action_states
        .iter()
        .filter_map(|action| action.latest_execution.as_ref()?.last_status_change.as_ref()?.to_utc())
        .max()
        .map(format_timestamp)
        .unwrap_or_else(|| NOT_AVAILABLE.to_string());
    StageStatus {
        name: stage.stage_name.clone(),
        status,
        last_updated,
    }
}

fn format_timestamp(timestamp: DateTime<Utc>) -> String {
    timestamp.format(TIMESTAMP_FORMAT).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::{Result, anyhow};
    use std::collections::HashMap;
    use std::path::Path;
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Replays canned CLI output keyed by sub-command and `--name` value.
    #[derive(Default)]
    struct FakeRunner {
        responses: HashMap<String, Result<String, String>>,
        calls: Mutex<Vec<Vec<String>>>,
    }

    impl FakeRunner {
        fn respond(mut self, key: &str, body: &str) -> Self {
            self.responses.insert(key.to_string(), Ok(body.to_string()));
            self
        }

        fn fail(mut self, key: &str, message: &str) -> Self {
            self.responses.insert(key.to_string(), Err(message.to_string()));
            self
        }

        fn calls(&self) -> Vec<Vec<String>> {
            self.calls.lock().expect("calls lock").clone()
        }
    }

    #[async_trait]
    impl CommandRunner for FakeRunner {
        fn resolve(&self, program: &Path) -> Result<PathBuf> {
            Ok(program.to_path_buf())
        }

        async fn run(&self, _program: &Path, args: &[String]) -> Result<String> {
            self.calls.lock().expect("calls lock").push(args.to_vec());
            let subcommand = args.get(1).cloned().unwrap_or_default();
            let name = args
                .iter()
                .position(|arg| arg == "--name")
                .and_then(|index| args.get(index + 1))
                .map(|name| format!("{subcommand}:{name}"));
            let response = name
                .and_then(|key| self.responses.get(&key))
                .or_else(|| self.responses.get(&subcommand))
                .ok_or_else(|| anyhow!("unexpected call: {args:?}"))?;
            response.clone().map_err(|message| anyhow!(message))
        }
    }

    const PIPELINES: &str = r#"{"pipelines": [{"name": "api"}, {"name": "web"}]}"#;
    const API_STATE: &str = r#"{
        "pipelineName": "api",
        "stageStates": [
            {
                "stageName": "Source",
                "latestExecution": {"pipelineExecutionId": "e1", "status": "Succeeded"},
                "actionStates": [
                    {"actionName": "Checkout", "latestExecution": {"status": "Succeeded", "lastStatusChange": "2024-03-01T10:15:30+00:00"}}
                ]
            },
            {
                "stageName": "Deploy",
                "latestExecution": {"pipelineExecutionId": "e1", "status": "InProgress"},
                "actionStates": [
                    {"actionName": "Approve", "latestExecution": {"status": "InProgress", "token": "tok-1", "lastStatusChange": 1709288130.0}},
                    {"actionName": "Ship", "latestExecution": {"status": "InProgress", "lastStatusChange": "2024-03-01T11:00:00+00:00"}}
                ]
            }
        ]
    }"#;
    const WEB_STATE: &str = r#"{"pipelineName": "web", "stageStates": [{"stageName": "Build", "actionStates": []}]}"#;

    fn provider(runner: Arc<FakeRunner>) -> Box<dyn ProviderAdapter> {
        provider_with(runner)
    }

    fn provider_with(runner: Arc<dyn CommandRunner>) -> Box<dyn ProviderAdapter> {
        AwsCliFactory::new(None, Duration::from_secs(5))
            .with_runner(runner)
            .construct("dev", "us-west-2")
            .expect("construct provider")
    }

    fn listing_runner() -> FakeRunner {
        FakeRunner::default()
            .respond("list-pipelines", PIPELINES)
            .respond("get-pipeline-state:api", API_STATE)
            .respond("get-pipeline-state:web", WEB_STATE)
    }

    #[test]
    fn construction_rejects_missing_profile_or_region() {
        let factory = AwsCliFactory::new(None, Duration::from_secs(5)).with_runner(Arc::new(FakeRunner::default()));
        let error = factory.construct("", "us-west-2").err().expect("missing profile");
        assert!(matches!(error, ProviderError::AdapterConstruction { .. }));
        let error = factory.construct("dev", "  ").err().expect("missing region");
        assert!(matches!(error, ProviderError::AdapterConstruction { .. }));

        let adapter = factory.construct(" dev ", "us-west-2\n").expect("padded scope");
        assert_eq!(adapter.context(), &ProviderContext::new("dev", "us-west-2"));
    }

    #[tokio::test]
    async fn pending_approvals_require_in_progress_with_token() {
        let runner = Arc::new(listing_runner());
        let approvals = provider(runner.clone()).list_pending_approvals().await.expect("approvals");
        assert_eq!(
            approvals,
            vec![ApprovalAction {
                pipeline_name: "api".into(),
                stage_name: "Deploy".into(),
                action_name: "Approve".into(),
                token: "tok-1".into(),
            }]
        );
        let first = &runner.calls()[0];
        assert_eq!(
            first,
            &["codepipeline", "list-pipelines", "--profile", "dev", "--region", "us-west-2", "--output", "json"]
        );
    }

    #[tokio::test]
    async fn pipelines_report_stage_status_and_newest_change() {
        let pipelines = provider(Arc::new(listing_runner())).list_pipelines().await.expect("pipelines");
        assert_eq!(pipelines.len(), 2);
        let api = &pipelines[0];
        assert_eq!(api.name, "api");
        assert_eq!(
            api.stages[1],
            StageStatus {
                name: "Deploy".into(),
                status: "InProgress".into(),
                last_updated: "2024-03-01 11:00:00".into(),
            }
        );
        assert_eq!(pipelines[1].stages[0].status, "Unknown");
        assert_eq!(pipelines[1].stages[0].last_updated, "N/A");
    }

    #[tokio::test]
    async fn submit_approval_sends_status_and_summary() {
        let runner = Arc::new(FakeRunner::default().respond("put-approval-result", r#"{"approvedAt": "2024-03-01T12:00:00+00:00"}"#));
        let approval = ApprovalAction {
            pipeline_name: "api".into(),
            stage_name: "Deploy".into(),
            action_name: "Approve".into(),
            token: "tok-1".into(),
        };
        provider(runner.clone())
            .submit_approval(&approval, false, "bad deploy")
            .await
            .expect("submit");
        let call = &runner.calls()[0];
        let result_index = call.iter().position(|arg| arg == "--result").expect("--result flag");
        let payload: serde_json::Value = serde_json::from_str(&call[result_index + 1]).expect("json payload");
        assert_eq!(payload, json!({"summary": "bad deploy", "status": "Rejected"}));
        assert!(call.windows(2).any(|pair| pair[0] == "--token" && pair[1] == "tok-1"));
    }

    #[tokio::test]
    async fn start_with_commit_targets_the_source_action() {
        let runner = Arc::new(
            FakeRunner::default()
                .respond(
                    "get-pipeline:api",
                    r#"{"pipeline": {"name": "api", "stages": [{"name": "Source", "actions": [{"name": "Checkout"}]}]}}"#,
                )
                .respond("start-pipeline-execution", r#"{"pipelineExecutionId": "e2"}"#),
        );
        provider(runner.clone())
            .start_pipeline_execution("api", "abc123")
            .await
            .expect("start");
        let calls = runner.calls();
        assert_eq!(calls.len(), 2);
        let start = &calls[1];
        let index = start.iter().position(|arg| arg == "--source-revisions").expect("revisions flag");
        let revisions: serde_json::Value = serde_json::from_str(&start[index + 1]).expect("json revisions");
        assert_eq!(
            revisions,
            json!([{"actionName": "Checkout", "revisionType": "COMMIT_ID", "revisionValue": "abc123"}])
        );
    }

    #[tokio::test]
    async fn start_with_latest_commit_skips_revisions() {
        let runner = Arc::new(FakeRunner::default().respond("start-pipeline-execution", r#"{"pipelineExecutionId": "e3"}"#));
        provider(runner.clone()).start_pipeline_execution("api", "").await.expect("start");
        let calls = runner.calls();
        assert_eq!(calls.len(), 1);
        assert!(!calls[0].iter().any(|arg| arg == "--source-revisions"));
    }

    /// Lists `count` pipelines and tracks how many state fetches overlap.
    #[derive(Default)]
    struct CountingRunner {
        count: usize,
        active: AtomicUsize,
        peak: AtomicUsize,
    }

    #[async_trait]
    impl CommandRunner for CountingRunner {
        fn resolve(&self, program: &Path) -> Result<PathBuf> {
            Ok(program.to_path_buf())
        }

        async fn run(&self, _program: &Path, args: &[String]) -> Result<String> {
            if args[1] == "list-pipelines" {
                let pipelines: Vec<_> = (0..self.count).map(|index| json!({ "name": format!("p{index:03}") })).collect();
                return Ok(json!({ "pipelines": pipelines }).to_string());
            }
            let active = self.active.fetch_add(1, Ordering::SeqCst) + 1;
            self.peak.fetch_max(active, Ordering::SeqCst);
            tokio::time::sleep(Duration::from_millis(2)).await;
            self.active.fetch_sub(1, Ordering::SeqCst);
            let name = &args[3];
            Ok(json!({ "pipelineName": name, "stageStates": [] }).to_string())
        }
    }

    #[tokio::test]
    async fn state_fetches_are_bounded_and_ordered() {
        let runner = Arc::new(CountingRunner {
            count: 60,
            ..CountingRunner::default()
        });
        let pipelines = provider_with(runner.clone()).list_pipelines().await.expect("pipelines");

        assert_eq!(pipelines.len(), 60);
        assert_eq!(pipelines[0].name, "p000");
        assert_eq!(pipelines[59].name, "p059");
        let peak = runner.peak.load(Ordering::SeqCst);
        assert!(peak <= STATE_FETCH_CONCURRENCY, "{peak} state fetches ran at once");
        assert!(peak > 1, "state fetches ran sequentially");
    }

    #[tokio::test]
    async fn cli_failures_become_capability_errors() {
        let runner = Arc::new(FakeRunner::default().fail("list-pipelines", "AccessDeniedException"));
        let error = provider(runner).list_pipelines().await.expect_err("failure");
        assert_eq!(error, ProviderError::capability("list pipelines", "AccessDeniedException"));
    }
}
