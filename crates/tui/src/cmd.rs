//! # Task Execution Layer
//!
//! This module is the boundary where the pure navigation core meets the
//! cloud. Navigation returns a [`Task`] descriptor; the runtime hands it to
//! [`spawn_task`], which runs [`run_task`] on the Tokio runtime.
//!
//! Every task builds a fresh adapter from the profile and region captured in
//! the descriptor, invokes exactly one capability and resolves to exactly one
//! [`TaskOutcome`]. Fetch outcomes report the scope of the adapter that
//! served them. The adapter is dropped when the task completes.
//!
//! This follows a **functional core, imperative shell** pattern: state
//! updates are pure, tasks carry the side effects.

use std::sync::Arc;

use cloudgate_api::{ProviderAdapter, ProviderFactory};
use cloudgate_types::{ProviderContext, ProviderError, Task, TaskOutcome};
use tokio::task::{JoinError, JoinHandle, spawn};
use tracing::{info, warn};

/// Spawn `task` on the runtime. The handle resolves to its outcome.
pub fn spawn_task(factory: Arc<dyn ProviderFactory>, task: Task) -> JoinHandle<TaskOutcome> {
    spawn(async move { run_task(factory.as_ref(), task).await })
}

/// Convert a failed join into the outcome posted to the model.
pub fn crashed(error: JoinError) -> TaskOutcome {
    warn!(%error, "task worker failed");
    TaskOutcome::Crashed(format!("Execution task failed: {error}"))
}

/// Run one task to completion.
pub async fn run_task(factory: &dyn ProviderFactory, task: Task) -> TaskOutcome {
    info!(task = task.label(), provider = %task.provider(), "task started");
    let outcome = match task {
        Task::FetchApprovals(requested) => match construct(factory, &requested) {
            Ok(adapter) => TaskOutcome::Approvals {
                provider: adapter.context().clone(),
                result: adapter.list_pending_approvals().await,
            },
            Err(error) => TaskOutcome::Approvals {
                provider: requested,
                result: Err(error),
            },
        },
        Task::FetchPipelines(requested) => match construct(factory, &requested) {
            Ok(adapter) => TaskOutcome::Pipelines {
                provider: adapter.context().clone(),
                result: adapter.list_pipelines().await,
            },
            Err(error) => TaskOutcome::Pipelines {
                provider: requested,
                result: Err(error),
            },
        },
        Task::ExecuteApproval {
            provider,
            approval,
            approve,
            comment,
        } => {
            let result = match construct(factory, &provider) {
                Ok(adapter) => adapter.submit_approval(&approval, approve, &comment).await,
                Err(error) => Err(error),
            };
            TaskOutcome::ApprovalResult(result)
        }
        Task::ExecutePipeline {
            provider,
            pipeline_name,
            commit_id,
        } => {
            let result = match construct(factory, &provider) {
                Ok(adapter) => adapter.start_pipeline_execution(&pipeline_name, &commit_id).await,
                Err(error) => Err(error),
            };
            TaskOutcome::PipelineExecution(result)
        }
    };
    log_outcome(&outcome);
    outcome
}

fn construct(factory: &dyn ProviderFactory, provider: &ProviderContext) -> Result<Box<dyn ProviderAdapter>, ProviderError> {
    factory.construct(&provider.profile, &provider.region)
}

fn log_outcome(outcome: &TaskOutcome) {
    let failure = match outcome {
        TaskOutcome::Approvals { result, .. } => result.as_ref().err(),
        TaskOutcome::Pipelines { result, .. } => result.as_ref().err(),
        TaskOutcome::ApprovalResult(result) | TaskOutcome::PipelineExecution(result) => result.as_ref().err(),
        TaskOutcome::Crashed(_) => None,
    };
    match failure {
        Some(error) => warn!(%error, "task failed"),
        None => info!("task finished"),
    }
}
