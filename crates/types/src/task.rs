//! Messages, task descriptors and task outcomes.
//!
//! Navigation never performs I/O itself. When a transition needs the cloud it
//! returns a [`Task`] describing the call; the runtime executes it on a worker
//! and feeds the resulting [`TaskOutcome`] back as [`Msg::TaskCompleted`].

use crate::{ApprovalAction, PipelineStatus, ProviderContext, ProviderError};

/// A deferred provider call requested by a navigation transition.
///
/// Each descriptor carries a snapshot of everything the call needs, so the
/// task does not observe later changes to the application model.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Task {
    FetchApprovals(ProviderContext),
    FetchPipelines(ProviderContext),
    ExecuteApproval {
        provider: ProviderContext,
        approval: ApprovalAction,
        approve: bool,
        comment: String,
    },
    /// An empty `commit_id` starts the pipeline from the source HEAD.
    ExecutePipeline {
        provider: ProviderContext,
        pipeline_name: String,
        commit_id: String,
    },
}

impl Task {
    /// Short label used in logs.
    pub fn label(&self) -> &'static str {
        match self {
            Task::FetchApprovals(_) => "fetch approvals",
            Task::FetchPipelines(_) => "fetch pipelines",
            Task::ExecuteApproval { .. } => "execute approval",
            Task::ExecutePipeline { .. } => "execute pipeline",
        }
    }

    pub fn provider(&self) -> &ProviderContext {
        match self {
            Task::FetchApprovals(provider) | Task::FetchPipelines(provider) => provider,
            Task::ExecuteApproval { provider, .. } | Task::ExecutePipeline { provider, .. } => provider,
        }
    }
}

/// The single result message posted by a finished task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TaskOutcome {
    Approvals {
        provider: ProviderContext,
        result: Result<Vec<ApprovalAction>, ProviderError>,
    },
    Pipelines {
        provider: ProviderContext,
        result: Result<Vec<PipelineStatus>, ProviderError>,
    },
    ApprovalResult(Result<(), ProviderError>),
    PipelineExecution(Result<(), ProviderError>),
    /// The worker running the task panicked or was cancelled.
    Crashed(String),
}

/// Messages that update the application model.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Msg {
    /// Act on the highlighted row or the text input.
    Confirm,
    /// Leave the current screen (or input mode).
    Back,
    /// Move the highlighted row by the given offset.
    MoveSelection(isize),
    /// Highlight the first row.
    SelectFirst,
    /// Highlight the last row.
    SelectLast,
    /// Insert a character into the text input.
    InputChar(char),
    /// Delete the character before the input cursor.
    InputBackspace,
    /// Move the input cursor one character left.
    InputLeft,
    /// Move the input cursor one character right.
    InputRight,
    /// Periodic UI tick (loading throbber).
    Tick,
    /// Terminal resized.
    Resize(u16, u16),
    /// A background task finished.
    TaskCompleted(Box<TaskOutcome>),
}
