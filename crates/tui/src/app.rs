//! Application state and the message-driven update function.
//!
//! [`App`] is a plain value. Every handler consumes the current model and
//! returns its successor together with an optional [`Task`] for the runtime
//! to execute. Only the driver loop in `ui::runtime` holds the authoritative
//! instance.

use cloudgate_types::{
    ApprovalAction, Category, Msg, Operation, PipelineStatus, ProviderContext, Screen, Service, Task, TaskOutcome,
};
use tracing::{debug, info, warn};

use crate::navigation;
use crate::screens::{self, START_PIPELINE};
use crate::ui::components::common::TextInputState;

/// Number of frames in the loading throbber.
pub const THROBBER_FRAMES: usize = 10;

/// The complete state of the terminal application.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct App {
    /// Screen currently displayed.
    pub screen: Screen,
    /// Selected AWS profile; empty while unset.
    pub aws_profile: String,
    /// Selected AWS region; empty while unset. Only set once a profile is.
    pub aws_region: String,
    /// When true the text input, not the table, is the source of the next confirm.
    pub manual_input: bool,
    pub text_input: TextInputState,
    /// Profiles discovered at startup.
    pub profiles: Vec<String>,
    /// Regions offered at startup.
    pub regions: Vec<String>,
    pub selected_service: Option<Service>,
    pub selected_category: Option<Category>,
    pub selected_operation: Option<Operation>,
    /// Most recently fetched approvals; `None` until a fetch succeeds.
    pub approvals: Option<Vec<ApprovalAction>>,
    /// Most recently fetched pipelines; `None` until a fetch succeeds.
    pub pipelines: Option<Vec<PipelineStatus>>,
    pub selected_approval: Option<ApprovalAction>,
    pub selected_pipeline: Option<PipelineStatus>,
    pub approve_action: bool,
    pub approval_comment: String,
    pub commit_id: String,
    pub manual_commit_id: bool,
    /// A task is in flight; confirm and back are inert.
    pub is_loading: bool,
    pub loading_msg: String,
    pub last_error: Option<String>,
    /// Highlighted row of the current screen table.
    pub cursor: usize,
    /// Message shown after a successful approval or pipeline start.
    pub acknowledgement: Option<String>,
    /// Scope of the adapter that served the last successful fetch.
    pub provider: Option<ProviderContext>,
    pub throbber_idx: usize,
    pub should_quit: bool,
}

impl App {
    pub fn new(profiles: Vec<String>, regions: Vec<String>) -> Self {
        Self {
            profiles,
            regions,
            ..Self::default()
        }
    }

    /// True when the selected operation is "Start Pipeline".
    pub fn is_start_pipeline(&self) -> bool {
        self.selected_operation
            .as_ref()
            .is_some_and(|operation| operation.name == START_PIPELINE)
    }

    /// Credentials scope for a new task.
    pub fn provider_context(&self) -> ProviderContext {
        ProviderContext::new(self.aws_profile.clone(), self.aws_region.clone())
    }

    /// Switch to `screen` with the first row highlighted.
    pub(crate) fn advance_to(mut self, screen: Screen) -> Self {
        debug!(from = ?self.screen, to = ?screen, "screen transition");
        self.screen = screen;
        self.cursor = 0;
        self.last_error = None;
        self
    }

    /// Enter the text-input sub-mode with a fresh, focused buffer.
    pub(crate) fn begin_manual_input(mut self, placeholder: &str) -> Self {
        self.manual_input = true;
        self.text_input.reset();
        self.text_input.set_placeholder(placeholder);
        self.text_input.focus();
        self
    }

    /// Leave the text-input sub-mode and clear the buffer.
    pub(crate) fn end_manual_input(mut self) -> Self {
        self.manual_input = false;
        self.text_input.reset();
        self.text_input.blur();
        self
    }

    /// Mark a task as in flight.
    pub(crate) fn start_loading(mut self, message: &str) -> Self {
        self.is_loading = true;
        self.loading_msg = message.to_string();
        self.throbber_idx = 0;
        self.last_error = None;
        self
    }

    fn move_cursor(mut self, delta: isize) -> Self {
        let rows = screens::table_for(&self).rows.len();
        if rows == 0 {
            self.cursor = 0;
            return self;
        }
        let last = rows as isize - 1;
        self.cursor = (self.cursor as isize + delta).clamp(0, last) as usize;
        self
    }

    fn apply_outcome(mut self, outcome: TaskOutcome) -> Self {
        self.is_loading = false;
        self.loading_msg.clear();

        match outcome {
            TaskOutcome::Approvals { provider, result } => match result {
                Ok(approvals) => {
                    info!(count = approvals.len(), %provider, "approvals loaded");
                    self.approvals = Some(approvals);
                    self.provider = Some(provider);
                    self.advance_to(Screen::Approvals)
                }
                Err(error) => self.fail(error.to_string()),
            },
            TaskOutcome::Pipelines { provider, result } => match result {
                Ok(pipelines) => {
                    info!(count = pipelines.len(), %provider, "pipelines loaded");
                    self.pipelines = Some(pipelines);
                    self.provider = Some(provider);
                    self.advance_to(Screen::PipelineStatus)
                }
                Err(error) => self.fail(error.to_string()),
            },
            TaskOutcome::ApprovalResult(Ok(())) => {
                let verb = if self.approve_action { "Approved" } else { "Rejected" };
                let acknowledgement = match &self.selected_approval {
                    Some(approval) => format!("{verb} {approval}"),
                    None => verb.to_string(),
                };
                if let (Some(decided), Some(approvals)) = (&self.selected_approval, self.approvals.as_mut()) {
                    approvals.retain(|approval| approval.key() != decided.key());
                }
                self.acknowledge(acknowledgement)
            }
            TaskOutcome::PipelineExecution(Ok(())) => {
                let name = self.selected_pipeline.as_ref().map(|pipeline| pipeline.name.as_str()).unwrap_or_default();
                let acknowledgement = if self.manual_commit_id {
                    format!("Started pipeline {name} at commit {}", self.commit_id)
                } else {
                    format!("Started pipeline {name}")
                };
                self.acknowledge(acknowledgement)
            }
            TaskOutcome::ApprovalResult(Err(error)) | TaskOutcome::PipelineExecution(Err(error)) => self.fail(error.to_string()),
            TaskOutcome::Crashed(reason) => self.fail(reason),
        }
    }

    fn fail(mut self, message: String) -> Self {
        warn!(screen = ?self.screen, error = %message, "task failed");
        self.last_error = Some(message);
        self
    }

    fn acknowledge(mut self, message: String) -> Self {
        info!(%message, "action completed");
        self.approval_comment.clear();
        self.commit_id.clear();
        self.manual_commit_id = false;
        self.selected_approval = None;
        self.selected_pipeline = None;
        self.approve_action = false;
        self.acknowledgement = Some(message);
        let mut app = self.end_manual_input();
        app.cursor = 0;
        app.last_error = None;
        app
    }
}

/// Apply one message to the model.
pub fn update(app: App, msg: Msg) -> (App, Option<Task>) {
    match msg {
        Msg::Confirm => navigation::confirm(app),
        Msg::Back => (navigation::back(app), None),
        Msg::MoveSelection(delta) if !app.manual_input => (app.move_cursor(delta), None),
        Msg::SelectFirst if !app.manual_input => (app.move_cursor(isize::MIN / 2), None),
        Msg::SelectLast if !app.manual_input => (app.move_cursor(isize::MAX / 2), None),
        Msg::InputChar(c) if app.manual_input => (edit(app, |input| input.insert_char(c)), None),
        Msg::InputBackspace if app.manual_input => (edit(app, TextInputState::backspace), None),
        Msg::InputLeft if app.manual_input => (edit(app, TextInputState::move_left), None),
        Msg::InputRight if app.manual_input => (edit(app, TextInputState::move_right), None),
        Msg::Tick if app.is_loading => {
            let mut app = app;
            app.throbber_idx = (app.throbber_idx + 1) % THROBBER_FRAMES;
            (app, None)
        }
        Msg::TaskCompleted(outcome) => (app.apply_outcome(*outcome), None),
        _ => (app, None),
    }
}

fn edit(mut app: App, action: impl FnOnce(&mut TextInputState)) -> App {
    action(&mut app.text_input);
    app
}

#[cfg(test)]
mod tests {
    use super::*;
    use cloudgate_types::ProviderError;

    fn approval(action: &str) -> ApprovalAction {
        ApprovalAction {
            pipeline_name: "p1".into(),
            stage_name: "s1".into(),
            action_name: action.into(),
            token: format!("tok-{action}"),
        }
    }

    #[test]
    fn cursor_is_clamped_to_the_table() {
        let app = App::new(vec!["a".into(), "b".into()], Vec::new());
        let (app, _) = update(app, Msg::MoveSelection(-3));
        assert_eq!(app.cursor, 0);
        let (app, _) = update(app, Msg::SelectLast);
        assert_eq!(app.cursor, 2);
        let (app, _) = update(app, Msg::MoveSelection(5));
        assert_eq!(app.cursor, 2);
        let (app, _) = update(app, Msg::SelectFirst);
        assert_eq!(app.cursor, 0);
    }

    #[test]
    fn typing_is_ignored_outside_manual_input() {
        let app = App::new(Vec::new(), Vec::new());
        let (app, task) = update(app.clone(), Msg::InputChar('x'));
        assert_eq!(app.text_input.input(), "");
        assert!(task.is_none());
    }

    #[test]
    fn tick_only_animates_while_loading() {
        let app = App::new(Vec::new(), Vec::new());
        let (idle, _) = update(app.clone(), Msg::Tick);
        assert_eq!(idle, app);

        let loading = app.start_loading("Loading pipelines...");
        let (loading, _) = update(loading, Msg::Tick);
        assert_eq!(loading.throbber_idx, 1);
    }

    #[test]
    fn failed_fetch_keeps_screen_and_records_error() {
        let mut app = App::new(Vec::new(), Vec::new()).start_loading("Loading approvals...");
        app.screen = Screen::SelectOperation;
        let outcome = TaskOutcome::Approvals {
            provider: ProviderContext::new("dev", "us-west-2"),
            result: Err(ProviderError::capability("list pending approvals", "AccessDenied")),
        };
        let (app, _) = update(app, Msg::TaskCompleted(Box::new(outcome)));
        assert_eq!(app.screen, Screen::SelectOperation);
        assert!(!app.is_loading);
        assert!(app.loading_msg.is_empty());
        assert_eq!(app.last_error.as_deref(), Some("list pending approvals failed: AccessDenied"));
        assert!(app.approvals.is_none());
    }

    #[test]
    fn decided_approval_leaves_the_list() {
        let mut app = App::new(Vec::new(), Vec::new()).start_loading("Executing approval action...");
        app.screen = Screen::ExecutingAction;
        app.approvals = Some(vec![approval("a1"), approval("a2")]);
        app.selected_approval = Some(approval("a1"));
        app.approve_action = true;
        app.approval_comment = "LGTM".into();

        let (app, _) = update(app, Msg::TaskCompleted(Box::new(TaskOutcome::ApprovalResult(Ok(())))));
        assert_eq!(app.screen, Screen::ExecutingAction);
        assert_eq!(app.approvals, Some(vec![approval("a2")]));
        assert_eq!(app.acknowledgement.as_deref(), Some("Approved p1/s1/a1"));
        assert!(app.selected_approval.is_none());
        assert!(app.approval_comment.is_empty());
        assert!(!app.approve_action);
    }

    #[test]
    fn crashed_task_surfaces_as_error() {
        let app = App::new(Vec::new(), Vec::new()).start_loading("Starting pipeline...");
        let (app, _) = update(app, Msg::TaskCompleted(Box::new(TaskOutcome::Crashed("worker panicked".into()))));
        assert!(!app.is_loading);
        assert_eq!(app.last_error.as_deref(), Some("worker panicked"));
    }
}
