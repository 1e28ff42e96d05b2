//! Navigation engine: the confirm and back transitions.
//!
//! Both are pure functions over [`App`]. Confirm reads the highlighted row of
//! the current screen table (or the text input in manual mode) and may return
//! a [`Task`] for the runtime. Back walks to the logical parent of the current
//! screen and clears the selection that was made there, highlighting the row
//! that produced it.

use cloudgate_types::{Screen, Task};
use tracing::debug;

use crate::app::App;
use crate::screens::{
    self, APPROVE, APPROVE_PLACEHOLDER, AWS_PROVIDER, CANCEL, COMMIT_PLACEHOLDER, DONE, EXECUTE, LATEST_COMMIT, MANUAL_INPUT,
    PIPELINE_APPROVALS, PIPELINE_STATUS, PROFILE_PLACEHOLDER, REGION_PLACEHOLDER, REJECT, REJECT_PLACEHOLDER, START_PIPELINE,
};

const LOADING_APPROVALS: &str = "Loading approvals...";
const LOADING_PIPELINES: &str = "Loading pipelines...";
const STARTING_PIPELINE: &str = "Starting pipeline...";
const EXECUTING_APPROVAL: &str = "Executing approval action...";

/// Act on the highlighted row or the text input of the current screen.
pub fn confirm(app: App) -> (App, Option<Task>) {
    if app.is_loading {
        debug!("confirm ignored while loading");
        return (app, None);
    }
    if app.manual_input {
        match app.screen {
            Screen::AwsConfig => return (confirm_aws_manual(app), None),
            Screen::Summary => return (confirm_summary_manual(app), None),
            _ => {}
        }
    }

    let Some(row) = screens::selected_row(&app) else {
        return (app, None);
    };
    let Some(first) = row.first().cloned() else {
        return (app, None);
    };

    match app.screen {
        Screen::Providers if first == AWS_PROVIDER => (app.advance_to(Screen::AwsConfig), None),
        Screen::Providers => (app, None),
        Screen::AwsConfig => (confirm_aws_row(app, first), None),
        Screen::SelectService => {
            let Some(service) = screens::services().into_iter().find(|service| service.display_name() == first) else {
                return (app, None);
            };
            let mut app = app;
            app.selected_service = Some(service);
            (app.advance_to(Screen::SelectCategory), None)
        }
        Screen::SelectCategory => {
            let Some(category) = screens::categories().into_iter().find(|category| category.display_name() == first) else {
                return (app, None);
            };
            let mut app = app;
            app.selected_category = Some(category);
            (app.advance_to(Screen::SelectOperation), None)
        }
        Screen::SelectOperation => confirm_operation(app, &first),
        Screen::Approvals => {
            let Some(approval) = app.approvals.iter().flatten().find(|approval| approval.matches_row(&row)).cloned() else {
                return (app, None);
            };
            let mut app = app;
            app.selected_approval = Some(approval);
            (app.advance_to(Screen::Confirmation), None)
        }
        Screen::Confirmation => {
            let (approve, placeholder) = match first.as_str() {
                APPROVE => (true, APPROVE_PLACEHOLDER),
                REJECT => (false, REJECT_PLACEHOLDER),
                _ => return (app, None),
            };
            let mut app = app;
            app.approve_action = approve;
            app.approval_comment.clear();
            (app.advance_to(Screen::Summary).begin_manual_input(placeholder), None)
        }
        Screen::Summary => (confirm_commit_choice(app, &first), None),
        Screen::ExecutingAction => match first.as_str() {
            EXECUTE => execute(app),
            CANCEL | DONE => (back(app), None),
            _ => (app, None),
        },
        Screen::PipelineStatus => {
            let Some(pipeline) = app.pipelines.iter().flatten().find(|pipeline| pipeline.name == first).cloned() else {
                return (app, None);
            };
            let start = app.is_start_pipeline();
            let mut app = app;
            app.selected_pipeline = Some(pipeline);
            if start {
                app.commit_id.clear();
                app.manual_commit_id = false;
                (app.advance_to(Screen::ExecutingAction), None)
            } else {
                (app.advance_to(Screen::PipelineStages), None)
            }
        }
        Screen::PipelineStages => (app, None),
    }
}

fn confirm_aws_manual(app: App) -> App {
    if app.text_input.is_empty() {
        return app.end_manual_input();
    }
    let value = app.text_input.input().trim().to_string();
    let mut app = app.end_manual_input();
    if app.aws_profile.is_empty() {
        debug!(profile = %value, "profile entered");
        app.aws_profile = value;
        app.cursor = 0;
        app.last_error = None;
        app
    } else {
        debug!(region = %value, "region entered");
        app.aws_region = value;
        app.advance_to(Screen::SelectService)
    }
}

fn confirm_aws_row(app: App, value: String) -> App {
    if app.cursor == 0 {
        let placeholder = if app.aws_profile.is_empty() {
            PROFILE_PLACEHOLDER
        } else {
            REGION_PLACEHOLDER
        };
        return app.begin_manual_input(placeholder);
    }
    let mut app = app;
    if app.aws_profile.is_empty() {
        app.aws_profile = value;
        app.cursor = 0;
        app.last_error = None;
        app
    } else {
        app.aws_region = value;
        app.advance_to(Screen::SelectService)
    }
}

fn confirm_summary_manual(app: App) -> App {
    let approval_flow = app.selected_approval.is_some();
    if !approval_flow && !app.is_start_pipeline() {
        return app;
    }
    if app.text_input.is_empty() {
        let mut app = app;
        app.text_input.focus();
        return app;
    }

    let value = app.text_input.input().to_string();
    let mut app = app;
    if approval_flow {
        app.approval_comment = value;
    } else {
        app.commit_id = value;
        app.manual_commit_id = true;
    }
    app.manual_input = false;
    app.text_input.blur();
    app.advance_to(Screen::ExecutingAction)
}

fn confirm_commit_choice(app: App, choice: &str) -> App {
    if !app.is_start_pipeline() {
        return app;
    }
    match choice {
        LATEST_COMMIT => {
            let mut app = app;
            app.commit_id.clear();
            app.manual_commit_id = false;
            app.advance_to(Screen::ExecutingAction)
        }
        MANUAL_INPUT => app.begin_manual_input(COMMIT_PLACEHOLDER),
        _ => app,
    }
}

fn confirm_operation(app: App, name: &str) -> (App, Option<Task>) {
    let Some(operation) = app
        .selected_category
        .as_ref()
        .map(screens::operations)
        .unwrap_or_default()
        .into_iter()
        .find(|operation| operation.name == name)
    else {
        return (app, None);
    };

    let (message, task) = match name {
        PIPELINE_APPROVALS => (LOADING_APPROVALS, Task::FetchApprovals(app.provider_context())),
        PIPELINE_STATUS | START_PIPELINE => (LOADING_PIPELINES, Task::FetchPipelines(app.provider_context())),
        _ => return (app, None),
    };
    let mut app = app;
    app.selected_operation = Some(operation);
    (app.start_loading(message), Some(task))
}

fn execute(app: App) -> (App, Option<Task>) {
    if app.is_start_pipeline() {
        let Some(pipeline) = &app.selected_pipeline else {
            return (app, None);
        };
        let task = Task::ExecutePipeline {
            provider: app.provider_context(),
            pipeline_name: pipeline.name.clone(),
            commit_id: if app.manual_commit_id { app.commit_id.clone() } else { String::new() },
        };
        return (app.start_loading(STARTING_PIPELINE), Some(task));
    }
    let Some(approval) = app.selected_approval.clone() else {
        return (app, None);
    };
    let task = Task::ExecuteApproval {
        provider: app.provider_context(),
        approval,
        approve: app.approve_action,
        comment: app.approval_comment.clone(),
    };
    (app.start_loading(EXECUTING_APPROVAL), Some(task))
}

/// Leave the current screen (or input sub-mode) for its logical parent.
pub fn back(app: App) -> App {
    if app.is_loading {
        debug!("back ignored while loading");
        return app;
    }
    let mut app = app;
    app.last_error = None;

    match app.screen {
        Screen::Providers => {
            app.should_quit = true;
            app
        }
        Screen::AwsConfig if app.manual_input => {
            let mut app = app.end_manual_input();
            app.cursor = 0;
            app
        }
        Screen::AwsConfig if !app.aws_profile.is_empty() => {
            let profile = std::mem::take(&mut app.aws_profile);
            highlight(app, &profile)
        }
        Screen::AwsConfig => return_to(app, Screen::Providers, AWS_PROVIDER),
        Screen::SelectService => {
            let region = std::mem::take(&mut app.aws_region);
            return_to(app, Screen::AwsConfig, &region)
        }
        Screen::SelectCategory => {
            let service = app.selected_service.take().map(|service| service.display_name()).unwrap_or_default();
            return_to(app, Screen::SelectService, &service)
        }
        Screen::SelectOperation => {
            app.selected_operation = None;
            let category = app.selected_category.take().map(|category| category.display_name()).unwrap_or_default();
            return_to(app, Screen::SelectCategory, &category)
        }
        Screen::Approvals | Screen::PipelineStatus => {
            let operation = app.selected_operation.take().map(|operation| operation.name).unwrap_or_default();
            return_to(app, Screen::SelectOperation, &operation)
        }
        Screen::Confirmation => {
            let approval = app.selected_approval.take();
            app.screen = Screen::Approvals;
            app.cursor = approval
                .and_then(|approval| screens::table_for(&app).position(|row| approval.matches_row(row)))
                .unwrap_or(0);
            app
        }
        Screen::Summary if app.selected_approval.is_some() => {
            let choice = if app.approve_action { APPROVE } else { REJECT };
            app.approval_comment.clear();
            app.approve_action = false;
            let app = app.end_manual_input();
            return_to(app, Screen::Confirmation, choice)
        }
        Screen::Summary if app.manual_input => {
            let mut app = app.end_manual_input();
            app.cursor = screens::table_for(&app).position_of(MANUAL_INPUT).unwrap_or(0);
            app
        }
        Screen::Summary => {
            let pipeline = app.selected_pipeline.take().map(|pipeline| pipeline.name).unwrap_or_default();
            app.commit_id.clear();
            app.manual_commit_id = false;
            return_to(app, Screen::PipelineStatus, &pipeline)
        }
        Screen::ExecutingAction if app.acknowledgement.is_some() => {
            app.acknowledgement = None;
            let operation = app.selected_operation.take().map(|operation| operation.name).unwrap_or_default();
            return_to(app, Screen::SelectOperation, &operation)
        }
        Screen::ExecutingAction if app.selected_approval.is_some() => {
            app.approval_comment.clear();
            app.screen = Screen::Summary;
            app.cursor = 0;
            app.manual_input = true;
            app.text_input.focus();
            app
        }
        Screen::ExecutingAction => {
            let manual = app.manual_commit_id;
            app.commit_id.clear();
            app.manual_commit_id = false;
            app.screen = Screen::Summary;
            if manual {
                app.cursor = 0;
                app.manual_input = true;
                app.text_input.focus();
                app
            } else {
                highlight(app, LATEST_COMMIT)
            }
        }
        Screen::PipelineStages => {
            let pipeline = app.selected_pipeline.take().map(|pipeline| pipeline.name).unwrap_or_default();
            return_to(app, Screen::PipelineStatus, &pipeline)
        }
    }
}

fn return_to(mut app: App, screen: Screen, key: &str) -> App {
    debug!(from = ?app.screen, to = ?screen, "back");
    app.screen = screen;
    highlight(app, key)
}

/// Highlight the row whose first cell is `key`, or the first row.
fn highlight(mut app: App, key: &str) -> App {
    app.cursor = screens::table_for(&app).position_of(key).unwrap_or(0);
    app
}
