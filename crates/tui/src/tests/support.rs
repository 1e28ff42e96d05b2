use cloudgate_types::{ApprovalAction, Msg, PipelineStatus, ProviderContext, Screen, StageStatus, Task, TaskOutcome};

use crate::app::{App, update};
use crate::screens::{self, AWS_PROVIDER, WORKFLOWS};

pub const PROFILE: &str = "dev-profile";
pub const REGION: &str = "us-west-2";

pub fn start() -> App {
    App::new(
        vec!["default".into(), PROFILE.into()],
        vec!["us-east-1".into(), REGION.into()],
    )
}

pub fn context() -> ProviderContext {
    ProviderContext::new(PROFILE, REGION)
}

pub fn approval() -> ApprovalAction {
    ApprovalAction {
        pipeline_name: "p1".into(),
        stage_name: "s1".into(),
        action_name: "a1".into(),
        token: "token-1".into(),
    }
}

pub fn pipeline(name: &str) -> PipelineStatus {
    PipelineStatus {
        name: name.into(),
        stages: vec![
            StageStatus {
                name: "Source".into(),
                status: "Succeeded".into(),
                last_updated: "2024-05-01 10:00:00".into(),
            },
            StageStatus {
                name: "Deploy".into(),
                status: "InProgress".into(),
                last_updated: "2024-05-01 10:05:00".into(),
            },
        ],
    }
}

pub fn send(app: App, msg: Msg) -> (App, Option<Task>) {
    update(app, msg)
}

pub fn confirm(app: App) -> (App, Option<Task>) {
    send(app, Msg::Confirm)
}

pub fn back(app: App) -> App {
    send(app, Msg::Back).0
}

/// Move the highlight onto the row whose first cell is `key`.
pub fn highlight(app: App, key: &str) -> App {
    let target = screens::table_for(&app)
        .position_of(key)
        .unwrap_or_else(|| panic!("no row {key:?} on {:?}", app.screen));
    let delta = target as isize - app.cursor as isize;
    send(app, Msg::MoveSelection(delta)).0
}

pub fn confirm_row(app: App, key: &str) -> (App, Option<Task>) {
    confirm(highlight(app, key))
}

pub fn type_text(app: App, text: &str) -> App {
    text.chars().fold(app, |app, c| send(app, Msg::InputChar(c)).0)
}

pub fn complete(app: App, outcome: TaskOutcome) -> App {
    send(app, Msg::TaskCompleted(Box::new(outcome))).0
}

/// Walk from startup to the operation list of the Workflows category.
pub fn at_operations() -> App {
    let (app, _) = confirm_row(start(), AWS_PROVIDER);
    let (app, _) = confirm_row(app, PROFILE);
    let (app, _) = confirm_row(app, REGION);
    assert_eq!(app.screen, Screen::SelectService);
    let (app, _) = confirm_row(app, "CodePipeline");
    let (app, _) = confirm_row(app, WORKFLOWS);
    assert_eq!(app.screen, Screen::SelectOperation);
    app
}
