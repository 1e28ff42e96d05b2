use cloudgate_types::{Msg, Screen, TaskOutcome};

use super::support::*;
use crate::app::App;
use crate::screens::{self, APPROVE, AWS_PROVIDER, MANUAL_ENTRY, PIPELINE_APPROVALS, WORKFLOWS};

fn assert_invariants(app: &App) {
    assert!(app.aws_region.is_empty() || !app.aws_profile.is_empty(), "region set without profile: {app:?}");
    if let Some(selected) = &app.selected_approval {
        let listed = app.approvals.iter().flatten().any(|approval| approval.key() == selected.key());
        assert!(listed, "selected approval {selected} is not in the fetched list");
    }
    match app.screen {
        Screen::Approvals => assert!(app.approvals.is_some()),
        Screen::PipelineStatus => assert!(app.pipelines.is_some()),
        _ => {}
    }
    let rows = screens::table_for(app).rows.len();
    assert!(app.cursor < rows.max(1), "cursor {} outside {rows} rows on {:?}", app.cursor, app.screen);
}

#[test]
fn invariants_hold_along_a_wandering_session() {
    let script = [
        Msg::Confirm,
        Msg::SelectLast,
        Msg::Confirm,
        Msg::Back,
        Msg::Back,
        Msg::Confirm,
        Msg::MoveSelection(2),
        Msg::Confirm,
        Msg::MoveSelection(1),
        Msg::Confirm,
        Msg::Confirm,
        Msg::Confirm,
        Msg::Confirm,
    ];
    let mut app = start();
    for msg in script {
        app = send(app, msg).0;
        assert_invariants(&app);
    }
    assert!(app.is_loading);

    app = complete(
        app,
        TaskOutcome::Approvals {
            provider: context(),
            result: Ok(vec![approval()]),
        },
    );
    assert_invariants(&app);
    for msg in [Msg::Confirm, Msg::Confirm, Msg::Back, Msg::Back, Msg::Confirm, Msg::Back, Msg::Back] {
        app = send(app, msg).0;
        assert_invariants(&app);
    }
    assert_eq!(app.screen, Screen::SelectOperation);
}

#[test]
fn confirm_then_back_restores_selection_screens() {
    let providers = start();
    let (forward, _) = confirm_row(providers.clone(), AWS_PROVIDER);
    assert_eq!(back(forward), providers);

    let (profiles, _) = confirm(start());
    let profiles = highlight(profiles, PROFILE);
    let (forward, _) = confirm(profiles.clone());
    assert_eq!(forward.aws_profile, PROFILE);
    assert_eq!(back(forward), profiles);

    let mut services = at_operations();
    services = back(back(services));
    assert_eq!(services.screen, Screen::SelectService);
    let (forward, _) = confirm(services.clone());
    assert_eq!(back(forward), services);

    let categories = back(at_operations());
    let (forward, _) = confirm_row(categories.clone(), WORKFLOWS);
    assert_eq!(back(forward), categories);

    let (loading, _) = confirm_row(at_operations(), PIPELINE_APPROVALS);
    let approvals = complete(
        loading,
        TaskOutcome::Approvals {
            provider: context(),
            result: Ok(vec![approval()]),
        },
    );
    let (forward, _) = confirm(approvals.clone());
    assert_eq!(back(forward), approvals);
}

#[test]
fn back_from_summary_returns_to_the_chosen_decision() {
    let (loading, _) = confirm_row(at_operations(), PIPELINE_APPROVALS);
    let approvals = complete(
        loading,
        TaskOutcome::Approvals {
            provider: context(),
            result: Ok(vec![approval()]),
        },
    );
    let (confirmation, _) = confirm(approvals);
    let (summary, _) = confirm_row(confirmation, APPROVE);
    let app = back(type_text(summary, "half typed"));
    assert_eq!(app.screen, Screen::Confirmation);
    assert!(!app.manual_input);
    assert!(app.approval_comment.is_empty());
    assert!(!app.approve_action);
    assert_eq!(app.selected_approval, Some(approval()));
}

#[test]
fn empty_discovery_offers_only_manual_entry() {
    let (app, _) = confirm(App::new(Vec::new(), Vec::new()));
    assert_eq!(app.screen, Screen::AwsConfig);
    assert_eq!(screens::table_for(&app).rows, vec![vec![MANUAL_ENTRY.to_string()]]);

    let mut app = app;
    app.aws_profile = "ops".into();
    assert_eq!(screens::table_for(&app).rows, vec![vec![MANUAL_ENTRY.to_string()]]);
}

#[test]
fn empty_approval_list_has_no_rows_and_confirm_is_inert() {
    let (loading, _) = confirm_row(at_operations(), PIPELINE_APPROVALS);
    let app = complete(
        loading,
        TaskOutcome::Approvals {
            provider: context(),
            result: Ok(Vec::new()),
        },
    );
    assert_eq!(app.screen, Screen::Approvals);
    assert!(screens::table_for(&app).rows.is_empty());

    let (after, task) = confirm(app.clone());
    assert_eq!(after, app);
    assert!(task.is_none());
}

#[test]
fn unavailable_catalog_entries_do_not_advance() {
    let app = highlight(start(), "Microsoft Azure (Coming Soon)");
    let (after, task) = confirm(app.clone());
    assert_eq!(after, app);
    assert!(task.is_none());
}

#[test]
fn whitespace_only_input_leaves_manual_mode_without_a_value() {
    let (app, _) = confirm(start());
    let (app, _) = confirm_row(app, MANUAL_ENTRY);
    let (app, _) = confirm(type_text(app, "   "));
    assert!(!app.manual_input);
    assert!(app.aws_profile.is_empty());
    assert_eq!(app.screen, Screen::AwsConfig);
}
