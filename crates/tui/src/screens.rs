//! Screen catalog: the static entities and the table shown on each screen.
//!
//! [`table_for`] is a pure function of the application model. It is rebuilt
//! for every frame and for every confirm, so navigation always reads the same
//! rows the operator sees.

use cloudgate_types::{Category, CloudProvider, Operation, Screen, Service};

use crate::app::App;

pub const MANUAL_ENTRY: &str = "Manual Entry";
pub const APPROVE: &str = "Approve";
pub const REJECT: &str = "Reject";
pub const LATEST_COMMIT: &str = "Latest Commit";
pub const MANUAL_INPUT: &str = "Manual Input";
pub const EXECUTE: &str = "Execute";
pub const CANCEL: &str = "Cancel";
pub const DONE: &str = "Done";

pub const AWS_PROVIDER: &str = "Amazon Web Services";
pub const WORKFLOWS: &str = "Workflows";
pub const PIPELINE_APPROVALS: &str = "Pipeline Approvals";
pub const PIPELINE_STATUS: &str = "Pipeline Status";
pub const START_PIPELINE: &str = "Start Pipeline";

pub const PROFILE_PLACEHOLDER: &str = "Enter AWS profile name...";
pub const REGION_PLACEHOLDER: &str = "Enter AWS region...";
pub const APPROVE_PLACEHOLDER: &str = "Enter approval comment...";
pub const REJECT_PLACEHOLDER: &str = "Enter rejection comment...";
pub const COMMIT_PLACEHOLDER: &str = "Enter commit ID...";

const CANCEL_DESCRIPTION: &str = "Go back and change the commit or comment";

pub fn providers() -> Vec<CloudProvider> {
    vec![
        CloudProvider::new("aws", AWS_PROVIDER, "AWS Cloud Services", true),
        CloudProvider::new("azure", "Microsoft Azure", "Azure Cloud Platform", false),
        CloudProvider::new("gcp", "Google Cloud Platform", "Google Cloud Services", false),
    ]
}

pub fn services() -> Vec<Service> {
    vec![Service::new("codepipeline", "CodePipeline", "Continuous Delivery Service", true)]
}

pub fn categories() -> Vec<Category> {
    vec![
        Category::new("workflows", WORKFLOWS, "Pipeline Workflows and Approvals", true),
        Category::new("operations", "Operations", "Service Operations", false),
    ]
}

/// Operations offered by `category`. Only Workflows has any today.
pub fn operations(category: &Category) -> Vec<Operation> {
    if category.name != WORKFLOWS {
        return Vec::new();
    }
    vec![
        Operation::new("pipeline-approvals", PIPELINE_APPROVALS, "Manage Pipeline Approvals"),
        Operation::new("pipeline-status", PIPELINE_STATUS, "View Pipeline Status"),
        Operation::new("start-pipeline", START_PIPELINE, "Trigger Pipeline Execution"),
    ]
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Column {
    pub title: &'static str,
    pub width: u16,
}

const fn column(title: &'static str, width: u16) -> Column {
    Column { title, width }
}

/// Columns and rows of one screen.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScreenTable {
    pub columns: Vec<Column>,
    pub rows: Vec<Vec<String>>,
}

impl ScreenTable {
    fn new(columns: Vec<Column>, rows: Vec<Vec<String>>) -> Self {
        Self { columns, rows }
    }

    /// Index of the first row accepted by `predicate`.
    pub fn position(&self, predicate: impl Fn(&[String]) -> bool) -> Option<usize> {
        self.rows.iter().position(|row| predicate(row))
    }

    /// Index of the first row whose first cell equals `key`.
    pub fn position_of(&self, key: &str) -> Option<usize> {
        self.position(|row| row.first().is_some_and(|cell| cell == key))
    }
}

fn pair(first: impl Into<String>, second: impl Into<String>) -> Vec<String> {
    vec![first.into(), second.into()]
}

pub fn table_for(app: &App) -> ScreenTable {
    match app.screen {
        Screen::Providers => ScreenTable::new(
            vec![column("Provider", 30), column("Description", 50)],
            providers()
                .into_iter()
                .map(|provider| pair(provider.display_name(), provider.description))
                .collect(),
        ),
        Screen::AwsConfig => {
            let (title, values) = if app.aws_profile.is_empty() {
                ("Profile", &app.profiles)
            } else {
                ("Region", &app.regions)
            };
            let rows = std::iter::once(MANUAL_ENTRY.to_string())
                .chain(values.iter().cloned())
                .map(|value| vec![value])
                .collect();
            ScreenTable::new(vec![column(title, 30)], rows)
        }
        Screen::SelectService => ScreenTable::new(
            vec![column("Service", 30), column("Description", 50)],
            services()
                .into_iter()
                .map(|service| pair(service.display_name(), service.description))
                .collect(),
        ),
        Screen::SelectCategory => ScreenTable::new(
            vec![column("Category", 30), column("Description", 50)],
            categories()
                .into_iter()
                .map(|category| pair(category.display_name(), category.description))
                .collect(),
        ),
        Screen::SelectOperation => ScreenTable::new(
            vec![column("Operation", 30), column("Description", 50)],
            app.selected_category
                .as_ref()
                .map(operations)
                .unwrap_or_default()
                .into_iter()
                .map(|operation| pair(operation.name, operation.description))
                .collect(),
        ),
        Screen::Approvals => ScreenTable::new(
            vec![column("Pipeline", 40), column("Stage", 30), column("Action", 20)],
            app.approvals
                .iter()
                .flatten()
                .map(|approval| {
                    vec![
                        approval.pipeline_name.clone(),
                        approval.stage_name.clone(),
                        approval.action_name.clone(),
                    ]
                })
                .collect(),
        ),
        Screen::Confirmation => ScreenTable::new(
            vec![column("Action", 30), column("Description", 50)],
            vec![
                pair(APPROVE, "Approve the pipeline stage"),
                pair(REJECT, "Reject the pipeline stage"),
            ],
        ),
        Screen::Summary => {
            let rows = if app.is_start_pipeline() && app.selected_pipeline.is_some() {
                vec![
                    pair(LATEST_COMMIT, "Use latest commit from source"),
                    pair(MANUAL_INPUT, "Enter specific commit ID"),
                ]
            } else {
                Vec::new()
            };
            ScreenTable::new(vec![column("Type", 30), column("Value", 50)], rows)
        }
        Screen::ExecutingAction => ScreenTable::new(vec![column("Action", 30), column("Description", 50)], execution_rows(app)),
        Screen::PipelineStatus => ScreenTable::new(
            vec![column("Pipeline", 40), column("Description", 50)],
            app.pipelines
                .iter()
                .flatten()
                .map(|pipeline| pair(pipeline.name.clone(), pipeline.stage_summary()))
                .collect(),
        ),
        Screen::PipelineStages => ScreenTable::new(
            vec![column("Stage", 30), column("Status", 20), column("Last Updated", 20)],
            app.selected_pipeline
                .iter()
                .flat_map(|pipeline| &pipeline.stages)
                .map(|stage| vec![stage.name.clone(), stage.status.clone(), stage.last_updated.clone()])
                .collect(),
        ),
    }
}

fn execution_rows(app: &App) -> Vec<Vec<String>> {
    if let Some(acknowledgement) = &app.acknowledgement {
        return vec![pair(DONE, acknowledgement.clone())];
    }
    let description = if app.is_start_pipeline() {
        if app.manual_commit_id {
            format!("Start pipeline with commit {}", app.commit_id)
        } else {
            "Start pipeline with latest commit".to_string()
        }
    } else if app.approve_action {
        "Execute approve action".to_string()
    } else {
        "Execute reject action".to_string()
    };
    vec![pair(EXECUTE, description), pair(CANCEL, CANCEL_DESCRIPTION)]
}

/// The highlighted row of the current screen, if any.
pub fn selected_row(app: &App) -> Option<Vec<String>> {
    table_for(app).rows.into_iter().nth(app.cursor)
}

#[cfg(test)]
mod tests {
    use super::*;
    use cloudgate_types::{ApprovalAction, PipelineStatus, StageStatus};

    fn app_on(screen: Screen) -> App {
        let mut app = App::new(vec!["default".into(), "dev".into()], vec!["us-east-1".into()]);
        app.screen = screen;
        app
    }

    fn first_cells(table: &ScreenTable) -> Vec<&str> {
        table.rows.iter().map(|row| row[0].as_str()).collect()
    }

    #[test]
    fn providers_mark_unavailable_entries() {
        let table = table_for(&app_on(Screen::Providers));
        assert_eq!(
            first_cells(&table),
            vec![
                "Amazon Web Services",
                "Microsoft Azure (Coming Soon)",
                "Google Cloud Platform (Coming Soon)"
            ]
        );
        assert_eq!(table.columns, vec![column("Provider", 30), column("Description", 50)]);
    }

    #[test]
    fn aws_config_lists_profiles_then_regions() {
        let mut app = app_on(Screen::AwsConfig);
        let table = table_for(&app);
        assert_eq!(table.columns, vec![column("Profile", 30)]);
        assert_eq!(first_cells(&table), vec![MANUAL_ENTRY, "default", "dev"]);

        app.aws_profile = "dev".into();
        let table = table_for(&app);
        assert_eq!(table.columns, vec![column("Region", 30)]);
        assert_eq!(first_cells(&table), vec![MANUAL_ENTRY, "us-east-1"]);
    }

    #[test]
    fn empty_discovery_leaves_only_manual_entry() {
        let mut app = App::new(Vec::new(), Vec::new());
        app.screen = Screen::AwsConfig;
        assert_eq!(first_cells(&table_for(&app)), vec![MANUAL_ENTRY]);
        app.aws_profile = "typed".into();
        assert_eq!(first_cells(&table_for(&app)), vec![MANUAL_ENTRY]);
    }

    #[test]
    fn operations_exist_only_for_workflows() {
        let mut app = app_on(Screen::SelectOperation);
        assert!(table_for(&app).rows.is_empty());
        app.selected_category = categories().into_iter().nth(1);
        assert!(table_for(&app).rows.is_empty());
        app.selected_category = categories().into_iter().next();
        assert_eq!(
            first_cells(&table_for(&app)),
            vec![PIPELINE_APPROVALS, PIPELINE_STATUS, START_PIPELINE]
        );
    }

    #[test]
    fn approvals_and_stages_use_wide_columns() {
        let mut app = app_on(Screen::Approvals);
        app.approvals = Some(vec![ApprovalAction {
            pipeline_name: "p1".into(),
            stage_name: "s1".into(),
            action_name: "a1".into(),
            token: "t".into(),
        }]);
        let table = table_for(&app);
        assert_eq!(table.rows, vec![vec!["p1".to_string(), "s1".into(), "a1".into()]]);
        assert_eq!(table.columns.iter().map(|c| c.width).collect::<Vec<_>>(), vec![40, 30, 20]);

        app.screen = Screen::PipelineStages;
        app.selected_pipeline = Some(PipelineStatus {
            name: "p1".into(),
            stages: vec![StageStatus {
                name: "Build".into(),
                status: "Succeeded".into(),
                last_updated: "2024-03-01 10:15:30".into(),
            }],
        });
        let table = table_for(&app);
        assert_eq!(table.rows[0], vec!["Build".to_string(), "Succeeded".into(), "2024-03-01 10:15:30".into()]);
        assert_eq!(table.columns[2], column("Last Updated", 20));
    }

    #[test]
    fn execution_rows_describe_the_pending_action() {
        let mut app = app_on(Screen::ExecutingAction);
        app.approve_action = false;
        assert_eq!(table_for(&app).rows[0][1], "Execute reject action");

        app.selected_operation = Some(Operation::new("start-pipeline", START_PIPELINE, "Trigger Pipeline Execution"));
        assert_eq!(table_for(&app).rows[0][1], "Start pipeline with latest commit");
        app.commit_id = "abc123".into();
        app.manual_commit_id = true;
        assert_eq!(table_for(&app).rows[0][1], "Start pipeline with commit abc123");
        assert_eq!(
            table_for(&app).rows[1],
            vec![CANCEL.to_string(), "Go back and change the commit or comment".into()]
        );

        app.acknowledgement = Some("Started pipeline p1".into());
        assert_eq!(table_for(&app).rows, vec![vec![DONE.to_string(), "Started pipeline p1".into()]]);
    }

    #[test]
    fn summary_offers_commit_choice_only_with_a_pipeline() {
        let mut app = app_on(Screen::Summary);
        app.selected_operation = Some(Operation::new("start-pipeline", START_PIPELINE, "Trigger Pipeline Execution"));
        assert!(table_for(&app).rows.is_empty());
        app.selected_pipeline = Some(PipelineStatus {
            name: "p1".into(),
            stages: Vec::new(),
        });
        assert_eq!(first_cells(&table_for(&app)), vec![LATEST_COMMIT, MANUAL_INPUT]);
    }

    #[test]
    fn rows_ignore_fields_of_other_screens() {
        let app = app_on(Screen::Confirmation);
        let mut noisy = app.clone();
        noisy.approvals = Some(Vec::new());
        noisy.commit_id = "abc".into();
        noisy.aws_profile = "dev".into();
        noisy.last_error = Some("boom".into());
        assert_eq!(table_for(&app), table_for(&noisy));
    }
}
