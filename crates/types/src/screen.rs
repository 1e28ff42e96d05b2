//! The screens the application can display.

/// Top-level screens, in the order an operator normally walks through them.
///
/// Exactly one screen is current at any time. Text input is a sub-mode of a
/// screen (see `manual_input` on the application model), not a screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Screen {
    #[default]
    Providers,
    AwsConfig,
    SelectService,
    SelectCategory,
    SelectOperation,
    Approvals,
    Confirmation,
    Summary,
    ExecutingAction,
    PipelineStatus,
    PipelineStages,
}

impl Screen {
    /// Title rendered in the header for this screen.
    pub fn title(self) -> &'static str {
        match self {
            Screen::Providers => "Select Provider",
            Screen::AwsConfig => "Configure AWS",
            Screen::SelectService => "Select Service",
            Screen::SelectCategory => "Select Category",
            Screen::SelectOperation => "Select Operation",
            Screen::Approvals => "Pending Approvals",
            Screen::Confirmation => "Choose Action",
            Screen::Summary => "Summary",
            Screen::ExecutingAction => "Execute Action",
            Screen::PipelineStatus => "Pipelines",
            Screen::PipelineStages => "Pipeline Stages",
        }
    }
}
