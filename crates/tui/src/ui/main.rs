//! Frame rendering.
//!
//! The layout is a fixed vertical stack:
//!
//! ```text
//! ┌ title ─────────────── breadcrumb ┐
//! │ screen table                      │
//! └───────────────────────────────────┘
//! ┌ text input (manual mode only) ────┐
//! status line (throbber, error or acknowledgement)
//! hint bar
//! ```

use cloudgate_types::Screen;
use ratatui::{
    prelude::*,
    widgets::{Block, Cell, Paragraph, Row, Table, TableState},
};
use unicode_width::UnicodeWidthStr;

use crate::app::{App, THROBBER_FRAMES};
use crate::screens::{self, ScreenTable};
use crate::ui::theme::{Theme, theme_helpers as th};
use crate::ui::widgets::draw_hints;

const THROBBER: [&str; THROBBER_FRAMES] = ["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"];

/// Renders the whole screen for `app`.
pub fn draw(frame: &mut Frame, app: &App, theme: &dyn Theme) {
    let input_height = if app.manual_input { 3 } else { 0 };
    let [header, body, input, status, hints] = Layout::vertical([
        Constraint::Length(1),
        Constraint::Min(3),
        Constraint::Length(input_height),
        Constraint::Length(1),
        Constraint::Length(1),
    ])
    .areas(frame.area());

    frame.render_widget(Block::default().style(th::panel_style(theme)), frame.area());
    render_header(frame, header, app, theme);
    render_table(frame, body, app, theme);
    if app.manual_input {
        render_input(frame, input, app, theme);
    }
    render_status(frame, status, app, theme);
    draw_hints(frame, hints, app, theme);
}

/// Breadcrumb of the choices made so far.
pub fn breadcrumb(app: &App) -> String {
    let mut parts: Vec<String> = Vec::new();
    if app.screen != Screen::Providers {
        parts.push("AWS".to_string());
    }
    if !app.aws_profile.is_empty() {
        parts.push(app.aws_profile.clone());
    }
    if !app.aws_region.is_empty() {
        parts.push(app.aws_region.clone());
    }
    parts.extend(app.selected_service.as_ref().map(|service| service.name.clone()));
    parts.extend(app.selected_category.as_ref().map(|category| category.name.clone()));
    parts.extend(app.selected_operation.as_ref().map(|operation| operation.name.clone()));
    parts.extend(app.selected_pipeline.as_ref().map(|pipeline| pipeline.name.clone()));
    parts.extend(app.selected_approval.as_ref().map(ToString::to_string));
    parts.join(" › ")
}

fn render_header(frame: &mut Frame, area: Rect, app: &App, theme: &dyn Theme) {
    let line = Line::from(vec![
        Span::styled(format!(" {} ", app.screen.title()), theme.accent_emphasis_style()),
        Span::styled(breadcrumb(app), theme.accent_secondary_style()),
    ]);
    frame.render_widget(Paragraph::new(line), area);
}

fn render_table(frame: &mut Frame, area: Rect, app: &App, theme: &dyn Theme) {
    let ScreenTable { columns, rows } = screens::table_for(app);
    let title = table_title(app);
    let block = th::block(theme, title.as_deref(), !app.manual_input);

    if rows.is_empty() {
        let placeholder = if app.manual_input { "" } else { "Nothing to show" };
        frame.render_widget(Paragraph::new(placeholder).style(theme.text_muted_style()).block(block), area);
        return;
    }

    let header = Row::new(columns.iter().map(|column| Cell::from(column.title))).style(th::table_header_style(theme));
    let widths: Vec<Constraint> = columns.iter().map(|column| Constraint::Length(column.width)).collect();
    let body = rows
        .into_iter()
        .enumerate()
        .map(|(index, cells)| Row::new(cells.into_iter().map(Cell::from)).style(th::table_row_style(theme, index)));

    let table = Table::new(body, widths)
        .header(header)
        .block(block)
        .row_highlight_style(th::table_selected_style(theme))
        .highlight_symbol("› ");
    let mut state = TableState::default();
    if !app.manual_input {
        state.select(Some(app.cursor));
    }
    frame.render_stateful_widget(table, area, &mut state);
}

fn table_title(app: &App) -> Option<String> {
    match app.screen {
        Screen::Summary => app.selected_approval.as_ref().map(|approval| {
            let decision = if app.approve_action { "Approve" } else { "Reject" };
            format!("{decision} {approval}")
        }),
        Screen::ExecutingAction => app.selected_pipeline.as_ref().map(|pipeline| format!("Pipeline {}", pipeline.name)),
        _ => app.provider.as_ref().filter(|_| matches!(app.screen, Screen::Approvals | Screen::PipelineStatus)).map(ToString::to_string),
    }
}

fn render_input(frame: &mut Frame, area: Rect, app: &App, theme: &dyn Theme) {
    let input = &app.text_input;
    let showing_placeholder = input.input().is_empty();
    let text = if showing_placeholder { input.placeholder() } else { input.input() };
    let block = th::block(theme, Some("Input"), input.is_focused());
    frame.render_widget(Paragraph::new(text).style(th::input_style(theme, showing_placeholder)).block(block), area);

    if input.is_focused() {
        let before_cursor = &input.input()[..input.cursor()];
        let x = area.x + 1 + UnicodeWidthStr::width(before_cursor) as u16;
        let max_x = area.x + area.width.saturating_sub(2);
        frame.set_cursor_position((x.min(max_x), area.y + 1));
    }
}

/// Text and severity of the status line.
pub fn status_line(app: &App) -> Option<(String, StatusKind)> {
    if app.is_loading {
        let frame = THROBBER[app.throbber_idx % THROBBER_FRAMES];
        return Some((format!("{frame} {}", app.loading_msg), StatusKind::Progress));
    }
    if let Some(error) = &app.last_error {
        return Some((format!("Error: {error}"), StatusKind::Error));
    }
    app.acknowledgement
        .as_ref()
        .map(|message| (format!("✓ {message}"), StatusKind::Success))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusKind {
    Progress,
    Error,
    Success,
}

fn render_status(frame: &mut Frame, area: Rect, app: &App, theme: &dyn Theme) {
    let Some((text, kind)) = status_line(app) else {
        return;
    };
    let style = match kind {
        StatusKind::Progress => theme.status_warning(),
        StatusKind::Error => theme.status_error(),
        StatusKind::Success => theme.status_success(),
    };
    frame.render_widget(Paragraph::new(text).style(style), area);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ui::theme::DraculaTheme;
    use ratatui::{Terminal, backend::TestBackend};

    fn buffer_text(terminal: &Terminal<TestBackend>) -> String {
        let buffer = terminal.backend().buffer();
        buffer.content().iter().map(|cell| cell.symbol()).collect()
    }

    #[test]
    fn renders_title_rows_and_hints() {
        let mut terminal = Terminal::new(TestBackend::new(100, 12)).expect("terminal");
        let app = App::new(vec!["dev".into()], Vec::new());
        terminal.draw(|frame| draw(frame, &app, &DraculaTheme::new())).expect("draw");
        let text = buffer_text(&terminal);
        assert!(text.contains("Select Provider"));
        assert!(text.contains("Amazon Web Services"));
        assert!(text.contains("Microsoft Azure (Coming Soon)"));
        assert!(text.contains("Hints:"));
    }

    #[test]
    fn manual_input_shows_placeholder() {
        let mut terminal = Terminal::new(TestBackend::new(80, 12)).expect("terminal");
        let mut app = App::new(Vec::new(), Vec::new());
        app.screen = Screen::AwsConfig;
        let app = app.begin_manual_input(screens::PROFILE_PLACEHOLDER);
        terminal.draw(|frame| draw(frame, &app, &DraculaTheme::new())).expect("draw");
        assert!(buffer_text(&terminal).contains("Enter AWS profile name..."));
    }

    #[test]
    fn status_prefers_loading_then_error_then_acknowledgement() {
        let mut app = App::new(Vec::new(), Vec::new());
        assert_eq!(status_line(&app), None);
        app.acknowledgement = Some("Started pipeline p1".into());
        assert_eq!(status_line(&app).map(|(_, kind)| kind), Some(StatusKind::Success));
        app.last_error = Some("boom".into());
        assert_eq!(status_line(&app), Some(("Error: boom".to_string(), StatusKind::Error)));
        app.is_loading = true;
        app.loading_msg = "Loading pipelines...".into();
        assert_eq!(status_line(&app), Some(("⠋ Loading pipelines...".to_string(), StatusKind::Progress)));
    }

    #[test]
    fn breadcrumb_follows_the_selections() {
        let mut app = App::new(Vec::new(), Vec::new());
        assert_eq!(breadcrumb(&app), "");
        app.screen = Screen::SelectCategory;
        app.aws_profile = "dev".into();
        app.aws_region = "us-west-2".into();
        app.selected_service = screens::services().into_iter().next();
        assert_eq!(breadcrumb(&app), "AWS › dev › us-west-2 › CodePipeline");
    }
}
