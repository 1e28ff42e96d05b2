//! Hint bar listing the keys that act on the current screen.

use ratatui::{prelude::*, widgets::Paragraph};

use crate::app::App;
use crate::ui::theme::Theme;

/// Key/label pairs for the current mode.
pub fn hints_for(app: &App) -> Vec<(&'static str, &'static str)> {
    if app.is_loading {
        return vec![("Ctrl-C", " quit")];
    }
    if app.manual_input {
        return vec![("Enter", " submit  "), ("←/→", " move  "), ("Esc", " cancel  "), ("Ctrl-C", " quit")];
    }
    let back = if app.screen == cloudgate_types::Screen::Providers {
        " quit  "
    } else {
        " back  "
    };
    vec![("↑/↓", " select  "), ("Enter", " confirm  "), ("Esc/q", back), ("Ctrl-C", " quit")]
}

/// Renders the hint strip.
pub fn draw_hints(frame: &mut Frame, area: Rect, app: &App, theme: &dyn Theme) {
    let mut spans = vec![Span::styled("Hints: ", theme.text_muted_style())];
    for (key, label) in hints_for(app) {
        spans.push(Span::styled(key, theme.accent_emphasis_style()));
        spans.push(Span::styled(label, theme.text_muted_style()));
    }
    frame.render_widget(Paragraph::new(Line::from(spans)).style(theme.text_muted_style()), area);
}
