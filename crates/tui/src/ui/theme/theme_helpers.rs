use ratatui::{
    style::{Modifier, Style},
    text::Span,
    widgets::{Block, BorderType, Borders},
};

use super::roles::{Theme, ThemeRoles};

/// Build a standard Block with theme surfaces and borders.
pub fn block<'a, T: Theme + ?Sized>(theme: &'a T, title: Option<&'a str>, focused: bool) -> Block<'a> {
    let mut block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(theme.border_style(focused))
        .style(panel_style(theme));
    if let Some(t) = title {
        block = block.title(Span::styled(t, theme.text_secondary_style().add_modifier(Modifier::BOLD)));
    }
    block
}

/// Style for panel-like containers.
pub fn panel_style<T: Theme + ?Sized>(theme: &T) -> Style {
    let ThemeRoles { surface, text, .. } = *theme.roles();
    Style::default().bg(surface).fg(text)
}

/// Bold secondary text for table headers.
pub fn table_header_style<T: Theme + ?Sized>(theme: &T) -> Style {
    theme.text_secondary_style().add_modifier(Modifier::BOLD)
}

/// Zebra striping for table rows.
pub fn table_row_style<T: Theme + ?Sized>(theme: &T, row_index: usize) -> Style {
    let ThemeRoles {
        table_row_even,
        table_row_odd,
        text,
        ..
    } = *theme.roles();
    let background = if row_index % 2 == 0 { table_row_even } else { table_row_odd };
    Style::default().bg(background).fg(text)
}

/// Style for the highlighted row.
pub fn table_selected_style<T: Theme + ?Sized>(theme: &T) -> Style {
    theme.selection_style().add_modifier(Modifier::BOLD)
}

/// Style for the text input body. Placeholders render muted.
pub fn input_style<T: Theme + ?Sized>(theme: &T, showing_placeholder: bool) -> Style {
    let ThemeRoles { surface, .. } = *theme.roles();
    let style = if showing_placeholder {
        theme.text_muted_style()
    } else {
        theme.text_primary_style()
    };
    style.bg(surface)
}
