use std::fmt::Debug;

use ratatui::style::{Color, Modifier, Style};

/// Semantic color roles used by the screens, status line and hint bar.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ThemeRoles {
    pub background: Color,
    pub surface: Color,
    pub border: Color,

    pub text: Color,
    pub text_secondary: Color,
    pub text_muted: Color,

    /// Key labels in the hint bar and the screen title.
    pub accent_primary: Color,
    /// Breadcrumb and throbber.
    pub accent_secondary: Color,

    pub success: Color,
    pub warning: Color,
    pub error: Color,

    pub selection_bg: Color,
    pub selection_fg: Color,
    /// Border of the active text input.
    pub focus: Color,

    pub table_row_even: Color,
    pub table_row_odd: Color,
}

/// Theme trait exposes semantic roles and common style builders.
pub trait Theme: Send + Sync + Debug {
    fn roles(&self) -> &ThemeRoles;

    fn text_primary_style(&self) -> Style {
        Style::default().fg(self.roles().text)
    }
    fn text_secondary_style(&self) -> Style {
        Style::default().fg(self.roles().text_secondary)
    }
    fn text_muted_style(&self) -> Style {
        Style::default().fg(self.roles().text_muted)
    }

    fn border_style(&self, focused: bool) -> Style {
        let color = if focused { self.roles().focus } else { self.roles().border };
        Style::default().fg(color)
    }

    fn selection_style(&self) -> Style {
        Style::default().fg(self.roles().selection_fg).bg(self.roles().selection_bg)
    }

    fn status_success(&self) -> Style {
        Style::default().fg(self.roles().success)
    }
    fn status_warning(&self) -> Style {
        Style::default().fg(self.roles().warning)
    }
    fn status_error(&self) -> Style {
        Style::default().fg(self.roles().error)
    }

    fn accent_secondary_style(&self) -> Style {
        Style::default().fg(self.roles().accent_secondary)
    }
    fn accent_emphasis_style(&self) -> Style {
        Style::default().fg(self.roles().accent_primary).add_modifier(Modifier::BOLD)
    }
}
