//! ANSI 256-color fallback for terminals without truecolor support.
//!
//! Indexed approximations of the Dracula roles keep the UI legible inside
//! macOS Terminal and other 8-bit terminals.

use ratatui::style::Color;

use super::roles::{Theme, ThemeRoles};

#[derive(Debug, Clone)]
pub struct Ansi256Theme {
    roles: ThemeRoles,
}

impl Ansi256Theme {
    pub fn new() -> Self {
        Self {
            roles: ThemeRoles {
                background: Color::Indexed(236),
                surface: Color::Indexed(236),
                border: Color::Indexed(239),

                text: Color::Indexed(255),
                text_secondary: Color::Indexed(250),
                text_muted: Color::Indexed(247),

                accent_primary: Color::Indexed(212),
                accent_secondary: Color::Indexed(117),

                success: Color::Indexed(84),
                warning: Color::Indexed(215),
                error: Color::Indexed(203),

                selection_bg: Color::Indexed(239),
                selection_fg: Color::Indexed(255),
                focus: Color::Indexed(117),

                table_row_even: Color::Indexed(235),
                table_row_odd: Color::Indexed(237),
            },
        }
    }
}

impl Default for Ansi256Theme {
    fn default() -> Self {
        Self::new()
    }
}

impl Theme for Ansi256Theme {
    fn roles(&self) -> &ThemeRoles {
        &self.roles
    }
}
