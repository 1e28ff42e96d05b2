//! Nord palette mapped onto the application's theme roles.

use ratatui::style::Color;

use super::roles::{Theme, ThemeRoles};

// Polar Night
pub const N0: Color = Color::Rgb(0x2E, 0x34, 0x40); // #2E3440
pub const N1: Color = Color::Rgb(0x3B, 0x42, 0x52); // #3B4252
pub const N3: Color = Color::Rgb(0x4C, 0x56, 0x6A); // #4C566A

// Snow Storm
pub const S0: Color = Color::Rgb(0xD8, 0xDE, 0xE9); // #D8DEE9
pub const S1: Color = Color::Rgb(0xE5, 0xE9, 0xF0); // #E5E9F0
pub const S2: Color = Color::Rgb(0xEC, 0xEF, 0xF4); // #ECEFF4

// Frost
pub const F1: Color = Color::Rgb(0x88, 0xC0, 0xD0); // #88C0D0
pub const F2: Color = Color::Rgb(0x81, 0xA1, 0xC1); // #81A1C1

// Aurora
pub const A_RED: Color = Color::Rgb(0xBF, 0x61, 0x6A); // #BF616A
pub const A_ORANGE: Color = Color::Rgb(0xD0, 0x87, 0x70); // #D08770
pub const A_GREEN: Color = Color::Rgb(0xA3, 0xBE, 0x8C); // #A3BE8C

pub const TEXT_MUTED: Color = Color::Rgb(0x61, 0x6E, 0x88); // #616E88

/// Nord theme with frost accents and aurora status colors.
#[derive(Debug, Clone)]
pub struct NordTheme {
    roles: ThemeRoles,
}

impl NordTheme {
    pub fn new() -> Self {
        Self {
            roles: ThemeRoles {
                background: N0,
                surface: N1,
                border: N3,

                text: S0,
                text_secondary: S1,
                text_muted: TEXT_MUTED,

                accent_primary: F1,
                accent_secondary: F2,

                success: A_GREEN,
                warning: A_ORANGE,
                error: A_RED,

                selection_bg: N3,
                selection_fg: S2,
                focus: F1,

                table_row_even: Color::Rgb(0x23, 0x28, 0x31),
                table_row_odd: Color::Rgb(0x2D, 0x33, 0x3F),
            },
        }
    }
}

impl Default for NordTheme {
    fn default() -> Self {
        Self::new()
    }
}

impl Theme for NordTheme {
    fn roles(&self) -> &ThemeRoles {
        &self.roles
    }
}
