use super::{Ansi256Theme, DraculaTheme, NordTheme, Theme};

/// Describes a selectable theme.
#[derive(Clone, Copy, Debug)]
pub struct ThemeDefinition {
    /// Canonical identifier used in preferences and `--theme`.
    pub id: &'static str,
    /// Human-friendly display name.
    pub label: &'static str,
    /// Alternate spellings accepted from flags and the environment.
    pub aliases: &'static [&'static str],
    /// Whether the palette targets ANSI/8-bit terminals.
    pub is_ansi_fallback: bool,
    factory: fn() -> Box<dyn Theme>,
}

impl ThemeDefinition {
    /// Instantiate the theme represented by this definition.
    pub fn build(&self) -> Box<dyn Theme> {
        (self.factory)()
    }
}

pub const DEFAULT_TRUECOLOR_ID: &str = "dracula";
pub const DEFAULT_ANSI_ID: &str = "ansi256";

pub const THEME_DEFINITIONS: &[ThemeDefinition] = &[
    ThemeDefinition {
        id: DEFAULT_TRUECOLOR_ID,
        label: "Dracula",
        aliases: &["dracula", "dark"],
        is_ansi_fallback: false,
        factory: || Box::new(DraculaTheme::new()),
    },
    ThemeDefinition {
        id: "nord",
        label: "Nord",
        aliases: &["nord", "polar"],
        is_ansi_fallback: false,
        factory: || Box::new(NordTheme::new()),
    },
    ThemeDefinition {
        id: DEFAULT_ANSI_ID,
        label: "ANSI 256",
        aliases: &["ansi256", "ansi", "256"],
        is_ansi_fallback: true,
        factory: || Box::new(Ansi256Theme::new()),
    },
];

/// Locate a definition by id or alias (case-insensitive).
pub fn resolve(name: &str) -> Option<&'static ThemeDefinition> {
    THEME_DEFINITIONS.iter().find(|definition| {
        definition.id.eq_ignore_ascii_case(name) || definition.aliases.iter().any(|alias| alias.eq_ignore_ascii_case(name))
    })
}

/// Preferred default for truecolor terminals.
pub fn default_truecolor() -> &'static ThemeDefinition {
    &THEME_DEFINITIONS[0]
}

/// Preferred default for ANSI-only terminals.
pub fn default_ansi() -> &'static ThemeDefinition {
    &THEME_DEFINITIONS[2]
}
