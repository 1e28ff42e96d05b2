//! UTF-8 safe single-line text input with cursor, placeholder and focus.
//!
//! The state is a plain value so the application model can be cloned and
//! compared as a whole. Rendering lives in `ui::main`.

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TextInputState {
    /// The underlying text buffer
    input: String,
    /// Cursor byte index into `input` (always on a UTF-8 boundary)
    cursor: usize,
    placeholder: String,
    focused: bool,
}

impl TextInputState {
    pub fn new() -> Self {
        Self::default()
    }

    // ----- Getters -----
    pub fn input(&self) -> &str {
        &self.input
    }
    pub fn cursor(&self) -> usize {
        self.cursor
    }
    pub fn placeholder(&self) -> &str {
        &self.placeholder
    }
    pub fn is_focused(&self) -> bool {
        self.focused
    }
    /// True when the buffer holds only whitespace.
    pub fn is_empty(&self) -> bool {
        self.input.trim().is_empty()
    }

    // ----- Setters -----
    pub fn set_input<S: Into<String>>(&mut self, s: S) {
        self.input = s.into();
        self.cursor = self.input.len();
    }

    pub fn set_placeholder<S: Into<String>>(&mut self, placeholder: S) {
        self.placeholder = placeholder.into();
    }

    pub fn focus(&mut self) {
        self.focused = true;
    }

    pub fn blur(&mut self) {
        self.focused = false;
    }

    /// Clear the buffer and move the cursor home. Placeholder and focus are kept.
    pub fn reset(&mut self) {
        self.input.clear();
        self.cursor = 0;
    }

    // ----- Editing primitives (UTF-8 safe) -----

    /// Move cursor one Unicode scalar to the left.
    pub fn move_left(&mut self) {
        if self.cursor == 0 {
            return;
        }
        let prev_len = self.input[..self.cursor].chars().last().map(|c| c.len_utf8()).unwrap_or(1);
        self.cursor = self.cursor.saturating_sub(prev_len);
    }

    /// Move cursor one Unicode scalar to the right.
    pub fn move_right(&mut self) {
        if let Some(next) = self.input[self.cursor..].chars().next() {
            self.cursor += next.len_utf8();
        }
    }

    /// Insert a char at the cursor.
    pub fn insert_char(&mut self, c: char) {
        self.input.insert(self.cursor, c);
        self.cursor += c.len_utf8();
    }

    /// Backspace the char immediately before the cursor.
    pub fn backspace(&mut self) {
        if self.cursor == 0 {
            return;
        }
        let prev = self.input[..self.cursor].chars().last().map(|c| c.len_utf8()).unwrap_or(1);
        let start = self.cursor - prev;
        self.input.drain(start..self.cursor);
        self.cursor = start;
    }
}
