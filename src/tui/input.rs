// Draft input line editing
//
// A single-line edit buffer with a character cursor. The draft mirrors every
// keystroke; it is cleared by the app only when a send actually dispatches,
// so a blocked send (busy, blank) leaves the text in place.

/// Single-line input buffer with cursor editing
#[derive(Debug, Clone, Default)]
pub struct InputState {
    /// Draft text as typed
    buffer: String,
    /// Cursor position in characters (not bytes)
    cursor: usize,
}

impl InputState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn as_str(&self) -> &str {
        &self.buffer
    }

    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }

    /// Cursor position in characters
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Byte offset of the cursor, for splicing into the buffer
    fn byte_index(&self) -> usize {
        self.buffer
            .char_indices()
            .nth(self.cursor)
            .map(|(i, _)| i)
            .unwrap_or(self.buffer.len())
    }

    pub fn insert_char(&mut self, c: char) {
        let at = self.byte_index();
        self.buffer.insert(at, c);
        self.cursor += 1;
    }

    /// Delete the character before the cursor
    pub fn backspace(&mut self) {
        if self.cursor == 0 {
            return;
        }
        self.cursor -= 1;
        let at = self.byte_index();
        self.buffer.remove(at);
    }

    /// Delete the character under the cursor
    pub fn delete(&mut self) {
        if self.cursor >= self.buffer.chars().count() {
            return;
        }
        let at = self.byte_index();
        self.buffer.remove(at);
    }

    pub fn move_left(&mut self) {
        self.cursor = self.cursor.saturating_sub(1);
    }

    pub fn move_right(&mut self) {
        if self.cursor < self.buffer.chars().count() {
            self.cursor += 1;
        }
    }

    pub fn move_home(&mut self) {
        self.cursor = 0;
    }

    pub fn move_end(&mut self) {
        self.cursor = self.buffer.chars().count();
    }

    pub fn clear(&mut self) {
        self.buffer.clear();
        self.cursor = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn typed(s: &str) -> InputState {
        let mut input = InputState::new();
        for c in s.chars() {
            input.insert_char(c);
        }
        input
    }

    #[test]
    fn insert_advances_cursor() {
        let input = typed("hello");
        assert_eq!(input.as_str(), "hello");
        assert_eq!(input.cursor(), 5);
    }

    #[test]
    fn insert_mid_buffer() {
        let mut input = typed("hllo");
        input.move_home();
        input.move_right();
        input.insert_char('e');
        assert_eq!(input.as_str(), "hello");
        assert_eq!(input.cursor(), 2);
    }

    #[test]
    fn backspace_and_delete() {
        let mut input = typed("abc");
        input.backspace();
        assert_eq!(input.as_str(), "ab");

        input.move_home();
        input.delete();
        assert_eq!(input.as_str(), "b");

        // No-ops at the boundaries
        input.move_home();
        input.backspace();
        input.move_end();
        input.delete();
        assert_eq!(input.as_str(), "b");
    }

    #[test]
    fn cursor_handles_multibyte_chars() {
        let mut input = typed("naïve");
        assert_eq!(input.cursor(), 5);

        input.move_left();
        input.move_left();
        input.move_left();
        input.backspace(); // removes 'ï'
        assert_eq!(input.as_str(), "nave");
        assert_eq!(input.cursor(), 1);
    }

    #[test]
    fn clear_resets_cursor() {
        let mut input = typed("draft");
        input.clear();
        assert!(input.is_empty());
        assert_eq!(input.cursor(), 0);
    }
}
