use ratatui::layout::Rect;

/// Single-line text input with a character-indexed cursor
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Editor {
    chars: Vec<char>,
    cursor: usize,
}

impl Editor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_string(content: impl AsRef<str>) -> Self {
        let chars: Vec<char> = content.as_ref().chars().filter(|c| *c != '\n').collect();
        let cursor = chars.len();
        Self { chars, cursor }
    }

    pub fn insert_char(&mut self, ch: char) {
        if ch == '\n' || ch == '\r' {
            return;
        }
        self.chars.insert(self.cursor, ch);
        self.cursor += 1;
    }

    /// Backspace
    pub fn delete_char(&mut self) {
        if self.cursor > 0 {
            self.cursor -= 1;
            self.chars.remove(self.cursor);
        }
    }

    /// Delete key
    pub fn delete_forward(&mut self) {
        if self.cursor < self.chars.len() {
            self.chars.remove(self.cursor);
        }
    }

    pub fn move_cursor_left(&mut self) {
        self.cursor = self.cursor.saturating_sub(1);
    }

    pub fn move_cursor_right(&mut self) {
        self.cursor = (self.cursor + 1).min(self.chars.len());
    }

    pub fn move_cursor_home(&mut self) {
        self.cursor = 0;
    }

    pub fn move_cursor_end(&mut self) {
        self.cursor = self.chars.len();
    }

    pub fn clear(&mut self) {
        self.chars.clear();
        self.cursor = 0;
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn is_empty(&self) -> bool {
        self.chars.is_empty()
    }

    pub fn to_string(&self) -> String {
        self.chars.iter().collect()
    }

    /// Text to draw, with every character replaced when `masked`
    pub fn display(&self, masked: bool) -> String {
        if masked {
            "•".repeat(self.chars.len())
        } else {
            self.to_string()
        }
    }

    /// Visible slice and cursor column for a field `width` characters wide
    pub fn visible(&self, width: usize, masked: bool) -> (String, usize) {
        let text: Vec<char> = self.display(masked).chars().collect();
        if width == 0 {
            return (String::new(), 0);
        }
        let offset = (self.cursor + 1).saturating_sub(width);
        let shown: String = text.iter().skip(offset).take(width).collect();
        (shown, self.cursor - offset)
    }

    /// Screen position of the cursor inside a bordered field area
    pub fn get_cursor_screen_pos(&self, area: Rect) -> Option<(u16, u16)> {
        let inner_width = area.width.saturating_sub(2) as usize;
        if inner_width == 0 || area.height < 3 {
            return None;
        }
        let (_, col) = self.visible(inner_width, false);
        Some((area.x + 1 + col as u16, area.y + 1))
    }
}
