//! Editing surface: line-based text with a cursor

/// Cursor position in the surface
///
/// `col` counts characters, not bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Position {
    pub row: usize,
    pub col: usize,
}

impl Position {
    pub const fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }

    pub const fn zero() -> Self {
        Self { row: 0, col: 0 }
    }
}

/// Editable text surface
///
/// Holds the text the user is typing as lines plus a cursor. It never talks
/// to the console; hosts push `as_string()` into the source buffer after
/// every edit that returns `true`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditSurface {
    lines: Vec<String>,
    cursor: Position,
}

impl EditSurface {
    pub fn new() -> Self {
        Self {
            lines: vec![String::new()],
            cursor: Position::zero(),
        }
    }

    /// Create a surface holding `text`, cursor at the end
    pub fn from_text(text: &str) -> Self {
        let mut surface = Self::new();
        surface.set_text(text);
        surface
    }

    /// Full text, lines joined with `\n`
    pub fn as_string(&self) -> String {
        self.lines.join("\n")
    }

    /// Replace everything, cursor at the end
    pub fn set_text(&mut self, text: &str) {
        self.lines = text.split('\n').map(String::from).collect();
        let row = self.lines.len() - 1;
        self.cursor = Position::new(row, char_len(&self.lines[row]));
    }

    pub fn line_count(&self) -> usize {
        self.lines.len()
    }

    pub fn line(&self, row: usize) -> Option<&str> {
        self.lines.get(row).map(|s| s.as_str())
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    pub fn cursor(&self) -> Position {
        self.cursor
    }

    pub fn is_empty(&self) -> bool {
        self.lines.len() == 1 && self.lines[0].is_empty()
    }

    /// Type text at the cursor; `\n` splits lines
    pub fn insert_text(&mut self, text: &str) -> bool {
        let mut changed = false;
        for ch in text.chars() {
            changed |= if ch == '\n' {
                self.insert_newline()
            } else {
                self.insert_char(ch)
            };
        }
        changed
    }

    /// Insert a character at the cursor
    pub fn insert_char(&mut self, ch: char) -> bool {
        let Position { row, col } = self.cursor;
        let line = &mut self.lines[row];
        let at = byte_index(line, col);
        line.insert(at, ch);
        self.cursor.col += 1;
        true
    }

    /// Split the current line at the cursor
    pub fn insert_newline(&mut self) -> bool {
        let Position { row, col } = self.cursor;
        let line = &mut self.lines[row];
        let at = byte_index(line, col);
        let rest = line.split_off(at);
        self.lines.insert(row + 1, rest);
        self.cursor = Position::new(row + 1, 0);
        true
    }

    /// Delete the character before the cursor, joining lines at column 0
    pub fn backspace(&mut self) -> bool {
        let Position { row, col } = self.cursor;
        if col > 0 {
            let line = &mut self.lines[row];
            let at = byte_index(line, col - 1);
            line.remove(at);
            self.cursor.col -= 1;
            true
        } else if row > 0 {
            let current = self.lines.remove(row);
            let prev = &mut self.lines[row - 1];
            let new_col = char_len(prev);
            prev.push_str(&current);
            self.cursor = Position::new(row - 1, new_col);
            true
        } else {
            false
        }
    }

    pub fn move_left(&mut self) {
        if self.cursor.col > 0 {
            self.cursor.col -= 1;
        } else if self.cursor.row > 0 {
            self.cursor.row -= 1;
            self.cursor.col = char_len(&self.lines[self.cursor.row]);
        }
    }

    pub fn move_right(&mut self) {
        let len = char_len(&self.lines[self.cursor.row]);
        if self.cursor.col < len {
            self.cursor.col += 1;
        } else if self.cursor.row + 1 < self.lines.len() {
            self.cursor = Position::new(self.cursor.row + 1, 0);
        }
    }

    pub fn move_up(&mut self) {
        if self.cursor.row > 0 {
            self.cursor.row -= 1;
            self.clamp_col();
        }
    }

    pub fn move_down(&mut self) {
        if self.cursor.row + 1 < self.lines.len() {
            self.cursor.row += 1;
            self.clamp_col();
        }
    }

    pub fn move_home(&mut self) {
        self.cursor.col = 0;
    }

    pub fn move_end(&mut self) {
        self.cursor.col = char_len(&self.lines[self.cursor.row]);
    }

    fn clamp_col(&mut self) {
        let len = char_len(&self.lines[self.cursor.row]);
        self.cursor.col = self.cursor.col.min(len);
    }
}

impl Default for EditSurface {
    fn default() -> Self {
        Self::new()
    }
}

fn char_len(line: &str) -> usize {
    line.chars().count()
}

fn byte_index(line: &str, col: usize) -> usize {
    line.char_indices()
        .nth(col)
        .map_or(line.len(), |(index, _)| index)
}
