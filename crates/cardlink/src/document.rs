//! Editable-document collaborator
//!
//! The orchestrator never talks to a concrete editor; it goes through
//! [`EditableDocument`], a line/column addressed text buffer with range
//! replace. [`TextBuffer`] is the in-memory implementation used by tests
//! and the CLI.

/// Line/column address inside a document (zero-based, columns in chars)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Position {
    pub line: usize,
    pub col: usize,
}

/// Minimal contract the orchestrator needs from a host editor
pub trait EditableDocument {
    /// Full document text
    fn text(&self) -> String;

    /// Currently selected text (may be empty)
    fn selection(&self) -> String;

    /// Replace the current selection, collapsing it after the inserted text
    fn replace_selection(&mut self, replacement: &str);

    /// Replace the text between two positions
    fn replace_range(&mut self, from: Position, to: Position, replacement: &str);
}

/// Map a byte offset to a line/column position by counting newlines
pub fn offset_to_position(text: &str, offset: usize) -> Position {
    let before = &text[..offset.min(text.len())];
    let line = before.matches('\n').count();
    let col = before
        .rsplit('\n')
        .next()
        .unwrap_or("")
        .chars()
        .count();
    Position { line, col }
}

/// In-memory document: a string plus a byte-range selection
#[derive(Debug, Clone, Default)]
pub struct TextBuffer {
    text: String,
    selection: (usize, usize),
}

impl TextBuffer {
    /// Create a buffer with an empty selection at the start
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            selection: (0, 0),
        }
    }

    /// Select the byte range `[start, end)`
    pub fn select(&mut self, start: usize, end: usize) {
        debug_assert!(start <= end && end <= self.text.len());
        self.selection = (start, end);
    }

    fn position_to_offset(&self, pos: Position) -> usize {
        let mut offset = 0;
        for (i, line) in self.text.split('\n').enumerate() {
            if i == pos.line {
                let col_bytes: usize = line.chars().take(pos.col).map(char::len_utf8).sum();
                return offset + col_bytes;
            }
            offset += line.len() + 1;
        }
        self.text.len()
    }
}

impl EditableDocument for TextBuffer {
    fn text(&self) -> String {
        self.text.clone()
    }

    fn selection(&self) -> String {
        self.text[self.selection.0..self.selection.1].to_string()
    }

    fn replace_selection(&mut self, replacement: &str) {
        let (start, end) = self.selection;
        self.text.replace_range(start..end, replacement);
        let caret = start + replacement.len();
        self.selection = (caret, caret);
    }

    fn replace_range(&mut self, from: Position, to: Position, replacement: &str) {
        let start = self.position_to_offset(from);
        let end = self.position_to_offset(to);
        self.text.replace_range(start..end, replacement);
    }
}
