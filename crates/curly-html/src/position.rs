//! Source positions and the position-tracking input buffer.
//!
//! Lines are 1-based, columns 0-based. Consuming a `\n` moves to the next
//! line and resets the column to 0; any other character moves one column
//! right. The buffer only grows: chunks fed later are appended, and nothing
//! already buffered is discarded while the stream is open.

use std::fmt;

use serde::Serialize;

/// A line/column location in the (preprocessed) input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct Position {
    /// 1-based line number.
    pub line: usize,
    /// 0-based column within the line.
    pub column: usize,
}

impl Position {
    /// The position of the first character of a stream.
    pub const START: Self = Self { line: 1, column: 0 };

    /// Create a position from a line and column.
    #[must_use]
    pub const fn new(line: usize, column: usize) -> Self {
        Self { line, column }
    }
}

impl Default for Position {
    fn default() -> Self {
        Self::START
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

/// The half-open source range a token was scanned from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct SourceSpan {
    /// Where the token began.
    pub start: Position,
    /// Where the next token begins.
    pub end: Position,
}

impl SourceSpan {
    /// Create a span between two positions.
    #[must_use]
    pub const fn new(start: Position, end: Position) -> Self {
        Self { start, end }
    }
}

impl fmt::Display for SourceSpan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.start, self.end)
    }
}

/// Growable character buffer with a cursor that tracks line and column.
#[derive(Debug, Clone, Default)]
pub struct SourceBuffer {
    chars: Vec<char>,
    index: usize,
    position: Position,
}

impl SourceBuffer {
    /// Create an empty buffer positioned at line 1, column 0.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Drop all buffered input and rewind to the start position.
    pub fn clear(&mut self) {
        self.chars.clear();
        self.index = 0;
        self.position = Position::START;
    }

    /// Append already-preprocessed input after everything buffered so far.
    pub fn push_str(&mut self, input: &str) {
        self.chars.extend(input.chars());
    }

    /// The character under the cursor, if any is buffered.
    #[must_use]
    pub fn peek(&self) -> Option<char> {
        self.chars.get(self.index).copied()
    }

    /// The character after the one under the cursor, if buffered.
    #[must_use]
    pub fn peek_next(&self) -> Option<char> {
        self.chars.get(self.index + 1).copied()
    }

    /// Take the character under the cursor and advance past it.
    ///
    /// Returns `None` without moving when the buffer is exhausted.
    pub fn consume(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.index += 1;
        if c == '\n' {
            self.position.line += 1;
            self.position.column = 0;
        } else {
            self.position.column += 1;
        }
        Some(c)
    }

    /// Consume `count` characters, stopping early at the end of the buffer.
    pub fn consume_n(&mut self, count: usize) {
        for _ in 0..count {
            if self.consume().is_none() {
                break;
            }
        }
    }

    /// Absolute offset of the cursor, in characters.
    #[must_use]
    pub const fn index(&self) -> usize {
        self.index
    }

    /// Number of characters buffered so far.
    #[must_use]
    pub fn len(&self) -> usize {
        self.chars.len()
    }

    /// Whether nothing has been buffered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.chars.is_empty()
    }

    /// Whether the cursor has reached the end of the buffered input.
    #[must_use]
    pub fn is_at_end(&self) -> bool {
        self.index >= self.chars.len()
    }

    /// Line and column of the cursor.
    #[must_use]
    pub const fn position(&self) -> Position {
        self.position
    }

    /// Offset of the first `needle` at or after the cursor.
    #[must_use]
    pub fn find_from_cursor(&self, needle: char) -> Option<usize> {
        self.chars[self.index..]
            .iter()
            .position(|&c| c == needle)
            .map(|offset| self.index + offset)
    }

    /// The buffered characters in `start..end` as a string.
    #[must_use]
    pub fn slice(&self, start: usize, end: usize) -> String {
        self.chars[start..end].iter().collect()
    }
}
