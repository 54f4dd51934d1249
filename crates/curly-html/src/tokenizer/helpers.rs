//! Helper methods for the scanner.
//!
//! - State transitions ("switch to")
//! - Cursor access ("consume", "peek")
//! - Position marks for tags and expressions
//! - Sealing tokens and building syntax errors

use tracing::trace;

use super::scanner::{Scanner, TokenizerState};
use crate::error::{SyntaxError, SyntaxErrorKind};
use crate::position::Position;
use crate::sink::TokenSink;

// =============================================================================
// State Transition Helpers
// =============================================================================

impl<R> Scanner<R> {
    /// Transition to `new_state`. The next iteration of the run loop
    /// dispatches to its handler.
    pub(super) fn switch_to(&mut self, new_state: TokenizerState) {
        if self.state != new_state {
            trace!(from = %self.state, to = %new_state, "state transition");
        }
        self.state = new_state;
    }
}

// =============================================================================
// Input Helpers
// =============================================================================

impl<R> Scanner<R> {
    /// Take the character under the cursor, updating line and column.
    pub(super) fn consume(&mut self) -> Option<char> {
        self.input.consume()
    }

    /// The character under the cursor.
    pub(super) fn peek(&self) -> Option<char> {
        self.input.peek()
    }

    /// The character after the one under the cursor.
    pub(super) fn peek_next(&self) -> Option<char> {
        self.input.peek_next()
    }

    /// Remember where the current `<` is, before it is consumed.
    pub(super) const fn mark_tag_start(&mut self) {
        self.tag_start = self.input.position();
    }

    /// Remember where the first `{` of the current `{{` was.
    pub(super) const fn mark_expression_open(&mut self, open: Position) {
        self.expression_start = open;
    }
}

// =============================================================================
// Token Helpers
// =============================================================================

impl<R> Scanner<R> {
    /// Seal the current tag and return to the initial state.
    pub(super) fn finish_tag(&mut self, sink: &mut dyn TokenSink) {
        sink.finish_tag(self.input.position());
        self.switch_to(TokenizerState::BeforeData);
    }

    /// Seal the current comment and return to the initial state.
    pub(super) fn finish_comment(&mut self, sink: &mut dyn TokenSink) {
        sink.finish_comment(self.input.position());
        self.switch_to(TokenizerState::BeforeData);
    }

    /// Give the current attribute an empty unquoted value.
    pub(super) fn finish_valueless_attribute(sink: &mut dyn TokenSink) {
        sink.begin_attribute_value(false);
        sink.finish_attribute_value();
    }

    /// A syntax error at the cursor, inside the most recently opened
    /// expression.
    pub(super) const fn syntax_error(&self, kind: SyntaxErrorKind) -> SyntaxError {
        SyntaxError::new(kind, self.input.position(), self.expression_start)
    }
}
