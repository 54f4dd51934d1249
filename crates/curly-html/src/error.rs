//! Errors raised by the tokenizer.
//!
//! Almost all malformed input is absorbed by the state machine. The only
//! unrecoverable cases are inside `{{...}}` expressions, where a stray `}` or
//! a quoted literal running straight into another character would make the
//! rest of the expression ambiguous.

use thiserror::Error;

use crate::position::Position;

/// What went wrong inside an expression.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum SyntaxErrorKind {
    /// A single `}` followed by something other than a second `}`.
    #[error("expressions may only contain '}}' as the closing '}}}}', found '}}' followed by {found:?}")]
    UnpairedClosingBrace {
        /// The character after the lone `}`.
        found: char,
    },

    /// A quoted attribute name not followed by whitespace, `=` or `}`.
    #[error("quoted expression attribute names must be followed by whitespace, '=' or '}}', found {found:?}")]
    UnterminatedAttributeLiteral {
        /// The character directly after the closing quote.
        found: char,
    },

    /// A quoted attribute value not followed by whitespace or `}`.
    #[error("quoted expression attribute values must be followed by whitespace or '}}', found {found:?}")]
    UnterminatedValueLiteral {
        /// The character directly after the closing quote.
        found: char,
    },
}

/// An unrecoverable syntax violation.
///
/// Tokenization of the current input stops at the violating character, and
/// every token produced by the failing call is discarded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("syntax error at line {}, column {}: {kind}", .position.line, .position.column)]
pub struct SyntaxError {
    /// The specific violation.
    pub kind: SyntaxErrorKind,
    /// Position just after the violating character.
    pub position: Position,
    /// Position of the `{{` that opened the broken expression.
    pub expression_start: Position,
}

impl SyntaxError {
    /// Create an error of `kind` at `position` inside the expression opened
    /// at `expression_start`.
    #[must_use]
    pub const fn new(kind: SyntaxErrorKind, position: Position, expression_start: Position) -> Self {
        Self {
            kind,
            position,
            expression_start,
        }
    }
}
