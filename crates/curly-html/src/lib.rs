//! Streaming tokenizer for HTML markup interleaved with `{{expression}}`
//! template syntax.
//!
//! # Scope
//!
//! This crate implements:
//! - **Scanner**: a character-level state machine that walks the input once,
//!   tracking line and column, and reports lexical events to a
//!   [`TokenSink`].
//!   - Text runs with character reference decoding
//!   - Start and end tags, attributes (quoted, unquoted, valueless),
//!     self-closing detection
//!   - `<!-- -->` comments, including the permissive `<!-->` and stray `--`
//!   - `{{name attr=value "literal"}}`, `{{#block}}` and `{{/block}}`
//!     expressions
//!
//! - **Token builder**: the reference [`TokenSink`], producing a flat
//!   sequence of [`Token`]s with optional [`SourceSpan`]s.
//!
//! Input may be fed in chunks; the result is the same as feeding it at once.
//!
//! # Not Implemented
//!
//! - Document structure validation (nesting, void elements)
//! - `<!DOCTYPE>`, CDATA and other markup declarations besides comments
//! - Expression semantics and `{{! ... }}` comment expressions
//! - Expressions embedded inside tag attribute values

/// Token construction and the tokenizer facade.
pub mod builder;
/// Character reference resolution.
pub mod entity;
/// Syntax errors.
pub mod error;
/// Source positions and the position-tracking input buffer.
pub mod position;
/// Line ending normalization and character classes.
pub mod preprocess;
/// The lexical event interface.
pub mod sink;
/// Token types produced by the builder.
pub mod token;
/// The scanner state machine.
pub mod tokenizer;

pub use builder::{TokenBuilder, Tokenizer, TokenizerOptions, tokenize};
pub use entity::{EntityResolver, NamedEntities};
pub use error::{SyntaxError, SyntaxErrorKind};
pub use position::{Position, SourceSpan};
pub use sink::TokenSink;
pub use token::{Attribute, AttributeExpression, ExpressionAttribute, Token, TokenKind};
pub use tokenizer::{Scanner, TokenizerState};
