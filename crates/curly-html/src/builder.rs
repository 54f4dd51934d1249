//! Token construction.
//!
//! [`TokenBuilder`] is the reference [`TokenSink`]: it turns scanner events
//! into [`Token`]s and stamps source spans. [`Tokenizer`] pairs it with a
//! [`Scanner`] and exposes the whole-document and streaming entry points.

use serde::Deserialize;
use tracing::debug;

use crate::entity::{EntityResolver, NamedEntities};
use crate::error::SyntaxError;
use crate::position::{Position, SourceSpan};
use crate::sink::TokenSink;
use crate::token::{Attribute, Token, TokenKind};
use crate::tokenizer::Scanner;

/// Tokenizer configuration.
///
/// Deserializes from a document such as `{"track_locations": true}`. Missing
/// keys take their defaults and unknown keys are ignored. The short key `loc`
/// is accepted as an alias.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct TokenizerOptions {
    /// Attach a [`SourceSpan`] to every finished token.
    #[serde(alias = "loc")]
    pub track_locations: bool,
}

impl TokenizerOptions {
    /// Set whether tokens carry source spans.
    #[must_use]
    pub const fn with_locations(mut self, track_locations: bool) -> Self {
        self.track_locations = track_locations;
        self
    }
}

/// An attribute whose value has not been closed yet.
#[derive(Debug, Default)]
struct PendingAttribute {
    name: String,
    values: Vec<String>,
    // Unknown until the value begins.
    quoted: Option<bool>,
}

impl PendingAttribute {
    fn seal(self) -> Attribute {
        Attribute {
            name: self.name,
            values: self.values,
            embedded_expressions: Vec::new(),
            quoted: self.quoted.unwrap_or(false),
        }
    }
}

/// Builds [`Token`]s from scanner events.
///
/// Holds the token under construction and, inside a start tag, the attribute
/// under construction. Tokens are collected as they are sealed and handed out
/// by [`take_tokens`](Self::take_tokens).
#[derive(Debug, Default)]
pub struct TokenBuilder {
    options: TokenizerOptions,
    tokens: Vec<Token>,
    current: Option<TokenKind>,
    attribute: Option<PendingAttribute>,
    // Where the next sealed token starts.
    token_start: Position,
}

impl TokenBuilder {
    /// Create a builder with the given options.
    #[must_use]
    pub fn new(options: TokenizerOptions) -> Self {
        Self {
            options,
            ..Self::default()
        }
    }

    /// The options this builder was created with.
    #[must_use]
    pub const fn options(&self) -> TokenizerOptions {
        self.options
    }

    /// Remove and return every token sealed since the last call.
    pub fn take_tokens(&mut self) -> Vec<Token> {
        std::mem::take(&mut self.tokens)
    }

    fn begin(&mut self, kind: TokenKind) {
        self.current = Some(kind);
    }

    fn seal(&mut self, end: Position) {
        let Some(kind) = self.current.take() else {
            return;
        };
        let mut token = Token::new(kind);
        if self.options.track_locations {
            token = token.with_loc(SourceSpan::new(self.token_start, end));
        }
        self.token_start = end;
        self.tokens.push(token);
    }
}

impl TokenSink for TokenBuilder {
    fn reset(&mut self) {
        self.tokens.clear();
        self.current = None;
        self.attribute = None;
        self.token_start = Position::START;
    }

    // Text

    fn begin_chars(&mut self) {
        self.begin(TokenKind::new_chars());
    }

    fn append_chars(&mut self, text: &str) {
        if let Some(kind) = self.current.as_mut() {
            kind.append_to_text(text);
        }
    }

    fn finish_chars(&mut self, end: Position) {
        self.seal(end);
    }

    // Comments

    fn begin_comment(&mut self) {
        self.begin(TokenKind::new_comment());
    }

    fn append_comment(&mut self, text: &str) {
        if let Some(kind) = self.current.as_mut() {
            kind.append_to_text(text);
        }
    }

    fn finish_comment(&mut self, end: Position) {
        self.seal(end);
    }

    // Tags

    fn begin_start_tag(&mut self) {
        self.begin(TokenKind::new_start_tag());
    }

    fn begin_end_tag(&mut self) {
        self.begin(TokenKind::new_end_tag());
    }

    fn append_tag_name(&mut self, c: char) {
        if let Some(kind) = self.current.as_mut() {
            kind.append_to_tag_name(c);
        }
    }

    fn begin_attribute(&mut self) {
        self.attribute = Some(PendingAttribute::default());
    }

    fn append_attribute_name(&mut self, c: char) {
        if let Some(attribute) = self.attribute.as_mut() {
            attribute.name.push(c);
        }
    }

    fn begin_attribute_value(&mut self, quoted: bool) {
        if let Some(attribute) = self.attribute.as_mut() {
            attribute.values.push(String::new());
            attribute.quoted = Some(quoted);
        }
    }

    fn append_attribute_value(&mut self, text: &str) {
        if let Some(value) = self
            .attribute
            .as_mut()
            .and_then(|attribute| attribute.values.last_mut())
        {
            value.push_str(text);
        }
    }

    fn finish_attribute_value(&mut self) {
        let Some(attribute) = self.attribute.take() else {
            return;
        };
        if let Some(kind) = self.current.as_mut() {
            kind.push_attribute(attribute.seal());
        }
    }

    fn mark_self_closing(&mut self) {
        if let Some(kind) = self.current.as_mut() {
            kind.set_self_closing();
        }
    }

    fn finish_tag(&mut self, end: Position) {
        self.seal(end);
    }

    // Expressions

    fn begin_start_expression(&mut self, is_block: bool) {
        self.begin(TokenKind::new_start_expression(is_block));
    }

    fn begin_end_expression(&mut self) {
        self.begin(TokenKind::new_end_expression());
    }

    fn append_expression_name(&mut self, c: char) {
        if let Some(kind) = self.current.as_mut() {
            kind.append_to_expression_name(c);
        }
    }

    fn begin_expression_attribute(&mut self, is_literal: bool) {
        if let Some(kind) = self.current.as_mut() {
            kind.start_new_expression_attribute(is_literal);
        }
    }

    fn append_expression_attribute_name(&mut self, c: char) {
        if let Some(attribute) = self
            .current
            .as_mut()
            .and_then(TokenKind::current_expression_attribute_mut)
        {
            attribute.name.push(c);
        }
    }

    fn mark_expression_attribute_has_value(&mut self, is_literal: bool) {
        if let Some(attribute) = self
            .current
            .as_mut()
            .and_then(TokenKind::current_expression_attribute_mut)
        {
            attribute.value_is_literal = Some(is_literal);
        }
    }

    fn append_expression_attribute_value(&mut self, c: char) {
        if let Some(attribute) = self
            .current
            .as_mut()
            .and_then(TokenKind::current_expression_attribute_mut)
        {
            attribute.value.push(c);
        }
    }

    fn finish_expression(&mut self, end: Position) {
        self.seal(end);
    }
}

/// A [`Scanner`] driving a [`TokenBuilder`].
///
/// Use [`tokenize`](Self::tokenize) for a complete document, or feed chunks
/// with [`tokenize_part`](Self::tokenize_part) and finish with
/// [`tokenize_eof`](Self::tokenize_eof).
///
/// ```
/// use curly_html::{Tokenizer, TokenizerOptions};
///
/// let mut tokenizer = Tokenizer::new(TokenizerOptions::default());
/// let tokens = tokenizer.tokenize("<p>{{name}}</p>").unwrap();
/// assert_eq!(tokens.len(), 3);
/// ```
#[derive(Debug)]
pub struct Tokenizer<R = NamedEntities> {
    scanner: Scanner<R>,
    builder: TokenBuilder,
}

impl Tokenizer {
    /// Create a tokenizer that resolves character references with the
    /// built-in table.
    #[must_use]
    pub fn new(options: TokenizerOptions) -> Self {
        Self::with_resolver(NamedEntities, options)
    }
}

impl Default for Tokenizer {
    fn default() -> Self {
        Self::new(TokenizerOptions::default())
    }
}

impl<R: EntityResolver> Tokenizer<R> {
    /// Create a tokenizer that resolves character references with `resolver`.
    #[must_use]
    pub fn with_resolver(resolver: R, options: TokenizerOptions) -> Self {
        Self {
            scanner: Scanner::with_resolver(resolver),
            builder: TokenBuilder::new(options),
        }
    }

    /// The options in effect.
    #[must_use]
    pub const fn options(&self) -> TokenizerOptions {
        self.builder.options()
    }

    /// The underlying scanner, for inspecting its state and position.
    #[must_use]
    pub const fn scanner(&self) -> &Scanner<R> {
        &self.scanner
    }

    /// Start a new document, discarding any buffered input and partial token.
    pub fn reset(&mut self) {
        self.scanner.reset(&mut self.builder);
    }

    /// Tokenize a complete document.
    ///
    /// Resets first, so earlier calls have no effect on the result.
    ///
    /// # Errors
    ///
    /// Returns a [`SyntaxError`] if an expression is malformed. No tokens are
    /// returned in that case.
    pub fn tokenize(&mut self, input: &str) -> Result<Vec<Token>, SyntaxError> {
        self.reset();
        let mut tokens = self.tokenize_part(input)?;
        tokens.extend(self.tokenize_eof());
        Ok(tokens)
    }

    /// Feed the next chunk of a document.
    ///
    /// Returns the tokens completed during this call. A token still open at
    /// the end of the chunk is returned by a later call.
    ///
    /// # Errors
    ///
    /// Returns a [`SyntaxError`] if an expression is malformed. The tokens of
    /// this call are discarded and the tokenizer is reset, so the next call
    /// starts a new document.
    pub fn tokenize_part(&mut self, input: &str) -> Result<Vec<Token>, SyntaxError> {
        if let Err(err) = self.scanner.feed(input, &mut self.builder) {
            debug!(%err, "input rejected");
            self.reset();
            return Err(err);
        }
        Ok(self.builder.take_tokens())
    }

    /// Signal the end of the document.
    ///
    /// Returns the trailing text run, if one was still accumulating.
    pub fn tokenize_eof(&mut self) -> Option<Token> {
        self.scanner.flush(&mut self.builder);
        self.builder.take_tokens().into_iter().next()
    }
}

/// Tokenize a complete document with the built-in character reference table.
///
/// # Errors
///
/// Returns a [`SyntaxError`] if an expression is malformed.
pub fn tokenize(input: &str, options: TokenizerOptions) -> Result<Vec<Token>, SyntaxError> {
    Tokenizer::new(options).tokenize(input)
}
