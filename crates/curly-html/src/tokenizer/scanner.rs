use strum_macros::{Display, EnumIter};
use tracing::{debug, trace};

use crate::entity::{EntityResolver, NamedEntities};
use crate::error::{SyntaxError, SyntaxErrorKind};
use crate::position::{Position, SourceBuffer};
use crate::preprocess::{is_alpha, is_space, preprocess_input};
use crate::sink::TokenSink;

/// The scanner state machine.
///
/// Exactly one state is active at a time. States are grouped by the construct
/// they scan: text, tags and attributes, comments, and `{{...}}` expressions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumIter)]
#[strum(serialize_all = "kebab-case")]
pub enum TokenizerState {
    /// Between tokens. The initial state.
    BeforeData,
    /// Accumulating a text run.
    Data,
    /// A `{` inside a text run, waiting to see whether a second `{` follows.
    PossibleExpressionOpen,

    /// Directly after `<`.
    TagOpen,
    /// Inside a tag name.
    TagName,
    /// Directly after `</`.
    EndTagOpen,
    /// After a `/` inside a tag.
    SelfClosingStartTag,

    /// Before an attribute name, skipping whitespace.
    BeforeAttributeName,
    /// Inside an attribute name.
    AttributeName,
    /// Whitespace after an attribute name.
    AfterAttributeName,
    /// After `=`, before the value.
    BeforeAttributeValue,
    /// Inside a `"`-quoted attribute value.
    AttributeValueDoubleQuoted,
    /// Inside a `'`-quoted attribute value.
    AttributeValueSingleQuoted,
    /// Inside an unquoted attribute value.
    AttributeValueUnquoted,
    /// Directly after the closing quote of an attribute value.
    AfterAttributeValueQuoted,

    /// Directly after `<!`.
    MarkupDeclaration,
    /// Directly after `<!--`.
    CommentStart,
    /// After `<!---`.
    CommentStartDash,
    /// Inside comment text.
    Comment,
    /// After a `-` inside a comment.
    CommentEndDash,
    /// After `--` inside a comment.
    CommentEnd,

    /// Directly after `{{`.
    ExpressionOpen,
    /// Directly after `{{#`.
    ExpressionOpenBlock,
    /// Directly after `{{/`.
    EndExpressionOpen,
    /// Inside an expression name.
    ExpressionName,
    /// After a `}` inside an expression; only a second `}` may follow.
    PossibleExpressionEnd,
    /// Before an expression attribute name, skipping whitespace.
    BeforeExpressionAttributeName,
    /// Inside an unquoted expression attribute name.
    ExpressionAttributeName,
    /// Inside a `"`-quoted literal expression attribute.
    ExpressionAttributeNameDoubleQuoted,
    /// Inside a `'`-quoted literal expression attribute.
    ExpressionAttributeNameSingleQuoted,
    /// Directly after the closing quote of a literal expression attribute.
    AfterExpressionAttributeNameQuoted,
    /// After `=` in an expression attribute.
    BeforeExpressionAttributeValue,
    /// Inside an unquoted expression attribute value.
    ExpressionAttributeValue,
    /// Inside a `"`-quoted expression attribute value.
    ExpressionAttributeValueDoubleQuoted,
    /// Inside a `'`-quoted expression attribute value.
    ExpressionAttributeValueSingleQuoted,
    /// Directly after the closing quote of an expression attribute value.
    AfterExpressionAttributeValueQuoted,
}

/// Outcome of one dispatch of the run loop.
enum Progress {
    Advanced,
    /// The state needs one more character than is buffered.
    NeedsInput,
}

/// Streaming scanner for HTML interleaved with `{{expression}}` syntax.
///
/// The scanner owns the input buffer and the cursor but no tokens: every
/// lexical event is reported to the [`TokenSink`] passed to [`feed`] and
/// [`flush`]. Input may arrive in any number of chunks; scanning resumes in
/// exactly the state the previous chunk left behind.
///
/// [`feed`]: Scanner::feed
/// [`flush`]: Scanner::flush
#[derive(Debug)]
pub struct Scanner<R = NamedEntities> {
    pub(super) state: TokenizerState,
    pub(super) input: SourceBuffer,
    pub(super) resolver: R,
    pub(super) tag_start: Position,
    pub(super) expression_start: Position,
    // A chunk ended in '\r'; a leading '\n' in the next chunk belongs to it.
    pub(super) after_carriage_return: bool,
}

impl Scanner {
    /// Create a scanner that resolves character references with the built-in
    /// table.
    #[must_use]
    pub fn new() -> Self {
        Self::with_resolver(NamedEntities)
    }
}

impl Default for Scanner {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: EntityResolver> Scanner<R> {
    /// Create a scanner that resolves character references with `resolver`.
    #[must_use]
    pub fn with_resolver(resolver: R) -> Self {
        Self {
            state: TokenizerState::BeforeData,
            input: SourceBuffer::new(),
            resolver,
            tag_start: Position::START,
            expression_start: Position::START,
            after_carriage_return: false,
        }
    }

    /// Discard all buffered input, return to the initial state at line 1,
    /// column 0, and reset `sink`.
    pub fn reset(&mut self, sink: &mut dyn TokenSink) {
        self.state = TokenizerState::BeforeData;
        self.input.clear();
        self.tag_start = Position::START;
        self.expression_start = Position::START;
        self.after_carriage_return = false;
        sink.reset();
    }

    /// Append `input` to the stream and scan as far as the buffered input
    /// allows.
    ///
    /// # Errors
    ///
    /// Returns a [`SyntaxError`] when an expression contains a lone `}` or a
    /// quoted expression literal runs into another character. Scanning stops
    /// at the violating character.
    pub fn feed(&mut self, input: &str, sink: &mut dyn TokenSink) -> Result<(), SyntaxError> {
        let input = match input.strip_prefix('\n') {
            Some(rest) if self.after_carriage_return => {
                self.after_carriage_return = false;
                rest
            }
            _ => input,
        };
        if !input.is_empty() {
            self.after_carriage_return = input.ends_with('\r');
        }

        let chunk = preprocess_input(input);
        debug!(chars = chunk.chars().count(), state = %self.state, "feeding chunk");
        self.input.push_str(&chunk);
        self.run(sink)?;
        debug!(state = %self.state, position = %self.input.position(), "chunk scanned");
        Ok(())
    }

    /// Signal that no more input will follow.
    ///
    /// A pending text run is sealed and the scanner returns to the initial
    /// state. A `{` still waiting for lookahead becomes literal text. Every
    /// other unfinished construct is left incomplete.
    pub fn flush(&mut self, sink: &mut dyn TokenSink) {
        if !self.input.is_at_end() {
            match self.state {
                TokenizerState::BeforeData => {
                    let _ = self.consume();
                    sink.begin_chars();
                    sink.append_chars("{");
                    self.switch_to(TokenizerState::Data);
                }
                TokenizerState::PossibleExpressionOpen => {
                    let _ = self.consume();
                    sink.append_chars("{");
                    self.switch_to(TokenizerState::Data);
                }
                _ => {
                    let dropped = self.consume();
                    debug!(?dropped, state = %self.state, "dropping incomplete markup at end of input");
                }
            }
        }

        if self.state == TokenizerState::Data {
            sink.finish_chars(self.position());
            self.switch_to(TokenizerState::BeforeData);
        }
        debug!(state = %self.state, position = %self.input.position(), "flushed");
    }

    /// The active state.
    #[must_use]
    pub const fn state(&self) -> TokenizerState {
        self.state
    }

    /// Position of the cursor.
    #[must_use]
    pub const fn position(&self) -> Position {
        self.input.position()
    }

    /// Position of the most recent `<`.
    #[must_use]
    pub const fn tag_start(&self) -> Position {
        self.tag_start
    }

    /// Position of the first `{` of the most recent `{{`.
    #[must_use]
    pub const fn expression_start(&self) -> Position {
        self.expression_start
    }

    fn run(&mut self, sink: &mut dyn TokenSink) -> Result<(), SyntaxError> {
        while !self.input.is_at_end() {
            if matches!(self.step(sink)?, Progress::NeedsInput) {
                trace!(state = %self.state, "waiting for more input");
                break;
            }
        }
        Ok(())
    }

    fn step(&mut self, sink: &mut dyn TokenSink) -> Result<Progress, SyntaxError> {
        match self.state {
            TokenizerState::BeforeData => return Ok(self.handle_before_data_state(sink)),
            TokenizerState::Data => self.handle_data_state(sink),
            TokenizerState::PossibleExpressionOpen => {
                return Ok(self.handle_possible_expression_open_state(sink));
            }
            TokenizerState::TagOpen => self.handle_tag_open_state(sink),
            TokenizerState::TagName => self.handle_tag_name_state(sink),
            TokenizerState::EndTagOpen => self.handle_end_tag_open_state(sink),
            TokenizerState::SelfClosingStartTag => self.handle_self_closing_start_tag_state(sink),
            TokenizerState::BeforeAttributeName => self.handle_before_attribute_name_state(sink),
            TokenizerState::AttributeName => self.handle_attribute_name_state(sink),
            TokenizerState::AfterAttributeName => self.handle_after_attribute_name_state(sink),
            TokenizerState::BeforeAttributeValue => self.handle_before_attribute_value_state(sink),
            TokenizerState::AttributeValueDoubleQuoted => {
                self.handle_attribute_value_quoted_state(sink, '"');
            }
            TokenizerState::AttributeValueSingleQuoted => {
                self.handle_attribute_value_quoted_state(sink, '\'');
            }
            TokenizerState::AttributeValueUnquoted => {
                self.handle_attribute_value_unquoted_state(sink);
            }
            TokenizerState::AfterAttributeValueQuoted => {
                self.handle_after_attribute_value_quoted_state(sink);
            }
            TokenizerState::MarkupDeclaration => {
                return Ok(self.handle_markup_declaration_state(sink));
            }
            TokenizerState::CommentStart => self.handle_comment_start_state(sink),
            TokenizerState::CommentStartDash => self.handle_comment_start_dash_state(sink),
            TokenizerState::Comment => self.handle_comment_state(sink),
            TokenizerState::CommentEndDash => self.handle_comment_end_dash_state(sink),
            TokenizerState::CommentEnd => self.handle_comment_end_state(sink),
            TokenizerState::ExpressionOpen => self.handle_expression_open_state(sink),
            TokenizerState::ExpressionOpenBlock => self.handle_expression_open_block_state(sink),
            TokenizerState::EndExpressionOpen => self.handle_end_expression_open_state(sink),
            TokenizerState::ExpressionName => self.handle_expression_name_state(sink),
            TokenizerState::PossibleExpressionEnd => {
                self.handle_possible_expression_end_state(sink)?;
            }
            TokenizerState::BeforeExpressionAttributeName => {
                self.handle_before_expression_attribute_name_state(sink);
            }
            TokenizerState::ExpressionAttributeName => {
                self.handle_expression_attribute_name_state(sink);
            }
            TokenizerState::ExpressionAttributeNameDoubleQuoted => {
                self.handle_expression_attribute_name_quoted_state(sink, '"');
            }
            TokenizerState::ExpressionAttributeNameSingleQuoted => {
                self.handle_expression_attribute_name_quoted_state(sink, '\'');
            }
            TokenizerState::AfterExpressionAttributeNameQuoted => {
                self.handle_after_expression_attribute_name_quoted_state()?;
            }
            TokenizerState::BeforeExpressionAttributeValue => {
                self.handle_before_expression_attribute_value_state(sink);
            }
            TokenizerState::ExpressionAttributeValue => {
                self.handle_expression_attribute_value_state(sink);
            }
            TokenizerState::ExpressionAttributeValueDoubleQuoted => {
                self.handle_expression_attribute_value_quoted_state(sink, '"');
            }
            TokenizerState::ExpressionAttributeValueSingleQuoted => {
                self.handle_expression_attribute_value_quoted_state(sink, '\'');
            }
            TokenizerState::AfterExpressionAttributeValueQuoted => {
                self.handle_after_expression_attribute_value_quoted_state()?;
            }
        }
        Ok(Progress::Advanced)
    }

    // ---------------------------------------------------------------------
    // Text
    // ---------------------------------------------------------------------

    fn handle_before_data_state(&mut self, sink: &mut dyn TokenSink) -> Progress {
        match self.peek() {
            Some('<') => {
                self.mark_tag_start();
                let _ = self.consume();
                self.switch_to(TokenizerState::TagOpen);
            }
            Some('{') => {
                let Some(next) = self.peek_next() else {
                    return Progress::NeedsInput;
                };
                let open = self.position();
                let _ = self.consume();
                if next == '{' {
                    let _ = self.consume();
                    self.mark_expression_open(open);
                    self.switch_to(TokenizerState::ExpressionOpen);
                } else {
                    sink.begin_chars();
                    sink.append_chars("{");
                    self.switch_to(TokenizerState::Data);
                }
            }
            _ => {
                // Re-examined by the data state.
                sink.begin_chars();
                self.switch_to(TokenizerState::Data);
            }
        }
        Progress::Advanced
    }

    fn handle_data_state(&mut self, sink: &mut dyn TokenSink) {
        match self.peek() {
            Some('<') => {
                sink.finish_chars(self.position());
                self.mark_tag_start();
                let _ = self.consume();
                self.switch_to(TokenizerState::TagOpen);
            }
            Some('&') => {
                let _ = self.consume();
                let reference = self.consume_character_reference();
                sink.append_chars(reference.as_deref().unwrap_or("&"));
            }
            Some('{') => self.switch_to(TokenizerState::PossibleExpressionOpen),
            Some(c) => {
                let _ = self.consume();
                sink.append_chars(c.encode_utf8(&mut [0; 4]));
            }
            None => {}
        }
    }

    fn handle_possible_expression_open_state(&mut self, sink: &mut dyn TokenSink) -> Progress {
        let Some(next) = self.peek_next() else {
            return Progress::NeedsInput;
        };
        let open = self.position();
        self.input.consume_n(2);
        if next == '{' {
            sink.finish_chars(open);
            self.mark_expression_open(open);
            self.switch_to(TokenizerState::ExpressionOpen);
        } else {
            sink.append_chars("{");
            sink.append_chars(next.encode_utf8(&mut [0; 4]));
            self.switch_to(TokenizerState::Data);
        }
        Progress::Advanced
    }

    // ---------------------------------------------------------------------
    // Tags
    // ---------------------------------------------------------------------

    fn handle_tag_open_state(&mut self, sink: &mut dyn TokenSink) {
        let Some(c) = self.consume() else { return };
        match c {
            '!' => self.switch_to(TokenizerState::MarkupDeclaration),
            '/' => self.switch_to(TokenizerState::EndTagOpen),
            c if is_alpha(c) => {
                sink.begin_start_tag();
                sink.append_tag_name(c.to_ascii_lowercase());
                self.switch_to(TokenizerState::TagName);
            }
            c => debug!(dropped = ?c, position = %self.position(), "ignoring character after '<'"),
        }
    }

    fn handle_tag_name_state(&mut self, sink: &mut dyn TokenSink) {
        let Some(c) = self.consume() else { return };
        match c {
            c if is_space(c) => self.switch_to(TokenizerState::BeforeAttributeName),
            '/' => self.switch_to(TokenizerState::SelfClosingStartTag),
            '>' => self.finish_tag(sink),
            c => sink.append_tag_name(c),
        }
    }

    fn handle_end_tag_open_state(&mut self, sink: &mut dyn TokenSink) {
        let Some(c) = self.consume() else { return };
        if is_alpha(c) {
            sink.begin_end_tag();
            sink.append_tag_name(c.to_ascii_lowercase());
            self.switch_to(TokenizerState::TagName);
        } else {
            debug!(dropped = ?c, position = %self.position(), "ignoring character after '</'");
        }
    }

    fn handle_self_closing_start_tag_state(&mut self, sink: &mut dyn TokenSink) {
        if self.peek() == Some('>') {
            let _ = self.consume();
            sink.mark_self_closing();
            self.finish_tag(sink);
        } else {
            // A '/' not followed by '>' only separates attributes.
            self.switch_to(TokenizerState::BeforeAttributeName);
        }
    }

    // ---------------------------------------------------------------------
    // Attributes
    // ---------------------------------------------------------------------

    fn handle_before_attribute_name_state(&mut self, sink: &mut dyn TokenSink) {
        let Some(c) = self.consume() else { return };
        match c {
            c if is_space(c) => {}
            '/' => self.switch_to(TokenizerState::SelfClosingStartTag),
            '>' => self.finish_tag(sink),
            c => {
                sink.begin_attribute();
                sink.append_attribute_name(c);
                self.switch_to(TokenizerState::AttributeName);
            }
        }
    }

    fn handle_attribute_name_state(&mut self, sink: &mut dyn TokenSink) {
        let Some(c) = self.consume() else { return };
        match c {
            c if is_space(c) => self.switch_to(TokenizerState::AfterAttributeName),
            '/' => {
                Self::finish_valueless_attribute(sink);
                self.switch_to(TokenizerState::SelfClosingStartTag);
            }
            '=' => self.switch_to(TokenizerState::BeforeAttributeValue),
            '>' => {
                Self::finish_valueless_attribute(sink);
                self.finish_tag(sink);
            }
            c => sink.append_attribute_name(c),
        }
    }

    fn handle_after_attribute_name_state(&mut self, sink: &mut dyn TokenSink) {
        let Some(c) = self.consume() else { return };
        match c {
            c if is_space(c) => {}
            '/' => {
                Self::finish_valueless_attribute(sink);
                self.switch_to(TokenizerState::SelfClosingStartTag);
            }
            '=' => self.switch_to(TokenizerState::BeforeAttributeValue),
            '>' => {
                Self::finish_valueless_attribute(sink);
                self.finish_tag(sink);
            }
            c => {
                Self::finish_valueless_attribute(sink);
                sink.begin_attribute();
                sink.append_attribute_name(c);
                self.switch_to(TokenizerState::AttributeName);
            }
        }
    }

    fn handle_before_attribute_value_state(&mut self, sink: &mut dyn TokenSink) {
        let Some(c) = self.consume() else { return };
        match c {
            c if is_space(c) => {}
            '"' => {
                sink.begin_attribute_value(true);
                self.switch_to(TokenizerState::AttributeValueDoubleQuoted);
            }
            '\'' => {
                sink.begin_attribute_value(true);
                self.switch_to(TokenizerState::AttributeValueSingleQuoted);
            }
            '>' => {
                Self::finish_valueless_attribute(sink);
                self.finish_tag(sink);
            }
            c => {
                sink.begin_attribute_value(false);
                sink.append_attribute_value(c.encode_utf8(&mut [0; 4]));
                self.switch_to(TokenizerState::AttributeValueUnquoted);
            }
        }
    }

    fn handle_attribute_value_quoted_state(&mut self, sink: &mut dyn TokenSink, quote: char) {
        let Some(c) = self.consume() else { return };
        match c {
            c if c == quote => {
                sink.finish_attribute_value();
                self.switch_to(TokenizerState::AfterAttributeValueQuoted);
            }
            '&' => {
                let reference = self.consume_character_reference();
                sink.append_attribute_value(reference.as_deref().unwrap_or("&"));
            }
            c => sink.append_attribute_value(c.encode_utf8(&mut [0; 4])),
        }
    }

    fn handle_attribute_value_unquoted_state(&mut self, sink: &mut dyn TokenSink) {
        let Some(c) = self.consume() else { return };
        match c {
            c if is_space(c) => {
                sink.finish_attribute_value();
                self.switch_to(TokenizerState::BeforeAttributeName);
            }
            '&' => {
                let reference = self.consume_character_reference();
                sink.append_attribute_value(reference.as_deref().unwrap_or("&"));
            }
            '>' => {
                sink.finish_attribute_value();
                self.finish_tag(sink);
            }
            c => sink.append_attribute_value(c.encode_utf8(&mut [0; 4])),
        }
    }

    fn handle_after_attribute_value_quoted_state(&mut self, sink: &mut dyn TokenSink) {
        match self.peek() {
            Some(c) if is_space(c) => {
                let _ = self.consume();
                self.switch_to(TokenizerState::BeforeAttributeName);
            }
            Some('/') => {
                let _ = self.consume();
                self.switch_to(TokenizerState::SelfClosingStartTag);
            }
            Some('>') => {
                let _ = self.consume();
                self.finish_tag(sink);
            }
            // `a="x"b` starts a new attribute without a separating space.
            _ => self.switch_to(TokenizerState::BeforeAttributeName),
        }
    }

    // ---------------------------------------------------------------------
    // Comments
    // ---------------------------------------------------------------------

    fn handle_markup_declaration_state(&mut self, sink: &mut dyn TokenSink) -> Progress {
        if self.peek() == Some('-') && self.peek_next().is_none() {
            return Progress::NeedsInput;
        }
        let Some(c) = self.consume() else {
            return Progress::Advanced;
        };
        if c == '-' && self.peek() == Some('-') {
            let _ = self.consume();
            sink.begin_comment();
            self.switch_to(TokenizerState::CommentStart);
        } else {
            // Only `<!--` is modeled; anything else is skipped until one appears.
            debug!(dropped = ?c, position = %self.position(), "ignoring markup declaration character");
        }
        Progress::Advanced
    }

    fn handle_comment_start_state(&mut self, sink: &mut dyn TokenSink) {
        let Some(c) = self.consume() else { return };
        match c {
            '-' => self.switch_to(TokenizerState::CommentStartDash),
            '>' => self.finish_comment(sink),
            c => {
                sink.append_comment(c.encode_utf8(&mut [0; 4]));
                self.switch_to(TokenizerState::Comment);
            }
        }
    }

    fn handle_comment_start_dash_state(&mut self, sink: &mut dyn TokenSink) {
        let Some(c) = self.consume() else { return };
        match c {
            '-' => self.switch_to(TokenizerState::CommentEnd),
            '>' => self.finish_comment(sink),
            c => {
                sink.append_comment("-");
                sink.append_comment(c.encode_utf8(&mut [0; 4]));
                self.switch_to(TokenizerState::Comment);
            }
        }
    }

    fn handle_comment_state(&mut self, sink: &mut dyn TokenSink) {
        let Some(c) = self.consume() else { return };
        if c == '-' {
            self.switch_to(TokenizerState::CommentEndDash);
        } else {
            sink.append_comment(c.encode_utf8(&mut [0; 4]));
        }
    }

    fn handle_comment_end_dash_state(&mut self, sink: &mut dyn TokenSink) {
        let Some(c) = self.consume() else { return };
        if c == '-' {
            self.switch_to(TokenizerState::CommentEnd);
        } else {
            sink.append_comment("-");
            sink.append_comment(c.encode_utf8(&mut [0; 4]));
            self.switch_to(TokenizerState::Comment);
        }
    }

    fn handle_comment_end_state(&mut self, sink: &mut dyn TokenSink) {
        let Some(c) = self.consume() else { return };
        if c == '>' {
            self.finish_comment(sink);
        } else {
            sink.append_comment("--");
            sink.append_comment(c.encode_utf8(&mut [0; 4]));
            self.switch_to(TokenizerState::Comment);
        }
    }

    // ---------------------------------------------------------------------
    // Expressions
    // ---------------------------------------------------------------------

    fn handle_expression_open_state(&mut self, sink: &mut dyn TokenSink) {
        let Some(c) = self.consume() else { return };
        match c {
            // TODO: `{{! ... }}` comment expressions.
            '!' => debug!(position = %self.position(), "comment expressions are not supported"),
            '/' => self.switch_to(TokenizerState::EndExpressionOpen),
            '#' => self.switch_to(TokenizerState::ExpressionOpenBlock),
            c if is_alpha(c) => {
                sink.begin_start_expression(false);
                sink.append_expression_name(c.to_ascii_lowercase());
                self.switch_to(TokenizerState::ExpressionName);
            }
            c => debug!(dropped = ?c, position = %self.position(), "ignoring character after '{{{{'"),
        }
    }

    fn handle_expression_open_block_state(&mut self, sink: &mut dyn TokenSink) {
        let Some(c) = self.consume() else { return };
        if is_alpha(c) {
            sink.begin_start_expression(true);
            sink.append_expression_name(c.to_ascii_lowercase());
            self.switch_to(TokenizerState::ExpressionName);
        } else {
            debug!(dropped = ?c, position = %self.position(), "ignoring character after '{{{{#'");
        }
    }

    fn handle_end_expression_open_state(&mut self, sink: &mut dyn TokenSink) {
        let Some(c) = self.consume() else { return };
        if is_alpha(c) {
            sink.begin_end_expression();
            sink.append_expression_name(c.to_ascii_lowercase());
            self.switch_to(TokenizerState::ExpressionName);
        } else {
            debug!(dropped = ?c, position = %self.position(), "ignoring character after '{{{{/'");
        }
    }

    fn handle_expression_name_state(&mut self, sink: &mut dyn TokenSink) {
        let Some(c) = self.consume() else { return };
        match c {
            c if is_space(c) => self.switch_to(TokenizerState::BeforeExpressionAttributeName),
            '}' => self.switch_to(TokenizerState::PossibleExpressionEnd),
            c => sink.append_expression_name(c),
        }
    }

    fn handle_possible_expression_end_state(
        &mut self,
        sink: &mut dyn TokenSink,
    ) -> Result<(), SyntaxError> {
        let Some(c) = self.consume() else {
            return Ok(());
        };
        if c != '}' {
            return Err(self.syntax_error(SyntaxErrorKind::UnpairedClosingBrace { found: c }));
        }
        sink.finish_expression(self.position());
        self.switch_to(TokenizerState::BeforeData);
        Ok(())
    }

    fn handle_before_expression_attribute_name_state(&mut self, sink: &mut dyn TokenSink) {
        let Some(c) = self.consume() else { return };
        match c {
            c if is_space(c) => {}
            '}' => self.switch_to(TokenizerState::PossibleExpressionEnd),
            '"' => {
                sink.begin_expression_attribute(true);
                self.switch_to(TokenizerState::ExpressionAttributeNameDoubleQuoted);
            }
            '\'' => {
                sink.begin_expression_attribute(true);
                self.switch_to(TokenizerState::ExpressionAttributeNameSingleQuoted);
            }
            c => {
                sink.begin_expression_attribute(false);
                sink.append_expression_attribute_name(c);
                self.switch_to(TokenizerState::ExpressionAttributeName);
            }
        }
    }

    fn handle_expression_attribute_name_state(&mut self, sink: &mut dyn TokenSink) {
        let Some(c) = self.consume() else { return };
        match c {
            c if is_space(c) => self.switch_to(TokenizerState::BeforeExpressionAttributeName),
            '=' => self.switch_to(TokenizerState::BeforeExpressionAttributeValue),
            '}' => self.switch_to(TokenizerState::PossibleExpressionEnd),
            c => sink.append_expression_attribute_name(c),
        }
    }

    fn handle_expression_attribute_name_quoted_state(
        &mut self,
        sink: &mut dyn TokenSink,
        quote: char,
    ) {
        let Some(c) = self.consume() else { return };
        if c == quote {
            self.switch_to(TokenizerState::AfterExpressionAttributeNameQuoted);
        } else {
            sink.append_expression_attribute_name(c);
        }
    }

    fn handle_after_expression_attribute_name_quoted_state(&mut self) -> Result<(), SyntaxError> {
        let Some(c) = self.consume() else {
            return Ok(());
        };
        match c {
            c if is_space(c) => self.switch_to(TokenizerState::BeforeExpressionAttributeName),
            '=' => self.switch_to(TokenizerState::BeforeExpressionAttributeValue),
            '}' => self.switch_to(TokenizerState::PossibleExpressionEnd),
            c => {
                return Err(
                    self.syntax_error(SyntaxErrorKind::UnterminatedAttributeLiteral { found: c })
                );
            }
        }
        Ok(())
    }

    fn handle_before_expression_attribute_value_state(&mut self, sink: &mut dyn TokenSink) {
        let Some(c) = self.consume() else { return };
        match c {
            c if is_space(c) => {}
            '"' => {
                sink.mark_expression_attribute_has_value(true);
                self.switch_to(TokenizerState::ExpressionAttributeValueDoubleQuoted);
            }
            '\'' => {
                sink.mark_expression_attribute_has_value(true);
                self.switch_to(TokenizerState::ExpressionAttributeValueSingleQuoted);
            }
            c => {
                sink.mark_expression_attribute_has_value(false);
                sink.append_expression_attribute_value(c);
                self.switch_to(TokenizerState::ExpressionAttributeValue);
            }
        }
    }

    fn handle_expression_attribute_value_state(&mut self, sink: &mut dyn TokenSink) {
        let Some(c) = self.consume() else { return };
        match c {
            c if is_space(c) => self.switch_to(TokenizerState::BeforeExpressionAttributeName),
            '}' => self.switch_to(TokenizerState::PossibleExpressionEnd),
            c => sink.append_expression_attribute_value(c),
        }
    }

    fn handle_expression_attribute_value_quoted_state(
        &mut self,
        sink: &mut dyn TokenSink,
        quote: char,
    ) {
        let Some(c) = self.consume() else { return };
        if c == quote {
            self.switch_to(TokenizerState::AfterExpressionAttributeValueQuoted);
        } else {
            sink.append_expression_attribute_value(c);
        }
    }

    fn handle_after_expression_attribute_value_quoted_state(&mut self) -> Result<(), SyntaxError> {
        let Some(c) = self.consume() else {
            return Ok(());
        };
        match c {
            c if is_space(c) => self.switch_to(TokenizerState::BeforeExpressionAttributeName),
            '}' => self.switch_to(TokenizerState::PossibleExpressionEnd),
            c => {
                return Err(
                    self.syntax_error(SyntaxErrorKind::UnterminatedValueLiteral { found: c })
                );
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::borrow::Cow;

    use strum::IntoEnumIterator;

    use super::*;

    /// Records every event as a short string.
    #[derive(Default)]
    struct EventLog {
        events: Vec<String>,
    }

    impl TokenSink for EventLog {
        fn reset(&mut self) {
            self.events.push("reset".into());
        }
        fn begin_chars(&mut self) {
            self.events.push("begin_chars".into());
        }
        fn append_chars(&mut self, text: &str) {
            self.events.push(format!("chars {text:?}"));
        }
        fn finish_chars(&mut self, end: Position) {
            self.events.push(format!("finish_chars {end}"));
        }
        fn begin_comment(&mut self) {
            self.events.push("begin_comment".into());
        }
        fn append_comment(&mut self, text: &str) {
            self.events.push(format!("comment {text:?}"));
        }
        fn finish_comment(&mut self, end: Position) {
            self.events.push(format!("finish_comment {end}"));
        }
        fn begin_start_tag(&mut self) {
            self.events.push("begin_start_tag".into());
        }
        fn begin_end_tag(&mut self) {
            self.events.push("begin_end_tag".into());
        }
        fn append_tag_name(&mut self, c: char) {
            self.events.push(format!("tag_name {c}"));
        }
        fn begin_attribute(&mut self) {
            self.events.push("begin_attribute".into());
        }
        fn append_attribute_name(&mut self, c: char) {
            self.events.push(format!("attribute_name {c}"));
        }
        fn begin_attribute_value(&mut self, quoted: bool) {
            self.events.push(format!("begin_attribute_value {quoted}"));
        }
        fn append_attribute_value(&mut self, text: &str) {
            self.events.push(format!("attribute_value {text:?}"));
        }
        fn finish_attribute_value(&mut self) {
            self.events.push("finish_attribute_value".into());
        }
        fn mark_self_closing(&mut self) {
            self.events.push("self_closing".into());
        }
        fn finish_tag(&mut self, end: Position) {
            self.events.push(format!("finish_tag {end}"));
        }
        fn begin_start_expression(&mut self, is_block: bool) {
            self.events.push(format!("begin_start_expression {is_block}"));
        }
        fn begin_end_expression(&mut self) {
            self.events.push("begin_end_expression".into());
        }
        fn append_expression_name(&mut self, c: char) {
            self.events.push(format!("expression_name {c}"));
        }
        fn begin_expression_attribute(&mut self, is_literal: bool) {
            self.events.push(format!("begin_expression_attribute {is_literal}"));
        }
        fn append_expression_attribute_name(&mut self, c: char) {
            self.events.push(format!("expression_attribute_name {c}"));
        }
        fn mark_expression_attribute_has_value(&mut self, is_literal: bool) {
            self.events.push(format!("expression_attribute_value {is_literal}"));
        }
        fn append_expression_attribute_value(&mut self, c: char) {
            self.events.push(format!("expression_attribute_value_char {c}"));
        }
        fn finish_expression(&mut self, end: Position) {
            self.events.push(format!("finish_expression {end}"));
        }
    }

    fn events(input: &str) -> Vec<String> {
        let mut scanner = Scanner::new();
        let mut log = EventLog::default();
        scanner.feed(input, &mut log).expect("input should scan");
        scanner.flush(&mut log);
        log.events
    }

    #[test]
    fn test_text_run_events() {
        assert_eq!(
            events("hi"),
            ["begin_chars", "chars \"h\"", "chars \"i\"", "finish_chars 1:2"]
        );
    }

    #[test]
    fn test_start_tag_events() {
        assert_eq!(
            events("<a href=x>"),
            [
                "begin_start_tag",
                "tag_name a",
                "begin_attribute",
                "attribute_name h",
                "attribute_name r",
                "attribute_name e",
                "attribute_name f",
                "begin_attribute_value false",
                "attribute_value \"x\"",
                "finish_attribute_value",
                "finish_tag 1:10",
            ]
        );
    }

    #[test]
    fn test_valueless_attribute_gets_empty_unquoted_value() {
        assert_eq!(
            events("<a b/>"),
            [
                "begin_start_tag",
                "tag_name a",
                "begin_attribute",
                "attribute_name b",
                "begin_attribute_value false",
                "finish_attribute_value",
                "self_closing",
                "finish_tag 1:6",
            ]
        );
    }

    #[test]
    fn test_expression_events() {
        assert_eq!(
            events("{{#if 'x' a=\"b\"}}"),
            [
                "begin_start_expression true",
                "expression_name i",
                "expression_name f",
                "begin_expression_attribute true",
                "expression_attribute_name x",
                "begin_expression_attribute false",
                "expression_attribute_name a",
                "expression_attribute_value true",
                "expression_attribute_value_char b",
                "finish_expression 1:17",
            ]
        );
    }

    #[test]
    fn test_end_expression_events() {
        assert_eq!(
            events("{{/If}}"),
            [
                "begin_end_expression",
                "expression_name i",
                "expression_name f",
                "finish_expression 1:7",
            ]
        );
    }

    #[test]
    fn test_comment_start_dash_keeps_character() {
        assert_eq!(
            events("<!---x-->"),
            [
                "begin_comment",
                "comment \"-\"",
                "comment \"x\"",
                "finish_comment 1:9"
            ]
        );
    }

    #[test]
    fn test_reset_notifies_sink() {
        let mut scanner = Scanner::new();
        let mut log = EventLog::default();
        scanner.feed("<div", &mut log).expect("input should scan");
        scanner.reset(&mut log);
        assert_eq!(log.events.last().map(String::as_str), Some("reset"));
        assert_eq!(scanner.state(), TokenizerState::BeforeData);
        assert_eq!(scanner.position(), Position::START);
    }

    #[test]
    fn test_lone_brace_waits_for_lookahead() {
        let mut scanner = Scanner::new();
        let mut log = EventLog::default();
        scanner.feed("a{", &mut log).expect("input should scan");
        assert_eq!(scanner.state(), TokenizerState::PossibleExpressionOpen);
        assert_eq!(scanner.position(), Position::new(1, 1));

        scanner.feed("{x}}", &mut log).expect("input should scan");
        assert_eq!(scanner.state(), TokenizerState::BeforeData);
        assert!(log.events.contains(&"finish_chars 1:1".to_string()));
    }

    #[test]
    fn test_flush_turns_pending_brace_into_text() {
        let mut scanner = Scanner::new();
        let mut log = EventLog::default();
        scanner.feed("{", &mut log).expect("input should scan");
        assert_eq!(scanner.state(), TokenizerState::BeforeData);
        scanner.flush(&mut log);
        assert_eq!(
            log.events,
            ["begin_chars", "chars \"{\"", "finish_chars 1:1"]
        );
    }

    #[test]
    fn test_markup_declaration_waits_for_second_dash() {
        let mut scanner = Scanner::new();
        let mut log = EventLog::default();
        scanner.feed("<!-", &mut log).expect("input should scan");
        assert_eq!(scanner.state(), TokenizerState::MarkupDeclaration);
        scanner.feed("-x-->", &mut log).expect("input should scan");
        assert_eq!(
            log.events,
            ["begin_comment", "comment \"x\"", "finish_comment 1:8"]
        );
    }

    #[test]
    fn test_marks_tag_and_expression_starts() {
        let mut scanner = Scanner::new();
        let mut log = EventLog::default();
        scanner.feed("ab<i>cd{{x}}", &mut log).expect("input should scan");
        assert_eq!(scanner.tag_start(), Position::new(1, 2));
        assert_eq!(scanner.expression_start(), Position::new(1, 7));
    }

    #[test]
    fn test_syntax_error_carries_expression_start() {
        let mut scanner = Scanner::new();
        let mut log = EventLog::default();
        let err = scanner
            .feed("x\n  {{exp}a}}", &mut log)
            .expect_err("lone brace should fail");
        assert_eq!(err.kind, SyntaxErrorKind::UnpairedClosingBrace { found: 'a' });
        assert_eq!(err.position, Position::new(2, 9));
        assert_eq!(err.expression_start, Position::new(2, 2));
    }

    #[test]
    fn test_carriage_return_split_across_chunks() {
        let mut scanner = Scanner::new();
        let mut log = EventLog::default();
        scanner.feed("a\r", &mut log).expect("input should scan");
        scanner.feed("\nb", &mut log).expect("input should scan");
        scanner.flush(&mut log);
        assert_eq!(log.events.last().map(String::as_str), Some("finish_chars 2:1"));
    }

    #[test]
    fn test_custom_resolver() {
        struct Upper;
        impl EntityResolver for Upper {
            fn resolve(&self, name: &str) -> Option<Cow<'static, str>> {
                (name == "name").then_some(Cow::Borrowed("ADA"))
            }
        }

        let mut scanner = Scanner::with_resolver(Upper);
        let mut log = EventLog::default();
        scanner.feed("&name;&amp;", &mut log).expect("input should scan");
        scanner.flush(&mut log);
        assert_eq!(log.events[1], "chars \"ADA\"");
        assert_eq!(log.events[2], "chars \"&\"");
    }

    #[test]
    fn test_state_names_are_kebab_case() {
        assert_eq!(TokenizerState::BeforeData.to_string(), "before-data");
        assert_eq!(
            TokenizerState::AfterExpressionAttributeValueQuoted.to_string(),
            "after-expression-attribute-value-quoted"
        );
        for state in TokenizerState::iter() {
            let name = state.to_string();
            assert!(!name.is_empty());
            assert!(name.chars().all(|c| c.is_ascii_lowercase() || c == '-'), "{name}");
        }
        assert_eq!(TokenizerState::iter().count(), 36);
    }
}
