//! The delegate interface the scanner reports lexical events to.
//!
//! The scanner never builds tokens itself. It drives a [`TokenSink`] through a
//! sequence of `begin_*`, `append_*`, `mark_*` and `finish_*` calls, and never
//! reads anything back. Implementations only ever see the orderings the state
//! machine produces:
//!
//! - `begin_chars`, then any number of `append_chars`, then `finish_chars`.
//! - `begin_comment`, then `append_comment`s, then `finish_comment`.
//! - `begin_start_tag` or `begin_end_tag`, then `append_tag_name`s, then for
//!   each attribute `begin_attribute`, `append_attribute_name`s,
//!   `begin_attribute_value`, `append_attribute_value`s and
//!   `finish_attribute_value`, optionally `mark_self_closing`, and finally
//!   `finish_tag`.
//! - `begin_start_expression` or `begin_end_expression`, then
//!   `append_expression_name`s, then for each attribute
//!   `begin_expression_attribute`, its name characters, optionally
//!   `mark_expression_attribute_has_value` followed by value characters, and
//!   finally `finish_expression`.
//!
//! Every `finish_*` call receives the scanner position directly after the last
//! character of the token.

use crate::position::Position;

/// Receiver of lexical events.
pub trait TokenSink {
    /// The scanner was reset; drop any partial state.
    fn reset(&mut self);

    /// A text run begins.
    fn begin_chars(&mut self);
    /// Append decoded text to the current run.
    fn append_chars(&mut self, text: &str);
    /// The current text run is complete.
    fn finish_chars(&mut self, end: Position);

    /// A comment begins.
    fn begin_comment(&mut self);
    /// Append text to the current comment.
    fn append_comment(&mut self, text: &str);
    /// The current comment is complete.
    fn finish_comment(&mut self, end: Position);

    /// A start tag begins.
    fn begin_start_tag(&mut self);
    /// An end tag begins.
    fn begin_end_tag(&mut self);
    /// Append a character to the current tag name.
    fn append_tag_name(&mut self, c: char);
    /// A new attribute begins on the current start tag.
    fn begin_attribute(&mut self);
    /// Append a character to the current attribute name.
    fn append_attribute_name(&mut self, c: char);
    /// The value of the current attribute begins.
    fn begin_attribute_value(&mut self, quoted: bool);
    /// Append decoded text to the current attribute value.
    fn append_attribute_value(&mut self, text: &str);
    /// The value of the current attribute is complete.
    fn finish_attribute_value(&mut self);
    /// The current start tag ended with `/>`.
    fn mark_self_closing(&mut self);
    /// The current tag is complete.
    fn finish_tag(&mut self, end: Position);

    /// A `{{name}}` or `{{#name}}` expression begins.
    fn begin_start_expression(&mut self, is_block: bool);
    /// A `{{/name}}` expression begins.
    fn begin_end_expression(&mut self);
    /// Append a character to the current expression name.
    fn append_expression_name(&mut self, c: char);
    /// A new expression attribute begins.
    fn begin_expression_attribute(&mut self, is_literal: bool);
    /// Append a character to the current expression attribute name.
    fn append_expression_attribute_name(&mut self, c: char);
    /// The current expression attribute has a `=value` part.
    fn mark_expression_attribute_has_value(&mut self, is_literal: bool);
    /// Append a character to the current expression attribute value.
    fn append_expression_attribute_value(&mut self, c: char);
    /// The current expression is complete.
    fn finish_expression(&mut self, end: Position);
}
