//! The scanner: a character-level state machine over HTML markup and
//! `{{expression}}` syntax.
//!
//! Each state has a `handle_*_state` method that consumes zero or more
//! characters, reports events to a [`TokenSink`](crate::sink::TokenSink) and
//! picks the next state.

mod character_reference;
mod helpers;
mod scanner;

pub use scanner::{Scanner, TokenizerState};
