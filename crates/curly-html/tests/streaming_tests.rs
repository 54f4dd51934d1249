//! Integration tests for chunked feeding.
//!
//! Feeding a document in pieces through `tokenize_part` and finishing with
//! `tokenize_eof` must produce the same tokens, with the same spans, as
//! tokenizing it at once. Property tests check this for generated documents
//! split at every possible point, and check that plain text always becomes a
//! single text run.

#![allow(
    clippy::redundant_closure_for_method_calls,
    reason = "Proptest macros generate code with these patterns"
)]

use curly_html::{Token, TokenKind, Tokenizer, TokenizerOptions};
use pretty_assertions::assert_eq;
use proptest::prelude::*;

fn options() -> TokenizerOptions {
    TokenizerOptions::default().with_locations(true)
}

fn chars(text: &str) -> TokenKind {
    TokenKind::Chars { text: text.into() }
}

fn kinds(tokens: &[Token]) -> Vec<TokenKind> {
    tokens.iter().map(|token| token.kind.clone()).collect()
}

/// Feed `chunks` one after another, then signal end of input.
fn tokenize_chunks(chunks: &[&str]) -> Vec<Token> {
    let mut tokenizer = Tokenizer::new(options());
    let mut tokens = Vec::new();
    for chunk in chunks {
        tokens.extend(tokenizer.tokenize_part(chunk).expect("chunk should tokenize"));
    }
    tokens.extend(tokenizer.tokenize_eof());
    tokens
}

fn tokenize_whole(input: &str) -> Vec<Token> {
    Tokenizer::new(options())
        .tokenize(input)
        .expect("input should tokenize")
}

#[test]
fn test_part_returns_only_completed_tokens() {
    let mut tokenizer = Tokenizer::default();

    let first = tokenizer.tokenize_part("Hello <di").expect("chunk should tokenize");
    assert_eq!(kinds(&first), [chars("Hello ")]);

    let second = tokenizer.tokenize_part("v>wor").expect("chunk should tokenize");
    assert_eq!(
        kinds(&second),
        [TokenKind::StartTag {
            name: "div".into(),
            attributes: vec![],
            self_closing: false,
        }]
    );

    let third = tokenizer.tokenize_part("ld").expect("chunk should tokenize");
    assert!(third.is_empty());

    let last = tokenizer.tokenize_eof().expect("pending text should be flushed");
    assert_eq!(last.kind, chars("world"));
    assert!(tokenizer.tokenize_eof().is_none());
}

#[test]
fn test_expression_open_split_across_chunks() {
    let tokens = tokenize_chunks(&["a{", "{b}}c"]);
    assert_eq!(tokens, tokenize_whole("a{{b}}c"));
    assert_eq!(tokens.len(), 3);
}

#[test]
fn test_expression_open_split_at_start() {
    assert_eq!(tokenize_chunks(&["{", "{b}}"]), tokenize_whole("{{b}}"));
    assert_eq!(tokenize_chunks(&["{", " b"]), tokenize_whole("{ b"));
}

#[test]
fn test_expression_close_split_across_chunks() {
    let mut tokenizer = Tokenizer::default();
    assert!(tokenizer.tokenize_part("{{a}").expect("chunk should tokenize").is_empty());
    let tokens = tokenizer.tokenize_part("}").expect("chunk should tokenize");
    assert_eq!(
        kinds(&tokens),
        [TokenKind::StartExpression {
            name: "a".into(),
            attributes: vec![],
            is_block: false,
        }]
    );
}

#[test]
fn test_comment_open_split_across_chunks() {
    assert_eq!(
        tokenize_chunks(&["<!-", "- x -->"]),
        tokenize_whole("<!-- x -->")
    );
}

#[test]
fn test_trailing_brace_is_flushed_as_text() {
    let tokens = tokenize_chunks(&["x{"]);
    assert_eq!(kinds(&tokens), [chars("x{")]);
    assert_eq!(kinds(&tokenize_chunks(&["{"])), [chars("{")]);
}

#[test]
fn test_carriage_return_line_feed_split_across_chunks() {
    assert_eq!(tokenize_chunks(&["a\r", "\nb"]), tokenize_whole("a\r\nb"));
    assert_eq!(tokenize_chunks(&["a\r", "", "\nb"]), tokenize_whole("a\r\nb"));
    assert_eq!(tokenize_chunks(&["a\r", "\r", "\nb"]), tokenize_whole("a\r\r\nb"));
}

#[test]
fn test_reference_split_across_chunks_stays_literal() {
    assert_eq!(kinds(&tokenize_chunks(&["&am", "p;"])), [chars("&amp;")]);
    assert_eq!(kinds(&tokenize_chunks(&["&amp", ";"])), [chars("&amp;")]);
}

#[test]
fn test_tokenize_discards_earlier_parts() {
    let mut tokenizer = Tokenizer::default();
    let _ = tokenizer.tokenize_part("<div id=").expect("chunk should tokenize");
    let tokens = tokenizer.tokenize("text").expect("input should tokenize");
    assert_eq!(kinds(&tokens), [chars("text")]);
}

#[test]
fn test_error_in_part_starts_a_new_document() {
    let mut tokenizer = Tokenizer::new(options());
    let _ = tokenizer.tokenize_part("<p>").expect("chunk should tokenize");
    assert!(tokenizer.tokenize_part("{{a}b").is_err());

    let tokens = tokenizer.tokenize_part("<i>").expect("chunk should tokenize");
    assert_eq!(tokens, tokenize_whole("<i>"));
}

// -- Property tests --

/// Fragments that concatenate into well-formed documents.
fn fragment_strategy() -> impl Strategy<Value = &'static str> {
    prop::sample::select(vec![
        "<div>",
        "</div>",
        "<img src=\"x.png\" />",
        "<input disabled>",
        "<a href=foo title='t'>",
        "text",
        " ",
        "\n",
        "\r\n",
        "{ brace",
        "}",
        "{{exp}}",
        "{{exp a=b \"lit\" c='d'}}",
        "{{#each items}}",
        "{{/each}}",
        "<!-- c - d -- e -->",
        "<!---->",
    ])
}

fn document_strategy() -> impl Strategy<Value = String> {
    prop::collection::vec(fragment_strategy(), 0..16).prop_map(|fragments| fragments.concat())
}

proptest! {
    #[test]
    fn prop_plain_text_is_one_chars_token(text in "[a-zA-Z0-9 .,!?;:}>/\"'=\n\t-]{1,64}") {
        let tokens = tokenize_whole(&text);
        prop_assert_eq!(tokens.len(), 1);
        prop_assert_eq!(&tokens[0].kind, &chars(&text));
    }

    #[test]
    fn prop_split_feeding_matches_single_feed(
        document in document_strategy(),
        split in any::<prop::sample::Index>(),
    ) {
        // Fragments are ASCII, so every byte offset is a char boundary.
        let at = split.index(document.len() + 1);
        let (head, tail) = document.split_at(at);
        prop_assert_eq!(tokenize_chunks(&[head, tail]), tokenize_whole(&document));
    }

    #[test]
    fn prop_character_at_a_time_matches_single_feed(document in document_strategy()) {
        let pieces: Vec<String> = document.chars().map(String::from).collect();
        let chunks: Vec<&str> = pieces.iter().map(String::as_str).collect();
        prop_assert_eq!(tokenize_chunks(&chunks), tokenize_whole(&document));
    }

    #[test]
    fn prop_arbitrary_input_never_panics(input in any::<String>()) {
        let _ = curly_html::tokenize(&input, TokenizerOptions::default());
    }
}
