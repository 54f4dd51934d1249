//! Input preprocessing and character classes.
//!
//! Line endings are normalized before any character reaches the state
//! machine: every `\r\n` pair and every lone `\r` becomes a single `\n`.
//! No other normalization is performed.

/// Fold carriage returns into line feeds.
///
/// `"\r\n"` and a lone `"\r"` both become `"\n"`.
#[must_use]
pub fn preprocess_input(input: &str) -> String {
    let mut output = String::with_capacity(input.len());
    let mut chars = input.chars().peekable();

    while let Some(c) = chars.next() {
        if c == '\r' {
            if chars.peek() == Some(&'\n') {
                let _ = chars.next();
            }
            output.push('\n');
        } else {
            output.push(c);
        }
    }

    output
}

/// Whitespace as the tag and expression states see it: tab, line feed,
/// form feed and space.
///
/// Carriage return is absent because preprocessing already removed it.
#[must_use]
pub const fn is_space(c: char) -> bool {
    matches!(c, ' ' | '\t' | '\n' | '\x0C')
}

/// ASCII letters open tag and expression names.
#[must_use]
pub const fn is_alpha(c: char) -> bool {
    c.is_ascii_alphabetic()
}
