//! Character reference resolution.
//!
//! The scanner does not know any entity names itself. Whenever it consumes an
//! `&` it hands the text up to the next buffered `;` to an [`EntityResolver`]
//! and either splices in the decoded text or keeps the `&` literally.

use std::borrow::Cow;

/// Named character reference lookup table.
pub mod named;

pub use named::lookup_entity;

/// Decodes the name of a character reference.
///
/// Implementations must be pure lookups: the scanner may call `resolve` any
/// number of times with arbitrary text.
pub trait EntityResolver {
    /// Decode `name`, the text between `&` and `;`.
    ///
    /// Returns `None` when the name is not a known reference.
    fn resolve(&self, name: &str) -> Option<Cow<'static, str>>;
}

impl<R: EntityResolver + ?Sized> EntityResolver for &R {
    fn resolve(&self, name: &str) -> Option<Cow<'static, str>> {
        (**self).resolve(name)
    }
}

/// The default resolver: the named table plus numeric references.
///
/// Numeric references are `#` followed by decimal digits, or `#x`/`#X`
/// followed by hexadecimal digits. A well-formed number outside the Unicode
/// scalar range (zero, surrogates, above U+10FFFF) decodes to U+FFFD.
#[derive(Debug, Clone, Copy, Default)]
pub struct NamedEntities;

impl EntityResolver for NamedEntities {
    fn resolve(&self, name: &str) -> Option<Cow<'static, str>> {
        if let Some(number) = name.strip_prefix('#') {
            return resolve_numeric(number).map(|c| Cow::Owned(c.to_string()));
        }
        lookup_entity(name).map(Cow::Borrowed)
    }
}

fn resolve_numeric(number: &str) -> Option<char> {
    let (digits, radix) = match number.strip_prefix(['x', 'X']) {
        Some(hex) => (hex, 16),
        None => (number, 10),
    };
    if digits.is_empty() || !digits.chars().all(|c| c.is_digit(radix)) {
        return None;
    }
    // Overlong digit runs still name a number, just not a valid one.
    let code_point = u32::from_str_radix(digits, radix).unwrap_or(u32::MAX);
    match code_point {
        0 => Some(char::REPLACEMENT_CHARACTER),
        n => Some(char::from_u32(n).unwrap_or(char::REPLACEMENT_CHARACTER)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn resolve(name: &str) -> Option<String> {
        NamedEntities.resolve(name).map(Cow::into_owned)
    }

    #[test]
    fn test_named_references() {
        assert_eq!(resolve("amp").as_deref(), Some("&"));
        assert_eq!(resolve("quot").as_deref(), Some("\""));
        assert_eq!(resolve("LT").as_deref(), Some("<"));
        assert_eq!(resolve("blk12").as_deref(), Some("\u{2592}"));
    }

    #[test]
    fn test_multi_code_point_reference() {
        assert_eq!(resolve("nleqq").as_deref(), Some("\u{2266}\u{0338}"));
    }

    #[test]
    fn test_names_are_case_sensitive() {
        assert_eq!(resolve("Amp"), None);
    }

    #[test]
    fn test_unknown_name() {
        assert_eq!(resolve("Borksnorlax"), None);
        assert_eq!(resolve(""), None);
    }

    #[test]
    fn test_decimal_reference() {
        assert_eq!(resolve("#60").as_deref(), Some("<"));
    }

    #[test]
    fn test_hex_reference() {
        assert_eq!(resolve("#x3c").as_deref(), Some("<"));
        assert_eq!(resolve("#X3C").as_deref(), Some("<"));
    }

    #[test]
    fn test_malformed_numeric_reference() {
        assert_eq!(resolve("#"), None);
        assert_eq!(resolve("#x"), None);
        assert_eq!(resolve("#12a"), None);
        assert_eq!(resolve("#xzz"), None);
    }

    #[test]
    fn test_out_of_range_numeric_reference() {
        assert_eq!(resolve("#0").as_deref(), Some("\u{FFFD}"));
        assert_eq!(resolve("#xD800").as_deref(), Some("\u{FFFD}"));
        assert_eq!(resolve("#x110000").as_deref(), Some("\u{FFFD}"));
        assert_eq!(resolve("#99999999999999").as_deref(), Some("\u{FFFD}"));
    }

    #[test]
    fn test_resolver_by_reference() {
        let resolver = NamedEntities;
        let by_ref = &resolver;
        assert_eq!(by_ref.resolve("gt").as_deref(), Some(">"));
    }
}
