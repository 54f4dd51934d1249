//! Named character reference table.
//!
//! Maps reference names (without the surrounding `&` and `;`) to their
//! replacement text. Only the commonly used subset of the HTML entity list is
//! carried; names are case-sensitive, so `LT` and `lt` are separate entries.

use std::collections::HashMap;
use std::sync::LazyLock;

static NAMED_ENTITIES: LazyLock<HashMap<&'static str, &'static str>> = LazyLock::new(|| {
    HashMap::from([
        // Markup-significant
        ("amp", "&"),
        ("AMP", "&"),
        ("lt", "<"),
        ("LT", "<"),
        ("gt", ">"),
        ("GT", ">"),
        ("quot", "\""),
        ("QUOT", "\""),
        ("apos", "'"),
        ("nbsp", "\u{00A0}"),
        // Punctuation and symbols
        ("copy", "\u{00A9}"),
        ("COPY", "\u{00A9}"),
        ("reg", "\u{00AE}"),
        ("REG", "\u{00AE}"),
        ("trade", "\u{2122}"),
        ("mdash", "\u{2014}"),
        ("ndash", "\u{2013}"),
        ("hellip", "\u{2026}"),
        ("bull", "\u{2022}"),
        ("middot", "\u{00B7}"),
        ("sect", "\u{00A7}"),
        ("para", "\u{00B6}"),
        ("dagger", "\u{2020}"),
        ("Dagger", "\u{2021}"),
        ("lsquo", "\u{2018}"),
        ("rsquo", "\u{2019}"),
        ("ldquo", "\u{201C}"),
        ("rdquo", "\u{201D}"),
        ("laquo", "\u{00AB}"),
        ("raquo", "\u{00BB}"),
        ("iexcl", "\u{00A1}"),
        ("iquest", "\u{00BF}"),
        ("shy", "\u{00AD}"),
        ("ensp", "\u{2002}"),
        ("emsp", "\u{2003}"),
        ("thinsp", "\u{2009}"),
        // Block elements
        ("blk12", "\u{2592}"),
        ("blk14", "\u{2591}"),
        ("blk34", "\u{2593}"),
        ("block", "\u{2588}"),
        // Currency
        ("cent", "\u{00A2}"),
        ("pound", "\u{00A3}"),
        ("euro", "\u{20AC}"),
        ("yen", "\u{00A5}"),
        ("curren", "\u{00A4}"),
        // Math
        ("times", "\u{00D7}"),
        ("divide", "\u{00F7}"),
        ("plusmn", "\u{00B1}"),
        ("minus", "\u{2212}"),
        ("ne", "\u{2260}"),
        ("le", "\u{2264}"),
        ("ge", "\u{2265}"),
        ("leqq", "\u{2266}"),
        ("geqq", "\u{2267}"),
        ("nleqq", "\u{2266}\u{0338}"),
        ("ngeqq", "\u{2267}\u{0338}"),
        ("NotGreaterFullEqual", "\u{2267}\u{0338}"),
        ("infin", "\u{221E}"),
        ("sum", "\u{2211}"),
        ("prod", "\u{220F}"),
        ("radic", "\u{221A}"),
        ("asymp", "\u{2248}"),
        ("equiv", "\u{2261}"),
        ("deg", "\u{00B0}"),
        ("micro", "\u{00B5}"),
        ("frac12", "\u{00BD}"),
        ("frac14", "\u{00BC}"),
        ("frac34", "\u{00BE}"),
        ("sup1", "\u{00B9}"),
        ("sup2", "\u{00B2}"),
        ("sup3", "\u{00B3}"),
        // Arrows
        ("larr", "\u{2190}"),
        ("rarr", "\u{2192}"),
        ("uarr", "\u{2191}"),
        ("darr", "\u{2193}"),
        ("harr", "\u{2194}"),
        ("lArr", "\u{21D0}"),
        ("rArr", "\u{21D2}"),
        // Greek
        ("alpha", "\u{03B1}"),
        ("beta", "\u{03B2}"),
        ("gamma", "\u{03B3}"),
        ("delta", "\u{03B4}"),
        ("epsilon", "\u{03B5}"),
        ("lambda", "\u{03BB}"),
        ("mu", "\u{03BC}"),
        ("pi", "\u{03C0}"),
        ("sigma", "\u{03C3}"),
        ("tau", "\u{03C4}"),
        ("phi", "\u{03C6}"),
        ("omega", "\u{03C9}"),
        ("Delta", "\u{0394}"),
        ("Sigma", "\u{03A3}"),
        ("Omega", "\u{03A9}"),
        // Accented letters
        ("Agrave", "\u{00C0}"),
        ("Aacute", "\u{00C1}"),
        ("Acirc", "\u{00C2}"),
        ("Atilde", "\u{00C3}"),
        ("Auml", "\u{00C4}"),
        ("Aring", "\u{00C5}"),
        ("AElig", "\u{00C6}"),
        ("agrave", "\u{00E0}"),
        ("aacute", "\u{00E1}"),
        ("acirc", "\u{00E2}"),
        ("atilde", "\u{00E3}"),
        ("auml", "\u{00E4}"),
        ("aring", "\u{00E5}"),
        ("aelig", "\u{00E6}"),
        ("Egrave", "\u{00C8}"),
        ("Eacute", "\u{00C9}"),
        ("Euml", "\u{00CB}"),
        ("egrave", "\u{00E8}"),
        ("eacute", "\u{00E9}"),
        ("ecirc", "\u{00EA}"),
        ("euml", "\u{00EB}"),
        ("Igrave", "\u{00CC}"),
        ("Iacute", "\u{00CD}"),
        ("igrave", "\u{00EC}"),
        ("iacute", "\u{00ED}"),
        ("iuml", "\u{00EF}"),
        ("Ograve", "\u{00D2}"),
        ("Oacute", "\u{00D3}"),
        ("Ouml", "\u{00D6}"),
        ("Oslash", "\u{00D8}"),
        ("ograve", "\u{00F2}"),
        ("oacute", "\u{00F3}"),
        ("ocirc", "\u{00F4}"),
        ("ouml", "\u{00F6}"),
        ("oslash", "\u{00F8}"),
        ("Ugrave", "\u{00D9}"),
        ("Uacute", "\u{00DA}"),
        ("Uuml", "\u{00DC}"),
        ("ugrave", "\u{00F9}"),
        ("uacute", "\u{00FA}"),
        ("uuml", "\u{00FC}"),
        ("ntilde", "\u{00F1}"),
        ("Ntilde", "\u{00D1}"),
        ("ccedil", "\u{00E7}"),
        ("Ccedil", "\u{00C7}"),
        ("szlig", "\u{00DF}"),
        ("yuml", "\u{00FF}"),
    ])
});

/// Look up a named character reference.
///
/// `name` excludes the leading `&` and the trailing `;`.
#[must_use]
pub fn lookup_entity(name: &str) -> Option<&'static str> {
    NAMED_ENTITIES.get(name).copied()
}
