use std::fmt;

use serde::Serialize;

use crate::position::SourceSpan;

/// An attribute on a start tag.
///
/// `values` holds the literal fragments of the attribute value. The scanner
/// always produces exactly one fragment; the list form leaves room for values
/// split around embedded expressions, which are collected separately in
/// `embedded_expressions`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Attribute {
    /// Attribute name, case preserved.
    pub name: String,
    /// Literal value fragments in source order.
    pub values: Vec<String>,
    /// Expressions embedded in the value, in source order.
    pub embedded_expressions: Vec<AttributeExpression>,
    /// Whether the value was written in quotes.
    pub quoted: bool,
}

impl Attribute {
    /// Create an attribute with a single value fragment.
    #[must_use]
    pub fn new(name: impl Into<String>, value: impl Into<String>, quoted: bool) -> Self {
        Self {
            name: name.into(),
            values: vec![value.into()],
            embedded_expressions: Vec::new(),
            quoted,
        }
    }

    /// The value fragments joined back together.
    #[must_use]
    pub fn value(&self) -> String {
        self.values.concat()
    }
}

/// An expression fragment embedded inside a tag attribute value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AttributeExpression {
    /// Expression name.
    pub name: String,
    /// Expression attributes in source order.
    pub attributes: Vec<ExpressionAttribute>,
}

/// An attribute of a `{{name ...}}` expression.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExpressionAttribute {
    /// The attribute name, or the literal text for a quoted bare attribute.
    pub name: String,
    /// The attribute value; empty when none was supplied.
    pub value: String,
    /// Whether the name was a quoted literal.
    pub name_is_literal: bool,
    /// `None` when no value was supplied, otherwise whether the value was a
    /// quoted literal.
    pub value_is_literal: Option<bool>,
}

impl ExpressionAttribute {
    /// A bare reference or literal with no `=value` part.
    #[must_use]
    pub fn bare(name: impl Into<String>, name_is_literal: bool) -> Self {
        Self {
            name: name.into(),
            value: String::new(),
            name_is_literal,
            value_is_literal: None,
        }
    }

    /// A `name=value` pair with an unquoted name.
    #[must_use]
    pub fn pair(name: impl Into<String>, value: impl Into<String>, value_is_literal: bool) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
            name_is_literal: false,
            value_is_literal: Some(value_is_literal),
        }
    }
}

/// The lexical content of a token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type")]
pub enum TokenKind {
    /// A run of text.
    Chars {
        /// The text, with character references decoded.
        text: String,
    },

    /// A `<!-- ... -->` comment.
    Comment {
        /// Everything between the delimiters.
        text: String,
    },

    /// A start tag such as `<div id="x">` or `<img />`.
    StartTag {
        /// Tag name; the first letter is lower-cased, the rest preserved.
        name: String,
        /// Attributes in source order.
        attributes: Vec<Attribute>,
        /// Whether the tag ended with `/>`.
        self_closing: bool,
    },

    /// An end tag such as `</div>`.
    EndTag {
        /// Tag name; the first letter is lower-cased, the rest preserved.
        name: String,
    },

    /// An opening expression: `{{name ...}}` or the block form `{{#name ...}}`.
    StartExpression {
        /// Expression name; the first letter is lower-cased, the rest preserved.
        name: String,
        /// Expression attributes in source order.
        attributes: Vec<ExpressionAttribute>,
        /// Whether this opens a block (`{{#name}}`).
        is_block: bool,
    },

    /// A closing expression: `{{/name}}`.
    EndExpression {
        /// Expression name; the first letter is lower-cased, the rest preserved.
        name: String,
    },
}

impl TokenKind {
    /// An empty text run.
    #[must_use]
    pub const fn new_chars() -> Self {
        Self::Chars {
            text: String::new(),
        }
    }

    /// An empty comment.
    #[must_use]
    pub const fn new_comment() -> Self {
        Self::Comment {
            text: String::new(),
        }
    }

    /// A start tag with no name, no attributes and the self-closing flag unset.
    #[must_use]
    pub const fn new_start_tag() -> Self {
        Self::StartTag {
            name: String::new(),
            attributes: Vec::new(),
            self_closing: false,
        }
    }

    /// An end tag with no name.
    #[must_use]
    pub const fn new_end_tag() -> Self {
        Self::EndTag {
            name: String::new(),
        }
    }

    /// A start expression with no name and no attributes.
    #[must_use]
    pub const fn new_start_expression(is_block: bool) -> Self {
        Self::StartExpression {
            name: String::new(),
            attributes: Vec::new(),
            is_block,
        }
    }

    /// An end expression with no name.
    #[must_use]
    pub const fn new_end_expression() -> Self {
        Self::EndExpression {
            name: String::new(),
        }
    }

    /// Append to the text of a `Chars` or `Comment` token.
    ///
    /// # Panics
    ///
    /// Panics if called on any other variant, indicating a tokenizer bug.
    pub fn append_to_text(&mut self, s: &str) {
        match self {
            Self::Chars { text } | Self::Comment { text } => text.push_str(s),
            _ => panic!("append_to_text called on non-text token"),
        }
    }

    /// Append a character to a tag name.
    ///
    /// # Panics
    ///
    /// Panics if called on a non-tag token, indicating a tokenizer bug.
    pub fn append_to_tag_name(&mut self, c: char) {
        match self {
            Self::StartTag { name, .. } | Self::EndTag { name } => name.push(c),
            _ => panic!("append_to_tag_name called on non-tag token"),
        }
    }

    /// Set the self-closing flag of a start tag.
    ///
    /// End tags have no such flag; `</br/>` is accepted and the flag dropped.
    ///
    /// # Panics
    ///
    /// Panics if called on a non-tag token, indicating a tokenizer bug.
    pub fn set_self_closing(&mut self) {
        match self {
            Self::StartTag { self_closing, .. } => *self_closing = true,
            Self::EndTag { .. } => {}
            _ => panic!("set_self_closing called on non-tag token"),
        }
    }

    /// Add a finished attribute to a start tag.
    ///
    /// Attributes written on an end tag are scanned but discarded.
    ///
    /// # Panics
    ///
    /// Panics if called on a non-tag token, indicating a tokenizer bug.
    pub fn push_attribute(&mut self, attribute: Attribute) {
        match self {
            Self::StartTag { attributes, .. } => attributes.push(attribute),
            Self::EndTag { .. } => {}
            _ => panic!("push_attribute called on non-tag token"),
        }
    }

    /// Append a character to an expression name.
    ///
    /// # Panics
    ///
    /// Panics if called on a non-expression token, indicating a tokenizer bug.
    pub fn append_to_expression_name(&mut self, c: char) {
        match self {
            Self::StartExpression { name, .. } | Self::EndExpression { name } => name.push(c),
            _ => panic!("append_to_expression_name called on non-expression token"),
        }
    }

    /// Start a new attribute on a start expression.
    ///
    /// Attributes written on an end expression (`{{/each x}}`) are scanned but
    /// not recorded.
    ///
    /// # Panics
    ///
    /// Panics if called on a non-expression token, indicating a tokenizer bug.
    pub fn start_new_expression_attribute(&mut self, name_is_literal: bool) {
        match self {
            Self::StartExpression { attributes, .. } => {
                attributes.push(ExpressionAttribute::bare(String::new(), name_is_literal));
            }
            Self::EndExpression { .. } => {}
            _ => panic!("start_new_expression_attribute called on non-expression token"),
        }
    }

    /// The most recently started expression attribute, if any.
    ///
    /// Always `None` for end expressions.
    ///
    /// # Panics
    ///
    /// Panics if called on a non-expression token, indicating a tokenizer bug.
    pub fn current_expression_attribute_mut(&mut self) -> Option<&mut ExpressionAttribute> {
        match self {
            Self::StartExpression { attributes, .. } => attributes.last_mut(),
            Self::EndExpression { .. } => None,
            _ => panic!("current_expression_attribute_mut called on non-expression token"),
        }
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Chars { text } => write!(f, "Chars({text:?})"),
            Self::Comment { text } => write!(f, "<!--{text}-->"),
            Self::StartTag {
                name,
                attributes,
                self_closing,
            } => {
                write!(f, "<{name}")?;
                for attr in attributes {
                    if attr.quoted {
                        write!(f, " {}=\"{}\"", attr.name, attr.value())?;
                    } else if attr.value().is_empty() {
                        write!(f, " {}", attr.name)?;
                    } else {
                        write!(f, " {}={}", attr.name, attr.value())?;
                    }
                }
                if *self_closing {
                    write!(f, " /")?;
                }
                write!(f, ">")
            }
            Self::EndTag { name } => write!(f, "</{name}>"),
            Self::StartExpression {
                name,
                attributes,
                is_block,
            } => {
                write!(f, "{{{{")?;
                if *is_block {
                    write!(f, "#")?;
                }
                write!(f, "{name}")?;
                for attr in attributes {
                    if attr.name_is_literal {
                        write!(f, " \"{}\"", attr.name)?;
                    } else {
                        write!(f, " {}", attr.name)?;
                    }
                    match attr.value_is_literal {
                        Some(true) => write!(f, "=\"{}\"", attr.value)?,
                        Some(false) => write!(f, "={}", attr.value)?,
                        None => {}
                    }
                }
                write!(f, "}}}}")
            }
            Self::EndExpression { name } => write!(f, "{{{{/{name}}}}}"),
        }
    }
}

/// A sealed token, optionally annotated with where it came from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Token {
    /// What was scanned.
    #[serde(flatten)]
    pub kind: TokenKind,
    /// Source span, present only when location tracking is enabled.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub loc: Option<SourceSpan>,
}

impl Token {
    /// A token without location information.
    #[must_use]
    pub const fn new(kind: TokenKind) -> Self {
        Self { kind, loc: None }
    }

    /// Attach a source span.
    #[must_use]
    pub const fn with_loc(mut self, loc: SourceSpan) -> Self {
        self.loc = Some(loc);
        self
    }
}

impl From<TokenKind> for Token {
    fn from(kind: TokenKind) -> Self {
        Self::new(kind)
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.loc {
            Some(loc) => write!(f, "{} @ {loc}", self.kind),
            None => write!(f, "{}", self.kind),
        }
    }
}
