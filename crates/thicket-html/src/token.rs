//! Tokens consumed by the tree builder.
//!
//! [§ 13.2.5 Tokenization](https://html.spec.whatwg.org/multipage/parsing.html#tokenization)
//!
//! "The output of the tokenization step is a series of zero or more of the following
//! tokens: DOCTYPE, start tag, end tag, comment, character, end-of-file."
//!
//! Tokenization itself happens elsewhere; this module only fixes the shape of
//! what a tokenizer hands over.

use core::fmt;

use strum_macros::Display;

pub use thicket_dom::Attribute;

/// [§ 13.2.5 Tokenization](https://html.spec.whatwg.org/multipage/parsing.html#tokenization)
///
/// A token from the tokenizer. Tag names arrive as written in the source;
/// the tree builder normalizes them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token {
    /// "DOCTYPE tokens have a name, a public identifier, a system identifier,
    /// and a force-quirks flag."
    Doctype {
        /// "a name"
        name: Option<String>,
        /// "a public identifier"
        public_identifier: Option<String>,
        /// "a system identifier"
        system_identifier: Option<String>,
        /// "a force-quirks flag"
        force_quirks: bool,
    },

    /// "Start and end tag tokens have a tag name, a self-closing flag, and a
    /// list of attributes, each of which has a name and a value."
    StartTag {
        /// "a tag name"
        name: String,
        /// "a self-closing flag"
        self_closing: bool,
        /// "a list of attributes"
        attributes: Vec<Attribute>,
    },

    /// End tag token. Attributes on end tags are dropped by the tokenizer.
    EndTag {
        /// "a tag name"
        name: String,
    },

    /// "Comment and character tokens have data."
    Comment {
        /// "data"
        data: String,
    },

    /// A run of one or more characters.
    Character {
        /// "data"
        data: String,
    },

    /// End-of-file token signals the end of input.
    EndOfFile,
}

/// The variant of a [`Token`], as it appears in parse error messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display)]
pub enum TokenKind {
    /// [`Token::Doctype`]
    Doctype,
    /// [`Token::StartTag`]
    StartTag,
    /// [`Token::EndTag`]
    EndTag,
    /// [`Token::Comment`]
    Comment,
    /// [`Token::Character`]
    Character,
    /// [`Token::EndOfFile`]
    #[strum(serialize = "EOF")]
    EndOfFile,
}

impl Token {
    /// A start tag with no attributes.
    pub fn start_tag(name: impl Into<String>) -> Self {
        Self::StartTag {
            name: name.into(),
            self_closing: false,
            attributes: Vec::new(),
        }
    }

    /// A start tag with attributes given as name/value pairs.
    pub fn start_tag_with<N, V>(name: impl Into<String>, attributes: impl IntoIterator<Item = (N, V)>) -> Self
    where
        N: Into<String>,
        V: Into<String>,
    {
        Self::StartTag {
            name: name.into(),
            self_closing: false,
            attributes: attributes
                .into_iter()
                .map(|(name, value)| Attribute::new(name, value))
                .collect(),
        }
    }

    /// A self-closing start tag such as `<br/>`.
    pub fn self_closing_tag(name: impl Into<String>) -> Self {
        Self::StartTag {
            name: name.into(),
            self_closing: true,
            attributes: Vec::new(),
        }
    }

    /// An end tag.
    pub fn end_tag(name: impl Into<String>) -> Self {
        Self::EndTag { name: name.into() }
    }

    /// A character run.
    pub fn character(data: impl Into<String>) -> Self {
        Self::Character { data: data.into() }
    }

    /// A comment.
    pub fn comment(data: impl Into<String>) -> Self {
        Self::Comment { data: data.into() }
    }

    /// A doctype with only a name, such as `<!DOCTYPE html>`.
    pub fn doctype(name: impl Into<String>) -> Self {
        Self::Doctype {
            name: Some(name.into()),
            public_identifier: None,
            system_identifier: None,
            force_quirks: false,
        }
    }

    /// Which kind of token this is.
    #[must_use]
    pub const fn kind(&self) -> TokenKind {
        match self {
            Self::Doctype { .. } => TokenKind::Doctype,
            Self::StartTag { .. } => TokenKind::StartTag,
            Self::EndTag { .. } => TokenKind::EndTag,
            Self::Comment { .. } => TokenKind::Comment,
            Self::Character { .. } => TokenKind::Character,
            Self::EndOfFile => TokenKind::EndOfFile,
        }
    }

    /// Returns true if this is an end-of-file token.
    #[must_use]
    pub const fn is_eof(&self) -> bool {
        matches!(self, Self::EndOfFile)
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Doctype { name, .. } => {
                write!(f, "<!DOCTYPE {}>", name.as_deref().unwrap_or(""))
            }
            Self::StartTag {
                name,
                self_closing,
                attributes,
            } => {
                write!(f, "<{name}")?;
                for attr in attributes {
                    write!(f, " {}=\"{}\"", attr.name, attr.value)?;
                }
                if *self_closing {
                    write!(f, " /")?;
                }
                write!(f, ">")
            }
            Self::EndTag { name } => write!(f, "</{name}>"),
            Self::Comment { data } => write!(f, "<!--{data}-->"),
            Self::Character { data } => write!(f, "{data:?}"),
            Self::EndOfFile => write!(f, "EOF"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_names_match_error_messages() {
        assert_eq!(Token::doctype("html").kind().to_string(), "Doctype");
        assert_eq!(Token::start_tag("p").kind().to_string(), "StartTag");
        assert_eq!(Token::end_tag("p").kind().to_string(), "EndTag");
        assert_eq!(Token::comment("x").kind().to_string(), "Comment");
        assert_eq!(Token::character("x").kind().to_string(), "Character");
        assert_eq!(Token::EndOfFile.kind().to_string(), "EOF");
    }

    #[test]
    fn test_display() {
        let token = Token::start_tag_with("a", [("href", "/")]);
        assert_eq!(token.to_string(), "<a href=\"/\">");
        assert_eq!(Token::self_closing_tag("br").to_string(), "<br />");
    }
}
