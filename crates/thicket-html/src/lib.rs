//! Error-tolerant HTML tree construction.
//!
//! # Scope
//!
//! This crate implements:
//! - **Tree Builder** ([WHATWG § 13.2.6](https://html.spec.whatwg.org/multipage/parsing.html#tree-construction))
//!   - All insertion modes, from "initial" to "after after frameset"
//!   - The stack of open elements and its scope queries
//!   - The list of active formatting elements, reconstruction and the
//!     adoption agency algorithm
//!   - Foster parenting of content misplaced inside tables
//!   - Templates, SVG and MathML foreign content
//!   - Fragment parsing against a context element
//!
//! - **Parse errors** ([WHATWG § 13.2.2](https://html.spec.whatwg.org/multipage/parsing.html#parse-errors))
//!   - A bounded log of every deviation, tagged with the insertion mode
//!
//! # Not Implemented
//!
//! - Tokenization: callers supply [`Token`]s
//! - Serialization, selectors, encoding sniffing and scripting
//!
//! ```
//! use thicket_html::{ParseSettings, Token, parse_document};
//!
//! let tokens = vec![
//!     Token::start_tag("table"),
//!     Token::character("oops"),
//!     Token::end_tag("table"),
//! ];
//! let output = parse_document(tokens, ParseSettings::default().track_errors(8))?;
//! assert!(!output.errors.is_empty());
//! # Ok::<(), thicket_html::ParserError>(())
//! ```

/// Fatal parser errors.
pub mod error;
/// HTML parser and tree construction.
pub mod parser;
/// Parse configuration.
pub mod settings;
/// Tokens consumed by the tree builder.
pub mod token;

pub use error::ParserError;
pub use parser::{HTMLParser, InsertionMode, ParseError, ParseErrors, ParseOutput};
pub use settings::ParseSettings;
pub use token::{Attribute, Token, TokenKind};

/// Build a document from `tokens`.
///
/// Any fragment context in `settings` is ignored.
///
/// # Errors
///
/// See [`HTMLParser::parse`].
pub fn parse_document<I>(tokens: I, settings: ParseSettings) -> Result<ParseOutput, ParserError>
where
    I: IntoIterator<Item = Token>,
{
    let settings = ParseSettings {
        fragment_context: None,
        ..settings
    };
    HTMLParser::new(settings)?.parse(tokens)
}

/// Build a fragment from `tokens` as if they appeared inside an element
/// called `context`. The resulting nodes are
/// [`ParseOutput::fragment_nodes`].
///
/// # Errors
///
/// Returns [`ParserError::InvalidFragmentContext`] for a blank `context`,
/// otherwise see [`HTMLParser::parse`].
pub fn parse_fragment<I>(
    context: &str,
    tokens: I,
    settings: ParseSettings,
) -> Result<ParseOutput, ParserError>
where
    I: IntoIterator<Item = Token>,
{
    HTMLParser::new(settings.with_fragment_context(context))?.parse(tokens)
}
