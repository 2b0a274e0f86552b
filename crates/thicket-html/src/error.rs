//! Conditions that abort a parse.
//!
//! Malformed markup never ends up here; it is recorded as a
//! [`ParseError`](crate::ParseError) and the builder carries on. These are
//! the few cases where no sensible tree can be produced.

use thiserror::Error;

use thicket_dom::TagError;

/// A fatal parser failure.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParserError {
    /// The fragment context element name was empty or blank.
    #[error("invalid fragment context {0:?}: element name must not be empty")]
    InvalidFragmentContext(String),

    /// End of file arrived in the "in frameset" insertion mode with no
    /// document element open.
    #[error("end of file in frameset before the document element was opened")]
    EofInFramesetWithoutRoot,

    /// A tag token carried a name the registry rejected.
    #[error(transparent)]
    Tag(#[from] TagError),
}
