//! Recoverable parse errors.
//!
//! [§ 13.2.2 Parse errors](https://html.spec.whatwg.org/multipage/parsing.html#parse-errors)
//!
//! "This specification defines the parsing rules for HTML documents, whether they are
//! syntactically correct or not." Every deviation is recorded here and the tree builder
//! continues with a best-effort interpretation.

use core::fmt;

use super::core::{InsertionMode, LOG_TARGET};
use crate::token::TokenKind;

/// One recorded deviation from the tree construction rules.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseError {
    /// Zero-based index of the offending token in the input.
    pub position: usize,
    /// The insertion mode whose rules rejected the token.
    pub mode: InsertionMode,
    /// What kind of token it was.
    pub kind: TokenKind,
    /// `Unexpected token [<kind>] when in state [<mode>]`
    pub message: String,
}

impl ParseError {
    pub(crate) fn unexpected(position: usize, mode: InsertionMode, kind: TokenKind) -> Self {
        Self {
            position,
            mode,
            kind,
            message: format!("Unexpected token [{kind}] when in state [{mode}]"),
        }
    }
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "token {}: {}", self.position, self.message)
    }
}

/// Append-only error log with a fixed capacity.
///
/// Errors past the capacity are dropped without notice; a capacity of zero
/// records nothing.
#[derive(Debug, Clone, Default)]
pub struct ParseErrors {
    capacity: usize,
    errors: Vec<ParseError>,
}

impl ParseErrors {
    /// A log that keeps at most `capacity` errors.
    #[must_use]
    pub const fn with_capacity(capacity: usize) -> Self {
        Self {
            capacity,
            errors: Vec::new(),
        }
    }

    /// Whether errors are being recorded at all.
    #[must_use]
    pub const fn is_tracking(&self) -> bool {
        self.capacity > 0
    }

    /// Whether further errors will be dropped.
    #[must_use]
    pub fn is_full(&self) -> bool {
        self.errors.len() >= self.capacity
    }

    /// Record `error` unless the log is full.
    pub fn push(&mut self, error: ParseError) {
        if self.is_full() {
            return;
        }
        self.errors.push(error);
        if self.is_full() {
            log::debug!(
                target: LOG_TARGET,
                "error log reached its capacity of {}, dropping further errors",
                self.capacity
            );
        }
    }

    /// The recorded errors in encounter order.
    #[must_use]
    pub fn as_slice(&self) -> &[ParseError] {
        &self.errors
    }

    /// Number of recorded errors.
    #[must_use]
    pub fn len(&self) -> usize {
        self.errors.len()
    }

    /// Whether nothing has been recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    /// Take the recorded errors.
    #[must_use]
    pub fn into_vec(self) -> Vec<ParseError> {
        self.errors
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn error_at(position: usize) -> ParseError {
        ParseError::unexpected(position, InsertionMode::InBody, TokenKind::StartTag)
    }

    #[test]
    fn test_message_format() {
        let error = ParseError::unexpected(3, InsertionMode::InSelectInTable, TokenKind::StartTag);
        assert_eq!(
            error.message,
            "Unexpected token [StartTag] when in state [InSelectInTable]"
        );
        assert_eq!(
            ParseError::unexpected(0, InsertionMode::InFrameset, TokenKind::EndOfFile).message,
            "Unexpected token [EOF] when in state [InFrameset]"
        );
    }

    #[test]
    fn test_capacity_drops_silently() {
        let mut errors = ParseErrors::with_capacity(2);
        for position in 0..5 {
            errors.push(error_at(position));
        }

        assert_eq!(errors.len(), 2);
        assert!(errors.is_full());
        let positions: Vec<_> = errors.as_slice().iter().map(|e| e.position).collect();
        assert_eq!(positions, [0, 1]);
    }

    #[test]
    fn test_zero_capacity_records_nothing() {
        let mut errors = ParseErrors::with_capacity(0);
        errors.push(error_at(0));

        assert!(!errors.is_tracking());
        assert!(errors.is_empty());
    }
}
