//! Parser configuration.

use crate::error::ParserError;

/// Options for a single parse.
///
/// ```
/// use thicket_html::ParseSettings;
///
/// let settings = ParseSettings::default()
///     .track_errors(16)
///     .with_fragment_context("td");
/// assert_eq!(settings.max_errors, 16);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParseSettings {
    /// Keep tag and attribute names as written instead of lower-casing them.
    /// Tree construction always matches on the lower-cased name.
    pub case_sensitive_tags: bool,
    /// Maximum number of parse errors to record. Zero disables tracking.
    pub max_errors: usize,
    /// Parse as a fragment inside an element with this name instead of as a
    /// full document.
    pub fragment_context: Option<String>,
}

impl ParseSettings {
    /// Preserve the case of tag and attribute names.
    #[must_use]
    pub const fn with_case_sensitive_tags(mut self, case_sensitive: bool) -> Self {
        self.case_sensitive_tags = case_sensitive;
        self
    }

    /// Record up to `max_errors` parse errors.
    #[must_use]
    pub const fn track_errors(mut self, max_errors: usize) -> Self {
        self.max_errors = max_errors;
        self
    }

    /// Parse as a fragment of the element called `context`.
    #[must_use]
    pub fn with_fragment_context(mut self, context: impl Into<String>) -> Self {
        self.fragment_context = Some(context.into());
        self
    }

    /// Check the settings before a parse starts.
    ///
    /// # Errors
    ///
    /// Returns [`ParserError::InvalidFragmentContext`] if a fragment context
    /// is set but blank.
    pub fn validate(&self) -> Result<(), ParserError> {
        match &self.fragment_context {
            Some(context) if context.trim().is_empty() => {
                Err(ParserError::InvalidFragmentContext(context.clone()))
            }
            _ => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let settings = ParseSettings::default();
        assert!(!settings.case_sensitive_tags);
        assert_eq!(settings.max_errors, 0);
        assert_eq!(settings.fragment_context, None);
        assert_eq!(settings.validate(), Ok(()));
    }

    #[test]
    fn test_blank_context_is_invalid() {
        let settings = ParseSettings::default().with_fragment_context(" ");
        assert_eq!(
            settings.validate(),
            Err(ParserError::InvalidFragmentContext(" ".to_string()))
        );
    }
}
