// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

/// The result for fallible operations that use the [`LinkHeaderError`] type.
pub type Result<T> = std::result::Result<T, LinkHeaderError>;

/// An error raised while parsing a `Link` header field value.
///
/// Every variant carries the byte offset at which parsing stopped. The parser never returns
/// partial results: a header with one malformed link-value is rejected as a whole.
///
/// # Examples
///
/// ```
/// use web_linking::{LinkHeaderError, parse_links};
///
/// let error = parse_links("<https://example.com/>;title=\"home\"").unwrap_err();
/// assert_eq!(error, LinkHeaderError::MissingRel { position: 35 });
/// assert_eq!(error.to_string(), "Missing 'rel' attribute at index 35");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[non_exhaustive]
pub enum LinkHeaderError {
    /// A link-value does not start with `<`.
    #[error("Expecting '<' at index {position}")]
    ExpectedOpeningBracket {
        /// Offset of the unexpected character.
        position: usize,
    },

    /// The target URI is not terminated by `>`.
    #[error("Missing closing '>' at index {position}")]
    MissingClosingBracket {
        /// Length of the input.
        position: usize,
    },

    /// A quoted attribute value has no closing quote.
    #[error("Missing final quote at index {position}")]
    UnterminatedQuotedString {
        /// Length of the input.
        position: usize,
    },

    /// A link-value has no `rel` attribute, or only a blank one.
    #[error("Missing 'rel' attribute at index {position}")]
    MissingRel {
        /// Offset just past the link-value.
        position: usize,
    },

    /// Content other than `,` follows a link-value.
    #[error("Unexpected data at the end of Link header at index {position}")]
    UnexpectedData {
        /// Offset of the unexpected character.
        position: usize,
    },
}

impl LinkHeaderError {
    /// Returns the byte offset at which parsing failed.
    #[must_use]
    pub fn position(&self) -> usize {
        match self {
            Self::ExpectedOpeningBracket { position }
            | Self::MissingClosingBracket { position }
            | Self::UnterminatedQuotedString { position }
            | Self::MissingRel { position }
            | Self::UnexpectedData { position } => *position,
        }
    }

    /// A short machine-readable name of the failure.
    #[cfg(any(feature = "logs", test))]
    pub(crate) fn reason(&self) -> &'static str {
        match self {
            Self::ExpectedOpeningBracket { .. } => "expected_opening_bracket",
            Self::MissingClosingBracket { .. } => "missing_closing_bracket",
            Self::UnterminatedQuotedString { .. } => "unterminated_quoted_string",
            Self::MissingRel { .. } => "missing_rel",
            Self::UnexpectedData { .. } => "unexpected_data",
        }
    }
}

/// An error raised when building a [`LinkValue`][crate::LinkValue] that could not be rendered
/// as a header link-value and parsed back unchanged.
///
/// # Examples
///
/// ```
/// use web_linking::{LinkValue, LinkValueError};
///
/// let error = LinkValue::new("/a", "next last").unwrap_err();
/// assert_eq!(error, LinkValueError::InvalidRelation { rel: "next last".to_string() });
/// ```
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[non_exhaustive]
pub enum LinkValueError {
    /// The target URI contains `>`, which would end it early.
    #[error("link target '{url}' must not contain '>'")]
    InvalidTarget {
        /// The rejected target.
        url: String,
    },

    /// The relation type is empty or contains whitespace, which would split it into several.
    #[error("relation type '{rel}' must be a single non-empty token")]
    InvalidRelation {
        /// The rejected relation type.
        rel: String,
    },

    /// The attribute name is not an RFC 7230 token.
    #[error("'{name}' is not a valid link attribute name")]
    InvalidAttributeName {
        /// The rejected attribute name.
        name: String,
    },
}

#[cfg(test)]
mod tests {
    use insta::assert_snapshot;

    use super::*;

    #[test]
    fn assert_types() {
        static_assertions::assert_impl_all!(LinkHeaderError: Send, Sync, std::error::Error);
        static_assertions::assert_impl_all!(LinkValueError: Send, Sync, std::error::Error);
    }

    #[test]
    fn link_value_error_display() {
        assert_snapshot!(
            LinkValueError::InvalidAttributeName { name: "a=b".to_string() }.to_string(),
            @"'a=b' is not a valid link attribute name"
        );
        assert_snapshot!(
            LinkValueError::InvalidTarget { url: "/a>b".to_string() }.to_string(),
            @"link target '/a>b' must not contain '>'"
        );
    }

    #[test]
    fn display() {
        assert_snapshot!(
            LinkHeaderError::UnexpectedData { position: 16 }.to_string(),
            @"Unexpected data at the end of Link header at index 16"
        );
        assert_snapshot!(
            LinkHeaderError::MissingClosingBracket { position: 30 }.to_string(),
            @"Missing closing '>' at index 30"
        );
        assert_snapshot!(
            LinkHeaderError::UnterminatedQuotedString { position: 32 }.to_string(),
            @"Missing final quote at index 32"
        );
        assert_snapshot!(
            LinkHeaderError::ExpectedOpeningBracket { position: 0 }.to_string(),
            @"Expecting '<' at index 0"
        );
    }

    #[test]
    fn position_and_reason() {
        let error = LinkHeaderError::MissingRel { position: 12 };
        assert_eq!(error.position(), 12);
        assert_eq!(error.reason(), "missing_rel");
    }
}
