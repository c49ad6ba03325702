// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

use crate::VariableType;

/// The result for fallible operations that use the [`TemplateError`] type.
pub type Result<T> = std::result::Result<T, TemplateError>;

/// An error raised while parsing or augmenting a [`UriTemplate`][crate::UriTemplate].
///
/// Errors fall into two families:
///
/// * Syntax errors describe malformed template text. They carry the byte offset at which the
///   problem was detected together with the offending fragment.
/// * [`TemplateError::ConflictingVariable`] and [`TemplateError::IllegalVariableName`] are
///   raised by [`UriTemplate::augment`][crate::UriTemplate::augment] when a caller tries to add a
///   variable whose name is already taken by a variable of an incompatible type, or whose name
///   could not be written into template text. These are programming errors rather than data
///   errors.
///
/// Both families are deterministic functions of their input, so retrying makes no sense.
///
/// # Examples
///
/// ```
/// use uri_template::{TemplateError, UriTemplate};
///
/// let error = UriTemplate::parse("/users{?page").unwrap_err();
/// assert!(matches!(error, TemplateError::UnterminatedExpression { position: 6, .. }));
/// assert!(error.is_syntax_error());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[non_exhaustive]
pub enum TemplateError {
    /// The template text is empty.
    #[error("template must not be empty")]
    EmptyTemplate,

    /// An expression was opened with `{` but never closed.
    #[error("unterminated expression '{fragment}' at index {position}")]
    UnterminatedExpression {
        /// Byte offset of the opening brace.
        position: usize,
        /// The unterminated text, starting at the opening brace.
        fragment: String,
    },

    /// A closing `}` appeared outside of an expression.
    #[error("unexpected '}}' at index {position}")]
    UnexpectedClosingBrace {
        /// Byte offset of the closing brace.
        position: usize,
    },

    /// The expression starts with an operator character that is not supported.
    #[error("unsupported operator '{operator}' at index {position}")]
    UnknownOperator {
        /// Byte offset of the operator character.
        position: usize,
        /// The operator character found.
        operator: char,
    },

    /// A variable name is empty or contains characters not allowed by RFC 6570.
    #[error("invalid variable name '{name}' at index {position}")]
    InvalidVariableName {
        /// Byte offset of the variable specification.
        position: usize,
        /// The offending variable specification.
        name: String,
    },

    /// A prefix modifier is not a number in the range `1..=9999`.
    #[error("invalid prefix length '{prefix}' for variable '{name}' at index {position}")]
    InvalidPrefix {
        /// Byte offset of the variable specification.
        position: usize,
        /// The variable the modifier belongs to.
        name: String,
        /// The text following the `:`.
        prefix: String,
    },

    /// A variable built in code has a name that cannot appear in template text.
    #[error("'{name}' is not a valid template variable name")]
    IllegalVariableName {
        /// The rejected name.
        name: String,
    },

    /// A variable was added under a name already used by a variable of a type it cannot be
    /// combined with.
    #[error("template variable '{name}' is already declared as '{existing}' and cannot be redeclared as '{proposed}'")]
    ConflictingVariable {
        /// The variable name.
        name: String,
        /// The type of the variable already present in the template.
        existing: VariableType,
        /// The type of the variable that was proposed.
        proposed: VariableType,
    },
}

impl TemplateError {
    /// Returns `true` if the error describes malformed template text.
    #[must_use]
    pub fn is_syntax_error(&self) -> bool {
        !self.is_illegal_usage()
    }

    /// Returns `true` if the error was caused by an invalid call rather than invalid input.
    #[must_use]
    pub fn is_illegal_usage(&self) -> bool {
        matches!(self, Self::ConflictingVariable { .. } | Self::IllegalVariableName { .. })
    }

    /// Returns the byte offset associated with a syntax error.
    #[must_use]
    pub fn position(&self) -> Option<usize> {
        match self {
            Self::UnterminatedExpression { position, .. }
            | Self::UnexpectedClosingBrace { position }
            | Self::UnknownOperator { position, .. }
            | Self::InvalidVariableName { position, .. }
            | Self::InvalidPrefix { position, .. } => Some(*position),
            Self::EmptyTemplate | Self::IllegalVariableName { .. } | Self::ConflictingVariable { .. } => None,
        }
    }
}
