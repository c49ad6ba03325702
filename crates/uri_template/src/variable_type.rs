// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

use std::fmt;

use crate::encoding::{encode_reserved, encode_unreserved};

/// The expression type of a template variable, selected by the operator character of the
/// `{...}` expression it appears in.
///
/// | operator | type | expands `{op x,y}` with `x = 1`, `y = 2` to |
/// |----------|------|------------------------------|
/// | none | [`Simple`](Self::Simple) | `1,2` |
/// | `+` | [`Reserved`](Self::Reserved) | `1,2` (reserved characters kept) |
/// | `.` | [`Dot`](Self::Dot) | `.1.2` |
/// | `/` | [`PathSegment`](Self::PathSegment) | `/1/2` |
/// | `;` | [`PathStyleParameter`](Self::PathStyleParameter) | `;x=1;y=2` |
/// | `?` | [`Query`](Self::Query) | `?x=1&y=2` |
/// | `&` | [`QueryContinuation`](Self::QueryContinuation) | `&x=1&y=2` |
/// | `#` | [`Fragment`](Self::Fragment) | `#1,2` (reserved characters kept) |
///
/// # Examples
///
/// ```
/// use uri_template::VariableType;
///
/// let kind = VariableType::try_from('?').unwrap();
/// assert_eq!(kind, VariableType::Query);
/// assert!(kind.can_combine_with(VariableType::QueryContinuation));
/// assert!(VariableType::try_from('!').is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum VariableType {
    /// Simple string expansion, `{var}`.
    Simple,
    /// Reserved string expansion, `{+var}`.
    Reserved,
    /// Label expansion with dot prefix, `{.var}`.
    Dot,
    /// Path segment expansion, `{/var}`.
    PathSegment,
    /// Path-style parameter expansion, `{;var}`.
    PathStyleParameter,
    /// Form-style query expansion, `{?var}`.
    Query,
    /// Form-style query continuation, `{&var}`.
    QueryContinuation,
    /// Fragment expansion, `{#var}`.
    Fragment,
}

/// Error returned when a character is not a supported expression operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("unsupported operator '{operator}'")]
pub struct UnknownOperator {
    /// The rejected character.
    pub operator: char,
}

impl VariableType {
    /// All supported types, in canonical order.
    pub const ALL: [Self; 8] = [
        Self::Simple,
        Self::Reserved,
        Self::Dot,
        Self::PathSegment,
        Self::PathStyleParameter,
        Self::Query,
        Self::QueryContinuation,
        Self::Fragment,
    ];

    /// Resolves the type for an optional operator character. `None` selects [`Self::Simple`].
    ///
    /// # Errors
    ///
    /// Returns [`UnknownOperator`] if the character is not one of `+ . / ; ? & #`.
    pub fn from_operator(operator: Option<char>) -> Result<Self, UnknownOperator> {
        match operator {
            None => Ok(Self::Simple),
            Some('+') => Ok(Self::Reserved),
            Some('.') => Ok(Self::Dot),
            Some('/') => Ok(Self::PathSegment),
            Some(';') => Ok(Self::PathStyleParameter),
            Some('?') => Ok(Self::Query),
            Some('&') => Ok(Self::QueryContinuation),
            Some('#') => Ok(Self::Fragment),
            Some(operator) => Err(UnknownOperator { operator }),
        }
    }

    /// The operator character, or `None` for simple expansion.
    #[must_use]
    pub fn operator(self) -> Option<char> {
        match self {
            Self::Simple => None,
            Self::Reserved => Some('+'),
            Self::Dot => Some('.'),
            Self::PathSegment => Some('/'),
            Self::PathStyleParameter => Some(';'),
            Self::Query => Some('?'),
            Self::QueryContinuation => Some('&'),
            Self::Fragment => Some('#'),
        }
    }

    /// The text emitted before the first defined value of an expression.
    #[must_use]
    pub fn prefix(self) -> &'static str {
        match self {
            Self::Simple | Self::Reserved => "",
            Self::Dot => ".",
            Self::PathSegment => "/",
            Self::PathStyleParameter => ";",
            Self::Query => "?",
            Self::QueryContinuation => "&",
            Self::Fragment => "#",
        }
    }

    /// The text used to join multiple values of an expression.
    #[must_use]
    pub fn separator(self) -> &'static str {
        match self {
            Self::Simple | Self::Reserved | Self::Fragment => ",",
            Self::Dot => ".",
            Self::PathSegment => "/",
            Self::PathStyleParameter => ";",
            Self::Query | Self::QueryContinuation => "&",
        }
    }

    /// Returns `true` if values are rendered as `name=value` pairs.
    #[must_use]
    pub fn is_named(self) -> bool {
        matches!(self, Self::PathStyleParameter | Self::Query | Self::QueryContinuation)
    }

    /// What follows the variable name when a named value is empty.
    pub(crate) fn if_empty(self) -> &'static str {
        match self {
            Self::Query | Self::QueryContinuation => "=",
            _ => "",
        }
    }

    /// Returns `true` if reserved characters in values are passed through unencoded.
    #[must_use]
    pub fn allows_reserved(self) -> bool {
        matches!(self, Self::Reserved | Self::Fragment)
    }

    /// Returns `true` for [`Self::Query`] and [`Self::QueryContinuation`].
    #[must_use]
    pub fn is_query(self) -> bool {
        matches!(self, Self::Query | Self::QueryContinuation)
    }

    /// Returns whether variables of both types may share a single expression.
    ///
    /// Types combine with themselves, and the two query types combine with each other.
    #[must_use]
    pub fn can_combine_with(self, other: Self) -> bool {
        self == other || (self.is_query() && other.is_query())
    }

    /// Position of the URI component this type renders, used to order new expressions.
    pub(crate) fn rank(self) -> u8 {
        match self {
            Self::Simple | Self::Reserved | Self::Dot | Self::PathSegment => 0,
            Self::PathStyleParameter => 1,
            Self::Query | Self::QueryContinuation => 2,
            Self::Fragment => 3,
        }
    }

    /// Percent-encodes a single value according to this type's policy.
    pub(crate) fn encode(self, value: &str) -> String {
        if self.allows_reserved() {
            encode_reserved(value)
        } else {
            encode_unreserved(value)
        }
    }

    fn name(self) -> &'static str {
        match self {
            Self::Simple => "simple",
            Self::Reserved => "reserved",
            Self::Dot => "dot",
            Self::PathSegment => "path-segment",
            Self::PathStyleParameter => "path-style-parameter",
            Self::Query => "query",
            Self::QueryContinuation => "query-continuation",
            Self::Fragment => "fragment",
        }
    }
}

impl TryFrom<char> for VariableType {
    type Error = UnknownOperator;

    fn try_from(operator: char) -> Result<Self, Self::Error> {
        Self::from_operator(Some(operator))
    }
}

impl fmt::Display for VariableType {
    #[cfg_attr(test, mutants::skip)] // Do not mutate display output.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
