// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

use std::fmt;
use std::num::NonZeroUsize;

use crate::error::{Result, TemplateError};
use crate::parser::is_valid_name;
use crate::{Value, VariableType};

/// Whether a variable renders a composite value as one token or element by element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum Cardinality {
    /// Lists and maps are joined into a single value, `{var}`.
    #[default]
    Singular,
    /// Lists and maps are exploded into one element per item, `{var*}`.
    Composite,
}

/// A single named variable of a URI template.
///
/// Variables are immutable; the `with_*` methods return modified copies.
///
/// # Examples
///
/// ```
/// use uri_template::{Parameters, TemplateVariable, VariableType};
///
/// let variable = TemplateVariable::new("tags", VariableType::Query).composite();
/// assert_eq!(variable.to_string(), "{?tags*}");
///
/// let parameters = Parameters::new().with("tags", vec!["a", "b"]);
/// assert_eq!(variable.expand(&parameters).as_deref(), Some("tags=a&tags=b"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(try_from = "VariableRecord"))]
pub struct TemplateVariable {
    name: String,
    kind: VariableType,
    #[cfg_attr(feature = "serde", serde(skip_serializing_if = "String::is_empty"))]
    description: String,
    cardinality: Cardinality,
    #[cfg_attr(feature = "serde", serde(skip_serializing_if = "Option::is_none"))]
    limit: Option<NonZeroUsize>,
}

impl TemplateVariable {
    /// Creates a singular variable without description or prefix limit.
    ///
    /// The name is not checked here. [`UriTemplate::augment`](crate::UriTemplate::augment)
    /// refuses variables whose name is not an RFC 6570 `varname`; use
    /// [`try_new`](Self::try_new) to check it up front.
    #[must_use]
    pub fn new(name: impl Into<String>, kind: VariableType) -> Self {
        Self {
            name: name.into(),
            kind,
            description: String::new(),
            cardinality: Cardinality::Singular,
            limit: None,
        }
    }

    /// Creates a singular variable, checking that `name` can be written into template text.
    ///
    /// # Errors
    ///
    /// Returns [`TemplateError::IllegalVariableName`] if `name` is empty or not an RFC 6570
    /// `varname`, such as `first name` or `a,b`.
    ///
    /// # Examples
    ///
    /// ```
    /// use uri_template::{TemplateVariable, VariableType};
    ///
    /// assert!(TemplateVariable::try_new("user.id", VariableType::Query).is_ok());
    /// assert!(TemplateVariable::try_new("first name", VariableType::Query).is_err());
    /// ```
    pub fn try_new(name: impl Into<String>, kind: VariableType) -> Result<Self> {
        let variable = Self::new(name, kind);
        variable.check_name()?;
        Ok(variable)
    }

    pub(crate) fn check_name(&self) -> Result<()> {
        if is_valid_name(&self.name) {
            Ok(())
        } else {
            Err(TemplateError::IllegalVariableName { name: self.name.clone() })
        }
    }

    /// Creates a simple string expansion variable, `{name}`.
    #[must_use]
    pub fn simple(name: impl Into<String>) -> Self {
        Self::new(name, VariableType::Simple)
    }

    /// Creates a path segment variable, `{/name}`.
    #[must_use]
    pub fn path_segment(name: impl Into<String>) -> Self {
        Self::new(name, VariableType::PathSegment)
    }

    /// Creates a query variable, `{?name}`.
    #[must_use]
    pub fn query(name: impl Into<String>) -> Self {
        Self::new(name, VariableType::Query)
    }

    /// Creates a fragment variable, `{#name}`.
    #[must_use]
    pub fn fragment(name: impl Into<String>) -> Self {
        Self::new(name, VariableType::Fragment)
    }

    /// Returns the variable name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the expression type.
    #[must_use]
    pub fn kind(&self) -> VariableType {
        self.kind
    }

    /// Returns the human readable description, empty if none was given.
    #[must_use]
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Returns `true` if a description was given.
    #[must_use]
    pub fn has_description(&self) -> bool {
        !self.description.trim().is_empty()
    }

    /// Returns the cardinality.
    #[must_use]
    pub fn cardinality(&self) -> Cardinality {
        self.cardinality
    }

    /// Returns `true` if the variable uses the explode modifier.
    #[must_use]
    pub fn is_composite(&self) -> bool {
        self.cardinality == Cardinality::Composite
    }

    /// Returns the prefix limit, if any.
    #[must_use]
    pub fn limit(&self) -> Option<NonZeroUsize> {
        self.limit
    }

    /// Returns a copy with a different expression type.
    #[must_use]
    pub fn with_kind(&self, kind: VariableType) -> Self {
        Self { kind, ..self.clone() }
    }

    /// Returns a copy with the given description.
    #[must_use]
    pub fn with_description(&self, description: impl Into<String>) -> Self {
        Self {
            description: description.into(),
            ..self.clone()
        }
    }

    /// Returns a copy with the given cardinality.
    #[must_use]
    pub fn with_cardinality(&self, cardinality: Cardinality) -> Self {
        Self {
            cardinality,
            ..self.clone()
        }
    }

    /// Returns a composite (exploded) copy, `{name*}`.
    #[must_use]
    pub fn composite(&self) -> Self {
        self.with_cardinality(Cardinality::Composite)
    }

    /// Returns a copy whose scalar values are truncated to `limit` characters, `{name:limit}`.
    #[must_use]
    pub fn with_limit(&self, limit: NonZeroUsize) -> Self {
        Self {
            limit: Some(limit),
            ..self.clone()
        }
    }

    /// Returns `true` if both variables can share one expression.
    #[must_use]
    pub fn is_combinable(&self, other: &Self) -> bool {
        self.kind.can_combine_with(other.kind)
    }

    /// Returns `true` if both variables have the same name and combinable types.
    ///
    /// A query variable and a query continuation variable of the same name are equivalent.
    #[must_use]
    pub fn is_equivalent(&self, other: &Self) -> bool {
        self.name == other.name && self.is_combinable(other)
    }

    /// Returns `true` if the variable is rendered as a query parameter.
    #[must_use]
    pub fn is_request_parameter(&self) -> bool {
        self.kind.is_query()
    }

    /// Returns `true` if the variable renders the fragment.
    #[must_use]
    pub fn is_fragment(&self) -> bool {
        self.kind == VariableType::Fragment
    }

    /// Renders the value bound to this variable, without the expression prefix.
    ///
    /// Returns `None` if the variable is unbound or bound to an empty list or map.
    #[must_use]
    pub fn expand(&self, parameters: &crate::Parameters) -> Option<String> {
        parameters.get(&self.name).and_then(|value| self.prepare_and_encode(value))
    }

    /// Renders a bound value, applying the prefix limit, percent-encoding and naming rules.
    #[must_use]
    pub fn prepare_and_encode(&self, value: &Value) -> Option<String> {
        if value.is_empty_composite() {
            return None;
        }

        let kind = self.kind;
        let rendered = match value {
            Value::Scalar(scalar) => self.handle_composite(&kind.encode(self.truncate(scalar))),
            Value::List(items) if self.is_composite() => items
                .iter()
                .map(|item| self.handle_composite(&kind.encode(item)))
                .collect::<Vec<_>>()
                .join(kind.separator()),
            Value::List(items) => {
                let joined = items.iter().map(|item| kind.encode(item)).collect::<Vec<_>>().join(",");
                self.handle_composite(&joined)
            }
            // Query parameters carry map entries as their own parameters even when not exploded.
            Value::Map(entries) if self.is_composite() || kind.is_query() => entries
                .iter()
                .map(|(key, value)| pair(kind, &kind.encode(key), &kind.encode(value)))
                .collect::<Vec<_>>()
                .join(kind.separator()),
            Value::Map(entries) => {
                let joined = entries
                    .iter()
                    .flat_map(|(key, value)| [kind.encode(key), kind.encode(value)])
                    .collect::<Vec<_>>()
                    .join(",");
                self.handle_composite(&joined)
            }
        };

        Some(rendered)
    }

    /// Adds the `name=` prefix for named expression types.
    fn handle_composite(&self, encoded: &str) -> String {
        if self.kind.is_named() {
            pair(self.kind, &self.name, encoded)
        } else {
            encoded.to_owned()
        }
    }

    fn truncate<'a>(&self, value: &'a str) -> &'a str {
        match self.limit {
            Some(limit) => value.char_indices().nth(limit.get()).map_or(value, |(index, _)| &value[..index]),
            None => value,
        }
    }

    /// Writes the variable specification as it appears inside an expression, `name[:limit][*]`.
    pub(crate) fn write_spec(&self, target: &mut String) {
        target.push_str(&self.name);
        if let Some(limit) = self.limit {
            target.push(':');
            target.push_str(&limit.to_string());
        }
        if self.is_composite() {
            target.push('*');
        }
    }
}

/// Renders `key=value`, or the type's empty-value form when `value` is empty.
fn pair(kind: VariableType, key: &str, value: &str) -> String {
    if kind.is_named() && value.is_empty() {
        format!("{key}{}", kind.if_empty())
    } else {
        format!("{key}={value}")
    }
}

/// Deserialized form of a [`TemplateVariable`], checked before it becomes one.
#[cfg(feature = "serde")]
#[derive(serde::Deserialize)]
struct VariableRecord {
    name: String,
    kind: VariableType,
    #[serde(default)]
    description: String,
    #[serde(default)]
    cardinality: Cardinality,
    #[serde(default)]
    limit: Option<NonZeroUsize>,
}

#[cfg(feature = "serde")]
impl TryFrom<VariableRecord> for TemplateVariable {
    type Error = TemplateError;

    fn try_from(record: VariableRecord) -> Result<Self> {
        let variable = Self::try_new(record.name, record.kind)?;
        Ok(Self {
            description: record.description,
            cardinality: record.cardinality,
            limit: record.limit,
            ..variable
        })
    }
}

impl fmt::Display for TemplateVariable {
    #[cfg_attr(test, mutants::skip)] // Do not mutate display output.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut spec = String::new();
        self.write_spec(&mut spec);

        f.write_str("{")?;
        if let Some(operator) = self.kind.operator() {
            write!(f, "{operator}")?;
        }
        write!(f, "{spec}}}")?;

        if self.has_description() {
            write!(f, " - {}", self.description)?;
        }
        Ok(())
    }
}
