// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

use std::fmt;
use std::slice;

use crate::TemplateVariable;

/// An ordered collection of [`TemplateVariable`]s.
///
/// Concatenation never introduces a variable that is equivalent to one already present, so the
/// collection stays free of duplicates as it grows.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct TemplateVariables {
    variables: Vec<TemplateVariable>,
}

impl TemplateVariables {
    /// An empty collection.
    pub const NONE: Self = Self { variables: Vec::new() };

    /// Creates a collection from the given variables, dropping later equivalents.
    #[must_use]
    pub fn new(variables: impl IntoIterator<Item = TemplateVariable>) -> Self {
        Self::NONE.concat(variables)
    }

    /// Returns a new collection with the given variables appended.
    ///
    /// Variables equivalent to one already present, or to an earlier one in `variables`, are
    /// dropped. The existing variable always wins.
    ///
    /// # Examples
    ///
    /// ```
    /// use uri_template::{TemplateVariable, TemplateVariables, VariableType};
    ///
    /// let variables = TemplateVariables::new([TemplateVariable::query("page")]);
    /// let variables = variables.concat([
    ///     TemplateVariable::new("page", VariableType::QueryContinuation),
    ///     TemplateVariable::query("size"),
    /// ]);
    ///
    /// assert_eq!(variables.len(), 2);
    /// assert_eq!(variables.to_string(), "{?page,size}");
    /// ```
    #[must_use]
    pub fn concat(&self, variables: impl IntoIterator<Item = TemplateVariable>) -> Self {
        let mut result = self.variables.clone();
        for candidate in variables {
            if !result.iter().any(|existing| existing.is_equivalent(&candidate)) {
                result.push(candidate);
            }
        }
        Self { variables: result }
    }

    /// Returns the variables as a slice.
    #[must_use]
    pub fn as_slice(&self) -> &[TemplateVariable] {
        &self.variables
    }

    /// Iterates over the variables in order.
    pub fn iter(&self) -> slice::Iter<'_, TemplateVariable> {
        self.variables.iter()
    }

    /// Returns the number of variables.
    #[must_use]
    pub fn len(&self) -> usize {
        self.variables.len()
    }

    /// Returns `true` if there are no variables.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.variables.is_empty()
    }

    /// Returns the variable with the given name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&TemplateVariable> {
        self.variables.iter().find(|variable| variable.name() == name)
    }

    /// Returns `true` if a variable with the given name is present.
    #[must_use]
    pub fn contains_name(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// Returns the variable names in order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.variables.iter().map(TemplateVariable::name)
    }
}

impl<'a> IntoIterator for &'a TemplateVariables {
    type Item = &'a TemplateVariable;
    type IntoIter = slice::Iter<'a, TemplateVariable>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl IntoIterator for TemplateVariables {
    type Item = TemplateVariable;
    type IntoIter = std::vec::IntoIter<TemplateVariable>;

    fn into_iter(self) -> Self::IntoIter {
        self.variables.into_iter()
    }
}

impl FromIterator<TemplateVariable> for TemplateVariables {
    fn from_iter<I: IntoIterator<Item = TemplateVariable>>(iter: I) -> Self {
        Self::new(iter)
    }
}

impl From<TemplateVariable> for TemplateVariables {
    fn from(variable: TemplateVariable) -> Self {
        Self {
            variables: vec![variable],
        }
    }
}

/// Renders the variables as the shortest sequence of expressions, one per run of combinable
/// variables: `{?page,size}{#section}`.
impl fmt::Display for TemplateVariables {
    #[cfg_attr(test, mutants::skip)] // Do not mutate display output.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut previous: Option<&TemplateVariable> = None;

        for variable in &self.variables {
            match previous {
                // Mixed query types render with the operator of the first variable.
                Some(last) if last.is_combinable(variable) => f.write_str(",")?,
                Some(_) => {
                    f.write_str("}{")?;
                    write_operator(f, variable)?;
                }
                None => {
                    f.write_str("{")?;
                    write_operator(f, variable)?;
                }
            }

            let mut spec = String::new();
            variable.write_spec(&mut spec);
            f.write_str(&spec)?;
            previous = Some(variable);
        }

        if previous.is_some() {
            f.write_str("}")?;
        }
        Ok(())
    }
}

fn write_operator(f: &mut fmt::Formatter<'_>, variable: &TemplateVariable) -> fmt::Result {
    match variable.kind().operator() {
        Some(operator) => write!(f, "{operator}"),
        None => Ok(()),
    }
}
