// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

use std::fmt;

use crate::{Parameters, TemplateVariable, TemplateVariables, VariableType};

/// A run of combinable variables that share one `{...}` expression of a template.
///
/// Members always carry the group's type, so `{?page,size}` holds two [`VariableType::Query`]
/// variables even if `size` was added as a query continuation.
///
/// Groups compare by the expression they render; variable descriptions are ignored.
///
/// # Examples
///
/// ```
/// use uri_template::{ExpandGroup, Parameters, TemplateVariable, VariableType};
///
/// let group = ExpandGroup::new(
///     VariableType::Query,
///     [TemplateVariable::query("page"), TemplateVariable::query("size")],
/// )
/// .unwrap();
///
/// assert_eq!(group.placeholder(), "{?page,size}");
/// assert_eq!(
///     group.expand(&Parameters::new().with("size", 10)).as_deref(),
///     Some("?size=10")
/// );
/// ```
#[derive(Debug, Clone, Eq)]
pub struct ExpandGroup {
    kind: VariableType,
    variables: TemplateVariables,
}

impl ExpandGroup {
    /// Creates a group of the given type.
    ///
    /// Returns `None` if `variables` is empty or contains a variable whose type does not combine
    /// with `kind`. Variables equivalent to an earlier member are dropped.
    #[must_use]
    pub fn new(kind: VariableType, variables: impl IntoIterator<Item = TemplateVariable>) -> Option<Self> {
        let variables = retype(kind, variables)?;
        if variables.is_empty() {
            return None;
        }
        Some(Self { kind, variables })
    }

    /// Returns the group type.
    #[must_use]
    pub fn kind(&self) -> VariableType {
        self.kind
    }

    /// Returns the members in expression order.
    #[must_use]
    pub fn variables(&self) -> &TemplateVariables {
        &self.variables
    }

    /// Returns `true` if variables of `other` may join this group.
    #[must_use]
    pub fn is_combinable(&self, other: VariableType) -> bool {
        self.kind.can_combine_with(other)
    }

    /// Combines two groups, keeping this group's type and members first.
    ///
    /// Members of `other` equivalent to an existing member are dropped. Returns `None` if the
    /// group types do not combine.
    #[must_use]
    pub fn merge(&self, other: &Self) -> Option<Self> {
        if !self.is_combinable(other.kind) {
            return None;
        }
        let incoming = retype(self.kind, other.variables.iter().cloned())?;
        Some(Self {
            kind: self.kind,
            variables: self.variables.concat(incoming),
        })
    }

    /// Renders the group back to template syntax, for example `{/id}` or `{?page,size*}`.
    #[must_use]
    pub fn placeholder(&self) -> String {
        render_placeholder(self.kind, self.variables.iter())
    }

    /// Expands the group against `parameters`.
    ///
    /// Returns `None` if none of the members is bound to a defined value.
    #[must_use]
    pub fn expand(&self, parameters: &Parameters) -> Option<String> {
        let pieces: Vec<_> = self
            .variables
            .iter()
            .filter_map(|variable| variable.expand(parameters))
            .collect();

        if pieces.is_empty() {
            None
        } else {
            Some(format!("{}{}", self.kind.prefix(), pieces.join(self.kind.separator())))
        }
    }

    /// Expands the bound members and keeps the unbound ones as template expressions.
    pub(crate) fn expand_partial(&self, parameters: &Parameters) -> String {
        let bound = self
            .variables
            .iter()
            .filter(|variable| parameters.contains(variable.name()))
            .count();

        if bound == 0 {
            return self.placeholder();
        }
        if bound == self.variables.len() {
            return self.expand(parameters).unwrap_or_default();
        }

        match self.kind {
            VariableType::Query | VariableType::QueryContinuation => self.expand_partial_query(parameters),
            VariableType::Dot | VariableType::PathSegment | VariableType::PathStyleParameter => {
                self.expand_partial_runs(parameters)
            }
            // Comma-joined values cannot be split into several expressions.
            VariableType::Simple | VariableType::Reserved | VariableType::Fragment => self.placeholder(),
        }
    }

    fn expand_partial_query(&self, parameters: &Parameters) -> String {
        let (bound, unbound): (Vec<_>, Vec<_>) = self
            .variables
            .iter()
            .partition(|variable| parameters.contains(variable.name()));

        let pieces: Vec<_> = bound.iter().filter_map(|variable| variable.expand(parameters)).collect();
        if pieces.is_empty() {
            return render_placeholder(self.kind, unbound.into_iter());
        }

        let mut rendered = format!("{}{}", self.kind.prefix(), pieces.join(self.kind.separator()));
        rendered.push_str(&render_placeholder(VariableType::QueryContinuation, unbound.into_iter()));
        rendered
    }

    fn expand_partial_runs(&self, parameters: &Parameters) -> String {
        let mut rendered = String::new();
        let mut pending: Vec<&TemplateVariable> = Vec::new();

        for variable in &self.variables {
            if parameters.contains(variable.name()) {
                if !pending.is_empty() {
                    rendered.push_str(&render_placeholder(self.kind, pending.drain(..)));
                }
                if let Some(piece) = variable.expand(parameters) {
                    rendered.push_str(self.kind.prefix());
                    rendered.push_str(&piece);
                }
            } else {
                pending.push(variable);
            }
        }

        if !pending.is_empty() {
            rendered.push_str(&render_placeholder(self.kind, pending.drain(..)));
        }
        rendered
    }
}

fn render_placeholder<'a>(kind: VariableType, variables: impl Iterator<Item = &'a TemplateVariable>) -> String {
    let mut placeholder = String::from("{");
    if let Some(operator) = kind.operator() {
        placeholder.push(operator);
    }
    for (index, variable) in variables.enumerate() {
        if index > 0 {
            placeholder.push(',');
        }
        variable.write_spec(&mut placeholder);
    }
    placeholder.push('}');
    placeholder
}

/// Converts members to the group type, rejecting types that do not combine with it.
fn retype(kind: VariableType, variables: impl IntoIterator<Item = TemplateVariable>) -> Option<TemplateVariables> {
    variables
        .into_iter()
        .map(|variable| kind.can_combine_with(variable.kind()).then(|| variable.with_kind(kind)))
        .collect::<Option<Vec<_>>>()
        .map(TemplateVariables::new)
}

impl PartialEq for ExpandGroup {
    fn eq(&self, other: &Self) -> bool {
        self.kind == other.kind
            && self.variables.len() == other.variables.len()
            && self.variables.iter().zip(other.variables.iter()).all(|(left, right)| {
                left.name() == right.name() && left.cardinality() == right.cardinality() && left.limit() == right.limit()
            })
    }
}

impl fmt::Display for ExpandGroup {
    #[cfg_attr(test, mutants::skip)] // Do not mutate display output.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.placeholder())
    }
}
