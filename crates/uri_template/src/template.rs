// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

use std::cmp::Ordering;
use std::collections::HashSet;
use std::fmt;
use std::ops::Range;
use std::str::FromStr;

use crate::error::{Result, TemplateError};
use crate::parser::{self, Parsed};
use crate::{ExpandGroup, Parameters, TemplateVariable, TemplateVariables, Value, VariableType};

/// A parsed RFC 6570 URI template.
///
/// A template is literal text interleaved with `{...}` expressions. Each expression is an
/// [`ExpandGroup`] of variables sharing one [`VariableType`]. Templates are immutable;
/// [`augment`](Self::augment) returns a new template.
///
/// Literal text is normalized while parsing: characters that may not appear in a URI are
/// percent-encoded, existing `%XX` triplets are kept as they are.
///
/// # Examples
///
/// ```
/// use uri_template::{Parameters, TemplateVariable, UriTemplate};
///
/// let template = UriTemplate::parse("/users{/id}")?
///     .augment([TemplateVariable::query("page"), TemplateVariable::query("size")])?;
/// assert_eq!(template.as_str(), "/users{/id}{?page,size}");
///
/// let parameters = Parameters::new().with("id", 42).with("size", 20);
/// assert_eq!(template.expand(&parameters), "/users/42?size=20");
/// # Ok::<(), uri_template::TemplateError>(())
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(try_from = "String", into = "String"))]
pub struct UriTemplate {
    template: String,
    groups: Vec<ExpandGroup>,
    spans: Vec<Range<usize>>,
    variables: TemplateVariables,
}

impl UriTemplate {
    /// Parses template text.
    ///
    /// # Errors
    ///
    /// Returns a syntax [`TemplateError`] if the text is empty, contains an unterminated or
    /// malformed expression, or a `}` outside of an expression.
    pub fn parse(template: &str) -> Result<Self> {
        parser::parse(template).map(Self::from_parsed)
    }

    /// Returns `true` if `candidate` contains at least one well-formed expression.
    ///
    /// ```
    /// use uri_template::UriTemplate;
    ///
    /// assert!(UriTemplate::is_template("/users{?page}"));
    /// assert!(!UriTemplate::is_template("/users"));
    /// assert!(!UriTemplate::is_template("/users{?page"));
    /// ```
    #[must_use]
    pub fn is_template(candidate: &str) -> bool {
        parser::contains_expression(candidate)
    }

    fn from_parsed(parsed: Parsed) -> Self {
        Self::from_parts(parsed.template, parsed.groups, parsed.spans)
    }

    fn from_parts(template: String, groups: Vec<ExpandGroup>, spans: Vec<Range<usize>>) -> Self {
        let variables = TemplateVariables::NONE.concat(groups.iter().flat_map(|group| group.variables().iter().cloned()));
        Self {
            template,
            groups,
            spans,
            variables,
        }
    }

    /// Returns the normalized template text.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.template
    }

    /// Returns the literal text in front of the first expression.
    ///
    /// ```
    /// use uri_template::UriTemplate;
    ///
    /// let template = UriTemplate::parse("/users/{id}{?page}")?;
    /// assert_eq!(template.base(), "/users/");
    /// # Ok::<(), uri_template::TemplateError>(())
    /// ```
    #[must_use]
    pub fn base(&self) -> &str {
        self.spans.first().map_or(self.template.as_str(), |span| &self.template[..span.start])
    }

    /// Returns the expressions in template order.
    #[must_use]
    pub fn groups(&self) -> &[ExpandGroup] {
        &self.groups
    }

    /// Returns all variables of the template in order of appearance.
    #[must_use]
    pub fn variables(&self) -> &TemplateVariables {
        &self.variables
    }

    /// Returns the variable names in order of appearance.
    #[must_use]
    pub fn variable_names(&self) -> Vec<&str> {
        self.variables.names().collect()
    }

    /// Returns `true` if the template has no expressions.
    #[must_use]
    pub fn is_literal(&self) -> bool {
        self.groups.is_empty()
    }

    /// Adds variables to the template.
    ///
    /// Variables already present, query variables already given as literal query parameters and
    /// fragment variables of a template with a literal fragment are dropped. New query variables
    /// become query continuations when the template has a literal query. Remaining variables join
    /// the last expression they combine with; otherwise a new expression is inserted where its
    /// URI component belongs, in front of the first later component.
    ///
    /// # Errors
    ///
    /// Returns [`TemplateError::IllegalVariableName`] if a variable name is not an RFC 6570
    /// `varname`, and [`TemplateError::ConflictingVariable`] if a name is already used, in the
    /// template or earlier in `variables`, by a variable of a type it does not combine with.
    ///
    /// # Examples
    ///
    /// ```
    /// use uri_template::{Parameters, TemplateVariable, UriTemplate};
    ///
    /// let template = UriTemplate::parse("/x?eventName=Revo+Tour")?
    ///     .augment([TemplateVariable::query("location")])?;
    /// assert_eq!(template.as_str(), "/x?eventName=Revo+Tour{&location}");
    ///
    /// let expanded = template.expand(&Parameters::new().with("location", "Schlachthof"));
    /// assert_eq!(expanded, "/x?eventName=Revo+Tour&location=Schlachthof");
    /// # Ok::<(), uri_template::TemplateError>(())
    /// ```
    pub fn augment(&self, variables: impl IntoIterator<Item = TemplateVariable>) -> Result<Self> {
        let literal = LiteralParts::of(self);
        let proposed = TemplateVariables::new(variables);

        let mut accepted: Vec<TemplateVariable> = Vec::new();
        for variable in &proposed {
            variable.check_name()?;
            if variable.is_request_parameter() && literal.query_names.contains(variable.name()) {
                continue;
            }
            if variable.is_fragment() && literal.fragment.is_some() {
                continue;
            }
            if self.variables.iter().any(|existing| existing.is_equivalent(variable)) {
                continue;
            }
            if let Some(existing) = self.variables.get(variable.name()) {
                return Err(TemplateError::ConflictingVariable {
                    name: variable.name().to_owned(),
                    existing: existing.kind(),
                    proposed: variable.kind(),
                });
            }
            if let Some(earlier) = accepted.iter().find(|earlier| earlier.name() == variable.name()) {
                return Err(TemplateError::ConflictingVariable {
                    name: variable.name().to_owned(),
                    existing: earlier.kind(),
                    proposed: variable.kind(),
                });
            }

            if variable.kind() == VariableType::Query && literal.query.is_some() {
                accepted.push(variable.with_kind(VariableType::QueryContinuation));
            } else {
                accepted.push(variable.clone());
            }
        }

        let mut template = self.clone();
        for group in group_by_kind(&accepted) {
            template = template.add_group(&group);
        }

        #[cfg(any(feature = "logs", test))]
        tracing::event!(
            name: "uri_template.augment",
            tracing::Level::DEBUG,
            uri_template.template = %template.template,
            uri_template.added = accepted.len(),
            uri_template.dropped = proposed.len() - accepted.len(),
        );

        Ok(template)
    }

    /// Adds a single variable, see [`augment`](Self::augment).
    ///
    /// # Errors
    ///
    /// Returns [`TemplateError::IllegalVariableName`] if the name is not an RFC 6570 `varname`,
    /// and [`TemplateError::ConflictingVariable`] if the name is already used by a variable of a
    /// type it does not combine with.
    pub fn augment_variable(&self, variable: TemplateVariable) -> Result<Self> {
        self.augment([variable])
    }

    fn add_group(&self, group: &ExpandGroup) -> Self {
        let combinable = self.groups.iter().rposition(|existing| existing.is_combinable(group.kind()));

        if let Some(index) = combinable
            && let Some(merged) = self.groups[index].merge(group)
        {
            let (template, spans) = splice(&self.template, &self.spans, index, &merged.placeholder());
            let mut groups = self.groups.clone();
            groups[index] = merged;
            return Self::from_parts(template, groups, spans);
        }

        let literal = LiteralParts::of(self);
        let rank = group.kind().rank();
        let mut position = self.template.len();
        if let Some(index) = self.groups.iter().position(|existing| existing.kind().rank() > rank) {
            position = position.min(self.spans[index].start);
        }
        if let Some(fragment) = literal.fragment.filter(|_| rank < VariableType::Fragment.rank()) {
            position = position.min(fragment);
        }
        if let Some(query) = literal.query.filter(|_| rank < VariableType::Query.rank()) {
            position = position.min(query);
        }

        let index = self.spans.iter().take_while(|span| span.start < position).count();
        let mut groups = self.groups.clone();
        groups.insert(index, group.clone());
        let mut spans = self.spans.clone();
        spans.insert(index, position..position);

        let (template, spans) = splice(&self.template, &spans, index, &group.placeholder());
        Self::from_parts(template, groups, spans)
    }

    /// Expands the template, dropping expressions without bound values.
    ///
    /// ```
    /// use uri_template::{Parameters, UriTemplate};
    ///
    /// let template = UriTemplate::parse("/x{?a,b}")?;
    /// let parameters = Parameters::new().with("b", 2).with("a", 1);
    /// assert_eq!(template.expand(&parameters), "/x?a=1&b=2");
    /// # Ok::<(), uri_template::TemplateError>(())
    /// ```
    #[must_use]
    pub fn expand(&self, parameters: &Parameters) -> String {
        if self.groups.is_empty() {
            return self.template.clone();
        }
        self.render(|group| group.expand(parameters).unwrap_or_default())
    }

    /// Expands bound variables and keeps the unbound ones as expressions, so the result is again
    /// a template.
    ///
    /// ```
    /// use uri_template::{Parameters, UriTemplate};
    ///
    /// let template = UriTemplate::parse("/events{/city}/concerts{?eventName,location}")?;
    /// let partial = template.expand_partial(&Parameters::new().with("location", "Schlachthof"));
    /// assert_eq!(partial, "/events{/city}/concerts?location=Schlachthof{&eventName}");
    /// # Ok::<(), uri_template::TemplateError>(())
    /// ```
    #[must_use]
    pub fn expand_partial(&self, parameters: &Parameters) -> String {
        if self.groups.is_empty() {
            return self.template.clone();
        }
        self.render(|group| group.expand_partial(parameters))
    }

    /// Expands the template binding `values` to the variables in order of appearance.
    ///
    /// Surplus values are ignored; variables without a value stay unbound.
    ///
    /// ```
    /// use uri_template::UriTemplate;
    ///
    /// let template = UriTemplate::parse("/users/{id}/posts{/post}")?;
    /// assert_eq!(template.expand_ordered(["7", "hello"]), "/users/7/posts/hello");
    /// # Ok::<(), uri_template::TemplateError>(())
    /// ```
    #[must_use]
    pub fn expand_ordered<I>(&self, values: I) -> String
    where
        I: IntoIterator,
        I::Item: Into<Value>,
    {
        let parameters = self.variables.names().zip(values).collect::<Parameters>();
        self.expand(&parameters)
    }

    fn render(&self, mut expand: impl FnMut(&ExpandGroup) -> String) -> String {
        let mut rendered = String::with_capacity(self.template.len());
        let mut cursor = 0;
        for (group, span) in self.groups.iter().zip(&self.spans) {
            rendered.push_str(&self.template[cursor..span.start]);
            rendered.push_str(&expand(group));
            cursor = span.end;
        }
        rendered.push_str(&self.template[cursor..]);
        rendered
    }

    /// Literal text ranges between expressions.
    fn literal_ranges(&self) -> impl Iterator<Item = Range<usize>> + '_ {
        let starts = std::iter::once(0).chain(self.spans.iter().map(|span| span.end));
        let ends = self.spans.iter().map(|span| span.start).chain(std::iter::once(self.template.len()));
        starts.zip(ends).map(|(start, end)| start..end)
    }
}

/// Replaces the text of `spans[index]` with `placeholder` and moves later spans accordingly.
fn splice(template: &str, spans: &[Range<usize>], index: usize, placeholder: &str) -> (String, Vec<Range<usize>>) {
    let replaced = spans[index].clone();
    let mut text = String::with_capacity(template.len() + placeholder.len());
    text.push_str(&template[..replaced.start]);
    text.push_str(placeholder);
    text.push_str(&template[replaced.end..]);

    let end = replaced.start + placeholder.len();
    let spans = spans
        .iter()
        .enumerate()
        .map(|(current, span)| match current.cmp(&index) {
            Ordering::Less => span.clone(),
            Ordering::Equal => replaced.start..end,
            Ordering::Greater => span.start - replaced.end + end..span.end - replaced.end + end,
        })
        .collect();

    (text, spans)
}

/// Query and fragment information found in the literal text of a template.
#[derive(Debug, Default)]
struct LiteralParts {
    /// Offset of the literal `?` starting the query.
    query: Option<usize>,
    /// Offset of the literal `#` starting the fragment.
    fragment: Option<usize>,
    /// Names of the literal query parameters.
    query_names: HashSet<String>,
}

impl LiteralParts {
    fn of(template: &UriTemplate) -> Self {
        let mut parts = Self::default();
        let mut query_text = String::new();

        'ranges: for range in template.literal_ranges() {
            if parts.query.is_some() {
                // Expressions separate literal parameters.
                query_text.push('&');
            }
            for (offset, c) in template.template[range.clone()].char_indices() {
                let position = range.start + offset;
                match c {
                    '#' => {
                        parts.fragment = Some(position);
                        break 'ranges;
                    }
                    '?' if parts.query.is_none() => parts.query = Some(position),
                    _ if parts.query.is_some() => query_text.push(c),
                    _ => {}
                }
            }
        }

        parts.query_names = query_text
            .split('&')
            .filter_map(|pair| pair.split('=').next())
            .filter(|name| !name.is_empty())
            .map(str::to_owned)
            .collect();
        parts
    }
}

/// Splits variables into groups of equal type, in order of first appearance.
fn group_by_kind(variables: &[TemplateVariable]) -> Vec<ExpandGroup> {
    let mut kinds: Vec<VariableType> = Vec::new();
    for variable in variables {
        if !kinds.contains(&variable.kind()) {
            kinds.push(variable.kind());
        }
    }

    kinds
        .into_iter()
        .filter_map(|kind| {
            ExpandGroup::new(
                kind,
                variables.iter().filter(|variable| variable.kind() == kind).cloned(),
            )
        })
        .collect()
}

impl fmt::Display for UriTemplate {
    #[cfg_attr(test, mutants::skip)] // Do not mutate display output.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.template)
    }
}

impl AsRef<str> for UriTemplate {
    fn as_ref(&self) -> &str {
        &self.template
    }
}

impl FromStr for UriTemplate {
    type Err = TemplateError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl TryFrom<&str> for UriTemplate {
    type Error = TemplateError;

    fn try_from(value: &str) -> Result<Self> {
        Self::parse(value)
    }
}

impl TryFrom<String> for UriTemplate {
    type Error = TemplateError;

    fn try_from(value: String) -> Result<Self> {
        Self::parse(&value)
    }
}

impl From<UriTemplate> for String {
    fn from(template: UriTemplate) -> Self {
        template.template
    }
}

#[cfg(test)]
mod tests {
    use insta::assert_snapshot;

    use super::*;

    fn template(text: &str) -> UriTemplate {
        UriTemplate::parse(text).unwrap()
    }

    #[test]
    fn assert_types() {
        static_assertions::assert_impl_all!(UriTemplate: Send, Sync, Clone, FromStr);
    }

    #[test]
    fn introspection() {
        let template = template("/users/{id}{?page,size}{#section}");
        assert_eq!(template.base(), "/users/");
        assert_eq!(template.variable_names(), ["id", "page", "size", "section"]);
        assert_eq!(template.groups().len(), 3);
        assert!(!template.is_literal());
        assert_eq!(template.to_string(), "/users/{id}{?page,size}{#section}");
    }

    #[test]
    fn base_of_literal_template_is_whole_text() {
        let template = template("/fixed/path");
        assert_eq!(template.base(), "/fixed/path");
        assert!(template.is_literal());
        assert!(template.variable_names().is_empty());
    }

    #[test]
    fn literal_template_expands_unchanged() {
        let template = template("/fixed/path");
        assert_eq!(template.expand(&Parameters::new()), "/fixed/path");
        assert_eq!(template.expand(&Parameters::new().with("x", 1)), "/fixed/path");
    }

    #[test]
    fn unbound_expressions_disappear() {
        let template = template("/users{/id}/posts{?page}{#top}");
        assert_eq!(template.expand(&Parameters::new()), "/users/posts");
    }

    #[test]
    fn literal_parts() {
        let parts = LiteralParts::of(&template("/x?a=1&b{?c}&d=2#frag"));
        assert_eq!(parts.query, Some(2));
        assert_eq!(parts.fragment, Some(16));
        let mut names: Vec<_> = parts.query_names.into_iter().collect();
        names.sort();
        assert_eq!(names, ["a", "b", "d"]);
    }

    #[test]
    fn augment_creates_query_group() {
        let augmented = template("/users").augment([TemplateVariable::query("page")]).unwrap();
        assert_eq!(augmented.as_str(), "/users{?page}");
    }

    #[test]
    fn augment_merges_into_last_combinable_group() {
        let augmented = template("/users{?page}")
            .augment([
                TemplateVariable::query("size"),
                TemplateVariable::new("sort", VariableType::QueryContinuation),
            ])
            .unwrap();
        assert_eq!(augmented.as_str(), "/users{?page,size,sort}");
    }

    #[test]
    fn augment_inserts_by_component_order() {
        let augmented = template("/users{?page}{#section}")
            .augment([TemplateVariable::path_segment("id")])
            .unwrap();
        assert_eq!(augmented.as_str(), "/users{/id}{?page}{#section}");

        let augmented = template("/users{/id}{#section}")
            .augment([TemplateVariable::query("page")])
            .unwrap();
        assert_eq!(augmented.as_str(), "/users{/id}{?page}{#section}");
    }

    #[test]
    fn augment_respects_literal_query_and_fragment() {
        let augmented = template("/users?active=true#top")
            .augment([TemplateVariable::path_segment("id"), TemplateVariable::query("page")])
            .unwrap();
        assert_eq!(augmented.as_str(), "/users{/id}?active=true{&page}#top");
    }

    #[test]
    fn augment_drops_satisfied_variables() {
        let original = template("/users{/id}?page=1#top");
        let augmented = original
            .augment([
                TemplateVariable::query("page"),
                TemplateVariable::fragment("section"),
                TemplateVariable::path_segment("id"),
            ])
            .unwrap();
        assert_eq!(augmented, original);
    }

    #[test]
    fn augment_rejects_conflicting_type() {
        let error = template("/users{/id}").augment([TemplateVariable::query("id")]).unwrap_err();
        assert_snapshot!(
            error.to_string(),
            @"template variable 'id' is already declared as 'path-segment' and cannot be redeclared as 'query'"
        );
    }

    #[test]
    fn augment_rejects_conflicts_within_one_call() {
        let error = template("/users")
            .augment([TemplateVariable::path_segment("id"), TemplateVariable::query("id")])
            .unwrap_err();
        assert_eq!(
            error,
            TemplateError::ConflictingVariable {
                name: "id".to_string(),
                existing: VariableType::PathSegment,
                proposed: VariableType::Query,
            }
        );
    }

    #[test]
    fn augment_rejects_names_that_cannot_be_written() {
        for name in ["", "first name", "a,b", "a}{b"] {
            let error = template("/users").augment([TemplateVariable::query(name)]).unwrap_err();
            assert_eq!(error, TemplateError::IllegalVariableName { name: name.to_owned() });
            assert!(error.is_illegal_usage());
        }
    }

    #[test]
    fn augment_keeps_descriptions() {
        let augmented = template("/users")
            .augment_variable(TemplateVariable::query("page").with_description("The page"))
            .unwrap();
        assert_eq!(augmented.variables().get("page").map(TemplateVariable::description), Some("The page"));
    }

    #[test]
    fn augment_updates_spans() {
        let augmented = template("/a{/b}/c{?d}")
            .augment([TemplateVariable::path_segment("e"), TemplateVariable::query("f")])
            .unwrap();
        assert_eq!(augmented.as_str(), "/a{/b,e}/c{?d,f}");
        assert_eq!(
            augmented.expand(&Parameters::from([("b", "1"), ("d", "2"), ("e", "3"), ("f", "4")])),
            "/a/1/3/c?d=2&f=4"
        );
    }

    #[test]
    fn augment_without_variables_is_identity() {
        let original = template("/a{?b}");
        assert_eq!(original.augment([]).unwrap(), original);
    }

    #[test]
    fn expand_ordered_binds_by_position() {
        let template = template("{a}/{b}{?c}");
        assert_eq!(template.expand_ordered(["1", "2"]), "1/2");
        assert_eq!(template.expand_ordered([1, 2, 3, 4]), "1/2?c=3");
    }

    #[test]
    fn parse_failure_is_reported() {
        assert!(matches!(
            UriTemplate::from_str("{a"),
            Err(TemplateError::UnterminatedExpression { position: 0, .. })
        ));
        assert!(UriTemplate::try_from(String::from("/ok")).is_ok());
    }
}
