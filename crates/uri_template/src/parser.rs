// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! Scanner for RFC 6570 template text.
//!
//! The scanner walks the input once, normalizing literal text and turning every `{...}`
//! expression into an [`ExpandGroup`]. Positions reported in errors are byte offsets into the
//! original input.

use std::num::NonZeroUsize;
use std::ops::Range;

use crate::encoding::{encode_reserved, is_pct_triplet};
use crate::error::{Result, TemplateError};
use crate::{ExpandGroup, TemplateVariable, VariableType};

/// Largest prefix modifier RFC 6570 allows.
const MAX_PREFIX: usize = 9999;

/// The parsed form of a template.
#[derive(Debug)]
pub(crate) struct Parsed {
    /// Normalized template text.
    pub(crate) template: String,
    /// One group per expression, in template order.
    pub(crate) groups: Vec<ExpandGroup>,
    /// Byte range of each group's expression within `template`.
    pub(crate) spans: Vec<Range<usize>>,
}

pub(crate) fn parse(input: &str) -> Result<Parsed> {
    let result = scan(input);

    #[cfg(any(feature = "logs", test))]
    if let Err(error) = &result {
        tracing::event!(
            name: "uri_template.parse_failed",
            tracing::Level::DEBUG,
            uri_template.template = input,
            uri_template.position = error.position(),
            uri_template.error = %error,
        );
    }

    result
}

fn scan(input: &str) -> Result<Parsed> {
    if input.is_empty() {
        return Err(TemplateError::EmptyTemplate);
    }

    let mut template = String::with_capacity(input.len());
    let mut groups = Vec::new();
    let mut spans = Vec::new();
    let mut cursor = 0;

    while let Some(found) = input[cursor..].find(['{', '}']) {
        let open = cursor + found;
        if input.as_bytes()[open] == b'}' {
            return Err(TemplateError::UnexpectedClosingBrace { position: open });
        }

        template.push_str(&encode_reserved(&input[cursor..open]));

        let close = match input[open + 1..].find(['{', '}']) {
            Some(offset) if input.as_bytes()[open + 1 + offset] == b'}' => open + 1 + offset,
            Some(offset) => {
                return Err(TemplateError::UnterminatedExpression {
                    position: open,
                    fragment: input[open..=open + offset].to_owned(),
                });
            }
            None => {
                return Err(TemplateError::UnterminatedExpression {
                    position: open,
                    fragment: input[open..].to_owned(),
                });
            }
        };

        let group = parse_expression(&input[open + 1..close], open + 1)?;
        let start = template.len();
        template.push_str(&group.placeholder());
        spans.push(start..template.len());
        groups.push(group);

        cursor = close + 1;
    }

    template.push_str(&encode_reserved(&input[cursor..]));

    Ok(Parsed { template, groups, spans })
}

/// Returns `true` if `input` contains at least one well-formed expression.
pub(crate) fn contains_expression(input: &str) -> bool {
    let mut cursor = 0;
    while let Some(found) = input[cursor..].find('{') {
        let open = cursor + found;
        let Some(length) = input[open + 1..].find(['{', '}']) else {
            return false;
        };
        let close = open + 1 + length;
        if input.as_bytes()[close] == b'}' && parse_expression(&input[open + 1..close], open + 1).is_ok() {
            return true;
        }
        cursor = close;
    }
    false
}

/// Parses the text between the braces of one expression. `position` is the offset of `body`.
fn parse_expression(body: &str, position: usize) -> Result<ExpandGroup> {
    let Some(first) = body.chars().next() else {
        return Err(TemplateError::InvalidVariableName {
            position,
            name: String::new(),
        });
    };

    let (kind, list, mut offset) = if is_name_char(first) {
        (VariableType::Simple, body, position)
    } else {
        let kind = VariableType::from_operator(Some(first)).map_err(|error| TemplateError::UnknownOperator {
            position,
            operator: error.operator,
        })?;
        (kind, &body[first.len_utf8()..], position + first.len_utf8())
    };

    let mut variables = Vec::new();
    for spec in list.split(',') {
        variables.push(parse_variable(spec, kind, offset)?);
        offset += spec.len() + 1;
    }

    ExpandGroup::new(kind, variables).ok_or_else(|| TemplateError::InvalidVariableName {
        position,
        name: body.to_owned(),
    })
}

/// Parses `name[:prefix][*]`.
fn parse_variable(spec: &str, kind: VariableType, position: usize) -> Result<TemplateVariable> {
    let (name, prefix, composite) = match spec.split_once(':') {
        Some((name, prefix)) => (name, Some(prefix), false),
        None => match spec.strip_suffix('*') {
            Some(name) => (name, None, true),
            None => (spec, None, false),
        },
    };

    if !is_valid_name(name) {
        return Err(TemplateError::InvalidVariableName {
            position,
            name: spec.to_owned(),
        });
    }

    let mut variable = TemplateVariable::new(name, kind);
    if composite {
        variable = variable.composite();
    }
    if let Some(prefix) = prefix {
        let limit = parse_prefix(prefix).ok_or_else(|| TemplateError::InvalidPrefix {
            position,
            name: name.to_owned(),
            prefix: prefix.to_owned(),
        })?;
        variable = variable.with_limit(limit);
    }

    Ok(variable)
}

fn parse_prefix(prefix: &str) -> Option<NonZeroUsize> {
    if prefix.is_empty() || prefix.len() > 4 || !prefix.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    prefix
        .parse::<usize>()
        .ok()
        .filter(|limit| *limit <= MAX_PREFIX)
        .and_then(NonZeroUsize::new)
}

fn is_name_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_' || c == '%'
}

/// `varname = varchar *( ["."] varchar )`, where `varchar` includes `pct-encoded`.
pub(crate) fn is_valid_name(name: &str) -> bool {
    if name.is_empty() || name.starts_with('.') || name.ends_with('.') || name.contains("..") {
        return false;
    }

    let mut rest = name;
    while let Some(c) = rest.chars().next() {
        if c == '%' {
            if !is_pct_triplet(rest) {
                return false;
            }
            rest = &rest[3..];
        } else if is_name_char(c) || c == '.' {
            rest = &rest[c.len_utf8()..];
        } else {
            return false;
        }
    }
    true
}

#[cfg(test)]
mod tests {
    use insta::assert_snapshot;

    use super::*;

    fn placeholders(input: &str) -> Vec<String> {
        parse(input).unwrap().groups.iter().map(ExpandGroup::placeholder).collect()
    }

    #[test]
    fn literal_only() {
        let parsed = parse("/fixed/path").unwrap();
        assert_eq!(parsed.template, "/fixed/path");
        assert!(parsed.groups.is_empty());
        assert!(parsed.spans.is_empty());
    }

    #[test]
    fn one_group_per_expression() {
        assert_eq!(
            placeholders("/users{/id}{?page,size}{#section}"),
            ["{/id}", "{?page,size}", "{#section}"]
        );
    }

    #[test]
    fn all_operators() {
        let parsed = parse("{a}{+b}{.c}{/d}{;e}{?f}{&g}{#h}").unwrap();
        let kinds: Vec<_> = parsed.groups.iter().map(ExpandGroup::kind).collect();
        assert_eq!(kinds, VariableType::ALL);
    }

    #[test]
    fn modifiers() {
        let parsed = parse("{/path:6,rest*}").unwrap();
        let variables = parsed.groups[0].variables();
        assert_eq!(variables.get("path").and_then(TemplateVariable::limit), NonZeroUsize::new(6));
        assert!(variables.get("rest").is_some_and(TemplateVariable::is_composite));
    }

    #[test]
    fn spans_cover_expressions() {
        let parsed = parse("/a{b}/c{?d}").unwrap();
        let texts: Vec<_> = parsed.spans.iter().map(|span| &parsed.template[span.clone()]).collect();
        assert_eq!(texts, ["{b}", "{?d}"]);
    }

    #[test]
    fn literal_text_is_normalized_once() {
        assert_eq!(parse("/a b/{c}").unwrap().template, "/a%20b/{c}");
        assert_eq!(parse("/a%20b/{c}").unwrap().template, "/a%20b/{c}");
        assert_eq!(parse("/x?q=Revo+Tour").unwrap().template, "/x?q=Revo+Tour");
    }

    #[test]
    fn names_with_dots_and_triplets() {
        assert_eq!(placeholders("{a.b,c%20d,_x}"), ["{a.b,c%20d,_x}"]);
    }

    #[test]
    fn empty_template() {
        assert_eq!(parse("").unwrap_err(), TemplateError::EmptyTemplate);
    }

    #[test]
    fn unterminated_expression() {
        let error = parse("/users{?page").unwrap_err();
        assert_snapshot!(error.to_string(), @"unterminated expression '{?page' at index 6");

        let error = parse("/a{b{c}").unwrap_err();
        assert_eq!(
            error,
            TemplateError::UnterminatedExpression {
                position: 2,
                fragment: "{b".to_string()
            }
        );
    }

    #[test]
    fn stray_closing_brace() {
        assert_eq!(
            parse("/a}b").unwrap_err(),
            TemplateError::UnexpectedClosingBrace { position: 2 }
        );
    }

    #[test]
    fn unknown_operator() {
        let error = parse("/a{!b}").unwrap_err();
        assert_eq!(error, TemplateError::UnknownOperator { position: 3, operator: '!' });

        assert!(matches!(
            parse("{=x}").unwrap_err(),
            TemplateError::UnknownOperator { operator: '=', .. }
        ));
    }

    #[test]
    fn invalid_names() {
        for input in ["{}", "{?}", "{a,}", "{.a.}", "{a..b}", "{a-b}", "{a%2}", "{?a b}"] {
            let error = parse(input).unwrap_err();
            assert!(
                matches!(error, TemplateError::InvalidVariableName { .. }),
                "{input}: {error:?}"
            );
        }
    }

    #[test]
    fn invalid_name_reports_variable_offset() {
        let error = parse("/x{?a,b-c}").unwrap_err();
        assert_snapshot!(error.to_string(), @"invalid variable name 'b-c' at index 6");
    }

    #[test]
    fn invalid_prefixes() {
        for input in ["{a:0}", "{a:10000}", "{a:}", "{a:x}", "{a:3*}", "{a:-1}"] {
            let error = parse(input).unwrap_err();
            assert!(matches!(error, TemplateError::InvalidPrefix { .. }), "{input}: {error:?}");
        }
        assert!(parse("{a:9999}").is_ok());
    }

    #[test]
    fn detects_expressions() {
        assert!(contains_expression("/a{b}"));
        assert!(contains_expression("{!x}{y}"));
        assert!(!contains_expression("/a/b"));
        assert!(!contains_expression("/a{b"));
        assert!(!contains_expression("/a{}"));
        assert!(!contains_expression("/a{!b}"));
    }
}
