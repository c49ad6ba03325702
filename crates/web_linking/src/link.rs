// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

use std::fmt;

use crate::LinkValueError;

/// A single link parsed from, or rendered to, a `Link` header field.
///
/// Each value holds exactly one relation type. A link-value such as
/// `<https://example.com/>;rel="next last"` produces two `LinkValue`s sharing the target and
/// attributes.
///
/// Attribute names are stored in ASCII lowercase, as RFC 8288 treats them case-insensitively.
/// The `rel` attribute is exposed through [`rel`](Self::rel) and never appears among
/// [`attributes`](Self::attributes).
///
/// The builders refuse targets containing `>`, relation types that are empty or contain
/// whitespace, and attribute names that are not RFC 7230 tokens, so every `LinkValue` renders to
/// a link-value that parses back to an equal value.
///
/// # Examples
///
/// ```
/// use web_linking::LinkValue;
///
/// let link = LinkValue::new("https://example.com/?page=2", "next")?.with_attribute("title", "Page \"2\"")?;
/// assert_eq!(link.title(), Some("Page \"2\""));
/// assert_eq!(
///     link.to_string(),
///     r#"<https://example.com/?page=2>;rel="next";title="Page \"2\"""#
/// );
/// # Ok::<(), web_linking::LinkValueError>(())
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(try_from = "LinkRecord"))]
pub struct LinkValue {
    url: String,
    rel: String,
    #[cfg_attr(feature = "serde", serde(skip_serializing_if = "Vec::is_empty"))]
    attributes: Vec<(String, String)>,
}

impl LinkValue {
    /// Creates a link without attributes.
    ///
    /// # Errors
    ///
    /// Returns [`LinkValueError::InvalidTarget`] if `url` contains `>` and
    /// [`LinkValueError::InvalidRelation`] if `rel` is empty or contains whitespace.
    pub fn new(url: impl Into<String>, rel: impl Into<String>) -> Result<Self, LinkValueError> {
        let url = url.into();
        if url.contains('>') {
            return Err(LinkValueError::InvalidTarget { url });
        }
        Ok(Self {
            url,
            rel: check_rel(rel.into())?,
            attributes: Vec::new(),
        })
    }

    pub(crate) fn from_parts(url: String, rel: String, attributes: Vec<(String, String)>) -> Self {
        Self { url, rel, attributes }
    }

    /// Returns a copy with the attribute set, replacing an existing value of the same name.
    ///
    /// Setting `rel` replaces the relation type. Values may contain any character; they are
    /// quoted and escaped when rendered.
    ///
    /// # Errors
    ///
    /// Returns [`LinkValueError::InvalidAttributeName`] if `name` is not an RFC 7230 token, and
    /// [`LinkValueError::InvalidRelation`] if `name` is `rel` and `value` is not a single
    /// relation type.
    pub fn with_attribute(mut self, name: impl AsRef<str>, value: impl Into<String>) -> Result<Self, LinkValueError> {
        let name = name.as_ref();
        if !is_token(name) {
            return Err(LinkValueError::InvalidAttributeName { name: name.to_owned() });
        }
        let name = name.to_ascii_lowercase();
        let value = value.into();

        if name == "rel" {
            self.rel = check_rel(value)?;
        } else if let Some(existing) = self.attributes.iter_mut().find(|(key, _)| *key == name) {
            existing.1 = value;
        } else {
            self.attributes.push((name, value));
        }
        Ok(self)
    }

    /// Returns a copy with a different relation type.
    ///
    /// # Errors
    ///
    /// Returns [`LinkValueError::InvalidRelation`] if `rel` is empty or contains whitespace.
    pub fn with_rel(self, rel: impl Into<String>) -> Result<Self, LinkValueError> {
        Ok(Self {
            rel: check_rel(rel.into())?,
            ..self
        })
    }

    /// The target URI, exactly as it appeared between `<` and `>`.
    #[must_use]
    pub fn url(&self) -> &str {
        &self.url
    }

    /// The relation type.
    #[must_use]
    pub fn rel(&self) -> &str {
        &self.rel
    }

    /// Returns the value of the attribute `name`, compared case-insensitively.
    #[must_use]
    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }

    /// Iterates over the target attributes other than `rel`, in header order.
    pub fn attributes(&self) -> impl Iterator<Item = (&str, &str)> {
        self.attributes.iter().map(|(key, value)| (key.as_str(), value.as_str()))
    }

    /// The `hreflang` attribute.
    #[must_use]
    pub fn hreflang(&self) -> Option<&str> {
        self.attribute("hreflang")
    }

    /// The `media` attribute.
    #[must_use]
    pub fn media(&self) -> Option<&str> {
        self.attribute("media")
    }

    /// The `title` attribute.
    #[must_use]
    pub fn title(&self) -> Option<&str> {
        self.attribute("title")
    }

    /// The `type` attribute, the media type hint of the target.
    #[must_use]
    pub fn media_type(&self) -> Option<&str> {
        self.attribute("type")
    }

    /// The `deprecation` attribute.
    #[must_use]
    pub fn deprecation(&self) -> Option<&str> {
        self.attribute("deprecation")
    }

    /// The `profile` attribute.
    #[must_use]
    pub fn profile(&self) -> Option<&str> {
        self.attribute("profile")
    }

    /// The `name` attribute.
    #[must_use]
    pub fn name(&self) -> Option<&str> {
        self.attribute("name")
    }
}

fn check_rel(rel: String) -> Result<String, LinkValueError> {
    if rel.is_empty() || rel.contains(char::is_whitespace) {
        Err(LinkValueError::InvalidRelation { rel })
    } else {
        Ok(rel)
    }
}

/// `token = 1*tchar`, RFC 7230 section 3.2.6.
fn is_token(name: &str) -> bool {
    !name.is_empty()
        && name
            .bytes()
            .all(|b| b.is_ascii_alphanumeric() || b"!#$%&'*+-.^_`|~".contains(&b))
}

/// Deserialized form of a [`LinkValue`], checked with the same rules as the builders.
#[cfg(feature = "serde")]
#[derive(serde::Deserialize)]
struct LinkRecord {
    url: String,
    rel: String,
    #[serde(default)]
    attributes: Vec<(String, String)>,
}

#[cfg(feature = "serde")]
impl TryFrom<LinkRecord> for LinkValue {
    type Error = LinkValueError;

    fn try_from(record: LinkRecord) -> Result<Self, LinkValueError> {
        record
            .attributes
            .into_iter()
            .try_fold(Self::new(record.url, record.rel)?, |link, (name, value)| {
                link.with_attribute(name, value)
            })
    }
}

/// Renders the link as a header link-value, quoting every attribute value.
impl fmt::Display for LinkValue {
    #[cfg_attr(test, mutants::skip)] // Do not mutate display output.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<{}>;rel=", self.url)?;
        write_quoted(f, &self.rel)?;
        for (key, value) in &self.attributes {
            write!(f, ";{key}=")?;
            write_quoted(f, value)?;
        }
        Ok(())
    }
}

/// Writes `value` as an RFC 7230 quoted-string.
fn write_quoted(f: &mut fmt::Formatter<'_>, value: &str) -> fmt::Result {
    f.write_str("\"")?;
    for c in value.chars() {
        if matches!(c, '"' | '\\') {
            f.write_str("\\")?;
        }
        write!(f, "{c}")?;
    }
    f.write_str("\"")
}

/// Renders links as a single `Link` header field value.
///
/// ```
/// use web_linking::{LinkValue, format_links};
///
/// let links = [LinkValue::new("/prev", "prev")?, LinkValue::new("/next", "next")?];
/// assert_eq!(format_links(&links), r#"</prev>;rel="prev", </next>;rel="next""#);
/// # Ok::<(), web_linking::LinkValueError>(())
/// ```
#[must_use]
pub fn format_links<'a>(links: impl IntoIterator<Item = &'a LinkValue>) -> String {
    links.into_iter().map(ToString::to_string).collect::<Vec<_>>().join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn link(url: &str, rel: &str) -> LinkValue {
        LinkValue::new(url, rel).unwrap()
    }

    #[test]
    fn assert_types() {
        static_assertions::assert_impl_all!(LinkValue: Send, Sync, Clone);
    }

    #[test]
    fn well_known_attributes() {
        let link = [
            ("hreflang", "de"),
            ("media", "print"),
            ("title", "Druck"),
            ("type", "text/html"),
            ("deprecation", "https://example.com/deprecated"),
            ("profile", "https://example.com/profile"),
            ("name", "print"),
        ]
        .into_iter()
        .try_fold(link("/a", "alternate"), |link, (name, value)| link.with_attribute(name, value))
        .unwrap();

        assert_eq!(link.hreflang(), Some("de"));
        assert_eq!(link.media(), Some("print"));
        assert_eq!(link.title(), Some("Druck"));
        assert_eq!(link.media_type(), Some("text/html"));
        assert_eq!(link.deprecation(), Some("https://example.com/deprecated"));
        assert_eq!(link.profile(), Some("https://example.com/profile"));
        assert_eq!(link.name(), Some("print"));
        assert_eq!(link.attribute("missing"), None);
    }

    #[test]
    fn with_attribute_replaces_and_normalizes_names() {
        let link = link("/a", "self")
            .with_attribute("Title", "one")
            .and_then(|link| link.with_attribute("title", "two"))
            .unwrap();
        assert_eq!(link.attributes().collect::<Vec<_>>(), [("title", "two")]);
        assert_eq!(link.attribute("TITLE"), Some("two"));
    }

    #[test]
    fn with_attribute_is_idempotent() {
        let once = link("/a", "self").with_attribute("title", "t").unwrap();
        assert_eq!(once.clone().with_attribute("title", "t").unwrap(), once);
    }

    #[test]
    fn rel_is_not_an_attribute() {
        let link = link("/a", "self").with_attribute("rel", "next").unwrap();
        assert_eq!(link.rel(), "next");
        assert_eq!(link.attributes().count(), 0);
        assert_eq!(link.with_rel("prev").unwrap().rel(), "prev");
    }

    #[test]
    fn display_escapes_quoted_strings() {
        let link = link("/a", "self").with_attribute("title", r#"a "b" \c"#).unwrap();
        assert_eq!(link.to_string(), r#"</a>;rel="self";title="a \"b\" \\c""#);
    }

    #[test]
    fn rejects_relations_that_would_split() {
        for rel in ["", "next last", " next", "next\t"] {
            let expected = LinkValueError::InvalidRelation { rel: rel.to_owned() };
            assert_eq!(LinkValue::new("/a", rel), Err(expected.clone()), "{rel:?}");
            assert_eq!(link("/a", "self").with_rel(rel), Err(expected.clone()), "{rel:?}");
            assert_eq!(link("/a", "self").with_attribute("rel", rel), Err(expected), "{rel:?}");
        }
    }

    #[test]
    fn rejects_attribute_names_that_are_not_tokens() {
        for name in ["", "a=b", "a;b", "a,b", "a b", "a\"b", "t\u{ed}tulo"] {
            assert_eq!(
                link("/a", "self").with_attribute(name, "v"),
                Err(LinkValueError::InvalidAttributeName { name: name.to_owned() }),
                "{name:?}"
            );
        }
        assert!(link("/a", "self").with_attribute("x-custom_attr.1", "v").is_ok());
    }

    #[test]
    fn rejects_target_with_closing_bracket() {
        assert_eq!(
            LinkValue::new("/a>b", "self"),
            Err(LinkValueError::InvalidTarget { url: "/a>b".to_owned() })
        );
    }

    #[test]
    fn format_nothing() {
        assert_eq!(format_links(&Vec::<LinkValue>::new()), "");
    }
}
