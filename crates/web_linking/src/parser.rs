// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! RFC 8288 `Link` header parsing.
//!
//! Parsing is strict: a missing `>` or closing quote, content after a link-value that is not a
//! `,`, and link-values without a `rel` attribute are errors rather than being skipped.

use crate::LinkValue;
use crate::error::{LinkHeaderError, Result};

/// Parses a `Link` header field value into one [`LinkValue`] per relation type.
///
/// Empty list elements (`<a>;rel=x,,<b>;rel=y`) and a trailing comma are tolerated. Positions in
/// errors are byte offsets into `header`.
///
/// Attribute names are compared case-insensitively and returned in ASCII lowercase, so
/// `Title="A"` is read as `title`. When a name repeats within one link-value the first
/// occurrence wins.
///
/// # Errors
///
/// Returns a [`LinkHeaderError`] describing the first malformed part of the header.
///
/// # Examples
///
/// ```
/// use web_linking::parse_links;
///
/// let links = parse_links(r#"</prev>;rel="prev first", </next>;rel=next;title="Next page""#)?;
/// let rels: Vec<_> = links.iter().map(|link| link.rel()).collect();
/// assert_eq!(rels, ["prev", "first", "next"]);
/// assert_eq!(links[2].title(), Some("Next page"));
/// # Ok::<(), web_linking::LinkHeaderError>(())
/// ```
pub fn parse_links(header: &str) -> Result<Vec<LinkValue>> {
    let mut cursor = Cursor::new(header);
    report(read_links(&mut cursor))
}

/// Parses a single link-value, returning one [`LinkValue`] per relation type.
///
/// Parsing stops at the end of the link-value; whatever follows is ignored. Attribute names
/// are lowercased as in [`parse_links`].
///
/// # Errors
///
/// Returns a [`LinkHeaderError`] if the link-value is malformed or has no `rel` attribute.
///
/// # Examples
///
/// ```
/// use web_linking::{LinkValue, parse_link};
///
/// let links = parse_link("<https://example.com/>;rel=self")?;
/// assert_eq!(links, [LinkValue::new("https://example.com/", "self")?]);
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
pub fn parse_link(input: &str) -> Result<Vec<LinkValue>> {
    let mut cursor = Cursor::new(input);
    report(read_link(&mut cursor))
}

fn report(result: Result<Vec<LinkValue>>) -> Result<Vec<LinkValue>> {
    #[cfg(any(feature = "logs", test))]
    if let Err(error) = &result {
        tracing::event!(
            name: "web_linking.parse_failed",
            tracing::Level::DEBUG,
            web_linking.position = error.position(),
            web_linking.reason = error.reason(),
        );
    }

    result
}

/// Parsing state for one input string.
#[derive(Debug)]
struct Cursor<'a> {
    input: &'a str,
    position: usize,
}

impl<'a> Cursor<'a> {
    fn new(input: &'a str) -> Self {
        Self { input, position: 0 }
    }

    fn peek(&self) -> Option<char> {
        self.input[self.position..].chars().next()
    }

    fn advance(&mut self, c: char) {
        self.position += c.len_utf8();
    }

    fn skip_whitespace(&mut self) {
        while let Some(c) = self.peek().filter(|c| c.is_whitespace()) {
            self.advance(c);
        }
    }

    /// Consumes a quoted string starting at the opening quote and returns its unescaped content.
    fn read_quoted(&mut self, quote: char) -> Result<String> {
        self.advance(quote);
        let mut content = String::new();

        while let Some(c) = self.peek() {
            self.advance(c);
            if c == quote {
                return Ok(content);
            }
            if c == '\\' {
                let Some(escaped) = self.peek() else { break };
                self.advance(escaped);
                content.push(escaped);
            } else {
                content.push(c);
            }
        }

        Err(LinkHeaderError::UnterminatedQuotedString {
            position: self.input.len(),
        })
    }
}

fn read_links(cursor: &mut Cursor<'_>) -> Result<Vec<LinkValue>> {
    let mut links = Vec::new();
    let mut expecting_link = true;

    while let Some(c) = cursor.peek() {
        match c {
            c if c.is_whitespace() => cursor.advance(c),
            '<' if expecting_link => {
                links.extend(read_link(cursor)?);
                expecting_link = false;
            }
            ',' => {
                cursor.advance(c);
                expecting_link = true;
            }
            _ => {
                return Err(LinkHeaderError::UnexpectedData {
                    position: cursor.position,
                });
            }
        }
    }

    Ok(links)
}

/// Attribute parsing states of a single link-value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    /// Looking for the `;` that opens the next attribute.
    Initial,
    /// Reading an attribute name up to `=`.
    InKey,
    /// Between `=` and the first character of the value.
    BeforeValue,
    /// Reading an unquoted value.
    InValue,
}

/// Reads one link-value and leaves the cursor on the following `,` or at the end of input.
fn read_link(cursor: &mut Cursor<'_>) -> Result<Vec<LinkValue>> {
    cursor.skip_whitespace();
    if cursor.peek() != Some('<') {
        return Err(LinkHeaderError::ExpectedOpeningBracket {
            position: cursor.position,
        });
    }
    cursor.advance('<');

    let Some(length) = cursor.input[cursor.position..].find('>') else {
        return Err(LinkHeaderError::MissingClosingBracket {
            position: cursor.input.len(),
        });
    };
    let url = cursor.input[cursor.position..cursor.position + length].to_owned();
    cursor.position += length + 1;

    let attributes = read_attributes(cursor)?;

    let rels: Vec<_> = attributes
        .iter()
        .find(|(key, _)| key == "rel")
        .map(|(_, value)| value.split_whitespace().map(str::to_owned).collect())
        .unwrap_or_default();
    if rels.is_empty() {
        return Err(LinkHeaderError::MissingRel {
            position: cursor.position,
        });
    }

    let attributes: Vec<_> = attributes.into_iter().filter(|(key, _)| key != "rel").collect();
    Ok(rels
        .into_iter()
        .map(|rel| LinkValue::from_parts(url.clone(), rel, attributes.clone()))
        .collect())
}

fn read_attributes(cursor: &mut Cursor<'_>) -> Result<Vec<(String, String)>> {
    let mut attributes = Vec::new();
    let mut state = State::Initial;
    let mut key = String::new();
    let mut value = String::new();

    loop {
        let next = cursor.peek();
        match state {
            State::Initial => match next {
                Some(c) if c.is_whitespace() => cursor.advance(c),
                Some(';') => {
                    cursor.advance(';');
                    state = State::InKey;
                }
                // Anything else ends the link-value.
                _ => break,
            },
            State::InKey => match next {
                Some('=') => {
                    cursor.advance('=');
                    state = State::BeforeValue;
                }
                Some(';') => {
                    cursor.advance(';');
                    insert_attribute(&mut attributes, &key, String::new());
                    key.clear();
                }
                Some(',') | None => {
                    insert_attribute(&mut attributes, &key, String::new());
                    break;
                }
                Some(c) => {
                    cursor.advance(c);
                    key.push(c);
                }
            },
            State::BeforeValue => match next {
                Some(c) if c.is_whitespace() => cursor.advance(c),
                Some(quote @ ('"' | '\'')) => {
                    let quoted = cursor.read_quoted(quote)?;
                    insert_attribute(&mut attributes, &key, quoted);
                    key.clear();
                    state = State::Initial;
                }
                _ => state = State::InValue,
            },
            State::InValue => match next {
                Some(';' | ',') | None => {
                    insert_attribute(&mut attributes, &key, value.trim().to_owned());
                    key.clear();
                    value.clear();
                    state = State::Initial;
                }
                Some(c) => {
                    cursor.advance(c);
                    value.push(c);
                }
            },
        }
    }

    Ok(attributes)
}

/// Records an attribute unless one of the same name was seen before.
fn insert_attribute(attributes: &mut Vec<(String, String)>, key: &str, value: String) {
    let key = key.trim().to_ascii_lowercase();
    if key.is_empty() || attributes.iter().any(|(existing, _)| *existing == key) {
        return;
    }
    attributes.push((key, value));
}
