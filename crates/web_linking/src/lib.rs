// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

#![cfg_attr(coverage_nightly, feature(coverage_attribute))]
#![cfg_attr(docsrs, feature(doc_cfg))]

//! Parsing and rendering of RFC 8288 `Link` header fields.
//!
//! A `Link` header carries a comma-separated list of link-values, each a target URI in angle
//! brackets followed by `;`-separated attributes:
//!
//! ```text
//! Link: </orders?page=2>; rel="next", </orders?page=9>; rel="last"; title="Last page"
//! ```
//!
//! [`parse_links`] turns such a header into [`LinkValue`]s, one per relation type, so a
//! link-value with `rel="prev first"` yields two links. Quoted attribute values support
//! backslash escapes, and [`LinkValue`]'s `Display` implementation applies the same escaping
//! when rendering. Building a [`LinkValue`] checks the parts that quoting cannot protect, so
//! rendered links parse back to equal values.
//!
//! # Quick Start
//!
//! ```rust
//! use web_linking::{LinkValue, format_links, parse_links};
//!
//! let links = parse_links(r#"</orders?page=2>; rel="next", </orders?page=9>; rel=last; title="Last page""#)?;
//! assert_eq!(links[0], LinkValue::new("/orders?page=2", "next")?);
//! assert_eq!(links[1].title(), Some("Last page"));
//!
//! assert_eq!(
//!     format_links(&links),
//!     r#"</orders?page=2>;rel="next", </orders?page=9>;rel="last";title="Last page""#
//! );
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! # Features
//!
//! - `serde`: `Serialize` and `Deserialize` for [`LinkValue`].
//! - `logs`: emits a `tracing` event when a header fails to parse.

mod error;
mod link;
mod parser;

pub use error::{LinkHeaderError, LinkValueError, Result};
pub use link::{LinkValue, format_links};
pub use parser::{parse_link, parse_links};
