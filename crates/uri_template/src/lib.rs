// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

#![cfg_attr(coverage_nightly, feature(coverage_attribute))]
#![cfg_attr(docsrs, feature(doc_cfg))]

//! RFC 6570 URI templates that can be parsed, extended and expanded.
//!
//! A [`UriTemplate`] is literal URI text interleaved with `{...}` expressions. Each expression
//! is an [`ExpandGroup`]: one operator shared by one or more [`TemplateVariable`]s. Templates
//! are immutable values; [`UriTemplate::augment`] derives a new template with additional
//! variables merged into the expressions they belong to, keeping the result valid template
//! text.
//!
//! # Supported Expressions
//!
//! The crate implements RFC 6570 up to level 4 for these operators:
//!
//! | expression | [`VariableType`] |
//! |------------|------------------|
//! | `{var}` | [`VariableType::Simple`] |
//! | `{+var}` | [`VariableType::Reserved`] |
//! | `{.var}` | [`VariableType::Dot`] |
//! | `{/var}` | [`VariableType::PathSegment`] |
//! | `{;var}` | [`VariableType::PathStyleParameter`] |
//! | `{?var}` | [`VariableType::Query`] |
//! | `{&var}` | [`VariableType::QueryContinuation`] |
//! | `{#var}` | [`VariableType::Fragment`] |
//!
//! Variables accept the prefix modifier `{var:3}` and the explode modifier `{var*}`.
//!
//! # Quick Start
//!
//! ```rust
//! use uri_template::{Parameters, TemplateVariable, UriTemplate, Value};
//!
//! let template = UriTemplate::parse("/users{/id}")?
//!     .augment([TemplateVariable::query("tags").composite()])?;
//! assert_eq!(template.as_str(), "/users{/id}{?tags*}");
//!
//! let parameters = Parameters::new()
//!     .with("id", 7)
//!     .with("tags", Value::list(["rust", "uri"]));
//! assert_eq!(template.expand(&parameters), "/users/7?tags=rust&tags=uri");
//! # Ok::<(), uri_template::TemplateError>(())
//! ```
//!
//! Unbound variables contribute nothing to [`UriTemplate::expand`].
//! [`UriTemplate::expand_partial`] keeps them as expressions instead, so the result is again a
//! template.
//!
//! # Features
//!
//! - `serde`: `Serialize` and `Deserialize` for [`UriTemplate`] (as its text),
//!   [`VariableType`] and [`TemplateVariable`].
//! - `logs`: emits `tracing` events when parsing fails and when a template is augmented.

mod cache;
mod encoding;
mod error;
mod group;
mod parser;
mod template;
mod value;
mod variable;
mod variable_type;
mod variables;

pub use cache::TemplateCache;
pub use error::{Result, TemplateError};
pub use group::ExpandGroup;
pub use template::UriTemplate;
pub use value::{Parameters, Value};
pub use variable::{Cardinality, TemplateVariable};
pub use variable_type::{UnknownOperator, VariableType};
pub use variables::TemplateVariables;
