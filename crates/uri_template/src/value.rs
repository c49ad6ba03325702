// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

use std::collections::BTreeMap;

/// A value bound to a template variable.
///
/// A variable without a binding is undefined and contributes nothing to an expansion. Lists and
/// maps keep the order in which their elements were supplied.
///
/// # Examples
///
/// ```
/// use uri_template::Value;
///
/// assert_eq!(Value::from("rust"), Value::Scalar("rust".to_string()));
/// assert_eq!(Value::from(42_u32), Value::Scalar("42".to_string()));
/// assert_eq!(
///     Value::from(vec!["red", "green"]),
///     Value::List(vec!["red".to_string(), "green".to_string()])
/// );
/// assert_eq!(
///     Value::from(vec![("lang", "en")]),
///     Value::Map(vec![("lang".to_string(), "en".to_string())])
/// );
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Value {
    /// A single string value.
    Scalar(String),
    /// An ordered list of values.
    List(Vec<String>),
    /// An ordered list of key/value pairs.
    Map(Vec<(String, String)>),
}

impl Value {
    /// Returns `true` if the value is an empty list or an empty map.
    ///
    /// Empty composite values are treated as undefined during expansion. An empty scalar is
    /// defined.
    #[must_use]
    pub fn is_empty_composite(&self) -> bool {
        match self {
            Self::Scalar(_) => false,
            Self::List(items) => items.is_empty(),
            Self::Map(entries) => entries.is_empty(),
        }
    }

    /// Creates a [`Value::List`] from any sequence of string-like items.
    pub fn list<I>(items: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<String>,
    {
        Self::List(items.into_iter().map(Into::into).collect())
    }

    /// Creates a [`Value::Map`] from any sequence of string-like pairs.
    pub fn map<I, K, V>(entries: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self::Map(entries.into_iter().map(|(key, value)| (key.into(), value.into())).collect())
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Self::Scalar(value.to_owned())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Self::Scalar(value)
    }
}

impl From<&String> for Value {
    fn from(value: &String) -> Self {
        Self::Scalar(value.clone())
    }
}

macro_rules! scalar_from_display {
    ($($ty:ty),* $(,)?) => {
        $(
            impl From<$ty> for Value {
                fn from(value: $ty) -> Self {
                    Self::Scalar(value.to_string())
                }
            }
        )*
    };
}

scalar_from_display!(bool, char, u8, u16, u32, u64, u128, usize, i8, i16, i32, i64, i128, isize);

impl From<Vec<String>> for Value {
    fn from(items: Vec<String>) -> Self {
        Self::List(items)
    }
}

impl From<Vec<&str>> for Value {
    fn from(items: Vec<&str>) -> Self {
        Self::list(items)
    }
}

impl<const N: usize> From<[&str; N]> for Value {
    fn from(items: [&str; N]) -> Self {
        Self::list(items)
    }
}

impl From<Vec<(String, String)>> for Value {
    fn from(entries: Vec<(String, String)>) -> Self {
        Self::Map(entries)
    }
}

impl From<Vec<(&str, &str)>> for Value {
    fn from(entries: Vec<(&str, &str)>) -> Self {
        Self::map(entries)
    }
}

/// Variable bindings used to expand a [`UriTemplate`][crate::UriTemplate].
///
/// The order in which bindings are inserted never influences the expansion; the template alone
/// decides the order of the output.
///
/// # Examples
///
/// ```
/// use uri_template::{Parameters, Value};
///
/// let parameters = Parameters::new().with("page", 2).with("sort", vec!["name", "age"]);
/// assert_eq!(parameters.get("page"), Some(&Value::from("2")));
/// assert!(parameters.get("size").is_none());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Parameters {
    values: BTreeMap<String, Value>,
}

impl Parameters {
    /// Creates an empty set of bindings.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a binding and returns the updated bindings.
    #[must_use]
    pub fn with(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.insert(name, value);
        self
    }

    /// Adds or replaces a binding, returning the previous value.
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
        self.values.insert(name.into(), value.into())
    }

    /// Returns the value bound to `name`.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.values.get(name)
    }

    /// Returns `true` if a value is bound to `name`.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.values.contains_key(name)
    }

    /// Returns the number of bindings.
    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Returns `true` if there are no bindings.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Iterates over the bindings in name order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.values.iter().map(|(name, value)| (name.as_str(), value))
    }
}

impl<K, V> FromIterator<(K, V)> for Parameters
where
    K: Into<String>,
    V: Into<Value>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            values: iter.into_iter().map(|(name, value)| (name.into(), value.into())).collect(),
        }
    }
}

impl<K, V, const N: usize> From<[(K, V); N]> for Parameters
where
    K: Into<String>,
    V: Into<Value>,
{
    fn from(bindings: [(K, V); N]) -> Self {
        bindings.into_iter().collect()
    }
}
