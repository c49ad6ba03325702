// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

use std::collections::HashMap;
use std::sync::Arc;

use crate::UriTemplate;
use crate::error::Result;

/// Memoizes parsed templates by their raw text.
///
/// The cache is owned by the caller; there is no process-wide instance. Share it behind a lock
/// if several threads need it.
///
/// # Examples
///
/// ```
/// use std::sync::Arc;
///
/// use uri_template::TemplateCache;
///
/// let mut cache = TemplateCache::new();
/// let first = cache.get_or_parse("/users{/id}")?;
/// let second = cache.get_or_parse("/users{/id}")?;
///
/// assert!(Arc::ptr_eq(&first, &second));
/// assert_eq!(cache.len(), 1);
/// # Ok::<(), uri_template::TemplateError>(())
/// ```
#[derive(Debug, Clone, Default)]
pub struct TemplateCache {
    templates: HashMap<String, Arc<UriTemplate>>,
}

impl TemplateCache {
    /// Creates an empty cache.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the template parsed from `template`, parsing it on first use.
    ///
    /// Failed parses are not cached.
    ///
    /// # Errors
    ///
    /// Returns the parse error if `template` is not a valid template.
    pub fn get_or_parse(&mut self, template: &str) -> Result<Arc<UriTemplate>> {
        if let Some(parsed) = self.templates.get(template) {
            return Ok(Arc::clone(parsed));
        }

        let parsed = Arc::new(UriTemplate::parse(template)?);
        self.templates.insert(template.to_owned(), Arc::clone(&parsed));
        Ok(parsed)
    }

    /// Returns the number of cached templates.
    #[must_use]
    pub fn len(&self) -> usize {
        self.templates.len()
    }

    /// Returns `true` if nothing is cached.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.templates.is_empty()
    }

    /// Removes all cached templates.
    pub fn clear(&mut self) {
        self.templates.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn assert_types() {
        static_assertions::assert_impl_all!(TemplateCache: Send, Sync);
    }

    #[test]
    fn caches_successful_parses_only() {
        let mut cache = TemplateCache::new();
        assert!(cache.get_or_parse("{broken").is_err());
        assert!(cache.is_empty());

        let _ = cache.get_or_parse("/a{b}").unwrap();
        let _ = cache.get_or_parse("/c").unwrap();
        assert_eq!(cache.len(), 2);

        cache.clear();
        assert!(cache.is_empty());
    }
}
