//! Entity cache configuration, derived from the `[cache]` settings table.

use std::num::NonZeroUsize;

/// Zero means unbounded: entries live until explicitly removed.
const DEFAULT_CATEGORY_LIMIT: usize = 0;
const DEFAULT_TAG_LIMIT: usize = 0;

#[derive(Debug, Clone)]
pub struct CacheConfig {
    /// Serve lookups from memory after the first fetch.
    pub enabled: bool,
    /// Maximum cached categories; 0 disables eviction.
    pub category_limit: usize,
    /// Maximum cached tags; 0 disables eviction.
    pub tag_limit: usize,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            category_limit: DEFAULT_CATEGORY_LIMIT,
            tag_limit: DEFAULT_TAG_LIMIT,
        }
    }
}

impl From<&crate::config::CacheSettings> for CacheConfig {
    fn from(settings: &crate::config::CacheSettings) -> Self {
        Self {
            enabled: settings.enabled,
            category_limit: settings.category_limit,
            tag_limit: settings.tag_limit,
        }
    }
}

impl CacheConfig {
    pub fn category_capacity(&self) -> Option<NonZeroUsize> {
        NonZeroUsize::new(self.category_limit)
    }

    pub fn tag_capacity(&self) -> Option<NonZeroUsize> {
        NonZeroUsize::new(self.tag_limit)
    }
}
