//! In-memory entity storage keyed by backend ID.

use std::num::NonZeroUsize;
use std::sync::{Arc, RwLock};

use lru::LruCache;

use crate::domain::entities::{Category, Tag};

use super::lock::{rw_read, rw_write};

const SOURCE: &str = "cache::store";

/// An entity that can be held in an [`EntityStore`].
pub trait CacheEntity: Send + Sync + 'static {
    /// Label used in logs and metrics.
    const KIND: &'static str;

    fn cache_id(&self) -> i64;

    fn display_name(&self) -> &str;
}

impl CacheEntity for Category {
    const KIND: &'static str = "category";

    fn cache_id(&self) -> i64 {
        self.id
    }

    fn display_name(&self) -> &str {
        &self.name
    }
}

impl CacheEntity for Tag {
    const KIND: &'static str = "tag";

    fn cache_id(&self) -> i64 {
        self.id
    }

    fn display_name(&self) -> &str {
        &self.name
    }
}

/// One entry per ID, last write wins.
///
/// Unbounded stores never drop entries on their own; bounded stores evict the
/// least recently used entry once full.
pub struct EntityStore<E> {
    entries: RwLock<LruCache<i64, Arc<E>>>,
}

impl<E: CacheEntity> EntityStore<E> {
    pub fn new(capacity: Option<NonZeroUsize>) -> Self {
        let entries = match capacity {
            Some(capacity) => LruCache::new(capacity),
            None => LruCache::unbounded(),
        };
        Self {
            entries: RwLock::new(entries),
        }
    }

    pub fn get(&self, id: i64) -> Option<Arc<E>> {
        rw_write(&self.entries, SOURCE, "get").get(&id).cloned()
    }

    /// Store `entity`, replacing any previous entry with the same ID.
    pub fn insert(&self, entity: E) -> Arc<E> {
        let entity = Arc::new(entity);
        rw_write(&self.entries, SOURCE, "insert").put(entity.cache_id(), Arc::clone(&entity));
        entity
    }

    pub fn add_many<I>(&self, entities: I) -> usize
    where
        I: IntoIterator<Item = E>,
    {
        let mut entries = rw_write(&self.entries, SOURCE, "add_many");
        let mut added = 0;
        for entity in entities {
            entries.put(entity.cache_id(), Arc::new(entity));
            added += 1;
        }
        added
    }

    pub fn remove(&self, id: i64) -> Option<Arc<E>> {
        rw_write(&self.entries, SOURCE, "remove").pop(&id)
    }

    pub fn clear(&self) {
        rw_write(&self.entries, SOURCE, "clear").clear();
    }

    pub fn len(&self) -> usize {
        rw_read(&self.entries, SOURCE, "len").len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// First entry whose name matches `name`, ignoring ASCII case.
    pub fn find_by_name(&self, name: &str) -> Option<Arc<E>> {
        let needle = name.trim();
        rw_read(&self.entries, SOURCE, "find_by_name")
            .iter()
            .find(|(_, entity)| entity.display_name().eq_ignore_ascii_case(needle))
            .map(|(_, entity)| Arc::clone(entity))
    }
}
