//! Fetch-through cache for lookup entities.

use std::sync::Arc;

use async_trait::async_trait;
use metrics::counter;
use tracing::{debug, warn};

use crate::infra::http::ApiError;

use super::store::{CacheEntity, EntityStore};

pub(crate) const METRIC_ENTITY_HIT: &str = "quire_entity_cache_hit_total";
pub(crate) const METRIC_ENTITY_MISS: &str = "quire_entity_cache_miss_total";
pub(crate) const METRIC_ENTITY_FETCH_ERROR: &str = "quire_entity_cache_fetch_error_total";

/// Where cache misses are resolved.
#[async_trait]
pub trait EntitySource<E>: Send + Sync {
    async fn fetch(&self, id: i64) -> Result<E, ApiError>;
}

/// Keyed entity cache backed by an [`EntitySource`].
///
/// Concurrent misses for the same ID are not coalesced; each one reaches the
/// source and the last response to land wins.
pub struct EntityCache<E> {
    store: EntityStore<E>,
    source: Arc<dyn EntitySource<E>>,
    enabled: bool,
}

impl<E: CacheEntity> EntityCache<E> {
    pub fn new(
        source: Arc<dyn EntitySource<E>>,
        capacity: Option<std::num::NonZeroUsize>,
        enabled: bool,
    ) -> Self {
        Self {
            store: EntityStore::new(capacity),
            source,
            enabled,
        }
    }

    /// Cached entity for `id`, fetching and storing it on a miss.
    ///
    /// A failed fetch is logged and reported as `None`.
    pub async fn get(&self, id: i64) -> Option<Arc<E>> {
        if let Some(hit) = self.peek(id) {
            counter!(METRIC_ENTITY_HIT, "kind" => E::KIND).increment(1);
            debug!(kind = E::KIND, id, "entity cache hit");
            return Some(hit);
        }

        counter!(METRIC_ENTITY_MISS, "kind" => E::KIND).increment(1);
        debug!(kind = E::KIND, id, "entity cache miss");

        match self.source.fetch(id).await {
            Ok(entity) if self.enabled => Some(self.store.insert(entity)),
            Ok(entity) => Some(Arc::new(entity)),
            Err(err) => {
                counter!(METRIC_ENTITY_FETCH_ERROR, "kind" => E::KIND).increment(1);
                warn!(kind = E::KIND, id, error = %err, "entity lookup failed");
                None
            }
        }
    }

    /// Cached entity for `id` without touching the network.
    pub fn peek(&self, id: i64) -> Option<Arc<E>> {
        if !self.enabled {
            return None;
        }
        self.store.get(id)
    }

    pub fn insert(&self, entity: E) -> Arc<E> {
        if self.enabled {
            self.store.insert(entity)
        } else {
            Arc::new(entity)
        }
    }

    pub fn add_many<I>(&self, entities: I) -> usize
    where
        I: IntoIterator<Item = E>,
    {
        if !self.enabled {
            return 0;
        }
        self.store.add_many(entities)
    }

    pub fn remove(&self, id: i64) -> Option<Arc<E>> {
        self.store.remove(id)
    }

    pub fn clear(&self) {
        self.store.clear();
    }

    pub fn len(&self) -> usize {
        self.store.len()
    }

    pub fn is_empty(&self) -> bool {
        self.store.is_empty()
    }

    pub fn find_by_name(&self, name: &str) -> Option<Arc<E>> {
        if !self.enabled {
            return None;
        }
        self.store.find_by_name(name)
    }
}
