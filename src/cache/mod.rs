//! Entity caching for lookup data (categories, tags).
//!
//! Entries are keyed by backend ID and survive until removed, cleared, or,
//! when a capacity is configured, evicted as least recently used:
//!
//! ```toml
//! [cache]
//! enabled = true
//! category_limit = 0   # 0 = unbounded
//! tag_limit = 0
//! ```

mod config;
mod entity;
pub(crate) mod lock;
mod store;

pub use config::CacheConfig;
pub use entity::{EntityCache, EntitySource};
pub(crate) use entity::{METRIC_ENTITY_FETCH_ERROR, METRIC_ENTITY_HIT, METRIC_ENTITY_MISS};
pub use store::{CacheEntity, EntityStore};
