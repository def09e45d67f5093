//! Categories and tags: cached lookups plus the writes that keep the cache honest.

use std::sync::Arc;

use tracing::{debug, info};

use quire_api_types::{CategoryWriteRequest, TagWriteRequest};

use crate::application::error::AppError;
use crate::application::pagination::{self, Paged};
use crate::application::ports::{CatalogApi, ListQuery};
use crate::cache::{CacheConfig, EntityCache, EntitySource};
use crate::domain::entities::{Category, Tag};
use crate::infra::http::ApiClient;

pub const UNKNOWN_CATEGORY_LABEL: &str = "Uncategorized";
pub const UNKNOWN_TAG_LABEL: &str = "Unknown tag";

/// Page size used when resolving a category name against the backend.
const NAME_LOOKUP_PAGE_SIZE: u32 = 50;

pub struct CatalogService {
    api: Arc<dyn CatalogApi>,
    categories: EntityCache<Category>,
    tags: EntityCache<Tag>,
}

impl CatalogService {
    pub fn new(
        api: Arc<dyn CatalogApi>,
        categories: EntityCache<Category>,
        tags: EntityCache<Tag>,
    ) -> Self {
        Self {
            api,
            categories,
            tags,
        }
    }

    pub fn from_client(client: &ApiClient, config: &CacheConfig) -> Self {
        let client = Arc::new(client.clone());
        let category_source: Arc<dyn EntitySource<Category>> = client.clone();
        let tag_source: Arc<dyn EntitySource<Tag>> = client.clone();
        Self::new(
            client,
            EntityCache::new(category_source, config.category_capacity(), config.enabled),
            EntityCache::new(tag_source, config.tag_capacity(), config.enabled),
        )
    }

    pub fn categories(&self) -> &EntityCache<Category> {
        &self.categories
    }

    pub fn tags(&self) -> &EntityCache<Tag> {
        &self.tags
    }

    pub async fn category(&self, id: i64) -> Option<Arc<Category>> {
        self.categories.get(id).await
    }

    pub async fn tag(&self, id: i64) -> Option<Arc<Tag>> {
        self.tags.get(id).await
    }

    /// Display name for a category, or a placeholder when it cannot be loaded.
    pub async fn category_label(&self, id: i64) -> String {
        match self.categories.get(id).await {
            Some(category) => category.name.clone(),
            None => UNKNOWN_CATEGORY_LABEL.to_string(),
        }
    }

    pub async fn tag_labels(&self, ids: &[i64]) -> Vec<String> {
        let mut labels = Vec::with_capacity(ids.len());
        for &id in ids {
            let label = match self.tags.get(id).await {
                Some(tag) => tag.name.clone(),
                None => UNKNOWN_TAG_LABEL.to_string(),
            };
            labels.push(label);
        }
        labels
    }

    pub async fn list_categories(&self, query: &ListQuery) -> Result<Paged<Category>, AppError> {
        pagination::validate(query.page, query.page_size)?;
        let page: Paged<Category> = self.api.list_categories(query).await?.into();
        self.categories.add_many(page.items.iter().cloned());
        Ok(page)
    }

    pub async fn list_tags(&self, query: &ListQuery) -> Result<Paged<Tag>, AppError> {
        pagination::validate(query.page, query.page_size)?;
        let page: Paged<Tag> = self.api.list_tags(query).await?.into();
        self.tags.add_many(page.items.iter().cloned());
        Ok(page)
    }

    pub async fn hot_tags(&self, limit: u32) -> Result<Vec<Tag>, AppError> {
        let tags = self.api.hot_tags(limit).await?;
        self.tags.add_many(tags.iter().cloned());
        Ok(tags)
    }

    /// Category ID for a display name.
    ///
    /// Cached entries are consulted first; otherwise the backend listing is
    /// searched by keyword and everything it returns is cached.
    pub async fn resolve_category_name(&self, name: &str) -> Result<Option<i64>, AppError> {
        let name = name.trim();
        if name.is_empty() {
            return Ok(None);
        }
        if let Some(hit) = self.categories.find_by_name(name) {
            debug!(name, id = hit.id, "category name resolved from cache");
            return Ok(Some(hit.id));
        }

        let query = ListQuery::new(1, NAME_LOOKUP_PAGE_SIZE).with_keyword(name);
        let page = self.list_categories(&query).await?;
        let id = page
            .items
            .iter()
            .find(|category| category.name.trim().eq_ignore_ascii_case(name))
            .map(|category| category.id);
        debug!(name, ?id, "category name resolved from backend");
        Ok(id)
    }

    pub async fn create_category(
        &self,
        request: &CategoryWriteRequest,
    ) -> Result<Arc<Category>, AppError> {
        ensure_name(&request.name)?;
        let created = self.api.create_category(request).await?;
        info!(id = created.id, name = %created.name, "category created");
        Ok(self.categories.insert(created))
    }

    pub async fn update_category(
        &self,
        id: i64,
        request: &CategoryWriteRequest,
    ) -> Result<Arc<Category>, AppError> {
        ensure_name(&request.name)?;
        let updated = self.api.update_category(id, request).await?;
        Ok(self.categories.insert(updated))
    }

    pub async fn delete_category(&self, id: i64) -> Result<(), AppError> {
        self.api.delete_category(id).await?;
        self.categories.remove(id);
        info!(id, "category deleted");
        Ok(())
    }

    pub async fn create_tag(&self, request: &TagWriteRequest) -> Result<Arc<Tag>, AppError> {
        ensure_name(&request.name)?;
        let created = self.api.create_tag(request).await?;
        info!(id = created.id, name = %created.name, "tag created");
        Ok(self.tags.insert(created))
    }

    pub async fn update_tag(
        &self,
        id: i64,
        request: &TagWriteRequest,
    ) -> Result<Arc<Tag>, AppError> {
        ensure_name(&request.name)?;
        let updated = self.api.update_tag(id, request).await?;
        Ok(self.tags.insert(updated))
    }

    /// A tag still attached to articles is refused by the backend with 409.
    pub async fn delete_tag(&self, id: i64) -> Result<(), AppError> {
        self.api.delete_tag(id).await?;
        self.tags.remove(id);
        info!(id, "tag deleted");
        Ok(())
    }
}

fn ensure_name(name: &str) -> Result<(), AppError> {
    if name.trim().is_empty() {
        return Err(AppError::validation("name must not be empty"));
    }
    Ok(())
}
