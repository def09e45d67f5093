//! Article search page: keeps the filter form and the page URL in step and
//! runs searches on demand.

use std::sync::Arc;

use tracing::{debug, warn};
use url::Url;

use crate::application::catalog::CatalogService;
use crate::application::error::AppError;
use crate::application::filters::{FilterState, UrlFilters};
use crate::application::pagination::{self, Paged};
use crate::application::ports::{ArticleApi, ArticleQuery};
use crate::domain::entities::ArticleSummary;

pub struct SearchController {
    api: Arc<dyn ArticleApi>,
    catalog: Arc<CatalogService>,
    page_size: u32,
    url: Url,
    filters: UrlFilters,
    results: Option<Paged<ArticleSummary>>,
}

impl SearchController {
    pub fn new(
        api: Arc<dyn ArticleApi>,
        catalog: Arc<CatalogService>,
        page_size: u32,
        url: Url,
    ) -> Self {
        Self {
            api,
            catalog,
            page_size,
            url,
            filters: UrlFilters::default(),
            results: None,
        }
    }

    pub fn url(&self) -> &Url {
        &self.url
    }

    pub fn filters(&self) -> &FilterState {
        &self.filters.state
    }

    pub fn page(&self) -> u32 {
        self.filters.page
    }

    pub fn results(&self) -> Option<&Paged<ArticleSummary>> {
        self.results.as_ref()
    }

    /// Enter the page at `url`.
    ///
    /// Filters are read from the URL; a category given by name is resolved
    /// first. When the URL asks for it, the search runs once and the URL is
    /// rewritten without the request so it cannot fire again.
    pub async fn navigate(
        &mut self,
        url: Url,
    ) -> Result<Option<&Paged<ArticleSummary>>, AppError> {
        self.url = url;
        self.sync_from_url().await;

        // one-shot: consumed here, and dropped from the URL below
        if !std::mem::take(&mut self.filters.auto_search) {
            return Ok(None);
        }
        debug!(url = %self.url, "auto search triggered");
        self.filters.write_to_url(&mut self.url);
        self.search().await.map(Some)
    }

    /// Re-read the current URL without re-arming the automatic search.
    pub async fn refresh(&mut self) {
        self.sync_from_url().await;
        self.filters.auto_search = false;
    }

    /// Apply a user edit of the filter form: back to page 1, URL updated,
    /// results refetched.
    pub async fn change(&mut self, state: FilterState) -> Result<&Paged<ArticleSummary>, AppError> {
        self.filters.state = state;
        self.filters.page = 1;
        self.filters.write_to_url(&mut self.url);
        self.search().await
    }

    pub async fn go_to_page(&mut self, page: u32) -> Result<&Paged<ArticleSummary>, AppError> {
        pagination::validate(page, self.page_size)?;
        self.filters.page = page;
        self.filters.write_to_url(&mut self.url);
        self.search().await
    }

    /// Run the search for the current filters and page.
    pub async fn search(&mut self) -> Result<&Paged<ArticleSummary>, AppError> {
        pagination::validate(self.filters.page, self.page_size)?;
        let query = ArticleQuery {
            filters: self.filters.state.clone(),
            page: self.filters.page,
            page_size: self.page_size,
        };
        let response = self.api.search_articles(&query).await?;
        let paged = self.results.insert(response.into());
        debug!(
            page = paged.cursor.page,
            total = paged.cursor.total,
            "article search completed"
        );
        Ok(&*paged)
    }

    async fn sync_from_url(&mut self) {
        let mut filters = UrlFilters::from_url(&self.url);
        let unresolved = filters
            .category_name
            .as_deref()
            .filter(|_| filters.state.category_ids.is_empty());
        if let Some(name) = unresolved {
            match self.catalog.resolve_category_name(name).await {
                Ok(Some(id)) => {
                    filters.state.category_ids.insert(id);
                }
                Ok(None) => debug!(name, "category name did not resolve"),
                Err(err) => warn!(name, error = %err, "category name lookup failed"),
            }
        }
        self.filters = filters;
    }
}
