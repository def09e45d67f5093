//! Backend ports consumed by the application services.
//!
//! `ApiClient` implements all of them; tests substitute in-memory stubs.

use async_trait::async_trait;
use quire_api_types::{CategoryWriteRequest, CommentCreateRequest, PageResponse, TagWriteRequest};

use crate::application::filters::FilterState;
use crate::domain::entities::{ArticleSummary, Category, Comment, Tag};
use crate::domain::types::{CommentSort, CommentStatus};
use crate::infra::http::ApiError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListQuery {
    pub page: u32,
    pub page_size: u32,
    pub keyword: Option<String>,
}

impl ListQuery {
    pub fn new(page: u32, page_size: u32) -> Self {
        Self {
            page,
            page_size,
            keyword: None,
        }
    }

    pub fn with_keyword(mut self, keyword: impl Into<String>) -> Self {
        self.keyword = Some(keyword.into());
        self
    }

    pub fn pairs(&self) -> Vec<(&'static str, String)> {
        let mut q = vec![
            ("page", self.page.to_string()),
            ("page_size", self.page_size.to_string()),
        ];
        if let Some(k) = &self.keyword {
            q.push(("keyword", k.clone()));
        }
        q
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CommentListQuery {
    pub article_id: i64,
    pub page: u32,
    pub page_size: u32,
    pub sort: CommentSort,
    pub show_all: bool,
}

impl CommentListQuery {
    pub fn pairs(&self) -> Vec<(&'static str, String)> {
        let mut q = vec![
            ("page", self.page.to_string()),
            ("page_size", self.page_size.to_string()),
            ("sort", self.sort.as_str().to_string()),
        ];
        if self.show_all {
            q.push(("show_all", "true".to_string()));
        }
        q
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArticleQuery {
    pub filters: FilterState,
    pub page: u32,
    pub page_size: u32,
}

impl ArticleQuery {
    pub fn pairs(&self) -> Vec<(&'static str, String)> {
        let mut q = self.filters.api_pairs();
        q.push(("page", self.page.to_string()));
        q.push(("page_size", self.page_size.to_string()));
        q
    }
}

#[async_trait]
pub trait CommentApi: Send + Sync {
    async fn list_article_comments(
        &self,
        query: &CommentListQuery,
    ) -> Result<PageResponse<Comment>, ApiError>;

    async fn list_replies(
        &self,
        parent_id: i64,
        page: u32,
        page_size: u32,
    ) -> Result<PageResponse<Comment>, ApiError>;

    async fn list_user_comments(
        &self,
        user_id: i64,
        page: u32,
        page_size: u32,
    ) -> Result<PageResponse<Comment>, ApiError>;

    async fn create_comment(&self, request: &CommentCreateRequest) -> Result<Comment, ApiError>;

    async fn delete_comment(&self, id: i64) -> Result<(), ApiError>;

    async fn review_comment(&self, id: i64, status: CommentStatus) -> Result<Comment, ApiError>;
}

#[async_trait]
pub trait CatalogApi: Send + Sync {
    async fn list_categories(&self, query: &ListQuery)
    -> Result<PageResponse<Category>, ApiError>;

    async fn create_category(&self, request: &CategoryWriteRequest)
    -> Result<Category, ApiError>;

    async fn update_category(
        &self,
        id: i64,
        request: &CategoryWriteRequest,
    ) -> Result<Category, ApiError>;

    async fn delete_category(&self, id: i64) -> Result<(), ApiError>;

    async fn list_tags(&self, query: &ListQuery) -> Result<PageResponse<Tag>, ApiError>;

    async fn hot_tags(&self, limit: u32) -> Result<Vec<Tag>, ApiError>;

    async fn create_tag(&self, request: &TagWriteRequest) -> Result<Tag, ApiError>;

    async fn update_tag(&self, id: i64, request: &TagWriteRequest) -> Result<Tag, ApiError>;

    async fn delete_tag(&self, id: i64) -> Result<(), ApiError>;
}

#[async_trait]
pub trait ArticleApi: Send + Sync {
    async fn search_articles(
        &self,
        query: &ArticleQuery,
    ) -> Result<PageResponse<ArticleSummary>, ApiError>;
}
