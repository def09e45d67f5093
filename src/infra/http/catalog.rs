use async_trait::async_trait;
use reqwest::Method;

use quire_api_types::{CategoryWriteRequest, PageResponse, TagWriteRequest};

use crate::application::ports::{CatalogApi, ListQuery};
use crate::cache::EntitySource;
use crate::domain::entities::{Category, Tag};

use super::client::ApiClient;
use super::error::ApiError;

impl ApiClient {
    pub async fn get_category(&self, id: i64) -> Result<Category, ApiError> {
        self.get(&format!("api/categories/{id}"), None).await
    }

    pub async fn get_tag(&self, id: i64) -> Result<Tag, ApiError> {
        self.get(&format!("api/tags/{id}"), None).await
    }
}

#[async_trait]
impl EntitySource<Category> for ApiClient {
    async fn fetch(&self, id: i64) -> Result<Category, ApiError> {
        self.get_category(id).await
    }
}

#[async_trait]
impl EntitySource<Tag> for ApiClient {
    async fn fetch(&self, id: i64) -> Result<Tag, ApiError> {
        self.get_tag(id).await
    }
}

#[async_trait]
impl CatalogApi for ApiClient {
    async fn list_categories(
        &self,
        query: &ListQuery,
    ) -> Result<PageResponse<Category>, ApiError> {
        self.get("api/categories", Some(&query.pairs())).await
    }

    async fn create_category(
        &self,
        request: &CategoryWriteRequest,
    ) -> Result<Category, ApiError> {
        self.send_json(Method::POST, "api/categories", request).await
    }

    async fn update_category(
        &self,
        id: i64,
        request: &CategoryWriteRequest,
    ) -> Result<Category, ApiError> {
        self.send_json(Method::PUT, &format!("api/categories/{id}"), request)
            .await
    }

    async fn delete_category(&self, id: i64) -> Result<(), ApiError> {
        self.send_no_content(Method::DELETE, &format!("api/categories/{id}"))
            .await
    }

    async fn list_tags(&self, query: &ListQuery) -> Result<PageResponse<Tag>, ApiError> {
        self.get("api/tags", Some(&query.pairs())).await
    }

    async fn hot_tags(&self, limit: u32) -> Result<Vec<Tag>, ApiError> {
        self.get("api/tags/hot", Some(&[("limit", limit.to_string())]))
            .await
    }

    async fn create_tag(&self, request: &TagWriteRequest) -> Result<Tag, ApiError> {
        self.send_json(Method::POST, "api/tags", request).await
    }

    async fn update_tag(&self, id: i64, request: &TagWriteRequest) -> Result<Tag, ApiError> {
        self.send_json(Method::PUT, &format!("api/tags/{id}"), request)
            .await
    }

    async fn delete_tag(&self, id: i64) -> Result<(), ApiError> {
        self.send_no_content(Method::DELETE, &format!("api/tags/{id}"))
            .await
    }
}
