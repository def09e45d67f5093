use async_trait::async_trait;
use reqwest::Method;

use quire_api_types::{PageResponse, ToggleResponse};

use crate::application::ports::{ArticleApi, ArticleQuery};
use crate::domain::entities::{ArticleDetail, ArticleSummary, HistoryEntry};

use super::client::ApiClient;
use super::error::ApiError;

impl ApiClient {
    pub async fn get_article(&self, id: i64) -> Result<ArticleDetail, ApiError> {
        self.get(&format!("api/articles/{id}"), None).await
    }

    pub async fn toggle_like(&self, id: i64) -> Result<ToggleResponse, ApiError> {
        self.send_empty(Method::POST, &format!("api/articles/{id}/like"))
            .await
    }

    pub async fn toggle_favorite(&self, id: i64) -> Result<ToggleResponse, ApiError> {
        self.send_empty(Method::POST, &format!("api/articles/{id}/favorite"))
            .await
    }

    pub async fn reading_history(
        &self,
        page: u32,
        page_size: u32,
    ) -> Result<PageResponse<HistoryEntry>, ApiError> {
        let q = [
            ("page", page.to_string()),
            ("page_size", page_size.to_string()),
        ];
        self.get("api/users/me/history", Some(&q)).await
    }
}

#[async_trait]
impl ArticleApi for ApiClient {
    async fn search_articles(
        &self,
        query: &ArticleQuery,
    ) -> Result<PageResponse<ArticleSummary>, ApiError> {
        self.get("api/articles", Some(&query.pairs())).await
    }
}
