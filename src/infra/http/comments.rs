use async_trait::async_trait;
use reqwest::Method;

use quire_api_types::{CommentCreateRequest, CommentReviewRequest, PageResponse};

use crate::application::ports::{CommentApi, CommentListQuery};
use crate::domain::entities::Comment;
use crate::domain::types::CommentStatus;

use super::client::ApiClient;
use super::error::ApiError;

fn page_pairs(page: u32, page_size: u32) -> [(&'static str, String); 2] {
    [
        ("page", page.to_string()),
        ("page_size", page_size.to_string()),
    ]
}

#[async_trait]
impl CommentApi for ApiClient {
    async fn list_article_comments(
        &self,
        query: &CommentListQuery,
    ) -> Result<PageResponse<Comment>, ApiError> {
        let path = format!("api/articles/{}/comments", query.article_id);
        self.get(&path, Some(&query.pairs())).await
    }

    async fn list_replies(
        &self,
        parent_id: i64,
        page: u32,
        page_size: u32,
    ) -> Result<PageResponse<Comment>, ApiError> {
        let path = format!("api/comments/{parent_id}/replies");
        self.get(&path, Some(&page_pairs(page, page_size))).await
    }

    async fn list_user_comments(
        &self,
        user_id: i64,
        page: u32,
        page_size: u32,
    ) -> Result<PageResponse<Comment>, ApiError> {
        let path = format!("api/users/{user_id}/comments");
        self.get(&path, Some(&page_pairs(page, page_size))).await
    }

    async fn create_comment(&self, request: &CommentCreateRequest) -> Result<Comment, ApiError> {
        self.send_json(Method::POST, "api/comments", request).await
    }

    async fn delete_comment(&self, id: i64) -> Result<(), ApiError> {
        self.send_no_content(Method::DELETE, &format!("api/comments/{id}"))
            .await
    }

    async fn review_comment(&self, id: i64, status: CommentStatus) -> Result<Comment, ApiError> {
        let payload = CommentReviewRequest { status };
        self.send_json(Method::PUT, &format!("api/comments/{id}/review"), &payload)
            .await
    }
}
