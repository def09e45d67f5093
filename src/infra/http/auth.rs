use std::path::Path;

use reqwest::Method;
use reqwest::multipart::{Form, Part};
use tracing::info;

use quire_api_types::{
    CaptchaResponse, LoginRequest, ProfileUpdateRequest, RegisterRequest, TokenResponse,
};

use crate::domain::entities::UserProfile;

use super::client::ApiClient;
use super::error::ApiError;

/// Avatar image staged for upload.
#[derive(Debug, Clone)]
pub struct AvatarUpload {
    pub file_name: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

impl AvatarUpload {
    pub async fn from_path(path: &Path) -> Result<Self, ApiError> {
        let bytes = tokio::fs::read(path).await.map_err(|source| ApiError::File {
            path: path.display().to_string(),
            source,
        })?;
        let file_name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| "avatar".to_string());
        let content_type = match path.extension().and_then(|ext| ext.to_str()) {
            Some("png") => "image/png",
            Some("gif") => "image/gif",
            Some("webp") => "image/webp",
            _ => "image/jpeg",
        };
        Ok(Self {
            file_name,
            content_type: content_type.to_string(),
            bytes,
        })
    }
}

impl ApiClient {
    /// Log in and keep the issued token for subsequent requests.
    pub async fn login(&self, request: &LoginRequest) -> Result<TokenResponse, ApiError> {
        let token: TokenResponse = self
            .send_json(Method::POST, "api/auth/login", request)
            .await?;
        self.set_token(token.access_token.clone());
        info!(username = %request.username, "logged in");
        Ok(token)
    }

    pub async fn register(&self, request: &RegisterRequest) -> Result<UserProfile, ApiError> {
        self.send_json(Method::POST, "api/auth/register", request)
            .await
    }

    /// The local token is dropped even when the backend call fails.
    pub async fn logout(&self) -> Result<(), ApiError> {
        let result = self
            .send_no_content(Method::POST, "api/auth/logout")
            .await;
        self.clear_token();
        result
    }

    pub async fn profile(&self) -> Result<UserProfile, ApiError> {
        self.get("api/auth/profile", None).await
    }

    pub async fn update_profile(
        &self,
        request: &ProfileUpdateRequest,
    ) -> Result<UserProfile, ApiError> {
        self.send_json(Method::PUT, "api/auth/profile", request)
            .await
    }

    pub async fn upload_avatar(&self, upload: AvatarUpload) -> Result<UserProfile, ApiError> {
        let part = Part::bytes(upload.bytes)
            .file_name(upload.file_name)
            .mime_str(&upload.content_type)?;
        let form = Form::new().part("file", part);
        self.send_multipart("api/auth/avatar", form).await
    }

    pub async fn captcha(&self) -> Result<CaptchaResponse, ApiError> {
        self.get("api/auth/captcha", None).await
    }
}

#[cfg(test)]
mod tests {
    use httpmock::MockServer;
    use serde_json::json;

    use super::*;

    #[tokio::test]
    async fn login_stores_token_and_logout_clears_it() {
        let server = MockServer::start();
        let login = server.mock(|when, then| {
            when.method("POST")
                .path("/api/auth/login")
                .json_body(json!({"username": "ada", "password": "pw"}));
            then.status(200)
                .header("content-type", "application/json")
                .json_body(json!({"access_token": "t0k", "token_type": "bearer"}));
        });
        let logout = server.mock(|when, then| {
            when.method("POST")
                .path("/api/auth/logout")
                .header("authorization", "Bearer t0k");
            then.status(204);
        });

        let client = ApiClient::new(&server.base_url(), None).expect("client");
        client
            .login(&LoginRequest {
                username: "ada".into(),
                password: "pw".into(),
                captcha_id: None,
                captcha_code: None,
            })
            .await
            .expect("login");
        assert_eq!(client.token().as_deref(), Some("t0k"));

        client.logout().await.expect("logout");
        assert!(client.token().is_none());
        login.assert();
        logout.assert();
    }

    #[tokio::test]
    async fn failed_logout_still_forgets_token() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method("POST").path("/api/auth/logout");
            then.status(500);
        });

        let client = ApiClient::new(&server.base_url(), Some("stale".into())).expect("client");
        assert!(client.logout().await.is_err());
        assert!(client.token().is_none());
    }
}
