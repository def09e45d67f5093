//! Request and response shapes exchanged with the blog backend.
//!
//! Entity payloads are consumed as the backend sends them; this crate only
//! pins down the envelopes and the write requests the client produces.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Moderation state of a comment. Transitions are decided by the server.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CommentStatus {
    Pending,
    Approved,
    Rejected,
}

impl CommentStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            CommentStatus::Pending => "pending",
            CommentStatus::Approved => "approved",
            CommentStatus::Rejected => "rejected",
        }
    }
}

impl fmt::Display for CommentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CommentStatus {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(CommentStatus::Pending),
            "approved" => Ok(CommentStatus::Approved),
            "rejected" => Ok(CommentStatus::Rejected),
            other => Err(UnknownVariant::new("comment status", other)),
        }
    }
}

/// Account role as reported by the profile endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    #[default]
    Guest,
    User,
    Admin,
}

/// Ordering of top-level comments under an article.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CommentSort {
    #[default]
    Latest,
    Oldest,
    Popular,
}

impl CommentSort {
    pub fn as_str(self) -> &'static str {
        match self {
            CommentSort::Latest => "latest",
            CommentSort::Oldest => "oldest",
            CommentSort::Popular => "popular",
        }
    }
}

impl FromStr for CommentSort {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "latest" => Ok(CommentSort::Latest),
            "oldest" => Ok(CommentSort::Oldest),
            "popular" => Ok(CommentSort::Popular),
            other => Err(UnknownVariant::new("comment sort", other)),
        }
    }
}

/// Error returned when a textual enum value is not recognised.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownVariant {
    pub kind: &'static str,
    pub value: String,
}

impl UnknownVariant {
    pub fn new(kind: &'static str, value: impl Into<String>) -> Self {
        Self {
            kind,
            value: value.into(),
        }
    }
}

impl fmt::Display for UnknownVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown {}: `{}`", self.kind, self.value)
    }
}

impl std::error::Error for UnknownVariant {}

/// Paginated list envelope used by every list endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PageResponse<T> {
    pub items: Vec<T>,
    pub total: u64,
    pub page: u32,
    pub page_size: u32,
}

/// Error body shape; the backend uses either `message` or `detail`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ErrorBody {
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub detail: Option<String>,
}

impl ErrorBody {
    pub fn into_message(self) -> Option<String> {
        self.message.or(self.detail)
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub captcha_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub captcha_code: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct RegisterRequest {
    pub username: String,
    pub email: String,
    pub password: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub captcha_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub captcha_code: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    #[serde(default = "default_token_type")]
    pub token_type: String,
}

fn default_token_type() -> String {
    "bearer".to_string()
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CaptchaResponse {
    pub captcha_id: String,
    /// Data URI or base64 image payload, passed through untouched.
    pub image: String,
}

#[derive(Debug, Default, Serialize, Deserialize)]
pub struct ProfileUpdateRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub nickname: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bio: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct CategoryWriteRequest {
    pub name: String,
    pub description: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct TagWriteRequest {
    pub name: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct CommentCreateRequest {
    pub article_id: i64,
    pub content: String,
    pub parent_id: Option<i64>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct CommentReviewRequest {
    pub status: CommentStatus,
}

/// Result of toggling a like or favourite.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct ToggleResponse {
    pub active: bool,
    pub count: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_body_prefers_message_over_detail() {
        let body: ErrorBody =
            serde_json::from_str(r#"{"message":"in use","detail":"ignored"}"#).expect("body");
        assert_eq!(body.into_message().as_deref(), Some("in use"));

        let body: ErrorBody = serde_json::from_str(r#"{"detail":"gone"}"#).expect("body");
        assert_eq!(body.into_message().as_deref(), Some("gone"));
    }

    #[test]
    fn comment_status_parses_wire_names() {
        assert_eq!("approved".parse::<CommentStatus>(), Ok(CommentStatus::Approved));
        let err = "spam".parse::<CommentStatus>().expect_err("unknown status");
        assert_eq!(err.to_string(), "unknown comment status: `spam`");
    }

    #[test]
    fn login_request_omits_absent_captcha() {
        let req = LoginRequest {
            username: "ada".into(),
            password: "pw".into(),
            captcha_id: None,
            captcha_code: None,
        };
        let value = serde_json::to_value(req).expect("serialize");
        assert!(value.get("captcha_id").is_none());
    }

    #[test]
    fn token_type_defaults_to_bearer() {
        let token: TokenResponse =
            serde_json::from_str(r#"{"access_token":"abc"}"#).expect("token");
        assert_eq!(token.token_type, "bearer");
    }
}
