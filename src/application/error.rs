use std::error::Error as StdError;

use serde::Serialize;
use thiserror::Error;
use tracing::warn;

use crate::application::pagination::PaginationError;
use crate::domain::error::DomainError;
use crate::infra::http::ApiError;

#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    Domain(#[from] DomainError),
    #[error(transparent)]
    Api(#[from] ApiError),
    #[error(transparent)]
    Pagination(#[from] PaginationError),
}

impl AppError {
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Domain(DomainError::validation(message))
    }

    /// User-facing rendering of this error.
    pub fn notice(&self) -> Notice {
        match self {
            AppError::Api(err) if err.is_conflict() => Notice::blocking(
                "Action blocked",
                api_message(err).unwrap_or("The resource is still in use."),
            ),
            AppError::Api(err) if err.is_unauthorized() => {
                Notice::toast("Please sign in", "Your session is missing or has expired.")
            }
            AppError::Api(err) if err.is_not_found() => {
                Notice::toast("Not found", "The requested item no longer exists.")
            }
            AppError::Api(ApiError::Status { message, .. }) => {
                Notice::toast("Request failed", message.as_str())
            }
            AppError::Api(_) => Notice::toast(
                "Network error",
                "The server could not be reached. Try again shortly.",
            ),
            AppError::Domain(DomainError::Forbidden { message }) => {
                Notice::toast("Not allowed", message.as_str())
            }
            AppError::Domain(DomainError::NotFound { entity }) => {
                Notice::toast("Not found", format!("The {entity} is not loaded."))
            }
            AppError::Domain(DomainError::Validation { message }) => {
                Notice::toast("Check your input", message.as_str())
            }
            AppError::Pagination(err) => Notice::toast("Check your input", err.to_string()),
        }
    }

    /// Log the failure for operation `op` and return the notice to show.
    pub fn report(&self, op: &'static str) -> Notice {
        let chain = error_chain(self);
        warn!(op, error = %self, chain = ?chain, "operation failed");
        self.notice()
    }
}

fn api_message(err: &ApiError) -> Option<&str> {
    match err {
        ApiError::Status { message, .. } if !message.trim().is_empty() => Some(message.as_str()),
        _ => None,
    }
}

/// Messages of `error` and all of its sources, outermost first.
pub fn error_chain(error: &dyn StdError) -> Vec<String> {
    let mut messages = vec![error.to_string()];
    let mut current = error.source();
    while let Some(inner) = current {
        messages.push(inner.to_string());
        current = inner.source();
    }
    messages
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum NoticeLevel {
    /// Transient message that dismisses itself.
    Toast,
    /// Dialog the user has to acknowledge.
    Blocking,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notice {
    pub level: NoticeLevel,
    pub title: &'static str,
    pub message: String,
}

impl Notice {
    pub fn toast(title: &'static str, message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Toast,
            title,
            message: message.into(),
        }
    }

    pub fn blocking(title: &'static str, message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Blocking,
            title,
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use reqwest::StatusCode;

    use super::*;

    #[test]
    fn conflict_becomes_blocking_dialog() {
        let err = AppError::from(ApiError::status(
            StatusCode::CONFLICT,
            "tag is used by 3 articles",
        ));
        let notice = err.notice();
        assert_eq!(notice.level, NoticeLevel::Blocking);
        assert_eq!(notice.message, "tag is used by 3 articles");
    }

    #[test]
    fn conflict_without_body_uses_fallback_text() {
        let err = AppError::from(ApiError::status(StatusCode::CONFLICT, " "));
        assert_eq!(err.notice().message, "The resource is still in use.");
    }

    #[test]
    fn other_failures_are_toasts() {
        let server = AppError::from(ApiError::status(StatusCode::BAD_GATEWAY, "upstream down"));
        assert_eq!(server.notice().level, NoticeLevel::Toast);
        assert_eq!(server.notice().message, "upstream down");

        let auth = AppError::from(ApiError::status(StatusCode::UNAUTHORIZED, ""));
        assert_eq!(auth.notice().title, "Please sign in");

        let forbidden = AppError::from(DomainError::forbidden("only the author may delete"));
        assert_eq!(forbidden.notice().level, NoticeLevel::Toast);
    }

    #[test]
    fn error_chain_walks_sources() {
        let io = std::io::Error::other("disk full");
        let err = ApiError::File {
            path: "/tmp/a.png".into(),
            source: io,
        };
        let chain = error_chain(&err);
        assert_eq!(chain.len(), 2);
        assert_eq!(chain[1], "disk full");
    }
}
