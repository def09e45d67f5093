//! REST adapter for the blog backend.

mod articles;
mod auth;
mod catalog;
mod client;
mod comments;
mod error;

pub use auth::AvatarUpload;
pub use client::{ApiClient, Query};
pub use error::ApiError;
