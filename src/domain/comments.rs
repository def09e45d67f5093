//! Comment visibility and permission rules.

use crate::domain::entities::{Comment, UserProfile};
use crate::domain::types::{CommentStatus, Role};

/// The requester on whose behalf comments are fetched and filtered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Viewer {
    pub user_id: Option<i64>,
    pub role: Role,
}

impl Viewer {
    pub fn guest() -> Self {
        Self::default()
    }

    pub fn user(user_id: i64) -> Self {
        Self {
            user_id: Some(user_id),
            role: Role::User,
        }
    }

    pub fn admin(user_id: i64) -> Self {
        Self {
            user_id: Some(user_id),
            role: Role::Admin,
        }
    }

    pub fn is_privileged(&self) -> bool {
        self.role == Role::Admin
    }

    pub fn owns(&self, comment: &Comment) -> bool {
        self.user_id == Some(comment.user_id)
    }
}

impl From<&UserProfile> for Viewer {
    fn from(profile: &UserProfile) -> Self {
        Self {
            user_id: Some(profile.id),
            role: profile.role,
        }
    }
}

/// Visibility policy for one listing: who is looking, and whether they asked
/// to see unmoderated items.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Visibility {
    viewer: Viewer,
    show_all: bool,
}

impl Visibility {
    /// `show_all` only takes effect for privileged viewers.
    pub fn new(viewer: Viewer, show_all: bool) -> Self {
        Self {
            viewer,
            show_all: show_all && viewer.is_privileged(),
        }
    }

    pub fn viewer(&self) -> Viewer {
        self.viewer
    }

    /// Whether the backend should be asked for unapproved items.
    pub fn show_all(&self) -> bool {
        self.show_all
    }

    pub fn allows(&self, comment: &Comment) -> bool {
        match comment.status {
            CommentStatus::Approved => true,
            _ if self.show_all => true,
            CommentStatus::Pending => self.viewer.owns(comment),
            CommentStatus::Rejected => false,
        }
    }
}

/// Only the author or an admin may delete a comment.
pub fn can_delete(viewer: &Viewer, comment: &Comment) -> bool {
    viewer.is_privileged() || viewer.owns(comment)
}
