//! Comment threads: paginated top-level lists, lazily loaded replies and the
//! local bookkeeping that follows a submit, delete or review.

use std::collections::HashSet;
use std::sync::Arc;

use serde::Serialize;
use tracing::{debug, info};

use quire_api_types::CommentCreateRequest;

use crate::application::error::AppError;
use crate::application::pagination::{self, PageCursor, Paged};
use crate::application::ports::{CommentApi, CommentListQuery};
use crate::config::CommentSettings;
use crate::domain::comments::{Viewer, Visibility, can_delete};
use crate::domain::entities::Comment;
use crate::domain::error::DomainError;
use crate::domain::types::{CommentSort, CommentStatus};

/// A top-level comment with whatever replies have been loaded so far.
#[derive(Debug, Clone, Serialize)]
pub struct CommentNode {
    pub comment: Comment,
    pub replies: Vec<Comment>,
    /// `None` until the first reply page is fetched.
    pub replies_cursor: Option<PageCursor>,
}

impl CommentNode {
    fn new(comment: Comment) -> Self {
        Self {
            comment,
            replies: Vec::new(),
            replies_cursor: None,
        }
    }

    pub fn has_more_replies(&self) -> bool {
        match self.replies_cursor {
            Some(cursor) => cursor.has_more(),
            None => self.comment.reply_count > 0,
        }
    }
}

/// Client-side state of one article's comment section.
#[derive(Debug, Clone)]
pub struct CommentThread {
    article_id: i64,
    sort: CommentSort,
    visibility: Visibility,
    page_size: u32,
    reply_page_size: u32,
    nodes: Vec<CommentNode>,
    cursor: Option<PageCursor>,
}

impl CommentThread {
    pub fn article_id(&self) -> i64 {
        self.article_id
    }

    pub fn sort(&self) -> CommentSort {
        self.sort
    }

    /// Takes effect on the next [`CommentService::load_page`].
    pub fn set_sort(&mut self, sort: CommentSort) {
        self.sort = sort;
    }

    pub fn visibility(&self) -> Visibility {
        self.visibility
    }

    pub fn nodes(&self) -> &[CommentNode] {
        &self.nodes
    }

    pub fn cursor(&self) -> Option<PageCursor> {
        self.cursor
    }

    pub fn node(&self, id: i64) -> Option<&CommentNode> {
        self.nodes.iter().find(|node| node.comment.id == id)
    }

    fn node_mut(&mut self, id: i64) -> Option<&mut CommentNode> {
        self.nodes.iter_mut().find(|node| node.comment.id == id)
    }

    /// Locate a comment anywhere in the thread.
    pub fn find(&self, id: i64) -> Option<&Comment> {
        self.nodes.iter().find_map(|node| {
            if node.comment.id == id {
                Some(&node.comment)
            } else {
                node.replies.iter().find(|reply| reply.id == id)
            }
        })
    }

    fn find_mut(&mut self, id: i64) -> Option<&mut Comment> {
        self.nodes.iter_mut().find_map(|node| {
            if node.comment.id == id {
                Some(&mut node.comment)
            } else {
                node.replies.iter_mut().find(|reply| reply.id == id)
            }
        })
    }

    /// Drop a comment from the thread, adjusting the owning cursor's total.
    fn remove(&mut self, id: i64) -> Option<Comment> {
        if let Some(index) = self.nodes.iter().position(|node| node.comment.id == id) {
            let node = self.nodes.remove(index);
            self.cursor = self.cursor.map(PageCursor::removed);
            return Some(node.comment);
        }
        for node in &mut self.nodes {
            if let Some(index) = node.replies.iter().position(|reply| reply.id == id) {
                node.replies_cursor = node.replies_cursor.map(PageCursor::removed);
                return Some(node.replies.remove(index));
            }
        }
        None
    }

    /// Place a new top-level comment where the server will list it, if that
    /// position is on screen.
    fn insert_top_level(&mut self, comment: Comment) {
        match self.sort {
            CommentSort::Latest => {
                if self.cursor.is_none_or(|cursor| cursor.page == 1) {
                    self.nodes.insert(0, CommentNode::new(comment));
                }
                self.cursor = self.cursor.map(PageCursor::inserted);
            }
            CommentSort::Oldest | CommentSort::Popular => {
                if self.cursor.is_none_or(|cursor| !cursor.has_more()) {
                    self.nodes.push(CommentNode::new(comment));
                    self.cursor = self.cursor.map(PageCursor::inserted);
                } else {
                    self.cursor = self.cursor.map(PageCursor::grew);
                }
            }
        }
    }
}

/// Result of a successful submission.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "outcome", content = "comment", rename_all = "snake_case")]
pub enum SubmitOutcome {
    /// Visible to everyone right away.
    Published(Comment),
    /// Held for moderation.
    AwaitingReview(Comment),
}

impl SubmitOutcome {
    pub fn comment(&self) -> &Comment {
        match self {
            SubmitOutcome::Published(comment) | SubmitOutcome::AwaitingReview(comment) => comment,
        }
    }
}

pub struct CommentService {
    api: Arc<dyn CommentApi>,
    settings: CommentSettings,
}

impl CommentService {
    pub fn new(api: Arc<dyn CommentApi>, settings: CommentSettings) -> Self {
        Self { api, settings }
    }

    /// Empty thread for `article_id`; nothing is fetched until [`Self::load_page`].
    pub fn open(&self, article_id: i64, viewer: Viewer, show_all: bool) -> CommentThread {
        CommentThread {
            article_id,
            sort: self.settings.sort,
            visibility: Visibility::new(viewer, show_all),
            page_size: self.settings.page_size.get(),
            reply_page_size: self.settings.reply_page_size.get(),
            nodes: Vec::new(),
            cursor: None,
        }
    }

    /// Fetch top-level page `page`, replacing whatever was on screen.
    pub async fn load_page(&self, thread: &mut CommentThread, page: u32) -> Result<(), AppError> {
        pagination::validate(page, thread.page_size)?;
        let query = CommentListQuery {
            article_id: thread.article_id,
            page,
            page_size: thread.page_size,
            sort: thread.sort,
            show_all: thread.visibility.show_all(),
        };
        let response = self.api.list_article_comments(&query).await?;
        let cursor = PageCursor::from_response(&response);
        let visibility = thread.visibility;
        thread.nodes = response
            .items
            .into_iter()
            .filter(|comment| visibility.allows(comment))
            .map(CommentNode::new)
            .collect();
        thread.cursor = Some(cursor);
        debug!(
            article_id = thread.article_id,
            page,
            shown = thread.nodes.len(),
            total = cursor.total,
            "comment page loaded"
        );
        Ok(())
    }

    /// Fetch reply page `page` of `parent_id`.
    ///
    /// Page 1 replaces the loaded replies; later pages append, skipping IDs
    /// already present.
    pub async fn load_replies(
        &self,
        thread: &mut CommentThread,
        parent_id: i64,
        page: u32,
    ) -> Result<(), AppError> {
        self.fetch_replies(thread, parent_id, page, page == 1).await
    }

    async fn fetch_replies(
        &self,
        thread: &mut CommentThread,
        parent_id: i64,
        page: u32,
        replace: bool,
    ) -> Result<(), AppError> {
        pagination::validate(page, thread.reply_page_size)?;
        if thread.node(parent_id).is_none() {
            return Err(DomainError::not_found("comment").into());
        }
        let response = self
            .api
            .list_replies(parent_id, page, thread.reply_page_size)
            .await?;
        let cursor = PageCursor::from_response(&response);
        let visibility = thread.visibility;
        let node = thread
            .node_mut(parent_id)
            .ok_or_else(|| DomainError::not_found("comment"))?;

        if replace {
            node.replies.clear();
        }
        let mut seen: HashSet<i64> = node.replies.iter().map(|reply| reply.id).collect();
        node.replies.extend(
            response
                .items
                .into_iter()
                .filter(|reply| visibility.allows(reply))
                .filter(|reply| seen.insert(reply.id)),
        );
        node.replies_cursor = Some(cursor);
        debug!(parent_id, page, loaded = node.replies.len(), "replies loaded");
        Ok(())
    }

    /// Append the next unread reply page; returns `false` without a request
    /// once every reply is loaded.
    pub async fn load_more_replies(
        &self,
        thread: &mut CommentThread,
        parent_id: i64,
    ) -> Result<bool, AppError> {
        let node = thread
            .node(parent_id)
            .ok_or_else(|| DomainError::not_found("comment"))?;
        let (next, replace) = match node.replies_cursor {
            Some(cursor) => (cursor.next_page(), false),
            None => (node.has_more_replies().then_some(1), true),
        };
        let Some(page) = next else {
            return Ok(false);
        };
        let before = node.replies_cursor.map(|cursor| cursor.loaded);
        self.fetch_replies(thread, parent_id, page, replace).await?;
        let after = thread
            .node(parent_id)
            .and_then(|node| node.replies_cursor)
            .map(|cursor| cursor.loaded);
        if before.is_some() && after <= before {
            debug!(parent_id, page, "reply page brought nothing new");
            return Ok(false);
        }
        Ok(true)
    }

    /// Post a comment, or a reply when `parent_id` is set.
    pub async fn submit(
        &self,
        thread: &mut CommentThread,
        content: &str,
        parent_id: Option<i64>,
    ) -> Result<SubmitOutcome, AppError> {
        let viewer = thread.visibility.viewer();
        if viewer.user_id.is_none() {
            return Err(DomainError::forbidden("sign in to comment").into());
        }
        let content = content.trim();
        if content.is_empty() {
            return Err(AppError::validation("comment must not be empty"));
        }
        if parent_id.is_some_and(|parent| thread.node(parent).is_none()) {
            return Err(DomainError::not_found("comment").into());
        }

        let request = CommentCreateRequest {
            article_id: thread.article_id,
            content: content.to_string(),
            parent_id,
        };
        let created = self.api.create_comment(&request).await?;
        info!(
            id = created.id,
            article_id = thread.article_id,
            status = %created.status,
            "comment submitted"
        );

        let published = created.status == CommentStatus::Approved;
        if thread.visibility.allows(&created) {
            match parent_id {
                Some(parent) => {
                    if let Some(node) = thread.node_mut(parent) {
                        if published && viewer.is_privileged() {
                            node.comment.reply_count += 1;
                        }
                        let cursor = node.replies_cursor;
                        match cursor {
                            Some(cursor) if cursor.has_more() => {
                                node.replies_cursor = Some(cursor.grew());
                            }
                            cursor => {
                                node.replies_cursor = cursor.map(PageCursor::inserted);
                                node.replies.push(created.clone());
                            }
                        }
                    }
                }
                None => thread.insert_top_level(created.clone()),
            }
        }

        Ok(if published {
            SubmitOutcome::Published(created)
        } else {
            SubmitOutcome::AwaitingReview(created)
        })
    }

    pub async fn delete(&self, thread: &mut CommentThread, id: i64) -> Result<(), AppError> {
        let viewer = thread.visibility.viewer();
        let comment = thread
            .find(id)
            .ok_or_else(|| DomainError::not_found("comment"))?;
        if !can_delete(&viewer, comment) {
            return Err(DomainError::forbidden("only the author or an admin may delete").into());
        }
        self.api.delete_comment(id).await?;
        thread.remove(id);
        info!(id, "comment deleted");
        Ok(())
    }

    /// Moderate a comment; the server's copy replaces the local one.
    pub async fn review(
        &self,
        thread: &mut CommentThread,
        id: i64,
        status: CommentStatus,
    ) -> Result<Comment, AppError> {
        if !thread.visibility.viewer().is_privileged() {
            return Err(DomainError::forbidden("only admins may review comments").into());
        }
        let reviewed = self.api.review_comment(id, status).await?;
        info!(id, status = %reviewed.status, "comment reviewed");

        if thread.visibility.allows(&reviewed) {
            if let Some(local) = thread.find_mut(id) {
                *local = reviewed.clone();
            }
        } else {
            thread.remove(id);
        }
        Ok(reviewed)
    }

    /// Comments written by one user, newest first.
    pub async fn user_comments(
        &self,
        user_id: i64,
        page: u32,
        page_size: u32,
    ) -> Result<Paged<Comment>, AppError> {
        pagination::validate(page, page_size)?;
        let response = self
            .api
            .list_user_comments(user_id, page, page_size)
            .await?;
        Ok(response.into())
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::num::NonZeroU32;
    use std::sync::Mutex;

    use async_trait::async_trait;
    use quire_api_types::PageResponse;
    use time::macros::datetime;

    use super::*;
    use crate::infra::http::ApiError;

    fn comment(id: i64, user_id: i64, status: CommentStatus, parent_id: Option<i64>) -> Comment {
        Comment {
            id,
            article_id: 1,
            user_id,
            author: format!("user{user_id}"),
            avatar: None,
            content: format!("comment {id}"),
            created_at: datetime!(2024-05-01 08:00 UTC),
            status,
            parent_id,
            reply_count: 0,
        }
    }

    #[derive(Default)]
    struct StubComments {
        top_level: Vec<Comment>,
        replies: Mutex<HashMap<i64, Vec<Comment>>>,
        reply_requests: Mutex<Vec<(i64, u32)>>,
        list_queries: Mutex<Vec<CommentListQuery>>,
        create_status: Option<CommentStatus>,
        deleted: Mutex<Vec<i64>>,
    }

    fn page_of(items: &[Comment], page: u32, page_size: u32) -> PageResponse<Comment> {
        let start = ((page - 1) * page_size) as usize;
        PageResponse {
            items: items
                .iter()
                .skip(start)
                .take(page_size as usize)
                .cloned()
                .collect(),
            total: items.len() as u64,
            page,
            page_size,
        }
    }

    #[async_trait]
    impl CommentApi for StubComments {
        async fn list_article_comments(
            &self,
            query: &CommentListQuery,
        ) -> Result<PageResponse<Comment>, ApiError> {
            self.list_queries.lock().unwrap().push(*query);
            Ok(page_of(&self.top_level, query.page, query.page_size))
        }

        async fn list_replies(
            &self,
            parent_id: i64,
            page: u32,
            page_size: u32,
        ) -> Result<PageResponse<Comment>, ApiError> {
            self.reply_requests.lock().unwrap().push((parent_id, page));
            let replies = self
                .replies
                .lock()
                .unwrap()
                .get(&parent_id)
                .cloned()
                .unwrap_or_default();
            Ok(page_of(&replies, page, page_size))
        }

        async fn list_user_comments(
            &self,
            user_id: i64,
            page: u32,
            page_size: u32,
        ) -> Result<PageResponse<Comment>, ApiError> {
            let mine: Vec<Comment> = self
                .top_level
                .iter()
                .filter(|c| c.user_id == user_id)
                .cloned()
                .collect();
            Ok(page_of(&mine, page, page_size))
        }

        async fn create_comment(
            &self,
            request: &CommentCreateRequest,
        ) -> Result<Comment, ApiError> {
            let mut created = comment(
                500,
                3,
                self.create_status.unwrap_or(CommentStatus::Pending),
                request.parent_id,
            );
            created.content = request.content.clone();
            Ok(created)
        }

        async fn delete_comment(&self, id: i64) -> Result<(), ApiError> {
            self.deleted.lock().unwrap().push(id);
            for replies in self.replies.lock().unwrap().values_mut() {
                replies.retain(|reply| reply.id != id);
            }
            Ok(())
        }

        async fn review_comment(
            &self,
            id: i64,
            status: CommentStatus,
        ) -> Result<Comment, ApiError> {
            Ok(comment(id, 2, status, None))
        }
    }

    fn settings() -> CommentSettings {
        CommentSettings {
            page_size: NonZeroU32::new(2).unwrap(),
            reply_page_size: NonZeroU32::new(2).unwrap(),
            sort: CommentSort::Latest,
        }
    }

    fn stub_with_replies() -> StubComments {
        let mut parent = comment(1, 2, CommentStatus::Approved, None);
        parent.reply_count = 3;
        let replies = vec![
            comment(11, 4, CommentStatus::Approved, Some(1)),
            comment(12, 5, CommentStatus::Approved, Some(1)),
            comment(13, 6, CommentStatus::Approved, Some(1)),
        ];
        StubComments {
            top_level: vec![parent, comment(2, 3, CommentStatus::Approved, None)],
            replies: Mutex::new(HashMap::from([(1, replies)])),
            ..Default::default()
        }
    }

    fn reply_ids(thread: &CommentThread, parent: i64) -> Vec<i64> {
        thread
            .node(parent)
            .map(|node| node.replies.iter().map(|r| r.id).collect())
            .unwrap_or_default()
    }

    #[tokio::test]
    async fn top_level_page_replaces_and_drops_reply_state() {
        let stub = Arc::new(stub_with_replies());
        let svc = CommentService::new(stub.clone(), settings());
        let mut thread = svc.open(1, Viewer::guest(), false);

        svc.load_page(&mut thread, 1).await.expect("page 1");
        svc.load_replies(&mut thread, 1, 1).await.expect("replies");
        assert_eq!(reply_ids(&thread, 1), vec![11, 12]);

        svc.load_page(&mut thread, 1).await.expect("reload");
        assert_eq!(thread.nodes().len(), 2);
        assert!(thread.node(1).unwrap().replies.is_empty());
        assert_eq!(thread.cursor().unwrap().total, 2);
    }

    #[tokio::test]
    async fn reply_pages_after_the_first_append() {
        let stub = Arc::new(stub_with_replies());
        let svc = CommentService::new(stub.clone(), settings());
        let mut thread = svc.open(1, Viewer::guest(), false);
        svc.load_page(&mut thread, 1).await.expect("page");

        assert!(svc.load_more_replies(&mut thread, 1).await.expect("first"));
        assert!(svc.load_more_replies(&mut thread, 1).await.expect("second"));
        assert_eq!(reply_ids(&thread, 1), vec![11, 12, 13]);

        assert!(!svc.load_more_replies(&mut thread, 1).await.expect("exhausted"));
        assert_eq!(*stub.reply_requests.lock().unwrap(), vec![(1, 1), (1, 2)]);
    }

    #[tokio::test]
    async fn reloading_reply_page_one_replaces() {
        let stub = Arc::new(stub_with_replies());
        let svc = CommentService::new(stub, settings());
        let mut thread = svc.open(1, Viewer::guest(), false);
        svc.load_page(&mut thread, 1).await.expect("page");

        svc.load_replies(&mut thread, 1, 1).await.expect("p1");
        svc.load_replies(&mut thread, 1, 2).await.expect("p2");
        svc.load_replies(&mut thread, 1, 2).await.expect("p2 again");
        assert_eq!(reply_ids(&thread, 1), vec![11, 12, 13]);

        svc.load_replies(&mut thread, 1, 1).await.expect("p1 again");
        assert_eq!(reply_ids(&thread, 1), vec![11, 12]);
    }

    #[tokio::test]
    async fn show_all_is_only_sent_for_admins() {
        let stub = Arc::new(StubComments {
            top_level: vec![
                comment(1, 2, CommentStatus::Approved, None),
                comment(2, 2, CommentStatus::Rejected, None),
            ],
            ..Default::default()
        });
        let svc = CommentService::new(stub.clone(), settings());

        let mut user_thread = svc.open(1, Viewer::user(9), true);
        svc.load_page(&mut user_thread, 1).await.expect("user");
        assert_eq!(user_thread.nodes().len(), 1);

        let mut admin_thread = svc.open(1, Viewer::admin(1), true);
        svc.load_page(&mut admin_thread, 1).await.expect("admin");
        assert_eq!(admin_thread.nodes().len(), 2);

        let queries = stub.list_queries.lock().unwrap();
        assert!(!queries[0].show_all);
        assert!(queries[1].show_all);
    }

    #[tokio::test]
    async fn admin_reply_bumps_reply_count() {
        let stub = Arc::new(StubComments {
            create_status: Some(CommentStatus::Approved),
            ..stub_with_replies()
        });
        let svc = CommentService::new(stub, settings());
        let mut thread = svc.open(1, Viewer::admin(3), false);
        svc.load_page(&mut thread, 1).await.expect("page");

        let outcome = svc
            .submit(&mut thread, "thanks!", Some(1))
            .await
            .expect("submit");
        assert!(matches!(outcome, SubmitOutcome::Published(_)));
        let node = thread.node(1).unwrap();
        assert_eq!(node.comment.reply_count, 4);
        assert_eq!(node.replies.last().map(|r| r.id), Some(500));
    }

    #[tokio::test]
    async fn pending_reply_leaves_count_alone() {
        let stub = Arc::new(stub_with_replies());
        let svc = CommentService::new(stub, settings());
        let mut thread = svc.open(1, Viewer::user(3), false);
        svc.load_page(&mut thread, 1).await.expect("page");

        let outcome = svc
            .submit(&mut thread, "first!", Some(1))
            .await
            .expect("submit");
        assert!(matches!(outcome, SubmitOutcome::AwaitingReview(_)));
        let node = thread.node(1).unwrap();
        assert_eq!(node.comment.reply_count, 3);
        // authors still see their own pending reply
        assert_eq!(node.replies.last().map(|r| r.id), Some(500));
    }

    #[tokio::test]
    async fn guests_and_blank_content_are_rejected_locally() {
        let svc = CommentService::new(Arc::new(StubComments::default()), settings());
        let mut guest = svc.open(1, Viewer::guest(), false);
        assert!(matches!(
            svc.submit(&mut guest, "hi", None).await,
            Err(AppError::Domain(DomainError::Forbidden { .. }))
        ));

        let mut user = svc.open(1, Viewer::user(3), false);
        assert!(matches!(
            svc.submit(&mut user, "   ", None).await,
            Err(AppError::Domain(DomainError::Validation { .. }))
        ));
    }

    #[tokio::test]
    async fn delete_checks_ownership_before_calling_backend() {
        let stub = Arc::new(stub_with_replies());
        let svc = CommentService::new(stub.clone(), settings());
        let mut thread = svc.open(1, Viewer::user(3), false);
        svc.load_page(&mut thread, 1).await.expect("page");

        assert!(matches!(
            svc.delete(&mut thread, 1).await,
            Err(AppError::Domain(DomainError::Forbidden { .. }))
        ));
        assert!(stub.deleted.lock().unwrap().is_empty());

        svc.delete(&mut thread, 2).await.expect("own comment");
        assert!(thread.node(2).is_none());
        assert_eq!(thread.cursor().unwrap().total, 1);
    }

    #[tokio::test]
    async fn review_can_hide_a_comment() {
        let stub = Arc::new(StubComments {
            top_level: vec![comment(7, 2, CommentStatus::Pending, None)],
            ..Default::default()
        });
        let svc = CommentService::new(stub, settings());

        let mut user_thread = svc.open(1, Viewer::user(2), false);
        assert!(matches!(
            svc.review(&mut user_thread, 7, CommentStatus::Approved).await,
            Err(AppError::Domain(DomainError::Forbidden { .. }))
        ));

        let mut thread = svc.open(1, Viewer::admin(1), false);
        svc.load_page(&mut thread, 1).await.expect("page");
        assert!(thread.node(7).is_none());

        let mut moderating = svc.open(1, Viewer::admin(1), true);
        svc.load_page(&mut moderating, 1).await.expect("page");
        svc.review(&mut moderating, 7, CommentStatus::Approved)
            .await
            .expect("approve");
        assert_eq!(
            moderating.find(7).map(|c| c.status),
            Some(CommentStatus::Approved)
        );

        svc.review(&mut thread, 7, CommentStatus::Rejected)
            .await
            .expect("reject");
        assert!(thread.find(7).is_none());
    }

    fn three_top_level() -> StubComments {
        StubComments {
            top_level: vec![
                comment(1, 2, CommentStatus::Approved, None),
                comment(2, 3, CommentStatus::Approved, None),
                comment(3, 4, CommentStatus::Approved, None),
            ],
            create_status: Some(CommentStatus::Approved),
            ..Default::default()
        }
    }

    fn node_ids(thread: &CommentThread) -> Vec<i64> {
        thread.nodes().iter().map(|node| node.comment.id).collect()
    }

    #[tokio::test]
    async fn deleting_a_reply_keeps_later_replies_reachable() {
        let stub = Arc::new(stub_with_replies());
        let svc = CommentService::new(stub.clone(), settings());
        let mut thread = svc.open(1, Viewer::user(5), false);
        svc.load_page(&mut thread, 1).await.expect("page");
        assert!(svc.load_more_replies(&mut thread, 1).await.expect("first"));

        svc.delete(&mut thread, 12).await.expect("own reply");
        assert_eq!(reply_ids(&thread, 1), vec![11]);
        let cursor = thread.node(1).unwrap().replies_cursor.unwrap();
        assert_eq!(cursor.total, 2);
        assert!(cursor.has_more());

        // reply 13 slid onto page 1 once 12 was gone
        assert!(svc.load_more_replies(&mut thread, 1).await.expect("more"));
        assert_eq!(reply_ids(&thread, 1), vec![11, 13]);
        assert!(!svc.load_more_replies(&mut thread, 1).await.expect("done"));
        assert_eq!(*stub.reply_requests.lock().unwrap(), vec![(1, 1), (1, 1)]);
    }

    #[tokio::test]
    async fn rejecting_a_reply_hides_it_and_rewinds_its_cursor() {
        let stub = Arc::new(stub_with_replies());
        let svc = CommentService::new(stub, settings());
        let mut thread = svc.open(1, Viewer::admin(1), false);
        svc.load_page(&mut thread, 1).await.expect("page");
        svc.load_replies(&mut thread, 1, 1).await.expect("replies");

        svc.review(&mut thread, 12, CommentStatus::Rejected)
            .await
            .expect("reject");
        assert_eq!(reply_ids(&thread, 1), vec![11]);
        let cursor = thread.node(1).unwrap().replies_cursor.unwrap();
        assert_eq!(cursor.total, 2);
        assert_eq!(cursor.next_page(), Some(1));
    }

    #[tokio::test]
    async fn deleting_a_top_level_comment_rewinds_next_page() {
        let stub = Arc::new(three_top_level());
        let svc = CommentService::new(stub, settings());
        let mut thread = svc.open(1, Viewer::user(3), false);
        svc.load_page(&mut thread, 1).await.expect("page");
        assert_eq!(thread.cursor().unwrap().next_page(), Some(2));

        svc.delete(&mut thread, 2).await.expect("own comment");
        let cursor = thread.cursor().unwrap();
        assert_eq!(cursor.total, 2);
        assert_eq!(cursor.next_page(), Some(1));
    }

    #[tokio::test]
    async fn latest_comment_is_prepended_only_on_the_first_page() {
        let stub = Arc::new(three_top_level());
        let svc = CommentService::new(stub, settings());

        let mut later = svc.open(1, Viewer::admin(3), false);
        svc.load_page(&mut later, 2).await.expect("page 2");
        svc.submit(&mut later, "news", None).await.expect("submit");
        assert_eq!(node_ids(&later), vec![3]);
        assert_eq!(later.cursor().unwrap().total, 4);

        let mut first = svc.open(1, Viewer::admin(3), false);
        svc.load_page(&mut first, 1).await.expect("page 1");
        svc.submit(&mut first, "news", None).await.expect("submit");
        assert_eq!(node_ids(&first), vec![500, 1, 2]);
        assert_eq!(first.cursor().unwrap().next_page(), Some(2));
    }

    #[tokio::test]
    async fn reply_waits_for_its_page_while_earlier_replies_are_unloaded() {
        let stub = Arc::new(StubComments {
            create_status: Some(CommentStatus::Approved),
            ..stub_with_replies()
        });
        let svc = CommentService::new(stub, settings());
        let mut thread = svc.open(1, Viewer::admin(3), false);
        svc.load_page(&mut thread, 1).await.expect("page");
        svc.load_replies(&mut thread, 1, 1).await.expect("replies");

        svc.submit(&mut thread, "late", Some(1)).await.expect("submit");
        assert_eq!(reply_ids(&thread, 1), vec![11, 12]);
        let node = thread.node(1).unwrap();
        assert_eq!(node.comment.reply_count, 4);
        assert_eq!(node.replies_cursor.unwrap().total, 4);
        assert_eq!(node.replies_cursor.unwrap().next_page(), Some(2));
    }
}
