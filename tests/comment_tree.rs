use std::sync::Arc;

use httpmock::MockServer;
use quire::application::comments::CommentService;
use quire::config::CommentSettings;
use quire::domain::comments::Viewer;
use quire::infra::http::ApiClient;
use serde_json::{Value, json};

fn comment(id: i64, parent_id: Option<i64>, reply_count: u32) -> Value {
    json!({
        "id": id,
        "article_id": 12,
        "user_id": 2,
        "author": "ada",
        "content": format!("comment {id}"),
        "created_at": "2024-05-01T08:00:00Z",
        "status": "approved",
        "parent_id": parent_id,
        "reply_count": reply_count
    })
}

fn page(items: Vec<Value>, total: u64, page: u32, page_size: u32) -> Value {
    json!({ "items": items, "total": total, "page": page, "page_size": page_size })
}

fn service(server: &MockServer) -> CommentService {
    let client = ApiClient::new(&server.base_url(), None).expect("client");
    CommentService::new(Arc::new(client), CommentSettings::default())
}

#[tokio::test]
async fn second_reply_page_appends_to_the_first() {
    let server = MockServer::start();
    let top = server.mock(|when, then| {
        when.method("GET")
            .path("/api/articles/12/comments")
            .query_param("page", "1")
            .query_param("page_size", "10")
            .query_param("sort", "latest");
        then.status(200)
            .json_body(page(vec![comment(1, None, 7)], 1, 1, 10));
    });
    let first = server.mock(|when, then| {
        when.method("GET")
            .path("/api/comments/1/replies")
            .query_param("page", "1")
            .query_param("page_size", "5");
        then.status(200).json_body(page(
            (11..=15).map(|id| comment(id, Some(1), 0)).collect(),
            7,
            1,
            5,
        ));
    });
    let second = server.mock(|when, then| {
        when.method("GET")
            .path("/api/comments/1/replies")
            .query_param("page", "2")
            .query_param("page_size", "5");
        // 15 shows up again because a reply landed between the two requests
        then.status(200).json_body(page(
            vec![comment(15, Some(1), 0), comment(16, Some(1), 0), comment(17, Some(1), 0)],
            8,
            2,
            5,
        ));
    });

    let svc = service(&server);
    let mut thread = svc.open(12, Viewer::guest(), false);
    svc.load_page(&mut thread, 1).await.expect("top level");
    svc.load_replies(&mut thread, 1, 1).await.expect("page 1");
    svc.load_replies(&mut thread, 1, 2).await.expect("page 2");

    let node = thread.node(1).expect("parent loaded");
    let ids: Vec<i64> = node.replies.iter().map(|reply| reply.id).collect();
    assert_eq!(ids, vec![11, 12, 13, 14, 15, 16, 17]);
    let cursor = node.replies_cursor.expect("cursor");
    assert_eq!((cursor.page, cursor.total), (2, 8));

    top.assert();
    first.assert();
    second.assert();
}

#[tokio::test]
async fn exhausted_replies_do_not_hit_the_backend() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method("GET").path("/api/articles/12/comments");
        then.status(200)
            .json_body(page(vec![comment(1, None, 2)], 1, 1, 10));
    });
    let replies = server.mock(|when, then| {
        when.method("GET").path("/api/comments/1/replies");
        then.status(200).json_body(page(
            vec![comment(11, Some(1), 0), comment(12, Some(1), 0)],
            2,
            1,
            5,
        ));
    });

    let svc = service(&server);
    let mut thread = svc.open(12, Viewer::guest(), false);
    svc.load_page(&mut thread, 1).await.expect("top level");

    assert!(svc.load_more_replies(&mut thread, 1).await.expect("first page"));
    assert!(!svc.load_more_replies(&mut thread, 1).await.expect("exhausted"));
    replies.assert_hits(1);
}

#[tokio::test]
async fn admin_listing_asks_for_unmoderated_items() {
    let server = MockServer::start();
    let listing = server.mock(|when, then| {
        when.method("GET")
            .path("/api/articles/12/comments")
            .query_param("show_all", "true");
        then.status(200).json_body(page(
            vec![json!({
                "id": 5,
                "article_id": 12,
                "user_id": 9,
                "author": "mallory",
                "content": "spam",
                "created_at": "2024-05-01T08:00:00Z",
                "status": "pending"
            })],
            1,
            1,
            10,
        ));
    });

    let svc = service(&server);
    let mut thread = svc.open(12, Viewer::admin(1), true);
    svc.load_page(&mut thread, 1).await.expect("admin listing");

    listing.assert();
    assert_eq!(thread.nodes().len(), 1);
}
