use std::sync::Arc;

use httpmock::MockServer;
use quire::cache::{EntityCache, EntitySource};
use quire::domain::entities::{Category, Tag};
use quire::infra::http::ApiClient;
use serde_json::json;

fn category(id: i64, name: &str) -> Category {
    Category {
        id,
        name: name.to_string(),
        description: None,
        article_count: 0,
    }
}

fn client(server: &MockServer) -> Arc<ApiClient> {
    Arc::new(ApiClient::new(&server.base_url(), None).expect("client"))
}

#[tokio::test]
async fn added_entities_are_served_without_network() {
    let server = MockServer::start();
    let fetches: Vec<_> = [1, 2]
        .into_iter()
        .map(|id| {
            server.mock(|when, then| {
                when.method("GET").path(format!("/api/categories/{id}"));
                then.status(200)
                    .json_body(json!({"id": id, "name": "fetched"}));
            })
        })
        .collect();

    let source: Arc<dyn EntitySource<Category>> = client(&server);
    let cache = EntityCache::new(source, None, true);
    assert_eq!(cache.add_many([category(1, "Rust"), category(2, "Go")]), 2);

    for id in [1, 2] {
        let stored = cache.peek(id).expect("stored");
        let got = cache.get(id).await.expect("cached");
        assert!(Arc::ptr_eq(&stored, &got));
    }
    for fetch in &fetches {
        fetch.assert_hits(0);
    }
}

#[tokio::test]
async fn a_miss_is_fetched_once_then_cached() {
    let server = MockServer::start();
    let fetch = server.mock(|when, then| {
        when.method("GET").path("/api/tags/8");
        then.status(200)
            .json_body(json!({"id": 8, "name": "tokio", "article_count": 3}));
    });

    let source: Arc<dyn EntitySource<Tag>> = client(&server);
    let cache = EntityCache::new(source, None, true);

    let first = cache.get(8).await.expect("fetched");
    let second = cache.get(8).await.expect("cached");
    assert_eq!(first.name, "tokio");
    assert!(Arc::ptr_eq(&first, &second));
    fetch.assert_hits(1);
}

#[tokio::test]
async fn failed_lookup_is_absent_and_not_cached() {
    let server = MockServer::start();
    let fetch = server.mock(|when, then| {
        when.method("GET").path("/api/categories/404");
        then.status(404).json_body(json!({"detail": "Category not found"}));
    });

    let source: Arc<dyn EntitySource<Category>> = client(&server);
    let cache = EntityCache::new(source, None, true);

    assert!(cache.get(404).await.is_none());
    assert!(cache.get(404).await.is_none());
    assert!(cache.is_empty());
    fetch.assert_hits(2);
}

#[tokio::test]
async fn clear_forces_a_refetch() {
    let server = MockServer::start();
    let fetch = server.mock(|when, then| {
        when.method("GET").path("/api/categories/3");
        then.status(200).json_body(json!({"id": 3, "name": "Systems"}));
    });

    let source: Arc<dyn EntitySource<Category>> = client(&server);
    let cache = EntityCache::new(source, None, true);
    cache.add_many([category(3, "Systems")]);
    cache.clear();

    cache.get(3).await.expect("refetched");
    fetch.assert_hits(1);
}
