// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use std::sync::Arc;

use serde_json::json;
use websift::config::settings::Settings;
use websift::domain::models::search_query::SearchQuery;
use websift::domain::models::search_result::{BODY_PREFIX, BODY_SUFFIX};
use websift::domain::services::crawl_service::DeepCrawler;
use websift::domain::services::location_search::LocationSearchService;
use websift::domain::services::search_service::SearchService;
use websift::infrastructure::location::LocationMatcher;
use websift::utils::retry_policy::RetryPolicy;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use super::helpers::{
    empty_images, empty_videos, html_page, mount_serpapi, serpapi_engine, settings_for, SERP_KEY,
};

const FIRST: &str = "Peter Cat has served chelo kebab on Park Street since the nineteen seventies.";
const SECOND: &str = "Reservations are not accepted so expect a queue during weekend dinner hours.";

async fn mount_pages(server: &MockServer, expected_fetches: u64) {
    Mock::given(method("GET"))
        .and(path("/page/1"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(
            html_page(&[FIRST, "Too short to keep.", SECOND]),
            "text/html; charset=utf-8",
        ))
        .expect(expected_fetches)
        .mount(server)
        .await;

    Mock::given(method("GET"))
        .and(path("/page/2"))
        .respond_with(ResponseTemplate::new(404))
        .expect(expected_fetches)
        .mount(server)
        .await;
}

async fn mount_search(server: &MockServer) {
    mount_serpapi(
        server,
        json!({
            "organic_results": [
                {"title": "Guide", "link": format!("{}/page/1", server.uri()), "snippet": "Snippet one"},
                {"title": "Gone", "link": format!("{}/page/2", server.uri()), "snippet": "Snippet two"}
            ]
        }),
        empty_images(),
        empty_videos(),
    )
    .await;
}

fn service(settings: &Settings, matcher: Option<Arc<LocationMatcher>>) -> LocationSearchService {
    let search = SearchService::new(serpapi_engine(settings), RetryPolicy::immediate(1));
    let crawler = DeepCrawler::with_reqwest(&settings.crawler).unwrap();
    LocationSearchService::new(search, Arc::new(crawler), matcher, settings.policy.clone())
}

fn shallow_body() -> String {
    format!(
        "{BODY_PREFIX}<result 0>\nSnippet one\n</result 0>\n\
         <result 1>\nSnippet two\n</result 1>\n{BODY_SUFFIX}"
    )
}

#[tokio::test]
async fn test_deep_body_within_bounds() {
    let server = MockServer::start().await;
    mount_search(&server).await;
    mount_pages(&server, 1).await;

    let mut settings = settings_for(&server);
    settings.policy.min_deep_words = 5;

    let bundle = service(&settings, None)
        .search(&SearchQuery::new("peter cat"), Some(SERP_KEY), true)
        .await
        .unwrap()
        .unwrap();

    assert_eq!(bundle.body, format!("{BODY_PREFIX}{FIRST} {SECOND}\n"));
    assert!(bundle.citations.contains("/page/1)"));
}

#[tokio::test]
async fn test_short_deep_body_falls_back_to_snippets() {
    let server = MockServer::start().await;
    mount_search(&server).await;
    mount_pages(&server, 1).await;

    // 默认至少需要 100 个词
    let settings = settings_for(&server);

    let bundle = service(&settings, None)
        .search(&SearchQuery::new("peter cat"), Some(SERP_KEY), true)
        .await
        .unwrap()
        .unwrap();

    assert_eq!(bundle.body, shallow_body());
}

#[tokio::test]
async fn test_long_deep_body_is_truncated() {
    let server = MockServer::start().await;
    mount_search(&server).await;
    mount_pages(&server, 1).await;

    let mut settings = settings_for(&server);
    settings.policy.min_deep_words = 5;
    settings.policy.max_deep_words = 4;

    let bundle = service(&settings, None)
        .search(&SearchQuery::new("peter cat"), Some(SERP_KEY), true)
        .await
        .unwrap()
        .unwrap();

    assert_eq!(
        bundle.body,
        format!("{BODY_PREFIX}Peter Cat has served\n{BODY_SUFFIX}")
    );
}

#[tokio::test]
async fn test_shallow_mode_skips_crawl() {
    let server = MockServer::start().await;
    mount_search(&server).await;
    mount_pages(&server, 0).await;

    let settings = settings_for(&server);

    let bundle = service(&settings, None)
        .search(&SearchQuery::new("peter cat"), Some(SERP_KEY), false)
        .await
        .unwrap()
        .unwrap();

    assert_eq!(bundle.body, shallow_body());
}

#[tokio::test]
async fn test_location_is_resolved_before_search() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/search.json"))
        .and(query_param("location", "Kolkata,West Bengal,India"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "organic_results": [
                {"title": "Guide", "link": "https://guide.example.com", "snippet": "Found it"}
            ]
        })))
        .expect(3)
        .mount(&server)
        .await;

    let settings = settings_for(&server);
    let matcher = LocationMatcher::new(vec![
        "Kolkata,West Bengal,India".to_string(),
        "Mumbai,Maharashtra,India".to_string(),
    ]);

    let query = SearchQuery::new("peter cat").with_location("kolkata");
    let bundle = service(&settings, Some(Arc::new(matcher)))
        .search(&query, Some(SERP_KEY), false)
        .await
        .unwrap()
        .unwrap();

    assert!(bundle.body.contains("Found it"));
}

#[tokio::test]
async fn test_failed_crawl_falls_back_to_snippets() {
    let server = MockServer::start().await;
    mount_search(&server).await;

    Mock::given(method("GET"))
        .and(path("/page/1"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/page/2"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let mut settings = settings_for(&server);
    settings.policy.min_deep_words = 5;

    let bundle = service(&settings, None)
        .search(&SearchQuery::new("peter cat"), Some(SERP_KEY), true)
        .await
        .unwrap()
        .unwrap();

    assert_eq!(bundle.body, shallow_body());
    assert!(bundle.citations.contains("/page/2)"));
}
