// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use serde_json::json;
use websift::domain::models::link_record::LinkKind;
use websift::domain::models::search_query::SearchQuery;
use websift::domain::models::search_result::{BODY_PREFIX, BODY_SUFFIX};
use websift::domain::search::engine::{SearchEngine, SearchError};
use websift::domain::services::search_service::SearchService;
use websift::utils::errors::PipelineError;
use websift::utils::retry_policy::RetryPolicy;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use super::helpers::{empty_videos, mount_serpapi, serpapi_engine, settings_for, SERP_KEY};

#[tokio::test]
async fn test_engine_search_bundle() {
    let server = MockServer::start().await;
    let settings = settings_for(&server);

    mount_serpapi(
        &server,
        json!({
            "organic_results": [
                {"title": "Peter Cat", "link": "https://petercat.example.com", "snippet": "Chelo kebab on Park Street", "source": "Food Guide"},
                {"title": "Walkthrough", "link": "https://www.youtube.com/watch?v=dQw4w9WgXcQ", "snippet": "A video tour"}
            ],
            "related_questions": [{"question": "Is Peter Cat open on Sunday?"}],
            "local_results": {"places": [{"title": "Peter Cat", "rating": 4.2}]}
        }),
        json!({
            "images_results": [
                {"original": "https://img.example.com/kebab.jpg", "link": "https://gallery.example.com/kebab", "title": "Kebab"},
                {"original": "https://img.example.com/kebab.jpg", "link": "https://gallery.example.com/kebab", "title": "Kebab"}
            ]
        }),
        json!({
            "video_results": [
                {"title": "Short tour", "link": "https://youtube.com/shorts/abcdefghijk"}
            ]
        }),
    )
    .await;

    let service = SearchService::new(serpapi_engine(&settings), RetryPolicy::immediate(1));
    let query = SearchQuery::new("peter cat").with_location("Kolkata");

    let bundle = service
        .search(&query, Some(SERP_KEY))
        .await
        .unwrap()
        .unwrap();

    assert_eq!(
        bundle.body,
        format!(
            "{BODY_PREFIX}<result 0>\nChelo kebab on Park Street\n</result 0>\n\
             <result 1>\nA video tour\n</result 1>\n{BODY_SUFFIX}"
        )
    );
    assert_eq!(
        bundle.citations,
        "- [**Food Guide**](https://petercat.example.com)\n\
         - [**Kebab**](https://gallery.example.com/kebab)\n\
         - [**Kebab**](https://gallery.example.com/kebab)\n"
    );
    assert_eq!(bundle.image_links, vec!["https://img.example.com/kebab.jpg"]);

    let ids: Vec<_> = bundle
        .video_links
        .iter()
        .map(|link| (link.video_id.as_str(), link.kind))
        .collect();
    assert_eq!(
        ids,
        vec![("dQw4w9WgXcQ", LinkKind::Video), ("abcdefghijk", LinkKind::Shorts)]
    );

    assert_eq!(bundle.related_questions.unwrap().len(), 1);
    assert_eq!(bundle.local_results.unwrap()["places"][0]["rating"], 4.2);
}

#[tokio::test]
async fn test_no_results_message_is_empty_page() {
    let server = MockServer::start().await;
    let settings = settings_for(&server);

    Mock::given(method("GET"))
        .and(path("/search.json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "error": "Google hasn't returned any results for this query."
        })))
        .mount(&server)
        .await;

    let engine = serpapi_engine(&settings);
    let hits = engine
        .text(&SearchQuery::new("zzqqxx"), Some(SERP_KEY))
        .await
        .unwrap();
    assert!(hits.is_empty());
}

#[tokio::test]
async fn test_unauthorized_key_invalidates_credentials() {
    let server = MockServer::start().await;
    let settings = settings_for(&server);

    Mock::given(method("GET"))
        .and(path("/search.json"))
        .respond_with(
            ResponseTemplate::new(401).set_body_json(json!({"error": "Invalid API key."})),
        )
        .mount(&server)
        .await;

    let service = SearchService::new(serpapi_engine(&settings), RetryPolicy::immediate(3));
    let err = service
        .search(&SearchQuery::new("peter cat"), Some("bad-key"))
        .await
        .unwrap_err();

    assert_eq!(err, SearchError::Unauthorized("Invalid API key.".to_string()));
    assert!(PipelineError::from(err).invalidates_credentials());
}

#[tokio::test]
async fn test_rate_limit_is_surfaced() {
    let server = MockServer::start().await;
    let settings = settings_for(&server);

    Mock::given(method("GET"))
        .and(path("/search.json"))
        .respond_with(ResponseTemplate::new(429))
        .mount(&server)
        .await;

    let service = SearchService::new(serpapi_engine(&settings), RetryPolicy::immediate(3));
    let err = service
        .search(&SearchQuery::new("peter cat"), Some(SERP_KEY))
        .await
        .unwrap_err();

    assert_eq!(err, SearchError::RateLimited);
}

#[tokio::test]
async fn test_server_error_gives_up_without_retry() {
    let server = MockServer::start().await;
    let settings = settings_for(&server);

    Mock::given(method("GET"))
        .and(path("/search.json"))
        .and(query_param("tbm", "vid"))
        .respond_with(ResponseTemplate::new(200).set_body_json(empty_videos()))
        .mount(&server)
        .await;

    // 网页与图片请求都返回 500
    Mock::given(method("GET"))
        .and(path("/search.json"))
        .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
        .expect(2)
        .mount(&server)
        .await;

    let service = SearchService::new(serpapi_engine(&settings), RetryPolicy::immediate(3));
    let result = service
        .search(&SearchQuery::new("peter cat"), Some(SERP_KEY))
        .await
        .unwrap();

    assert!(result.is_none());
}

#[tokio::test]
async fn test_missing_key_never_hits_network() {
    let server = MockServer::start().await;
    let settings = settings_for(&server);

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let service = SearchService::new(serpapi_engine(&settings), RetryPolicy::immediate(1));
    let err = service
        .search(&SearchQuery::new("peter cat"), None)
        .await
        .unwrap_err();

    assert_eq!(err, SearchError::MissingCredentials("serpapi"));
}
