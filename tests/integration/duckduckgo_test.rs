// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use std::sync::Arc;
use std::time::Duration;

use serde_json::json;
use websift::domain::models::search_query::SearchQuery;
use websift::domain::search::engine::SearchError;
use websift::domain::services::search_service::SearchService;
use websift::infrastructure::search::duckduckgo::DuckDuckGoSearchEngine;
use websift::utils::errors::PipelineError;
use websift::utils::retry_policy::RetryPolicy;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use super::helpers::settings_for;

const RESULTS_PAGE: &str = r#"
<html><body>
  <div class="result results_links">
    <h2><a class="result__a" href="//duckduckgo.com/l/?uddg=https%3A%2F%2Fdocs.example.com%2Frust&amp;rut=1">Rust docs</a></h2>
    <a class="result__snippet">The Rust programming language book.</a>
  </div>
  <div class="result results_links">
    <h2><a class="result__a" href="https://youtu.be/abcdefghijk">Rust in 100 seconds</a></h2>
    <a class="result__snippet">A quick video intro.</a>
  </div>
</body></html>
"#;

fn engine(server: &MockServer) -> Arc<DuckDuckGoSearchEngine> {
    let settings = settings_for(server);
    Arc::new(DuckDuckGoSearchEngine::new(&settings.duckduckgo, Duration::from_secs(5)).unwrap())
}

async fn mount_text(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path("/html/"))
        .and(query_param("q", "rust language"))
        .and(query_param("kl", "wt-wt"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(RESULTS_PAGE, "text/html"))
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_text_and_images_through_server() {
    let server = MockServer::start().await;
    mount_text(&server).await;

    Mock::given(method("GET"))
        .and(path("/"))
        .and(query_param("q", "rust language"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_raw("<script>vqd='4-222333444'</script>", "text/html"),
        )
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/i.js"))
        .and(query_param("vqd", "4-222333444"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "results": [
                {"image": "https://img.example.com/ferris.png", "url": "https://rustacean.example.com", "title": "Ferris"},
                {"image": "", "url": "https://broken.example.com", "title": "Broken"}
            ]
        })))
        .mount(&server)
        .await;

    let service = SearchService::new(engine(&server), RetryPolicy::immediate(1));
    let query = SearchQuery::new("rust language").with_region("wt-wt");
    let bundle = service.search(&query, None).await.unwrap().unwrap();

    assert!(bundle
        .body
        .contains("<result 0>\nThe Rust programming language book.\n</result 0>"));
    assert!(bundle.body.contains("<result 1>\nA quick video intro.\n</result 1>"));
    assert_eq!(
        bundle.citations,
        "- [**Rust docs**](https://docs.example.com/rust)\n\
         - [**Ferris**](https://rustacean.example.com)\n"
    );
    assert_eq!(bundle.image_links, vec!["https://img.example.com/ferris.png"]);
    assert_eq!(bundle.video_links.len(), 1);
    assert_eq!(bundle.video_links[0].video_id, "abcdefghijk");
    assert!(bundle.related_questions.is_none());
}

#[tokio::test]
async fn test_missing_vqd_degrades_images() {
    let server = MockServer::start().await;
    mount_text(&server).await;

    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(ResponseTemplate::new(200).set_body_raw("<html></html>", "text/html"))
        .mount(&server)
        .await;

    let service = SearchService::new(engine(&server), RetryPolicy::immediate(1));
    let query = SearchQuery::new("rust language").with_region("wt-wt");
    let bundle = service.search(&query, None).await.unwrap().unwrap();

    assert!(bundle.image_links.is_empty());
    assert_eq!(bundle.citations, "- [**Rust docs**](https://docs.example.com/rust)\n");
}

#[tokio::test]
async fn test_blocked_text_search_is_rate_limit() {
    for status in [202, 301, 403] {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/html/"))
            .respond_with(
                ResponseTemplate::new(status)
                    .set_body_raw("<html>anomaly detected</html>", "text/html"),
            )
            .mount(&server)
            .await;

        let service = SearchService::new(engine(&server), RetryPolicy::immediate(1));
        let err = service
            .search(&SearchQuery::new("rust"), None)
            .await
            .unwrap_err();

        assert_eq!(err, SearchError::RateLimited, "HTTP {}", status);
        assert!(!PipelineError::from(err).invalidates_credentials());
    }
}
