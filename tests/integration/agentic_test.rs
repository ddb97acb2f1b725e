// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use std::sync::Arc;
use std::time::Duration;

use serde_json::json;
use websift::domain::services::agentic_search::AgenticSearch;
use websift::domain::services::crawl_service::DeepCrawler;
use websift::domain::services::llm_service::LLMService;
use websift::domain::services::search_service::SearchService;
use websift::infrastructure::search::duckduckgo::DuckDuckGoSearchEngine;
use websift::utils::retry_policy::RetryPolicy;
use wiremock::matchers::{body_string_contains, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use super::helpers::{html_page, settings_for};

const PARAGRAPH: &str =
    "Every value in Rust has a single owner and the value is dropped when the owner leaves scope.";

fn completion(content: &str) -> serde_json::Value {
    json!({ "choices": [{ "message": { "role": "assistant", "content": content } }] })
}

#[tokio::test]
async fn test_agentic_search_end_to_end() {
    let server = MockServer::start().await;

    let plan = json!({
        "objectives": [
            {"description": "Learn ownership", "search_strings": ["rust ownership"]}
        ],
        "final_objective": "Explain ownership to a beginner"
    });

    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .and(header("authorization", "Bearer llm-key"))
        .and(body_string_contains("The user prompt is: how does rust ownership work"))
        .respond_with(ResponseTemplate::new(200).set_body_json(completion(&plan.to_string())))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .and(body_string_contains("Explain ownership to a beginner"))
        .and(body_string_contains(PARAGRAPH))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(completion("Values have one owner.")),
        )
        .expect(1)
        .mount(&server)
        .await;

    let results_page = format!(
        r#"<div class="result"><h2><a class="result__a" href="{}/docs/ownership">Ownership</a></h2>
           <a class="result__snippet">Ownership chapter</a></div>"#,
        server.uri()
    );

    Mock::given(method("GET"))
        .and(path("/html/"))
        .and(query_param("q", "rust ownership"))
        .and(query_param("kl", "in-en"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(results_page, "text/html"))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/docs/ownership"))
        .respond_with(
            ResponseTemplate::new(200).set_body_raw(html_page(&[PARAGRAPH]), "text/html"),
        )
        .mount(&server)
        .await;

    let mut settings = settings_for(&server);
    settings.llm.api_base_url = server.uri();

    let engine =
        DuckDuckGoSearchEngine::new(&settings.duckduckgo, Duration::from_secs(5)).unwrap();
    let keyword = SearchService::new(Arc::new(engine), RetryPolicy::immediate(1));
    let crawler = DeepCrawler::with_reqwest(&settings.crawler).unwrap();
    let llm = LLMService::from_settings(&settings.llm).unwrap();

    let agentic = AgenticSearch::new(
        Arc::new(llm),
        keyword,
        Arc::new(crawler),
        settings.llm.clone(),
    );

    let bundle = agentic
        .agentic_search("how does rust ownership work", Some("llm-key"))
        .await
        .unwrap()
        .unwrap();

    assert!(bundle.body.starts_with("<distilled_info>"));
    assert!(bundle
        .body
        .contains("<objective>Learn ownership</objective>\nValues have one owner."));
    assert!(bundle.body.ends_with("</distilled_info>"));
    assert_eq!(
        bundle.citations,
        format!("- [[**Ownership**]({}/docs/ownership)]\n", server.uri())
    );
    assert!(bundle.image_links.is_empty());
}

#[tokio::test]
async fn test_rejected_llm_key_is_reported() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(401).set_body_string("invalid api key"))
        .mount(&server)
        .await;

    let mut settings = settings_for(&server);
    settings.llm.api_base_url = server.uri();

    let engine =
        DuckDuckGoSearchEngine::new(&settings.duckduckgo, Duration::from_secs(5)).unwrap();
    let agentic = AgenticSearch::new(
        Arc::new(LLMService::from_settings(&settings.llm).unwrap()),
        SearchService::new(Arc::new(engine), RetryPolicy::immediate(1)),
        Arc::new(DeepCrawler::with_reqwest(&settings.crawler).unwrap()),
        settings.llm.clone(),
    );

    let err = agentic
        .agentic_search("anything", Some("stale-key"))
        .await
        .unwrap_err();
    assert!(err.invalidates_credentials());
}
