// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use super::ReqwestEngine;
use crate::engines::traits::{EngineError, FetchEngine, FetchRequest};
use std::time::Duration;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

async fn start_test_server() -> MockServer {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/test"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("content-type", "text/html; charset=utf-8")
                .set_body_string("<html><body><p>Test content</p></body></html>"),
        )
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/error"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/slow"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string("<p>late</p>")
                .set_delay(Duration::from_secs(3)),
        )
        .mount(&server)
        .await;

    server
}

#[tokio::test]
async fn test_reqwest_engine_basic_fetch() {
    let server = start_test_server().await;
    let engine = ReqwestEngine::new("websift-test").unwrap();

    let request = FetchRequest::new(format!("{}/test", server.uri()), Duration::from_secs(5));
    let response = engine.fetch(&request).await.unwrap();

    assert!(response.is_ok());
    assert_eq!(response.status_code, 200);
    assert!(String::from_utf8_lossy(&response.body).contains("Test content"));
    assert!(response
        .content_type
        .as_deref()
        .unwrap_or_default()
        .contains("text/html"));
}

#[tokio::test]
async fn test_reqwest_engine_error_status_is_not_an_error() {
    let server = start_test_server().await;
    let engine = ReqwestEngine::new("websift-test").unwrap();

    let request = FetchRequest::new(format!("{}/error", server.uri()), Duration::from_secs(5));
    let response = engine.fetch(&request).await.unwrap();

    assert_eq!(response.status_code, 500);
    assert!(!response.is_ok());
}

#[tokio::test]
async fn test_reqwest_engine_timeout() {
    let server = start_test_server().await;
    let engine = ReqwestEngine::new("websift-test").unwrap();

    let request = FetchRequest::new(format!("{}/slow", server.uri()), Duration::from_millis(200));
    let result = engine.fetch(&request).await;

    assert!(matches!(result, Err(EngineError::Timeout)));
}

#[test]
fn test_engine_name() {
    let engine = ReqwestEngine::new("websift-test").unwrap();
    assert_eq!(engine.name(), "reqwest");
}
