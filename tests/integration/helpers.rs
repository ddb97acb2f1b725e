// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use std::sync::Arc;
use std::time::Duration;

use serde_json::{json, Value};
use websift::config::settings::Settings;
use websift::infrastructure::search::serpapi::SerpApiSearchEngine;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Match, Mock, MockServer, Request, ResponseTemplate};

pub const SERP_KEY: &str = "test-serp-key";

/// 匹配不带 `tbm` 参数的网页搜索请求
pub struct WebVertical;

impl Match for WebVertical {
    fn matches(&self, request: &Request) -> bool {
        !request.url.query_pairs().any(|(key, _)| key == "tbm")
    }
}

/// 默认配置，所有外部地址指向 mock 服务器
pub fn settings_for(server: &MockServer) -> Settings {
    let mut settings = Settings::defaults().unwrap();
    settings.serpapi.base_url = server.uri();
    settings.duckduckgo.html_url = format!("{}/html/", server.uri());
    settings.duckduckgo.site_url = server.uri();
    settings.transcript.base_url = server.uri();
    settings.search.initial_backoff_ms = 0;
    settings
}

pub fn serpapi_engine(settings: &Settings) -> Arc<SerpApiSearchEngine> {
    Arc::new(
        SerpApiSearchEngine::new(&settings.serpapi, "Kolkata", Duration::from_secs(5)).unwrap(),
    )
}

/// 挂载三个纵向的 SerpApi 响应
pub async fn mount_serpapi(server: &MockServer, organic: Value, images: Value, videos: Value) {
    Mock::given(method("GET"))
        .and(path("/search.json"))
        .and(query_param("api_key", SERP_KEY))
        .and(WebVertical)
        .respond_with(ResponseTemplate::new(200).set_body_json(organic))
        .mount(server)
        .await;

    Mock::given(method("GET"))
        .and(path("/search.json"))
        .and(query_param("tbm", "isch"))
        .respond_with(ResponseTemplate::new(200).set_body_json(images))
        .mount(server)
        .await;

    Mock::given(method("GET"))
        .and(path("/search.json"))
        .and(query_param("tbm", "vid"))
        .respond_with(ResponseTemplate::new(200).set_body_json(videos))
        .mount(server)
        .await;
}

pub fn empty_images() -> Value {
    json!({ "images_results": [] })
}

pub fn empty_videos() -> Value {
    json!({ "video_results": [] })
}

/// 生成包含若干 `<p>` 段落的页面
pub fn html_page(paragraphs: &[&str]) -> String {
    let body: String = paragraphs
        .iter()
        .map(|p| format!("<p>{}</p>\n", p))
        .collect();
    format!("<html><head><title>t</title></head><body>{}</body></html>", body)
}
