// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use async_trait::async_trait;
use once_cell::sync::Lazy;
use regex::Regex;
use scraper::{Html, Selector};
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, info, warn};

use crate::config::settings::DuckDuckGoSettings;
use crate::domain::models::search_query::SearchQuery;
use crate::domain::models::search_result::{ImageHit, TextHit};
use crate::domain::search::engine::{SearchEngine, SearchError};
use crate::utils::text_processing::collapse_whitespace;

const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";

static VQD: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"vqd=["']?([0-9-]+)["']?"#).expect("valid vqd regex"));

static RESULT: Lazy<Selector> =
    Lazy::new(|| Selector::parse("div.result").expect("valid result selector"));
static TITLE: Lazy<Selector> =
    Lazy::new(|| Selector::parse("a.result__a").expect("valid title selector"));
static SNIPPET: Lazy<Selector> =
    Lazy::new(|| Selector::parse(".result__snippet").expect("valid snippet selector"));

#[derive(Debug, Deserialize)]
struct ImageResponse {
    #[serde(default)]
    results: Vec<ImageEntry>,
}

#[derive(Debug, Deserialize)]
struct ImageEntry {
    #[serde(default)]
    image: String,
    #[serde(default)]
    url: String,
    #[serde(default)]
    title: String,
}

/// DuckDuckGo 关键词搜索
///
/// 文本走 HTML 版搜索页，图片先从首页拿 `vqd` 令牌再请求 `i.js`。
/// 不需要 API key，没有视频搜索。
pub struct DuckDuckGoSearchEngine {
    client: reqwest::Client,
    html_url: String,
    site_url: String,
}

impl DuckDuckGoSearchEngine {
    pub fn new(settings: &DuckDuckGoSettings, timeout: Duration) -> Result<Self, SearchError> {
        let client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(timeout)
            .cookie_store(true)
            .redirect(reqwest::redirect::Policy::none())
            .build()
            .map_err(|e| SearchError::Network(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            html_url: settings.html_url.clone(),
            site_url: settings.site_url.trim_end_matches('/').to_string(),
        })
    }

    /// 解析 HTML 搜索结果页
    pub fn parse_text_results(html: &str, limit: usize) -> Vec<TextHit> {
        let document = Html::parse_document(html);
        let mut results = Vec::new();

        for element in document.select(&RESULT) {
            // 广告
            if element
                .value()
                .classes()
                .any(|class| class == "result--ad")
            {
                continue;
            }

            let Some(anchor) = element.select(&TITLE).next() else {
                continue;
            };

            let title = collapse_whitespace(&anchor.text().collect::<String>());
            let link = anchor
                .value()
                .attr("href")
                .map(resolve_redirect)
                .unwrap_or_default();

            let snippet = element
                .select(&SNIPPET)
                .next()
                .map(|e| collapse_whitespace(&e.text().collect::<String>()))
                .unwrap_or_default();

            if link.is_empty() {
                continue;
            }

            results.push(TextHit::new(title, link, snippet));
            if results.len() >= limit {
                break;
            }
        }

        results
    }

    /// 从首页中提取 `vqd` 令牌
    pub fn extract_vqd(html: &str) -> Option<String> {
        VQD.captures(html)
            .and_then(|c| c.get(1))
            .map(|m| m.as_str().to_string())
    }

    async fn vqd(&self, keywords: &str) -> Result<String, SearchError> {
        let response = self
            .client
            .get(&self.site_url)
            .query(&[("q", keywords)])
            .send()
            .await?;

        let response = checked(response).await?;
        let html = response.text().await?;
        Self::extract_vqd(&html)
            .ok_or_else(|| SearchError::Parse(format!("vqd token not found for '{}'", keywords)))
    }
}

/// DuckDuckGo 用 202、301、403 表示请求被限流
pub fn is_rate_limit_status(status: reqwest::StatusCode) -> bool {
    matches!(status.as_u16(), 202 | 301 | 403)
}

async fn checked(response: reqwest::Response) -> Result<reqwest::Response, SearchError> {
    let status = response.status();
    if is_rate_limit_status(status) {
        warn!("DuckDuckGo rate limited the request (HTTP {})", status);
        return Err(SearchError::RateLimited);
    }
    if !status.is_success() {
        let text = response.text().await.unwrap_or_default();
        return Err(SearchError::from_status(status, text));
    }
    Ok(response)
}

/// 还原 DuckDuckGo 的跳转链接（`//duckduckgo.com/l/?uddg=...`）
fn resolve_redirect(href: &str) -> String {
    if !href.contains("uddg=") {
        return href.to_string();
    }

    let absolute = if href.starts_with("//") {
        format!("https:{}", href)
    } else if href.starts_with('/') {
        format!("https://duckduckgo.com{}", href)
    } else {
        href.to_string()
    };

    url::Url::parse(&absolute)
        .ok()
        .and_then(|url| {
            url.query_pairs()
                .find(|(key, _)| key == "uddg")
                .map(|(_, value)| value.into_owned())
        })
        .unwrap_or_else(|| href.to_string())
}

#[async_trait]
impl SearchEngine for DuckDuckGoSearchEngine {
    async fn text(
        &self,
        query: &SearchQuery,
        _api_key: Option<&str>,
    ) -> Result<Vec<TextHit>, SearchError> {
        info!("DuckDuckGo text search: {}", query.text());

        let response = self
            .client
            .get(&self.html_url)
            .query(&[("q", query.text()), ("kl", query.region())])
            .send()
            .await?;

        let response = checked(response).await?;
        let html = response.text().await?;
        let results = Self::parse_text_results(&html, query.max_results() as usize);
        debug!("DuckDuckGo returned {} text result(s)", results.len());

        Ok(results)
    }

    async fn images(
        &self,
        query: &SearchQuery,
        _api_key: Option<&str>,
    ) -> Result<Vec<ImageHit>, SearchError> {
        let vqd = self.vqd(query.text()).await?;

        let response = self
            .client
            .get(format!("{}/i.js", self.site_url))
            .query(&[
                ("l", query.region()),
                ("o", "json"),
                ("q", query.text()),
                ("vqd", vqd.as_str()),
                ("f", ",,,,,"),
                ("p", "-1"),
            ])
            .header("Referer", format!("{}/", self.site_url))
            .send()
            .await?;

        let response = checked(response).await?;
        let body: ImageResponse = response
            .json()
            .await
            .map_err(|e| SearchError::Parse(e.to_string()))?;

        Ok(body
            .results
            .into_iter()
            .filter(|entry| !entry.image.is_empty())
            .take(query.max_results() as usize)
            .map(|entry| ImageHit {
                image: entry.image,
                url: entry.url,
                title: entry.title,
            })
            .collect())
    }

    fn name(&self) -> &'static str {
        "duckduckgo"
    }
}
