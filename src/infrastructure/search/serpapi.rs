// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use async_trait::async_trait;
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, info, warn};

use crate::config::settings::SerpApiSettings;
use crate::domain::models::search_query::SearchQuery;
use crate::domain::models::search_result::{ImageHit, TextHit, VideoHit};
use crate::domain::search::engine::{SearchEngine, SearchError, TextPage};

/// SerpApi 在没有结果时返回的错误信息前缀
const NO_RESULTS: &str = "hasn't returned any results";

/// 请求类型：网页、图片 (`tbm=isch`)、视频 (`tbm=vid`)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Vertical {
    Web,
    Images,
    Videos,
}

impl Vertical {
    fn tbm(&self) -> Option<&'static str> {
        match self {
            Vertical::Web => None,
            Vertical::Images => Some("isch"),
            Vertical::Videos => Some("vid"),
        }
    }
}

/// SerpApi Google 搜索引擎
///
/// 每次调用都需要调用方传入 API key；位置取自查询，未指定时使用默认位置。
pub struct SerpApiSearchEngine {
    client: reqwest::Client,
    settings: SerpApiSettings,
    default_location: String,
}

impl SerpApiSearchEngine {
    pub fn new(
        settings: &SerpApiSettings,
        default_location: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, SearchError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| SearchError::Network(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            settings: settings.clone(),
            default_location: default_location.into(),
        })
    }

    fn params<'a>(
        &'a self,
        query: &'a SearchQuery,
        api_key: &'a str,
        vertical: Vertical,
        num: &'a str,
    ) -> Vec<(&'static str, &'a str)> {
        let mut params = vec![
            ("api_key", api_key),
            ("engine", "google"),
            ("q", query.text()),
            ("google_domain", self.settings.google_domain.as_str()),
            ("hl", self.settings.hl.as_str()),
            ("gl", self.settings.gl.as_str()),
            (
                "location",
                query.location().unwrap_or(self.default_location.as_str()),
            ),
            ("safe", self.settings.safe.as_str()),
        ];

        if let Some(tbm) = vertical.tbm() {
            params.push(("tbm", tbm));
        }
        if vertical != Vertical::Images {
            params.push(("num", num));
        }

        params
    }

    async fn request(
        &self,
        query: &SearchQuery,
        api_key: Option<&str>,
        vertical: Vertical,
    ) -> Result<Value, SearchError> {
        let api_key = api_key
            .filter(|key| !key.trim().is_empty())
            .ok_or(SearchError::MissingCredentials("serpapi"))?;

        let num = query.max_results().to_string();
        let url = format!("{}/search.json", self.settings.base_url.trim_end_matches('/'));

        debug!("SerpApi {:?} search: {}", vertical, query.text());

        let response = self
            .client
            .get(url)
            .query(&self.params(query, api_key, vertical, &num))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<Value>(&text)
                .ok()
                .and_then(|body| body["error"].as_str().map(|s| s.to_string()))
                .unwrap_or(text);
            return Err(SearchError::from_status(status, message));
        }

        let body: Value = response
            .json()
            .await
            .map_err(|e| SearchError::Parse(e.to_string()))?;

        if let Some(error) = body["error"].as_str() {
            if error.contains(NO_RESULTS) {
                info!("SerpApi returned no results for '{}'", query.text());
                return Ok(Value::Null);
            }
            return Err(SearchError::Provider(error.to_string()));
        }

        Ok(body)
    }

    /// 解析网页搜索响应
    pub fn parse_text_page(body: &Value) -> TextPage {
        let hits = body["organic_results"]
            .as_array()
            .map(|results| {
                results
                    .iter()
                    .filter_map(|result| {
                        let link = result["link"].as_str()?;
                        let mut hit = TextHit::new(
                            result["title"].as_str().unwrap_or_default(),
                            link,
                            result["snippet"].as_str().unwrap_or_default(),
                        );
                        if let Some(source) = result["source"].as_str() {
                            hit = hit.with_source(source);
                        }
                        Some(hit)
                    })
                    .collect()
            })
            .unwrap_or_default();

        let related_questions = body["related_questions"].as_array().cloned();
        let local_results = match &body["local_results"] {
            Value::Null => None,
            other => Some(other.clone()),
        };

        TextPage {
            hits,
            related_questions,
            local_results,
        }
    }

    /// 解析图片搜索响应，取原图地址
    pub fn parse_images(body: &Value) -> Vec<ImageHit> {
        body["images_results"]
            .as_array()
            .map(|results| {
                results
                    .iter()
                    .filter_map(|result| {
                        Some(ImageHit {
                            image: result["original"].as_str()?.to_string(),
                            url: result["link"].as_str().unwrap_or_default().to_string(),
                            title: result["title"].as_str().unwrap_or_default().to_string(),
                        })
                    })
                    .collect()
            })
            .unwrap_or_default()
    }

    /// 解析视频搜索响应
    pub fn parse_videos(body: &Value) -> Vec<VideoHit> {
        body["video_results"]
            .as_array()
            .map(|results| {
                results
                    .iter()
                    .filter_map(|result| {
                        Some(VideoHit {
                            link: result["link"].as_str()?.to_string(),
                            title: result["title"].as_str().unwrap_or_default().to_string(),
                        })
                    })
                    .collect()
            })
            .unwrap_or_default()
    }
}

#[async_trait]
impl SearchEngine for SerpApiSearchEngine {
    async fn text(
        &self,
        query: &SearchQuery,
        api_key: Option<&str>,
    ) -> Result<Vec<TextHit>, SearchError> {
        Ok(self.text_page(query, api_key).await?.hits)
    }

    async fn text_page(
        &self,
        query: &SearchQuery,
        api_key: Option<&str>,
    ) -> Result<TextPage, SearchError> {
        let body = self.request(query, api_key, Vertical::Web).await?;
        let page = Self::parse_text_page(&body);
        if page.hits.is_empty() {
            warn!("SerpApi returned no organic results for '{}'", query.text());
        }
        Ok(page)
    }

    async fn images(
        &self,
        query: &SearchQuery,
        api_key: Option<&str>,
    ) -> Result<Vec<ImageHit>, SearchError> {
        let body = self.request(query, api_key, Vertical::Images).await?;
        Ok(Self::parse_images(&body))
    }

    async fn videos(
        &self,
        query: &SearchQuery,
        api_key: Option<&str>,
    ) -> Result<Vec<VideoHit>, SearchError> {
        let body = self.request(query, api_key, Vertical::Videos).await?;
        Ok(Self::parse_videos(&body))
    }

    fn name(&self) -> &'static str {
        "serpapi"
    }
}
