// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::domain::models::search_query::SearchQuery;
use crate::domain::models::search_result::{ImageHit, TextHit, VideoHit};
use async_trait::async_trait;
use serde_json::Value;
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum SearchError {
    #[error("Timeout")]
    Timeout,
    #[error("Rate limit exceeded")]
    RateLimited,
    #[error("Unauthorized: {0}")]
    Unauthorized(String),
    #[error("Missing API key for {0}")]
    MissingCredentials(&'static str),
    #[error("Bad request: {0}")]
    BadRequest(String),
    #[error("Search engine error: {0}")]
    Provider(String),
    #[error("Network error: {0}")]
    Network(String),
    #[error("Parse error: {0}")]
    Parse(String),
}

impl SearchError {
    /// 只有超时会被重试
    pub fn is_retryable(&self) -> bool {
        matches!(self, SearchError::Timeout)
    }

    /// 需要原样交给调用方的错误（限流、鉴权、缺少凭据）
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            SearchError::RateLimited
                | SearchError::Unauthorized(_)
                | SearchError::MissingCredentials(_)
        )
    }

    pub fn from_status(status: reqwest::StatusCode, message: String) -> Self {
        match status.as_u16() {
            401 | 403 => SearchError::Unauthorized(message),
            429 => SearchError::RateLimited,
            400 => SearchError::BadRequest(message),
            408 | 504 => SearchError::Timeout,
            _ => SearchError::Provider(format!("{}: {}", status, message)),
        }
    }
}

impl From<reqwest::Error> for SearchError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            SearchError::Timeout
        } else if err.is_decode() {
            SearchError::Parse(err.to_string())
        } else {
            SearchError::Network(err.to_string())
        }
    }
}

/// 外部搜索索引
///
/// 文本和图片查询是必需的；视频查询只有部分提供方支持，默认返回空。
/// 文本搜索页：有机结果加上提供方的附加信息（原样透传）
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TextPage {
    pub hits: Vec<TextHit>,
    pub related_questions: Option<Vec<Value>>,
    pub local_results: Option<Value>,
}

#[async_trait]
pub trait SearchEngine: Send + Sync {
    /// Perform a text search
    async fn text(
        &self,
        query: &SearchQuery,
        api_key: Option<&str>,
    ) -> Result<Vec<TextHit>, SearchError>;

    /// Text search together with the provider's extra blocks
    ///
    /// Engines without related questions or map results keep the default.
    async fn text_page(
        &self,
        query: &SearchQuery,
        api_key: Option<&str>,
    ) -> Result<TextPage, SearchError> {
        Ok(TextPage {
            hits: self.text(query, api_key).await?,
            ..TextPage::default()
        })
    }

    /// Perform an image search
    async fn images(
        &self,
        query: &SearchQuery,
        api_key: Option<&str>,
    ) -> Result<Vec<ImageHit>, SearchError>;

    /// Perform a video search
    async fn videos(
        &self,
        _query: &SearchQuery,
        _api_key: Option<&str>,
    ) -> Result<Vec<VideoHit>, SearchError> {
        Ok(Vec::new())
    }

    /// Get the name of the search engine
    fn name(&self) -> &'static str;
}
