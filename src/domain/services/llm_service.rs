// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::time::Duration;
use thiserror::Error;
use tracing::debug;

use crate::config::settings::LlmSettings;

/// LLM 调用错误
#[derive(Debug, Error, Clone, PartialEq)]
pub enum LlmError {
    #[error("LLM request timed out")]
    Timeout,
    #[error("LLM rate limit exceeded")]
    RateLimited,
    #[error("Invalid LLM API key: {0}")]
    Unauthorized(String),
    #[error("Bad request: {0}")]
    BadRequest(String),
    #[error("LLM server error: {0}")]
    ServerError(String),
    #[error("Network error: {0}")]
    Network(String),
    #[error("Invalid response format from LLM API: {0}")]
    InvalidResponse(String),
}

impl LlmError {
    /// 鉴权失败需要上报调用方
    pub fn is_permanent(&self) -> bool {
        matches!(self, LlmError::Unauthorized(_))
    }

    fn from_status(status: reqwest::StatusCode, message: String) -> Self {
        match status.as_u16() {
            401 | 403 => LlmError::Unauthorized(message),
            429 => LlmError::RateLimited,
            400 | 404 | 413 | 422 => LlmError::BadRequest(message),
            408 | 504 => LlmError::Timeout,
            _ => LlmError::ServerError(format!("{}: {}", status, message)),
        }
    }
}

impl From<reqwest::Error> for LlmError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            LlmError::Timeout
        } else {
            LlmError::Network(err.to_string())
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: String,
    pub content: String,
}

impl ChatMessage {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: "user".to_string(),
            content: content.into(),
        }
    }
}

/// 一次 chat completion 请求
#[derive(Debug, Clone, PartialEq)]
pub struct ChatRequest {
    pub model: String,
    pub messages: Vec<ChatMessage>,
    pub temperature: f32,
    pub max_tokens: u32,
    pub top_p: f32,
    pub seed: Option<u64>,
    /// 要求模型只输出 JSON 对象
    pub json_mode: bool,
}

impl ChatRequest {
    pub fn new(model: impl Into<String>, messages: Vec<ChatMessage>) -> Self {
        Self {
            model: model.into(),
            messages,
            temperature: 1.0,
            max_tokens: 1024,
            top_p: 0.9,
            seed: None,
            json_mode: false,
        }
    }

    fn to_body(&self) -> Value {
        let mut body = json!({
            "model": self.model,
            "messages": self.messages,
            "temperature": self.temperature,
            "max_tokens": self.max_tokens,
            "top_p": self.top_p,
            "stream": false,
        });

        if let Some(seed) = self.seed {
            body["seed"] = json!(seed);
        }
        if self.json_mode {
            body["response_format"] = json!({ "type": "json_object" });
        }

        body
    }
}

#[async_trait]
pub trait LLMServiceTrait: Send + Sync {
    /// 返回第一个候选的文本内容
    async fn complete(&self, api_key: &str, request: &ChatRequest) -> Result<String, LlmError>;
}

/// LLM服务 - 处理与 OpenAI 兼容接口的交互
///
/// 密钥由调用方按请求传入，服务本身不保存凭据。
pub struct LLMService {
    client: reqwest::Client,
    api_base_url: String,
}

impl LLMService {
    pub fn new(api_base_url: impl Into<String>, timeout: Duration) -> Result<Self, LlmError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| LlmError::Network(e.to_string()))?;

        Ok(Self {
            client,
            api_base_url: api_base_url.into().trim_end_matches('/').to_string(),
        })
    }

    pub fn from_settings(settings: &LlmSettings) -> Result<Self, LlmError> {
        Self::new(
            settings.api_base_url.clone(),
            Duration::from_secs(settings.request_timeout_secs),
        )
    }
}

#[async_trait]
impl LLMServiceTrait for LLMService {
    async fn complete(&self, api_key: &str, request: &ChatRequest) -> Result<String, LlmError> {
        let url = format!("{}/chat/completions", self.api_base_url);

        debug!(model = %request.model, "LLM chat request");

        let response = self
            .client
            .post(url)
            .bearer_auth(api_key)
            .json(&request.to_body())
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            return Err(LlmError::from_status(status, error_text));
        }

        let body: Value = response
            .json()
            .await
            .map_err(|e| LlmError::InvalidResponse(e.to_string()))?;

        body["choices"][0]["message"]["content"]
            .as_str()
            .map(|content| content.to_string())
            .ok_or_else(|| LlmError::InvalidResponse("missing choices[0].message.content".into()))
    }
}
