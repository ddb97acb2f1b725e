// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use thiserror::Error;

use crate::domain::search::engine::SearchError;
use crate::domain::services::llm_service::LlmError;

/// 顶层请求错误
///
/// 只有真正致命的情况会走到这里：凭据缺失、鉴权失败、计划无法解析。
/// 单个子搜索或子抓取的失败在各自的服务里被降级处理。
#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("搜索错误: {0}")]
    Search(#[from] SearchError),

    #[error("LLM 错误: {0}")]
    Llm(#[from] LlmError),

    #[error("缺少凭据: {0}")]
    MissingCredentials(&'static str),
}

impl PipelineError {
    /// UI 需要据此清除缓存的凭据
    pub fn invalidates_credentials(&self) -> bool {
        matches!(
            self,
            PipelineError::Search(SearchError::Unauthorized(_))
                | PipelineError::Llm(LlmError::Unauthorized(_))
                | PipelineError::MissingCredentials(_)
        )
    }
}
