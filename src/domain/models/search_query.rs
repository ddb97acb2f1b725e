// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use serde::{Deserialize, Serialize};

use super::region::DEFAULT_REGION;

/// 结果数量上限
pub const MAX_RESULTS: u32 = 30;

/// 默认结果数量
pub const DEFAULT_RESULTS: u32 = 10;

/// 一次请求的搜索参数，构造后不可变
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchQuery {
    text: String,
    region: String,
    location: Option<String>,
    max_results: u32,
}

impl SearchQuery {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into().trim().to_string(),
            region: DEFAULT_REGION.to_string(),
            location: None,
            max_results: DEFAULT_RESULTS,
        }
    }

    pub fn with_region(mut self, region: impl Into<String>) -> Self {
        self.region = region.into();
        self
    }

    pub fn with_location(mut self, location: impl Into<String>) -> Self {
        let location = location.into();
        self.location = if location.trim().is_empty() {
            None
        } else {
            Some(location)
        };
        self
    }

    /// 结果数量被限制在 1..=30
    pub fn with_max_results(mut self, max_results: u32) -> Self {
        self.max_results = max_results.clamp(1, MAX_RESULTS);
        self
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn region(&self) -> &str {
        &self.region
    }

    pub fn location(&self) -> Option<&str> {
        self.location.as_deref()
    }

    pub fn max_results(&self) -> u32 {
        self.max_results
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    /// 同一参数下换一个查询词
    pub fn with_text(&self, text: impl Into<String>) -> Self {
        Self {
            text: text.into().trim().to_string(),
            ..self.clone()
        }
    }
}
