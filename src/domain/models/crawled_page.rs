// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use serde::{Deserialize, Serialize};

/// 深度爬取得到的一个页面
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CrawledPage {
    pub url: String,
    /// 抽样后的段落，保持文档顺序
    pub paragraphs: Vec<String>,
}

impl CrawledPage {
    pub fn new(url: impl Into<String>, paragraphs: Vec<String>) -> Self {
        Self {
            url: url.into(),
            paragraphs,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.paragraphs.is_empty()
    }
}
