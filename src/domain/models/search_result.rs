// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashSet;

use super::link_record::LinkRecord;

/// 结果正文开头的指令
pub const BODY_PREFIX: &str =
    "<instructions>Refer these results from the web and respond to the user: </instructions>\n";

/// 结果正文结尾的相关性提示
pub const BODY_SUFFIX: &str = "\n<instructions>The above results might contain irrelevant information. Determine the relevance of the information and respond to the user accordingly. Do not include the text within brackets in your response. </instructions>";

/// 文本搜索结果条目
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TextHit {
    pub title: String,
    pub link: String,
    pub snippet: String,
    /// 来源站点名（SerpApi 提供）
    pub source: Option<String>,
}

impl TextHit {
    pub fn new(title: impl Into<String>, link: impl Into<String>, snippet: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            link: link.into(),
            snippet: snippet.into(),
            source: None,
        }
    }

    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source = Some(source.into());
        self
    }

    /// 引用标签，优先使用来源站点名
    pub fn label(&self) -> &str {
        match self.source.as_deref() {
            Some(source) if !source.trim().is_empty() => source,
            _ => &self.title,
        }
    }
}

/// 图片搜索结果条目
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ImageHit {
    /// 图片地址
    pub image: String,
    /// 图片所在页面
    pub url: String,
    pub title: String,
}

/// 视频搜索结果条目
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct VideoHit {
    pub link: String,
    pub title: String,
}

/// 生成一条 markdown 引用
pub fn citation(label: &str, link: &str) -> String {
    if label.trim().is_empty() {
        format!("- {}\n", link)
    } else {
        format!("- [**{}**]({})\n", label.trim(), link)
    }
}

/// 一个搜索后端返回给 UI 的结果包
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SearchResultBundle {
    /// 发给 LLM 的正文（指令 + 片段）
    pub body: String,
    /// 图片地址，有序且去重
    pub image_links: Vec<String>,
    /// 视频链接，按视频 ID 去重
    pub video_links: Vec<LinkRecord>,
    /// markdown 引用列表
    pub citations: String,
    /// 相关问题，结构随提供方变化，原样透传
    #[serde(skip_serializing_if = "Option::is_none")]
    pub related_questions: Option<Vec<Value>>,
    /// 地图/本地结果，原样透传
    #[serde(skip_serializing_if = "Option::is_none")]
    pub local_results: Option<Value>,
}

impl SearchResultBundle {
    /// 去掉重复的图片地址和视频链接，保留首次出现的顺序
    pub fn dedup(&mut self) {
        self.image_links = dedup_strings(std::mem::take(&mut self.image_links));
        self.video_links = dedup_links(std::mem::take(&mut self.video_links));
    }
}

/// 保序去重
pub fn dedup_strings(items: Vec<String>) -> Vec<String> {
    let mut seen = HashSet::new();
    items
        .into_iter()
        .filter(|item| seen.insert(item.clone()))
        .collect()
}

/// 按视频 ID 保序去重
pub fn dedup_links(links: Vec<LinkRecord>) -> Vec<LinkRecord> {
    let mut seen = HashSet::new();
    links
        .into_iter()
        .filter(|link| seen.insert(link.video_id.clone()))
        .collect()
}
