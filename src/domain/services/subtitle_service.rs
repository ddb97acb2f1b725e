// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use serde::Serialize;
use std::sync::Arc;
use tracing::{info, warn};

use crate::domain::models::link_record::{LinkKind, LinkRecord};
use crate::domain::search::transcript::TranscriptProvider;
use crate::domain::services::link_filter::filter_links;
use crate::utils::text_processing::make_batches;

/// 单批提示词的最大字符数
pub const MAX_BATCH_CHARS: usize = 5000;

/// 字幕提取结果
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SubtitleReport {
    /// 全部视频的提示词
    pub report: String,
    /// 按字符切分后的批次，首尾相接即为 `report`
    pub batches: Vec<String>,
}

/// 字幕服务
///
/// 从用户输入中找出视频链接，逐个拉取字幕并拼成给模型的辅助消息。
/// 单个视频失败只会写入一段说明，不会中断整个报告。
pub struct SubtitleService {
    provider: Arc<dyn TranscriptProvider>,
    language: String,
}

impl SubtitleService {
    pub fn new(provider: Arc<dyn TranscriptProvider>, language: impl Into<String>) -> Self {
        Self {
            provider,
            language: language.into(),
        }
    }

    /// 为文本中的视频链接准备字幕提示词
    ///
    /// 没有视频链接时返回 `None`。
    pub async fn prepare_prompt(&self, text: &str) -> Option<SubtitleReport> {
        let links = filter_links(text);
        if links.is_empty() {
            return None;
        }

        info!("Extracting subtitles for {} video link(s)", links.len());

        let mut report = String::new();
        for (idx, link) in links.iter().enumerate() {
            report.push_str(&self.helper_message(idx + 1, link).await);
        }

        let batches = make_batches(&report, MAX_BATCH_CHARS);
        Some(SubtitleReport { report, batches })
    }

    async fn helper_message(&self, n: usize, link: &LinkRecord) -> String {
        match self.provider.transcript(&link.video_id, &self.language).await {
            Ok(segments) => {
                let body = segments
                    .iter()
                    .map(|segment| segment.text.as_str())
                    .collect::<Vec<_>>()
                    .join(" ");
                success_message(n, link.kind, &body)
            }
            Err(e) => {
                warn!("Subtitle extraction failed for {}: {}", link.video_id, e);
                failure_message(n, link.kind)
            }
        }
    }
}

fn success_message(n: usize, kind: LinkKind, body: &str) -> String {
    format!(
        "<helper_message{n}> Here is the script of YouTube {kind} no {n}.\n{body}\n</helper_message{n}>\n"
    )
}

fn failure_message(n: usize, kind: LinkKind) -> String {
    format!(
        "<helper_message{n}> ERROR Read the message below to respond {n}.\n\
         Error: Unable to extract subtitles from the {kind}. Hence just respond that either subtitles are disabled or this {kind} do not exist anymore\n\
         </helper_message{n}>\n"
    )
}
