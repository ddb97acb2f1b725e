// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::HashSet;

use crate::domain::models::link_record::{LinkKind, LinkRecord};

/// 视频链接匹配规则
///
/// 分组：1 协议，2 子域名（www. / m.），3 域名，4 路径（watch?v= / shorts/），5 视频 ID
static VIDEO_LINK: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(https://)?(www\.|m\.)?(youtube\.com/|youtu\.be/)(watch\?v=|shorts/)?([a-zA-Z0-9\-_?=]{1,11})",
    )
    .expect("valid video link regex")
});

/// 从任意文本中提取视频链接
///
/// 域名和视频 ID 都必须非空；同一个视频 ID 只保留文本中最早出现的那个，
/// 输出按出现顺序排列。没有匹配时返回空集合。
pub fn filter_links(text: &str) -> Vec<LinkRecord> {
    let mut seen = HashSet::new();
    let mut links = Vec::new();

    for captures in VIDEO_LINK.captures_iter(text) {
        let domain = captures.get(3).map(|m| m.as_str()).unwrap_or_default();
        let video_id = captures.get(5).map(|m| m.as_str()).unwrap_or_default();

        if domain.is_empty() || video_id.is_empty() {
            continue;
        }

        if !seen.insert(video_id.to_string()) {
            continue;
        }

        let kind = match captures.get(4) {
            Some(path) if path.as_str().contains("shorts") => LinkKind::Shorts,
            _ => LinkKind::Video,
        };

        let url = captures
            .get(0)
            .map(|m| m.as_str().trim())
            .unwrap_or_default();

        links.push(LinkRecord::new(url, video_id, kind));
    }

    links
}
