// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use serde::{Deserialize, Serialize};
use std::fmt;

/// 视频链接类型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LinkKind {
    Video,
    Shorts,
}

impl LinkKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            LinkKind::Video => "video",
            LinkKind::Shorts => "shorts",
        }
    }
}

impl fmt::Display for LinkKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 从文本中识别出的视频链接
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LinkRecord {
    pub url: String,
    pub video_id: String,
    pub kind: LinkKind,
}

impl LinkRecord {
    pub fn new(url: impl Into<String>, video_id: impl Into<String>, kind: LinkKind) -> Self {
        Self {
            url: url.into(),
            video_id: video_id.into(),
            kind,
        }
    }
}
