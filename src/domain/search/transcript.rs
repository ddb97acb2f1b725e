// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum TranscriptError {
    #[error("Subtitles are disabled for video {0}")]
    CaptionsDisabled(String),
    #[error("Video {0} is unavailable")]
    VideoUnavailable(String),
    #[error("No transcript in language '{language}' for video {video_id}")]
    NoTranscript { video_id: String, language: String },
    #[error("Network error: {0}")]
    Network(String),
    #[error("Parse error: {0}")]
    Parse(String),
}

impl From<reqwest::Error> for TranscriptError {
    fn from(err: reqwest::Error) -> Self {
        TranscriptError::Network(err.to_string())
    }
}

/// 一条字幕
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TranscriptSegment {
    pub text: String,
    pub start: f64,
    pub duration: f64,
}

/// 字幕提供方
#[async_trait]
pub trait TranscriptProvider: Send + Sync {
    async fn transcript(
        &self,
        video_id: &str,
        language: &str,
    ) -> Result<Vec<TranscriptSegment>, TranscriptError>;
}
