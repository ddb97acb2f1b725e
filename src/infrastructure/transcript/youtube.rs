// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use async_trait::async_trait;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Deserialize;
use std::time::Duration;
use tracing::debug;

use crate::config::settings::TranscriptSettings;
use crate::domain::search::transcript::{TranscriptError, TranscriptProvider, TranscriptSegment};

const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";

static TEXT_NODE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"(?s)<text start="([^"]*)"(?: dur="([^"]*)")?[^>]*>(.*?)</text>"#)
        .expect("valid timedtext regex")
});

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CaptionTrack {
    base_url: String,
    language_code: String,
    /// "asr" 表示自动生成的字幕
    #[serde(default)]
    kind: Option<String>,
}

/// YouTube 字幕提供方
///
/// 从观看页中取出 `captionTracks`，选中目标语言（人工字幕优先），
/// 再下载 timedtext XML 解析为字幕片段。
pub struct YouTubeTranscriptProvider {
    client: reqwest::Client,
    base_url: String,
}

impl YouTubeTranscriptProvider {
    pub fn new(settings: &TranscriptSettings, timeout: Duration) -> Result<Self, TranscriptError> {
        let client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(timeout)
            .cookie_store(true)
            .build()
            .map_err(|e| TranscriptError::Network(e.to_string()))?;

        Ok(Self {
            client,
            base_url: settings.base_url.trim_end_matches('/').to_string(),
        })
    }

    async fn watch_page(&self, video_id: &str) -> Result<String, TranscriptError> {
        let response = self
            .client
            .get(format!("{}/watch", self.base_url))
            .query(&[("v", video_id), ("hl", "en")])
            .header("Accept-Language", "en-US,en;q=0.9")
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(TranscriptError::VideoUnavailable(video_id.to_string()));
        }

        Ok(response.text().await?)
    }
}

/// 从观看页中找出 `captionTracks` 数组
fn caption_tracks(html: &str, video_id: &str) -> Result<Vec<CaptionTrack>, TranscriptError> {
    let Some(raw) = extract_json_array(html, "\"captionTracks\":") else {
        if html.contains("\"playabilityStatus\":{\"status\":\"ERROR\"")
            || html.contains("\"playabilityStatus\":{\"status\":\"LOGIN_REQUIRED\"")
        {
            return Err(TranscriptError::VideoUnavailable(video_id.to_string()));
        }
        return Err(TranscriptError::CaptionsDisabled(video_id.to_string()));
    };

    serde_json::from_str(raw).map_err(|e| TranscriptError::Parse(e.to_string()))
}

/// 截取 `key` 之后的 JSON 数组（括号配对，跳过字符串内部）
fn extract_json_array<'a>(text: &'a str, key: &str) -> Option<&'a str> {
    let start = text.find(key)? + key.len();
    let rest = &text[start..];
    if !rest.starts_with('[') {
        return None;
    }

    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;

    for (idx, ch) in rest.char_indices() {
        if in_string {
            match ch {
                _ if escaped => escaped = false,
                '\\' => escaped = true,
                '"' => in_string = false,
                _ => {}
            }
            continue;
        }

        match ch {
            '"' => in_string = true,
            '[' | '{' => depth += 1,
            ']' | '}' => {
                depth = depth.saturating_sub(1);
                if depth == 0 {
                    return Some(&rest[..=idx]);
                }
            }
            _ => {}
        }
    }

    None
}

fn pick_track<'a>(tracks: &'a [CaptionTrack], language: &str) -> Option<&'a CaptionTrack> {
    let matching = |track: &&CaptionTrack| {
        track.language_code == language
            || track
                .language_code
                .split('-')
                .next()
                .is_some_and(|code| code == language)
    };

    tracks
        .iter()
        .filter(matching)
        .find(|track| track.kind.as_deref() != Some("asr"))
        .or_else(|| tracks.iter().find(matching))
}

/// 解析 timedtext XML
pub fn parse_timedtext(xml: &str) -> Vec<TranscriptSegment> {
    TEXT_NODE
        .captures_iter(xml)
        .filter_map(|captures| {
            let start = captures.get(1)?.as_str().parse::<f64>().ok()?;
            let duration = captures
                .get(2)
                .and_then(|m| m.as_str().parse::<f64>().ok())
                .unwrap_or(0.0);
            let raw = captures.get(3).map(|m| m.as_str()).unwrap_or_default();

            // timedtext 的实体会被转义两次
            let once = html_escape::decode_html_entities(raw);
            let text = html_escape::decode_html_entities(&once)
                .replace('\n', " ")
                .trim()
                .to_string();

            if text.is_empty() {
                None
            } else {
                Some(TranscriptSegment {
                    text,
                    start,
                    duration,
                })
            }
        })
        .collect()
}

#[async_trait]
impl TranscriptProvider for YouTubeTranscriptProvider {
    async fn transcript(
        &self,
        video_id: &str,
        language: &str,
    ) -> Result<Vec<TranscriptSegment>, TranscriptError> {
        let html = self.watch_page(video_id).await?;
        let tracks = caption_tracks(&html, video_id)?;

        let track = pick_track(&tracks, language).ok_or_else(|| TranscriptError::NoTranscript {
            video_id: video_id.to_string(),
            language: language.to_string(),
        })?;

        debug!(
            "Fetching {} transcript for {} ({})",
            track.language_code,
            video_id,
            track.kind.as_deref().unwrap_or("manual")
        );

        let response = self.client.get(&track.base_url).send().await?;
        if !response.status().is_success() {
            return Err(TranscriptError::Network(format!(
                "timedtext returned {}",
                response.status()
            )));
        }

        let segments = parse_timedtext(&response.text().await?);
        if segments.is_empty() {
            return Err(TranscriptError::NoTranscript {
                video_id: video_id.to_string(),
                language: language.to_string(),
            });
        }

        Ok(segments)
    }
}
