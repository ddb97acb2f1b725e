// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use serde_json::Value;
use std::sync::Arc;
use tracing::{error, info, warn};

use crate::domain::models::link_record::LinkRecord;
use crate::domain::models::search_query::SearchQuery;
use crate::domain::models::search_result::{
    citation, dedup_links, dedup_strings, ImageHit, SearchResultBundle, TextHit, VideoHit,
    BODY_PREFIX, BODY_SUFFIX,
};
use crate::domain::search::engine::{SearchEngine, SearchError};
use crate::domain::services::link_filter::filter_links;
use crate::utils::retry_policy::RetryPolicy;

/// 一次搜索（文本、图片、视频三路）的原始结果
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SearchHits {
    pub text: Vec<TextHit>,
    pub images: Vec<ImageHit>,
    pub videos: Vec<VideoHit>,
    pub related_questions: Option<Vec<Value>>,
    pub local_results: Option<Value>,
}

impl SearchHits {
    /// 文本结果的页面链接，按出现顺序
    pub fn page_links(&self) -> Vec<String> {
        self.text.iter().map(|hit| hit.link.clone()).collect()
    }
}

enum Attempt {
    Done(SearchHits),
    Retry(SearchError),
    GiveUp,
}

/// 浅层搜索服务
///
/// 驱动任意一个 [`SearchEngine`]：三路请求并发执行，超时按退避策略重试，
/// 限流与鉴权错误直接返回给调用方，其余错误降级处理。
pub struct SearchService {
    engine: Arc<dyn SearchEngine>,
    retry: RetryPolicy,
}

impl SearchService {
    pub fn new(engine: Arc<dyn SearchEngine>, retry: RetryPolicy) -> Self {
        Self { engine, retry }
    }

    /// 执行搜索并组装结果
    ///
    /// * `Ok(Some(bundle))` - 搜索成功
    /// * `Ok(None)` - 非致命错误或重试耗尽
    /// * `Err(SearchError)` - 限流、鉴权失败或缺少凭据
    pub async fn search(
        &self,
        query: &SearchQuery,
        api_key: Option<&str>,
    ) -> Result<Option<SearchResultBundle>, SearchError> {
        Ok(self
            .fetch(query, api_key)
            .await?
            .map(|hits| build_bundle(&hits)))
    }

    /// 执行搜索，返回原始结果
    pub async fn fetch(
        &self,
        query: &SearchQuery,
        api_key: Option<&str>,
    ) -> Result<Option<SearchHits>, SearchError> {
        if query.is_empty() {
            warn!("Empty query, skipping {} search", self.engine.name());
            return Ok(None);
        }

        let mut attempt = 0;
        loop {
            attempt += 1;
            info!(
                "Attempt {} for query '{}' on {}",
                attempt,
                query.text(),
                self.engine.name()
            );

            match self.attempt(query, api_key).await? {
                Attempt::Done(hits) => return Ok(Some(hits)),
                Attempt::GiveUp => return Ok(None),
                Attempt::Retry(e) => {
                    if !self.retry.should_retry(attempt) {
                        error!(
                            "Failed to retrieve results from {} after {} attempts: {}",
                            self.engine.name(),
                            attempt,
                            e
                        );
                        return Ok(None);
                    }

                    let backoff = self.retry.calculate_backoff(attempt);
                    warn!(
                        "Timeout occurred on {}. Retrying {}/{} in {:?}",
                        self.engine.name(),
                        attempt,
                        self.retry.max_retries,
                        backoff
                    );
                    tokio::time::sleep(backoff).await;
                }
            }
        }
    }

    async fn attempt(
        &self,
        query: &SearchQuery,
        api_key: Option<&str>,
    ) -> Result<Attempt, SearchError> {
        let (text, images, videos) = tokio::join!(
            self.engine.text_page(query, api_key),
            self.engine.images(query, api_key),
            self.engine.videos(query, api_key),
        );

        let errors = [text.as_ref().err(), images.as_ref().err(), videos.as_ref().err()];

        if let Some(e) = errors.iter().flatten().find(|e| e.is_fatal()) {
            error!("{} search failed: {}", self.engine.name(), e);
            return Err((*e).clone());
        }

        if let Some(e) = errors.iter().flatten().find(|e| e.is_retryable()) {
            return Ok(Attempt::Retry((*e).clone()));
        }

        let page = match text {
            Ok(page) => page,
            Err(e) => {
                error!("Error occurred during {} search: {}", self.engine.name(), e);
                return Ok(Attempt::GiveUp);
            }
        };

        let images = images.unwrap_or_else(|e| {
            warn!("{} image search failed: {}", self.engine.name(), e);
            Vec::new()
        });

        let videos = videos.unwrap_or_else(|e| {
            warn!("{} video search failed: {}", self.engine.name(), e);
            Vec::new()
        });

        Ok(Attempt::Done(SearchHits {
            text: page.hits,
            images,
            videos,
            related_questions: page.related_questions,
            local_results: page.local_results,
        }))
    }
}

/// 由原始结果组装结果包
///
/// 正文按序编号；指向视频的链接进入视频列表，其余链接写成 markdown 引用。
pub fn build_bundle(hits: &SearchHits) -> SearchResultBundle {
    let mut body = String::from(BODY_PREFIX);
    for (idx, hit) in hits.text.iter().enumerate() {
        body.push_str(&format!(
            "<result {idx}>\n{}\n</result {idx}>\n",
            hit.snippet
        ));
    }
    body.push_str(BODY_SUFFIX);

    let mut citations = String::new();
    let mut video_links: Vec<LinkRecord> = Vec::new();

    for hit in &hits.text {
        classify_link(&hit.link, hit.label(), &mut video_links, &mut citations);
    }

    for image in &hits.images {
        classify_link(&image.url, &image.title, &mut video_links, &mut citations);
    }

    for video in &hits.videos {
        video_links.extend(filter_links(&video.link));
    }

    let image_links = hits.images.iter().map(|image| image.image.clone()).collect();

    SearchResultBundle {
        body,
        image_links: dedup_strings(image_links),
        video_links: dedup_links(video_links),
        citations,
        related_questions: hits.related_questions.clone(),
        local_results: hits.local_results.clone(),
    }
}

fn classify_link(link: &str, label: &str, videos: &mut Vec<LinkRecord>, citations: &mut String) {
    if link.is_empty() {
        return;
    }

    let found = filter_links(link);
    if found.is_empty() {
        citations.push_str(&citation(label, link));
    } else {
        videos.extend(found);
    }
}

#[cfg(test)]
#[path = "search_service_test.rs"]
mod tests;
