// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use futures::future::join_all;
use once_cell::sync::Lazy;
use rand::Rng;
use scraper::{Html, Selector};
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tokio::sync::Semaphore;
use tracing::{debug, info, warn};

use crate::config::settings::CrawlerSettings;
use crate::domain::models::crawled_page::CrawledPage;
use crate::engines::reqwest_engine::ReqwestEngine;
use crate::engines::traits::{EngineError, FetchEngine, FetchRequest};
use crate::utils::text_encoding::{charset_from_content_type, decode_html};
use crate::utils::text_processing::{collapse_whitespace, word_count};

static PARAGRAPH: Lazy<Selector> =
    Lazy::new(|| Selector::parse("p").expect("valid paragraph selector"));

/// 爬取错误
#[derive(Error, Debug)]
pub enum CrawlError {
    #[error("Engine error: {0}")]
    Engine(#[from] EngineError),
    #[error("Crawler concurrency must be greater than zero")]
    InvalidConcurrency,
}

/// 深度爬取服务
///
/// 过滤黑名单 URL 后并发抓取页面，从 `<p>` 标签中抽取足够长的段落并随机抽样。
/// 单个页面失败不影响其他页面。
pub struct DeepCrawler {
    engine: Arc<dyn FetchEngine>,
    settings: CrawlerSettings,
    limiter: Arc<Semaphore>,
}

impl DeepCrawler {
    pub fn new(engine: Arc<dyn FetchEngine>, settings: CrawlerSettings) -> Result<Self, CrawlError> {
        if settings.concurrency == 0 {
            return Err(CrawlError::InvalidConcurrency);
        }

        Ok(Self {
            engine,
            limiter: Arc::new(Semaphore::new(settings.concurrency)),
            settings,
        })
    }

    /// 使用 reqwest 引擎创建爬取服务
    pub fn with_reqwest(settings: &CrawlerSettings) -> Result<Self, CrawlError> {
        let engine = ReqwestEngine::new(&settings.user_agent)?;
        Self::new(Arc::new(engine), settings.clone())
    }

    /// URL 是否命中黑名单
    pub fn is_blocked(&self, url: &str) -> bool {
        self.settings
            .blocklist
            .iter()
            .any(|pattern| url.contains(pattern.as_str()))
    }

    /// 并发爬取所有允许的 URL
    ///
    /// 返回值与过滤后的 URL 一一对应；抓取失败的页面段落为空。
    pub async fn crawl(&self, urls: &[String]) -> Vec<CrawledPage> {
        let allowed: Vec<&String> = urls.iter().filter(|url| !self.is_blocked(url)).collect();

        info!(
            "Deep crawling {} URL(s) ({} blocked)",
            allowed.len(),
            urls.len() - allowed.len()
        );

        let tasks = allowed.into_iter().map(|url| async move {
            let paragraphs = match self.limiter.acquire().await {
                Ok(_permit) => self.crawl_page(url).await,
                Err(_) => Vec::new(),
            };
            CrawledPage::new(url.clone(), paragraphs)
        });

        join_all(tasks).await
    }

    /// 爬取并把所有抽样段落用空格拼接
    ///
    /// 顺序：先按 URL，再按段落。所有页面都失败时返回空串。
    pub async fn fetch_text(&self, urls: &[String]) -> String {
        let pages = self.crawl(urls).await;
        pages
            .iter()
            .flat_map(|page| page.paragraphs.iter().map(String::as_str))
            .collect::<Vec<_>>()
            .join(" ")
    }

    async fn crawl_page(&self, url: &str) -> Vec<String> {
        let request = FetchRequest::new(url, Duration::from_secs(self.settings.timeout_secs));

        let response = match self.engine.fetch(&request).await {
            Ok(response) => response,
            Err(EngineError::Timeout) => {
                warn!("Timeout error for {}", url);
                return Vec::new();
            }
            Err(e) => {
                warn!("Client error for {}: {}", url, e);
                return Vec::new();
            }
        };

        if !response.is_ok() {
            warn!("Failed to fetch {}: HTTP {}", url, response.status_code);
            return Vec::new();
        }

        let declared = response
            .content_type
            .as_deref()
            .and_then(charset_from_content_type);

        let html = match decode_html(&response.body, declared) {
            Ok(html) => html,
            Err(e) => {
                warn!("Failed to decode {}: {}", url, e);
                return Vec::new();
            }
        };

        let paragraphs = extract_paragraphs(&html, self.settings.min_words);
        debug!("{}: {} candidate paragraph(s)", url, paragraphs.len());

        let mut rng = rand::rng();
        sample_paragraphs(paragraphs, self.settings.sample_size, &mut rng)
    }
}

/// 抽取所有词数大于 `min_words` 的 `<p>` 文本（空白已折叠）
pub fn extract_paragraphs(html: &str, min_words: usize) -> Vec<String> {
    let document = Html::parse_document(html);

    document
        .select(&PARAGRAPH)
        .map(|p| collapse_whitespace(&p.text().collect::<String>()))
        .filter(|text| word_count(text) > min_words)
        .collect()
}

/// 多于 `sample_size` 段时无放回随机抽取，保持原有顺序
pub fn sample_paragraphs<R: Rng + ?Sized>(
    paragraphs: Vec<String>,
    sample_size: usize,
    rng: &mut R,
) -> Vec<String> {
    if paragraphs.len() <= sample_size {
        return paragraphs;
    }

    let mut picked = rand::seq::index::sample(rng, paragraphs.len(), sample_size).into_vec();
    picked.sort_unstable();

    let mut paragraphs: Vec<Option<String>> = paragraphs.into_iter().map(Some).collect();
    picked
        .into_iter()
        .filter_map(|idx| paragraphs[idx].take())
        .collect()
}

#[cfg(test)]
#[path = "crawl_service_test.rs"]
mod tests;
