// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use std::sync::Arc;
use tracing::{info, warn};

use crate::config::settings::PolicySettings;
use crate::domain::models::search_query::SearchQuery;
use crate::domain::models::search_result::{SearchResultBundle, BODY_PREFIX, BODY_SUFFIX};
use crate::domain::search::engine::SearchError;
use crate::domain::services::crawl_service::DeepCrawler;
use crate::domain::services::search_service::{build_bundle, SearchService};
use crate::infrastructure::location::LocationMatcher;
use crate::utils::text_processing::{truncate_words, word_count};

/// 正文来源
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BodySource {
    /// 深度爬取的页面正文
    Deep,
    /// 深度爬取正文过长，已截断
    DeepTruncated,
    /// 搜索摘要
    Shallow,
}

/// 深度/浅层选择策略
///
/// 少于 `min_words`（包括爬取全部失败得到的空文本）用摘要，
/// 多于 `max_words` 截断并追加相关性提示。
pub fn choose_body(text: &str, shallow_body: &str, policy: &PolicySettings) -> (String, BodySource) {
    let words = word_count(text);
    if words < policy.min_deep_words {
        info!(
            "Deep crawl produced {} word(s), falling back to search snippets",
            words
        );
        return (shallow_body.to_string(), BodySource::Shallow);
    }

    if words > policy.max_deep_words {
        let (truncated, _) = truncate_words(text, policy.max_deep_words);
        info!(
            "Deep crawl produced {} word(s), truncated to {}",
            words, policy.max_deep_words
        );
        return (
            format!("{BODY_PREFIX}{truncated}\n{BODY_SUFFIX}"),
            BodySource::DeepTruncated,
        );
    }

    (format!("{BODY_PREFIX}{text}\n"), BodySource::Deep)
}

/// 位置感知搜索
///
/// 解析位置后通过引擎搜索（文本、图片、视频并发），再对结果页面做深度爬取，
/// 按词数策略在爬取正文和搜索摘要之间选择。相关问题与地图结果原样透传。
pub struct LocationSearchService {
    search: SearchService,
    crawler: Arc<DeepCrawler>,
    matcher: Option<Arc<LocationMatcher>>,
    policy: PolicySettings,
}

impl LocationSearchService {
    pub fn new(
        search: SearchService,
        crawler: Arc<DeepCrawler>,
        matcher: Option<Arc<LocationMatcher>>,
        policy: PolicySettings,
    ) -> Self {
        Self {
            search,
            crawler,
            matcher,
            policy,
        }
    }

    /// 把用户输入的位置换成地名表中的规范名称
    pub fn resolve_location(&self, query: &SearchQuery) -> SearchQuery {
        let (Some(matcher), Some(location)) = (self.matcher.as_ref(), query.location()) else {
            return query.clone();
        };

        match matcher.closest(location) {
            Some(canonical) => {
                info!("Resolved location '{}' to '{}'", location, canonical);
                query.clone().with_location(canonical)
            }
            None => query.clone(),
        }
    }

    /// 执行位置感知搜索
    ///
    /// `deep` 为 false 时直接返回搜索摘要。
    pub async fn search(
        &self,
        query: &SearchQuery,
        api_key: Option<&str>,
        deep: bool,
    ) -> Result<Option<SearchResultBundle>, SearchError> {
        let query = self.resolve_location(query);

        let Some(hits) = self.search.fetch(&query, api_key).await? else {
            return Ok(None);
        };

        let mut bundle = build_bundle(&hits);
        if !deep {
            return Ok(Some(bundle));
        }

        let deep_text = self.crawler.fetch_text(&hits.page_links()).await;
        if deep_text.is_empty() {
            warn!("Deep crawl returned no text, using search snippets");
        }

        let (body, source) = choose_body(&deep_text, &bundle.body, &self.policy);
        info!("Location search body source: {:?}", source);
        bundle.body = body;

        Ok(Some(bundle))
    }
}
