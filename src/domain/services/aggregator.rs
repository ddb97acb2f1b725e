// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use serde_json::Value;

use crate::domain::models::link_record::LinkRecord;
use crate::domain::models::search_result::SearchResultBundle;

/// 结果聚合器
///
/// 把多个子搜索的结果包合并成一个：正文和引用按推入顺序拼接，
/// 图片与视频链接在 `finish` 时去重（保留首次出现的顺序）。
#[derive(Debug, Default)]
pub struct ResultAggregator {
    body: String,
    image_links: Vec<String>,
    video_links: Vec<LinkRecord>,
    citations: String,
    related_questions: Option<Vec<Value>>,
    local_results: Option<Value>,
}

impl ResultAggregator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, bundle: SearchResultBundle) {
        self.body.push_str(&bundle.body);
        self.image_links.extend(bundle.image_links);
        self.video_links.extend(bundle.video_links);
        self.citations.push_str(&bundle.citations);

        if let Some(questions) = bundle.related_questions {
            self.related_questions
                .get_or_insert_with(Vec::new)
                .extend(questions);
        }

        // 地图结果只取第一个
        if self.local_results.is_none() {
            self.local_results = bundle.local_results;
        }
    }

    pub fn finish(self) -> SearchResultBundle {
        let mut bundle = SearchResultBundle {
            body: self.body,
            image_links: self.image_links,
            video_links: self.video_links,
            citations: self.citations,
            related_questions: self.related_questions,
            local_results: self.local_results,
        };
        bundle.dedup();
        bundle
    }
}

/// 合并多个结果包
pub fn merge_bundles<I>(bundles: I) -> SearchResultBundle
where
    I: IntoIterator<Item = SearchResultBundle>,
{
    let mut aggregator = ResultAggregator::new();
    for bundle in bundles {
        aggregator.push(bundle);
    }
    aggregator.finish()
}
