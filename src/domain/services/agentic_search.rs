// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

//! 智能搜索
//!
//! 查询 → 计划（LLM 拆解为目标与搜索词）→ 逐目标搜索并深度爬取 → 摘要 → 聚合。

use std::sync::Arc;
use std::time::Duration;
use tracing::{error, info, warn};

use crate::config::settings::LlmSettings;
use crate::domain::models::link_record::LinkRecord;
use crate::domain::models::objective_plan::{ObjectivePlan, MAX_SEARCH_STRINGS};
use crate::domain::models::search_query::SearchQuery;
use crate::domain::models::search_result::{dedup_links, dedup_strings, SearchResultBundle};
use crate::domain::services::aggregator::merge_bundles;
use crate::domain::services::crawl_service::DeepCrawler;
use crate::domain::services::link_filter::filter_links;
use crate::domain::services::llm_service::{ChatMessage, ChatRequest, LLMServiceTrait, LlmError};
use crate::domain::services::model_pool::{ModelId, ModelPool};
use crate::domain::services::search_service::SearchService;
use crate::utils::errors::PipelineError;

const DISTILLED_OPEN: &str = "<distilled_info>The following is the distilled information\n";
const DISTILLED_CLOSE: &str = "</distilled_info>";

const PLAN_PROMPT: &str = r#"You are an advanced research assistant that breaks a user query down into structured search objectives and generates relevant search strings. Analyse the query and create a plan for gathering information, returning it in the JSON format below.

Instructions:
1. Read and understand the user's query.
2. Break the query down into 1-3 main objectives. Each objective covers one key aspect of the information needed. Never return more than 3 objectives.
3. For each objective, write 1-3 search strings likely to return relevant information from a web search. Never return more than 3 search strings per objective.
4. Do not repeat search strings or objectives.
5. Write a final objective describing the task to apply to all search results (for example summarizing, comparing or analysing).
6. Output only valid JSON, with no additional text or explanations.

JSON output structure:
{
  "objectives": [
    {
      "description": "Brief description of the first information-gathering goal",
      "search_strings": [
        "First search string for objective 1",
        "Second search string for objective 1"
      ]
    }
  ],
  "final_objective": "Description of the main task to apply to all search results"
}

The user prompt is: "#;

/// 规划提示词
pub fn plan_prompt(query: &str) -> String {
    format!("{PLAN_PROMPT}{query}")
}

/// 摘要提示词
pub fn distillation_prompt(content: &str, objective: &str) -> String {
    format!(
        "#Distillation objective:\n{objective}\n\n\
         #Additional instructions:\n\
         - Retain all relevant descriptive information from the search content.\n\
         - Include specific details such as numerical data, technical specifications, and feature comparisons.\n\
         - Highlight any unique selling points or standout characteristics of the options being compared.\n\
         - Present a balanced view, including both positive and negative aspects when available.\n\
         - If certain important information is missing, note its absence.\n\
         - Do not include any advertisements or sponsored content, and disregard information that deviates from the distillation objective.\n\
         - Distill the information as much as possible while keeping it clear and coherent with respect to the distillation objective.\n\n\
         #Search content:\n{content}\n\n\
         Based on the above objective and search content, provide a comprehensive distillation of the information, including all relevant details and comparisons."
    )
}

/// 智能搜索流水线
pub struct AgenticSearch {
    llm: Arc<dyn LLMServiceTrait>,
    keyword: SearchService,
    crawler: Arc<DeepCrawler>,
    planning: ModelPool,
    summarization: ModelPool,
    settings: LlmSettings,
}

impl AgenticSearch {
    pub fn new(
        llm: Arc<dyn LLMServiceTrait>,
        keyword: SearchService,
        crawler: Arc<DeepCrawler>,
        settings: LlmSettings,
    ) -> Self {
        Self {
            llm,
            keyword,
            crawler,
            planning: ModelPool::planning(),
            summarization: ModelPool::summarization(),
            settings,
        }
    }

    fn request(model: ModelId, prompt: String) -> ChatRequest {
        let capabilities = model.capabilities();
        let mut request = ChatRequest::new(model.as_str(), vec![ChatMessage::user(prompt)]);
        request.temperature = 1.0;
        request.top_p = 0.9;
        request.seed = Some(42);
        request.max_tokens = capabilities.max_tokens;
        request
    }

    /// 生成搜索计划
    ///
    /// JSON 无法解析或没有可用目标时返回 `Ok(None)`。
    pub async fn generate_plan(
        &self,
        query: &str,
        api_key: &str,
    ) -> Result<Option<ObjectivePlan>, LlmError> {
        let model = self.planning.choose();
        info!("Model selected for generating search strings: {}", model);

        let mut request = Self::request(model, plan_prompt(query));
        request.json_mode = model.capabilities().supports_json_mode;

        let raw = self.llm.complete(api_key, &request).await?;

        match ObjectivePlan::parse(&raw) {
            Some(plan) => {
                info!(
                    "Plan with {} objective(s), final objective: {}",
                    plan.objectives.len(),
                    plan.final_objective
                );
                Ok(Some(plan))
            }
            None => {
                error!("Error decoding JSON plan from {}", model);
                Ok(None)
            }
        }
    }

    /// 用 LLM 按目标提炼爬取内容
    ///
    /// 除鉴权失败外的错误都降级为空字符串。
    pub async fn summarize(
        &self,
        content: &str,
        objective: &str,
        api_key: &str,
    ) -> Result<String, LlmError> {
        let model = self.summarization.choose();
        info!("Model selected for summarizing: {}", model);

        let request = Self::request(model, distillation_prompt(content, objective));

        match self.llm.complete(api_key, &request).await {
            Ok(distilled) => Ok(distilled),
            Err(e) if e.is_permanent() => Err(e),
            Err(e) => {
                warn!("Summarization with {} failed: {}", model, e);
                Ok(String::new())
            }
        }
    }

    /// 针对一个目标执行搜索、爬取和摘要
    ///
    /// 任一子查询搜索失败时整个目标返回 `Ok(None)`；限流、鉴权失败等致命错误直接返回。
    /// 结果包的正文是摘要。
    pub async fn search_summary(
        &self,
        search_strings: &[String],
        objective: &str,
        api_key: &str,
    ) -> Result<Option<SearchResultBundle>, PipelineError> {
        if search_strings.is_empty() {
            error!("No search query provided");
            return Ok(None);
        }

        let base = SearchQuery::new("")
            .with_region(self.settings.agentic_region.clone())
            .with_max_results(self.settings.agentic_max_results);

        let mut all_info = String::new();
        let mut image_links = Vec::new();
        let mut video_links: Vec<LinkRecord> = Vec::new();
        let mut citations = String::new();

        for (idx, search_string) in search_strings.iter().take(MAX_SEARCH_STRINGS).enumerate() {
            if idx > 0 && self.settings.inter_query_delay_ms > 0 {
                tokio::time::sleep(Duration::from_millis(self.settings.inter_query_delay_ms)).await;
            }

            info!("Attempting for query: {}", search_string);
            let query = base.with_text(search_string.as_str());

            let hits = match self.keyword.fetch(&query, None).await {
                Ok(Some(hits)) => hits,
                Ok(None) => {
                    error!("Search failed for '{}', abandoning objective", search_string);
                    return Ok(None);
                }
                Err(e) if e.is_fatal() => {
                    error!("Search for '{}' failed: {}", search_string, e);
                    return Err(e.into());
                }
                Err(e) => {
                    error!("Error occurred during search for '{}': {}", search_string, e);
                    return Ok(None);
                }
            };

            for hit in &hits.text {
                agentic_citation(&hit.title, &hit.link, &mut video_links, &mut citations);
            }
            for image in &hits.images {
                agentic_citation(&image.title, &image.url, &mut video_links, &mut citations);
                image_links.push(image.image.clone());
            }

            let content = self.crawler.fetch_text(&hits.page_links()).await;
            all_info.push_str(&format!(
                "<info>Information from search query: {}\n{}\n</info>",
                search_string, content
            ));
        }

        let distilled = self.summarize(&all_info, objective, api_key).await?;

        Ok(Some(SearchResultBundle {
            body: distilled,
            image_links: dedup_strings(image_links),
            video_links: dedup_links(video_links),
            citations,
            related_questions: None,
            local_results: None,
        }))
    }

    /// 执行计划中的所有目标并聚合
    pub async fn run_plan(
        &self,
        plan: &ObjectivePlan,
        api_key: &str,
    ) -> Result<SearchResultBundle, PipelineError> {
        let mut bundles = Vec::with_capacity(plan.objectives.len());

        for objective in &plan.objectives {
            let summary = self
                .search_summary(&objective.search_strings, &plan.final_objective, api_key)
                .await?;

            let Some(mut bundle) = summary else {
                warn!("Objective '{}' produced no results", objective.description);
                continue;
            };

            bundle.body = format!(
                "<objective>{}</objective>\n{}",
                objective.description, bundle.body
            );
            bundles.push(bundle);
        }

        let mut merged = merge_bundles(bundles);
        merged.body = format!("{DISTILLED_OPEN}{}{DISTILLED_CLOSE}", merged.body);
        Ok(merged)
    }

    /// 完整的智能搜索
    ///
    /// 计划无法生成时返回 `Ok(None)`。
    pub async fn agentic_search(
        &self,
        query: &str,
        api_key: Option<&str>,
    ) -> Result<Option<SearchResultBundle>, PipelineError> {
        let api_key = api_key
            .filter(|key| !key.trim().is_empty())
            .ok_or(PipelineError::MissingCredentials("llm"))?;

        let Some(plan) = self.generate_plan(query, api_key).await? else {
            return Ok(None);
        };

        Ok(Some(self.run_plan(&plan, api_key).await?))
    }
}

fn agentic_citation(
    title: &str,
    link: &str,
    videos: &mut Vec<LinkRecord>,
    citations: &mut String,
) {
    if link.is_empty() {
        return;
    }

    let found = filter_links(link);
    if found.is_empty() {
        citations.push_str(&format!("- [[**{}**]({})]\n", title, link));
    } else {
        videos.extend(found);
    }
}

#[cfg(test)]
#[path = "agentic_search_test.rs"]
mod tests;
