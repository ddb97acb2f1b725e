// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::sync::Arc;
use std::time::Duration;
use tracing::{error, info, warn};

use websift::config::settings::Settings;
use websift::domain::models::context::{Credentials, RequestContext};
use websift::domain::models::region::{is_known_code, region_code, DEFAULT_REGION};
use websift::domain::models::search_query::SearchQuery;
use websift::domain::models::search_result::SearchResultBundle;
use websift::domain::services::agentic_search::AgenticSearch;
use websift::domain::services::crawl_service::DeepCrawler;
use websift::domain::services::llm_service::LLMService;
use websift::domain::services::location_search::LocationSearchService;
use websift::domain::services::search_service::SearchService;
use websift::domain::services::subtitle_service::SubtitleService;
use websift::infrastructure::location::LocationMatcher;
use websift::infrastructure::search::duckduckgo::DuckDuckGoSearchEngine;
use websift::infrastructure::search::serpapi::SerpApiSearchEngine;
use websift::infrastructure::transcript::youtube::YouTubeTranscriptProvider;
use websift::utils::errors::PipelineError;
use websift::utils::retry_policy::RetryPolicy;
use websift::utils::telemetry;

#[derive(Parser, Debug)]
#[command(name = "websift", version, about = "Search the web and distil the results for a language model")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug, PartialEq, Eq)]
enum Command {
    /// DuckDuckGo 关键词搜索
    Keyword {
        #[arg(required = true)]
        text: Vec<String>,
    },
    /// SerpApi 搜索
    Engine {
        #[arg(required = true)]
        text: Vec<String>,
    },
    /// 按地区搜索，默认抓取结果页面正文
    Local {
        /// 只使用搜索摘要，不抓取页面
        #[arg(long)]
        shallow: bool,
        #[arg(required = true)]
        text: Vec<String>,
    },
    /// LLM 规划的多目标搜索
    Agentic {
        #[arg(required = true)]
        text: Vec<String>,
    },
    /// 提取 YouTube 字幕并生成摘要提示词
    Subtitles {
        #[arg(required = true)]
        text: Vec<String>,
    },
}

impl Command {
    fn text(&self) -> String {
        let words = match self {
            Command::Keyword { text }
            | Command::Engine { text }
            | Command::Local { text, .. }
            | Command::Agentic { text }
            | Command::Subtitles { text } => text,
        };
        words.join(" ")
    }

    fn deep_search(&self) -> bool {
        !matches!(self, Command::Local { shallow: true, .. })
    }
}

/// 配置中的地区既可以是代码也可以是显示名称
fn resolve_region(raw: &str) -> String {
    if is_known_code(raw) {
        return raw.to_string();
    }
    match region_code(raw) {
        Some(code) => code.to_string(),
        None => {
            warn!("Unknown region '{}', using {}", raw, DEFAULT_REGION);
            DEFAULT_REGION.to_string()
        }
    }
}

fn non_empty_env(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.trim().is_empty())
}

fn print_bundle(bundle: Option<SearchResultBundle>) -> Result<()> {
    match bundle {
        Some(bundle) => println!("{}", serde_json::to_string_pretty(&bundle)?),
        None => println!("null"),
    }
    Ok(())
}

fn report(err: PipelineError) -> anyhow::Error {
    if err.invalidates_credentials() {
        error!("Credentials rejected, clear the cached API key: {}", err);
    }
    err.into()
}

/// 主函数
///
/// 读取配置与凭据，按模式运行对应的流水线，把结果以 JSON 输出到标准输出
#[tokio::main]
async fn main() -> Result<()> {
    telemetry::init_telemetry();

    let cli = Cli::parse();
    let text = cli.command.text();
    if text.trim().is_empty() {
        anyhow::bail!("search text must not be blank");
    }

    let settings = Settings::new().context("Failed to load configuration")?;
    info!("Starting websift: {:?}", cli.command);

    let credentials = Credentials {
        llm_api_key: non_empty_env("WEBSIFT_LLM_API_KEY"),
        serp_api_key: non_empty_env("WEBSIFT_SERP_API_KEY"),
    };

    let query = SearchQuery::new(text)
        .with_region(resolve_region(&settings.search.region))
        .with_location(settings.search.location.clone())
        .with_max_results(settings.search.max_results);
    let context = RequestContext::new(query, credentials).with_deep_search(cli.command.deep_search());

    let search_timeout = Duration::from_secs(settings.search.request_timeout_secs);
    let retry = RetryPolicy::from_settings(&settings.search);

    match cli.command {
        Command::Keyword { .. } => {
            let engine = DuckDuckGoSearchEngine::new(&settings.duckduckgo, search_timeout)?;
            let service = SearchService::new(Arc::new(engine), retry);
            let bundle = service
                .search(&context.query, None)
                .await
                .map_err(|e| report(e.into()))?;
            print_bundle(bundle)?;
        }
        Command::Engine { .. } | Command::Local { .. } => {
            let engine = SerpApiSearchEngine::new(
                &settings.serpapi,
                settings.search.location.clone(),
                search_timeout,
            )?;
            let service = SearchService::new(Arc::new(engine), retry);
            let api_key = context.credentials.serp_api_key();

            let bundle = if matches!(cli.command, Command::Engine { .. }) {
                service.search(&context.query, api_key).await
            } else {
                let crawler = DeepCrawler::with_reqwest(&settings.crawler)?;
                let matcher = match settings.location.gazetteer_path.as_deref() {
                    Some(path) => Some(Arc::new(LocationMatcher::load(path)?)),
                    None => None,
                };
                let local = LocationSearchService::new(
                    service,
                    Arc::new(crawler),
                    matcher,
                    settings.policy.clone(),
                );
                local
                    .search(&context.query, api_key, context.deep_search)
                    .await
            };
            print_bundle(bundle.map_err(|e| report(e.into()))?)?;
        }
        Command::Agentic { .. } => {
            let engine = DuckDuckGoSearchEngine::new(&settings.duckduckgo, search_timeout)?;
            let keyword = SearchService::new(Arc::new(engine), retry);
            let crawler = DeepCrawler::with_reqwest(&settings.crawler)?;
            let llm = LLMService::from_settings(&settings.llm)?;

            let agentic = AgenticSearch::new(
                Arc::new(llm),
                keyword,
                Arc::new(crawler),
                settings.llm.clone(),
            );
            let bundle = agentic
                .agentic_search(context.query.text(), context.credentials.llm_api_key())
                .await
                .map_err(report)?;
            print_bundle(bundle)?;
        }
        Command::Subtitles { .. } => {
            let provider = YouTubeTranscriptProvider::new(&settings.transcript, search_timeout)?;
            let service = SubtitleService::new(Arc::new(provider), settings.transcript.language.clone());
            match service.prepare_prompt(context.query.text()).await {
                Some(report) => println!("{}", serde_json::to_string_pretty(&report)?),
                None => println!("null"),
            }
        }
    }

    Ok(())
}
