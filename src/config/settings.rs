// Copyright 2025 Kirky.X
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use config::{builder::DefaultState, Config, ConfigBuilder, ConfigError, Environment, File};
use serde::Deserialize;

/// 应用程序配置设置
///
/// 包含搜索、爬取、LLM、各搜索提供方以及深度/浅层搜索策略等配置项
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    /// 通用搜索配置
    pub search: SearchSettings,
    /// 深度爬取配置
    pub crawler: CrawlerSettings,
    /// LLM 配置
    pub llm: LlmSettings,
    /// SerpApi 配置
    pub serpapi: SerpApiSettings,
    /// DuckDuckGo 配置
    pub duckduckgo: DuckDuckGoSettings,
    /// 字幕配置
    pub transcript: TranscriptSettings,
    /// 位置匹配配置
    #[serde(default)]
    pub location: LocationSettings,
    /// 深度/浅层搜索策略
    pub policy: PolicySettings,
}

/// 搜索配置设置
#[derive(Debug, Clone, Deserialize)]
pub struct SearchSettings {
    /// 默认地区代码
    pub region: String,
    /// 默认位置（位置感知搜索使用）
    pub location: String,
    /// 默认结果数量
    pub max_results: u32,
    /// 超时错误的最大尝试次数
    pub retries: u32,
    /// 初始退避时间（毫秒）
    pub initial_backoff_ms: u64,
    /// 退避乘数
    pub backoff_factor: f64,
    /// 单次请求超时（秒）
    pub request_timeout_secs: u64,
}

/// 爬取配置设置
#[derive(Debug, Clone, Deserialize)]
pub struct CrawlerSettings {
    /// 单个页面抓取超时（秒）
    pub timeout_secs: u64,
    /// 同时进行的抓取数
    pub concurrency: usize,
    /// 段落最少词数（严格大于）
    pub min_words: usize,
    /// 每个页面最多保留的段落数
    pub sample_size: usize,
    /// 不允许抓取的 URL 片段
    pub blocklist: Vec<String>,
    /// User-Agent
    pub user_agent: String,
}

/// LLM 配置设置
#[derive(Debug, Clone, Deserialize)]
pub struct LlmSettings {
    /// OpenAI 兼容接口地址
    pub api_base_url: String,
    /// 请求超时（秒）
    pub request_timeout_secs: u64,
    /// 智能搜索子查询之间的间隔（毫秒）
    pub inter_query_delay_ms: u64,
    /// 智能搜索每个子查询的结果数
    pub agentic_max_results: u32,
    /// 智能搜索使用的地区
    pub agentic_region: String,
}

/// SerpApi 配置设置
#[derive(Debug, Clone, Deserialize)]
pub struct SerpApiSettings {
    pub base_url: String,
    pub google_domain: String,
    /// 界面语言
    pub hl: String,
    /// 国家
    pub gl: String,
    pub safe: String,
}

/// DuckDuckGo 配置设置
#[derive(Debug, Clone, Deserialize)]
pub struct DuckDuckGoSettings {
    /// HTML 搜索入口
    pub html_url: String,
    /// 图片搜索与 vqd 令牌所在的站点
    pub site_url: String,
}

/// 字幕配置设置
#[derive(Debug, Clone, Deserialize)]
pub struct TranscriptSettings {
    pub base_url: String,
    pub language: String,
}

/// 位置匹配配置设置
#[derive(Debug, Clone, Default, Deserialize)]
pub struct LocationSettings {
    /// 地名表路径，未配置时不做模糊匹配
    pub gazetteer_path: Option<String>,
}

/// 深度/浅层搜索策略设置
#[derive(Debug, Clone, Deserialize)]
pub struct PolicySettings {
    /// 爬取文本少于该词数时回退到浅层结果
    pub min_deep_words: usize,
    /// 爬取文本超过该词数时截断
    pub max_deep_words: usize,
}

impl Settings {
    /// 创建新的配置实例
    ///
    /// 默认值 → `config/default` → `config/{APP_ENVIRONMENT}` → `WEBSIFT__*` 环境变量
    ///
    /// # Returns
    ///
    /// * `Ok(Settings)` - 成功加载的配置
    /// * `Err(ConfigError)` - 配置加载失败
    pub fn new() -> Result<Self, ConfigError> {
        let env = std::env::var("APP_ENVIRONMENT").unwrap_or_else(|_| "default".to_string());
        let builder = Self::with_defaults()?
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name(&format!("config/{}", env)).required(false))
            .add_source(Environment::with_prefix("WEBSIFT").separator("__"));

        builder.build()?.try_deserialize()
    }

    /// 仅由默认值构成的配置
    pub fn defaults() -> Result<Self, ConfigError> {
        Self::with_defaults()?.build()?.try_deserialize()
    }

    fn with_defaults() -> Result<ConfigBuilder<DefaultState>, ConfigError> {
        Config::builder()
            // Search
            .set_default("search.region", "ie-en")?
            .set_default("search.location", "Kolkata, West Bengal, India")?
            .set_default("search.max_results", 10)?
            .set_default("search.retries", 3)?
            .set_default("search.initial_backoff_ms", 2000)?
            .set_default("search.backoff_factor", 2.0)?
            .set_default("search.request_timeout_secs", 15)?
            // Crawler
            .set_default("crawler.timeout_secs", 5)?
            .set_default("crawler.concurrency", 8)?
            .set_default("crawler.min_words", 10)?
            .set_default("crawler.sample_size", 5)?
            .set_default(
                "crawler.blocklist",
                vec!["amazon.", "flipkart.", "youtube.", "zomato.", ".pdf"],
            )?
            .set_default(
                "crawler.user_agent",
                "Mozilla/5.0 (compatible; websift/0.1; +https://github.com/Kirky-X)",
            )?
            // LLM
            .set_default("llm.api_base_url", "https://api.groq.com/openai/v1")?
            .set_default("llm.request_timeout_secs", 60)?
            .set_default("llm.inter_query_delay_ms", 2000)?
            .set_default("llm.agentic_max_results", 7)?
            .set_default("llm.agentic_region", "in-en")?
            // SerpApi
            .set_default("serpapi.base_url", "https://serpapi.com")?
            .set_default("serpapi.google_domain", "google.com")?
            .set_default("serpapi.hl", "en")?
            .set_default("serpapi.gl", "in")?
            .set_default("serpapi.safe", "off")?
            // DuckDuckGo
            .set_default("duckduckgo.html_url", "https://html.duckduckgo.com/html/")?
            .set_default("duckduckgo.site_url", "https://duckduckgo.com")?
            // Transcript
            .set_default("transcript.base_url", "https://www.youtube.com")?
            .set_default("transcript.language", "en")?
            // Policy
            .set_default("policy.min_deep_words", 100)?
            .set_default("policy.max_deep_words", 4500)
    }
}

#[cfg(test)]
#[path = "settings_test.rs"]
mod tests;
