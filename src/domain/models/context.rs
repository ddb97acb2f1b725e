// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use std::fmt;

use super::search_query::SearchQuery;

/// 调用方按请求提供的凭据
#[derive(Clone, Default)]
pub struct Credentials {
    pub llm_api_key: Option<String>,
    pub serp_api_key: Option<String>,
}

impl Credentials {
    pub fn llm_api_key(&self) -> Option<&str> {
        self.llm_api_key.as_deref().filter(|k| !k.trim().is_empty())
    }

    pub fn serp_api_key(&self) -> Option<&str> {
        self.serp_api_key.as_deref().filter(|k| !k.trim().is_empty())
    }
}

// 不把密钥打进日志
impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("llm_api_key", &self.llm_api_key().map(|_| "[SET]"))
            .field("serp_api_key", &self.serp_api_key().map(|_| "[SET]"))
            .finish()
    }
}

/// 贯穿整条流水线的请求上下文，构造后只读
#[derive(Debug, Clone)]
pub struct RequestContext {
    pub query: SearchQuery,
    pub credentials: Credentials,
    /// 位置感知搜索是否先尝试深度爬取
    pub deep_search: bool,
}

impl RequestContext {
    pub fn new(query: SearchQuery, credentials: Credentials) -> Self {
        Self {
            query,
            credentials,
            deep_search: true,
        }
    }

    pub fn with_deep_search(mut self, enabled: bool) -> Self {
        self.deep_search = enabled;
        self
    }
}
