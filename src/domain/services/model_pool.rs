// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use rand::distr::weighted::WeightedIndex;
use rand::distr::Distribution;
use serde::{Deserialize, Serialize};
use std::fmt;

/// 可用的模型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ModelId {
    #[serde(rename = "llama-3.2-90b-text-preview")]
    Llama32_90bTextPreview,
    #[serde(rename = "llama-3.1-70b-versatile")]
    Llama31_70bVersatile,
    #[serde(rename = "llama-3.1-8b-instant")]
    Llama31_8bInstant,
    #[serde(rename = "llama3-70b-8192")]
    Llama3_70b8192,
    #[serde(rename = "llama3-8b-8192")]
    Llama3_8b8192,
    #[serde(rename = "llama-3.2-11b-text-preview")]
    Llama32_11bTextPreview,
    #[serde(rename = "mixtral-8x7b-32768")]
    Mixtral8x7b32768,
    #[serde(rename = "llama3-groq-70b-8192-tool-use-preview")]
    Llama3Groq70bToolUsePreview,
    #[serde(rename = "gemma-7b-it")]
    Gemma7bIt,
}

/// 模型能力
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ModelCapabilities {
    pub max_tokens: u32,
    pub supports_json_mode: bool,
}

impl ModelId {
    /// API 中使用的模型名
    pub fn as_str(&self) -> &'static str {
        match self {
            ModelId::Llama32_90bTextPreview => "llama-3.2-90b-text-preview",
            ModelId::Llama31_70bVersatile => "llama-3.1-70b-versatile",
            ModelId::Llama31_8bInstant => "llama-3.1-8b-instant",
            ModelId::Llama3_70b8192 => "llama3-70b-8192",
            ModelId::Llama3_8b8192 => "llama3-8b-8192",
            ModelId::Llama32_11bTextPreview => "llama-3.2-11b-text-preview",
            ModelId::Mixtral8x7b32768 => "mixtral-8x7b-32768",
            ModelId::Llama3Groq70bToolUsePreview => "llama3-groq-70b-8192-tool-use-preview",
            ModelId::Gemma7bIt => "gemma-7b-it",
        }
    }

    pub fn capabilities(&self) -> ModelCapabilities {
        let (max_tokens, supports_json_mode) = match self {
            ModelId::Llama32_90bTextPreview => (8192, true),
            ModelId::Llama31_70bVersatile => (8000, true),
            ModelId::Llama31_8bInstant => (8000, true),
            ModelId::Llama3_70b8192 => (8192, true),
            ModelId::Llama3_8b8192 => (8192, true),
            ModelId::Llama32_11bTextPreview => (8192, true),
            ModelId::Mixtral8x7b32768 => (32768, true),
            ModelId::Llama3Groq70bToolUsePreview => (8192, true),
            ModelId::Gemma7bIt => (8192, false),
        };

        ModelCapabilities {
            max_tokens,
            supports_json_mode,
        }
    }
}

impl fmt::Display for ModelId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 按权重随机选择模型，把请求分散到不同模型的速率限制上
#[derive(Debug, Clone, PartialEq)]
pub struct ModelPool {
    entries: Vec<(ModelId, u32)>,
}

impl ModelPool {
    /// 摘要使用的模型池
    pub fn summarization() -> Self {
        Self {
            entries: vec![
                (ModelId::Llama32_90bTextPreview, 1),
                (ModelId::Llama31_70bVersatile, 1),
                (ModelId::Llama31_8bInstant, 1),
                (ModelId::Llama3_70b8192, 1),
                (ModelId::Llama3_8b8192, 1),
                (ModelId::Llama32_11bTextPreview, 1),
                (ModelId::Mixtral8x7b32768, 1),
            ],
        }
    }

    /// 规划（生成搜索目标）使用的模型池，必须支持 JSON 输出
    pub fn planning() -> Self {
        Self {
            entries: vec![
                (ModelId::Llama31_70bVersatile, 1),
                (ModelId::Llama3Groq70bToolUsePreview, 1),
                (ModelId::Llama32_90bTextPreview, 1),
            ],
        }
    }

    pub fn choose(&self) -> ModelId {
        let mut rng = rand::rng();
        self.choose_with(&mut rng)
    }

    pub fn choose_with<R: rand::Rng + ?Sized>(&self, rng: &mut R) -> ModelId {
        match WeightedIndex::new(self.entries.iter().map(|(_, w)| *w)) {
            Ok(dist) => self.entries[dist.sample(rng)].0,
            // 内置模型池的权重都为正
            Err(_) => self.entries[0].0,
        }
    }
}
