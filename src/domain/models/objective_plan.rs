// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// 每个计划最多的目标数
pub const MAX_OBJECTIVES: usize = 3;

/// 每个目标最多的搜索词数
pub const MAX_SEARCH_STRINGS: usize = 3;

/// 计划中的单个信息收集目标
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Objective {
    pub description: String,
    #[serde(default)]
    pub search_strings: Vec<String>,
}

/// LLM 生成的搜索计划
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ObjectivePlan {
    pub objectives: Vec<Objective>,
    #[serde(default = "default_final_objective")]
    pub final_objective: String,
}

fn default_final_objective() -> String {
    "Summarize the following information crawled from several websites".to_string()
}

impl ObjectivePlan {
    /// 解析 LLM 返回的 JSON 计划并规范化
    ///
    /// 兼容 markdown 代码块包裹。规范化后没有可用目标时返回 `None`。
    pub fn parse(raw: &str) -> Option<Self> {
        let clean = raw
            .trim()
            .trim_start_matches("```json")
            .trim_start_matches("```")
            .trim_end_matches("```")
            .trim();

        let plan: ObjectivePlan = serde_json::from_str(clean).ok()?;
        plan.normalized()
    }

    /// 去掉空白和重复的搜索词，截断到上限，丢弃没有搜索词的目标
    pub fn normalized(self) -> Option<Self> {
        let mut seen_strings = HashSet::new();

        let objectives: Vec<Objective> = self
            .objectives
            .into_iter()
            .filter_map(|objective| {
                let search_strings: Vec<String> = objective
                    .search_strings
                    .into_iter()
                    .map(|s| s.trim().to_string())
                    .filter(|s| !s.is_empty())
                    .filter(|s| seen_strings.insert(s.to_lowercase()))
                    .take(MAX_SEARCH_STRINGS)
                    .collect();

                if search_strings.is_empty() {
                    return None;
                }

                Some(Objective {
                    description: objective.description.trim().to_string(),
                    search_strings,
                })
            })
            .take(MAX_OBJECTIVES)
            .collect();

        if objectives.is_empty() {
            return None;
        }

        let final_objective = if self.final_objective.trim().is_empty() {
            default_final_objective()
        } else {
            self.final_objective.trim().to_string()
        };

        Some(Self {
            objectives,
            final_objective,
        })
    }
}
