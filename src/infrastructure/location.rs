// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::Path;
use strsim::{jaro_winkler, normalized_levenshtein};
use tracing::info;

#[derive(Debug, Deserialize)]
struct GazetteerEntry {
    canonical_name: String,
}

/// 位置模糊匹配
///
/// 把用户输入的地名映射到地名表中最接近的规范名称（搜索提供方只接受规范名称）。
#[derive(Debug, Clone, PartialEq)]
pub struct LocationMatcher {
    names: Vec<String>,
}

impl LocationMatcher {
    pub fn new(names: Vec<String>) -> Self {
        Self { names }
    }

    /// 从 JSON 地名表加载：`[{"canonical_name": "..."}]`
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read gazetteer {}", path.display()))?;

        let matcher = Self::from_json(&raw)
            .with_context(|| format!("Failed to parse gazetteer {}", path.display()))?;

        info!(
            "Loaded {} canonical location(s) from {}",
            matcher.len(),
            path.display()
        );
        Ok(matcher)
    }

    pub fn from_json(raw: &str) -> Result<Self> {
        let entries: Vec<GazetteerEntry> = serde_json::from_str(raw)?;
        Ok(Self::new(
            entries.into_iter().map(|entry| entry.canonical_name).collect(),
        ))
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// 最接近的规范名称；地名表为空或输入为空时返回 `None`
    pub fn closest(&self, input: &str) -> Option<&str> {
        let needle = input.trim().to_lowercase();
        if needle.is_empty() {
            return None;
        }

        let mut best: Option<(&str, f64)> = None;
        for name in &self.names {
            let score = similarity(&needle, &name.to_lowercase());
            // 同分保留先出现的
            let better = match best {
                None => true,
                Some((_, top)) => score > top,
            };
            if better {
                best = Some((name.as_str(), score));
            }
        }

        best.map(|(name, _)| name)
    }
}

fn similarity(needle: &str, candidate: &str) -> f64 {
    if candidate == needle {
        return 1.0;
    }

    let base = normalized_levenshtein(needle, candidate).max(jaro_winkler(needle, candidate));

    // 输入是规范名称的前缀（"kolkata" → "Kolkata,West Bengal,India"）
    if candidate.starts_with(needle) {
        base.max(0.95)
    } else if candidate.contains(needle) {
        base.max(0.9)
    } else {
        base
    }
}
