// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

//! 文本处理工具
//!
//! 爬取段落清洗、词数统计、按词截断以及按字符分批。

use once_cell::sync::Lazy;
use regex::Regex;

static WHITESPACE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").expect("valid regex"));

/// 将所有连续空白（包括换行）折叠为单个空格并去掉首尾空白
pub fn collapse_whitespace(text: &str) -> String {
    WHITESPACE.replace_all(text, " ").trim().to_string()
}

/// 按空白分词统计词数
pub fn word_count(text: &str) -> usize {
    text.split_whitespace().count()
}

/// 保留前 `max_words` 个词
///
/// 返回截断后的文本以及是否发生了截断
pub fn truncate_words(text: &str, max_words: usize) -> (String, bool) {
    let mut words = text.split_whitespace();
    let kept: Vec<&str> = words.by_ref().take(max_words).collect();
    let truncated = words.next().is_some();
    (kept.join(" "), truncated)
}

/// 按字符数分批，每批不超过 `max_chars` 个字符
///
/// 以 Unicode 标量值计数，不会切断多字节字符；各批首尾相接即为原文。
pub fn make_batches(text: &str, max_chars: usize) -> Vec<String> {
    if max_chars == 0 || text.chars().count() <= max_chars {
        return vec![text.to_string()];
    }

    let mut batches = Vec::new();
    let mut current = String::new();
    let mut count = 0;

    for ch in text.chars() {
        if count == max_chars {
            batches.push(std::mem::take(&mut current));
            count = 0;
        }
        current.push(ch);
        count += 1;
    }

    if !current.is_empty() {
        batches.push(current);
    }

    batches
}
