// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 基础设施模块
///
/// 外部提供方的具体实现：搜索引擎、字幕以及位置匹配
pub mod location;
pub mod search;
pub mod transcript;
