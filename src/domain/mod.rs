// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 领域层模块
///
/// 该模块包含系统的核心业务逻辑，包括：
/// - 领域模型（models）：请求、结果包、视频链接、搜索计划
/// - 提供方接口（search）：搜索引擎与字幕提供方的抽象
/// - 服务（services）：链接过滤、字幕、浅层搜索、深度爬取、智能搜索与聚合
///
/// 领域层只依赖提供方接口，具体实现位于基础设施层。
pub mod models;
pub mod search;
pub mod services;
