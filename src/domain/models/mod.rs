// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 领域模型模块
///
/// 搜索请求、结果包、视频链接、搜索计划等核心数据结构
pub mod context;
pub mod crawled_page;
pub mod link_record;
pub mod objective_plan;
pub mod region;
pub mod search_query;
pub mod search_result;
