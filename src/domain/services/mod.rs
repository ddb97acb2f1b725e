// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 领域服务模块
///
/// 包含的服务：
/// - 链接过滤（link_filter）：从任意文本中识别视频链接
/// - 字幕服务（subtitle_service）：拉取字幕并生成分批提示词
/// - 搜索服务（search_service）：驱动搜索引擎，处理重试并组装结果包
/// - 位置感知搜索（location_search）：深度/浅层正文选择策略
/// - 爬取服务（crawl_service）：并发抓取页面并抽取段落
/// - LLM服务（llm_service）与模型池（model_pool）：规划和摘要所需的模型调用
/// - 智能搜索（agentic_search）：计划、逐目标搜索、摘要
/// - 聚合器（aggregator）：合并多个结果包
pub mod agentic_search;
pub mod aggregator;
pub mod crawl_service;
pub mod link_filter;
pub mod llm_service;
pub mod location_search;
pub mod model_pool;
pub mod search_service;
pub mod subtitle_service;
