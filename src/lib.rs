// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 配置模块
///
/// 处理应用程序的配置设置和环境变量
pub mod config;

/// 领域模块
///
/// 包含核心数据结构、提供方接口和领域服务
pub mod domain;

/// 引擎模块
///
/// 深度爬取使用的页面抓取引擎
pub mod engines;

/// 基础设施模块
///
/// 搜索引擎、字幕提供方与位置匹配的具体实现
pub mod infrastructure;

/// 工具模块
///
/// 提供通用的工具函数和辅助功能
pub mod utils;
