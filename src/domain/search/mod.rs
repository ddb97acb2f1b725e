// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 外部提供方的抽象接口：搜索引擎与字幕
pub mod engine;
pub mod transcript;
