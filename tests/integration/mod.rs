// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

pub mod agentic_test;
pub mod duckduckgo_test;
pub mod helpers;
pub mod link_filter_test;
pub mod location_search_test;
pub mod serpapi_test;
