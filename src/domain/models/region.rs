// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 默认地区（爱尔兰-英语）
pub const DEFAULT_REGION: &str = "ie-en";

/// 不限地区
pub const NO_REGION: &str = "wt-wt";

/// 地区显示名称 → 搜索地区代码
pub const REGIONS: &[(&str, &str)] = &[
    ("Arabia", "xa-ar"),
    ("Arabia (en)", "xa-en"),
    ("Argentina", "ar-es"),
    ("Australia", "au-en"),
    ("Austria", "at-de"),
    ("Belgium (fr)", "be-fr"),
    ("Belgium (nl)", "be-nl"),
    ("Brazil", "br-pt"),
    ("Bulgaria", "bg-bg"),
    ("Canada", "ca-en"),
    ("Canada (fr)", "ca-fr"),
    ("Catalan", "ct-ca"),
    ("Chile", "cl-es"),
    ("China", "cn-zh"),
    ("Colombia", "co-es"),
    ("Croatia", "hr-hr"),
    ("Czech Republic", "cz-cs"),
    ("Denmark", "dk-da"),
    ("Estonia", "ee-et"),
    ("Finland", "fi-fi"),
    ("France", "fr-fr"),
    ("Germany", "de-de"),
    ("Greece", "gr-el"),
    ("Hong Kong", "hk-tzh"),
    ("Hungary", "hu-hu"),
    ("India", "in-en"),
    ("Indonesia", "id-id"),
    ("Indonesia (en)", "id-en"),
    ("Ireland", "ie-en"),
    ("Israel", "il-he"),
    ("Italy", "it-it"),
    ("Japan", "jp-jp"),
    ("Korea", "kr-kr"),
    ("Latvia", "lv-lv"),
    ("Lithuania", "lt-lt"),
    ("Latin America", "xl-es"),
    ("Malaysia", "my-ms"),
    ("Malaysia (en)", "my-en"),
    ("Mexico", "mx-es"),
    ("Netherlands", "nl-nl"),
    ("New Zealand", "nz-en"),
    ("Norway", "no-no"),
    ("Peru", "pe-es"),
    ("Philippines", "ph-en"),
    ("Philippines (tl)", "ph-tl"),
    ("Poland", "pl-pl"),
    ("Portugal", "pt-pt"),
    ("Romania", "ro-ro"),
    ("Russia", "ru-ru"),
    ("Singapore", "sg-en"),
    ("Slovak Republic", "sk-sk"),
    ("Slovenia", "sl-sl"),
    ("South Africa", "za-en"),
    ("Spain", "es-es"),
    ("Sweden", "se-sv"),
    ("Switzerland (de)", "ch-de"),
    ("Switzerland (fr)", "ch-fr"),
    ("Switzerland (it)", "ch-it"),
    ("Taiwan", "tw-tzh"),
    ("Thailand", "th-th"),
    ("Turkey", "tr-tr"),
    ("Ukraine", "ua-uk"),
    ("United Kingdom", "uk-en"),
    ("United States", "us-en"),
    ("United States (es)", "ue-es"),
    ("Venezuela", "ve-es"),
    ("Vietnam", "vn-vi"),
    ("No region", NO_REGION),
];

/// 按显示名称查找地区代码（忽略大小写）
pub fn region_code(name: &str) -> Option<&'static str> {
    let name = name.trim();
    REGIONS
        .iter()
        .find(|(display, _)| display.eq_ignore_ascii_case(name))
        .map(|(_, code)| *code)
}

/// 是否为已知的地区代码
pub fn is_known_code(code: &str) -> bool {
    REGIONS.iter().any(|(_, c)| *c == code)
}
