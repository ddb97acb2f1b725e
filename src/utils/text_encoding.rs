// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use chardetng::EncodingDetector;
use encoding_rs::Encoding;
use thiserror::Error;
use tracing::{debug, warn};

/// 文本编码处理错误类型
#[derive(Error, Debug, Clone)]
pub enum TextEncodingError {
    #[error("编码转换失败: {0}")]
    ConversionFailed(String),

    #[error("无效的编码格式: {0}")]
    InvalidEncoding(String),
}

/// 编码检测结果
#[derive(Debug, Clone, PartialEq)]
pub struct EncodingDetection {
    pub encoding: &'static str,
    pub is_utf8: bool,
    pub from_header: bool,
}

/// 文本编码处理器
///
/// 抓取到的网页字节不一定是 UTF-8，这里先尝试 HTTP 头声明的字符集，
/// 再用 chardetng 嗅探，最后统一解码为 UTF-8 字符串。
#[derive(Debug, Default, Clone, Copy)]
pub struct TextEncodingProcessor;

impl TextEncodingProcessor {
    pub fn new() -> Self {
        Self
    }

    /// 检测字节流的编码
    ///
    /// `declared` 是 Content-Type 头中的 charset（若有）
    pub fn detect(&self, input: &[u8], declared: Option<&str>) -> EncodingDetection {
        if let Some(label) = declared {
            if let Some(encoding) = Encoding::for_label(label.trim().as_bytes()) {
                return EncodingDetection {
                    encoding: encoding.name(),
                    is_utf8: encoding == encoding_rs::UTF_8,
                    from_header: true,
                };
            }
            debug!("Unknown declared charset '{}', falling back to sniffing", label);
        }

        if std::str::from_utf8(input).is_ok() {
            return EncodingDetection {
                encoding: encoding_rs::UTF_8.name(),
                is_utf8: true,
                from_header: false,
            };
        }

        let mut detector = EncodingDetector::new();
        detector.feed(input, true);
        let encoding = detector.guess(None, true);

        debug!("检测到编码: {}", encoding.name());

        EncodingDetection {
            encoding: encoding.name(),
            is_utf8: encoding == encoding_rs::UTF_8,
            from_header: false,
        }
    }

    /// 解码为 UTF-8，非法字节被替换而不是报错
    pub fn decode(&self, input: &[u8], declared: Option<&str>) -> Result<String, TextEncodingError> {
        let detection = self.detect(input, declared);

        if detection.is_utf8 {
            return Ok(String::from_utf8_lossy(input).into_owned());
        }

        let encoding = Encoding::for_label(detection.encoding.as_bytes())
            .ok_or_else(|| TextEncodingError::InvalidEncoding(detection.encoding.to_string()))?;

        let (decoded, _, had_errors) = encoding.decode(input);
        if had_errors {
            warn!(
                "Decoding with {} replaced malformed sequences",
                encoding.name()
            );
        }

        Ok(decoded.into_owned())
    }
}

/// 便捷函数：解码抓取内容
pub fn decode_html(input: &[u8], declared: Option<&str>) -> Result<String, TextEncodingError> {
    TextEncodingProcessor::new().decode(input, declared)
}

/// 从 Content-Type 头中取出 charset
pub fn charset_from_content_type(content_type: &str) -> Option<&str> {
    content_type.split(';').skip(1).find_map(|part| {
        let (key, value) = part.split_once('=')?;
        if key.trim().eq_ignore_ascii_case("charset") {
            Some(value.trim().trim_matches('"'))
        } else {
            None
        }
    })
}
