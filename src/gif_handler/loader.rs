//! # 加载与校验模块
//!
//! ## 设计思路
//!
//! 统一处理不同来源（本地文件 / Base64）的原始字节加载，并在“尽可能早”的阶段执行输入校验。
//! 目标是尽快失败，减少不必要内存与 CPU 消耗。
//!
//! ## 实现思路
//!
//! - 文件：存在性 + metadata 体积限制 + 读取（扩展名已由 handler 在加载前校验）。
//! - Base64：格式解析 + 解码前体积上界估算 + 解码后体积限制。
//! - 两种来源最后都做文件签名（magic bytes）校验，确认内容与用途一致。

use base64::{Engine as _, engine::general_purpose};
use std::path::Path;

use super::source::{InputKind, InputSource, RawInputData};
use super::{GifConfig, GifError, GifHandler};

impl GifHandler {
    /// 按来源加载原始字节。
    pub(super) fn load(
        &self,
        source: &InputSource,
        kind: InputKind,
        config: &GifConfig,
    ) -> Result<RawInputData, GifError> {
        match source {
            InputSource::FilePath(path) => self.load_from_file(path, kind, config),
            InputSource::Base64(data) => self.load_from_base64(data, kind, config),
        }
    }

    /// 从本地路径加载原始字节。
    pub(super) fn load_from_file(
        &self,
        path: &str,
        kind: InputKind,
        config: &GifConfig,
    ) -> Result<RawInputData, GifError> {
        log::info!("📁 开始读取本地文件 - 路径: {}", path);

        let file_path = Path::new(path);
        if !file_path.exists() {
            return Err(GifError::FileSystem(format!("文件不存在：{}", path)));
        }

        let metadata = std::fs::metadata(file_path)
            .map_err(|e| GifError::FileSystem(format!("无法读取文件信息：{}", e)))?;

        if metadata.len() > config.max_file_size {
            return Err(GifError::ResourceLimit(format!(
                "文件过大：{:.2} MB（限制：{:.2} MB）",
                metadata.len() as f64 / 1024.0 / 1024.0,
                config.max_file_size as f64 / 1024.0 / 1024.0
            )));
        }

        let bytes = std::fs::read(file_path)
            .map_err(|e| GifError::FileSystem(format!("无法读取文件：{}", e)))?;
        Self::validate_signature(&bytes, kind)?;

        Ok(RawInputData {
            bytes,
            source_hint: "file",
        })
    }

    /// 从 Base64 字符串加载原始字节。
    pub(super) fn load_from_base64(
        &self,
        data: &str,
        kind: InputKind,
        config: &GifConfig,
    ) -> Result<RawInputData, GifError> {
        log::info!("📝 开始处理 base64 数据");

        let bytes = Self::parse_base64_with_limit(data, config.max_file_size)?;

        if bytes.len() as u64 > config.max_file_size {
            return Err(GifError::ResourceLimit(format!(
                "Base64 解码后体积过大：{:.2} MB（限制：{:.2} MB）",
                bytes.len() as f64 / 1024.0 / 1024.0,
                config.max_file_size as f64 / 1024.0 / 1024.0
            )));
        }
        Self::validate_signature(&bytes, kind)?;

        Ok(RawInputData {
            bytes,
            source_hint: "base64",
        })
    }

    fn estimate_base64_decoded_upper_bound_len(base64_data: &str) -> Result<u64, GifError> {
        let len = base64_data.len() as u64;
        len.checked_add(3)
            .map(|n| n / 4)
            .and_then(|groups| groups.checked_mul(3))
            .ok_or_else(|| GifError::ResourceLimit("Base64 长度估算溢出".to_string()))
    }

    /// 解析 Data URL 或纯 Base64，并在解码前按长度上界拒绝超限输入。
    fn parse_base64_with_limit(data: &str, max_file_size: u64) -> Result<Vec<u8>, GifError> {
        let trimmed = data.trim();
        let base64_data = if trimmed.starts_with("data:") {
            let (header, payload) = trimmed
                .split_once(',')
                .ok_or_else(|| GifError::InvalidFormat("Data URL 缺少数据部分".to_string()))?;
            if !header.ends_with(";base64") {
                return Err(GifError::InvalidFormat("仅支持 base64 编码的 Data URL".to_string()));
            }
            payload
        } else {
            trimmed
        };

        if base64_data.is_empty() {
            return Err(GifError::InvalidFormat("Base64 数据为空".to_string()));
        }

        let upper_bound = Self::estimate_base64_decoded_upper_bound_len(base64_data)?;
        if upper_bound > max_file_size {
            return Err(GifError::ResourceLimit(format!(
                "Base64 数据过大：约 {:.2} MB（限制：{:.2} MB）",
                upper_bound as f64 / 1024.0 / 1024.0,
                max_file_size as f64 / 1024.0 / 1024.0
            )));
        }

        general_purpose::STANDARD
            .decode(base64_data)
            .map_err(|e| GifError::InvalidFormat(format!("Base64 解码失败：{}", e)))
    }

    /// 通过文件签名（magic bytes）校验内容与用途一致。
    fn validate_signature(bytes: &[u8], kind: InputKind) -> Result<(), GifError> {
        if bytes.is_empty() {
            return Err(GifError::InvalidFormat("文件内容为空".to_string()));
        }

        let detected = infer::get(bytes)
            .ok_or_else(|| GifError::InvalidFormat("无法识别文件类型".to_string()))?;

        if !kind.accepts_mime(detected.mime_type()) {
            return Err(GifError::InvalidFormat(format!(
                "文件签名与用途不符：{}（{:?}）",
                detected.mime_type(),
                kind
            )));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gif_handler::GifConfig;
    use base64::{Engine as _, engine::general_purpose};

    const PNG_SIGNATURE: [u8; 12] = [137, 80, 78, 71, 13, 10, 26, 10, 0, 0, 0, 13];

    #[test]
    fn load_from_file_reports_missing_file() {
        let handler = GifHandler::new(GifConfig::default()).expect("handler init failed");
        let config = GifConfig::default();

        let result = handler.load_from_file("/definitely/missing/sheet.png", InputKind::SpriteSheet, &config);
        assert!(matches!(result, Err(GifError::FileSystem(_))));
    }

    #[test]
    fn load_from_base64_rejects_non_image_payload() {
        let handler = GifHandler::new(GifConfig::default()).expect("handler init failed");
        let config = GifConfig::default();

        let result = handler.load_from_base64("SGVsbG8=", InputKind::SpriteSheet, &config);

        assert!(matches!(result, Err(GifError::InvalidFormat(_))));
    }

    #[test]
    fn load_from_base64_accepts_data_url() {
        let handler = GifHandler::new(GifConfig::default()).expect("handler init failed");
        let config = GifConfig::default();
        let data_url = format!(
            "data:image/png;base64,{}",
            general_purpose::STANDARD.encode(PNG_SIGNATURE)
        );

        let raw = handler
            .load_from_base64(&data_url, InputKind::SpriteSheet, &config)
            .expect("png signature should pass");
        assert_eq!(raw.bytes, PNG_SIGNATURE);
        assert_eq!(raw.source_hint, "base64");
    }

    #[test]
    fn signature_must_match_kind() {
        assert!(GifHandler::validate_signature(&PNG_SIGNATURE, InputKind::SpriteSheet).is_ok());
        assert!(matches!(
            GifHandler::validate_signature(&PNG_SIGNATURE, InputKind::Gif),
            Err(GifError::InvalidFormat(_))
        ));
        assert!(GifHandler::validate_signature(b"GIF89a\x01\x00\x01\x00", InputKind::Gif).is_ok());
    }

    #[test]
    fn parse_base64_with_limit_rejects_large_payload_before_decode() {
        let huge = "A".repeat(1024 * 1024);
        let result = GifHandler::parse_base64_with_limit(&huge, 32);

        assert!(matches!(result, Err(GifError::ResourceLimit(_))));
    }

    #[test]
    fn parse_base64_rejects_non_base64_data_url() {
        let result = GifHandler::parse_base64_with_limit("data:image/png,rawbytes", u64::MAX);
        assert!(matches!(result, Err(GifError::InvalidFormat(_))));
    }
}
