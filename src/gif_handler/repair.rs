//! # GIF 尾部修复
//!
//! 某些导出工具会在 GIF 结束符 `0x3B` 之后追加一串 `0x00`，导致部分解码器拒绝该文件。
//! 修复流程只看尾部：从最后一个字节向前跳过空字节，检查停下位置是否为结束符，
//! 然后截断到结束符为止。不解析文件头、逻辑屏幕描述符或任何帧数据块。

use super::GifError;

/// GIF 结束符（ASCII `;`）。
pub const GIF_TRAILER: u8 = 0x3B;

/// 修复结果：新的字节流与被移除的空字节数量。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepairOutcome {
    pub bytes: Vec<u8>,
    pub trimmed: usize,
}

/// 去除尾部空字节并校验结束符。
///
/// 停止位置不是 `0x3B`（或输入为空 / 全为空字节）时返回 `GifError::Corruption`，
/// 不做任何“尽力而为”的输出。
///
/// # 示例
/// ```rust
/// use sprite_gif::gif_handler::repair;
///
/// let outcome = repair(&[0x47, 0x49, 0x46, 0x3B, 0x00, 0x00, 0x00])?;
/// assert_eq!(outcome.bytes, vec![0x47, 0x49, 0x46, 0x3B]);
/// assert_eq!(outcome.trimmed, 3);
/// # Ok::<(), sprite_gif::gif_handler::GifError>(())
/// ```
pub fn repair(bytes: &[u8]) -> Result<RepairOutcome, GifError> {
    let Some(last) = bytes.iter().rposition(|&b| b != 0x00) else {
        return Err(GifError::Corruption { byte: None });
    };

    let trimmed = bytes.len() - (last + 1);

    if bytes[last] != GIF_TRAILER {
        return Err(GifError::Corruption { byte: Some(bytes[last]) });
    }

    if trimmed > 0 {
        log::info!("🧹 已移除 {} 个尾部空字节", trimmed);
    } else {
        log::debug!("GIF 尾部无空字节，无需修复");
    }

    Ok(RepairOutcome {
        bytes: bytes[..=last].to_vec(),
        trimmed,
    })
}

/// 仅返回修复后的字节流。
pub fn repair_bytes(bytes: &[u8]) -> Result<Vec<u8>, GifError> {
    repair(bytes).map(|outcome| outcome.bytes)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trims_trailing_nulls() {
        let outcome = repair(&[0x47, 0x49, 0x46, 0x3B, 0x00, 0x00, 0x00]).expect("repairable");
        assert_eq!(outcome.bytes, vec![0x47, 0x49, 0x46, 0x3B]);
        assert_eq!(outcome.trimmed, 3);
    }

    #[test]
    fn clean_stream_is_unchanged() {
        let input = [0x47, 0x49, 0x46, 0x38, 0x39, 0x61, 0x3B];
        let outcome = repair(&input).expect("repairable");
        assert_eq!(outcome.bytes, input);
        assert_eq!(outcome.trimmed, 0);
    }

    #[test]
    fn wrong_boundary_byte_is_corruption() {
        let result = repair(&[0x47, 0x49, 0x46, 0xFF]);
        assert!(matches!(result, Err(GifError::Corruption { byte: Some(0xFF) })));

        let result = repair(&[0x47, 0x3B, 0x01, 0x00, 0x00]);
        assert!(matches!(result, Err(GifError::Corruption { byte: Some(0x01) })));
    }

    #[test]
    fn all_null_or_empty_is_corruption() {
        assert!(matches!(repair(&[0x00, 0x00, 0x00]), Err(GifError::Corruption { byte: None })));
        assert!(matches!(repair(&[]), Err(GifError::Corruption { byte: None })));
    }

    #[test]
    fn interior_nulls_are_untouched() {
        let input = [0x00, 0x00, 0x47, 0x00, 0x3B, 0x00];
        assert_eq!(repair_bytes(&input).expect("repairable"), vec![0x00, 0x00, 0x47, 0x00, 0x3B]);
    }

    #[test]
    fn single_trailer_byte_is_valid() {
        assert_eq!(repair_bytes(&[0x3B, 0x00]).expect("repairable"), vec![0x3B]);
    }
}
