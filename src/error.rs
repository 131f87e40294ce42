//! 统一错误类型模块
//!
//! # 设计思路
//!
//! 定义全局统一的 `AppError` 枚举，承载 GIF 处理错误、文件 I/O 错误、设置读写错误
//! 以及命令行参数错误，替代分散的 `.map_err(|e| e.to_string())` 与 `expect()`。
//!
//! # 实现思路
//!
//! - 使用 `thiserror` 派生可读错误消息。
//! - 为 `GifError` 与 `std::io::Error` 提供 `From` 转换，无需手动 map。
//! - 实现 `Serialize` 将错误序列化为字符串，便于输出 JSON 结果。

use serde::Serialize;

use crate::gif_handler::GifError;

/// 应用级统一错误类型
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// GIF 处理流水线错误（校验 / 加载 / 解码 / 编码 / 修复）
    #[error("{0}")]
    Gif(#[from] GifError),

    /// 文件系统 I/O 错误
    #[error("文件系统错误: {0}")]
    Io(#[from] std::io::Error),

    /// 设置文件读写或解析失败
    #[error("设置错误: {0}")]
    Settings(String),

    /// 命令行参数错误
    #[error("参数错误: {0}")]
    Usage(String),
}

impl AppError {
    /// 稳定错误码，未细分的错误统一归入 `E_APP`。
    pub fn code(&self) -> &'static str {
        match self {
            Self::Gif(err) => err.code(),
            Self::Io(_) => "E_IO",
            Self::Settings(_) => "E_SETTINGS",
            Self::Usage(_) => "E_USAGE",
        }
    }
}

/// 将错误序列化为人类可读的字符串。
impl Serialize for AppError {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn gif_error_code_passes_through() {
        let err = AppError::from(GifError::Corruption { byte: Some(0x00) });
        assert_eq!(err.code(), "E_CORRUPTION");
    }

    #[test]
    fn serializes_as_message_string() {
        let err = AppError::Usage("缺少输入文件".to_string());
        let json = serde_json::to_string(&err).expect("serialize");
        assert_eq!(json, "\"参数错误: 缺少输入文件\"");
    }
}
