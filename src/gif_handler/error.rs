//! # 错误模型模块
//!
//! ## 设计思路
//!
//! 使用单一错误枚举承载 GIF 生成与修复链路中的所有错误来源，避免字符串拼接式错误处理。
//! 通过 `thiserror` 保持人类可读错误，同时让调用侧可按分支匹配。
//!
//! 注意：“帧数为 0” 不是错误，而是 `GenerationOutcome::Empty`，由调用方区分展示。

/// GIF 处理统一错误类型。
///
/// 该类型会在应用层被上转为 `AppError`。
#[derive(Debug, thiserror::Error)]
pub enum GifError {
    /// 参数校验失败（帧尺寸、延迟、背景色、扩展名），发生在任何处理之前。
    #[error("参数错误：{0}")]
    Validation(String),

    #[error("解码错误：{0}")]
    Decode(String),

    #[error("编码错误：{0}")]
    Encode(String),

    #[error("格式错误：{0}")]
    InvalidFormat(String),

    #[error("文件错误：{0}")]
    FileSystem(String),

    #[error("资源限制：{0}")]
    ResourceLimit(String),

    /// 修复流程在裁剪尾部空字节后没有找到 GIF 结束符 `0x3B`。
    ///
    /// `byte` 为边界处的异常字节；输入全为空字节时为 `None`。
    #[error("{}", corruption_message(.byte))]
    Corruption { byte: Option<u8> },

    #[error("内部错误：{0}")]
    Internal(String),
}

fn corruption_message(byte: &Option<u8>) -> String {
    match *byte {
        Some(value) => format!("GIF 数据损坏：最后一个非空字节为 0x{:02X}（期望 0x3B）", value),
        None => "GIF 数据损坏：未找到结束符 0x3B（数据为空或全为空字节）".to_string(),
    }
}

impl GifError {
    /// 稳定错误码，供界面层分支处理。
    pub fn code(&self) -> &'static str {
        match self {
            Self::Validation(_) => "E_VALIDATION",
            Self::Decode(_) => "E_DECODE",
            Self::Encode(_) => "E_ENCODE",
            Self::InvalidFormat(_) => "E_INVALID_FORMAT",
            Self::FileSystem(_) => "E_FILE_SYSTEM",
            Self::ResourceLimit(_) => "E_RESOURCE_LIMIT",
            Self::Corruption { .. } => "E_CORRUPTION",
            Self::Internal(_) => "E_INTERNAL",
        }
    }

    /// 出错阶段，便于日志与诊断。
    pub fn stage(&self) -> &'static str {
        match self {
            Self::Validation(_) => "validate",
            Self::InvalidFormat(_) | Self::FileSystem(_) => "load",
            Self::Decode(_) | Self::ResourceLimit(_) => "decode",
            Self::Encode(_) => "encode",
            Self::Corruption { .. } => "repair",
            Self::Internal(_) => "internal",
        }
    }
}

impl From<GifError> for String {
    fn from(error: GifError) -> Self {
        error.to_string()
    }
}
