//! # 数据源与中间模型
//!
//! ## 设计思路
//!
//! 将“外部输入类型”和“流水线中间结果”解耦：
//! - `InputSource` 表示外部来源语义（本地文件 / Base64）
//! - `InputKind` 表示该输入在哪条流水线中使用，决定允许的扩展名与文件签名
//! - `RawInputData` 表示已加载但未解码的字节

use std::path::Path;

use super::GifError;

/// 输入来源。
#[derive(Debug, Clone)]
pub enum InputSource {
    /// 本地文件路径。
    FilePath(String),
    /// Base64（支持 Data URL 与纯 Base64 字符串）。
    Base64(String),
}

impl InputSource {
    /// 来源提示（用于日志与诊断）。
    pub(crate) fn hint(&self) -> &'static str {
        match self {
            Self::FilePath(_) => "file",
            Self::Base64(_) => "base64",
        }
    }
}

/// 输入用途。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputKind {
    /// 精灵图：`.png` / `.jpg` / `.jpeg`。
    SpriteSheet,
    /// 待修复的 GIF：`.gif`。
    Gif,
}

impl InputKind {
    pub fn allowed_extensions(self) -> &'static [&'static str] {
        match self {
            Self::SpriteSheet => &["png", "jpg", "jpeg"],
            Self::Gif => &["gif"],
        }
    }

    /// 文件签名识别出的 MIME 是否符合用途。
    pub(crate) fn accepts_mime(self, mime: &str) -> bool {
        match self {
            Self::SpriteSheet => matches!(mime, "image/png" | "image/jpeg"),
            Self::Gif => mime == "image/gif",
        }
    }

    /// 校验文件扩展名（大小写不敏感），在读取文件之前执行。
    ///
    /// # 示例
    /// ```rust
    /// use sprite_gif::gif_handler::InputKind;
    ///
    /// assert!(InputKind::SpriteSheet.check_extension("walk.PNG").is_ok());
    /// assert!(InputKind::Gif.check_extension("walk.png").is_err());
    /// ```
    pub fn check_extension(self, path: &str) -> Result<(), GifError> {
        let extension = Path::new(path)
            .extension()
            .and_then(|ext| ext.to_str())
            .map(str::to_ascii_lowercase);

        match extension {
            Some(ext) if self.allowed_extensions().contains(&ext.as_str()) => Ok(()),
            _ => Err(GifError::Validation(format!(
                "不支持的文件类型：{}（允许：{}）",
                path,
                self.allowed_extensions()
                    .iter()
                    .map(|ext| format!(".{}", ext))
                    .collect::<Vec<_>>()
                    .join(" / ")
            ))),
        }
    }
}

/// 加载阶段输出：原始字节与来源标识。
pub(crate) struct RawInputData {
    /// 原始字节。
    pub(crate) bytes: Vec<u8>,
    pub(crate) source_hint: &'static str,
}

/// 输出文件名：输入文件名（去掉扩展名）+ `.gif`。
///
/// # 示例
/// ```rust
/// use sprite_gif::gif_handler::output_file_name;
///
/// assert_eq!(output_file_name("sheets/knight_walk.png")?, "knight_walk.gif");
/// # Ok::<(), sprite_gif::gif_handler::GifError>(())
/// ```
pub fn output_file_name(input: &str) -> Result<String, GifError> {
    let stem = Path::new(input)
        .file_stem()
        .and_then(|stem| stem.to_str())
        .filter(|stem| !stem.is_empty())
        .ok_or_else(|| GifError::Validation(format!("无法从路径推导输出文件名：{}", input)))?;

    Ok(format!("{}.gif", stem))
}
