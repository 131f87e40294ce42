//! # 背景色解析
//!
//! 背景色只接受 `#RGB` 与 `#RRGGBB` 两种形式，空字符串表示使用配置默认值。
//! 校验对所有路径强制执行，包括配置中的默认值本身。

use image::Rgba;
use once_cell::sync::Lazy;
use regex::Regex;

use super::GifError;

static HEX_COLOR: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^#([A-Fa-f0-9]{6}|[A-Fa-f0-9]{3})$").unwrap());

/// 不透明的帧背景色。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BackgroundColor {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl BackgroundColor {
    pub const WHITE: Self = Self { r: 0xFF, g: 0xFF, b: 0xFF };

    /// 解析 `#RGB` / `#RRGGBB`。
    ///
    /// # 示例
    /// ```rust
    /// use sprite_gif::gif_handler::BackgroundColor;
    ///
    /// let c = BackgroundColor::parse("#abc")?;
    /// assert_eq!((c.r, c.g, c.b), (0xAA, 0xBB, 0xCC));
    /// # Ok::<(), sprite_gif::gif_handler::GifError>(())
    /// ```
    pub fn parse(value: &str) -> Result<Self, GifError> {
        if !HEX_COLOR.is_match(value) {
            return Err(GifError::Validation(format!("无效的十六进制颜色：{:?}", value)));
        }

        let digits = &value[1..];
        let channel = |hex: &str| {
            u8::from_str_radix(hex, 16)
                .map_err(|e| GifError::Validation(format!("无效的颜色分量 {}：{}", hex, e)))
        };

        if digits.len() == 3 {
            // #abc -> #aabbcc
            let expand = |i: usize| channel(digits[i..=i].repeat(2).as_str());
            Ok(Self { r: expand(0)?, g: expand(1)?, b: expand(2)? })
        } else {
            Ok(Self {
                r: channel(&digits[0..2])?,
                g: channel(&digits[2..4])?,
                b: channel(&digits[4..6])?,
            })
        }
    }

    /// 解析用户输入；`None` 或空字符串回退到 `default`（同样需通过校验）。
    pub fn resolve(value: Option<&str>, default: &str) -> Result<Self, GifError> {
        match value.map(str::trim) {
            Some(v) if !v.is_empty() => Self::parse(v),
            _ => Self::parse(default),
        }
    }

    /// 仅做格式校验（空字符串视为合法，表示使用默认值）。
    pub fn is_valid_input(value: &str) -> bool {
        value.is_empty() || HEX_COLOR.is_match(value)
    }

    pub fn to_rgba(self) -> Rgba<u8> {
        Rgba([self.r, self.g, self.b, 0xFF])
    }
}

impl Default for BackgroundColor {
    fn default() -> Self {
        Self::WHITE
    }
}
