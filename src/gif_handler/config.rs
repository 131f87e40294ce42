//! # 配置模块
//!
//! ## 设计思路
//!
//! 将所有“可调策略”集中到 `GifConfig`，保证运行时行为可观测、可调整、可测试。
//! 其中性能档位（quality / balanced / speed）作为高层语义，映射到 GIF 编码器的量化速度。
//!
//! ## 实现思路
//!
//! - `Default` 提供生产可用的平衡配置。
//! - `GifPerformanceProfile` 负责档位字符串解析与反向输出。
//! - `apply_performance_profile` 将档位转换为具体参数。
//! - `infer_performance_profile` 用于从当前配置反推档位。
//! - 整个结构可序列化，由 `settings` 模块负责 JSON 持久化。

use serde::{Deserialize, Serialize};

use super::GifError;

/// GIF 处理配置。
///
/// 字段覆盖了读取、解码、合成与编码四个阶段。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GifConfig {
    /// 读取原始字节时允许的最大文件体积（字节）。
    pub max_file_size: u64,
    /// 解码后的像素上限（`width * height`）。
    pub max_decoded_pixels: u64,
    /// 解码阶段允许的预计内存上限（按 RGBA 估算，字节）。
    pub max_decoded_bytes: u64,
    /// 未指定背景色时使用的默认值（`#RGB` 或 `#RRGGBB`）。
    pub default_background: String,
    /// GIF 编码器量化速度，1（最慢、质量最好）~ 30（最快）。
    pub encoder_speed: i32,
}

impl Default for GifConfig {
    fn default() -> Self {
        Self {
            max_file_size: 50 * 1024 * 1024,
            max_decoded_pixels: 40_000_000,
            max_decoded_bytes: 160 * 1024 * 1024,
            default_background: "#ccc".to_string(),
            encoder_speed: 10,
        }
    }
}

/// GIF 编码性能档位。
///
/// - `Quality`：量化最精细，编码最慢
/// - `Balanced`：默认
/// - `Speed`：优先编码速度
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GifPerformanceProfile {
    Quality,
    Balanced,
    Speed,
}

impl GifPerformanceProfile {
    /// 从外部字符串解析档位。
    ///
    /// # 示例
    /// ```rust
    /// use sprite_gif::gif_handler::GifPerformanceProfile;
    ///
    /// let p = GifPerformanceProfile::from_str("balanced")?;
    /// assert_eq!(p.as_str(), "balanced");
    /// # Ok::<(), sprite_gif::gif_handler::GifError>(())
    /// ```
    pub fn from_str(profile: &str) -> Result<Self, GifError> {
        match profile.trim().to_lowercase().as_str() {
            "quality" => Ok(Self::Quality),
            "balanced" => Ok(Self::Balanced),
            "speed" => Ok(Self::Speed),
            other => Err(GifError::Validation(format!(
                "未知性能档位：{}（可选：quality / balanced / speed）",
                other
            ))),
        }
    }

    /// 将档位输出为稳定字符串。
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Quality => "quality",
            Self::Balanced => "balanced",
            Self::Speed => "speed",
        }
    }
}

impl GifConfig {
    /// 基于当前编码速度反推性能档位。
    pub(crate) fn infer_performance_profile(&self) -> GifPerformanceProfile {
        if self.encoder_speed <= 5 {
            return GifPerformanceProfile::Quality;
        }

        if self.encoder_speed >= 20 {
            return GifPerformanceProfile::Speed;
        }

        GifPerformanceProfile::Balanced
    }

    /// 应用指定性能档位到实际参数。
    pub(crate) fn apply_performance_profile(&mut self, profile: GifPerformanceProfile) {
        self.encoder_speed = match profile {
            GifPerformanceProfile::Quality => 1,
            GifPerformanceProfile::Balanced => 10,
            GifPerformanceProfile::Speed => 30,
        };
    }
}
