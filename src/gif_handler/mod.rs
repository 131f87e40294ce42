//! # GIF 处理模块（gif_handler）
//!
//! ## 设计思路
//!
//! 该模块将“参数校验 → 加载校验 → 解码 → 网格切分合成 → GIF 编码”以及“GIF 尾部修复”
//! 按职责拆分为多个子模块，避免单文件膨胀与耦合。
//!
//! - `service`：承载可注入状态（`GifServiceState`），提供异步入口
//! - `handler`：编排整条处理流水线
//! - `loader`：负责文件 / Base64 加载与签名校验
//! - `pipeline`：负责解码（含像素限制）与 GIF 编码
//! - `slicer`：精灵图切分与背景合成（纯函数）
//! - `repair`：尾部空字节修复（纯函数）
//! - `geometry/color`：帧尺寸、网格布局、预览框与背景色
//! - `config/error/source`：配置、错误、中间数据模型
//!
//! ## 新同事快速上手
//!
//! ```text
//! main.rs / 调用方
//!    ↓
//! service.rs（状态持有、spawn_blocking）
//!    ↓
//! handler.rs（统一编排 + 阶段耗时日志）
//!    ├─ loader.rs（来源加载 + 扩展名 / 体积 / 签名校验）
//!    ├─ pipeline.rs（解码 + 像素限制 / GIF 编码）
//!    ├─ slicer.rs（网格切分 + 背景合成）
//!    └─ repair.rs（去除尾部空字节 + 结束符校验）
//!    ↓
//! 返回 GifError / AppError
//! ```

mod color;
mod config;
mod error;
mod geometry;
mod handler;
mod loader;
mod pipeline;
mod repair;
mod service;
mod slicer;
mod source;

pub use color::BackgroundColor;
pub use config::{GifConfig, GifPerformanceProfile};
pub use error::GifError;
pub use geometry::{preview_rect, FrameGeometry, GridLayout, PreviewRect};
pub use handler::{GenerateRequest, GeneratedGif, GenerationOutcome, GifAdvancedConfig, GifHandler};
pub use repair::{repair, repair_bytes, RepairOutcome, GIF_TRAILER};
pub use service::GifServiceState;
pub use slicer::{slice, Frame, FrameSequence};
pub use source::{output_file_name, InputKind, InputSource};
