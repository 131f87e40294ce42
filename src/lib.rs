//! # 精灵图转 GIF 工具 — 库入口
//!
//! ## 架构总览
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────┐
//! │            调用方（命令行 main.rs / 其他界面层）          │
//! │       参数输入 · 文件选择 · 下载保存 · 设置文件           │
//! └───────┬──────────────────────────────────────────────────┘
//!         ↕ Result<T, AppError>
//! ┌───────┼──────────────────────────────────────────────────┐
//! │       ↕            后端 (Rust)                           │
//! │                                                          │
//! │  ┌─ error ────── AppError (统一错误类型)                  │
//! │  │                                                       │
//! │  ├─ settings ─── GifConfig JSON 读写                      │
//! │  │                                                       │
//! │  └─ gif_handler  GIF 生成与修复                           │
//! │      ├─ slicer       网格切分 + 背景合成（纯函数）        │
//! │      ├─ repair       尾部空字节修复（纯函数）             │
//! │      ├─ loader       文件 / Base64 加载与校验             │
//! │      ├─ pipeline     解码 + GIF 编码                      │
//! │      └─ service      异步入口 + 配置                      │
//! └──────────────────────────────────────────────────────────┘
//! ```
//!
//! ## 模块职责
//!
//! | 模块 | 职责 |
//! |------|------|
//! | [`error`] | 统一错误类型 `AppError` |
//! | [`gif_handler`] | 精灵图切分合成、GIF 编码、GIF 尾部修复 |
//! | [`settings`] | 配置文件的加载与保存 |

pub mod error;
pub mod gif_handler;
pub mod settings;
