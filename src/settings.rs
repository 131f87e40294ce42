//! 设置持久化模块
//!
//! # 设计思路
//!
//! `GifConfig` 以 JSON 文件形式保存，作为显式配置传入服务层，而不是进程级全局状态。
//! 文件中缺失的字段回退到默认值；默认背景色在加载时同样执行十六进制校验。

use std::fs;
use std::path::Path;

use crate::error::AppError;
use crate::gif_handler::{BackgroundColor, GifConfig};

/// 从 JSON 文件读取配置；文件不存在时返回 `Ok(None)`。
pub fn load_config(path: &Path) -> Result<Option<GifConfig>, AppError> {
    if !path.exists() {
        return Ok(None);
    }

    let content = fs::read_to_string(path)?;
    let config = serde_json::from_str::<GifConfig>(&content)
        .map_err(|e| AppError::Settings(format!("解析设置文件失败: {}", e)))?;

    BackgroundColor::parse(&config.default_background)?;

    log::info!("⚙️ 已加载设置文件: {}", path.display());
    Ok(Some(config))
}

/// 将配置写入 JSON 文件（必要时创建父目录）。
pub fn save_config(path: &Path, config: &GifConfig) -> Result<(), AppError> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .map_err(|e| AppError::Settings(format!("创建设置目录失败: {}", e)))?;
    }

    let content = serde_json::to_string_pretty(config)
        .map_err(|e| AppError::Settings(format!("序列化设置失败: {}", e)))?;

    fs::write(path, content)?;
    Ok(())
}
