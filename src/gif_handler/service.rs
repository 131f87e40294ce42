//! # 服务层（可注入状态）
//!
//! ## 设计思路
//!
//! 使用 `GifServiceState` 作为可注入状态，替代全局单例函数。
//! 好处：
//! 1. 生命周期清晰（由调用方统一创建与持有）
//! 2. 测试可创建独立实例，减少共享状态副作用
//! 3. 两个并发请求各自分配缓冲区，互不干扰
//!
//! ## 实现思路
//!
//! 核心算法是同步纯函数；服务层在 tokio 阻塞线程池中执行解码 / 切分 / 编码与修复，
//! 避免占用异步运行时的工作线程。

use std::sync::Arc;

use super::handler::{GenerateRequest, GenerationOutcome, GifAdvancedConfig};
use super::repair::RepairOutcome;
use super::{GifConfig, GifError, GifHandler, GifPerformanceProfile, InputSource};

/// GIF 处理服务状态。
pub struct GifServiceState {
    handler: Arc<GifHandler>,
}

impl GifServiceState {
    /// 使用默认配置创建服务状态。
    ///
    /// # 示例
    /// ```rust
    /// use sprite_gif::gif_handler::GifServiceState;
    ///
    /// let service = GifServiceState::new()?;
    /// # Ok::<(), sprite_gif::gif_handler::GifError>(())
    /// ```
    pub fn new() -> Result<Self, GifError> {
        Self::with_config(GifConfig::default())
    }

    /// 使用自定义配置创建服务状态。
    pub fn with_config(config: GifConfig) -> Result<Self, GifError> {
        Ok(Self {
            handler: Arc::new(GifHandler::new(config)?),
        })
    }

    /// 执行完整生成流程：加载→解码→切分→编码。
    pub async fn generate(&self, request: GenerateRequest) -> Result<GenerationOutcome, GifError> {
        let handler = Arc::clone(&self.handler);
        tokio::task::spawn_blocking(move || handler.generate(request))
            .await
            .map_err(|e| GifError::Internal(format!("生成任务异常退出：{}", e)))?
    }

    /// 执行修复流程：加载→去除尾部空字节→校验结束符。
    pub async fn repair(&self, source: InputSource) -> Result<RepairOutcome, GifError> {
        let handler = Arc::clone(&self.handler);
        tokio::task::spawn_blocking(move || handler.repair(source))
            .await
            .map_err(|e| GifError::Internal(format!("修复任务异常退出：{}", e)))?
    }

    /// 设置性能档位。
    ///
    /// # 示例
    /// ```rust
    /// use sprite_gif::gif_handler::GifServiceState;
    ///
    /// let service = GifServiceState::new()?;
    /// service.set_performance_profile("speed")?;
    /// assert_eq!(service.get_performance_profile()?, "speed");
    /// # Ok::<(), sprite_gif::gif_handler::GifError>(())
    /// ```
    pub fn set_performance_profile(&self, profile: &str) -> Result<(), GifError> {
        let profile = GifPerformanceProfile::from_str(profile)?;
        self.handler.set_performance_profile(profile)
    }

    /// 获取当前生效性能档位（字符串）。
    pub fn get_performance_profile(&self) -> Result<String, GifError> {
        let profile = self.handler.get_performance_profile()?;
        Ok(profile.as_str().to_string())
    }

    pub fn set_advanced_config(&self, config: GifAdvancedConfig) -> Result<(), GifError> {
        self.handler.set_advanced_config(config)
    }

    pub fn get_advanced_config(&self) -> Result<GifAdvancedConfig, GifError> {
        self.handler.get_advanced_config()
    }

    /// 当前完整配置快照（用于持久化）。
    pub fn config(&self) -> Result<GifConfig, GifError> {
        self.handler.config_snapshot()
    }
}
