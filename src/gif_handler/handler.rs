//! # 核心编排模块
//!
//! ## 设计思路
//!
//! `GifHandler` 只负责流程编排与配置管理，不涉及任何界面或运行时。
//! 生成链路固定为：
//! 1. 读取配置快照
//! 2. 校验请求参数（帧尺寸、延迟、背景色、扩展名），任何一项失败都不触碰输入数据
//! 3. 加载原始字节并解码
//! 4. 切分合成帧序列；帧数为 0 时直接返回 `GenerationOutcome::Empty`
//! 5. 编码为 GIF
//!
//! 修复链路：读取配置快照 → 加载 → 尾部修复。
//!
//! ## 实现思路
//!
//! - 配置通过 `Arc<RwLock<GifConfig>>` 支持运行时动态切档。
//! - 单次请求内使用“同一配置快照”，避免处理中途配置漂移。
//! - 记录各阶段耗时，便于性能诊断。

use std::sync::{Arc, RwLock};
use std::time::Instant;

use serde::Serialize;

use super::color::BackgroundColor;
use super::geometry::FrameGeometry;
use super::repair::{self, RepairOutcome};
use super::slicer;
use super::source::{InputKind, InputSource};
use super::{GifConfig, GifError, GifPerformanceProfile};

/// 一次 GIF 生成请求。
#[derive(Debug, Clone)]
pub struct GenerateRequest {
    pub source: InputSource,
    pub frame_width: u32,
    pub frame_height: u32,
    pub delay_ms: u32,
    /// `None` 或空字符串表示使用配置默认背景色。
    pub background: Option<String>,
}

/// 生成成功的 GIF。
#[derive(Debug, Clone, Serialize)]
pub struct GeneratedGif {
    #[serde(skip)]
    pub bytes: Vec<u8>,
    pub frame_count: usize,
    pub columns: u32,
    pub rows: u32,
    pub frame_width: u32,
    pub frame_height: u32,
    pub delay_ms: u32,
}

/// 生成结果：成功产出 GIF，或网格切分得到 0 帧（不是错误）。
#[derive(Debug, Clone)]
pub enum GenerationOutcome {
    Generated(GeneratedGif),
    Empty { image_width: u32, image_height: u32 },
}

/// 可对外调整的高级配置。
#[derive(Debug, Clone, PartialEq, Serialize, serde::Deserialize)]
pub struct GifAdvancedConfig {
    pub max_file_size: u64,
    pub max_decoded_pixels: u64,
    pub max_decoded_bytes: u64,
    pub default_background: String,
}

/// GIF 处理器。
pub struct GifHandler {
    pub(super) config: Arc<RwLock<GifConfig>>,
}

impl GifHandler {
    /// 根据初始配置创建处理器；配置中的默认背景色必须合法。
    pub fn new(config: GifConfig) -> Result<Self, GifError> {
        BackgroundColor::parse(&config.default_background)?;
        Ok(Self {
            config: Arc::new(RwLock::new(config)),
        })
    }

    /// 获取配置快照。
    ///
    /// 作用：保证单次请求链路使用一致参数。
    pub(crate) fn config_snapshot(&self) -> Result<GifConfig, GifError> {
        self.config
            .read()
            .map(|cfg| cfg.clone())
            .map_err(|_| GifError::ResourceLimit("配置读取锁已中毒".to_string()))
    }

    pub fn set_performance_profile(&self, profile: GifPerformanceProfile) -> Result<(), GifError> {
        let mut config = self
            .config
            .write()
            .map_err(|_| GifError::ResourceLimit("配置写入锁已中毒".to_string()))?;
        config.apply_performance_profile(profile);

        log::info!(
            "⚙️ 已切换 GIF 编码档位：{:?}（encoder_speed={}）",
            profile,
            config.encoder_speed
        );

        Ok(())
    }

    pub fn get_performance_profile(&self) -> Result<GifPerformanceProfile, GifError> {
        let config = self
            .config
            .read()
            .map_err(|_| GifError::ResourceLimit("配置读取锁已中毒".to_string()))?;
        Ok(config.infer_performance_profile())
    }

    /// 设置体积 / 像素限制与默认背景色。
    pub fn set_advanced_config(&self, advanced: GifAdvancedConfig) -> Result<(), GifError> {
        if advanced.max_file_size < 1024 {
            return Err(GifError::Validation("max_file_size 不能小于 1KB".to_string()));
        }
        if advanced.max_decoded_pixels == 0 {
            return Err(GifError::Validation("max_decoded_pixels 必须大于 0".to_string()));
        }
        if advanced.max_decoded_bytes < 8 * 1024 * 1024 {
            return Err(GifError::Validation("max_decoded_bytes 不能小于 8MB".to_string()));
        }
        BackgroundColor::parse(&advanced.default_background)?;

        let mut config = self
            .config
            .write()
            .map_err(|_| GifError::ResourceLimit("配置写入锁已中毒".to_string()))?;

        config.max_file_size = advanced.max_file_size;
        config.max_decoded_pixels = advanced.max_decoded_pixels;
        config.max_decoded_bytes = advanced.max_decoded_bytes;
        config.default_background = advanced.default_background;

        Ok(())
    }

    pub fn get_advanced_config(&self) -> Result<GifAdvancedConfig, GifError> {
        let config = self.config_snapshot()?;
        Ok(GifAdvancedConfig {
            max_file_size: config.max_file_size,
            max_decoded_pixels: config.max_decoded_pixels,
            max_decoded_bytes: config.max_decoded_bytes,
            default_background: config.default_background,
        })
    }

    /// 生成主入口：精灵图 → GIF。
    ///
    /// # 示例
    /// ```rust,no_run
    /// use sprite_gif::gif_handler::{GenerateRequest, GifConfig, GifHandler, InputSource};
    ///
    /// let handler = GifHandler::new(GifConfig::default())?;
    /// let outcome = handler.generate(GenerateRequest {
    ///     source: InputSource::FilePath("walk.png".into()),
    ///     frame_width: 210,
    ///     frame_height: 210,
    ///     delay_ms: 125,
    ///     background: Some("#ccc".into()),
    /// })?;
    /// # Ok::<(), sprite_gif::gif_handler::GifError>(())
    /// ```
    pub fn generate(&self, request: GenerateRequest) -> Result<GenerationOutcome, GifError> {
        let config = self.config_snapshot()?;
        let total_start = Instant::now();

        let geometry = FrameGeometry::new(request.frame_width, request.frame_height)?;
        if request.delay_ms == 0 {
            return Err(GifError::Validation("帧延迟必须为正整数（毫秒）".to_string()));
        }
        let background =
            BackgroundColor::resolve(request.background.as_deref(), &config.default_background)?;
        if let InputSource::FilePath(path) = &request.source {
            InputKind::SpriteSheet.check_extension(path)?;
        }

        let load_start = Instant::now();
        let raw = self.load(&request.source, InputKind::SpriteSheet, &config)?;
        let load_elapsed = load_start.elapsed();

        let decode_start = Instant::now();
        let image = self.decode_raster(&raw, &config)?;
        let decode_elapsed = decode_start.elapsed();

        let slice_start = Instant::now();
        let layout = geometry.layout_for(image.width(), image.height());
        let sequence = slicer::slice(&image, geometry, background, request.delay_ms)?;
        let slice_elapsed = slice_start.elapsed();

        if sequence.is_empty() {
            return Ok(GenerationOutcome::Empty {
                image_width: image.width(),
                image_height: image.height(),
            });
        }

        let encode_start = Instant::now();
        let bytes = self.encode_gif(&sequence, &config)?;
        let encode_elapsed = encode_start.elapsed();

        log::info!(
            "✅ GIF 生成完成 - 来源: {} load={}ms decode={}ms slice={}ms encode={}ms total={}ms",
            request.source.hint(),
            load_elapsed.as_millis(),
            decode_elapsed.as_millis(),
            slice_elapsed.as_millis(),
            encode_elapsed.as_millis(),
            total_start.elapsed().as_millis()
        );

        Ok(GenerationOutcome::Generated(GeneratedGif {
            bytes,
            frame_count: sequence.len(),
            columns: layout.columns,
            rows: layout.rows,
            frame_width: sequence.width,
            frame_height: sequence.height,
            delay_ms: request.delay_ms,
        }))
    }

    /// 修复主入口：加载 GIF 并去除尾部空字节。
    pub fn repair(&self, source: InputSource) -> Result<RepairOutcome, GifError> {
        let config = self.config_snapshot()?;
        let total_start = Instant::now();

        if let InputSource::FilePath(path) = &source {
            InputKind::Gif.check_extension(path)?;
        }

        let raw = self.load(&source, InputKind::Gif, &config)?;
        let outcome = repair::repair(&raw.bytes).inspect_err(|err| {
            log::error!("❌ GIF 修复失败 - 来源: {} {}", raw.source_hint, err);
        })?;

        log::info!(
            "✅ GIF 修复完成 - 来源: {} 移除 {} 字节 total={}ms",
            raw.source_hint,
            outcome.trimmed,
            total_start.elapsed().as_millis()
        );

        Ok(outcome)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(frame_width: u32, frame_height: u32, delay_ms: u32, background: Option<&str>) -> GenerateRequest {
        GenerateRequest {
            source: InputSource::FilePath("/definitely/missing/sheet.png".to_string()),
            frame_width,
            frame_height,
            delay_ms,
            background: background.map(str::to_string),
        }
    }

    #[test]
    fn invalid_requests_fail_before_loading() {
        let handler = GifHandler::new(GifConfig::default()).expect("handler init failed");

        // 输入文件并不存在，若校验顺序正确则只会得到 Validation 错误
        for bad in [
            request(0, 10, 100, None),
            request(10, 0, 100, None),
            request(10, 10, 0, None),
            request(10, 10, 100, Some("red")),
            request(10, 10, 100, Some("#gggggg")),
        ] {
            assert!(matches!(handler.generate(bad), Err(GifError::Validation(_))));
        }

        let wrong_ext = GenerateRequest {
            source: InputSource::FilePath("/definitely/missing/sheet.gif".to_string()),
            ..request(10, 10, 100, None)
        };
        assert!(matches!(handler.generate(wrong_ext), Err(GifError::Validation(_))));
    }

    #[test]
    fn valid_request_reaches_loader() {
        let handler = GifHandler::new(GifConfig::default()).expect("handler init failed");
        let result = handler.generate(request(10, 10, 100, Some("#fff")));
        assert!(matches!(result, Err(GifError::FileSystem(_))));
    }

    #[test]
    fn existing_file_with_wrong_extension_is_rejected_once() {
        let handler = GifHandler::new(GifConfig::default()).expect("handler init failed");
        let dir = std::env::temp_dir().join(format!("sprite-gif-handler-{}", std::process::id()));
        std::fs::create_dir_all(&dir).expect("create temp dir");
        // 内容是合法 PNG，但扩展名不在白名单内
        let path = dir.join("sheet.bmp");
        image::RgbaImage::from_pixel(20, 10, image::Rgba([1, 2, 3, 255]))
            .save_with_format(&path, image::ImageFormat::Png)
            .expect("write temp png");

        let result = handler.generate(GenerateRequest {
            source: InputSource::FilePath(path.to_string_lossy().to_string()),
            ..request(10, 10, 100, None)
        });
        assert!(matches!(result, Err(GifError::Validation(_))));

        let result = handler.repair(InputSource::FilePath(path.to_string_lossy().to_string()));
        assert!(matches!(result, Err(GifError::Validation(_))));
    }

    #[test]
    fn repair_rejects_non_gif_extension() {
        let handler = GifHandler::new(GifConfig::default()).expect("handler init failed");
        let result = handler.repair(InputSource::FilePath("/tmp/anim.png".to_string()));
        assert!(matches!(result, Err(GifError::Validation(_))));
    }

    #[test]
    fn handler_rejects_invalid_default_background() {
        let config = GifConfig {
            default_background: "#12".to_string(),
            ..GifConfig::default()
        };
        assert!(matches!(GifHandler::new(config), Err(GifError::Validation(_))));
    }

    #[test]
    fn advanced_config_roundtrip_and_validation() {
        let handler = GifHandler::new(GifConfig::default()).expect("handler init failed");
        let mut advanced = handler.get_advanced_config().expect("get advanced");
        advanced.default_background = "#000".to_string();
        handler.set_advanced_config(advanced.clone()).expect("set advanced");
        assert_eq!(handler.get_advanced_config().expect("get advanced"), advanced);

        let invalid = GifAdvancedConfig {
            default_background: "black".to_string(),
            ..advanced.clone()
        };
        assert!(matches!(handler.set_advanced_config(invalid), Err(GifError::Validation(_))));

        let too_small = GifAdvancedConfig {
            max_decoded_bytes: 1024,
            ..advanced
        };
        assert!(matches!(handler.set_advanced_config(too_small), Err(GifError::Validation(_))));
    }
}
