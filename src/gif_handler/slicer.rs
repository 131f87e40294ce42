//! # 精灵图切分与合成
//!
//! ## 设计思路
//!
//! 纯函数：输入解码后的图片、帧尺寸、背景色与延迟，输出按播放顺序排列的帧序列。
//! 每一帧都分配独立的画布，不复用可变的临时缓冲区，因此并发调用无需加锁。
//!
//! ## 实现思路
//!
//! 1. 校验延迟（帧尺寸与背景色由各自的构造函数保证合法）
//! 2. 计算网格布局；任一方向帧数为 0 时返回空序列（不是错误）
//! 3. 行优先遍历单元格：背景色填充画布 → 按源图边界裁剪后的矩形做 alpha 合成
//! 4. 画布转为 RGBA 字节，附带统一延迟

use image::{Pixel, RgbaImage};

use super::color::BackgroundColor;
use super::geometry::FrameGeometry;
use super::GifError;

/// 单帧：RGBA 行优先像素（左上角为原点）与显示延迟。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    pub data: Vec<u8>,
    pub delay_ms: u32,
}

/// 按播放顺序排列的帧序列，所有帧尺寸一致。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrameSequence {
    pub width: u32,
    pub height: u32,
    pub frames: Vec<Frame>,
}

impl FrameSequence {
    pub fn len(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }
}

/// 将精灵图切分为帧序列。
///
/// 当帧尺寸在任一方向上大于图片时返回空序列，调用方需将其与失败区分开。
///
/// # 示例
/// ```rust
/// use image::{Rgba, RgbaImage};
/// use sprite_gif::gif_handler::{slice, BackgroundColor, FrameGeometry};
///
/// let sheet = RgbaImage::from_pixel(630, 210, Rgba([255, 0, 0, 255]));
/// let sequence = slice(&sheet, FrameGeometry::new(210, 210)?, BackgroundColor::WHITE, 100)?;
/// assert_eq!(sequence.len(), 3);
/// # Ok::<(), sprite_gif::gif_handler::GifError>(())
/// ```
pub fn slice(
    image: &RgbaImage,
    geometry: FrameGeometry,
    background: BackgroundColor,
    delay_ms: u32,
) -> Result<FrameSequence, GifError> {
    if delay_ms == 0 {
        return Err(GifError::Validation("帧延迟必须为正整数（毫秒）".to_string()));
    }

    let (image_width, image_height) = image.dimensions();
    let layout = geometry.layout_for(image_width, image_height);

    if layout.is_empty() {
        log::warn!(
            "⚠️ 帧尺寸 {}x{} 大于图片 {}x{}，未生成任何帧",
            geometry.frame_width(),
            geometry.frame_height(),
            image_width,
            image_height
        );
    }

    let frames = layout
        .cells()
        .map(|(x, y)| Frame {
            data: compose_cell(image, geometry, background, x, y),
            delay_ms,
        })
        .collect::<Vec<_>>();

    log::debug!(
        "🧩 切分完成：{}x{} 网格，共 {} 帧（帧尺寸 {}x{}）",
        layout.columns,
        layout.rows,
        frames.len(),
        geometry.frame_width(),
        geometry.frame_height()
    );

    Ok(FrameSequence {
        width: geometry.frame_width(),
        height: geometry.frame_height(),
        frames,
    })
}

/// 合成单个网格单元，返回新分配的 RGBA 缓冲区。
fn compose_cell(
    image: &RgbaImage,
    geometry: FrameGeometry,
    background: BackgroundColor,
    cell_x: u32,
    cell_y: u32,
) -> Vec<u8> {
    let (frame_width, frame_height) = (geometry.frame_width(), geometry.frame_height());
    let mut canvas = RgbaImage::from_pixel(frame_width, frame_height, background.to_rgba());

    let source_x = cell_x * frame_width;
    let source_y = cell_y * frame_height;

    // 源图提供的像素不足时，未覆盖区域保留背景色
    let copy_width = image.width().saturating_sub(source_x).min(frame_width);
    let copy_height = image.height().saturating_sub(source_y).min(frame_height);

    for dy in 0..copy_height {
        for dx in 0..copy_width {
            let src = image.get_pixel(source_x + dx, source_y + dy);
            canvas.get_pixel_mut(dx, dy).blend(src);
        }
    }

    canvas.into_raw()
}
