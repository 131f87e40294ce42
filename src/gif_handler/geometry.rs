//! # 网格几何
//!
//! ## 设计思路
//!
//! 精灵图按固定帧尺寸切分为规则网格：
//! - 列数 `floor(image_width / frame_width)`，行数 `floor(image_height / frame_height)`
//! - 多余的边缘像素直接丢弃，不产生残缺帧
//! - 帧序号 `k` 对应单元格 `(k % columns, k / columns)`（行优先）
//!
//! `preview_rect` 与切分共享同一套几何约定，用于在缩放显示的图片上标出第 0 帧的范围。

use super::GifError;

/// 单帧像素尺寸，两个维度均大于 0。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameGeometry {
    frame_width: u32,
    frame_height: u32,
}

impl FrameGeometry {
    pub fn new(frame_width: u32, frame_height: u32) -> Result<Self, GifError> {
        if frame_width == 0 || frame_height == 0 {
            return Err(GifError::Validation(format!(
                "帧宽高必须为正整数（当前：{}x{}）",
                frame_width, frame_height
            )));
        }

        Ok(Self { frame_width, frame_height })
    }

    pub fn frame_width(&self) -> u32 {
        self.frame_width
    }

    pub fn frame_height(&self) -> u32 {
        self.frame_height
    }

    /// 单帧 RGBA 缓冲区字节数。
    pub fn frame_byte_len(&self) -> usize {
        self.frame_width as usize * self.frame_height as usize * 4
    }

    /// 根据图片尺寸计算网格布局。
    pub fn layout_for(&self, image_width: u32, image_height: u32) -> GridLayout {
        GridLayout {
            columns: image_width / self.frame_width,
            rows: image_height / self.frame_height,
            geometry: *self,
        }
    }
}

/// 精灵图网格布局。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GridLayout {
    pub columns: u32,
    pub rows: u32,
    geometry: FrameGeometry,
}

impl GridLayout {
    pub fn frame_count(&self) -> usize {
        self.columns as usize * self.rows as usize
    }

    pub fn is_empty(&self) -> bool {
        self.frame_count() == 0
    }

    /// 第 `index` 帧所在单元格 `(x, y)`；越界返回 `None`。
    pub fn cell(&self, index: usize) -> Option<(u32, u32)> {
        if index >= self.frame_count() {
            return None;
        }
        let columns = self.columns as usize;
        Some(((index % columns) as u32, (index / columns) as u32))
    }

    /// 第 `index` 帧在源图中的左上角像素坐标。
    pub fn cell_origin(&self, index: usize) -> Option<(u32, u32)> {
        self.cell(index).map(|(x, y)| {
            (x * self.geometry.frame_width, y * self.geometry.frame_height)
        })
    }

    /// 按播放顺序（行优先）遍历所有单元格。
    pub fn cells(&self) -> impl Iterator<Item = (u32, u32)> + '_ {
        (0..self.rows).flat_map(move |y| (0..self.columns).map(move |x| (x, y)))
    }
}

/// 预览框尺寸（显示坐标系，未取整）。
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PreviewRect {
    pub width: f64,
    pub height: f64,
}

/// 计算第 0 帧在缩放显示图上的预览框。
///
/// `shown_*` 为当前显示尺寸，`natural_*` 为原始像素尺寸；显示尺寸变化时需重新调用。
///
/// # 示例
/// ```rust
/// use sprite_gif::gif_handler::{preview_rect, FrameGeometry};
///
/// let rect = preview_rect(FrameGeometry::new(210, 210)?, 315.0, 210.0, 630, 420)?;
/// assert_eq!((rect.width, rect.height), (105.0, 105.0));
/// # Ok::<(), sprite_gif::gif_handler::GifError>(())
/// ```
pub fn preview_rect(
    geometry: FrameGeometry,
    shown_width: f64,
    shown_height: f64,
    natural_width: u32,
    natural_height: u32,
) -> Result<PreviewRect, GifError> {
    if natural_width == 0 || natural_height == 0 {
        return Err(GifError::Validation("图片原始尺寸不能为 0".to_string()));
    }
    if !shown_width.is_finite() || !shown_height.is_finite() || shown_width < 0.0 || shown_height < 0.0 {
        return Err(GifError::Validation(format!(
            "显示尺寸无效：{}x{}",
            shown_width, shown_height
        )));
    }

    Ok(PreviewRect {
        width: geometry.frame_width as f64 * shown_width / natural_width as f64,
        height: geometry.frame_height as f64 * shown_height / natural_height as f64,
    })
}
