//! # 解码与编码流水线模块
//!
//! ## 设计思路
//!
//! 将“字节 → RGBA 图像”与“帧序列 → GIF 字节”两端集中管理，并在解码前增加资源上限控制。
//! 优先做尺寸检查，再进行完整解码，降低恶意输入触发高内存开销的风险。
//!
//! ## 实现思路
//!
//! 解码：
//! 1. 读取 header 尺寸
//! 2. 按像素 / 内存上限快速拒绝
//! 3. 完整解码并转换为 RGBA8
//!
//! 编码：
//! 1. 每帧缓冲区长度校验后包装为 `RgbaImage`
//! 2. `GifEncoder` 无限循环播放，逐帧写入统一延迟

use image::codecs::gif::{GifEncoder, Repeat};
use image::{Delay, GenericImageView, ImageReader, RgbaImage};
use std::io::Cursor;

use super::slicer::FrameSequence;
use super::source::RawInputData;
use super::{GifConfig, GifError, GifHandler};

/// GIF 帧延迟以 10ms 为单位存储于 u16 中。
const GIF_DELAY_UNIT_MS: u32 = 10;
const GIF_MAX_DELAY_MS: u32 = u16::MAX as u32 * GIF_DELAY_UNIT_MS;

/// 将毫秒延迟收敛到 GIF 可表示的范围 `[10, 655350]`，返回值与是否发生调整。
///
/// 小于 10ms 的延迟会被编码为 0，多数播放器会把 0 当作“未指定”处理，因此向上取到 1 个单位。
fn gif_frame_delay_ms(delay_ms: u32) -> (u32, bool) {
    let clamped = delay_ms.clamp(GIF_DELAY_UNIT_MS, GIF_MAX_DELAY_MS);
    (clamped, clamped != delay_ms)
}

impl GifHandler {
    /// 将原始字节解码为 RGBA 图像。
    pub(crate) fn decode_raster(
        &self,
        raw: &RawInputData,
        config: &GifConfig,
    ) -> Result<RgbaImage, GifError> {
        let (header_width, header_height) = Self::inspect_dimensions_from_memory(&raw.bytes)?;
        self.validate_pixel_limits(config, header_width, header_height)?;
        self.validate_decoded_memory_limits(config, header_width, header_height)?;

        let decoded = image::load_from_memory(&raw.bytes)
            .map_err(|e| GifError::Decode(format!("图片解码失败：{}", e)))?;

        let (width, height) = decoded.dimensions();
        self.validate_pixel_limits(config, width, height)?;
        self.validate_decoded_memory_limits(config, width, height)?;

        if width == 0 || height == 0 {
            return Err(GifError::Decode(format!("图片尺寸无效：{}x{}", width, height)));
        }

        log::info!(
            "✅ 图片解码成功 - 来源: {} 尺寸: {}x{}",
            raw.source_hint,
            width,
            height
        );

        Ok(decoded.into_rgba8())
    }

    /// 将帧序列编码为 GIF 字节。
    pub(crate) fn encode_gif(
        &self,
        sequence: &FrameSequence,
        config: &GifConfig,
    ) -> Result<Vec<u8>, GifError> {
        if sequence.is_empty() {
            return Err(GifError::Encode("帧序列为空，无法编码".to_string()));
        }
        if sequence.width > u16::MAX as u32 || sequence.height > u16::MAX as u32 {
            return Err(GifError::ResourceLimit(format!(
                "GIF 帧尺寸超出格式上限：{}x{}（最大 65535）",
                sequence.width, sequence.height
            )));
        }

        let expected_len = (sequence.width as usize)
            .checked_mul(sequence.height as usize)
            .and_then(|pixels| pixels.checked_mul(4))
            .ok_or_else(|| GifError::ResourceLimit("帧尺寸导致内存溢出风险".to_string()))?;

        let speed = config.encoder_speed.clamp(1, 30);
        let mut output = Vec::new();
        {
            let mut encoder = GifEncoder::new_with_speed(&mut output, speed);
            encoder
                .set_repeat(Repeat::Infinite)
                .map_err(|e| GifError::Encode(format!("设置循环播放失败：{}", e)))?;

            let mut delay_adjusted = false;
            for (index, frame) in sequence.frames.iter().enumerate() {
                if frame.data.len() != expected_len {
                    return Err(GifError::Encode(format!(
                        "第 {} 帧像素数据长度异常：{}（期望 {}）",
                        index,
                        frame.data.len(),
                        expected_len
                    )));
                }

                let buffer = RgbaImage::from_raw(sequence.width, sequence.height, frame.data.clone())
                    .ok_or_else(|| GifError::Encode(format!("第 {} 帧缓冲区构建失败", index)))?;
                let (delay_ms, adjusted) = gif_frame_delay_ms(frame.delay_ms);
                if adjusted && !delay_adjusted {
                    log::warn!(
                        "⚠️ 帧延迟 {}ms 超出 GIF 可表示范围，已调整为 {}ms",
                        frame.delay_ms,
                        delay_ms
                    );
                    delay_adjusted = true;
                }
                let delay = Delay::from_numer_denom_ms(delay_ms, 1);

                encoder
                    .encode_frame(image::Frame::from_parts(buffer, 0, 0, delay))
                    .map_err(|e| GifError::Encode(format!("第 {} 帧编码失败：{}", index, e)))?;
            }
        }

        log::info!(
            "🎞️ GIF 编码完成 - {} 帧 {}x{} speed={} 输出 {} KB",
            sequence.len(),
            sequence.width,
            sequence.height,
            speed,
            output.len() / 1024
        );

        Ok(output)
    }

    /// 仅通过内存中的图片头信息读取宽高。
    fn inspect_dimensions_from_memory(bytes: &[u8]) -> Result<(u32, u32), GifError> {
        let reader = ImageReader::new(Cursor::new(bytes))
            .with_guessed_format()
            .map_err(|e| GifError::InvalidFormat(format!("无法识别图片格式：{}", e)))?;

        reader
            .into_dimensions()
            .map_err(|e| GifError::Decode(format!("无法读取图片尺寸：{}", e)))
    }

    /// 校验像素数量是否超过配置上限。
    fn validate_pixel_limits(
        &self,
        config: &GifConfig,
        width: u32,
        height: u32,
    ) -> Result<(), GifError> {
        let pixels = (width as u64)
            .checked_mul(height as u64)
            .ok_or_else(|| GifError::ResourceLimit("图片像素数溢出".to_string()))?;

        if pixels > config.max_decoded_pixels {
            return Err(GifError::ResourceLimit(format!(
                "图片像素过大：{} 像素（限制：{} 像素）",
                pixels, config.max_decoded_pixels
            )));
        }

        Ok(())
    }

    fn validate_decoded_memory_limits(
        &self,
        config: &GifConfig,
        width: u32,
        height: u32,
    ) -> Result<(), GifError> {
        let estimated = (width as u64)
            .checked_mul(height as u64)
            .and_then(|pixels| pixels.checked_mul(4))
            .ok_or_else(|| GifError::ResourceLimit("图片解码内存估算溢出".to_string()))?;

        if estimated > config.max_decoded_bytes {
            return Err(GifError::ResourceLimit(format!(
                "图片解码预计内存过大：{:.2} MB（限制：{:.2} MB）",
                estimated as f64 / 1024.0 / 1024.0,
                config.max_decoded_bytes as f64 / 1024.0 / 1024.0
            )));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gif_handler::slicer::Frame;
    use image::codecs::gif::GifDecoder;
    use image::{AnimationDecoder, DynamicImage, ImageBuffer, ImageFormat, Rgba};

    fn create_png_bytes(width: u32, height: u32) -> Vec<u8> {
        let img = ImageBuffer::from_fn(width, height, |x, y| {
            let r = (x % 255) as u8;
            let g = (y % 255) as u8;
            let b = ((x + y) % 255) as u8;
            Rgba([r, g, b, 255])
        });

        let dyn_img = DynamicImage::ImageRgba8(img);
        let mut cursor = Cursor::new(Vec::new());
        dyn_img
            .write_to(&mut cursor, ImageFormat::Png)
            .expect("failed to encode test image");
        cursor.into_inner()
    }

    fn raw(bytes: Vec<u8>) -> RawInputData {
        RawInputData {
            bytes,
            source_hint: "test",
        }
    }

    #[test]
    fn decode_png_to_rgba() {
        let handler = GifHandler::new(GifConfig::default()).expect("handler init failed");
        let config = handler.config_snapshot().expect("config snapshot failed");

        let image = handler
            .decode_raster(&raw(create_png_bytes(64, 32)), &config)
            .expect("decode should succeed");

        assert_eq!(image.dimensions(), (64, 32));
        assert_eq!(image.get_pixel(3, 5), &Rgba([3, 5, 8, 255]));
    }

    #[test]
    fn stress_rejects_too_many_pixels() {
        let mut config = GifConfig::default();
        config.max_decoded_pixels = 1_000_000;

        let handler = GifHandler::new(config).expect("handler init failed");
        let config = handler.config_snapshot().expect("config snapshot failed");

        let result = handler.decode_raster(&raw(create_png_bytes(2000, 2000)), &config);

        assert!(matches!(result, Err(GifError::ResourceLimit(_))));
    }

    #[test]
    fn garbage_bytes_fail_to_decode() {
        let handler = GifHandler::new(GifConfig::default()).expect("handler init failed");
        let config = GifConfig::default();

        let mut bytes = create_png_bytes(8, 8);
        bytes.truncate(40);
        assert!(handler.decode_raster(&raw(bytes), &config).is_err());
    }

    #[test]
    fn encode_produces_decodable_animation() {
        let handler = GifHandler::new(GifConfig::default()).expect("handler init failed");
        let config = GifConfig::default();

        let frames = [[255u8, 0, 0, 255], [0, 0, 255, 255]]
            .iter()
            .map(|px| Frame {
                data: px.repeat(4 * 3),
                delay_ms: 120,
            })
            .collect();
        let sequence = FrameSequence { width: 4, height: 3, frames };

        let bytes = handler.encode_gif(&sequence, &config).expect("encode should succeed");
        assert!(bytes.starts_with(b"GIF89a"));
        assert_eq!(bytes.last(), Some(&0x3B));

        let decoded = GifDecoder::new(Cursor::new(bytes))
            .expect("decoder")
            .into_frames()
            .collect_frames()
            .expect("frames");
        assert_eq!(decoded.len(), 2);
        assert_eq!(decoded[0].buffer().dimensions(), (4, 3));
        assert_eq!(decoded[0].delay().numer_denom_ms(), (120, 1));
        assert_eq!(decoded[1].buffer().get_pixel(0, 0), &Rgba([0, 0, 255, 255]));
    }

    #[test]
    fn frame_delay_is_clamped_to_gif_range() {
        assert_eq!(gif_frame_delay_ms(1), (10, true));
        assert_eq!(gif_frame_delay_ms(9), (10, true));
        assert_eq!(gif_frame_delay_ms(10), (10, false));
        assert_eq!(gif_frame_delay_ms(15), (15, false));
        assert_eq!(gif_frame_delay_ms(655_350), (655_350, false));
        assert_eq!(gif_frame_delay_ms(u32::MAX), (655_350, true));
    }

    #[test]
    fn sub_unit_delay_never_encodes_as_zero() {
        let handler = GifHandler::new(GifConfig::default()).expect("handler init failed");

        for (delay_ms, expected) in [(5, (10, 1)), (9, (10, 1)), (15, (10, 1)), (700_000, (655_350, 1))] {
            let sequence = FrameSequence {
                width: 2,
                height: 2,
                frames: vec![Frame { data: [7u8, 7, 7, 255].repeat(4), delay_ms }],
            };
            let bytes = handler
                .encode_gif(&sequence, &GifConfig::default())
                .expect("encode should succeed");

            let decoded = GifDecoder::new(Cursor::new(bytes))
                .expect("decoder")
                .into_frames()
                .collect_frames()
                .expect("frames");
            assert_eq!(decoded[0].delay().numer_denom_ms(), expected, "delay_ms={delay_ms}");
        }
    }

    #[test]
    fn encode_rejects_mismatched_frame_length() {
        let handler = GifHandler::new(GifConfig::default()).expect("handler init failed");
        let sequence = FrameSequence {
            width: 2,
            height: 2,
            frames: vec![Frame { data: vec![0; 3], delay_ms: 10 }],
        };

        let result = handler.encode_gif(&sequence, &GifConfig::default());
        assert!(matches!(result, Err(GifError::Encode(_))));
    }
}
