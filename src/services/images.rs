use anyhow::{Result, anyhow};
use image::ImageFormat;
use image::imageops::FilterType;
use std::io::Cursor;

/// Menu photos are bounded to this width before storage; smaller images are
/// never enlarged.
pub const MAX_MENU_IMAGE_WIDTH: u32 = 1600;

/// Re-encode an uploaded image as WebP, downscaling to `max_width` when the
/// original is wider.
pub fn reencode_webp(data: &[u8], max_width: u32) -> Result<Vec<u8>> {
    let img = image::load_from_memory(data).map_err(|e| anyhow!("Failed to load image: {e}"))?;

    let img = if img.width() > max_width {
        img.resize(max_width, u32::MAX, FilterType::Lanczos3)
    } else {
        img
    };

    // The WebP encoder only accepts 8-bit buffers
    let img = match img.color() {
        image::ColorType::Rgba16 | image::ColorType::La16 | image::ColorType::Rgba32F => {
            image::DynamicImage::ImageRgba8(img.to_rgba8())
        }
        image::ColorType::Rgb16 | image::ColorType::L16 | image::ColorType::Rgb32F => {
            image::DynamicImage::ImageRgb8(img.to_rgb8())
        }
        _ => img,
    };

    let mut cursor = Cursor::new(Vec::new());
    img.write_to(&mut cursor, ImageFormat::WebP)
        .map_err(|e| anyhow!("Failed to encode WebP: {e}"))?;

    Ok(cursor.into_inner())
}
