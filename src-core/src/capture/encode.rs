//! Frame encoding for captures and source thumbnails.
//!
//! Captures leave the core as `data:image/png;base64,...` URLs so the UI can
//! drop them straight into an `<img>` or canvas.

use crate::surface::CapturedFrame;
use base64::{engine::general_purpose::STANDARD, Engine};
use image::{DynamicImage, ImageBuffer, ImageFormat, Rgba};
use std::io::Cursor;

/// Thumbnail box used when locating the application window.
pub const APP_THUMBNAIL_MAX: (u32, u32) = (300, 200);

/// Thumbnail box for the desktop source picker.
pub const SOURCE_THUMBNAIL_MAX: (u32, u32) = (150, 150);

const PNG_DATA_URL_PREFIX: &str = "data:image/png;base64,";

fn to_image(frame: &CapturedFrame) -> Result<ImageBuffer<Rgba<u8>, Vec<u8>>, String> {
    let expected = frame.width as usize * frame.height as usize * 4;
    if frame.data.len() < expected {
        return Err(format!(
            "Buffer too small: expected {} bytes, got {}",
            expected,
            frame.data.len()
        ));
    }
    ImageBuffer::from_raw(frame.width, frame.height, frame.data[..expected].to_vec())
        .ok_or_else(|| "Failed to create image buffer".to_string())
}

/// Encode a frame as a PNG data URL at full size.
pub fn png_data_url(frame: &CapturedFrame) -> Result<String, String> {
    let img = to_image(frame)?;
    encode_png(DynamicImage::ImageRgba8(img))
}

/// Scale a frame into the given box (never upscaling) and encode it as a PNG
/// data URL.
pub fn thumbnail_data_url(
    frame: &CapturedFrame,
    max_width: u32,
    max_height: u32,
) -> Result<String, String> {
    let img = to_image(frame)?;
    let (w, h) = calculate_scaled_dimensions(frame.width, frame.height, max_width, max_height);
    let resized = image::imageops::resize(&img, w, h, image::imageops::FilterType::Triangle);
    encode_png(DynamicImage::ImageRgba8(resized))
}

/// Downscale a frame in place of the original, keeping it as raw RGBA.
pub fn fit_frame(frame: CapturedFrame, max_width: u32, max_height: u32) -> CapturedFrame {
    let (w, h) = calculate_scaled_dimensions(frame.width, frame.height, max_width, max_height);
    if (w, h) == (frame.width, frame.height) {
        return frame;
    }
    match to_image(&frame) {
        Ok(img) => {
            let resized =
                image::imageops::resize(&img, w, h, image::imageops::FilterType::Triangle);
            CapturedFrame {
                width: w,
                height: h,
                data: resized.into_raw(),
            }
        }
        Err(_) => frame,
    }
}

fn encode_png(img: DynamicImage) -> Result<String, String> {
    let mut png = Cursor::new(Vec::new());
    img.write_to(&mut png, ImageFormat::Png)
        .map_err(|e| format!("Failed to encode PNG: {}", e))?;
    Ok(format!("{}{}", PNG_DATA_URL_PREFIX, STANDARD.encode(png.get_ref())))
}

/// Scaled dimensions that fit within max bounds while preserving aspect ratio.
pub fn calculate_scaled_dimensions(
    width: u32,
    height: u32,
    max_width: u32,
    max_height: u32,
) -> (u32, u32) {
    if width == 0 || height == 0 {
        return (max_width, max_height);
    }

    let width_ratio = max_width as f64 / width as f64;
    let height_ratio = max_height as f64 / height as f64;
    let scale = width_ratio.min(height_ratio).min(1.0);

    let scaled_width = ((width as f64) * scale).round() as u32;
    let scaled_height = ((height as f64) * scale).round() as u32;

    (scaled_width.max(1), scaled_height.max(1))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::solid_frame;

    fn decode(url: &str) -> DynamicImage {
        let b64 = url.strip_prefix(PNG_DATA_URL_PREFIX).expect("png data url");
        let bytes = STANDARD.decode(b64).unwrap();
        image::load_from_memory_with_format(&bytes, ImageFormat::Png).unwrap()
    }

    #[test]
    fn test_scaled_dimensions_capture_window() {
        // 1280x720 capture window into the app-source box
        assert_eq!(calculate_scaled_dimensions(1280, 720, 300, 200), (300, 169));
    }

    #[test]
    fn test_scaled_dimensions_portrait() {
        assert_eq!(calculate_scaled_dimensions(1080, 1920, 150, 150), (84, 150));
    }

    #[test]
    fn test_scaled_dimensions_no_upscale() {
        assert_eq!(calculate_scaled_dimensions(100, 50, 300, 200), (100, 50));
    }

    #[test]
    fn test_png_data_url_keeps_size() {
        let url = png_data_url(&solid_frame(16, 9)).unwrap();
        assert!(url.starts_with("data:image/png;base64,"));
        let img = decode(&url);
        assert_eq!((img.width(), img.height()), (16, 9));
        assert_eq!(img.to_rgba8().get_pixel(3, 3).0, [200, 30, 30, 255]);
    }

    #[test]
    fn test_thumbnail_data_url_fits_box() {
        let url = thumbnail_data_url(&solid_frame(640, 360), 150, 150).unwrap();
        let img = decode(&url);
        assert_eq!((img.width(), img.height()), (150, 84));
    }

    #[test]
    fn test_short_buffer_is_rejected() {
        let frame = CapturedFrame {
            width: 10,
            height: 10,
            data: vec![0; 40],
        };
        let err = png_data_url(&frame).unwrap_err();
        assert!(err.contains("Buffer too small"));
    }

    #[test]
    fn test_fit_frame_downscales_raw() {
        let fitted = fit_frame(solid_frame(600, 400), 300, 200);
        assert_eq!((fitted.width, fitted.height), (300, 200));
        assert_eq!(fitted.data.len(), 300 * 200 * 4);
    }
}
