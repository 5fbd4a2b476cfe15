//! # Logo Loading
//!
//! Reads the cover logo from a file path or a `data:image/...;base64,` URI
//! and prepares it for PDF embedding. JPEG bytes pass through untouched
//! (PDF decodes them with DCTDecode). PNG is decoded to RGB plus an optional
//! alpha plane used as a soft mask.

use std::io::Cursor;

use crate::error::LabelError;

/// A loaded image ready for PDF embedding.
#[derive(Debug, Clone)]
pub struct LoadedImage {
    pub pixel_data: ImagePixelData,
    pub width_px: u32,
    pub height_px: u32,
}

#[derive(Debug, Clone)]
pub enum ImagePixelData {
    /// Raw JPEG bytes.
    Jpeg {
        data: Vec<u8>,
        color_space: JpegColorSpace,
    },
    /// width * height * 3 RGB bytes, plus width * height alpha bytes when any
    /// pixel is not fully opaque.
    Decoded { rgb: Vec<u8>, alpha: Option<Vec<u8>> },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JpegColorSpace {
    DeviceRGB,
    DeviceGray,
}

impl LoadedImage {
    /// Largest rectangle with this image's aspect ratio that fits the box,
    /// centered in it. Returns `(x, y, width, height)`.
    pub fn fit_into(&self, x: f64, y: f64, width: f64, height: f64) -> (f64, f64, f64, f64) {
        if self.width_px == 0 || self.height_px == 0 {
            return (x, y, width, height);
        }
        let scale = (width / self.width_px as f64).min(height / self.height_px as f64);
        let w = self.width_px as f64 * scale;
        let h = self.height_px as f64 * scale;
        (x + (width - w) / 2.0, y + (height - h) / 2.0, w, h)
    }
}

/// Load an image from a `data:` URI or a file path.
pub fn load_image(src: &str) -> Result<LoadedImage, LabelError> {
    let raw_bytes = read_source_bytes(src)?;
    decode_image_bytes(&raw_bytes)
}

fn read_source_bytes(src: &str) -> Result<Vec<u8>, LabelError> {
    if src.starts_with("data:image/") {
        let comma_pos = src
            .find(',')
            .ok_or_else(|| image_error("Invalid data URI: missing comma".to_string()))?;
        use base64::Engine;
        return base64::engine::general_purpose::STANDARD
            .decode(&src[comma_pos + 1..])
            .map_err(|e| image_error(format!("Base64 decode error: {}", e)));
    }

    std::fs::read(src).map_err(|e| image_error(format!("Failed to read image file '{}': {}", src, e)))
}

fn image_error(msg: String) -> LabelError {
    LabelError::ImageError(msg)
}

/// Detect image format from magic bytes and decode accordingly.
fn decode_image_bytes(data: &[u8]) -> Result<LoadedImage, LabelError> {
    if data.len() < 4 {
        return Err(image_error("Image data too short".to_string()));
    }

    if is_jpeg(data) {
        decode_jpeg(data)
    } else if is_png(data) {
        decode_png(data)
    } else {
        Err(image_error(
            "Unsupported image format (expected JPEG or PNG)".to_string(),
        ))
    }
}

fn is_jpeg(data: &[u8]) -> bool {
    data.len() >= 2 && data[0] == 0xFF && data[1] == 0xD8
}

fn is_png(data: &[u8]) -> bool {
    data.starts_with(&[0x89, b'P', b'N', b'G'])
}

/// JPEG: read dimensions without decoding pixels.
fn decode_jpeg(data: &[u8]) -> Result<LoadedImage, LabelError> {
    let (width, height) = image::io::Reader::new(Cursor::new(data))
        .with_guessed_format()
        .map_err(|e| image_error(format!("JPEG format detection error: {}", e)))?
        .into_dimensions()
        .map_err(|e| image_error(format!("Failed to read JPEG dimensions: {}", e)))?;

    Ok(LoadedImage {
        pixel_data: ImagePixelData::Jpeg {
            data: data.to_vec(),
            color_space: jpeg_color_space(data),
        },
        width_px: width,
        height_px: height,
    })
}

/// Component count from the first SOF segment; one component is grayscale.
fn jpeg_color_space(data: &[u8]) -> JpegColorSpace {
    let mut i = 2;
    while i + 3 < data.len() && data[i] == 0xFF {
        let marker = data[i + 1];
        let is_sof = matches!(marker, 0xC0..=0xC3 | 0xC5..=0xC7 | 0xC9..=0xCB | 0xCD..=0xCF);
        if is_sof && i + 9 < data.len() {
            return if data[i + 9] == 1 {
                JpegColorSpace::DeviceGray
            } else {
                JpegColorSpace::DeviceRGB
            };
        }
        let seg_len = u16::from_be_bytes([data[i + 2], data[i + 3]]) as usize;
        i += 2 + seg_len;
    }
    JpegColorSpace::DeviceRGB
}

fn decode_png(data: &[u8]) -> Result<LoadedImage, LabelError> {
    let img = image::io::Reader::new(Cursor::new(data))
        .with_guessed_format()
        .map_err(|e| image_error(format!("PNG format detection error: {}", e)))?
        .decode()
        .map_err(|e| image_error(format!("Failed to decode PNG: {}", e)))?;

    let rgba = img.to_rgba8();
    let (width, height) = rgba.dimensions();

    let pixel_count = (width * height) as usize;
    let mut rgb = Vec::with_capacity(pixel_count * 3);
    let mut alpha = Vec::with_capacity(pixel_count);
    for pixel in rgba.pixels() {
        rgb.extend_from_slice(&pixel.0[..3]);
        alpha.push(pixel[3]);
    }
    let opaque = alpha.iter().all(|&a| a == 255);

    Ok(LoadedImage {
        pixel_data: ImagePixelData::Decoded {
            rgb,
            alpha: if opaque { None } else { Some(alpha) },
        },
        width_px: width,
        height_px: height,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn png_bytes(pixel: [u8; 4], width: u32, height: u32) -> Vec<u8> {
        let img = image::RgbaImage::from_pixel(width, height, image::Rgba(pixel));
        let mut buf = Vec::new();
        let encoder = image::codecs::png::PngEncoder::new(&mut buf);
        image::ImageEncoder::write_image(encoder, img.as_raw(), width, height, image::ColorType::Rgba8)
            .unwrap();
        buf
    }

    #[test]
    fn test_magic_bytes() {
        assert!(is_jpeg(&[0xFF, 0xD8, 0xFF, 0xE0]));
        assert!(!is_jpeg(&[0x89, 0x50, 0x4E, 0x47]));
        assert!(is_png(&[0x89, 0x50, 0x4E, 0x47]));
        assert!(!is_png(&[0x89, 0x50]));
    }

    #[test]
    fn test_missing_file_is_image_error() {
        let err = load_image("./definitely-not-here/logo.png").unwrap_err();
        assert!(matches!(err, LabelError::ImageError(_)));
    }

    #[test]
    fn test_invalid_data_uri() {
        assert!(load_image("data:image/png;base64").is_err());
    }

    #[test]
    fn test_unsupported_format() {
        assert!(decode_image_bytes(&[0x00, 0x01, 0x02, 0x03, 0x04]).is_err());
        assert!(decode_image_bytes(&[0x00, 0x01]).is_err());
    }

    #[test]
    fn test_opaque_png_has_no_alpha() {
        let loaded = decode_image_bytes(&png_bytes([255, 0, 0, 255], 1, 1)).unwrap();
        match &loaded.pixel_data {
            ImagePixelData::Decoded { rgb, alpha } => {
                assert_eq!(rgb, &[255, 0, 0]);
                assert!(alpha.is_none());
            }
            _ => panic!("PNG should decode to Decoded variant"),
        }
    }

    #[test]
    fn test_translucent_png_keeps_alpha() {
        let loaded = decode_image_bytes(&png_bytes([255, 0, 0, 128], 1, 1)).unwrap();
        match &loaded.pixel_data {
            ImagePixelData::Decoded { alpha, .. } => {
                assert_eq!(alpha.as_deref(), Some(&[128u8][..]));
            }
            _ => panic!("PNG should decode to Decoded variant"),
        }
    }

    #[test]
    fn test_jpeg_passes_through() {
        let img = image::RgbImage::from_fn(2, 2, |_, _| image::Rgb([0, 128, 255]));
        let mut buf = Vec::new();
        let encoder = image::codecs::jpeg::JpegEncoder::new(&mut buf);
        image::ImageEncoder::write_image(encoder, img.as_raw(), 2, 2, image::ColorType::Rgb8)
            .unwrap();

        let loaded = decode_image_bytes(&buf).unwrap();
        assert_eq!((loaded.width_px, loaded.height_px), (2, 2));
        match &loaded.pixel_data {
            ImagePixelData::Jpeg { data, color_space } => {
                assert_eq!(data, &buf);
                assert_eq!(*color_space, JpegColorSpace::DeviceRGB);
            }
            _ => panic!("JPEG should stay as Jpeg variant"),
        }
    }

    #[test]
    fn test_data_uri() {
        use base64::Engine;
        let b64 = base64::engine::general_purpose::STANDARD.encode(png_bytes([0, 255, 0, 255], 3, 1));
        let loaded = load_image(&format!("data:image/png;base64,{}", b64)).unwrap();
        assert_eq!((loaded.width_px, loaded.height_px), (3, 1));
    }

    #[test]
    fn test_fit_into_keeps_aspect_ratio() {
        let loaded = decode_image_bytes(&png_bytes([0, 0, 0, 255], 4, 1)).unwrap();
        // 4:1 image in a 540 x 216 box: width-bound
        let (x, y, w, h) = loaded.fit_into(36.0, 504.0, 540.0, 216.0);
        assert!((w - 540.0).abs() < 1e-9);
        assert!((h - 135.0).abs() < 1e-9);
        assert!((x - 36.0).abs() < 1e-9);
        assert!((y - (504.0 + 40.5)).abs() < 1e-9);
    }
}
