//! QR code rendering

use crate::error::{AttendifyError, AttendifyResult, ErrorContext};
use image::{DynamicImage, ImageFormat, Luma};
use qrcode::QrCode;
use std::io::Cursor;

/// Smallest rendered image edge in pixels
const MIN_DIMENSION: u32 = 256;

/// Render `content` as a PNG-encoded QR code
pub fn render_png(content: &str) -> AttendifyResult<Vec<u8>> {
    let code = QrCode::new(content.as_bytes()).map_err(|e| AttendifyError::QrEncoding {
        message: format!("Failed to generate QR code: {}", e),
        context: ErrorContext::new("qr")
            .with_operation("encode")
            .with_metadata("content_len", &content.len().to_string())
            .with_suggestion("Shorten the public base URL"),
    })?;

    let image = code
        .render::<Luma<u8>>()
        .min_dimensions(MIN_DIMENSION, MIN_DIMENSION)
        .build();

    let mut png = Vec::new();
    DynamicImage::ImageLuma8(image)
        .write_to(&mut Cursor::new(&mut png), ImageFormat::Png)
        .map_err(|e| AttendifyError::QrEncoding {
            message: format!("Failed to encode PNG: {}", e),
            context: ErrorContext::new("qr").with_operation("write_png"),
        })?;

    Ok(png)
}

/// Read the text back out of a rendered code
#[cfg(test)]
pub(crate) fn decode_png(png: &[u8]) -> String {
    let image = image::load_from_memory_with_format(png, ImageFormat::Png)
        .unwrap()
        .to_luma8();
    let mut prepared = rqrr::PreparedImage::prepare_from_greyscale(
        image.width() as usize,
        image.height() as usize,
        |x, y| image.get_pixel(x as u32, y as u32)[0],
    );
    let grids = prepared.detect_grids();
    assert_eq!(grids.len(), 1, "expected exactly one QR code");
    let (_meta, content) = grids[0].decode().unwrap();
    content
}

#[cfg(test)]
mod tests {
    use super::*;

    const PNG_SIGNATURE: [u8; 8] = [0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A];

    #[test]
    fn test_renders_png() {
        let png = render_png("http://127.0.0.1:5050/attendance?token=a1b2c3d4e5f60718").unwrap();
        assert!(png.len() > PNG_SIGNATURE.len());
        assert_eq!(&png[..8], &PNG_SIGNATURE);
    }

    #[test]
    fn test_rendered_code_decodes_to_content() {
        let url = "https://attend.example.edu/attendance?token=a1b2c3d4e5f60718";
        assert_eq!(decode_png(&render_png(url).unwrap()), url);
    }

    #[test]
    fn test_rendering_is_deterministic() {
        let url = "https://example.org/attendance?token=00ff00ff00ff00ff";
        assert_eq!(render_png(url).unwrap(), render_png(url).unwrap());
    }

    #[test]
    fn test_oversized_content_is_rejected() {
        let huge = "x".repeat(8000);
        assert!(matches!(
            render_png(&huge),
            Err(AttendifyError::QrEncoding { .. })
        ));
    }
}
