use crate::error::CompressError;
use image::codecs::jpeg::JpegEncoder;
use image::imageops::FilterType;
use image::{DynamicImage, ImageDecoder, ImageReader, RgbImage};
use std::io::Cursor;

/// Reads format and size from the header without decoding pixels
#[derive(Debug, Clone, PartialEq)]
pub struct ImageInfo {
    pub width: u32,
    pub height: u32,
    pub content_type: String,
}

/// Reads format and natural size without decoding pixels
pub fn inspect(bytes: &[u8]) -> Result<ImageInfo, CompressError> {
    let reader = ImageReader::new(Cursor::new(bytes))
        .with_guessed_format()
        .map_err(|e| CompressError::DecodeError(format!("Failed to read image: {}", e)))?;

    let content_type = reader
        .format()
        .map(|f| f.to_mime_type().to_string())
        .ok_or_else(|| CompressError::DecodeError("Unrecognized image format".to_string()))?;

    let (width, height) = reader
        .into_dimensions()
        .map_err(|e| CompressError::DecodeError(format!("Failed to read dimensions: {}", e)))?;

    Ok(ImageInfo {
        width,
        height,
        content_type,
    })
}

/// Decodes arbitrary image bytes, applying any EXIF orientation so the
/// pixels come out the way a viewer would show them
pub fn decode(bytes: &[u8]) -> Result<DynamicImage, CompressError> {
    let mut decoder = ImageReader::new(Cursor::new(bytes))
        .with_guessed_format()
        .map_err(|e| CompressError::DecodeError(format!("Failed to read image: {}", e)))?
        .into_decoder()
        .map_err(|e| CompressError::DecodeError(format!("Failed to load image: {}", e)))?;

    let orientation = decoder
        .orientation()
        .map_err(|e| CompressError::DecodeError(format!("Failed to read orientation: {}", e)))?;

    let mut img = DynamicImage::from_decoder(decoder)
        .map_err(|e| CompressError::DecodeError(format!("Failed to load image: {}", e)))?;
    img.apply_orientation(orientation);

    Ok(img)
}

/// Uniform downscale so the long edge fits `target_long_edge`. Never upscales.
pub fn scaled_dimensions(width: u32, height: u32, target_long_edge: u32) -> (u32, u32) {
    let long_edge = width.max(height);
    if long_edge <= target_long_edge || long_edge == 0 {
        return (width.max(1), height.max(1));
    }

    let scale = target_long_edge as f64 / long_edge as f64;
    let w = ((width as f64 * scale).round() as u32).max(1);
    let h = ((height as f64 * scale).round() as u32).max(1);
    (w, h)
}

/// Draws the source into a new surface at the scaled size
pub fn rasterize(source: &RgbImage, target_long_edge: u32) -> RgbImage {
    let (w, h) = source.dimensions();
    let (tw, th) = scaled_dimensions(w, h, target_long_edge);
    if (tw, th) == (w, h) {
        return source.clone();
    }
    image::imageops::resize(source, tw, th, FilterType::Lanczos3)
}

/// Maps a 0.0..=1.0 quality onto the JPEG encoder's 1..=100 scale
pub fn jpeg_quality(quality: f32) -> u8 {
    (quality * 100.0).round().clamp(1.0, 100.0) as u8
}

/// Encodes a surface as baseline JPEG
pub fn encode_jpeg(surface: &RgbImage, quality: f32) -> Result<Vec<u8>, CompressError> {
    let mut buffer = Cursor::new(Vec::new());
    let mut encoder = JpegEncoder::new_with_quality(&mut buffer, jpeg_quality(quality));
    encoder
        .encode_image(surface)
        .map_err(|e| CompressError::EncodeError(format!("Failed to write JPEG: {}", e)))?;
    Ok(buffer.into_inner())
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::ImageFormat;

    fn png_bytes(w: u32, h: u32) -> Vec<u8> {
        let img = RgbImage::from_fn(w, h, |x, y| image::Rgb([(x % 256) as u8, (y % 256) as u8, 128]));
        let mut buf = Cursor::new(Vec::new());
        img.write_to(&mut buf, ImageFormat::Png).unwrap();
        buf.into_inner()
    }

    #[test]
    fn test_scaled_dimensions() {
        // landscape larger than target
        assert_eq!(scaled_dimensions(4000, 3000, 1600), (1600, 1200));
        // portrait
        assert_eq!(scaled_dimensions(3000, 4000, 1600), (1200, 1600));
        // never upscales
        assert_eq!(scaled_dimensions(800, 600, 1600), (800, 600));
        // exact fit
        assert_eq!(scaled_dimensions(1600, 900, 1600), (1600, 900));
        // extreme aspect ratio keeps at least one pixel
        assert_eq!(scaled_dimensions(5000, 1, 1000), (1000, 1));
    }

    #[test]
    fn test_rasterize_fits_long_edge() {
        let src = RgbImage::new(300, 200);
        let out = rasterize(&src, 150);
        assert_eq!(out.dimensions(), (150, 100));

        let same = rasterize(&src, 1000);
        assert_eq!(same.dimensions(), (300, 200));
    }

    #[test]
    fn test_rasterize_is_deterministic() {
        let src = RgbImage::from_fn(120, 80, |x, y| image::Rgb([(x * 2) as u8, (y * 3) as u8, 7]));
        assert_eq!(rasterize(&src, 50), rasterize(&src, 50));
    }

    #[test]
    fn test_jpeg_quality_mapping() {
        assert_eq!(jpeg_quality(0.82), 82);
        assert_eq!(jpeg_quality(0.45), 45);
        assert_eq!(jpeg_quality(0.0), 1);
        assert_eq!(jpeg_quality(2.0), 100);
    }

    #[test]
    fn test_inspect_and_decode_png() {
        let bytes = png_bytes(40, 30);
        let info = inspect(&bytes).unwrap();
        assert_eq!(info.width, 40);
        assert_eq!(info.height, 30);
        assert_eq!(info.content_type, "image/png");

        let img = decode(&bytes).unwrap();
        assert_eq!((img.width(), img.height()), (40, 30));
    }

    #[test]
    fn test_encode_jpeg_output_decodes() {
        let surface = RgbImage::from_fn(64, 48, |x, y| image::Rgb([x as u8, y as u8, 200]));
        let jpeg = encode_jpeg(&surface, 0.8).unwrap();
        assert!(!jpeg.is_empty());
        let info = inspect(&jpeg).unwrap();
        assert_eq!(info.content_type, "image/jpeg");
        assert_eq!((info.width, info.height), (64, 48));
    }

    #[test]
    fn test_garbage_is_a_decode_error() {
        let garbage = b"definitely not an image".to_vec();
        assert!(matches!(inspect(&garbage), Err(CompressError::DecodeError(_))));
        assert!(matches!(decode(&garbage), Err(CompressError::DecodeError(_))));
    }
}
