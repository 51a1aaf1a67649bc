use crate::error::AppError;
use crate::models::{CompressedPhoto, PickedPhoto};
use base64::Engine;
use photo_compress::CompressOptions;

/// Compresses one picked photo into an attachment
pub async fn compress_photo(
    photo: PickedPhoto,
    options: &CompressOptions,
) -> Result<CompressedPhoto, AppError> {
    let original_bytes = photo.bytes.len();
    let out = photo_compress::compress(photo.bytes, options.clone()).await?;

    log::info!(
        "Compressed '{}': {} -> {} bytes{}",
        photo.name,
        original_bytes,
        out.byte_size(),
        if out.is_best_effort() { " (best effort)" } else { "" }
    );

    Ok(CompressedPhoto {
        original_name: photo.name,
        content_type: out.content_type.clone(),
        original_bytes,
        compressed_bytes: out.byte_size(),
        base64: base64::engine::general_purpose::STANDARD.encode(&out.bytes),
        width: out.width,
        height: out.height,
        best_effort: out.is_best_effort(),
    })
}

/// Compresses a batch one photo at a time, in input order. A failing photo
/// does not stop the rest.
pub async fn compress_photos(
    photos: Vec<PickedPhoto>,
    options: &CompressOptions,
) -> Vec<Result<CompressedPhoto, AppError>> {
    let mut results = Vec::with_capacity(photos.len());
    for photo in photos {
        let name = photo.name.clone();
        let result = compress_photo(photo, options).await;
        if let Err(e) = &result {
            log::warn!("Skipping photo '{}': {}", name, e);
        }
        results.push(result);
    }
    results
}

/// Text after the first comma of a data URL, or empty
pub fn data_url_to_base64(data_url: &str) -> &str {
    data_url.split_once(',').map(|(_, b64)| b64).unwrap_or("")
}

/// Size caveat shown under an attachment that missed the budget
pub fn size_note(photo: &CompressedPhoto, max_kb: usize) -> Option<String> {
    photo
        .exceeds_budget(max_kb.saturating_mul(1024))
        .then(|| format!("Note: could not reach {}KB; best effort applied.", max_kb))
}

/// Byte count as kilobytes with one decimal, e.g. `"97.3 KB"`
pub fn format_kb(bytes: usize) -> String {
    format!("{:.1} KB", bytes as f64 / 1024.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{ImageFormat, Rgb, RgbImage};
    use std::io::Cursor;

    fn picked(name: &str, w: u32, h: u32) -> PickedPhoto {
        let mut state: u32 = 0x9e37_79b9;
        let img = RgbImage::from_fn(w, h, |x, y| {
            state = state.wrapping_mul(1_664_525).wrapping_add(1_013_904_223);
            Rgb([(x % 256) as u8, (y % 256) as u8, (state >> 24) as u8])
        });
        let mut buf = Cursor::new(Vec::new());
        img.write_to(&mut buf, ImageFormat::Png).unwrap();
        PickedPhoto {
            name: name.to_string(),
            bytes: buf.into_inner(),
        }
    }

    fn small_options(max_bytes: usize) -> CompressOptions {
        CompressOptions {
            max_bytes,
            max_dimension: 400,
            min_dimension: 160,
            ..CompressOptions::default()
        }
    }

    #[test]
    fn test_data_url_to_base64() {
        assert_eq!(data_url_to_base64("data:image/jpeg;base64,AAAA"), "AAAA");
        assert_eq!(data_url_to_base64("data:text/plain,a,b"), "a,b");
        assert_eq!(data_url_to_base64("no comma here"), "");
        assert_eq!(data_url_to_base64(""), "");
    }

    #[test]
    fn test_format_kb() {
        assert_eq!(format_kb(0), "0.0 KB");
        assert_eq!(format_kb(1536), "1.5 KB");
        assert_eq!(format_kb(102_400), "100.0 KB");
    }

    #[tokio::test]
    async fn test_batch_is_ordered_and_tolerates_failures() {
        let photos = vec![
            picked("first.png", 480, 360),
            PickedPhoto {
                name: "broken.jpg".to_string(),
                bytes: vec![0u8; 2048],
            },
            picked("third.png", 200, 150),
        ];
        let first_len = photos[0].bytes.len();
        let options = small_options(first_len / 3);

        let results = compress_photos(photos, &options).await;
        assert_eq!(results.len(), 3);

        let first = results[0].as_ref().unwrap();
        assert_eq!(first.original_name, "first.png");
        assert_eq!(first.original_bytes, first_len);
        assert_eq!(first.content_type, "image/jpeg");
        assert_eq!(first.decoded_bytes().unwrap().len(), first.compressed_bytes);
        assert!(first.data_url().starts_with("data:image/jpeg;base64,"));

        assert!(matches!(results[1], Err(AppError::Compression(_))));
        assert_eq!(results[2].as_ref().unwrap().original_name, "third.png");
    }

    #[tokio::test]
    async fn test_best_effort_carries_size_note() {
        let photo = compress_photo(picked("big.png", 480, 360), &small_options(100))
            .await
            .unwrap();
        assert!(photo.best_effort);
        assert!(photo.exceeds_budget(100));
        assert_eq!(
            size_note(&photo, 0).as_deref(),
            Some("Note: could not reach 0KB; best effort applied.")
        );

        let fits = compress_photo(picked("tiny.png", 16, 16), &CompressOptions::default())
            .await
            .unwrap();
        assert!(!fits.best_effort);
        assert_eq!(fits.content_type, "image/png");
        assert_eq!(size_note(&fits, 100), None);
    }

    #[tokio::test]
    async fn test_small_gif_is_attached_unchanged() {
        let gif = vec![
            0x47, 0x49, 0x46, 0x38, 0x39, 0x61, 0x01, 0x00, 0x01, 0x00, 0x80, 0x00, 0x00, 0x00,
            0x00, 0x00, 0xFF, 0xFF, 0xFF, 0x2C, 0x00, 0x00, 0x00, 0x00, 0x01, 0x00, 0x01, 0x00,
            0x00, 0x02, 0x02, 0x44, 0x01, 0x00, 0x3B,
        ];
        let photo = PickedPhoto {
            name: "spinner.gif".to_string(),
            bytes: gif.clone(),
        };

        let out = compress_photo(photo, &CompressOptions::default()).await.unwrap();
        assert_eq!(out.content_type, "image/gif");
        assert_eq!(out.decoded_bytes().unwrap(), gif);
        assert_eq!(out.width, None);
        assert!(!out.best_effort);
    }

    #[test]
    fn test_size_note_with_huge_budget() {
        let photo = CompressedPhoto {
            original_name: "a.jpg".to_string(),
            content_type: "image/jpeg".to_string(),
            original_bytes: 10,
            compressed_bytes: usize::MAX,
            base64: String::new(),
            width: None,
            height: None,
            best_effort: true,
        };
        // the budget saturates instead of wrapping to a tiny value
        assert_eq!(size_note(&photo, usize::MAX), None);
        assert!(size_note(&photo, 1).is_some());
    }
}
