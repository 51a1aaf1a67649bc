use crate::error::CompressError;
use crate::raster::{decode, encode_jpeg, inspect, rasterize};
use image::RgbImage;

/// Content type of every re-encoded output
pub const OUTPUT_CONTENT_TYPE: &str = "image/jpeg";

/// Long-edge shrink factor between dimension rounds
pub const DIMENSION_SHRINK: f32 = 0.85;

/// Byte budget and search bounds for one compression run
#[derive(Debug, Clone, PartialEq)]
pub struct CompressOptions {
    pub max_bytes: usize,
    pub max_dimension: u32,
    pub min_dimension: u32,
    pub initial_quality: f32,
    pub min_quality: f32,
    pub quality_step: f32,
}

impl Default for CompressOptions {
    fn default() -> Self {
        Self {
            max_bytes: 100 * 1024,
            max_dimension: 1600,
            min_dimension: 640,
            initial_quality: 0.82,
            min_quality: 0.45,
            quality_step: 0.06,
        }
    }
}

impl CompressOptions {
    pub fn validate(&self) -> Result<(), CompressError> {
        if self.max_bytes == 0 {
            return Err(CompressError::InvalidOptions(
                "max_bytes must be positive".to_string(),
            ));
        }
        if self.min_dimension == 0 || self.min_dimension > self.max_dimension {
            return Err(CompressError::InvalidOptions(format!(
                "dimension bounds {}..={} are invalid",
                self.min_dimension, self.max_dimension
            )));
        }
        let quality_ok = |q: f32| q.is_finite() && q > 0.0 && q <= 1.0;
        if !quality_ok(self.initial_quality)
            || !quality_ok(self.min_quality)
            || self.min_quality > self.initial_quality
        {
            return Err(CompressError::InvalidOptions(format!(
                "quality bounds {}..={} are invalid",
                self.min_quality, self.initial_quality
            )));
        }
        if !(self.quality_step.is_finite() && self.quality_step > 0.0) {
            return Err(CompressError::InvalidOptions(format!(
                "quality_step must be positive, got {}",
                self.quality_step
            )));
        }
        Ok(())
    }
}

/// One (dimension, quality) point of the search grid
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Attempt {
    pub dimension: u32,
    pub quality: f32,
}

/// How the returned bytes came about
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CompressionOutcome {
    /// Source already fit the budget and was passed through
    Unchanged,
    /// Re-encoded within budget at this grid point
    WithinBudget(Attempt),
    /// Budget unreachable; smallest settings were used regardless of size
    BestEffort(Attempt),
}

/// Result of one compression run
#[derive(Debug, Clone, PartialEq)]
pub struct CompressedImage {
    pub bytes: Vec<u8>,
    pub content_type: String,
    /// `None` for pass-through formats this build cannot decode
    pub width: Option<u32>,
    pub height: Option<u32>,
    pub outcome: CompressionOutcome,
}

impl CompressedImage {
    pub fn byte_size(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_best_effort(&self) -> bool {
        matches!(self.outcome, CompressionOutcome::BestEffort(_))
    }
}

/// The search grid in the order it is tried: dimensions shrink by
/// [`DIMENSION_SHRINK`] from `max_dimension` while at least `min_dimension`,
/// and for each dimension quality steps down from `initial_quality`, ending
/// exactly on `min_quality`.
pub fn attempt_plan(options: &CompressOptions) -> Vec<Attempt> {
    let mut plan = Vec::new();
    let mut dimension = options.max_dimension;

    while dimension >= options.min_dimension {
        let mut quality = options.initial_quality;
        while quality >= options.min_quality {
            plan.push(Attempt { dimension, quality });
            if quality == options.min_quality {
                break;
            }
            quality = (quality - options.quality_step).max(options.min_quality);
        }

        let next = (dimension as f32 * DIMENSION_SHRINK).round() as u32;
        // tiny dimensions stop shrinking once rounding catches up
        if next >= dimension {
            break;
        }
        dimension = next;
    }

    plan
}

/// Re-encode `source` until it fits `options.max_bytes`.
///
/// Sources already within budget are returned byte-for-byte, including
/// recognized formats without a decoder here (GIF, BMP, TIFF, ...). When no grid
/// point fits, one last encode at `min_dimension` / `min_quality` is returned
/// flagged as [`CompressionOutcome::BestEffort`]; callers should surface a
/// size caveat instead of failing.
pub fn compress_image(source: &[u8], options: &CompressOptions) -> Result<CompressedImage, CompressError> {
    options.validate()?;

    if source.len() <= options.max_bytes {
        let (content_type, width, height) = match inspect(source) {
            Ok(info) => (info.content_type, Some(info.width), Some(info.height)),
            Err(e) => {
                let format = image::guess_format(source).map_err(|_| e)?;
                (format.to_mime_type().to_string(), None, None)
            }
        };
        log::debug!(
            "Image already within budget ({} <= {} bytes), keeping {}",
            source.len(),
            options.max_bytes,
            content_type
        );
        return Ok(CompressedImage {
            bytes: source.to_vec(),
            content_type,
            width,
            height,
            outcome: CompressionOutcome::Unchanged,
        });
    }

    let pixels = decode(source)?.to_rgb8();
    log::debug!(
        "Compressing {}x{} image ({} bytes) to {} bytes",
        pixels.width(),
        pixels.height(),
        source.len(),
        options.max_bytes
    );

    let mut surface: Option<(u32, RgbImage)> = None;
    for attempt in attempt_plan(options) {
        let stale = surface
            .as_ref()
            .map_or(true, |(dimension, _)| *dimension != attempt.dimension);
        if stale {
            surface = Some((attempt.dimension, rasterize(&pixels, attempt.dimension)));
        }
        let Some((_, raster)) = surface.as_ref() else {
            continue;
        };

        let bytes = encode_jpeg(raster, attempt.quality)?;
        log::debug!(
            "Attempt {}px q={:.2}: {} bytes",
            attempt.dimension,
            attempt.quality,
            bytes.len()
        );

        if bytes.len() <= options.max_bytes {
            return Ok(CompressedImage {
                bytes,
                content_type: OUTPUT_CONTENT_TYPE.to_string(),
                width: Some(raster.width()),
                height: Some(raster.height()),
                outcome: CompressionOutcome::WithinBudget(attempt),
            });
        }
    }

    let last = Attempt {
        dimension: options.min_dimension,
        quality: options.min_quality,
    };
    let raster = rasterize(&pixels, last.dimension);
    let bytes = encode_jpeg(&raster, last.quality)?;
    log::warn!(
        "Could not reach {} bytes, best effort is {} bytes at {}px q={:.2}",
        options.max_bytes,
        bytes.len(),
        last.dimension,
        last.quality
    );

    Ok(CompressedImage {
        bytes,
        content_type: OUTPUT_CONTENT_TYPE.to_string(),
        width: Some(raster.width()),
        height: Some(raster.height()),
        outcome: CompressionOutcome::BestEffort(last),
    })
}

/// Async wrapper running [`compress_image`] off the async runtime
pub async fn compress(source: Vec<u8>, options: CompressOptions) -> Result<CompressedImage, CompressError> {
    tokio::task::spawn_blocking(move || compress_image(&source, &options)).await?
}
