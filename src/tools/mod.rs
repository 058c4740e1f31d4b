use crate::decoder::config::DecodeConfig;
use crate::encoder::EncodedSymbol;
use crate::encoder::render::{rasterize, to_svg};
use crate::models::BitMatrix;
use crate::pipeline::{ImageView, StageReport, find_triangles, preprocess};
use image::GenericImageView;
use std::env;
use std::fs;
use std::io;
use std::path::Path;
use thiserror::Error;

fn max_dim_from_env() -> Option<u32> {
    match env::var("TRICODE_MAX_DIM") {
        Ok(value) => match value.trim().parse::<u32>() {
            Ok(0) => None,
            Ok(v) => Some(v),
            Err(_) => None,
        },
        Err(_) => None,
    }
}

/// Load an image as RGBA bytes along with its dimensions.
///
/// Images larger than `TRICODE_MAX_DIM` on either side are scaled down first.
pub fn load_rgba<P: AsRef<Path>>(path: P) -> Result<(Vec<u8>, usize, usize), image::ImageError> {
    let img = image::open(path)?;
    let rgba = match max_dim_from_env() {
        Some(max_dim) if img.dimensions().0.max(img.dimensions().1) > max_dim => img
            .resize(max_dim, max_dim, image::imageops::FilterType::Triangle)
            .to_rgba8(),
        _ => img.to_rgba8(),
    };
    let (width, height) = rgba.dimensions();
    Ok((rgba.into_raw(), width as usize, height as usize))
}

/// Failure writing a symbol to disk
#[derive(Debug, Error)]
pub enum ExportError {
    /// SVG output could not be written
    #[error("svg write failed: {0}")]
    Io(#[from] io::Error),
    /// Raster encoding or write failed
    #[error("image write failed: {0}")]
    Image(#[from] image::ImageError),
}

/// Write an encoded symbol. `.svg` paths get vector output, anything else
/// is rasterized with the given margin and saved through `image`.
pub fn save_symbol<P: AsRef<Path>>(
    symbol: &EncodedSymbol,
    path: P,
    margin: u32,
) -> Result<(), ExportError> {
    let path = path.as_ref();
    let is_svg = path
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("svg"));
    if is_svg {
        fs::write(path, to_svg(symbol))?;
    } else {
        rasterize(symbol, margin).save(path)?;
    }
    Ok(())
}

/// Summary statistics for grayscale data.
#[derive(Debug, Clone, Copy)]
pub struct GrayStats {
    /// Minimum grayscale value.
    pub min: u8,
    /// Maximum grayscale value.
    pub max: u8,
    /// Average grayscale value.
    pub avg: u8,
}

/// Summary statistics for a binary matrix.
#[derive(Debug, Clone, Copy)]
pub struct BinaryStats {
    /// Count of ink pixels.
    pub ink_pixels: usize,
    /// Total pixels in the matrix.
    pub total_pixels: usize,
    /// Ratio of ink pixels to total pixels.
    pub ink_ratio: f64,
}

/// Compute min/max/avg for grayscale values.
pub fn grayscale_stats(gray: &[u8]) -> GrayStats {
    let mut min = u8::MAX;
    let mut max = u8::MIN;
    let mut sum: u64 = 0;
    for &v in gray {
        min = min.min(v);
        max = max.max(v);
        sum += v as u64;
    }
    let avg = if gray.is_empty() {
        0
    } else {
        (sum / gray.len() as u64) as u8
    };
    GrayStats { min, max, avg }
}

/// Compute ink pixel stats for a binary matrix.
pub fn binary_stats(binary: &BitMatrix) -> BinaryStats {
    let ink = binary.count_ones();
    let total = binary.width() * binary.height();
    let ratio = if total == 0 { 0.0 } else { ink as f64 / total as f64 };
    BinaryStats {
        ink_pixels: ink,
        total_pixels: total,
        ink_ratio: ratio,
    }
}

/// Everything the `inspect` command prints for one image
#[derive(Debug, Clone, Copy)]
pub struct Inspection {
    /// Luma of the smoothed image
    pub gray: GrayStats,
    /// Ink mask coverage
    pub binary: BinaryStats,
    /// Candidate counts per stage
    pub stages: StageReport,
}

/// Run the preprocessing and shape stages without sampling
pub fn inspect(image: &ImageView<'_>, config: &DecodeConfig) -> Inspection {
    let pre = preprocess(image, config);
    let (_, stages) = find_triangles(&pre.binary, config);
    Inspection {
        gray: grayscale_stats(&pre.smoothed),
        binary: binary_stats(&pre.binary),
        stages,
    }
}
