//! Decode pipeline. Every stage takes the previous stage's output by value
//! or reference and returns a fresh value; nothing is shared across calls.

use crate::decoder::bitstream::BitUnpacker;
use crate::decoder::config::DecodeConfig;
use crate::decoder::rectify::{Basis, candidate_versions, rectify};
use crate::decoder::sampler::{SampleGrid, Sampler, finder_mismatches};
use crate::detector::connected_components::connected_regions;
use crate::detector::contour::trace_contour;
use crate::detector::corners::detect_corners;
use crate::detector::finder::{FinderType, Triangle, check_corners, is_triangle_shape};
use crate::error::{Error, Result};
use crate::layout;
use crate::models::{BitDepth, BitMatrix, Payload, Point, Version};
use crate::utils::binarization::threshold_binarize;
use crate::utils::filter::{bilateral_filter, bilateral_filter_parallel};
use crate::utils::grayscale::{
    rgb_to_grayscale, rgb_to_grayscale_parallel, rgba_to_grayscale, rgba_to_grayscale_parallel,
};

/// Borrowed interleaved pixel buffer
#[derive(Debug, Clone, Copy)]
pub struct ImageView<'a> {
    /// Pixel bytes, row-major
    pub pixels: &'a [u8],
    /// Bytes per pixel: 3 (RGB) or 4 (RGBA)
    pub channels: usize,
    /// Width in pixels
    pub width: usize,
    /// Height in pixels
    pub height: usize,
}

impl<'a> ImageView<'a> {
    /// Checked view; `channels` is 3 (RGB) or 4 (RGBA) and the buffer must
    /// hold exactly `width * height * channels` bytes
    pub fn new(pixels: &'a [u8], channels: usize, width: usize, height: usize) -> Result<Self> {
        if !matches!(channels, 3 | 4) {
            return Err(Error::UnsupportedChannels(channels));
        }
        let expected = width
            .checked_mul(height)
            .and_then(|n| n.checked_mul(channels))
            .ok_or(Error::ImageTooLarge { width, height })?;
        if pixels.len() != expected {
            return Err(Error::InvalidImage {
                expected,
                actual: pixels.len(),
            });
        }
        Ok(Self {
            pixels,
            channels,
            width,
            height,
        })
    }
}

/// Preprocessor output
#[derive(Debug, Clone)]
pub struct Preprocessed {
    /// Luma image
    pub gray: Vec<u8>,
    /// Bilateral smoothed luma
    pub smoothed: Vec<u8>,
    /// Ink mask of the smoothed image
    pub binary: BitMatrix,
}

/// Grayscale, smoothing and binarization
pub fn preprocess(image: &ImageView<'_>, config: &DecodeConfig) -> Preprocessed {
    let (w, h) = (image.width, image.height);
    let gray = match (image.channels, config.parallel) {
        (4, false) => rgba_to_grayscale(image.pixels, w, h),
        (4, true) => rgba_to_grayscale_parallel(image.pixels, w, h),
        (_, false) => rgb_to_grayscale(image.pixels, w, h),
        (_, true) => rgb_to_grayscale_parallel(image.pixels, w, h),
    };
    let smoothed = if config.parallel {
        bilateral_filter_parallel(&gray, w, h, &config.filter)
    } else {
        bilateral_filter(&gray, w, h, &config.filter)
    };
    let binary = threshold_binarize(&smoothed, w, h, config.threshold);
    log::debug!("preprocessed {}x{}, {} ink pixels", w, h, binary.count_ones());
    Preprocessed {
        gray,
        smoothed,
        binary,
    }
}

/// Per-stage counts from candidate analysis
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StageReport {
    /// Connected ink regions
    pub regions: usize,
    /// Regions whose contour is long enough to analyse
    pub contours: usize,
    /// Contours with exactly three corner clusters
    pub cornered: usize,
    /// Near-equilateral triangles
    pub triangles: usize,
    /// Triangles classified as primary finders
    pub primaries: usize,
    /// Triangles classified as secondary finders
    pub secondaries: usize,
}

/// Segment the ink mask and classify every triangular region.
/// Regions that fail a gate are skipped; rejected triangles are kept with
/// [`FinderType::Rejected`].
pub fn find_triangles(binary: &BitMatrix, config: &DecodeConfig) -> (Vec<Triangle>, StageReport) {
    let regions = connected_regions(binary);
    let mut report = StageReport {
        regions: regions.len(),
        ..StageReport::default()
    };
    let mut triangles = Vec::new();

    for region in &regions {
        let contour = trace_contour(binary, region.seed());
        if contour.len() < config.min_contour_len {
            continue;
        }
        report.contours += 1;

        let corners = match detect_corners(&contour, &config.corners) {
            Ok(corners) => corners,
            Err(e) => {
                log::trace!("region {:?} skipped: {}", region.bounds(), e);
                continue;
            }
        };
        report.cornered += 1;

        if !is_triangle_shape(&corners, config.probe.max_side_ratio) {
            continue;
        }
        report.triangles += 1;

        let mut triangle = check_corners(binary, &corners, &config.probe);
        triangle.area = region.len();
        match triangle.kind {
            FinderType::Primary => report.primaries += 1,
            FinderType::Secondary => report.secondaries += 1,
            FinderType::Rejected => {}
        }
        log::trace!(
            "triangle at ({:.1},{:.1}) side {:.1}: {:?}",
            triangle.center.x,
            triangle.center.y,
            triangle.side,
            triangle.kind
        );
        triangles.push(triangle);
    }

    log::debug!("{:?}", report);
    (triangles, report)
}

/// Pick the finder pair: exactly one secondary, and exactly one primary
/// whose side is within the configured ratio of the secondary's.
pub fn select_finders(triangles: &[Triangle], config: &DecodeConfig) -> Result<(Triangle, Triangle)> {
    let mut secondaries = triangles.iter().filter(|t| t.kind == FinderType::Secondary);
    let secondary = match (secondaries.next(), secondaries.next()) {
        (Some(s), None) => *s,
        _ => return Err(Error::SymbolNotFound),
    };

    let (lo, hi) = config.finder_side_ratio;
    let mut primaries = triangles.iter().filter(|t| {
        t.kind == FinderType::Primary && (lo..=hi).contains(&(t.side / secondary.side))
    });
    let primary = match (primaries.next(), primaries.next()) {
        (Some(p), None) => *p,
        _ => return Err(Error::SymbolNotFound),
    };

    Ok((primary, secondary))
}

/// A decoded symbol with its diagnostic geometry
#[derive(Debug, Clone, PartialEq)]
pub struct Decoded {
    /// Recovered payload
    pub payload: Payload,
    /// Estimated tier
    pub version: Version,
    /// Bits per module announced by the primary finder
    pub depth: BitDepth,
    /// Primary finder triangle
    pub primary: Triangle,
    /// Secondary finder triangle
    pub secondary: Triangle,
    /// Shared frame of the finder pair
    pub basis: Basis,
    /// Sampled module values in layout order
    pub modules: Vec<u8>,
    /// Image point each module was read at
    pub points: Vec<Point>,
    /// Finder cells whose sampled value disagreed with the layout
    pub finder_mismatches: usize,
}

impl Decoded {
    /// Decoded content
    pub fn content(&self) -> &str {
        &self.payload.content
    }
}

/// Full decode of one image. `Err(SymbolNotFound)` when no finder pair is
/// located.
pub fn decode_image(image: &ImageView<'_>, config: &DecodeConfig) -> Result<Decoded> {
    let pre = preprocess(image, config);
    let (triangles, _) = find_triangles(&pre.binary, config);
    let (primary, secondary) = select_finders(&triangles, config)?;

    let sampler = Sampler::new(image.pixels, image.channels, &pre.binary, config.sample_window);
    let depth = sampler.finder_depth(&primary.center);
    let basis = rectify(&primary, &secondary).map_err(|e| {
        log::debug!("rectify failed: {}", e);
        Error::SymbolNotFound
    })?;
    // sample every plausible tier, keep the one whose finder cells agree best
    let mut best: Option<(Version, Vec<u8>, Vec<Point>, usize)> = None;
    for version in candidate_versions(&primary, &secondary) {
        let grid = match SampleGrid::new(&basis, &primary, &secondary, version) {
            Ok(grid) => grid,
            Err(_) => continue,
        };
        let (modules, points) = sampler.decode_positions(&grid, version, depth);
        let mismatches = finder_mismatches(&modules);
        log::debug!("tier {} depth {:?}: {} finder mismatches", version, depth, mismatches);
        if best.as_ref().is_none_or(|b| mismatches < b.3) {
            best = Some((version, modules, points, mismatches));
        }
        if mismatches == 0 {
            break;
        }
    }
    let (version, modules, points, mismatches) = best.ok_or(Error::SymbolNotFound)?;
    if mismatches > 0 {
        log::debug!("{} finder cells sampled off-pattern", mismatches);
    }

    let start = layout::PRIMARY_BLOCK_LEN;
    let data = &modules[start..start + version.capacity()];
    let payload = BitUnpacker::unpack(data, depth)?;

    Ok(Decoded {
        payload,
        version,
        depth,
        primary,
        secondary,
        basis,
        modules,
        points,
        finder_mismatches: mismatches,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn triangle(kind: FinderType, side: f64) -> Triangle {
        Triangle {
            corners: [Point::default(); 3],
            center: Point::default(),
            side,
            kind,
            area: 0,
        }
    }

    #[test]
    fn test_image_view_checks_length() {
        assert!(ImageView::new(&[0; 12], 3, 2, 2).is_ok());
        assert_eq!(
            ImageView::new(&[0; 10], 4, 2, 2).unwrap_err(),
            Error::InvalidImage { expected: 16, actual: 10 }
        );
    }

    #[test]
    fn test_image_view_rejects_channels() {
        for channels in [0, 1, 2, 5] {
            assert_eq!(
                ImageView::new(&[0; 16], channels, 2, 2).unwrap_err(),
                Error::UnsupportedChannels(channels)
            );
        }
    }

    #[test]
    fn test_image_view_rejects_overflowing_dimensions() {
        let huge = usize::MAX / 2;
        assert_eq!(
            ImageView::new(&[0; 12], 4, huge, 3).unwrap_err(),
            Error::ImageTooLarge { width: huge, height: 3 }
        );
    }

    #[test]
    fn test_select_finders() {
        let config = DecodeConfig::default();
        let list = vec![
            triangle(FinderType::Primary, 20.0),
            triangle(FinderType::Secondary, 80.0),
            triangle(FinderType::Primary, 78.0),
            triangle(FinderType::Rejected, 80.0),
        ];
        let (p, s) = select_finders(&list, &config).unwrap();
        assert_eq!(p.side, 78.0);
        assert_eq!(s.side, 80.0);
    }

    #[test]
    fn test_select_finders_requires_unique_pair() {
        let config = DecodeConfig::default();
        let two_secondaries = vec![
            triangle(FinderType::Primary, 80.0),
            triangle(FinderType::Secondary, 80.0),
            triangle(FinderType::Secondary, 80.0),
        ];
        assert_eq!(select_finders(&two_secondaries, &config), Err(Error::SymbolNotFound));

        let two_primaries = vec![
            triangle(FinderType::Primary, 80.0),
            triangle(FinderType::Primary, 82.0),
            triangle(FinderType::Secondary, 80.0),
        ];
        assert_eq!(select_finders(&two_primaries, &config), Err(Error::SymbolNotFound));
        assert_eq!(select_finders(&[], &config), Err(Error::SymbolNotFound));
    }

    #[test]
    fn test_blank_image_has_no_symbol() {
        let pixels = vec![255u8; 40 * 30 * 4];
        let image = ImageView::new(&pixels, 4, 40, 30).unwrap();
        assert_eq!(
            decode_image(&image, &DecodeConfig::default()),
            Err(Error::SymbolNotFound)
        );
    }
}
