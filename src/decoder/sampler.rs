/// Module sampling through the rectified frame
use crate::decoder::rectify::Basis;
use crate::detector::finder::Triangle;
use crate::error::{Error, Result};
use crate::layout::{self, PositionEntry};
use crate::models::{BitDepth, BitMatrix, Point, Version};

/// Accepted ratio between the recovered cell pitch and the finder based cell size
const PITCH_TOLERANCE: (f64, f64) = (0.75, 1.33);

/// Maps canonical layout points into the image.
///
/// The primary finder centroid anchors the map. Per-axis pitch comes from
/// the displacement between the two finder centroids, which is known
/// exactly in canonical units.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SampleGrid {
    basis: Basis,
    anchor_local: (f64, f64),
    anchor_canonical: Point,
    pitch_u: f64,
    pitch_v: f64,
}

impl SampleGrid {
    /// Build the map for a finder pair and tier. Fails when the recovered
    /// pitch does not agree with the finder sizes, which happens when the
    /// tier estimate is wrong.
    pub fn new(basis: &Basis, primary: &Triangle, secondary: &Triangle, version: Version) -> Result<Self> {
        let p_canon = layout::primary_centroid();
        let s_canon = layout::secondary_centroid(version);
        let (up, vp) = basis.to_local(&primary.center);
        let (us, vs) = basis.to_local(&secondary.center);

        let pitch_u = (us - up) / (s_canon.x - p_canon.x);
        let pitch_v = (vs - vp) / (s_canon.y - p_canon.y);

        let cell = (primary.cell_size() + secondary.cell_size()) / 2.0;
        let (lo, hi) = PITCH_TOLERANCE;
        for pitch in [pitch_u, pitch_v] {
            let ratio = pitch.abs() / cell;
            if !(lo..=hi).contains(&ratio) {
                log::debug!("pitch {:.2} disagrees with cell size {:.2}", pitch, cell);
                return Err(Error::SymbolNotFound);
            }
        }

        Ok(Self {
            basis: *basis,
            anchor_local: (up, vp),
            anchor_canonical: p_canon,
            pitch_u,
            pitch_v,
        })
    }

    /// Image position of a canonical point
    pub fn image_point(&self, canonical: &Point) -> Point {
        let u = self.anchor_local.0 + (canonical.x - self.anchor_canonical.x) * self.pitch_u;
        let v = self.anchor_local.1 + (canonical.y - self.anchor_canonical.y) * self.pitch_v;
        self.basis.to_global(u, v)
    }

    /// Image position of a cell's centroid
    pub fn cell_center(&self, entry: &PositionEntry) -> Point {
        self.image_point(&entry.centroid())
    }
}

/// Reads module colors from the source pixels
pub struct Sampler<'a> {
    pixels: &'a [u8],
    channels: usize,
    binary: &'a BitMatrix,
    width: usize,
    height: usize,
    window: usize,
}

impl<'a> Sampler<'a> {
    /// Sampler over an interleaved RGB(A) buffer and its binarization
    pub fn new(pixels: &'a [u8], channels: usize, binary: &'a BitMatrix, window: usize) -> Self {
        Self {
            pixels,
            channels,
            binary,
            width: binary.width(),
            height: binary.height(),
            window: window.max(1),
        }
    }

    fn rgb(&self, x: usize, y: usize) -> [u8; 3] {
        let idx = (y * self.width + x) * self.channels;
        [self.pixels[idx], self.pixels[idx + 1], self.pixels[idx + 2]]
    }

    /// Median of per-pixel classifications over the window around `p`.
    /// `None` when the window lies entirely outside the image.
    fn median_vote<F>(&self, p: &Point, classify: F) -> Option<u8>
    where
        F: Fn(usize, usize) -> u8,
    {
        let half = (self.window / 2) as i64;
        let cx = p.x.round() as i64;
        let cy = p.y.round() as i64;

        let mut votes = Vec::with_capacity(self.window * self.window);
        for dy in -half..=half {
            for dx in -half..=half {
                let (x, y) = (cx + dx, cy + dy);
                if x < 0 || y < 0 || x as usize >= self.width || y as usize >= self.height {
                    continue;
                }
                votes.push(classify(x as usize, y as usize));
            }
        }

        if votes.is_empty() {
            return None;
        }
        votes.sort_unstable();
        Some(votes[votes.len() / 2])
    }

    /// Depth announced by the color at the primary finder's center
    pub fn finder_depth(&self, center: &Point) -> BitDepth {
        let color = self
            .median_vote(center, |x, y| BitDepth::classify_wide(self.rgb(x, y)))
            .unwrap_or(0);
        BitDepth::from_finder_color(color)
    }

    /// Module value at an image point. One-bit modules are read from the
    /// binarized image, wider ones by nearest palette color. Points outside
    /// the image read as 0.
    pub fn sample(&self, p: &Point, depth: BitDepth) -> u8 {
        let value = match depth {
            BitDepth::One => self.median_vote(p, |x, y| self.binary.get(x, y) as u8),
            _ => self.median_vote(p, |x, y| depth.classify(self.rgb(x, y))),
        };
        value.unwrap_or(0)
    }

    /// Sample every layout position of `version`. Returns the module values
    /// in layout order and the image points they were read at.
    pub fn decode_positions(&self, grid: &SampleGrid, version: Version, depth: BitDepth) -> (Vec<u8>, Vec<Point>) {
        let positions = layout::positions_for(version);
        let mut modules = Vec::with_capacity(positions.len());
        let mut points = Vec::with_capacity(positions.len());
        for entry in &positions {
            let p = grid.cell_center(entry);
            modules.push(self.sample(&p, depth));
            points.push(p);
        }
        (modules, points)
    }
}

/// Count finder cells whose sampled value disagrees with the layout
pub fn finder_mismatches(modules: &[u8]) -> usize {
    let primary = layout::primary_block_values();
    let secondary = layout::secondary_block_values();
    let tail = modules.len().saturating_sub(layout::SECONDARY_BLOCK_LEN);
    let head = modules.iter().zip(primary.iter()).filter(|(a, b)| a != b).count();
    let rest = modules[tail..]
        .iter()
        .zip(secondary.iter())
        .filter(|(a, b)| a != b)
        .count();
    head + rest
}
