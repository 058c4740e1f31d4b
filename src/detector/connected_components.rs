/// Connected components over ink pixels, 8-connectivity
use crate::models::{BitMatrix, PointI};

/// Neighbor offsets for 8-connectivity
const NEIGHBORS: [(i32, i32); 8] = [
    (1, 0),
    (-1, 0),
    (0, 1),
    (0, -1),
    (1, 1),
    (-1, -1),
    (1, -1),
    (-1, 1),
];

/// One 8-connected blob of ink pixels
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Region {
    /// Member pixels; the first one is the raster-order seed
    pub pixels: Vec<PointI>,
}

impl Region {
    /// Top-most, left-most pixel of the region
    pub fn seed(&self) -> PointI {
        self.pixels[0]
    }

    /// Pixel count
    pub fn len(&self) -> usize {
        self.pixels.len()
    }

    /// True for a region with no pixels
    pub fn is_empty(&self) -> bool {
        self.pixels.is_empty()
    }

    /// Bounding box as (min_x, min_y, max_x, max_y)
    pub fn bounds(&self) -> (i32, i32, i32, i32) {
        self.pixels.iter().fold(
            (i32::MAX, i32::MAX, i32::MIN, i32::MIN),
            |(x0, y0, x1, y1), p| (x0.min(p.x), y0.min(p.y), x1.max(p.x), y1.max(p.y)),
        )
    }
}

/// Find all 8-connected ink regions in raster order of their seeds.
/// Flood fill uses an explicit stack so memory stays bounded by region size.
pub fn connected_regions(matrix: &BitMatrix) -> Vec<Region> {
    let width = matrix.width();
    let height = matrix.height();
    let mut visited = vec![false; width * height];
    let mut regions = Vec::new();
    let mut stack: Vec<PointI> = Vec::new();

    for y in 0..height {
        for x in 0..width {
            let idx = y * width + x;
            if !matrix.get(x, y) || visited[idx] {
                continue;
            }

            let seed = PointI::new(x as i32, y as i32);
            visited[idx] = true;
            let mut pixels = vec![seed];
            stack.push(seed);

            while let Some(p) = stack.pop() {
                for &(dx, dy) in &NEIGHBORS {
                    let n = p.step(dx, dy);
                    if n.x < 0 || n.y < 0 || n.x as usize >= width || n.y as usize >= height {
                        continue;
                    }
                    let nidx = n.y as usize * width + n.x as usize;
                    if visited[nidx] || !matrix.get(n.x as usize, n.y as usize) {
                        continue;
                    }
                    visited[nidx] = true;
                    pixels.push(n);
                    stack.push(n);
                }
            }

            regions.push(Region { pixels });
        }
    }

    regions
}
