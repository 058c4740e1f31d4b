/// Finder triangle validation and classification by border probing
use crate::models::{BitMatrix, Point};
use crate::utils::geometry::{centroid, sorted_sides, sub, unit};

/// Finder classification of a candidate triangle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FinderType {
    /// Solid triangle
    Primary,
    /// Triangle with its central cell cut out
    Secondary,
    /// Corners disagree or match neither pattern
    Rejected,
}

impl FinderType {
    /// Numeric code: 0 primary, 1 secondary, -1 rejected
    pub fn code(&self) -> i8 {
        match self {
            FinderType::Primary => 0,
            FinderType::Secondary => 1,
            FinderType::Rejected => -1,
        }
    }
}

/// Candidate triangle with its classification
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Triangle {
    /// Corner points in image coordinates
    pub corners: [Point; 3],
    /// Centroid of the corners
    pub center: Point,
    /// Mean side length in pixels
    pub side: f64,
    /// Finder type
    pub kind: FinderType,
    /// Ink pixels of the region, 0 when not measured
    pub area: usize,
}

impl Triangle {
    /// Cell size in pixels. Taken from the ink area when known (16 cells
    /// for a primary finder, 15 for a secondary one), otherwise from the
    /// corner-measured side, which runs short because corner clusters sit
    /// inside the true vertices.
    pub fn cell_size(&self) -> f64 {
        if self.area == 0 {
            return self.side / 4.0;
        }
        let cells = match self.kind {
            FinderType::Secondary => 15.0,
            _ => 16.0,
        };
        // a unit cell covers √3/4
        (self.area as f64 / (cells * 3f64.sqrt() / 4.0)).sqrt()
    }
}

/// Border probe parameters
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProbeParams {
    /// Samples along each probe ray
    pub samples: usize,
    /// Equal segments the samples are bucketed into
    pub segments: usize,
    /// Longest/shortest side ratio must stay below this
    pub max_side_ratio: f64,
}

impl Default for ProbeParams {
    fn default() -> Self {
        Self {
            samples: 100,
            segments: 5,
            max_side_ratio: 1.15,
        }
    }
}

/// Near-equilateral gate: longest side over shortest side below `max_ratio`
pub fn is_triangle_shape(corners: &[Point; 3], max_ratio: f64) -> bool {
    let [shortest, _, longest] = sorted_sides(corners);
    shortest > 0.0 && longest / shortest < max_ratio
}

/// Ink pattern seen along one probe ray, one flag per segment
#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Ink,
    Blank,
    Mixed,
}

/// Probe each corner along the ray through the centroid and classify the
/// triangle. The ray is `side·√3·5/8` long, so its last segment lies in the
/// quiet band beyond the opposite edge. A solid triangle reads
/// ink-ink-ink-ink-blank, the secondary finder ink-ink-blank-ink-blank.
/// All three corners must agree.
pub fn check_corners(matrix: &BitMatrix, corners: &[Point; 3], params: &ProbeParams) -> Triangle {
    let center = centroid(corners).unwrap_or_default();
    let sides = sorted_sides(corners);
    let side = sides.iter().sum::<f64>() / 3.0;
    let length = side * 3f64.sqrt() * 5.0 / 8.0;

    let mut kind: Option<FinderType> = None;
    for corner in corners {
        let found = probe(matrix, corner, &center, length, params);
        match kind {
            None => kind = Some(found),
            Some(k) if k != found => {
                kind = Some(FinderType::Rejected);
                break;
            }
            Some(_) => {}
        }
    }

    Triangle {
        corners: *corners,
        center,
        side,
        kind: kind.unwrap_or(FinderType::Rejected),
        area: 0,
    }
}

fn probe(matrix: &BitMatrix, from: &Point, toward: &Point, length: f64, params: &ProbeParams) -> FinderType {
    let Some(dir) = unit(&sub(toward, from)) else {
        return FinderType::Rejected;
    };
    let end = Point::new(from.x + dir.x * length, from.y + dir.y * length);

    let segments = params.segments.max(1);
    let per_segment = (params.samples / segments).max(1);
    let mut counts = vec![0usize; segments];
    let last = params.samples.saturating_sub(1).max(1) as f64;

    for i in 0..params.samples {
        let t = i as f64 / last;
        let x = (from.x + (end.x - from.x) * t).round() as i64;
        let y = (from.y + (end.y - from.y) * t).round() as i64;
        if matrix.get_signed(x, y) {
            counts[(i / per_segment).min(segments - 1)] += 1;
        }
    }

    // majority thresholds: ink above 60 %, blank below 40 %
    let segments: Vec<Segment> = counts
        .iter()
        .map(|&c| {
            if c * 5 > per_segment * 3 {
                Segment::Ink
            } else if c * 5 < per_segment * 2 {
                Segment::Blank
            } else {
                Segment::Mixed
            }
        })
        .collect();

    use Segment::{Blank, Ink};
    match segments.as_slice() {
        [Ink, Ink, Ink, Ink, Blank] => FinderType::Primary,
        [Ink, Ink, Blank, Ink, Blank] => FinderType::Secondary,
        _ => FinderType::Rejected,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SQRT3: f64 = 1.732_050_807_568_877_2;

    /// Upward triangle of side `4 * cell` with apex at (cx, top). With `hole`
    /// the central cell (an upward triangle of side `cell` around the
    /// centroid) is left blank.
    fn finder_matrix(cx: f64, top: f64, cell: f64, hole: bool) -> (BitMatrix, [Point; 3]) {
        let side = 4.0 * cell;
        let h = side * SQRT3 / 2.0;
        let (w, hgt) = ((cx * 2.0) as usize, (top * 2.0 + h) as usize);
        let mut m = BitMatrix::new(w, hgt);
        let hole_top = top + 2.0 * cell * SQRT3 / 2.0;
        let hole_bottom = hole_top + cell * SQRT3 / 2.0;
        for y in 0..hgt {
            let py = y as f64 + 0.5;
            if py < top || py > top + h {
                continue;
            }
            for x in 0..w {
                let px = x as f64 + 0.5;
                if (px - cx).abs() > (py - top) / SQRT3 {
                    continue;
                }
                let in_hole = py > hole_top && py < hole_bottom && (px - cx).abs() < (py - hole_top) / SQRT3;
                m.set(x, y, !(hole && in_hole));
            }
        }
        let corners = [
            Point::new(cx, top),
            Point::new(cx + side / 2.0, top + h),
            Point::new(cx - side / 2.0, top + h),
        ];
        (m, corners)
    }

    #[test]
    fn test_shape_gate() {
        let eq = [Point::new(0.0, 0.0), Point::new(10.0, 0.0), Point::new(5.0, 8.66)];
        assert!(is_triangle_shape(&eq, 1.15));
        let skewed = [Point::new(0.0, 0.0), Point::new(20.0, 0.0), Point::new(5.0, 8.66)];
        assert!(!is_triangle_shape(&skewed, 1.15));
    }

    #[test]
    fn test_primary_classified() {
        let (m, corners) = finder_matrix(100.0, 40.0, 20.0, false);
        let t = check_corners(&m, &corners, &ProbeParams::default());
        assert_eq!(t.kind, FinderType::Primary);
        assert!((t.side - 80.0).abs() < 1e-9);
    }

    #[test]
    fn test_cell_size_from_area() {
        for hole in [false, true] {
            let (m, corners) = finder_matrix(100.0, 40.0, 20.0, hole);
            let mut t = check_corners(&m, &corners, &ProbeParams::default());
            assert!((t.cell_size() - 20.0).abs() < 1e-9);
            t.area = m.count_ones();
            assert!((t.cell_size() - 20.0).abs() < 0.5, "{:?} {}", t.kind, t.cell_size());
        }
    }

    #[test]
    fn test_secondary_classified() {
        let (m, corners) = finder_matrix(100.0, 40.0, 20.0, true);
        let t = check_corners(&m, &corners, &ProbeParams::default());
        assert_eq!(t.kind, FinderType::Secondary);
        assert_eq!(t.kind.code(), 1);
    }

    #[test]
    fn test_classification_ignores_corner_order() {
        for hole in [false, true] {
            let (m, [a, b, c]) = finder_matrix(100.0, 40.0, 20.0, hole);
            let base = check_corners(&m, &[a, b, c], &ProbeParams::default()).kind;
            assert_ne!(base, FinderType::Rejected);
            for rotated in [[b, c, a], [c, a, b]] {
                assert_eq!(check_corners(&m, &rotated, &ProbeParams::default()).kind, base);
            }
        }
    }

    #[test]
    fn test_blank_area_rejected() {
        let m = BitMatrix::new(200, 200);
        let corners = [Point::new(100.0, 40.0), Point::new(140.0, 109.0), Point::new(60.0, 109.0)];
        assert_eq!(check_corners(&m, &corners, &ProbeParams::default()).kind, FinderType::Rejected);
    }
}
