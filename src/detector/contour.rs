/// Boundary tracing around an ink region
use crate::models::{BitMatrix, PointI};

/// Hard cap on tracing steps
pub const MAX_STEPS: usize = 50_000;

/// Directions in clockwise order starting east (image y grows downward)
const DIRECTIONS: [(i32, i32); 8] = [
    (1, 0),
    (1, 1),
    (0, 1),
    (-1, 1),
    (-1, 0),
    (-1, -1),
    (0, -1),
    (1, -1),
];

/// Trace the outer boundary of the region containing `start`, which must be
/// the region's top-most, left-most pixel.
///
/// Each step tries directions from one turn counter-clockwise of the previous
/// heading round to six turns clockwise and takes the first ink pixel. The
/// walk stops on returning to `start`, on a dead end, or after [`MAX_STEPS`].
/// The start pixel appears once.
pub fn trace_contour(matrix: &BitMatrix, start: PointI) -> Vec<PointI> {
    let mut contour = vec![start];
    let mut current = start;
    let mut heading = 0usize;

    for _ in 0..MAX_STEPS {
        let next = (-1i32..=6).find_map(|k| {
            let d = (heading as i32 + k).rem_euclid(8) as usize;
            let (dx, dy) = DIRECTIONS[d];
            let p = current.step(dx, dy);
            matrix.get_signed(p.x as i64, p.y as i64).then_some((d, p))
        });

        let Some((d, p)) = next else {
            break;
        };
        if p == start && contour.len() > 5 {
            break;
        }
        contour.push(p);
        current = p;
        heading = d;
    }

    contour
}

#[cfg(test)]
mod tests {
    use super::*;

    fn filled_square(size: usize, margin: usize) -> BitMatrix {
        let mut m = BitMatrix::new(size + 2 * margin, size + 2 * margin);
        for y in margin..margin + size {
            for x in margin..margin + size {
                m.set(x, y, true);
            }
        }
        m
    }

    #[test]
    fn test_square_perimeter() {
        let m = filled_square(10, 2);
        let contour = trace_contour(&m, PointI::new(2, 2));
        // 4 * (10 - 1) boundary pixels
        assert_eq!(contour.len(), 36);
        assert_eq!(contour[0], PointI::new(2, 2));
        assert_eq!(contour[1], PointI::new(3, 2));
        assert!(contour.contains(&PointI::new(11, 11)));
        assert!(!contour.contains(&PointI::new(5, 5)));
    }

    #[test]
    fn test_single_pixel() {
        let m = filled_square(1, 1);
        assert_eq!(trace_contour(&m, PointI::new(1, 1)), vec![PointI::new(1, 1)]);
    }

    #[test]
    fn test_triangle_contour_visits_base() {
        let mut m = BitMatrix::new(30, 20);
        for y in 2..18 {
            let half = (y - 2) as i32;
            for x in (15 - half / 2)..=(15 + half / 2) {
                m.set(x as usize, y, true);
            }
        }
        let contour = trace_contour(&m, PointI::new(15, 2));
        assert!(contour.len() > 20);
        assert!(contour.iter().any(|p| p.y == 17));
        assert!(contour.iter().all(|p| m.get(p.x as usize, p.y as usize)));
    }
}
