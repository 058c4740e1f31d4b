use crate::models::Point;

/// Calculate distance between two points
pub fn distance(p1: &Point, p2: &Point) -> f64 {
    p1.distance(p2)
}

/// Vector from `from` to `to`
pub fn sub(to: &Point, from: &Point) -> Point {
    Point::new(to.x - from.x, to.y - from.y)
}

/// Dot product of two vectors
pub fn dot(a: &Point, b: &Point) -> f64 {
    a.x * b.x + a.y * b.y
}

/// Vector length
pub fn norm(v: &Point) -> f64 {
    v.x.hypot(v.y)
}

/// Unit vector, `None` for a zero vector
pub fn unit(v: &Point) -> Option<Point> {
    let len = norm(v);
    if len < 1e-12 {
        return None;
    }
    Some(Point::new(v.x / len, v.y / len))
}

/// Interior angle in radians at `p2` between `p1` and `p3`
pub fn angle(p1: &Point, p2: &Point, p3: &Point) -> f64 {
    let v1 = sub(p1, p2);
    let v2 = sub(p3, p2);
    let cos = dot(&v1, &v2) / (norm(&v1) * norm(&v2) + 1e-6);
    cos.clamp(-1.0, 1.0).acos()
}

/// Mean of a set of points
pub fn centroid(points: &[Point]) -> Option<Point> {
    if points.is_empty() {
        return None;
    }
    let n = points.len() as f64;
    let (sx, sy) = points
        .iter()
        .fold((0.0, 0.0), |(sx, sy), p| (sx + p.x, sy + p.y));
    Some(Point::new(sx / n, sy / n))
}

/// Sides of a triangle sorted ascending
pub fn sorted_sides(corners: &[Point; 3]) -> [f64; 3] {
    let mut sides = [
        corners[0].distance(&corners[1]),
        corners[1].distance(&corners[2]),
        corners[2].distance(&corners[0]),
    ];
    sides.sort_by(f64::total_cmp);
    sides
}
