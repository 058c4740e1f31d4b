/// Affine frame recovery from the two finder triangles
use crate::detector::finder::Triangle;
use crate::error::{Error, Result};
use crate::models::{Point, Version};
use crate::utils::geometry::{dot, norm, sub, unit};

/// Local affine frame: `origin`, unit axes `ex`/`ey`, and the lengths the
/// axes were measured over.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Basis {
    /// Frame origin in image coordinates
    pub origin: Point,
    /// Unit x axis
    pub ex: Point,
    /// Unit y axis, orthogonal to `ex`
    pub ey: Point,
    /// Length measured along `ex`
    pub scale_x: f64,
    /// Length measured along `ey`
    pub scale_y: f64,
}

impl Basis {
    /// Image point to local (u, v)
    pub fn to_local(&self, p: &Point) -> (f64, f64) {
        let d = sub(p, &self.origin);
        (dot(&d, &self.ex), dot(&d, &self.ey))
    }

    /// Local (u, v) to image point
    pub fn to_global(&self, u: f64, v: f64) -> Point {
        Point::new(
            self.origin.x + u * self.ex.x + v * self.ey.x,
            self.origin.y + u * self.ex.y + v * self.ey.y,
        )
    }

    /// Unit axes that are orthogonal within `tolerance`
    pub fn is_orthonormal(&self, tolerance: f64) -> bool {
        (norm(&self.ex) - 1.0).abs() <= tolerance
            && (norm(&self.ey) - 1.0).abs() <= tolerance
            && dot(&self.ex, &self.ey).abs() <= tolerance
    }
}

/// Remove the `ex` component from `ey` and renormalize
fn orthogonalize(ex: &Point, ey: &Point) -> Option<Point> {
    let d = dot(ex, ey);
    unit(&Point::new(ey.x - d * ex.x, ey.y - d * ex.y))
}

/// Label a triangle's corners by distance to `reference`: nearest is C,
/// farthest is B, the remaining one A.
pub fn classify_corners(corners: &[Point; 3], reference: &Point) -> Result<(Point, Point, Point)> {
    let mut order = [0usize, 1, 2];
    order.sort_by(|&i, &j| {
        corners[i]
            .distance_squared(reference)
            .total_cmp(&corners[j].distance_squared(reference))
    });
    let [c, a, b] = order.map(|i| corners[i]);
    if a.distance(&c) < 1e-6 || a.distance(&b) < 1e-6 || b.distance(&c) < 1e-6 {
        return Err(Error::AmbiguousGeometry("coincident corners"));
    }
    Ok((a, b, c))
}

/// Frame with origin at the midpoint of AB, x along AB and y from that
/// midpoint toward C, orthogonalized against x.
pub fn build_local_basis(a: &Point, b: &Point, c: &Point) -> Result<Basis> {
    let origin = a.midpoint(b);
    let ab = sub(b, a);
    let scale_x = norm(&ab);
    let ex = unit(&ab).ok_or(Error::AmbiguousGeometry("A and B coincide"))?;

    let mc = sub(c, &origin);
    let scale_y = norm(&mc);
    let ey = unit(&mc).ok_or(Error::AmbiguousGeometry("C on the AB midpoint"))?;
    let ey = orthogonalize(&ex, &ey).ok_or(Error::AmbiguousGeometry("C collinear with AB"))?;

    Ok(Basis {
        origin,
        ex,
        ey,
        scale_x,
        scale_y,
    })
}

/// Shared frame of a finder pair.
///
/// Corners of each triangle are labelled against the other triangle's
/// center. The secondary's frame runs from its near base corner to its far
/// base corner; the primary's frame runs along its base toward the corner
/// nearest the secondary. Both point the same way on an upright symbol, so
/// the two frames are averaged and re-orthonormalized.
pub fn rectify(primary: &Triangle, secondary: &Triangle) -> Result<Basis> {
    let (a1, b1, c1) = classify_corners(&secondary.corners, &primary.center)?;
    let secondary_basis = build_local_basis(&a1, &b1, &c1)?;

    let (a2, b2, c2) = classify_corners(&primary.corners, &secondary.center)?;
    let primary_basis = build_local_basis(&a2, &c2, &b2)?;

    let avg = |p: Point, q: Point| p.midpoint(&q);
    let ex = unit(&avg(secondary_basis.ex, primary_basis.ex))
        .ok_or(Error::AmbiguousGeometry("finder frames disagree"))?;
    let ey = orthogonalize(&ex, &avg(secondary_basis.ey, primary_basis.ey))
        .ok_or(Error::AmbiguousGeometry("finder frames disagree"))?;

    let basis = Basis {
        origin: avg(secondary_basis.origin, primary_basis.origin),
        ex,
        ey,
        scale_x: (secondary_basis.scale_x + primary_basis.scale_x) / 2.0,
        scale_y: (secondary_basis.scale_y + primary_basis.scale_y) / 2.0,
    };
    log::debug!(
        "basis origin=({:.1},{:.1}) ex=({:.3},{:.3}) ey=({:.3},{:.3}) scale=({:.1},{:.1})",
        basis.origin.x,
        basis.origin.y,
        basis.ex.x,
        basis.ex.y,
        basis.ey.x,
        basis.ey.y,
        basis.scale_x,
        basis.scale_y
    );
    Ok(basis)
}

/// Ring count estimate: centroid distance over the mean finder cell size
pub fn estimate_rings(primary: &Triangle, secondary: &Triangle) -> f64 {
    let cell = (primary.cell_size() + secondary.cell_size()) / 2.0;
    if cell <= 0.0 {
        return 0.0;
    }
    primary.center.distance(&secondary.center) / cell
}

/// Version from the ring estimate rounded to the nearest multiple of five;
/// the largest tier when nothing matches.
pub fn estimate_version(primary: &Triangle, secondary: &Triangle) -> Version {
    let rings = estimate_rings(primary, secondary);
    let rounded = ((rings / 5.0).round() * 5.0) as usize;
    let version = Version::from_ring_count(rounded).unwrap_or(Version::MAX);
    log::debug!("ring estimate {:.2} -> {} -> tier {}", rings, rounded, version);
    version
}

/// Tiers worth sampling: the rounded estimate first, then the tiers whose
/// ring counts lie nearest to the raw estimate.
pub fn candidate_versions(primary: &Triangle, secondary: &Triangle) -> Vec<Version> {
    const TRIED: usize = 3;
    let rings = estimate_rings(primary, secondary);
    let first = estimate_version(primary, secondary);
    let mut rest: Vec<Version> = Version::all().filter(|v| *v != first).collect();
    rest.sort_by(|a, b| {
        let da = (a.ring_count() as f64 - rings).abs();
        let db = (b.ring_count() as f64 - rings).abs();
        da.total_cmp(&db)
    });

    let mut out = vec![first];
    out.extend(rest.into_iter().take(TRIED - 1));
    out
}
