/// Curvature based corner detection with density clustering
use crate::error::{Error, Result};
use crate::models::{Point, PointI};
use crate::utils::geometry::{angle, centroid};

/// Corner detection parameters
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CornerParams {
    /// Contour steps to either side when measuring the angle
    pub window: usize,
    /// Smallest angle (degrees, exclusive) that counts as a corner
    pub min_angle_deg: f64,
    /// Largest angle (degrees, exclusive) that counts as a corner
    pub max_angle_deg: f64,
    /// DBSCAN neighborhood radius in pixels
    pub eps: f64,
    /// DBSCAN minimum neighborhood size, the point itself included
    pub min_points: usize,
}

impl Default for CornerParams {
    fn default() -> Self {
        Self {
            window: 10,
            min_angle_deg: 30.0,
            max_angle_deg: 100.0,
            eps: 20.0,
            min_points: 3,
        }
    }
}

/// Contour points whose angle to the points `window` steps away falls inside
/// the corner band
pub fn corner_candidates(contour: &[PointI], params: &CornerParams) -> Vec<Point> {
    let n = contour.len();
    if n == 0 {
        return Vec::new();
    }
    let k = params.window % n;
    let lo = params.min_angle_deg.to_radians();
    let hi = params.max_angle_deg.to_radians();

    (0..n)
        .filter_map(|i| {
            let prev = Point::from(contour[(i + n - k) % n]);
            let p = Point::from(contour[i]);
            let next = Point::from(contour[(i + k) % n]);
            let a = angle(&prev, &p, &next);
            (a > lo && a < hi).then_some(p)
        })
        .collect()
}

/// Density based clustering. Returns one label per point, `None` for noise,
/// and the number of clusters.
pub fn dbscan(points: &[Point], eps: f64, min_points: usize) -> (Vec<Option<usize>>, usize) {
    let eps_sq = eps * eps;
    let neighbors = |i: usize| -> Vec<usize> {
        (0..points.len())
            .filter(|&j| points[i].distance_squared(&points[j]) <= eps_sq)
            .collect()
    };

    let mut labels: Vec<Option<usize>> = vec![None; points.len()];
    let mut visited = vec![false; points.len()];
    // a point enters a cluster's queue at most once
    let mut queued = vec![false; points.len()];
    let mut clusters = 0;

    for i in 0..points.len() {
        if visited[i] {
            continue;
        }
        visited[i] = true;

        let seeds = neighbors(i);
        if seeds.len() < min_points {
            continue;
        }

        let cluster = clusters;
        clusters += 1;
        labels[i] = Some(cluster);
        queued[i] = true;

        let mut queue = Vec::with_capacity(seeds.len());
        for j in seeds {
            if !queued[j] {
                queued[j] = true;
                queue.push(j);
            }
        }
        while let Some(j) = queue.pop() {
            if labels[j].is_none() {
                labels[j] = Some(cluster);
            }
            if visited[j] {
                continue;
            }
            visited[j] = true;
            let expansion = neighbors(j);
            if expansion.len() < min_points {
                continue;
            }
            for k in expansion {
                if !visited[k] && !queued[k] {
                    queued[k] = true;
                    queue.push(k);
                } else if labels[k].is_none() {
                    labels[k] = Some(cluster);
                }
            }
        }
    }

    (labels, clusters)
}

/// Find the three corners of a triangular contour: the centroids of exactly
/// three corner clusters.
pub fn detect_corners(contour: &[PointI], params: &CornerParams) -> Result<[Point; 3]> {
    let candidates = corner_candidates(contour, params);
    if candidates.is_empty() {
        return Err(Error::AmbiguousGeometry("no corner candidates"));
    }

    let (labels, clusters) = dbscan(&candidates, params.eps, params.min_points);
    if clusters != 3 {
        return Err(Error::AmbiguousGeometry("corner clusters != 3"));
    }

    let mut groups: [Vec<Point>; 3] = Default::default();
    for (p, label) in candidates.iter().zip(labels) {
        if let Some(c) = label {
            groups[c].push(*p);
        }
    }

    let mut corners = [Point::default(); 3];
    for (corner, group) in corners.iter_mut().zip(groups.iter()) {
        *corner = centroid(group).ok_or(Error::AmbiguousGeometry("empty corner cluster"))?;
    }

    let [a, b, c] = corners;
    if a.distance(&b) < 1.0 || b.distance(&c) < 1.0 || c.distance(&a) < 1.0 {
        return Err(Error::AmbiguousGeometry("coincident corners"));
    }

    Ok(corners)
}
