//! Symbol detection modules
//!
//! This module contains the logic for locating finder triangles in a
//! binarized image:
//! - Connected region extraction (8-connected flood fill)
//! - Boundary contour tracing
//! - Curvature corners clustered into triangle vertices
//! - Finder classification by probing from each corner

/// 8-connected ink regions
pub mod connected_components;
/// Region boundary tracing
pub mod contour;
/// Corner candidates and DBSCAN clustering
pub mod corners;
/// Triangle shape gate and primary/secondary classification
pub mod finder;
