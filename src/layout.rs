//! Triangular cell layout shared by the encoder and the sampler.
//!
//! A tier with ring count `n` is an upward triangle of `n + 7` rows. Row `r`
//! holds `2r + 1` cells; even columns point up, odd columns point down. Cell
//! side is one unit and the symbol apex sits at the origin, so cell `(r, c)`
//! is centered on `x = (c - r) / 2` between `y = r·h` and `y = (r + 1)·h`
//! with `h = √3 / 2`.
//!
//! ```text
//! row 0..1        quiet
//! row 2..=n       [quiet quiet | interior | quiet quiet]
//!                 interiors of rows 2..=6 hold the primary finder block
//! row n+1..=n+5   [quiet quiet | 2n-2 data | secondary block row]
//! row n+6         quiet
//! ```

use crate::models::{Point, Version};

/// Height of one cell row in cell units
pub const ROW_HEIGHT: f64 = 0.866_025_403_784_438_6;

/// Module value used for finder cells
pub const FINDER_COLOR: u8 = 1;

/// Cells in the primary finder block
pub const PRIMARY_BLOCK_LEN: usize = 25;

/// Cells in the secondary finder block
pub const SECONDARY_BLOCK_LEN: usize = 35;

/// Cells contributed by both finder blocks
pub const FINDER_CELLS: usize = PRIMARY_BLOCK_LEN + SECONDARY_BLOCK_LEN;

/// First and last rows of the primary block
const PRIMARY_FIRST_ROW: usize = 2;
const PRIMARY_LAST_ROW: usize = 6;

/// Rows of the primary block that are filled; the last row stays quiet
const PRIMARY_FILLED_ROWS: usize = 4;

/// Rows of the secondary block, one per closing row. A side-4 triangle with
/// its central cell cut out, framed by quiet cells.
const SECONDARY_PATTERN: [&[u8]; 5] = [
    &[0, 0, 0],
    &[0, 0, 1, 0, 0],
    &[0, 0, 1, 1, 1, 0, 0],
    &[0, 0, 1, 1, 0, 1, 1, 0, 0],
    &[0, 0, 1, 1, 1, 1, 1, 1, 1, 0, 0],
];

/// Position of one cell in the triangular grid
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PositionEntry {
    /// Column within the row, counted from the left edge
    pub radial_offset: usize,
    /// Row, counted from the apex
    pub ring_index: usize,
    /// 0 for an upward cell, 1 for a downward cell
    pub parity: u8,
}

impl PositionEntry {
    /// Cell at `(row, column)`
    pub fn new(ring_index: usize, radial_offset: usize) -> Self {
        Self {
            radial_offset,
            ring_index,
            parity: (radial_offset & 1) as u8,
        }
    }

    /// True for an upward pointing cell
    pub fn is_up(&self) -> bool {
        self.parity == 0
    }

    fn center_x(&self) -> f64 {
        (self.radial_offset as f64 - self.ring_index as f64) / 2.0
    }

    /// Cell vertices in canonical units
    pub fn vertices(&self) -> [Point; 3] {
        let x = self.center_x();
        let top = self.ring_index as f64 * ROW_HEIGHT;
        let bottom = top + ROW_HEIGHT;
        if self.is_up() {
            [
                Point::new(x, top),
                Point::new(x + 0.5, bottom),
                Point::new(x - 0.5, bottom),
            ]
        } else {
            [
                Point::new(x - 0.5, top),
                Point::new(x + 0.5, top),
                Point::new(x, bottom),
            ]
        }
    }

    /// Cell centroid in canonical units
    pub fn centroid(&self) -> Point {
        let offset = if self.is_up() { 2.0 / 3.0 } else { 1.0 / 3.0 };
        Point::new(
            self.center_x(),
            (self.ring_index as f64 + offset) * ROW_HEIGHT,
        )
    }
}

/// Cell layout of one tier, split into its three sections
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Layout {
    /// Tier this layout belongs to
    pub version: Version,
    /// Primary finder cells, paired with [`primary_block_values`]
    pub primary: Vec<PositionEntry>,
    /// Data cells in placement order
    pub data: Vec<PositionEntry>,
    /// Secondary finder cells, paired with [`secondary_block_values`]. In the
    /// smallest tier the first secondary cell is also the last primary cell;
    /// both blocks keep it quiet.
    pub secondary: Vec<PositionEntry>,
}

impl Layout {
    /// Build the layout for a tier
    pub fn new(version: Version) -> Self {
        let n = version.ring_count();

        let mut primary = Vec::with_capacity(PRIMARY_BLOCK_LEN);
        for r in PRIMARY_FIRST_ROW..=PRIMARY_LAST_ROW {
            for c in 2..=2 * r - 2 {
                primary.push(PositionEntry::new(r, c));
            }
        }

        let mut data = Vec::with_capacity(version.capacity());
        for r in PRIMARY_LAST_ROW + 1..=n {
            for c in 2..=2 * r - 2 {
                data.push(PositionEntry::new(r, c));
            }
        }
        for j in 0..SECONDARY_PATTERN.len() {
            let r = n + 1 + j;
            if r <= PRIMARY_LAST_ROW {
                // the smallest tier's first closing row is primary quiet zone
                continue;
            }
            for c in 2..2 * n {
                data.push(PositionEntry::new(r, c));
            }
        }

        let mut secondary = Vec::with_capacity(SECONDARY_BLOCK_LEN);
        for (j, row) in SECONDARY_PATTERN.iter().enumerate() {
            for p in 0..row.len() {
                secondary.push(PositionEntry::new(n + 1 + j, 2 * n + p));
            }
        }

        Self {
            version,
            primary,
            data,
            secondary,
        }
    }

    /// All entries: primary block, data, secondary block
    pub fn positions(&self) -> Vec<PositionEntry> {
        let mut out = Vec::with_capacity(self.data.len() + FINDER_CELLS);
        out.extend_from_slice(&self.primary);
        out.extend_from_slice(&self.data);
        out.extend_from_slice(&self.secondary);
        out
    }
}

/// Ordered cell positions for a tier: the 25 primary finder cells, the data
/// cells, then the 35 secondary finder cells.
pub fn positions_for(version: Version) -> Vec<PositionEntry> {
    Layout::new(version).positions()
}

/// Module values of the primary block
pub fn primary_block_values() -> [u8; PRIMARY_BLOCK_LEN] {
    let mut values = [0u8; PRIMARY_BLOCK_LEN];
    let filled: usize = (0..PRIMARY_FILLED_ROWS).map(|i| 2 * i + 1).sum();
    values[..filled].fill(FINDER_COLOR);
    values
}

/// Module values of the secondary block
pub fn secondary_block_values() -> [u8; SECONDARY_BLOCK_LEN] {
    let mut values = [0u8; SECONDARY_BLOCK_LEN];
    for (slot, &bit) in values
        .iter_mut()
        .zip(SECONDARY_PATTERN.iter().flat_map(|row| row.iter()))
    {
        *slot = bit * FINDER_COLOR;
    }
    values
}

/// Canonical centroid of the primary finder triangle
pub fn primary_centroid() -> Point {
    let apex_row = PRIMARY_FIRST_ROW as f64;
    Point::new(0.0, (apex_row + 8.0 / 3.0) * ROW_HEIGHT)
}

/// Canonical centroid of the secondary finder triangle. It lies exactly
/// `ring_count` cell units away from the primary centroid.
pub fn secondary_centroid(version: Version) -> Point {
    let n = version.ring_count() as f64;
    Point::new(n / 2.0, (n + 2.0 + 8.0 / 3.0) * ROW_HEIGHT)
}

/// Outer triangle of the whole symbol in canonical units
pub fn symbol_outline(version: Version) -> [Point; 3] {
    let rows = version.row_count() as f64;
    let bottom = rows * ROW_HEIGHT;
    [
        Point::new(0.0, 0.0),
        Point::new(rows / 2.0, bottom),
        Point::new(-rows / 2.0, bottom),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_length_matches_capacity_plus_finders() {
        for v in Version::all() {
            let layout = Layout::new(v);
            assert_eq!(layout.data.len(), v.capacity(), "tier {}", v);
            assert_eq!(layout.primary.len(), PRIMARY_BLOCK_LEN);
            assert_eq!(layout.secondary.len(), SECONDARY_BLOCK_LEN);
            assert_eq!(positions_for(v).len(), v.capacity() + FINDER_CELLS);
        }
    }

    #[test]
    fn test_deterministic() {
        for v in Version::all() {
            assert_eq!(positions_for(v), positions_for(v));
        }
    }

    #[test]
    fn test_positions_inside_grid() {
        for v in Version::all() {
            for p in positions_for(v) {
                assert!(p.ring_index < v.row_count());
                assert!(p.radial_offset <= 2 * p.ring_index);
                assert_eq!(p.parity as usize, p.radial_offset % 2);
            }
        }
    }

    #[test]
    fn test_data_never_overlaps_finders() {
        for v in Version::all() {
            let layout = Layout::new(v);
            let finders: HashSet<_> = layout
                .primary
                .iter()
                .chain(layout.secondary.iter())
                .copied()
                .collect();
            let data: HashSet<_> = layout.data.iter().copied().collect();
            assert_eq!(data.len(), layout.data.len());
            assert!(data.is_disjoint(&finders));
        }
    }

    #[test]
    fn test_finder_blocks_share_only_a_quiet_cell() {
        let primary_values = primary_block_values();
        let secondary_values = secondary_block_values();
        for v in Version::all() {
            let layout = Layout::new(v);
            let shared: Vec<_> = layout
                .primary
                .iter()
                .enumerate()
                .filter_map(|(i, p)| {
                    layout
                        .secondary
                        .iter()
                        .position(|s| s == p)
                        .map(|j| (*p, i, j))
                })
                .collect();
            if v == Version::MIN {
                assert_eq!(shared.len(), 1);
                let (cell, i, j) = shared[0];
                assert_eq!(cell, PositionEntry::new(6, 10));
                assert_eq!(primary_values[i], 0);
                assert_eq!(secondary_values[j], 0);
            } else {
                assert!(shared.is_empty(), "tier {} finder blocks overlap", v);
            }
        }
    }

    #[test]
    fn test_block_values() {
        let primary = primary_block_values();
        assert_eq!(primary.iter().filter(|&&b| b == FINDER_COLOR).count(), 16);
        assert!(primary[16..].iter().all(|&b| b == 0));

        let secondary = secondary_block_values();
        assert_eq!(secondary.iter().filter(|&&b| b == FINDER_COLOR).count(), 15);
    }

    #[test]
    fn test_finder_centroids_are_ring_count_apart() {
        for v in Version::all() {
            let d = primary_centroid().distance(&secondary_centroid(v));
            assert!((d - v.ring_count() as f64).abs() < 1e-9);
        }
    }

    #[test]
    fn test_primary_centroid_matches_filled_cells() {
        let layout = Layout::new(Version::MIN);
        let filled: Vec<Point> = layout
            .primary
            .iter()
            .zip(primary_block_values())
            .filter(|(_, v)| *v == FINDER_COLOR)
            .map(|(p, _)| p.centroid())
            .collect();
        let cx = filled.iter().map(|p| p.x).sum::<f64>() / filled.len() as f64;
        let cy = filled.iter().map(|p| p.y).sum::<f64>() / filled.len() as f64;
        let expected = primary_centroid();
        assert!((cx - expected.x).abs() < 1e-9);
        assert!((cy - expected.y).abs() < 1e-9);
    }

    #[test]
    fn test_cell_vertices_and_centroid() {
        let up = PositionEntry::new(3, 4);
        assert!(up.is_up());
        let v = up.vertices();
        let c = up.centroid();
        assert!(((v[0].x + v[1].x + v[2].x) / 3.0 - c.x).abs() < 1e-12);
        assert!(((v[0].y + v[1].y + v[2].y) / 3.0 - c.y).abs() < 1e-12);

        let down = PositionEntry::new(3, 5);
        assert!(!down.is_up());
        let v = down.vertices();
        let c = down.centroid();
        assert!(((v[0].y + v[1].y + v[2].y) / 3.0 - c.y).abs() < 1e-12);
    }
}
