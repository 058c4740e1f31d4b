use crate::error::{Error, Result};

/// Number of capacity tiers
pub const TIER_COUNT: usize = 8;

/// Data modules per tier. Ring count `n` gives `(n-1)^2 + 10n - 35` from
/// `n = 10` on; the smallest tier shares its first closing row with the
/// primary finder block.
const CAPACITY: [usize; TIER_COUNT] = [32, 146, 311, 526, 791, 1106, 1471, 1886];

/// Symbol version, one of eight fixed capacity tiers
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Version(u8);

impl Version {
    /// Smallest tier
    pub const MIN: Version = Version(0);
    /// Largest tier
    pub const MAX: Version = Version(TIER_COUNT as u8 - 1);

    /// Tier by zero-based index
    pub fn from_index(index: usize) -> Option<Self> {
        (index < TIER_COUNT).then_some(Version(index as u8))
    }

    /// Tier whose ring count is exactly `rings`
    pub fn from_ring_count(rings: usize) -> Option<Self> {
        if rings == 0 || rings % 5 != 0 {
            return None;
        }
        Self::from_index(rings / 5 - 1)
    }

    /// Tier whose bottom-row width (its printed label) is `label`
    pub fn from_label(label: usize) -> Option<Self> {
        Self::all().find(|v| v.label() == label)
    }

    /// All tiers in ascending order
    pub fn all() -> impl Iterator<Item = Version> {
        (0..TIER_COUNT as u8).map(Version)
    }

    /// Zero-based tier index
    pub fn index(&self) -> usize {
        self.0 as usize
    }

    /// Linear ring count: 5, 10, ..., 40
    pub fn ring_count(&self) -> usize {
        5 * (self.index() + 1)
    }

    /// Maximum number of data modules
    pub fn capacity(&self) -> usize {
        CAPACITY[self.index()]
    }

    /// Number of cell rows in the grid
    pub fn row_count(&self) -> usize {
        self.ring_count() + 7
    }

    /// Cells in the bottom row, used as the human-facing version label
    pub fn label(&self) -> usize {
        2 * self.ring_count() + 13
    }

    /// Smallest tier holding `modules` data modules
    pub fn required_for(modules: usize) -> Result<Self> {
        Self::all()
            .find(|v| v.capacity() >= modules)
            .ok_or(Error::CapacityExceeded {
                needed: modules,
                max: Self::MAX.capacity(),
            })
    }
}

impl std::fmt::Display for Version {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "T{}", self.label())
    }
}
