/// An RGB palette entry
pub type Rgb = [u8; 3];

const WHITE: Rgb = [255, 255, 255];
const BLACK: Rgb = [0, 0, 0];
const RED: Rgb = [255, 0, 0];
const GREEN: Rgb = [0, 255, 0];
const BLUE: Rgb = [0, 0, 255];
const YELLOW: Rgb = [255, 255, 0];
const CYAN: Rgb = [0, 255, 255];
const MAGENTA: Rgb = [255, 0, 255];

const PALETTE_2: [Rgb; 2] = [WHITE, BLACK];
const PALETTE_4: [Rgb; 4] = [WHITE, BLUE, GREEN, RED];
const PALETTE_8: [Rgb; 8] = [WHITE, RED, GREEN, BLUE, YELLOW, CYAN, MAGENTA, BLACK];

/// Bits carried by one module, with its color palette
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum BitDepth {
    /// Two colors: white, black
    One,
    /// Four colors: white, blue, green, red
    Two,
    /// Eight colors: white, red, green, blue, yellow, cyan, magenta, black
    #[default]
    Three,
}

impl BitDepth {
    /// Depth from a bits-per-cell count
    pub fn from_bits(bits: u8) -> Option<Self> {
        match bits {
            1 => Some(BitDepth::One),
            2 => Some(BitDepth::Two),
            3 => Some(BitDepth::Three),
            _ => None,
        }
    }

    /// Bits per module
    pub fn bits(&self) -> usize {
        match self {
            BitDepth::One => 1,
            BitDepth::Two => 2,
            BitDepth::Three => 3,
        }
    }

    /// Number of distinct module colors
    pub fn color_count(&self) -> usize {
        1 << self.bits()
    }

    /// Palette indexed by module value
    pub fn palette(&self) -> &'static [Rgb] {
        match self {
            BitDepth::One => &PALETTE_2,
            BitDepth::Two => &PALETTE_4,
            BitDepth::Three => &PALETTE_8,
        }
    }

    /// RGB for a module value; out-of-range values wrap
    pub fn color(&self, index: u8) -> Rgb {
        let palette = self.palette();
        palette[index as usize % palette.len()]
    }

    /// Nearest palette index for a pixel
    pub fn classify(&self, rgb: Rgb) -> u8 {
        nearest(self.palette(), rgb)
    }

    /// Depth announced by the primary finder's color, given as an index into
    /// the eight-color palette. Finder cells always use module value 1, which
    /// is red, blue or black depending on depth.
    pub fn from_finder_color(index8: u8) -> Self {
        match index8 {
            1 => BitDepth::Three,
            3 => BitDepth::Two,
            _ => BitDepth::One,
        }
    }

    /// Nearest color in the eight-color palette
    pub fn classify_wide(rgb: Rgb) -> u8 {
        nearest(&PALETTE_8, rgb)
    }
}

fn nearest(palette: &[Rgb], rgb: Rgb) -> u8 {
    let mut best = 0usize;
    let mut best_distance = u32::MAX;
    for (i, c) in palette.iter().enumerate() {
        let d: u32 = c
            .iter()
            .zip(rgb.iter())
            .map(|(&a, &b)| {
                let diff = a as i32 - b as i32;
                (diff * diff) as u32
            })
            .sum();
        if d < best_distance {
            best_distance = d;
            best = i;
        }
    }
    best as u8
}
