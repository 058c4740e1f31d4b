//! Symbol encoder
//!
//! Payload text is packed into a bitstream, regrouped into module values for
//! the chosen [`BitDepth`], padded to the tier's capacity with random colors
//! and placed on the grid through [`Layout`]. Drawing is left to the caller;
//! [`render`] provides SVG and raster adapters.

pub mod bitstream;
pub mod render;

use rand::Rng;

use crate::error::{Error, Result};
use crate::layout::{self, Layout, PositionEntry, ROW_HEIGHT};
use crate::models::{BitDepth, Point, SignMode, Version};
use bitstream::{group_modules, payload_bits};

/// Encoder settings
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EncodeOptions {
    /// Bits carried per module
    pub depth: BitDepth,
    /// Width of the symbol's bottom edge in output units
    pub size: f64,
}

impl Default for EncodeOptions {
    fn default() -> Self {
        Self {
            depth: BitDepth::Three,
            size: 500.0,
        }
    }
}

impl EncodeOptions {
    /// Options with the given depth and default size
    pub fn with_depth(depth: BitDepth) -> Self {
        Self {
            depth,
            ..Self::default()
        }
    }
}

/// A colored triangle ready to hand to a renderer
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TriangleCell {
    /// Vertices in output units
    pub points: [Point; 3],
    /// Palette index of the fill color
    pub color_index: u8,
}

/// Result of encoding one payload
#[derive(Debug, Clone, PartialEq)]
pub struct EncodedSymbol {
    /// Selected tier
    pub version: Version,
    /// Bits per module
    pub depth: BitDepth,
    /// Payload mode
    pub mode: SignMode,
    /// Bottom edge width in output units
    pub size: f64,
    /// Modules carrying payload before random padding
    pub payload_modules: usize,
    /// Module values in layout order (primary block, data, secondary block)
    pub modules: Vec<u8>,
    /// Layout position of every module
    pub positions: Vec<PositionEntry>,
    /// Renderable cells, one per module
    pub cells: Vec<TriangleCell>,
}

impl EncodedSymbol {
    /// Data modules, padding included
    pub fn data_modules(&self) -> &[u8] {
        let start = layout::PRIMARY_BLOCK_LEN;
        &self.modules[start..start + self.version.capacity()]
    }

    /// Output units per cell side
    pub fn cell_size(&self) -> f64 {
        self.size / self.version.row_count() as f64
    }

    /// Symbol height in output units
    pub fn height(&self) -> f64 {
        self.size * ROW_HEIGHT
    }

    /// Map a canonical layout point into output units
    pub fn to_output(&self, p: Point) -> Point {
        let one = self.cell_size();
        Point::new(self.size / 2.0 + p.x * one, p.y * one)
    }

    /// Outer triangle of the symbol in output units
    pub fn outline(&self) -> [Point; 3] {
        layout::symbol_outline(self.version).map(|p| self.to_output(p))
    }
}

/// Symbol encoder
pub struct Encoder;

impl Encoder {
    /// Encode with thread-local randomness for the padding
    pub fn encode(input: &str, options: &EncodeOptions) -> Result<EncodedSymbol> {
        Self::encode_with_rng(input, options, &mut rand::thread_rng())
    }

    /// Encode with caller supplied randomness for the padding
    pub fn encode_with_rng<R: Rng + ?Sized>(
        input: &str,
        options: &EncodeOptions,
        rng: &mut R,
    ) -> Result<EncodedSymbol> {
        // NUL terminates text mode on the wire
        if input.contains('\0') {
            return Err(Error::InvalidText("text contains NUL"));
        }
        let depth = options.depth;
        let (mode, bits) = payload_bits(input);
        let mut data = group_modules(&bits, depth);
        let payload_modules = data.len();

        let version = Version::required_for(payload_modules)?;
        log::debug!(
            "encoding {} bits as {} modules in tier {} ({:?})",
            bits.len(),
            payload_modules,
            version,
            depth
        );

        let colors = depth.color_count() as u8;
        while data.len() < version.capacity() {
            data.push(rng.gen_range(0..colors));
        }

        let layout = Layout::new(version);
        let mut modules = Vec::with_capacity(data.len() + layout::FINDER_CELLS);
        modules.extend_from_slice(&layout::primary_block_values());
        modules.extend_from_slice(&data);
        modules.extend_from_slice(&layout::secondary_block_values());
        let positions = layout.positions();

        let mut symbol = EncodedSymbol {
            version,
            depth,
            mode,
            size: options.size,
            payload_modules,
            modules,
            positions,
            cells: Vec::new(),
        };
        symbol.cells = symbol
            .positions
            .iter()
            .zip(symbol.modules.iter())
            .map(|(p, &color_index)| TriangleCell {
                points: p.vertices().map(|v| symbol.to_output(v)),
                color_index,
            })
            .collect();

        Ok(symbol)
    }
}
