//! tricode - triangular color symbology
//!
//! A pure Rust encoder and camera-tolerant decoder for triangular symbols
//! built from colored up/down triangle cells. Each symbol carries a solid
//! primary finder at its apex and a hollow secondary finder at its lower
//! right corner; the finder color announces the bit depth (1, 2 or 3 bits
//! per cell).

#![warn(missing_docs)]
#![allow(clippy::missing_docs_in_private_items)]

/// Env-gated stderr logger for the CLI and debugging sessions
pub mod debug;
/// Symbol decoding modules (rectification, sampling, payload modes)
pub mod decoder;
/// Shape detection modules (regions, contours, corners, finders)
pub mod detector;
/// Payload packing, cell placement and rendering adapters
pub mod encoder;
/// Crate error type
pub mod error;
/// Cell grid of each tier
pub mod layout;
/// Core data structures (BitMatrix, Point, Version, BitDepth, Payload)
pub mod models;
/// Decode stages and their orchestration
pub mod pipeline;
/// Frame gating and batch decoding
pub mod scan;
/// Image file helpers shared by the CLI, tests and benches
pub mod tools;
/// Utility functions (grayscale, smoothing, binarization, geometry)
pub mod utils;

pub use decoder::config::DecodeConfig;
pub use encoder::{EncodeOptions, EncodedSymbol, Encoder, TriangleCell};
pub use error::{Error, Result};
pub use models::{BitDepth, BitMatrix, Payload, Point, SignMode, Version};
pub use pipeline::{Decoded, ImageView};

use rand::Rng;

/// Encode `text` at the given bit depth with the default output size
///
/// # Arguments
/// * `text` - Payload; digit-only strings use the compact numeric mode
/// * `depth` - Bits carried by each cell
///
/// # Returns
/// The smallest tier that fits, with module values and renderable cells.
/// Text containing NUL is rejected with [`Error::InvalidText`] since NUL ends
/// a text payload.
pub fn encode(text: &str, depth: BitDepth) -> Result<EncodedSymbol> {
    Encoder::encode(text, &EncodeOptions::with_depth(depth))
}

/// Encode with caller supplied randomness for the padding cells
pub fn encode_with_rng<R: Rng + ?Sized>(
    text: &str,
    options: &EncodeOptions,
    rng: &mut R,
) -> Result<EncodedSymbol> {
    Encoder::encode_with_rng(text, options, rng)
}

/// Decode a symbol from an RGBA image
///
/// # Arguments
/// * `image` - Raw RGBA bytes (4 bytes per pixel)
/// * `width` - Image width in pixels
/// * `height` - Image height in pixels
///
/// # Returns
/// `Ok(None)` when no symbol is present, `Err` when the buffer is malformed
/// or a located symbol's payload does not validate
pub fn decode(image: &[u8], width: usize, height: usize) -> Result<Option<Decoded>> {
    Decoder::new().decode_rgba(image, width, height)
}

/// Decode a symbol from an RGB image (3 bytes per pixel)
pub fn decode_rgb(image: &[u8], width: usize, height: usize) -> Result<Option<Decoded>> {
    Decoder::new().decode_rgb(image, width, height)
}

/// Reusable decoder holding a pipeline configuration
#[derive(Debug, Clone, Default)]
pub struct Decoder {
    config: DecodeConfig,
}

impl Decoder {
    /// Decoder with default settings
    pub fn new() -> Self {
        Self::default()
    }

    /// Decoder with `TRICODE_*` environment overrides applied
    pub fn from_env() -> Self {
        Self::with_config(DecodeConfig::from_env())
    }

    /// Decoder with explicit settings
    pub fn with_config(config: DecodeConfig) -> Self {
        Self { config }
    }

    /// Active settings
    pub fn config(&self) -> &DecodeConfig {
        &self.config
    }

    /// Decode from an RGBA buffer
    pub fn decode_rgba(&self, image: &[u8], width: usize, height: usize) -> Result<Option<Decoded>> {
        let view = ImageView::new(image, 4, width, height)?;
        self.decode_view(&view)
    }

    /// Decode from an RGB buffer
    pub fn decode_rgb(&self, image: &[u8], width: usize, height: usize) -> Result<Option<Decoded>> {
        let view = ImageView::new(image, 3, width, height)?;
        self.decode_view(&view)
    }

    /// Decode from a checked view
    pub fn decode_view(&self, view: &ImageView<'_>) -> Result<Option<Decoded>> {
        scan::decode_frame(view, &self.config)
    }
}
