//! Symbol decoding modules
//!
//! This module contains the logic for reading a symbol once its finders are
//! located:
//! - Affine frame recovery and tier estimation
//! - Module sampling with a median vote
//! - Bit unpacking and payload mode decoding

/// Module values to payload
pub mod bitstream;
pub mod config;
/// Payload mode codecs (numeric, text)
pub mod modes;
/// Local basis from the finder pair
pub mod rectify;
/// Grid mapping and color sampling
pub mod sampler;
