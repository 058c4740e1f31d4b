//! Utility functions for image processing
//!
//! This module provides helper functions for symbol detection:
//! - Grayscale conversion (RGB/RGBA to luminance)
//! - Bilateral smoothing (edge-preserving denoise)
//! - Binarization (global threshold)
//! - Geometry (vectors, angles, centroids)

pub mod binarization;
pub mod filter;
pub mod geometry;
pub mod grayscale;
