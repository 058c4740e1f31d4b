/// Luma conversion: Y = round(0.299*R + 0.587*G + 0.114*B)
/// Computed in fixed point as (299*R + 587*G + 114*B + 500) / 1000
use rayon::prelude::*;

const COEF_R: u32 = 299;
const COEF_G: u32 = 587;
const COEF_B: u32 = 114;

#[inline]
fn luma(r: u8, g: u8, b: u8) -> u8 {
    let sum = COEF_R * r as u32 + COEF_G * g as u32 + COEF_B * b as u32;
    ((sum + 500) / 1000).min(255) as u8
}

fn to_grayscale(pixels: &[u8], width: usize, height: usize, channels: usize) -> Vec<u8> {
    pixels
        .chunks_exact(channels)
        .take(width * height)
        .map(|px| luma(px[0], px[1], px[2]))
        .collect()
}

fn to_grayscale_parallel(pixels: &[u8], width: usize, height: usize, channels: usize) -> Vec<u8> {
    let mut gray = vec![0u8; width * height];
    if width == 0 {
        return gray;
    }

    // Process rows in parallel
    gray.par_chunks_mut(width).enumerate().for_each(|(y, row)| {
        let row_start = y * width * channels;
        for (x, out) in row.iter_mut().enumerate() {
            let idx = row_start + x * channels;
            *out = luma(pixels[idx], pixels[idx + 1], pixels[idx + 2]);
        }
    });

    gray
}

/// Convert RGB image to grayscale
pub fn rgb_to_grayscale(rgb: &[u8], width: usize, height: usize) -> Vec<u8> {
    to_grayscale(rgb, width, height, 3)
}

/// Convert RGBA image to grayscale (ignores alpha channel)
pub fn rgba_to_grayscale(rgba: &[u8], width: usize, height: usize) -> Vec<u8> {
    to_grayscale(rgba, width, height, 4)
}

/// Convert RGB to grayscale using parallel processing
/// Processes rows in parallel for multi-core speedup
pub fn rgb_to_grayscale_parallel(rgb: &[u8], width: usize, height: usize) -> Vec<u8> {
    to_grayscale_parallel(rgb, width, height, 3)
}

/// Convert RGBA to grayscale using parallel processing
pub fn rgba_to_grayscale_parallel(rgba: &[u8], width: usize, height: usize) -> Vec<u8> {
    to_grayscale_parallel(rgba, width, height, 4)
}
