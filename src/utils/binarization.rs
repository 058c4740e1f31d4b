use crate::models::BitMatrix;

/// Default global threshold; darker pixels are ink
pub const DEFAULT_THRESHOLD: u8 = 128;

/// Simple global threshold binarization
/// Returns a BitMatrix where true = ink (gray < threshold)
pub fn threshold_binarize(gray: &[u8], width: usize, height: usize, threshold: u8) -> BitMatrix {
    let mut binary = BitMatrix::new(width, height);

    for y in 0..height {
        for x in 0..width {
            let idx = y * width + x;
            binary.set(x, y, gray[idx] < threshold);
        }
    }

    binary
}

/// Binarize at the default threshold
pub fn binarize(gray: &[u8], width: usize, height: usize) -> BitMatrix {
    threshold_binarize(gray, width, height, DEFAULT_THRESHOLD)
}

/// Render a binary matrix back to grayscale: ink as 0, background as 255
pub fn binarize_inverse(binary: &BitMatrix) -> Vec<u8> {
    let (width, height) = (binary.width(), binary.height());
    let mut gray = Vec::with_capacity(width * height);
    for y in 0..height {
        for x in 0..width {
            gray.push(if binary.get(x, y) { 0 } else { 255 });
        }
    }
    gray
}
