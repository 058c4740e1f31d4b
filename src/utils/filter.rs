/// Edge-preserving bilateral smoothing for grayscale images
use rayon::prelude::*;

/// Bilateral filter parameters
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BilateralParams {
    /// Neighborhood radius in pixels
    pub radius: usize,
    /// Gaussian sigma on intensity difference
    pub sigma_color: f64,
    /// Gaussian sigma on pixel distance
    pub sigma_space: f64,
}

impl Default for BilateralParams {
    fn default() -> Self {
        Self {
            radius: 5,
            sigma_color: 30.0,
            sigma_space: 15.0,
        }
    }
}

/// Precomputed weight tables for one parameter set
struct Kernel {
    radius: usize,
    size: usize,
    space: Vec<f64>,
    color: [f64; 256],
}

impl Kernel {
    fn new(params: &BilateralParams) -> Self {
        let radius = params.radius;
        let size = 2 * radius + 1;
        let r = radius as i64;

        let space_denom = 2.0 * params.sigma_space * params.sigma_space;
        let mut space = Vec::with_capacity(size * size);
        for dy in -r..=r {
            for dx in -r..=r {
                let dist = (dx * dx + dy * dy) as f64;
                space.push((-dist / space_denom).exp());
            }
        }

        let color_denom = 2.0 * params.sigma_color * params.sigma_color;
        let mut color = [0.0; 256];
        for (i, w) in color.iter_mut().enumerate() {
            let d = (i * i) as f64;
            *w = (-d / color_denom).exp();
        }

        Self {
            radius,
            size,
            space,
            color,
        }
    }

    /// Filter one output row; the neighborhood is clipped at the image border
    fn filter_row(&self, gray: &[u8], width: usize, height: usize, y: usize, row: &mut [u8]) {
        let y0 = y.saturating_sub(self.radius);
        let y1 = (y + self.radius).min(height - 1);

        for (x, out) in row.iter_mut().enumerate() {
            let x0 = x.saturating_sub(self.radius);
            let x1 = (x + self.radius).min(width - 1);
            let center = gray[y * width + x];

            let mut sum = 0.0;
            let mut total = 0.0;
            for ny in y0..=y1 {
                let krow = (ny + self.radius - y) * self.size;
                let row_start = ny * width;
                for nx in x0..=x1 {
                    let value = gray[row_start + nx];
                    let weight = self.space[krow + nx + self.radius - x]
                        * self.color[value.abs_diff(center) as usize];
                    sum += value as f64 * weight;
                    total += weight;
                }
            }

            // the center pixel always contributes weight 1
            *out = (sum / total).round().clamp(0.0, 255.0) as u8;
        }
    }
}

/// Bilateral filter over a row-major grayscale buffer
pub fn bilateral_filter(gray: &[u8], width: usize, height: usize, params: &BilateralParams) -> Vec<u8> {
    let mut output = vec![0u8; width * height];
    if width == 0 || height == 0 {
        return output;
    }
    let kernel = Kernel::new(params);

    for (y, row) in output.chunks_mut(width).enumerate() {
        kernel.filter_row(gray, width, height, y, row);
    }

    output
}

/// Bilateral filter with rows processed in parallel
pub fn bilateral_filter_parallel(
    gray: &[u8],
    width: usize,
    height: usize,
    params: &BilateralParams,
) -> Vec<u8> {
    let mut output = vec![0u8; width * height];
    if width == 0 || height == 0 {
        return output;
    }
    let kernel = Kernel::new(params);

    output.par_chunks_mut(width).enumerate().for_each(|(y, row)| {
        kernel.filter_row(gray, width, height, y, row);
    });

    output
}
