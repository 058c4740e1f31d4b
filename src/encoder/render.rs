/// Rendering adapters for encoded symbols
use image::{Rgba, RgbaImage};
use std::fmt::Write;

use super::EncodedSymbol;
use crate::models::Point;

/// Render the symbol as an SVG document. Quiet (index 0) cells are left to
/// the white background.
pub fn to_svg(symbol: &EncodedSymbol) -> String {
    let width = symbol.size;
    let height = symbol.height();
    let mut svg = String::with_capacity(symbol.cells.len() * 96);

    // writing into a String cannot fail
    let _ = write!(
        svg,
        r#"<svg xmlns="http://www.w3.org/2000/svg" width="{w:.2}" height="{h:.2}" viewBox="0 0 {w:.2} {h:.2}" shape-rendering="crispEdges">"#,
        w = width,
        h = height
    );
    let _ = write!(
        svg,
        r##"<rect width="100%" height="100%" fill="#ffffff"/>"##
    );

    for cell in symbol.cells.iter().filter(|c| c.color_index != 0) {
        let [r, g, b] = symbol.depth.color(cell.color_index);
        let [p0, p1, p2] = cell.points;
        let _ = write!(
            svg,
            r##"<polygon points="{:.2},{:.2} {:.2},{:.2} {:.2},{:.2}" fill="#{:02x}{:02x}{:02x}" stroke="#{:02x}{:02x}{:02x}" stroke-width="0.5"/>"##,
            p0.x, p0.y, p1.x, p1.y, p2.x, p2.y, r, g, b, r, g, b
        );
    }

    svg.push_str("</svg>");
    svg
}

/// Rasterize the symbol onto a white canvas with `margin` pixels of quiet
/// space on every side. One output unit is one pixel.
pub fn rasterize(symbol: &EncodedSymbol, margin: u32) -> RgbaImage {
    let width = symbol.size.ceil() as u32 + 2 * margin;
    let height = symbol.height().ceil() as u32 + 2 * margin;
    let mut img = RgbaImage::from_pixel(width, height, Rgba([255, 255, 255, 255]));
    let offset = margin as f64;

    for cell in symbol.cells.iter().filter(|c| c.color_index != 0) {
        let [r, g, b] = symbol.depth.color(cell.color_index);
        let pts = cell.points.map(|p| p.translate(offset, offset));
        fill_triangle(&mut img, &pts, Rgba([r, g, b, 255]));
    }

    img
}

fn edge(a: &Point, b: &Point, p: &Point) -> f64 {
    (b.x - a.x) * (p.y - a.y) - (b.y - a.y) * (p.x - a.x)
}

/// Fill pixels whose centers fall inside the triangle
fn fill_triangle(img: &mut RgbaImage, pts: &[Point; 3], color: Rgba<u8>) {
    let area = edge(&pts[0], &pts[1], &pts[2]);
    if area.abs() < f64::EPSILON {
        return;
    }

    let min_x = pts.iter().map(|p| p.x).fold(f64::INFINITY, f64::min).floor().max(0.0) as u32;
    let min_y = pts.iter().map(|p| p.y).fold(f64::INFINITY, f64::min).floor().max(0.0) as u32;
    let max_x = (pts.iter().map(|p| p.x).fold(f64::NEG_INFINITY, f64::max).ceil() as u32)
        .min(img.width());
    let max_y = (pts.iter().map(|p| p.y).fold(f64::NEG_INFINITY, f64::max).ceil() as u32)
        .min(img.height());

    let eps = 1e-9;
    for y in min_y..max_y {
        for x in min_x..max_x {
            let p = Point::new(x as f64 + 0.5, y as f64 + 0.5);
            let w0 = edge(&pts[1], &pts[2], &p) / area;
            let w1 = edge(&pts[2], &pts[0], &p) / area;
            let w2 = edge(&pts[0], &pts[1], &p) / area;
            if w0 >= -eps && w1 >= -eps && w2 >= -eps {
                img.put_pixel(x, y, color);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::encoder::{EncodeOptions, Encoder};
    use crate::models::BitDepth;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn symbol() -> EncodedSymbol {
        let mut rng = StdRng::seed_from_u64(1);
        let options = EncodeOptions {
            depth: BitDepth::Two,
            size: 240.0,
        };
        Encoder::encode_with_rng("svg", &options, &mut rng).unwrap()
    }

    #[test]
    fn test_svg_has_one_polygon_per_inked_cell() {
        let symbol = symbol();
        let svg = to_svg(&symbol);
        let inked = symbol.cells.iter().filter(|c| c.color_index != 0).count();
        assert!(svg.starts_with("<svg"));
        assert!(svg.ends_with("</svg>"));
        assert_eq!(svg.matches("<polygon").count(), inked);
        assert!(svg.contains("#0000ff"));
    }

    #[test]
    fn test_rasterize_dimensions_and_margin() {
        let symbol = symbol();
        let img = rasterize(&symbol, 10);
        assert_eq!(img.width(), 260);
        assert_eq!(img.height(), (240.0 * crate::layout::ROW_HEIGHT).ceil() as u32 + 20);
        assert_eq!(img.get_pixel(0, 0), &Rgba([255, 255, 255, 255]));
        assert_eq!(img.get_pixel(5, img.height() - 5), &Rgba([255, 255, 255, 255]));
    }

    #[test]
    fn test_rasterize_paints_primary_finder() {
        let symbol = symbol();
        let img = rasterize(&symbol, 0);
        let c = symbol.to_output(crate::layout::primary_centroid());
        let px = img.get_pixel(c.x as u32, c.y as u32);
        assert_eq!(px, &Rgba([0, 0, 255, 255]));
    }
}
