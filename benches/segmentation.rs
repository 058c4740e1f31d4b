use criterion::{Criterion, black_box, criterion_group, criterion_main};
use rand::SeedableRng;
use rand::rngs::StdRng;
use tricode::detector::connected_components::connected_regions;
use tricode::encoder::render::rasterize;
use tricode::pipeline::{ImageView, find_triangles, preprocess};
use tricode::{BitDepth, BitMatrix, DecodeConfig, EncodeOptions, encode_with_rng};

fn symbol_binary() -> BitMatrix {
    let options = EncodeOptions {
        depth: BitDepth::One,
        size: 480.0,
    };
    let mut rng = StdRng::seed_from_u64(7);
    let symbol = match encode_with_rng("segmentation bench", &options, &mut rng) {
        Ok(symbol) => symbol,
        Err(err) => panic!("encode failed: {}", err),
    };
    let img = rasterize(&symbol, 30);
    let (w, h) = (img.width() as usize, img.height() as usize);
    let pixels = img.into_raw();
    let view = match ImageView::new(&pixels, 4, w, h) {
        Ok(view) => view,
        Err(err) => panic!("bad view: {}", err),
    };
    preprocess(&view, &DecodeConfig::default()).binary
}

fn bench_connected_regions(c: &mut Criterion) {
    let binary = symbol_binary();
    c.bench_function("connected_regions_symbol", |b| {
        b.iter(|| connected_regions(black_box(&binary)))
    });
}

fn bench_find_triangles(c: &mut Criterion) {
    let binary = symbol_binary();
    let config = DecodeConfig::default();
    c.bench_function("find_triangles_symbol", |b| {
        b.iter(|| find_triangles(black_box(&binary), &config))
    });
}

criterion_group!(benches, bench_connected_regions, bench_find_triangles);
criterion_main!(benches);
