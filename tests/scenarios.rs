use rand::SeedableRng;
use rand::rngs::StdRng;
use tricode::decoder::bitstream::BitUnpacker;
use tricode::detector::finder::{FinderType, check_corners};
use tricode::encoder::render::rasterize;
use tricode::models::BitMatrix;
use tricode::pipeline::{ImageView, find_triangles, preprocess};
use tricode::utils::binarization::{binarize, binarize_inverse};
use tricode::{BitDepth, DecodeConfig, EncodeOptions, EncodedSymbol, Error, SignMode, Version};

fn encode_small(text: &str, depth: BitDepth, seed: u64) -> EncodedSymbol {
    let options = EncodeOptions {
        depth,
        size: 24.0 * Version::MIN.row_count() as f64,
    };
    let mut rng = StdRng::seed_from_u64(seed);
    tricode::encode_with_rng(text, &options, &mut rng).unwrap()
}

fn rgba(symbol: &EncodedSymbol) -> (Vec<u8>, usize, usize) {
    let img = rasterize(symbol, 30);
    let (w, h) = (img.width() as usize, img.height() as usize);
    (img.into_raw(), w, h)
}

#[test]
fn test_numeric_123_at_three_bits() {
    let symbol = encode_small("123", BitDepth::Three, 1);
    assert_eq!(symbol.mode, SignMode::Numeric);
    assert_eq!(symbol.version, Version::MIN);
    // 00 | 0000000011 | 0001111011, zero padded to 24 bits
    assert_eq!(&symbol.data_modules()[..8], &[0, 0, 0, 3, 0, 7, 5, 4]);

    let (pixels, w, h) = rgba(&symbol);
    let decoded = tricode::decode(&pixels, w, h).unwrap().unwrap();
    assert_eq!(decoded.content(), "123");
    assert_eq!(decoded.payload.mode, SignMode::Numeric);
    assert_eq!(decoded.depth, BitDepth::Three);
}

#[test]
fn test_text_a_at_one_bit() {
    let symbol = encode_small("A", BitDepth::One, 2);
    assert_eq!(symbol.mode, SignMode::Text);
    let expected: Vec<u8> = "010100000100000000".bytes().map(|b| b - b'0').collect();
    assert_eq!(&symbol.data_modules()[..18], expected.as_slice());

    let (pixels, w, h) = rgba(&symbol);
    let decoded = tricode::decode(&pixels, w, h).unwrap().unwrap();
    assert_eq!(decoded.content(), "A");
    assert_eq!(decoded.depth, BitDepth::One);
    assert_eq!(&decoded.payload.bits[..18], expected.as_slice());
}

#[test]
fn test_rgb_input_decodes() {
    let symbol = encode_small("rgb", BitDepth::Two, 4);
    let (pixels, w, h) = rgba(&symbol);
    let rgb: Vec<u8> = pixels
        .chunks_exact(4)
        .flat_map(|px| [px[0], px[1], px[2]])
        .collect();
    let decoded = tricode::decode_rgb(&rgb, w, h).unwrap().unwrap();
    assert_eq!(decoded.content(), "rgb");
}

#[test]
fn test_capacity_boundaries() {
    // 2 + 10 + 6 digits in 20 bits = 32 bits, exactly the smallest tier
    let exact = tricode::encode("123456", BitDepth::One).unwrap();
    assert_eq!(exact.version, Version::MIN);
    assert_eq!(exact.payload_modules, Version::MIN.capacity());

    let over = tricode::encode("1234567", BitDepth::One).unwrap();
    assert_eq!(over.version, Version::from_index(1).unwrap());

    // 2 + 706 * 8 + 8 = 5658 bits = 1886 three-bit modules
    let full = "a".repeat(706);
    let largest = tricode::encode(&full, BitDepth::Three).unwrap();
    assert_eq!(largest.version, Version::MAX);
    assert_eq!(largest.payload_modules, Version::MAX.capacity());

    let too_big = "a".repeat(707);
    assert_eq!(
        tricode::encode(&too_big, BitDepth::Three),
        Err(Error::CapacityExceeded {
            needed: 1889,
            max: 1886
        })
    );
}

#[test]
fn test_unpack_failures() {
    // sign 11
    assert_eq!(
        BitUnpacker::unpack(&[1, 1, 0, 0], BitDepth::One),
        Err(Error::UnknownSignMode(0b11))
    );
    // text without terminator
    let mut unterminated = vec![0, 1];
    unterminated.extend([0, 1, 0, 0, 0, 0, 0, 1]);
    assert!(matches!(
        BitUnpacker::unpack(&unterminated, BitDepth::One),
        Err(Error::CorruptPayload(_))
    ));
    // numeric length larger than the digits present
    let mut short = vec![0, 0];
    short.extend([0, 0, 0, 0, 0, 0, 1, 1, 1, 1]);
    short.extend([0, 0, 0, 1]);
    assert!(matches!(
        BitUnpacker::unpack(&short, BitDepth::One),
        Err(Error::CorruptPayload(_))
    ));
}

#[test]
fn test_finder_classification_ignores_corner_order() {
    let symbol = encode_small("order", BitDepth::One, 6);
    let (pixels, w, h) = rgba(&symbol);
    let view = ImageView::new(&pixels, 4, w, h).unwrap();
    let config = DecodeConfig::default();
    let pre = preprocess(&view, &config);
    let (triangles, report) = find_triangles(&pre.binary, &config);
    assert!(report.primaries >= 1);
    assert!(report.secondaries >= 1);

    for t in triangles.iter().filter(|t| t.kind != FinderType::Rejected) {
        let [a, b, c] = t.corners;
        for order in [[a, b, c], [b, c, a], [c, a, b], [c, b, a]] {
            let again = check_corners(&pre.binary, &order, &config.probe);
            assert_eq!(again.kind, t.kind);
        }
    }
}

#[test]
fn test_binarize_inverse_roundtrip() {
    let mut m = BitMatrix::new(9, 7);
    for y in 0..7 {
        for x in 0..9 {
            m.set(x, y, (x * 3 + y * 5) % 4 == 0);
        }
    }
    let gray = binarize_inverse(&m);
    assert_eq!(binarize(&gray, 9, 7), m);
}

#[test]
fn test_decode_noise_image_finds_nothing() {
    let mut rng = StdRng::seed_from_u64(99);
    let pixels: Vec<u8> = (0..64 * 64 * 4)
        .map(|_| rand::Rng::gen_range(&mut rng, 0..=255u8))
        .collect();
    let result = tricode::decode(&pixels, 64, 64);
    assert!(!matches!(result, Ok(Some(_))));
}

#[test]
fn test_decode_binary_noise_finishes() {
    // black/white speckle yields thousands of ragged regions and corner candidates
    let (w, h) = (320usize, 240usize);
    let mut rng = StdRng::seed_from_u64(7);
    let pixels: Vec<u8> = (0..w * h)
        .flat_map(|_| {
            let v = if rand::Rng::gen_bool(&mut rng, 0.5) { 0 } else { 255 };
            [v, v, v, 255]
        })
        .collect();
    let result = tricode::decode(&pixels, w, h);
    assert!(!matches!(result, Ok(Some(_))));
}
