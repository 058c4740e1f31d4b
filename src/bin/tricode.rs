use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::time::Instant;
use tricode::tools::{inspect, load_rgba, save_symbol};
use tricode::{BitDepth, Decoder, EncodeOptions, Encoder, ImageView};

#[derive(Parser)]
#[command(name = "tricode", version, about = "Triangular color symbol tools")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Encode text into a PNG or SVG symbol
    Encode {
        #[arg(long)]
        text: String,
        /// Bits per cell: 1, 2 or 3
        #[arg(long, default_value_t = 3)]
        bits: u8,
        /// Width of the symbol's bottom edge in pixels
        #[arg(long, default_value_t = 500.0)]
        size: f64,
        /// Quiet margin around raster output in pixels
        #[arg(long, default_value_t = 20)]
        margin: u32,
        /// Output path; the extension picks the format
        #[arg(long)]
        out: PathBuf,
    },
    /// Decode a symbol from an image file
    Decode {
        #[arg(long)]
        image: PathBuf,
    },
    /// Print per-stage candidate counts for an image
    Inspect {
        #[arg(long)]
        image: PathBuf,
    },
}

fn main() -> ExitCode {
    tricode::debug::init_from_env();
    let cli = Cli::parse();

    let ok = match cli.command {
        Command::Encode {
            text,
            bits,
            size,
            margin,
            out,
        } => encode_cmd(&text, bits, size, margin, &out),
        Command::Decode { image } => decode_cmd(&image),
        Command::Inspect { image } => inspect_cmd(&image),
    };
    if ok { ExitCode::SUCCESS } else { ExitCode::FAILURE }
}

fn encode_cmd(text: &str, bits: u8, size: f64, margin: u32, out: &Path) -> bool {
    let Some(depth) = BitDepth::from_bits(bits) else {
        eprintln!("Unsupported bit depth {} (expected 1, 2 or 3)", bits);
        return false;
    };
    let options = EncodeOptions { depth, size };
    let symbol = match Encoder::encode(text, &options) {
        Ok(symbol) => symbol,
        Err(err) => {
            eprintln!("Encode failed: {}", err);
            return false;
        }
    };
    if let Err(err) = save_symbol(&symbol, out, margin) {
        eprintln!("Failed to write {}: {}", out.display(), err);
        return false;
    }
    println!(
        "Wrote {}: tier {} ({} rings), {:?} mode, {} of {} data cells used",
        out.display(),
        symbol.version,
        symbol.version.ring_count(),
        symbol.mode,
        symbol.payload_modules,
        symbol.version.capacity()
    );
    true
}

fn decode_cmd(image: &Path) -> bool {
    let (pixels, width, height) = match load_rgba(image) {
        Ok(result) => result,
        Err(err) => {
            eprintln!("Failed to load image {}: {}", image.display(), err);
            return false;
        }
    };
    println!("Image: {} ({}x{})", image.display(), width, height);

    let start = Instant::now();
    let result = Decoder::from_env().decode_rgba(&pixels, width, height);
    let elapsed = start.elapsed();

    match result {
        Ok(Some(decoded)) => {
            println!(
                "Decoded tier {} depth {:?} in {:.1} ms",
                decoded.version,
                decoded.depth,
                elapsed.as_secs_f64() * 1000.0
            );
            if decoded.finder_mismatches > 0 {
                println!("  finder cells off-pattern: {}", decoded.finder_mismatches);
            }
            println!("{}", decoded.content());
            true
        }
        Ok(None) => {
            println!("No symbol found");
            false
        }
        Err(err) => {
            eprintln!("Decode failed: {}", err);
            false
        }
    }
}

fn inspect_cmd(image: &Path) -> bool {
    let (pixels, width, height) = match load_rgba(image) {
        Ok(result) => result,
        Err(err) => {
            eprintln!("Failed to load image {}: {}", image.display(), err);
            return false;
        }
    };
    let view = match ImageView::new(&pixels, 4, width, height) {
        Ok(view) => view,
        Err(err) => {
            eprintln!("{}", err);
            return false;
        }
    };

    let config = tricode::DecodeConfig::from_env();
    let report = inspect(&view, &config);
    println!("Image: {} ({}x{})", image.display(), width, height);
    println!(
        "Smoothed range: {}-{}, average: {}",
        report.gray.min, report.gray.max, report.gray.avg
    );
    println!(
        "Binary: ink_pixels={} total={} ink_ratio={:.2}%",
        report.binary.ink_pixels,
        report.binary.total_pixels,
        report.binary.ink_ratio * 100.0
    );
    let s = report.stages;
    println!("Regions: {}", s.regions);
    println!("Contours: {}", s.contours);
    println!("Three-corner contours: {}", s.cornered);
    println!("Triangles: {}", s.triangles);
    println!("Finders: primary={} secondary={}", s.primaries, s.secondaries);
    true
}
