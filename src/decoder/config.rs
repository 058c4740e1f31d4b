use crate::detector::corners::CornerParams;
use crate::detector::finder::ProbeParams;
use crate::utils::binarization::DEFAULT_THRESHOLD;
use crate::utils::filter::BilateralParams;

fn parse_env_usize(name: &str, default: usize) -> usize {
    std::env::var(name)
        .ok()
        .and_then(|v| v.trim().parse::<usize>().ok())
        .unwrap_or(default)
}

fn parse_env_u8(name: &str, default: u8) -> u8 {
    std::env::var(name)
        .ok()
        .and_then(|v| v.trim().parse::<u8>().ok())
        .unwrap_or(default)
}

fn parse_env_f64(name: &str, default: f64) -> f64 {
    std::env::var(name)
        .ok()
        .and_then(|v| v.trim().parse::<f64>().ok())
        .filter(|v| v.is_finite())
        .unwrap_or(default)
}

fn parse_env_bool_u8(name: &str, default: bool) -> bool {
    std::env::var(name)
        .ok()
        .and_then(|v| v.trim().parse::<u8>().ok())
        .map(|v| v != 0)
        .unwrap_or(default)
}

/// Tunables of the decode pipeline
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DecodeConfig {
    /// Bilateral smoothing
    pub filter: BilateralParams,
    /// Gray values below this are ink
    pub threshold: u8,
    /// Contours shorter than this are noise
    pub min_contour_len: usize,
    /// Corner detection and clustering
    pub corners: CornerParams,
    /// Triangle gate and finder probing
    pub probe: ProbeParams,
    /// Side of the square median vote window
    pub sample_window: usize,
    /// Accepted primary/secondary side ratio range
    pub finder_side_ratio: (f64, f64),
    /// Use the row-parallel preprocessing variants
    pub parallel: bool,
}

impl Default for DecodeConfig {
    fn default() -> Self {
        Self {
            filter: BilateralParams::default(),
            threshold: DEFAULT_THRESHOLD,
            min_contour_len: 20,
            corners: CornerParams::default(),
            probe: ProbeParams::default(),
            sample_window: 5,
            finder_side_ratio: (0.8, 1.25),
            parallel: false,
        }
    }
}

impl DecodeConfig {
    /// Defaults overlaid with `TRICODE_*` environment variables. Unparseable
    /// values fall back to the default.
    pub fn from_env() -> Self {
        let d = Self::default();
        Self {
            filter: BilateralParams {
                radius: parse_env_usize("TRICODE_FILTER_RADIUS", d.filter.radius).min(15),
                sigma_color: parse_env_f64("TRICODE_SIGMA_COLOR", d.filter.sigma_color),
                sigma_space: parse_env_f64("TRICODE_SIGMA_SPACE", d.filter.sigma_space),
            },
            threshold: parse_env_u8("TRICODE_THRESHOLD", d.threshold),
            min_contour_len: parse_env_usize("TRICODE_MIN_CONTOUR", d.min_contour_len),
            corners: CornerParams {
                window: parse_env_usize("TRICODE_CORNER_WINDOW", d.corners.window).max(1),
                min_angle_deg: d.corners.min_angle_deg,
                max_angle_deg: d.corners.max_angle_deg,
                eps: parse_env_f64("TRICODE_DBSCAN_EPS", d.corners.eps),
                min_points: parse_env_usize("TRICODE_DBSCAN_MIN", d.corners.min_points).max(1),
            },
            probe: ProbeParams {
                max_side_ratio: parse_env_f64("TRICODE_SIDE_RATIO", d.probe.max_side_ratio),
                ..d.probe
            },
            sample_window: parse_env_usize("TRICODE_SAMPLE_WINDOW", d.sample_window).clamp(1, 15),
            finder_side_ratio: d.finder_side_ratio,
            parallel: parse_env_bool_u8("TRICODE_PARALLEL", d.parallel),
        }
    }
}
