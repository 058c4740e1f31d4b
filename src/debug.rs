use log::{Level, LevelFilter, Log, Metadata, Record};
use std::sync::OnceLock;

static DEBUG_LEVEL: OnceLock<Option<LevelFilter>> = OnceLock::new();

/// Level requested through `TRICODE_DEBUG`: unset means off, `trace` enables
/// per-region detail, anything else enables debug output.
pub fn debug_level() -> Option<LevelFilter> {
    *DEBUG_LEVEL.get_or_init(|| {
        std::env::var("TRICODE_DEBUG")
            .ok()
            .map(|v| parse_level(&v))
    })
}

fn parse_level(value: &str) -> LevelFilter {
    match value.trim().to_ascii_lowercase().as_str() {
        "trace" => LevelFilter::Trace,
        "0" | "off" => LevelFilter::Off,
        _ => LevelFilter::Debug,
    }
}

struct StderrLogger;

impl Log for StderrLogger {
    fn enabled(&self, metadata: &Metadata<'_>) -> bool {
        metadata.level() <= log::max_level()
    }

    fn log(&self, record: &Record<'_>) {
        if !self.enabled(record.metadata()) {
            return;
        }
        let tag = match record.level() {
            Level::Error => "ERROR",
            Level::Warn => "WARN",
            Level::Info => "INFO",
            Level::Debug => "DEBUG",
            Level::Trace => "TRACE",
        };
        eprintln!("{}: [{}] {}", tag, record.target(), record.args());
    }

    fn flush(&self) {}
}

static LOGGER: StderrLogger = StderrLogger;

/// Install the stderr logger when `TRICODE_DEBUG` is set. Returns whether
/// a logger was installed. The library itself never calls this.
pub fn init_from_env() -> bool {
    let Some(level) = debug_level() else {
        return false;
    };
    if log::set_logger(&LOGGER).is_err() {
        return false;
    }
    log::set_max_level(level);
    true
}
