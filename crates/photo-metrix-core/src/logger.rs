//! Logging setup shared by the library crates and the `photo-metrix` binary.
//!
//! The library crates only emit `log` records. Binaries pick a sink:
//! [`init_with_level`] writes one line per record to stderr, for example
//!
//! ```text
//!    12.4ms  WARN engine: reference points coincide, skipping reference calibration
//! ```
//!
//! and, with the `tracing` feature, [`init_tracing`] installs a `tracing`
//! subscriber instead.

use std::io::Write;
use std::sync::OnceLock;
use std::time::Instant;

use log::{LevelFilter, Log, Metadata, Record};

#[cfg(feature = "tracing")]
use tracing_subscriber::fmt::format::FmtSpan;
#[cfg(feature = "tracing")]
use tracing_subscriber::util::SubscriberInitExt;
#[cfg(feature = "tracing")]
use tracing_subscriber::{fmt, EnvFilter};

struct StderrLogger {
    level: LevelFilter,
    started: Instant,
}

/// Last path segment of a module target (`photo_metrix_estimate::engine` -> `engine`).
fn short_target(target: &str) -> &str {
    target.rsplit("::").next().unwrap_or(target)
}

fn format_line(elapsed_ms: f64, record: &Record) -> String {
    format!(
        "{elapsed_ms:>8.1}ms {:>5} {}: {}",
        record.level(),
        short_target(record.target()),
        record.args()
    )
}

impl Log for StderrLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.level
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }
        let elapsed_ms = self.started.elapsed().as_secs_f64() * 1e3;
        let line = format_line(elapsed_ms, record);
        let _ = writeln!(std::io::stderr().lock(), "{line}");
    }

    fn flush(&self) {
        let _ = std::io::stderr().flush();
    }
}

static LOGGER: OnceLock<StderrLogger> = OnceLock::new();

/// Route `log` records at or above `level` to stderr.
///
/// Only the first call installs the logger; later calls return `Ok(())`
/// and keep the original level.
pub fn init_with_level(level: LevelFilter) -> Result<(), log::SetLoggerError> {
    if LOGGER.get().is_some() {
        return Ok(());
    }
    let logger = LOGGER.get_or_init(|| StderrLogger {
        level,
        started: Instant::now(),
    });
    log::set_logger(logger)?;
    log::set_max_level(level);
    Ok(())
}

/// Filter used when `RUST_LOG` is unset or unparsable.
#[cfg(feature = "tracing")]
fn fallback_filter(default_level: LevelFilter) -> EnvFilter {
    EnvFilter::new(default_level.as_str().to_ascii_lowercase())
}

/// Install a `tracing` fmt subscriber on stderr.
///
/// `RUST_LOG` wins when set; otherwise events at `default_level` and above
/// are shown. `json` switches to flattened JSON lines.
#[cfg(feature = "tracing")]
pub fn init_tracing(json: bool, default_level: LevelFilter) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| fallback_filter(default_level));
    let builder = fmt()
        .with_env_filter(filter)
        .with_span_events(FmtSpan::CLOSE)
        .with_writer(std::io::stderr);
    if json {
        let _ = builder.json().flatten_event(true).finish().try_init();
    } else {
        let _ = builder
            .with_timer(fmt::time::Uptime::default())
            .finish()
            .try_init();
    }
}
