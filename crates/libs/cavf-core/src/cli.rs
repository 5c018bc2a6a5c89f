//! Command line helpers shared by the cavf binaries.

use log::LevelFilter;
use std::time::{Duration, SystemTime};

/// Parses the arguments, returns the arguments and the launch time.
pub fn parse_args<T: clap::Parser>() -> (T, SystemTime) { (T::parse(), SystemTime::now()) }

/// Installs the logger.
///
/// Records are prefixed with the time elapsed since `start` when given.
/// `log_level` is the verbosity of the whole program, see
/// [`log_filter_from_level`].
pub fn setup_logging(start: Option<SystemTime>, log_level: u8) {
    use std::io::Write;
    env_logger::builder()
        .format(move |buf, record| {
            let crate_name = record
                .module_path()
                .and_then(|path| path.split("::").next())
                .unwrap_or("?");
            if let Some(start) = start {
                let elapsed = start.elapsed().unwrap_or_default();
                write!(buf, "{} ", elapsed_stamp(elapsed))?;
            }
            writeln!(
                buf,
                "{:5} [{}]: {}",
                record.level(),
                crate_name,
                record.args()
            )
        })
        .filter_level(log_filter_from_level(log_level))
        .init();
}

/// Formats a duration as `h:m:s.millis`.
pub fn elapsed_stamp(elapsed: Duration) -> String {
    let secs = elapsed.as_secs();
    format!(
        "{}:{}:{}.{:03}",
        secs / 3600,
        (secs / 60) % 60,
        secs % 60,
        elapsed.subsec_millis()
    )
}

/// Converts a log level to a log filter.
pub fn log_filter_from_level(level: u8) -> LevelFilter {
    match level {
        0 => LevelFilter::Error,
        1 => LevelFilter::Warn,
        2 => LevelFilter::Info,
        3 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    }
}

/// ANSI escape sequences used to decorate the terminal output.
pub mod ansi {
    /// Resets all attributes.
    pub const RESET: &str = "\u{001b}[0m";
    /// Bright cyan foreground.
    pub const BRIGHT_CYAN: &str = "\u{001b}[36m";
    /// Bright yellow foreground.
    pub const BRIGHT_YELLOW: &str = "\u{001b}[93m";
    /// Yellow `>` used as bullet point.
    pub const YELLOW_GT: &str = "\u{001b}[33m>\u{001b}[0m";
}
