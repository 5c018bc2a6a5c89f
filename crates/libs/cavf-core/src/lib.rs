//! # cavf-core
//! Core library for cavf.
//! Contains the error type, the math helpers and the logging utilities shared
//! by the cavf crates.
#![warn(missing_docs)]

#[cfg(feature = "cli")]
pub mod cli;
pub mod error;
pub mod math;

/// Utility functions.
pub mod utils {
    use chrono::{DateTime, Local};

    /// Returns the current time as an ISO 8601 (RFC 3339) timestamp.
    pub fn iso_timestamp() -> String {
        chrono::Local::now().to_rfc3339_opts(chrono::SecondsFormat::Micros, false)
    }

    /// Returns the current time as an ISO 8601 (RFC 3339) timestamp without the
    /// timezone and the colon in the time field.
    pub fn iso_timestamp_short(datetime: DateTime<Local>) -> String {
        datetime.format("%Y-%m-%dT%H-%M-%S").to_string()
    }
}
