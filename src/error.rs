//! Error taxonomy shared across the crate.
//!
//! One variant per `ErrorCode` in the original design: invalid arguments,
//! invalid configuration, unsupported formats, I/O failures, parse failures,
//! and timeouts. Record-level corruption is never represented here — it is a
//! counter increment, not an error (see `io::reader`).

use thiserror::Error;

#[derive(Debug, Error)]
pub enum AetherError {
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    #[error("invalid config: {0}")]
    InvalidConfig(String),

    #[error("unsupported format: {0}")]
    UnsupportedFormat(String),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("parse error: {0}")]
    Parse(String),

    #[error("timeout: {0}")]
    Timeout(String),
}

pub type Result<T> = std::result::Result<T, AetherError>;
