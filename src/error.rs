//! Error types for framemux

use crate::ScanMode;
use thiserror::Error;

/// Result type alias for framemux operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for framemux operations
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    /// Invalid input parameter
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// No conversion exists between the input and output rate/scan combination
    #[error(
        "Unsupported conversion: {in_mode} @ {in_fps:.3} fps -> {out_mode} @ {out_fps:.3} fps"
    )]
    UnsupportedConversion {
        in_mode: ScanMode,
        in_fps: f64,
        out_mode: ScanMode,
        out_fps: f64,
    },

    /// Filter parameter or transform error
    #[error("Filter error: {0}")]
    Filter(String),
}

/// Error code for FFI
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(C)]
pub enum ErrorCode {
    /// Success
    Ok = 0,
    /// Invalid input parameter
    InvalidInput = 1,
    /// Rate/scan combination has no supported conversion
    UnsupportedConversion = 2,
    /// Filter error
    FilterError = 3,
    /// Output queue is empty
    Empty = 4,
}

impl From<&Error> for ErrorCode {
    fn from(err: &Error) -> Self {
        match err {
            Error::InvalidInput(_) => ErrorCode::InvalidInput,
            Error::UnsupportedConversion { .. } => ErrorCode::UnsupportedConversion,
            Error::Filter(_) => ErrorCode::FilterError,
        }
    }
}
