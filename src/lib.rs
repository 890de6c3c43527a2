//! framemux - Frame-rate and field-order synchronizing muxer
//!
//! This library sits between a media decoder and a compositor:
//! - decoded video frames and raw audio samples are pushed independently
//! - a display mode is detected from the input and output rates and scan modes
//! - composite frames (video + exactly one frame of audio) are popped in order

pub mod display_mode;
pub mod error;
pub mod ffi;
pub mod field_order;
pub mod filter;
pub mod format;
pub mod frame;
pub mod muxer;

pub use display_mode::DisplayMode;
pub use error::{Error, Result};
pub use format::{FormatDesc, FrameFactory, VideoFormat};
pub use frame::{CompositeFrame, FieldLayout, RawVideoFrame, WriteFrame};
pub use muxer::{AudioInput, FrameMuxer, MuxerConfig, VideoInput};

use std::fmt;

/// Scan mode of a frame or an output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(C)]
pub enum ScanMode {
    /// Full frames
    Progressive = 0,
    /// Interlaced, upper (even) field first
    Upper = 1,
    /// Interlaced, lower (odd) field first
    Lower = 2,
}

impl ScanMode {
    /// Check if the mode carries two fields
    pub fn is_interlaced(&self) -> bool {
        !matches!(self, ScanMode::Progressive)
    }
}

impl fmt::Display for ScanMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ScanMode::Progressive => "progressive",
            ScanMode::Upper => "upper",
            ScanMode::Lower => "lower",
        };
        f.write_str(name)
    }
}
