//! Display mode detection
//!
//! Maps an input rate and scan mode onto the output format and picks the
//! conversion the muxer has to apply.

use crate::format::FormatDesc;
use crate::{Error, Result, ScanMode};
use std::fmt;

/// Rates closer than this are treated as equal
pub const FPS_EPSILON: f64 = 2.0;

/// Conversion applied between input frames and output frames
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DisplayMode {
    /// One input frame per output frame
    Simple,
    /// Every input frame is shown twice
    Duplicate,
    /// Every second input frame is dropped
    Half,
    /// Two progressive input frames are woven into one interlaced frame
    Interlace,
    /// Each field becomes its own progressive frame
    DeinterlaceBob,
    /// Bob deinterlace, then weave back into interlaced output
    DeinterlaceBobReinterlace,
    /// Interlaced input shown as progressive at the same rate
    Deinterlace,
    /// No conversion exists
    Invalid,
}

/// Draining strategy shared by one or more display modes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Strategy {
    Simple,
    Duplicate,
    Half,
    Interlace,
}

impl DisplayMode {
    /// Draining strategy for this mode, `None` for `Invalid`
    pub fn strategy(&self) -> Option<Strategy> {
        match self {
            DisplayMode::Simple | DisplayMode::Deinterlace | DisplayMode::DeinterlaceBob => {
                Some(Strategy::Simple)
            }
            DisplayMode::Duplicate => Some(Strategy::Duplicate),
            DisplayMode::Half => Some(Strategy::Half),
            DisplayMode::Interlace | DisplayMode::DeinterlaceBobReinterlace => {
                Some(Strategy::Interlace)
            }
            DisplayMode::Invalid => None,
        }
    }

    /// Filter parameters the deinterlacer is configured with
    pub fn filter_params(&self) -> &'static str {
        match self {
            DisplayMode::Deinterlace => "YADIF=0:-1",
            DisplayMode::DeinterlaceBob | DisplayMode::DeinterlaceBobReinterlace => "YADIF=1:-1",
            DisplayMode::Simple
            | DisplayMode::Duplicate
            | DisplayMode::Half
            | DisplayMode::Interlace
            | DisplayMode::Invalid => "",
        }
    }
}

impl fmt::Display for DisplayMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            DisplayMode::Simple => "simple",
            DisplayMode::Duplicate => "duplicate",
            DisplayMode::Half => "half",
            DisplayMode::Interlace => "interlace",
            DisplayMode::DeinterlaceBob => "deinterlace_bob",
            DisplayMode::DeinterlaceBobReinterlace => "deinterlace_bob_reinterlace",
            DisplayMode::Deinterlace => "deinterlace",
            DisplayMode::Invalid => "invalid",
        };
        f.write_str(name)
    }
}

/// Pick the display mode for an input/output rate and scan mode combination
pub fn get_display_mode(
    in_mode: ScanMode,
    in_fps: f64,
    out_mode: ScanMode,
    out_fps: f64,
) -> DisplayMode {
    if (in_fps - out_fps).abs() < FPS_EPSILON {
        if in_mode.is_interlaced() && !out_mode.is_interlaced() {
            DisplayMode::Deinterlace
        } else {
            DisplayMode::Simple
        }
    } else if (in_fps / 2.0 - out_fps).abs() < FPS_EPSILON {
        if in_mode.is_interlaced() {
            return DisplayMode::Invalid;
        }

        if out_mode.is_interlaced() {
            DisplayMode::Interlace
        } else {
            DisplayMode::Half
        }
    } else if (in_fps - out_fps / 2.0).abs() < FPS_EPSILON {
        if out_mode.is_interlaced() {
            return DisplayMode::Invalid;
        }

        if in_mode.is_interlaced() {
            DisplayMode::DeinterlaceBob
        } else {
            DisplayMode::Duplicate
        }
    } else {
        DisplayMode::Invalid
    }
}

/// Detect the display mode for the first frame of a stream
///
/// Interlaced input going to interlaced output at a different height will be
/// scaled downstream, which breaks the field structure. Those frames are bob
/// deinterlaced and woven back together instead of passed through.
pub fn detect(
    in_mode: ScanMode,
    in_fps: f64,
    in_height: u32,
    format: &FormatDesc,
) -> DisplayMode {
    let mode = get_display_mode(in_mode, in_fps, format.mode, format.fps);

    if mode == DisplayMode::Simple
        && in_mode.is_interlaced()
        && format.mode.is_interlaced()
        && in_height != format.height
    {
        return DisplayMode::DeinterlaceBobReinterlace;
    }

    mode
}

/// Detect the display mode, rejecting combinations without a conversion
pub fn resolve(
    in_mode: ScanMode,
    in_fps: f64,
    in_height: u32,
    format: &FormatDesc,
) -> Result<DisplayMode> {
    match detect(in_mode, in_fps, in_height, format) {
        DisplayMode::Invalid => Err(Error::UnsupportedConversion {
            in_mode,
            in_fps,
            out_mode: format.mode,
            out_fps: format.fps,
        }),
        mode => Ok(mode),
    }
}
