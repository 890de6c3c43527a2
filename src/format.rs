//! Output video format descriptors

use crate::frame::{RawVideoFrame, WriteFrame};
use crate::{Error, Result, ScanMode};
use std::str::FromStr;

/// Audio sample rate of every output format
pub const AUDIO_SAMPLE_RATE: u32 = 48000;

/// Interleaved audio channels of every output format
pub const AUDIO_CHANNELS: u32 = 2;

/// Output format the muxer synchronizes to
#[derive(Debug, Clone, Copy, PartialEq)]
#[repr(C)]
pub struct FormatDesc {
    /// Frame width in pixels
    pub width: u32,
    /// Frame height in pixels
    pub height: u32,
    /// Scan mode of output frames
    pub mode: ScanMode,
    /// Output frames per second
    pub fps: f64,
    /// Audio sample rate in Hz
    pub audio_sample_rate: u32,
    /// Interleaved audio channel count
    pub audio_channels: u32,
    /// Interleaved samples carried by one output frame
    pub audio_samples_per_frame: usize,
}

impl FormatDesc {
    /// Create a format running at `time_scale / duration` frames per second
    ///
    /// Samples per frame are rounded down per channel, so every frame holds
    /// whole interleaved sample groups. A zero `time_scale` or `duration`
    /// yields a descriptor that `validate()` rejects.
    pub fn new(width: u32, height: u32, mode: ScanMode, time_scale: u32, duration: u32) -> Self {
        let fps = if duration == 0 {
            0.0
        } else {
            time_scale as f64 / duration as f64
        };
        let per_channel = (AUDIO_SAMPLE_RATE as u64 * duration as u64)
            .checked_div(time_scale as u64)
            .unwrap_or(0);
        let audio_samples_per_frame = (per_channel * AUDIO_CHANNELS as u64) as usize;

        Self {
            width,
            height,
            mode,
            fps,
            audio_sample_rate: AUDIO_SAMPLE_RATE,
            audio_channels: AUDIO_CHANNELS,
            audio_samples_per_frame,
        }
    }

    /// Override the number of audio samples per output frame
    pub fn with_audio_samples_per_frame(mut self, samples: usize) -> Self {
        self.audio_samples_per_frame = samples;
        self
    }

    /// Validate the descriptor
    pub fn validate(&self) -> Result<()> {
        if self.width == 0 || self.height == 0 {
            return Err(Error::InvalidInput(format!(
                "Format dimensions must be non-zero: {}x{}",
                self.width, self.height
            )));
        }
        if !(self.fps.is_finite() && self.fps > 0.0) {
            return Err(Error::InvalidInput(format!(
                "Format frame rate must be positive: {}",
                self.fps
            )));
        }
        if self.audio_samples_per_frame == 0 {
            return Err(Error::InvalidInput(
                "Format must carry at least one audio sample per frame".to_string(),
            ));
        }
        let channels = self.audio_channels.max(1) as usize;
        if self.audio_samples_per_frame % channels != 0 {
            return Err(Error::InvalidInput(format!(
                "Audio samples per frame ({}) must be a multiple of the channel count ({})",
                self.audio_samples_per_frame, self.audio_channels
            )));
        }
        Ok(())
    }
}

/// Standard broadcast formats
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(C)]
pub enum VideoFormat {
    Pal = 0,
    Ntsc = 1,
    X576p2500 = 2,
    X720p5000 = 3,
    X720p5994 = 4,
    X720p6000 = 5,
    X1080i5000 = 6,
    X1080i5994 = 7,
    X1080i6000 = 8,
    X1080p2500 = 9,
    X1080p2997 = 10,
    X1080p3000 = 11,
    X1080p5000 = 12,
    X1080p5994 = 13,
    X1080p6000 = 14,
}

impl VideoFormat {
    /// All known formats
    pub const ALL: [VideoFormat; 15] = [
        VideoFormat::Pal,
        VideoFormat::Ntsc,
        VideoFormat::X576p2500,
        VideoFormat::X720p5000,
        VideoFormat::X720p5994,
        VideoFormat::X720p6000,
        VideoFormat::X1080i5000,
        VideoFormat::X1080i5994,
        VideoFormat::X1080i6000,
        VideoFormat::X1080p2500,
        VideoFormat::X1080p2997,
        VideoFormat::X1080p3000,
        VideoFormat::X1080p5000,
        VideoFormat::X1080p5994,
        VideoFormat::X1080p6000,
    ];

    /// Format name as used in configuration files
    pub fn name(&self) -> &'static str {
        match self {
            VideoFormat::Pal => "PAL",
            VideoFormat::Ntsc => "NTSC",
            VideoFormat::X576p2500 => "576p2500",
            VideoFormat::X720p5000 => "720p5000",
            VideoFormat::X720p5994 => "720p5994",
            VideoFormat::X720p6000 => "720p6000",
            VideoFormat::X1080i5000 => "1080i5000",
            VideoFormat::X1080i5994 => "1080i5994",
            VideoFormat::X1080i6000 => "1080i6000",
            VideoFormat::X1080p2500 => "1080p2500",
            VideoFormat::X1080p2997 => "1080p2997",
            VideoFormat::X1080p3000 => "1080p3000",
            VideoFormat::X1080p5000 => "1080p5000",
            VideoFormat::X1080p5994 => "1080p5994",
            VideoFormat::X1080p6000 => "1080p6000",
        }
    }
}

impl From<VideoFormat> for FormatDesc {
    fn from(format: VideoFormat) -> Self {
        use ScanMode::*;
        match format {
            VideoFormat::Pal => FormatDesc::new(720, 576, Upper, 25, 1),
            VideoFormat::Ntsc => FormatDesc::new(720, 486, Lower, 30000, 1001),
            VideoFormat::X576p2500 => FormatDesc::new(720, 576, Progressive, 25, 1),
            VideoFormat::X720p5000 => FormatDesc::new(1280, 720, Progressive, 50, 1),
            VideoFormat::X720p5994 => FormatDesc::new(1280, 720, Progressive, 60000, 1001),
            VideoFormat::X720p6000 => FormatDesc::new(1280, 720, Progressive, 60, 1),
            VideoFormat::X1080i5000 => FormatDesc::new(1920, 1080, Upper, 25, 1),
            VideoFormat::X1080i5994 => FormatDesc::new(1920, 1080, Upper, 30000, 1001),
            VideoFormat::X1080i6000 => FormatDesc::new(1920, 1080, Upper, 30, 1),
            VideoFormat::X1080p2500 => FormatDesc::new(1920, 1080, Progressive, 25, 1),
            VideoFormat::X1080p2997 => FormatDesc::new(1920, 1080, Progressive, 30000, 1001),
            VideoFormat::X1080p3000 => FormatDesc::new(1920, 1080, Progressive, 30, 1),
            VideoFormat::X1080p5000 => FormatDesc::new(1920, 1080, Progressive, 50, 1),
            VideoFormat::X1080p5994 => FormatDesc::new(1920, 1080, Progressive, 60000, 1001),
            VideoFormat::X1080p6000 => FormatDesc::new(1920, 1080, Progressive, 60, 1),
        }
    }
}

impl FromStr for VideoFormat {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        VideoFormat::ALL
            .into_iter()
            .find(|format| format.name().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| Error::InvalidInput(format!("Unknown video format: {}", s)))
    }
}

/// Source of the output format and of internal frame units
pub trait FrameFactory: Send {
    /// Output format frames are synchronized to
    fn format_desc(&self) -> FormatDesc;

    /// Wrap decoded content into a muxer frame unit
    fn create_frame(&self, frame: RawVideoFrame) -> WriteFrame {
        WriteFrame::from(frame)
    }
}

impl FrameFactory for FormatDesc {
    fn format_desc(&self) -> FormatDesc {
        *self
    }
}
