//! Video/audio frame muxer
//!
//! Video frames and audio samples arrive independently. Each push appends to
//! the tail segment of its channel and then tries to drain one output unit.
//! Draining pairs the front video segment with the front audio segment
//! according to the display mode detected on the first real frame.

mod segment;
mod strategy;

use segment::Segments;

use crate::display_mode::{self, DisplayMode};
use crate::field_order;
use crate::filter::{create_filter, Filter, FilterFactory, Passthrough};
use crate::format::{FormatDesc, FrameFactory};
use crate::frame::{CompositeFrame, RawVideoFrame, WriteFrame};
use crate::{Error, Result};
use std::collections::VecDeque;
use tracing::{debug, info, warn};

/// Muxer configuration
#[derive(Debug, Clone, Default)]
pub struct MuxerConfig {
    /// Detect the display mode from the input and output formats.
    /// When disabled every stream is muxed frame for frame.
    pub auto_mode: bool,
}

impl MuxerConfig {
    pub fn with_auto_mode(mut self, auto_mode: bool) -> Self {
        self.auto_mode = auto_mode;
        self
    }
}

/// Input on the video channel
#[derive(Debug, Clone, PartialEq)]
pub enum VideoInput {
    /// Decoded frame
    Frame(RawVideoFrame),
    /// Placeholder unit without pixel content
    Flush,
    /// The current video stream ended
    EndOfStream,
}

impl From<RawVideoFrame> for VideoInput {
    fn from(frame: RawVideoFrame) -> Self {
        VideoInput::Frame(frame)
    }
}

/// Input on the audio channel
#[derive(Debug, Clone, PartialEq)]
pub enum AudioInput {
    /// Interleaved samples
    Samples(Vec<i16>),
    /// The current audio stream ended
    EndOfStream,
}

impl From<Vec<i16>> for AudioInput {
    fn from(samples: Vec<i16>) -> Self {
        AudioInput::Samples(samples)
    }
}

/// Synchronizes decoded video and audio into composite output frames
pub struct FrameMuxer {
    video_streams: Segments<VecDeque<WriteFrame>>,
    audio_streams: Segments<Vec<i16>>,
    frame_buffer: VecDeque<CompositeFrame>,
    display_mode: Option<DisplayMode>,
    resolve_error: Option<Error>,
    in_fps: f64,
    format_desc: FormatDesc,
    config: MuxerConfig,

    video_frame_count: usize,
    audio_sample_count: usize,
    processed_video_frame_count: usize,
    processed_audio_sample_count: usize,

    filter: Box<dyn Filter>,
    filter_factory: FilterFactory,
    frame_factory: Box<dyn FrameFactory>,
}

impl FrameMuxer {
    /// Create a muxer for a stream decoded at `in_fps`
    pub fn new<F>(in_fps: f64, frame_factory: F, config: MuxerConfig) -> Result<Self>
    where
        F: FrameFactory + 'static,
    {
        if !(in_fps.is_finite() && in_fps > 0.0) {
            return Err(Error::InvalidInput(format!(
                "Input frame rate must be positive: {}",
                in_fps
            )));
        }

        let format_desc = frame_factory.format_desc();
        format_desc.validate()?;

        Ok(Self {
            video_streams: Segments::new(),
            audio_streams: Segments::new(),
            frame_buffer: VecDeque::new(),
            display_mode: None,
            resolve_error: None,
            in_fps,
            format_desc,
            config,
            video_frame_count: 0,
            audio_sample_count: 0,
            processed_video_frame_count: 0,
            processed_audio_sample_count: 0,
            filter: Box::new(Passthrough),
            filter_factory: Box::new(create_filter),
            frame_factory: Box::new(frame_factory),
        })
    }

    /// Replace the built-in deinterlacer
    ///
    /// The factory receives the filter parameters selected for the detected
    /// display mode, e.g. `YADIF=1:-1`.
    pub fn with_filter_factory<F>(mut self, factory: F) -> Self
    where
        F: Fn(&str) -> Result<Box<dyn Filter>> + Send + 'static,
    {
        self.filter_factory = Box::new(factory);
        self
    }

    /// Push a video frame or a video channel marker
    ///
    /// Fails when the first real frame reveals a rate/scan combination that
    /// cannot be converted to the output format. Later frames and flush
    /// markers keep failing with the same error; end markers are always
    /// accepted.
    pub fn push_video(&mut self, input: impl Into<VideoInput>) -> Result<()> {
        let frame = match input.into() {
            VideoInput::EndOfStream => {
                debug!(
                    video_frame_count = self.video_frame_count,
                    "frame_muxer: video stream ended"
                );
                self.video_frame_count = 0;
                self.video_streams.begin();
                return Ok(());
            }
            VideoInput::Flush => return self.push_placeholder(),
            VideoInput::Frame(frame) if frame.is_placeholder() => {
                return self.push_placeholder()
            }
            VideoInput::Frame(frame) => frame,
        };

        if self.display_mode.is_none() {
            self.resolve(&frame)?;
        }
        if let Some(err) = &self.resolve_error {
            return Err(err.clone());
        }

        let target = self.format_desc.mode;
        for raw in self.filter.execute(frame)? {
            let mut frame = self.frame_factory.create_frame(raw);
            field_order::correct(&mut frame, target);

            self.video_streams.back_mut().push_back(frame);
            self.video_frame_count += 1;

            self.put_frames();
        }

        Ok(())
    }

    /// Push audio samples or an audio channel end marker
    pub fn push_audio(&mut self, input: impl Into<AudioInput>) {
        match input.into() {
            AudioInput::EndOfStream => {
                debug!(
                    audio_chunk_count =
                        self.audio_sample_count / self.format_desc.audio_samples_per_frame,
                    "frame_muxer: audio stream ended"
                );
                self.audio_sample_count = 0;
                self.audio_streams.begin();
            }
            AudioInput::Samples(samples) => {
                self.audio_sample_count += samples.len();
                self.audio_streams.back_mut().extend(samples);
                self.put_frames();
            }
        }
    }

    /// Remove the oldest composite frame
    pub fn pop(&mut self) -> Option<CompositeFrame> {
        self.frame_buffer.pop_front()
    }

    /// Number of composite frames waiting to be popped
    pub fn size(&self) -> usize {
        self.frame_buffer.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frame_buffer.is_empty()
    }

    /// Video is buffered ahead and not a stream switch behind audio
    pub fn video_ready(&self) -> bool {
        self.video_streams.back().len() > 1
            && self.video_streams.count() >= self.audio_streams.count()
    }

    /// Audio is buffered ahead and not a stream switch behind video
    pub fn audio_ready(&self) -> bool {
        self.audio_streams.back().len() / self.format_desc.audio_samples_per_frame > 1
            && self.audio_streams.count() >= self.video_streams.count()
    }

    /// Display mode detected on the first frame, if any
    pub fn display_mode(&self) -> Option<DisplayMode> {
        self.display_mode
    }

    pub fn format_desc(&self) -> &FormatDesc {
        &self.format_desc
    }

    pub fn in_fps(&self) -> f64 {
        self.in_fps
    }

    /// Composite frames emitted since creation
    pub fn processed_frames(&self) -> usize {
        self.processed_video_frame_count
    }

    /// Audio samples emitted since creation
    pub fn processed_samples(&self) -> usize {
        self.processed_audio_sample_count
    }

    /// Number of queued (video, audio) segments
    pub fn segment_counts(&self) -> (usize, usize) {
        (self.video_streams.count(), self.audio_streams.count())
    }

    fn push_placeholder(&mut self) -> Result<()> {
        if let Some(err) = &self.resolve_error {
            return Err(err.clone());
        }

        self.video_streams.back_mut().push_back(WriteFrame::empty());
        self.video_frame_count += 1;
        self.put_frames();
        Ok(())
    }

    fn resolve(&mut self, frame: &RawVideoFrame) -> Result<()> {
        let mode = if self.config.auto_mode {
            display_mode::detect(frame.mode, self.in_fps, frame.height, &self.format_desc)
        } else {
            DisplayMode::Simple
        };

        let params = mode.filter_params();
        if !params.is_empty() {
            self.filter = (self.filter_factory)(params)?;
        }

        info!(
            display_mode = %mode,
            in_mode = %frame.mode,
            in_fps = self.in_fps,
            out_mode = %self.format_desc.mode,
            out_fps = self.format_desc.fps,
            "frame_muxer: {}",
            mode
        );

        if mode == DisplayMode::Invalid {
            self.resolve_error = Some(Error::UnsupportedConversion {
                in_mode: frame.mode,
                in_fps: self.in_fps,
                out_mode: self.format_desc.mode,
                out_fps: self.format_desc.fps,
            });
        }
        self.display_mode = Some(mode);
        Ok(())
    }

    /// Drain at most one output unit from the front segments
    fn put_frames(&mut self) {
        if self.video_streams.count() > 1
            && self.audio_streams.count() > 1
            && (self.video_streams.front().is_empty() || self.audio_streams.front().is_empty())
        {
            let video_left = self.video_streams.front().len();
            let audio_left = self.audio_streams.front().len();
            if video_left > 0 || audio_left > 0 {
                warn!(
                    video_frames = video_left,
                    audio_samples = audio_left,
                    "frame_muxer: truncating at stream switch"
                );
            }

            self.video_streams.pop_front();
            self.audio_streams.pop_front();
        }

        if self.video_streams.front().is_empty()
            || self.audio_streams.front().len() < self.format_desc.audio_samples_per_frame
        {
            return;
        }

        let Some(strategy) = self.display_mode.and_then(|mode| mode.strategy()) else {
            return;
        };

        self.drain(strategy);
    }
}
