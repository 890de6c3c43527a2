//! Draining strategies
//!
//! Each strategy consumes at most one output unit worth of input from the
//! front segments and is a no-op while its minimum input is not buffered.

use super::FrameMuxer;
use crate::display_mode::Strategy;
use crate::frame::{self, CompositeFrame, FieldLayout, WriteFrame};
use tracing::trace;

impl FrameMuxer {
    pub(super) fn drain(&mut self, strategy: Strategy) {
        match strategy {
            Strategy::Simple => self.simple(),
            Strategy::Duplicate => self.duplicate(),
            Strategy::Half => self.half(),
            Strategy::Interlace => self.interlace(),
        }
    }

    fn simple(&mut self) {
        if self.buffered_video() < 1 || self.buffered_audio_frames() < 1 {
            return;
        }

        let Some(video) = self.pop_video() else {
            return;
        };
        let audio = self.pop_audio();

        self.emit(CompositeFrame::new(video, audio));
    }

    fn duplicate(&mut self) {
        if self.buffered_video() < 1 || self.buffered_audio_frames() < 2 {
            return;
        }

        let Some(video) = self.pop_video() else {
            return;
        };

        let copy = video.clone();
        let first_audio = self.pop_audio();
        let second_audio = self.pop_audio();

        self.emit(CompositeFrame::new(copy, first_audio));
        self.emit(CompositeFrame::new(video, second_audio));
    }

    fn half(&mut self) {
        if self.buffered_video() < 2 || self.buffered_audio_frames() < 1 {
            return;
        }

        let Some(video) = self.pop_video() else {
            return;
        };
        let audio = self.pop_audio();

        // dropped
        self.pop_video();

        self.emit(CompositeFrame::new(video, audio));
    }

    fn interlace(&mut self) {
        if self.buffered_video() < 2 || self.buffered_audio_frames() < 1 {
            return;
        }

        let (Some(first), Some(second)) = (self.pop_video(), self.pop_video()) else {
            return;
        };
        let audio = self.pop_audio();

        let mode = self.format_desc.mode;
        let fields = if mode.is_interlaced() {
            FieldLayout::Woven { mode }
        } else {
            FieldLayout::Frame
        };

        self.emit(CompositeFrame {
            video: frame::interlace(first, second, mode),
            audio,
            fields,
        });
    }

    fn buffered_video(&self) -> usize {
        self.video_streams.front().len()
    }

    fn buffered_audio_frames(&self) -> usize {
        self.audio_streams.front().len() / self.format_desc.audio_samples_per_frame
    }

    fn pop_video(&mut self) -> Option<WriteFrame> {
        self.video_streams.front_mut().pop_front()
    }

    /// Take exactly one frame of audio from the front segment
    fn pop_audio(&mut self) -> Vec<i16> {
        let samples_per_frame = self.format_desc.audio_samples_per_frame;
        let segment = self.audio_streams.front_mut();
        assert!(
            segment.len() >= samples_per_frame,
            "audio segment holds {} samples, a frame needs {}",
            segment.len(),
            samples_per_frame
        );

        segment.drain(..samples_per_frame).collect()
    }

    fn emit(&mut self, frame: CompositeFrame) {
        self.processed_video_frame_count += 1;
        self.processed_audio_sample_count += frame.audio.len();

        trace!(
            frame = self.processed_video_frame_count,
            fields = ?frame.fields,
            "frame_muxer: emit"
        );

        self.frame_buffer.push_back(frame);
    }
}
