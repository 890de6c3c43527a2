//! Common test utilities

#![allow(dead_code)]

use framemux::{CompositeFrame, FormatDesc, RawVideoFrame, ScanMode};
use image::{ImageBuffer, Rgba, RgbaImage};
use std::io;
use std::sync::{Arc, Mutex};

/// Audio samples per output frame used by the small test formats
pub const SAMPLES_PER_FRAME: usize = 4;

/// Frame size used by the small test formats
pub const WIDTH: u32 = 8;
pub const HEIGHT: u32 = 8;

/// Route muxer logs to the test output
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("framemux=debug")),
        )
        .with_test_writer()
        .try_init();
}

/// Log sink shared between a test and its subscriber
#[derive(Clone, Default)]
pub struct LogBuffer(Arc<Mutex<Vec<u8>>>);

impl io::Write for LogBuffer {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// Run `f` with a subscriber at `level` and return what it logged
pub fn capture_logs(level: tracing::Level, f: impl FnOnce()) -> String {
    let buffer = LogBuffer::default();
    let writer = buffer.clone();
    let subscriber = tracing_subscriber::fmt()
        .with_max_level(level)
        .with_ansi(false)
        .with_writer(move || writer.clone())
        .finish();

    tracing::subscriber::with_default(subscriber, f);

    let bytes = buffer.0.lock().unwrap().clone();
    String::from_utf8_lossy(&bytes).into_owned()
}

/// Small output format running at `fps` with a few samples per frame
pub fn test_format(mode: ScanMode, fps: u32) -> FormatDesc {
    FormatDesc::new(WIDTH, HEIGHT, mode, fps, 1).with_audio_samples_per_frame(SAMPLES_PER_FRAME)
}

/// Generate an image whose every pixel encodes `number`
pub fn generate_numbered_image(width: u32, height: u32, number: u32) -> RgbaImage {
    ImageBuffer::from_pixel(
        width,
        height,
        Rgba([(number & 0xff) as u8, (number >> 8) as u8, 0, 255]),
    )
}

/// Generate a numbered frame at the test size
pub fn numbered_frame(number: u32, mode: ScanMode) -> RawVideoFrame {
    RawVideoFrame::new(generate_numbered_image(WIDTH, HEIGHT, number), mode)
}

/// Number encoded in one row of a composite frame
pub fn row_number(frame: &CompositeFrame, y: u32) -> Option<u32> {
    let img = frame.video.image.as_ref()?;
    let px = img.get_pixel(0, y);
    Some(px[0] as u32 | (px[1] as u32) << 8)
}

/// Number encoded in the first row of a composite frame
pub fn frame_number(frame: &CompositeFrame) -> Option<u32> {
    row_number(frame, 0)
}

/// One output frame of audio with every sample set to `value`
pub fn audio_frame(value: i16) -> Vec<i16> {
    vec![value; SAMPLES_PER_FRAME]
}

/// Drain every buffered composite frame
pub fn pop_all(muxer: &mut framemux::FrameMuxer) -> Vec<CompositeFrame> {
    let mut frames = Vec::new();
    while let Some(frame) = muxer.pop() {
        frames.push(frame);
    }
    frames
}
