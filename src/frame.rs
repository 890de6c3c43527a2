//! Video frame units handled by the muxer

use crate::{Error, Result, ScanMode};
use image::{DynamicImage, GenericImageView, RgbaImage};

/// Decoded video frame in RGBA format
///
/// A frame without pixel content is a flush placeholder.
#[derive(Debug, Clone, PartialEq)]
pub struct RawVideoFrame {
    /// Scan mode the decoder reported for this frame
    pub mode: ScanMode,
    /// Frame width in pixels
    pub width: u32,
    /// Frame height in pixels
    pub height: u32,
    /// RGBA pixel data, `None` for placeholders
    pub image: Option<RgbaImage>,
}

impl RawVideoFrame {
    /// Create a frame from an RGBA image
    pub fn new(image: RgbaImage, mode: ScanMode) -> Self {
        Self {
            mode,
            width: image.width(),
            height: image.height(),
            image: Some(image),
        }
    }

    /// Create from a DynamicImage
    pub fn from_dynamic_image(img: DynamicImage, mode: ScanMode) -> Self {
        let (width, height) = img.dimensions();
        let rgba = img.to_rgba8();

        Self {
            mode,
            width,
            height,
            image: Some(rgba),
        }
    }

    /// Create from raw RGBA bytes (width * height * 4)
    pub fn from_rgba(width: u32, height: u32, data: Vec<u8>, mode: ScanMode) -> Result<Self> {
        let expected = width as usize * height as usize * 4;
        if data.len() != expected {
            return Err(Error::InvalidInput(format!(
                "RGBA buffer holds {} bytes, {}x{} needs {}",
                data.len(),
                width,
                height,
                expected
            )));
        }

        let image = RgbaImage::from_raw(width, height, data).ok_or_else(|| {
            Error::InvalidInput(format!("Invalid {}x{} RGBA buffer", width, height))
        })?;

        Ok(Self::new(image, mode))
    }

    /// Placeholder frame carrying no pixel content
    pub fn placeholder() -> Self {
        Self {
            mode: ScanMode::Progressive,
            width: 0,
            height: 0,
            image: None,
        }
    }

    /// Check if this frame is a placeholder
    pub fn is_placeholder(&self) -> bool {
        self.image.is_none()
    }
}

/// Per-frame transform applied by the compositor
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ImageTransform {
    /// Fill translation in normalized frame coordinates (x, y)
    pub fill_translation: (f64, f64),
}

impl ImageTransform {
    pub fn set_fill_translation(&mut self, x: f64, y: f64) {
        self.fill_translation = (x, y);
    }
}

/// Video unit buffered by the muxer
#[derive(Debug, Clone, PartialEq)]
pub struct WriteFrame {
    /// RGBA pixel data, `None` for placeholders
    pub image: Option<RgbaImage>,
    /// Scan mode of the pixel content
    pub mode: ScanMode,
    /// Compositor transform
    pub transform: ImageTransform,
}

impl WriteFrame {
    /// Empty placeholder unit
    pub fn empty() -> Self {
        Self {
            image: None,
            mode: ScanMode::Progressive,
            transform: ImageTransform::default(),
        }
    }

    /// Check if the unit carries no pixel content
    pub fn is_empty(&self) -> bool {
        self.image.is_none()
    }

    /// Height of the first plane, 0 for placeholders
    pub fn height(&self) -> u32 {
        self.image.as_ref().map(|img| img.height()).unwrap_or(0)
    }
}

impl From<RawVideoFrame> for WriteFrame {
    fn from(frame: RawVideoFrame) -> Self {
        Self {
            image: frame.image,
            mode: frame.mode,
            transform: ImageTransform::default(),
        }
    }
}

/// How the video of a composite frame was assembled
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldLayout {
    /// A single input unit
    Frame,
    /// Two consecutive input units woven into fields
    Woven { mode: ScanMode },
}

/// Output unit: video plus exactly one frame of audio
#[derive(Debug, Clone, PartialEq)]
pub struct CompositeFrame {
    /// Video content
    pub video: WriteFrame,
    /// Interleaved audio samples
    pub audio: Vec<i16>,
    /// Field layout of the video
    pub fields: FieldLayout,
}

impl CompositeFrame {
    /// Pair a single video unit with its audio
    pub fn new(video: WriteFrame, audio: Vec<i16>) -> Self {
        Self {
            video,
            audio,
            fields: FieldLayout::Frame,
        }
    }
}

/// Weave two units into one interlaced unit
///
/// For upper-field-first output `first` supplies the even rows, for
/// lower-field-first it supplies the odd rows. Progressive output keeps
/// `first` unchanged.
pub fn interlace(first: WriteFrame, second: WriteFrame, mode: ScanMode) -> WriteFrame {
    if !mode.is_interlaced() {
        return first;
    }

    let transform = first.transform;
    let image = match (first.image, second.image) {
        (Some(a), Some(b)) => Some(weave(&a, &b, mode)),
        (Some(img), None) | (None, Some(img)) => Some(img),
        (None, None) => None,
    };

    WriteFrame {
        image,
        mode,
        transform,
    }
}

fn weave(first: &RgbaImage, second: &RgbaImage, mode: ScanMode) -> RgbaImage {
    let width = first.width().max(second.width());
    let height = first.height().max(second.height());
    let mut output = RgbaImage::new(width, height);

    let first_parity = if mode == ScanMode::Upper { 0 } else { 1 };

    for y in 0..height {
        let src = if y % 2 == first_parity { first } else { second };
        if y >= src.height() {
            continue;
        }

        let src_stride = src.width() as usize * 4;
        let dst_stride = width as usize * 4;
        let src_row = &src.as_raw()[y as usize * src_stride..(y as usize + 1) * src_stride];
        let dst_start = y as usize * dst_stride;

        let dst: &mut [u8] = &mut output;
        dst[dst_start..dst_start + src_stride].copy_from_slice(src_row);
    }

    output
}
