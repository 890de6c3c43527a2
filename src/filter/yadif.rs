//! Line deinterlacer
//!
//! Rebuilds the missing field of an interlaced frame by averaging the lines
//! above and below. Field-rate mode emits one progressive frame per field, in
//! temporal order.

use super::{FieldRate, Filter, FilterOutput, Parity};
use crate::frame::RawVideoFrame;
use crate::{Result, ScanMode};
use image::RgbaImage;

/// Deinterlacer configured from `YADIF=<mode>:<parity>` parameters
#[derive(Debug, Clone)]
pub struct Yadif {
    rate: FieldRate,
    parity: Parity,
}

impl Yadif {
    pub fn new(rate: FieldRate, parity: Parity) -> Self {
        Self { rate, parity }
    }

    /// Row parity of the temporally first field, `None` for progressive frames
    fn first_field(&self, mode: ScanMode) -> Option<u32> {
        match (self.parity, mode) {
            (_, ScanMode::Progressive) => None,
            (Parity::Upper, _) => Some(0),
            (Parity::Lower, _) => Some(1),
            (Parity::Auto, ScanMode::Upper) => Some(0),
            (Parity::Auto, ScanMode::Lower) => Some(1),
        }
    }
}

impl Filter for Yadif {
    fn execute(&mut self, frame: RawVideoFrame) -> Result<FilterOutput> {
        let first = match self.first_field(frame.mode) {
            Some(parity) if !frame.is_placeholder() => parity,
            _ => return Ok(Box::new(std::iter::once(frame))),
        };

        let fields = match self.rate {
            FieldRate::Frame => vec![first],
            FieldRate::Field => vec![first, 1 - first],
        };

        Ok(Box::new(FieldFrames {
            frame,
            fields: fields.into_iter(),
        }))
    }
}

/// Lazily rebuilds one progressive frame per requested field
struct FieldFrames {
    frame: RawVideoFrame,
    fields: std::vec::IntoIter<u32>,
}

impl Iterator for FieldFrames {
    type Item = RawVideoFrame;

    fn next(&mut self) -> Option<RawVideoFrame> {
        let parity = self.fields.next()?;
        let image = self.frame.image.as_ref()?;

        Some(RawVideoFrame::new(
            interpolate_field(image, parity),
            ScanMode::Progressive,
        ))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.fields.size_hint()
    }
}

/// Keep the rows of one field and rebuild the others from their neighbours
fn interpolate_field(image: &RgbaImage, keep: u32) -> RgbaImage {
    let (width, height) = image.dimensions();
    let stride = width as usize * 4;
    let src = image.as_raw();
    let mut output = image.clone();
    let buf: &mut [u8] = &mut output;

    for y in 0..height {
        if y % 2 == keep {
            continue;
        }

        let above = y.checked_sub(1).map(|row| row as usize * stride);
        let below = (y + 1 < height).then(|| (y + 1) as usize * stride);
        let start = y as usize * stride;
        let dst = &mut buf[start..start + stride];

        match (above, below) {
            (Some(a), Some(b)) => {
                for (i, px) in dst.iter_mut().enumerate() {
                    *px = ((src[a + i] as u16 + src[b + i] as u16 + 1) / 2) as u8;
                }
            }
            (Some(row), None) | (None, Some(row)) => {
                dst.copy_from_slice(&src[row..row + stride]);
            }
            (None, None) => {}
        }
    }

    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;

    /// Even rows 100, odd rows 200
    fn striped(width: u32, height: u32, mode: ScanMode) -> RawVideoFrame {
        let img = RgbaImage::from_fn(width, height, |_, y| {
            let v = if y % 2 == 0 { 100 } else { 200 };
            Rgba([v, v, v, 255])
        });
        RawVideoFrame::new(img, mode)
    }

    #[test]
    fn test_frame_rate_keeps_dominant_field() {
        let mut yadif = Yadif::new(FieldRate::Frame, Parity::Auto);
        let frames: Vec<_> = yadif
            .execute(striped(4, 4, ScanMode::Upper))
            .unwrap()
            .collect();

        assert_eq!(frames.len(), 1);
        let img = frames[0].image.as_ref().unwrap();
        assert_eq!(frames[0].mode, ScanMode::Progressive);
        assert_eq!(img.get_pixel(0, 0)[0], 100);
        assert_eq!(img.get_pixel(0, 1)[0], 100);
        assert_eq!(img.get_pixel(0, 2)[0], 100);
        // last row only has a neighbour above
        assert_eq!(img.get_pixel(0, 3)[0], 100);
    }

    #[test]
    fn test_field_rate_yields_two_frames_in_order() {
        let mut yadif = Yadif::new(FieldRate::Field, Parity::Auto);
        let frames: Vec<_> = yadif
            .execute(striped(4, 6, ScanMode::Lower))
            .unwrap()
            .collect();

        assert_eq!(frames.len(), 2);
        assert_eq!(frames[0].image.as_ref().unwrap().get_pixel(1, 2)[0], 200);
        assert_eq!(frames[1].image.as_ref().unwrap().get_pixel(1, 3)[0], 100);
        assert!(frames.iter().all(|f| f.height == 6));
    }

    #[test]
    fn test_forced_parity_overrides_frame_mode() {
        let mut yadif = Yadif::new(FieldRate::Frame, Parity::Lower);
        let frames: Vec<_> = yadif
            .execute(striped(2, 4, ScanMode::Upper))
            .unwrap()
            .collect();
        assert_eq!(frames[0].image.as_ref().unwrap().get_pixel(0, 0)[0], 200);
    }

    #[test]
    fn test_progressive_passes_through() {
        let mut yadif = Yadif::new(FieldRate::Field, Parity::Auto);
        let input = striped(2, 4, ScanMode::Progressive);
        let frames: Vec<_> = yadif.execute(input.clone()).unwrap().collect();
        assert_eq!(frames, vec![input]);
    }

    #[test]
    fn test_placeholder_passes_through() {
        let mut yadif = Yadif::new(FieldRate::Field, Parity::Upper);
        let frames: Vec<_> = yadif
            .execute(RawVideoFrame::placeholder())
            .unwrap()
            .collect();
        assert_eq!(frames.len(), 1);
        assert!(frames[0].is_placeholder());
    }
}
