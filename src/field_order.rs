//! Field dominance correction

use crate::frame::WriteFrame;
use crate::ScanMode;

/// Shift a frame half a scanline when its field dominance disagrees with the
/// output format, so fields land on the correct output lines.
///
/// Lower-field-first frames going to upper-field-first output move down,
/// the converse moves up. Anything else is left untouched.
pub fn correct(frame: &mut WriteFrame, target: ScanMode) {
    let height = frame.height();
    if height == 0 {
        return;
    }

    let offset = 0.5 / height as f64;
    match (frame.mode, target) {
        (ScanMode::Lower, ScanMode::Upper) => frame.transform.set_fill_translation(0.0, offset),
        (ScanMode::Upper, ScanMode::Lower) => frame.transform.set_fill_translation(0.0, -offset),
        _ => {}
    }
}
