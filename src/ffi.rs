//! FFI (Foreign Function Interface) for C/C++ hosts

use crate::error::ErrorCode;
use crate::{
    AudioInput, FormatDesc, FrameMuxer, MuxerConfig, RawVideoFrame, ScanMode, VideoFormat,
    VideoInput,
};
use libc::{c_char, size_t};
use std::ffi::CString;
use std::ptr;
use std::slice;

/// FFI result structure
#[repr(C)]
pub struct FfiResult {
    pub code: ErrorCode,
    pub message: *mut c_char,
}

impl FfiResult {
    fn ok() -> Self {
        Self {
            code: ErrorCode::Ok,
            message: ptr::null_mut(),
        }
    }

    fn error(code: ErrorCode, message: &str) -> Self {
        let c_message =
            CString::new(message).unwrap_or_else(|_| CString::new("Unknown error").unwrap());
        Self {
            code,
            message: c_message.into_raw(),
        }
    }
}

/// FFI video frame structure
///
/// A null `data` pointer pushes a flush placeholder.
#[repr(C)]
pub struct FfiVideoFrame {
    /// RGBA pixel data (width * height * 4 bytes)
    pub data: *const u8,
    pub width: u32,
    pub height: u32,
    pub mode: ScanMode,
}

/// FFI composite frame structure
///
/// Buffers are owned by the library until released with
/// `framemux_free_frame`. `data` is null for placeholder frames.
#[repr(C)]
pub struct FfiCompositeFrame {
    pub data: *mut u8,
    pub data_len: size_t,
    pub width: u32,
    pub height: u32,
    pub mode: ScanMode,
    pub fill_translation_x: f64,
    pub fill_translation_y: f64,
    /// Video was woven from two input frames
    pub woven: bool,
    pub audio: *mut i16,
    pub audio_len: size_t,
}

impl FfiCompositeFrame {
    fn empty() -> Self {
        Self {
            data: ptr::null_mut(),
            data_len: 0,
            width: 0,
            height: 0,
            mode: ScanMode::Progressive,
            fill_translation_x: 0.0,
            fill_translation_y: 0.0,
            woven: false,
            audio: ptr::null_mut(),
            audio_len: 0,
        }
    }
}

fn into_raw_parts<T>(data: Vec<T>) -> (*mut T, size_t) {
    if data.is_empty() {
        return (ptr::null_mut(), 0);
    }
    let boxed = data.into_boxed_slice();
    let len = boxed.len();
    (Box::into_raw(boxed) as *mut T, len)
}

/// # Safety
/// `data` must come from `into_raw_parts` with the same `len`
unsafe fn free_raw_parts<T>(data: *mut T, len: size_t) {
    if !data.is_null() {
        drop(Box::from_raw(ptr::slice_from_raw_parts_mut(data, len)));
    }
}

/// Fill `out` with the descriptor of a standard format
///
/// # Safety
/// - `out` must point to writable memory for one `FormatDesc`
#[no_mangle]
pub unsafe extern "C" fn framemux_format_desc(
    format: VideoFormat,
    out: *mut FormatDesc,
) -> FfiResult {
    if out.is_null() {
        return FfiResult::error(ErrorCode::InvalidInput, "Output format pointer is null");
    }

    *out = FormatDesc::from(format);
    FfiResult::ok()
}

/// Create a muxer
///
/// Returns null if the arguments are invalid.
///
/// # Safety
/// - `format` must point to a valid `FormatDesc`
#[no_mangle]
pub unsafe extern "C" fn framemux_create(
    in_fps: f64,
    format: *const FormatDesc,
    auto_mode: bool,
) -> *mut FrameMuxer {
    if format.is_null() {
        return ptr::null_mut();
    }

    let config = MuxerConfig::default().with_auto_mode(auto_mode);
    match FrameMuxer::new(in_fps, *format, config) {
        Ok(muxer) => Box::into_raw(Box::new(muxer)),
        Err(_) => ptr::null_mut(),
    }
}

/// Destroy a muxer
///
/// # Safety
/// - `muxer` must have been returned by `framemux_create` or be null
#[no_mangle]
pub unsafe extern "C" fn framemux_destroy(muxer: *mut FrameMuxer) {
    if !muxer.is_null() {
        drop(Box::from_raw(muxer));
    }
}

/// Push a video frame
///
/// A null `frame` marks the end of the current video stream.
///
/// # Safety
/// - `muxer` must be a valid muxer handle
/// - `frame` must be null or point to a valid `FfiVideoFrame` whose `data`
///   is null or holds `width * height * 4` bytes
#[no_mangle]
pub unsafe extern "C" fn framemux_push_video(
    muxer: *mut FrameMuxer,
    frame: *const FfiVideoFrame,
) -> FfiResult {
    let Some(muxer) = muxer.as_mut() else {
        return FfiResult::error(ErrorCode::InvalidInput, "Muxer is null");
    };

    let input = if frame.is_null() {
        VideoInput::EndOfStream
    } else {
        let frame = &*frame;
        if frame.data.is_null() {
            VideoInput::Flush
        } else {
            let len = frame.width as usize * frame.height as usize * 4;
            let data = slice::from_raw_parts(frame.data, len).to_vec();
            match RawVideoFrame::from_rgba(frame.width, frame.height, data, frame.mode) {
                Ok(raw) => VideoInput::Frame(raw),
                Err(e) => return FfiResult::error(ErrorCode::from(&e), &e.to_string()),
            }
        }
    };

    match muxer.push_video(input) {
        Ok(_) => FfiResult::ok(),
        Err(e) => FfiResult::error(ErrorCode::from(&e), &e.to_string()),
    }
}

/// Push interleaved audio samples
///
/// A null `samples` pointer marks the end of the current audio stream.
///
/// # Safety
/// - `muxer` must be a valid muxer handle
/// - `samples` must be null or point to `count` samples
#[no_mangle]
pub unsafe extern "C" fn framemux_push_audio(
    muxer: *mut FrameMuxer,
    samples: *const i16,
    count: size_t,
) -> FfiResult {
    let Some(muxer) = muxer.as_mut() else {
        return FfiResult::error(ErrorCode::InvalidInput, "Muxer is null");
    };

    let input = if samples.is_null() {
        AudioInput::EndOfStream
    } else {
        AudioInput::Samples(slice::from_raw_parts(samples, count).to_vec())
    };

    muxer.push_audio(input);
    FfiResult::ok()
}

/// Pop the oldest composite frame into `out`
///
/// Returns `ErrorCode::Empty` when no frame is buffered.
///
/// # Safety
/// - `muxer` must be a valid muxer handle
/// - `out` must point to writable memory for one `FfiCompositeFrame`
#[no_mangle]
pub unsafe extern "C" fn framemux_pop(
    muxer: *mut FrameMuxer,
    out: *mut FfiCompositeFrame,
) -> FfiResult {
    let Some(muxer) = muxer.as_mut() else {
        return FfiResult::error(ErrorCode::InvalidInput, "Muxer is null");
    };
    if out.is_null() {
        return FfiResult::error(ErrorCode::InvalidInput, "Output frame pointer is null");
    }

    let Some(frame) = muxer.pop() else {
        *out = FfiCompositeFrame::empty();
        return FfiResult::error(ErrorCode::Empty, "No frame available");
    };

    let (width, height) = frame
        .video
        .image
        .as_ref()
        .map(|img| img.dimensions())
        .unwrap_or((0, 0));
    let pixels = frame
        .video
        .image
        .map(|img| img.into_raw())
        .unwrap_or_default();
    let (data, data_len) = into_raw_parts(pixels);
    let (audio, audio_len) = into_raw_parts(frame.audio);
    let (x, y) = frame.video.transform.fill_translation;

    *out = FfiCompositeFrame {
        data,
        data_len,
        width,
        height,
        mode: frame.video.mode,
        fill_translation_x: x,
        fill_translation_y: y,
        woven: matches!(frame.fields, crate::FieldLayout::Woven { .. }),
        audio,
        audio_len,
    };

    FfiResult::ok()
}

/// Release the buffers of a popped frame
///
/// # Safety
/// - `frame` must point to a frame filled by `framemux_pop` or be null
#[no_mangle]
pub unsafe extern "C" fn framemux_free_frame(frame: *mut FfiCompositeFrame) {
    let Some(frame) = frame.as_mut() else {
        return;
    };

    free_raw_parts(frame.data, frame.data_len);
    free_raw_parts(frame.audio, frame.audio_len);
    *frame = FfiCompositeFrame::empty();
}

/// Number of composite frames waiting to be popped
///
/// # Safety
/// - `muxer` must be a valid muxer handle or null
#[no_mangle]
pub unsafe extern "C" fn framemux_size(muxer: *const FrameMuxer) -> size_t {
    muxer.as_ref().map(|m| m.size()).unwrap_or(0)
}

/// Whether no composite frame is waiting to be popped
///
/// # Safety
/// - `muxer` must be a valid muxer handle or null
#[no_mangle]
pub unsafe extern "C" fn framemux_is_empty(muxer: *const FrameMuxer) -> bool {
    muxer.as_ref().map(|m| m.is_empty()).unwrap_or(true)
}

/// # Safety
/// - `muxer` must be a valid muxer handle or null
#[no_mangle]
pub unsafe extern "C" fn framemux_video_ready(muxer: *const FrameMuxer) -> bool {
    muxer.as_ref().map(|m| m.video_ready()).unwrap_or(false)
}

/// # Safety
/// - `muxer` must be a valid muxer handle or null
#[no_mangle]
pub unsafe extern "C" fn framemux_audio_ready(muxer: *const FrameMuxer) -> bool {
    muxer.as_ref().map(|m| m.audio_ready()).unwrap_or(false)
}

/// Free a result's message string
///
/// # Safety
/// - `result` must point to a valid `FfiResult` that was returned by a framemux function
#[no_mangle]
pub unsafe extern "C" fn framemux_free_result(result: *mut FfiResult) {
    if result.is_null() {
        return;
    }

    let result = &mut *result;
    if !result.message.is_null() {
        // Reclaim the CString and let it drop
        let _ = CString::from_raw(result.message);
        result.message = ptr::null_mut();
    }
}

/// Get version string
#[no_mangle]
pub extern "C" fn framemux_version() -> *const c_char {
    static VERSION: &[u8] = concat!(env!("CARGO_PKG_VERSION"), "\0").as_bytes();
    VERSION.as_ptr() as *const c_char
}
