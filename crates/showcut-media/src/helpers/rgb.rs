// crates/showcut-media/src/helpers/rgb.rs
//
// Conversions between ffmpeg RGB24 VideoFrames and packed `RgbFrame`s.
//
// ffmpeg rows are padded to `stride(0)` bytes; `RgbFrame` rows are exactly
// `width * 3` bytes. These two functions are the only place the padding is
// added or stripped.

use ffmpeg_the_third as ffmpeg;
use ffmpeg::format::Pixel;
use ffmpeg::util::frame::video::Video as VideoFrame;

use showcut_core::RgbFrame;

/// Copy the visible pixels of an RGB24 `VideoFrame` into a packed frame.
///
/// The frame must already be in `Pixel::RGB24`; run swscale first.
pub fn extract_rgb(frame: &VideoFrame) -> RgbFrame {
    let w = frame.width();
    let h = frame.height();
    let row_bytes = w as usize * 3;
    let stride    = frame.stride(0);
    let src       = frame.data(0);

    let mut data = Vec::with_capacity(row_bytes * h as usize);
    for row in 0..h as usize {
        data.extend_from_slice(&src[row * stride..row * stride + row_bytes]);
    }
    RgbFrame { width: w, height: h, data }
}

/// Copy a packed frame into `dst`, respecting its stride.
///
/// `dst` must be an allocated RGB24 frame of the same size.
pub fn write_rgb(packed: &RgbFrame, dst: &mut VideoFrame) {
    debug_assert_eq!(dst.format(), Pixel::RGB24);
    debug_assert_eq!((dst.width(), dst.height()), (packed.width, packed.height));

    let row_bytes = packed.row_bytes();
    let stride    = dst.stride(0);
    let out       = dst.data_mut(0);
    for (row, src) in packed.data.chunks_exact(row_bytes).enumerate() {
        out[row * stride..row * stride + row_bytes].copy_from_slice(src);
    }
}

/// Allocate an RGB24 frame and fill it from `packed`.
pub fn to_video_frame(packed: &RgbFrame) -> VideoFrame {
    let mut frame = VideoFrame::new(Pixel::RGB24, packed.width, packed.height);
    write_rgb(packed, &mut frame);
    frame
}
