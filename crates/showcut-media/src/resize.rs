// crates/showcut-media/src/resize.rs
//
// Scales every kept frame to the strip size (766 × target height) once,
// before slicing. RGB24 in, RGB24 out; the swscale context is built on the
// first frame and rebuilt only if the input size changes.

use anyhow::{Context as _, Result};

use ffmpeg_the_third as ffmpeg;
use ffmpeg::format::Pixel;
use ffmpeg::software::scaling::{Context as ScaleCtx, Flags as ScaleFlags};
use ffmpeg::util::frame::video::Video as VideoFrame;

use showcut_core::{QualityMode, RgbFrame};

use crate::helpers::rgb::{extract_rgb, to_video_frame};

pub struct Resizer {
    out_w:  u32,
    out_h:  u32,
    flags:  ScaleFlags,
    /// Context plus the input size it was built for.
    scaler: Option<(u32, u32, ScaleCtx)>,
}

impl Resizer {
    pub fn new(out_w: u32, out_h: u32, quality: QualityMode) -> Self {
        let flags = if quality.prefers_area_resize() { ScaleFlags::AREA } else { ScaleFlags::BILINEAR };
        Self { out_w, out_h, flags, scaler: None }
    }

    pub fn output_size(&self) -> (u32, u32) {
        (self.out_w, self.out_h)
    }

    pub fn resize(&mut self, frame: &RgbFrame) -> Result<RgbFrame> {
        let (w, h) = (frame.width, frame.height);
        let stale = !matches!(&self.scaler, Some((sw, sh, _)) if *sw == w && *sh == h);
        if stale {
            let sc = ScaleCtx::get(
                Pixel::RGB24, w, h,
                Pixel::RGB24, self.out_w, self.out_h,
                self.flags,
            ).with_context(|| format!("resize context {w}x{h} -> {}x{}", self.out_w, self.out_h))?;
            self.scaler = Some((w, h, sc));
        }
        let (_, _, sc) = self.scaler.as_mut().context("resize context missing")?;

        let src = to_video_frame(frame);
        let mut dst = VideoFrame::empty();
        sc.run(&src, &mut dst).context("resize")?;
        Ok(extract_rgb(&dst))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resizes_to_requested_size() {
        ffmpeg::init().unwrap();
        let mut r = Resizer::new(766, 500, QualityMode::High);
        let out = r.resize(&RgbFrame::solid(1532, 1000, [200, 10, 10])).unwrap();
        assert_eq!((out.width, out.height), (766, 500));
        assert_eq!(out.data.len(), RgbFrame::byte_len(766, 500));

        // Solid input stays (close to) solid.
        let [r0, g0, b0] = out.pixel(383, 250);
        assert!(r0 > 180 && g0 < 40 && b0 < 40);
    }

    #[test]
    fn rebuilds_when_input_size_changes() {
        ffmpeg::init().unwrap();
        let mut r = Resizer::new(766, 100, QualityMode::Fastest);
        assert!(r.resize(&RgbFrame::solid(320, 40, [0, 0, 0])).is_ok());
        let out = r.resize(&RgbFrame::solid(640, 90, [0, 0, 0])).unwrap();
        assert_eq!((out.width, out.height), (766, 100));
    }
}
