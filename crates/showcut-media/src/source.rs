// crates/showcut-media/src/source.rs
//
// Frame sources: the pull side of the pipeline.
//
// `FrameSource` is the seam the orchestrator depends on. Two ffmpeg-backed
// variants live here:
//   • `ImageSource`: decodes exactly one frame at open time, yields it once.
//   • `VideoSource`: demuxes and decodes lazily, in file order, one frame per
//     `next_frame` call. Not seekable, not restartable.
// Tests implement the trait directly with synthetic frames.
//
// Both variants decode the first frame inside `open`, so a file that opens
// but yields nothing fails as `OpenFailed` before any encoder is created.
//
// Error policy after open: a packet read error or a decode error ends the
// stream. Nothing is retried and no error value reaches the orchestrator.

use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context as _, Result};

use ffmpeg_the_third as ffmpeg;
use ffmpeg::codec;
use ffmpeg::format::{input as open_input, Pixel};
use ffmpeg::media::Type as MediaType;
use ffmpeg::software::scaling::{Context as ScaleCtx, Flags as ScaleFlags};
use ffmpeg::util::frame::video::Video as VideoFrame;

use showcut_core::cadence::FALLBACK_FPS;
use showcut_core::scan::is_image_path;
use showcut_core::{RgbFrame, RunError, RunResult};

use crate::helpers::rgb::extract_rgb;

/// Which pipeline path a source takes.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum SourceKind {
    /// Single still frame; no frame rate.
    Image,
    /// Frame sequence at the container's declared rate (never ≤ 0).
    Video { fps: f64 },
}

/// Pull-based producer of packed RGB frames.
pub trait FrameSource {
    fn kind(&self) -> SourceKind;

    /// Resolution of the frames this source yields, known before the first pull.
    fn native_size(&self) -> (u32, u32);

    /// Next frame in order, or `None` at end of stream.
    fn next_frame(&mut self) -> Option<RgbFrame>;
}

/// Open `path` as an image or a video depending on its extension.
pub fn open_source(path: &Path) -> RunResult<Box<dyn FrameSource>> {
    let opened: Result<Box<dyn FrameSource>> = if is_image_path(path) {
        ImageSource::open(path).map(|s| Box::new(s) as Box<dyn FrameSource>)
    } else {
        VideoSource::open(path).map(|s| Box::new(s) as Box<dyn FrameSource>)
    };
    opened.map_err(|e| {
        tracing::warn!(path = %path.display(), error = format!("{e:#}"), "source open failed");
        RunError::open(format!("{}: {e:#}", path.display()))
    })
}

// ── Shared demux/decode state ─────────────────────────────────────────────────

/// Sequential decoder over the best video stream of one input.
struct StreamDecoder {
    path:      PathBuf,
    ictx:      ffmpeg::format::context::Input,
    decoder:   ffmpeg::decoder::video::Video,
    video_idx: usize,
    fps:       f64,
    /// RGB24 converter keyed on the decoded format and size it was built for.
    scaler:    Option<(Pixel, u32, u32, ScaleCtx)>,
    /// EOF has been sent to the decoder; only buffered frames remain.
    draining:  bool,
    /// Nothing more will be produced.
    done:      bool,
}

impl StreamDecoder {
    fn open(path: &Path) -> Result<Self> {
        let ictx = open_input(&path)
            .with_context(|| format!("open input '{}'", path.display()))?;

        let (video_idx, fps, decoder) = {
            let stream = ictx.streams().best(MediaType::Video)
                .ok_or_else(|| anyhow!("no video stream in '{}'", path.display()))?;
            let fps = f64::from(stream.avg_frame_rate());
            let ctx = codec::context::Context::from_parameters(stream.parameters())
                .context("video decoder context")?;
            let decoder = ctx.decoder().video().context("open video decoder")?;
            (stream.index(), fps, decoder)
        };

        Ok(Self {
            path: path.to_path_buf(),
            ictx,
            decoder,
            video_idx,
            fps,
            scaler: None,
            draining: false,
            done: false,
        })
    }

    /// Decode the next frame and convert it to packed RGB24.
    fn next_frame(&mut self) -> Option<RgbFrame> {
        if self.done {
            return None;
        }
        let mut decoded = VideoFrame::empty();
        loop {
            // Codecs with delay (B-frames) hand out several frames per packet;
            // always empty the decoder before reading more input.
            if self.decoder.receive_frame(&mut decoded).is_ok() {
                let frame = self.convert(&decoded);
                if frame.is_none() {
                    self.done = true;
                }
                return frame;
            }
            if self.draining {
                self.done = true;
                return None;
            }

            match self.ictx.packets().next() {
                Some(Ok((stream, packet))) => {
                    if stream.index() != self.video_idx {
                        continue;
                    }
                    if let Err(e) = self.decoder.send_packet(&packet) {
                        tracing::warn!(path = %self.path.display(), error = %e,
                            "decode error, ending stream");
                        self.done = true;
                        return None;
                    }
                }
                Some(Err(e)) => {
                    tracing::warn!(path = %self.path.display(), error = %e,
                        "packet read error, ending stream");
                    let _ = self.decoder.send_eof();
                    self.draining = true;
                }
                None => {
                    let _ = self.decoder.send_eof();
                    self.draining = true;
                }
            }
        }
    }

    fn convert(&mut self, decoded: &VideoFrame) -> Option<RgbFrame> {
        let (fmt, w, h) = (decoded.format(), decoded.width(), decoded.height());

        let stale = !matches!(&self.scaler, Some((f, sw, sh, _)) if *f == fmt && *sw == w && *sh == h);
        if stale {
            match ScaleCtx::get(fmt, w, h, Pixel::RGB24, w, h, ScaleFlags::BILINEAR) {
                Ok(sc) => self.scaler = Some((fmt, w, h, sc)),
                Err(e) => {
                    tracing::warn!(path = %self.path.display(), error = %e, "rgb converter");
                    return None;
                }
            }
        }
        let (_, _, _, sc) = self.scaler.as_mut()?;

        let mut rgb = VideoFrame::empty();
        if let Err(e) = sc.run(decoded, &mut rgb) {
            tracing::warn!(path = %self.path.display(), error = %e, "rgb conversion");
            return None;
        }
        Some(extract_rgb(&rgb))
    }
}

// ── Image ─────────────────────────────────────────────────────────────────────

pub struct ImageSource {
    frame: Option<RgbFrame>,
    size:  (u32, u32),
}

impl ImageSource {
    pub fn open(path: &Path) -> Result<Self> {
        let frame = StreamDecoder::open(path)?
            .next_frame()
            .ok_or_else(|| anyhow!("no image decoded from '{}'", path.display()))?;
        tracing::info!(path = %path.display(), width = frame.width, height = frame.height, "image opened");
        Ok(Self::from_frame(frame))
    }

    /// Wrap an already-decoded frame.
    pub fn from_frame(frame: RgbFrame) -> Self {
        let size = (frame.width, frame.height);
        Self { frame: Some(frame), size }
    }
}

impl FrameSource for ImageSource {
    fn kind(&self) -> SourceKind {
        SourceKind::Image
    }

    fn native_size(&self) -> (u32, u32) {
        self.size
    }

    fn next_frame(&mut self) -> Option<RgbFrame> {
        self.frame.take()
    }
}

// ── Video ─────────────────────────────────────────────────────────────────────

pub struct VideoSource {
    decoder: StreamDecoder,
    /// First frame, decoded during `open` to prove the stream is readable.
    pending: Option<RgbFrame>,
    size:    (u32, u32),
    fps:     f64,
}

impl VideoSource {
    pub fn open(path: &Path) -> Result<Self> {
        let mut decoder = StreamDecoder::open(path)?;
        let first = decoder.next_frame()
            .ok_or_else(|| anyhow!("no frame decoded from '{}'", path.display()))?;

        let fps = if decoder.fps.is_finite() && decoder.fps > 0.0 { decoder.fps } else { FALLBACK_FPS };
        let size = (first.width, first.height);
        tracing::info!(path = %path.display(), width = size.0, height = size.1, fps, "video opened");

        Ok(Self { decoder, pending: Some(first), size, fps })
    }
}

impl FrameSource for VideoSource {
    fn kind(&self) -> SourceKind {
        SourceKind::Video { fps: self.fps }
    }

    fn native_size(&self) -> (u32, u32) {
        self.size
    }

    fn next_frame(&mut self) -> Option<RgbFrame> {
        self.pending.take().or_else(|| self.decoder.next_frame())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn image_source_yields_exactly_once() {
        let mut src = ImageSource::from_frame(RgbFrame::solid(4, 3, [9, 9, 9]));
        assert_eq!(src.kind(), SourceKind::Image);
        assert_eq!(src.native_size(), (4, 3));
        assert!(src.next_frame().is_some());
        assert!(src.next_frame().is_none());
    }

    #[test]
    fn missing_file_is_open_failed() {
        ffmpeg::init().unwrap();
        let dir = std::env::temp_dir().join("showcut-no-such-dir");
        for name in ["clip.mp4", "still.png"] {
            match open_source(&dir.join(name)) {
                Err(RunError::OpenFailed { .. }) => {}
                Err(e) => panic!("unexpected error: {e}"),
                Ok(_) => panic!("missing file opened"),
            }
        }
    }
}
