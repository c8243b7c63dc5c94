// crates/showcut-media/src/slice_encoder.rs
//
// One animated-GIF output per slice.
//
// Design:
//   • `SliceEncoder`: owned by the orchestrator, one per slice index. Either
//     `Closed` or `Encoding(Box<Session>)`; there is no half-open state, so a
//     failed `open` leaves nothing behind but (possibly) an empty file.
//   • `Session`     : output context, opened GIF encoder, RGB24 → RGB8
//     conversion context, one reusable source frame, one reusable
//     destination frame and the pts counter.
//
// PTS strategy:
//   Frame counter starting at 0 in the codec time base 1/fps. The GIF muxer
//   picks its own stream time base (1/100) during write_header, so packets
//   are rescaled codec_tb → stream_tb before muxing.
//
// Error policy:
//   Setup errors are `RunError::EncoderInitFailed`. Once open, nothing is
//   fatal: a frame that fails to convert or encode is logged and skipped,
//   a packet the muxer rejects is logged and dropped.
//
// Teardown:
//   `finish()` sends EOF, drains, writes the trailer and drops the session,
//   which closes the file. Idempotent; `Drop` calls it too.

use std::path::{Path, PathBuf};

use anyhow::{bail, Context as _, Result};

use ffmpeg_the_third as ffmpeg;
use ffmpeg::codec::{self, Id as CodecId};
use ffmpeg::encoder;
use ffmpeg::format::{output as open_output, Pixel};
use ffmpeg::software::scaling::{Context as ScaleCtx, Flags as ScaleFlags};
use ffmpeg::util::frame::video::Video as VideoFrame;
use ffmpeg::util::rational::Rational;
use ffmpeg::Packet;

use showcut_core::{QualityMode, RgbFrame, RunError, RunResult};

use crate::helpers::rgb::write_rgb;

/// Palette-conversion filter for a quality mode.
pub fn conversion_flags(quality: QualityMode) -> ScaleFlags {
    match quality {
        QualityMode::Fastest  => ScaleFlags::POINT,
        QualityMode::Balanced => ScaleFlags::BILINEAR,
        QualityMode::High     => ScaleFlags::BICUBIC,
        QualityMode::Best     => ScaleFlags::LANCZOS,
    }
}

enum EncoderState {
    Closed,
    Encoding(Box<Session>),
}

pub struct SliceEncoder {
    index: usize,
    path:  PathBuf,
    state: EncoderState,
}

impl SliceEncoder {
    /// Create `path`, set up the GIF encoder for `width × height` at `fps`
    /// and write the container header.
    pub fn open(
        index:   usize,
        path:    &Path,
        width:   u32,
        height:  u32,
        fps:     u32,
        quality: QualityMode,
    ) -> RunResult<Self> {
        let session = Session::open(path, width, height, fps.max(1), quality).map_err(|e| {
            tracing::warn!(slice = index, path = %path.display(), error = format!("{e:#}"),
                "slice encoder init failed");
            RunError::encoder_init(index, format!("{e:#}"))
        })?;
        tracing::debug!(slice = index, path = %path.display(), width, height, fps, "slice encoder open");
        Ok(Self {
            index,
            path:  path.to_path_buf(),
            state: EncoderState::Encoding(Box::new(session)),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn is_open(&self) -> bool {
        matches!(self.state, EncoderState::Encoding(_))
    }

    /// Encode one slice frame. Ignored when closed or when `frame` does not
    /// match the session size.
    pub fn push(&mut self, frame: &RgbFrame) {
        let EncoderState::Encoding(session) = &mut self.state else {
            return;
        };
        if (frame.width, frame.height) != (session.width, session.height) {
            tracing::debug!(slice = self.index, got_w = frame.width, got_h = frame.height,
                "frame size mismatch, skipped");
            return;
        }
        if let Err(e) = session.encode(frame) {
            tracing::warn!(slice = self.index, error = format!("{e:#}"), "frame skipped");
        }
    }

    /// Flush, write the trailer, close the file. Safe to call repeatedly.
    pub fn finish(&mut self) {
        let state = std::mem::replace(&mut self.state, EncoderState::Closed);
        if let EncoderState::Encoding(session) = state {
            let frames = session.next_pts;
            (*session).close(self.index);
            tracing::debug!(slice = self.index, frames, path = %self.path.display(), "slice encoder closed");
        }
    }
}

impl Drop for SliceEncoder {
    fn drop(&mut self) {
        self.finish();
    }
}

// ── Session ───────────────────────────────────────────────────────────────────

struct Session {
    octx:      ffmpeg::format::context::Output,
    encoder:   ffmpeg::encoder::video::Video,
    scaler:    ScaleCtx,
    /// RGB24 staging frame; only ever read by swscale.
    src:       VideoFrame,
    /// RGB8 frame handed to the encoder, made writable before each reuse.
    dst:       VideoFrame,
    width:     u32,
    height:    u32,
    next_pts:  i64,
    codec_tb:  Rational,
    stream_tb: Rational,
}

impl Session {
    fn open(path: &Path, width: u32, height: u32, fps: u32, quality: QualityMode) -> Result<Self> {
        if width == 0 || height == 0 {
            bail!("invalid slice size {width}x{height}");
        }

        let gif = encoder::find(CodecId::GIF)
            .context("GIF encoder not found")?;

        let mut octx = open_output(&path)
            .with_context(|| format!("could not open output '{}'", path.display()))?;

        let codec_tb = Rational::new(1, fps as i32);

        let mut ost = octx.add_stream(gif).context("add GIF stream")?;
        ost.set_time_base(codec_tb);

        let enc_ctx = codec::context::Context::new_with_codec(gif);
        let mut enc = enc_ctx.encoder().video().context("create GIF encoder context")?;
        enc.set_width(width);
        enc.set_height(height);
        enc.set_format(Pixel::RGB8);
        enc.set_time_base(codec_tb);
        enc.set_frame_rate(Some(Rational::new(fps as i32, 1)));

        let encoder = enc.open_as_with(gif, ffmpeg::Dictionary::new())
            .context("open GIF encoder")?;

        // encoder::Video does not implement AsPtr<AVCodecParameters>, so the
        // stream parameters are filled through FFI.
        unsafe {
            let ret = ffmpeg::ffi::avcodec_parameters_from_context(
                (**(*octx.as_mut_ptr()).streams.add(0)).codecpar,
                encoder.as_ptr() as *mut ffmpeg::ffi::AVCodecContext,
            );
            if ret < 0 {
                bail!("avcodec_parameters_from_context failed: {ret}");
            }
        }

        let scaler = ScaleCtx::get(
            Pixel::RGB24, width, height,
            Pixel::RGB8,  width, height,
            conversion_flags(quality),
        ).context("create palette conversion context")?;

        octx.write_header().context("write GIF header")?;

        let stream_tb = octx.stream(0)
            .map(|s| s.time_base())
            .context("GIF stream missing after header")?;

        Ok(Self {
            octx,
            encoder,
            scaler,
            src: VideoFrame::new(Pixel::RGB24, width, height),
            dst: VideoFrame::new(Pixel::RGB8, width, height),
            width,
            height,
            next_pts: 0,
            codec_tb,
            stream_tb,
        })
    }

    fn encode(&mut self, frame: &RgbFrame) -> Result<()> {
        write_rgb(frame, &mut self.src);

        // The encoder may still reference the previous dst buffer.
        unsafe {
            let ret = ffmpeg::ffi::av_frame_make_writable(self.dst.as_mut_ptr());
            if ret < 0 {
                bail!("av_frame_make_writable failed: {ret}");
            }
        }
        self.scaler.run(&self.src, &mut self.dst).context("convert to RGB8")?;

        // pts only advances for frames the encoder accepted.
        self.dst.set_pts(Some(self.next_pts));
        self.encoder.send_frame(&self.dst).context("send frame to GIF encoder")?;
        self.next_pts += 1;
        self.drain();
        Ok(())
    }

    fn drain(&mut self) {
        let mut pkt = Packet::empty();
        while self.encoder.receive_packet(&mut pkt).is_ok() {
            pkt.set_stream(0);
            pkt.rescale_ts(self.codec_tb, self.stream_tb);
            if let Err(e) = pkt.write_interleaved(&mut self.octx) {
                tracing::warn!(error = %e, "GIF packet dropped");
            }
        }
    }

    fn close(mut self, index: usize) {
        if let Err(e) = self.encoder.send_eof() {
            tracing::warn!(slice = index, error = %e, "send EOF to GIF encoder");
        }
        self.drain();
        if let Err(e) = self.octx.write_trailer() {
            tracing::warn!(slice = index, error = %e, "write GIF trailer");
        }
        // Dropping `self` releases the codec, swscale and the output file.
    }
}
