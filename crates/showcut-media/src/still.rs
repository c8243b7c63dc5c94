// crates/showcut-media/src/still.rs
//
// Single-frame GIF writer for image sources. No ffmpeg session is needed for
// a still: the `gif` crate quantizes the slice and writes header, one image
// and trailer in one go.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use showcut_core::{QualityMode, RgbFrame, RunError, RunResult};

/// NeuQuant sample factor: 1 is the slowest/best, 30 the fastest.
pub fn quantize_speed(quality: QualityMode) -> i32 {
    match quality {
        QualityMode::Fastest  => 30,
        QualityMode::Balanced => 20,
        QualityMode::High     => 10,
        QualityMode::Best     => 1,
    }
}

/// Write `frame` to `path` as a static GIF.
pub fn write_still_gif(path: &Path, frame: &RgbFrame, quality: QualityMode) -> RunResult<()> {
    let (w, h) = match (u16::try_from(frame.width), u16::try_from(frame.height)) {
        (Ok(w), Ok(h)) if w > 0 && h > 0 => (w, h),
        _ => {
            return Err(RunError::io(format!(
                "{}: {}x{} cannot be stored in a GIF",
                path.display(), frame.width, frame.height
            )))
        }
    };
    let gif_err = |e: gif::EncodingError| RunError::io(format!("{}: {e}", path.display()));

    let file = File::create(path).map_err(|e| RunError::io(format!("{}: {e}", path.display())))?;
    let mut encoder = gif::Encoder::new(BufWriter::new(file), w, h, &[]).map_err(gif_err)?;

    let image = gif::Frame::from_rgb_speed(w, h, &frame.data, quantize_speed(quality));
    encoder.write_frame(&image).map_err(gif_err)?;

    let mut out = encoder.into_inner().map_err(|e| RunError::io(format!("{}: {e}", path.display())))?;
    out.flush().map_err(|e| RunError::io(format!("{}: {e}", path.display())))?;

    tracing::debug!(path = %path.display(), width = w, height = h, "still slice written");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use showcut_core::patch::GIF_TRAILER;

    #[test]
    fn writes_single_frame_gif() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("slice_1.gif");
        write_still_gif(&path, &RgbFrame::solid(150, 60, [10, 200, 30]), QualityMode::Fastest).unwrap();

        let bytes = std::fs::read(&path).unwrap();
        assert_eq!(&bytes[..6], b"GIF89a");
        assert_eq!(*bytes.last().unwrap(), GIF_TRAILER);

        let mut dec = gif::DecodeOptions::new().read_info(bytes.as_slice()).unwrap();
        assert_eq!((dec.width(), dec.height()), (150, 60));
        assert!(dec.read_next_frame().unwrap().is_some());
        assert!(dec.read_next_frame().unwrap().is_none());
    }

    #[test]
    fn oversized_frame_is_io_failure() {
        let dir = tempfile::tempdir().unwrap();
        let frame = RgbFrame { width: 70_000, height: 1, data: vec![0; 70_000 * 3] };
        let err = write_still_gif(&dir.path().join("x.gif"), &frame, QualityMode::High).unwrap_err();
        assert!(matches!(err, RunError::IoFailed { .. }));
    }
}
