// crates/showcut-media/src/lib.rs
//
// ffmpeg-backed half of showcut. Talks to the front-end through the
// ShowcaseWorker event channel only.
//
// Call `init()` once per process before opening any source or encoder.

mod helpers;
pub mod pipeline;
pub mod resize;
pub mod slice_encoder;
pub mod source;
pub mod still;
pub mod worker;

use ffmpeg_the_third as ffmpeg;

pub use source::{open_source, FrameSource, SourceKind};
pub use worker::ShowcaseWorker;

/// Register codecs/formats and silence ffmpeg's own stderr logging.
pub fn init() -> anyhow::Result<()> {
    ffmpeg::init()?;
    ffmpeg::util::log::set_level(ffmpeg::util::log::Level::Quiet);
    tracing::debug!("ffmpeg initialised");
    Ok(())
}
