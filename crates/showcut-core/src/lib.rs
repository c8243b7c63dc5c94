// crates/showcut-core/src/lib.rs
//
// Pure data and logic shared by showcut-media and showcut-cli.
// No ffmpeg, no threads: everything here is testable without a codec.

pub mod cadence;
pub mod config;
pub mod error;
pub mod events;
pub mod frame;
pub mod geometry;
pub mod logging;
pub mod params;
pub mod patch;
pub mod scan;
pub mod text;

pub use error::{RunError, RunResult};
pub use events::{PhaseCell, RunEvent, RunOutcome, RunPhase, RunStatus};
pub use frame::RgbFrame;
pub use params::{QualityMode, TaskParameters};
