// crates/showcut-core/src/error.rs
//
// Run-terminal failures. None of these are retried; the caller starts a new
// run with corrected parameters. They never cross the worker boundary as
// values: the worker turns them into a status line and a Failed outcome.

use thiserror::Error;

use crate::text;

#[derive(Debug, Error)]
pub enum RunError {
    /// The source could not be opened or yielded no decodable frame.
    #[error("cannot open source: {message}")]
    OpenFailed { message: String },

    /// Codec, container or header setup failed for one slice (0-based).
    #[error("encoder init failed for slice {slice}: {message}")]
    EncoderInitFailed { slice: usize, message: String },

    /// Directory creation or output write failed.
    #[error("i/o failure: {message}")]
    IoFailed { message: String },
}

pub type RunResult<T> = Result<T, RunError>;

impl RunError {
    pub fn open(msg: impl Into<String>) -> Self {
        Self::OpenFailed { message: msg.into() }
    }

    pub fn encoder_init(slice: usize, msg: impl Into<String>) -> Self {
        Self::EncoderInitFailed { slice, message: msg.into() }
    }

    pub fn io(msg: impl Into<String>) -> Self {
        Self::IoFailed { message: msg.into() }
    }

    /// Status line shown to the user for this failure.
    pub fn status_line(&self) -> String {
        match self {
            Self::OpenFailed { .. }        => text::ERR_OPEN_FAILED.to_string(),
            Self::EncoderInitFailed { slice, .. } => {
                format!("{} (slice_{}.gif)", text::ERR_ENCODER_INIT, slice + 1)
            }
            Self::IoFailed { message }     => format!("{}: {message}", text::ERR_IO_FAILED),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn open_failure_uses_fixed_status() {
        assert_eq!(RunError::open("boom").status_line(), text::ERR_OPEN_FAILED);
    }

    #[test]
    fn encoder_failure_names_the_file() {
        let line = RunError::encoder_init(2, "no gif muxer").status_line();
        assert!(line.starts_with(text::ERR_ENCODER_INIT));
        assert!(line.ends_with("(slice_3.gif)"));
    }
}
