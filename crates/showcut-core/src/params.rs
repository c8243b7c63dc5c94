// crates/showcut-core/src/params.rs
//
// Run parameters handed from the front-end to the worker. Validated once at
// construction; the worker only ever reads them.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::cadence::SamplingCadence;

/// Resampling quality. Controls both the strip resize filter and the colour
/// conversion filter inside each slice encoder.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum QualityMode {
    /// Nearest neighbour.
    Fastest,
    /// Bilinear.
    Balanced,
    /// Area-averaged resize, bicubic conversion.
    High,
    /// Lanczos.
    Best,
}

impl QualityMode {
    pub fn from_index(index: u8) -> Option<Self> {
        match index {
            0 => Some(Self::Fastest),
            1 => Some(Self::Balanced),
            2 => Some(Self::High),
            3 => Some(Self::Best),
            _ => None,
        }
    }

    pub fn index(self) -> u8 {
        match self {
            Self::Fastest  => 0,
            Self::Balanced => 1,
            Self::High     => 2,
            Self::Best     => 3,
        }
    }

    /// Quality 2 and above downsample the strip with an area filter.
    pub fn prefers_area_resize(self) -> bool {
        self.index() >= 2
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Fastest  => "Fast     (nearest)",
            Self::Balanced => "Balanced (bilinear)",
            Self::High     => "High     (bicubic)",
            Self::Best     => "Best     (Lanczos)",
        }
    }
}

impl Default for QualityMode {
    fn default() -> Self {
        Self::High
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParamError {
    #[error("sampling rate {0} is outside 1..=10")]
    SamplingRate(u8),
    #[error("quality mode {0} is outside 0..=3")]
    Quality(u8),
}

/// Everything one run needs. Immutable once built; only constructible through
/// `new`, so the rate and quality are always in range.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct TaskParameters {
    pub source:        PathBuf,
    pub output_dir:    PathBuf,
    sampling_rate:     u8,
    quality:           QualityMode,
}

impl TaskParameters {
    pub fn new(
        source:        impl Into<PathBuf>,
        output_dir:    impl Into<PathBuf>,
        sampling_rate: u8,
        quality:       u8,
    ) -> Result<Self, ParamError> {
        if SamplingCadence::from_rate(sampling_rate).is_none() {
            return Err(ParamError::SamplingRate(sampling_rate));
        }
        let quality = QualityMode::from_index(quality).ok_or(ParamError::Quality(quality))?;
        Ok(Self {
            source:     source.into(),
            output_dir: output_dir.into(),
            sampling_rate,
            quality,
        })
    }

    pub fn sampling_rate(&self) -> u8 {
        self.sampling_rate
    }

    pub fn quality(&self) -> QualityMode {
        self.quality
    }

    pub fn cadence(&self) -> SamplingCadence {
        // Range checked in `new`, so clamping never changes the value.
        SamplingCadence::from_rate_clamped(self.sampling_rate)
    }

    /// Output path of the 0-based slice `index` (`slice_1.gif` …).
    pub fn slice_path(&self, index: usize) -> PathBuf {
        self.output_dir.join(format!("slice_{}.gif", index + 1))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_out_of_range_values() {
        assert_eq!(TaskParameters::new("a.mp4", "out", 0, 2), Err(ParamError::SamplingRate(0)));
        assert_eq!(TaskParameters::new("a.mp4", "out", 11, 2), Err(ParamError::SamplingRate(11)));
        assert_eq!(TaskParameters::new("a.mp4", "out", 5, 4), Err(ParamError::Quality(4)));
    }

    #[test]
    fn slice_paths_are_one_based() {
        let p = TaskParameters::new("a.mp4", "out", 10, 0).unwrap();
        assert_eq!(p.slice_path(0), PathBuf::from("out").join("slice_1.gif"));
        assert_eq!(p.slice_path(4), PathBuf::from("out").join("slice_5.gif"));
    }

    #[test]
    fn cadence_follows_rate() {
        let p = TaskParameters::new("a.mp4", "out", 7, 1).unwrap();
        assert_eq!(p.cadence().divisor(), 4);
        assert_eq!(p.quality(), QualityMode::Balanced);
    }

    #[test]
    fn quality_index_round_trips() {
        for i in 0..4 {
            assert_eq!(QualityMode::from_index(i).unwrap().index(), i);
        }
        assert!(!QualityMode::Balanced.prefers_area_resize());
        assert!(QualityMode::High.prefers_area_resize());
    }
}
