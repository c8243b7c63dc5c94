// crates/showcut-core/src/cadence.rs
//
// Frame sub-sampling.
//
// The user picks a sampling rate 1–10; higher keeps more frames.
//   rate 10 → divisor 1  → every frame
//   rate  1 → divisor 10 → one frame in ten
// A frame at zero-based index i is kept iff i % divisor == 0, so the first
// frame of a source is always kept.

/// Lowest accepted sampling rate.
pub const MIN_SAMPLING_RATE: u8 = 1;
/// Highest accepted sampling rate (keeps every frame).
pub const MAX_SAMPLING_RATE: u8 = 10;
/// Frame rate assumed when a container declares none.
pub const FALLBACK_FPS: f64 = 30.0;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SamplingCadence {
    divisor: u32,
}

impl SamplingCadence {
    /// `None` when `rate` is outside 1–10.
    pub fn from_rate(rate: u8) -> Option<Self> {
        (MIN_SAMPLING_RATE..=MAX_SAMPLING_RATE)
            .contains(&rate)
            .then(|| Self { divisor: 11 - rate as u32 })
    }

    /// Like `from_rate`, but pins out-of-range rates to the nearest bound.
    pub fn from_rate_clamped(rate: u8) -> Self {
        let rate = rate.clamp(MIN_SAMPLING_RATE, MAX_SAMPLING_RATE);
        Self { divisor: 11 - rate as u32 }
    }

    pub fn divisor(&self) -> u32 {
        self.divisor
    }

    /// Whether the frame at zero-based `index` survives sampling.
    pub fn keeps(&self, index: u64) -> bool {
        index % self.divisor as u64 == 0
    }

    /// Output frame rate for a source declaring `source_fps`.
    ///
    /// Non-positive or non-finite rates fall back to 30 fps first.
    ///
    /// ```
    /// use showcut_core::cadence::SamplingCadence;
    /// let c = SamplingCadence::from_rate(8).unwrap(); // divisor 3
    /// assert_eq!(c.target_fps(30.0), 10);
    /// assert_eq!(c.target_fps(0.0), 10);
    /// assert_eq!(c.target_fps(2.0), 1);
    /// ```
    pub fn target_fps(&self, source_fps: f64) -> u32 {
        let fps = if source_fps.is_finite() && source_fps > 0.0 { source_fps } else { FALLBACK_FPS };
        ((fps / self.divisor as f64).floor() as u32).max(1)
    }

    /// Number of frames kept out of a source of `total` frames.
    pub fn kept_count(&self, total: u64) -> u64 {
        total.div_ceil(self.divisor as u64)
    }
}
