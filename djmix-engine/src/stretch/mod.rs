//! Pitch-preserving time-stretch primitive
//!
//! The engine only needs a black-box `stretch(channel, sample_rate, rate)`
//! that shortens a mono channel by `1 / rate` without changing its pitch.
//! [`TimeStretch`] is that seam; [`BeatmatchStretcher`] is the built-in
//! implementation.
//!
//! Output length is approximately `input_len / rate`. Callers must derive
//! the real length from the returned vector rather than assume it.

mod beatmatch;

pub use beatmatch::BeatmatchStretcher;

use crate::error::{Error, Result};

/// Smallest and largest rates accepted by [`validate_rate`]
pub const MIN_RATE: f64 = 0.25;
pub const MAX_RATE: f64 = 4.0;

/// Pitch-preserving time-stretch of a single channel.
pub trait TimeStretch: Send + Sync {
    /// Stretch `samples` (one channel) by `rate`.
    ///
    /// `rate > 1.0` speeds the material up (shorter output), `rate < 1.0`
    /// slows it down.
    fn stretch(&self, samples: &[f32], sample_rate: u32, rate: f64) -> Result<Vec<f32>>;
}

/// Reject rates no stretcher can sensibly honor.
pub fn validate_rate(rate: f64) -> Result<()> {
    if !rate.is_finite() || !(MIN_RATE..=MAX_RATE).contains(&rate) {
        return Err(Error::Stretch(format!(
            "Stretch rate must be within [{}, {}], got {}",
            MIN_RATE, MAX_RATE, rate
        )));
    }
    Ok(())
}
