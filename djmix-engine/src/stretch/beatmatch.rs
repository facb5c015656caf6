//! Beatmatch stretching backed by the `timestretch` crate
//!
//! `timestretch` runs a hybrid WSOLA / phase-vocoder stretch tuned for
//! electronic music. Its ratio is output length over input length, the
//! inverse of the tempo rate used throughout the engine.

use super::{validate_rate, TimeStretch};
use crate::error::{Error, Result};
use timestretch::{EdmPreset, StretchParams};
use tracing::trace;

/// Tempo-matching stretcher using the `DjBeatmatch` preset.
#[derive(Debug, Clone, Copy, Default)]
pub struct BeatmatchStretcher;

impl BeatmatchStretcher {
    pub fn new() -> Self {
        Self
    }
}

impl TimeStretch for BeatmatchStretcher {
    fn stretch(&self, samples: &[f32], sample_rate: u32, rate: f64) -> Result<Vec<f32>> {
        validate_rate(rate)?;
        if samples.is_empty() {
            return Ok(Vec::new());
        }

        let params = StretchParams::new(1.0 / rate)
            .with_preset(EdmPreset::DjBeatmatch)
            .with_sample_rate(sample_rate)
            .with_channels(1);

        let output = timestretch::stretch(samples, &params)
            .map_err(|e| Error::Stretch(format!("Stretch at rate {:.4} failed: {}", rate, e)))?;

        trace!(
            "Stretched {} samples to {} at rate {:.4}",
            samples.len(),
            output.len(),
            rate
        );
        Ok(output)
    }
}
