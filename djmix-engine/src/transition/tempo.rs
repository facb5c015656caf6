//! Tempo matching
//!
//! Brings a track to a target BPM with a pitch-preserving stretch applied to
//! each channel independently. The beat grid of the stretched track is not
//! touched here; callers rescale it with
//! [`TrackAnalysis::rescaled`](djmix_common::TrackAnalysis::rescaled) using
//! the same [`stretch_rate`].

use crate::audio::types::AudioBuffer;
use crate::error::Result;
use crate::stretch::TimeStretch;
use tracing::{debug, info};

/// Tempo differences below this many BPM are treated as already matched
pub const TEMPO_MATCH_THRESHOLD_BPM: f64 = 0.5;

/// Stretch rate needed to move `original_bpm` to `target_bpm`, or `None`
/// when the tempos are already close enough.
pub fn stretch_rate(original_bpm: f64, target_bpm: f64) -> Option<f64> {
    if (original_bpm - target_bpm).abs() < TEMPO_MATCH_THRESHOLD_BPM {
        None
    } else {
        Some(target_bpm / original_bpm)
    }
}

/// Time-stretch `buffer` from `original_bpm` to `target_bpm`.
///
/// Returns the input unchanged when the tempos differ by less than
/// [`TEMPO_MATCH_THRESHOLD_BPM`]. The output length is whatever the
/// stretcher produced (roughly `frames / rate`), truncated to the shortest
/// channel.
pub fn match_tempo(
    buffer: AudioBuffer,
    original_bpm: f64,
    target_bpm: f64,
    stretcher: &dyn TimeStretch,
) -> Result<AudioBuffer> {
    let Some(rate) = stretch_rate(original_bpm, target_bpm) else {
        debug!(
            "Tempo {:.2} BPM already matches {:.2} BPM, not stretching",
            original_bpm, target_bpm
        );
        return Ok(buffer);
    };

    info!(
        "Stretching {:.2} BPM -> {:.2} BPM (rate {:.4})",
        original_bpm, target_bpm, rate
    );

    let sample_rate = buffer.format.sample_rate;
    let stretched = buffer
        .to_planar()
        .iter()
        .map(|channel| stretcher.stretch(channel, sample_rate, rate))
        .collect::<Result<Vec<_>>>()?;

    let output = AudioBuffer::from_planar(stretched, sample_rate);
    debug!(
        "Stretched {} frames to {} frames",
        buffer.frames(),
        output.frames()
    );

    Ok(output)
}
