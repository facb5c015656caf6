//! Loudness normalization
//!
//! Final leveling pass over a finished mix: scale the whole buffer so its
//! RMS sits at the target level, then pull the peak back to 0.99 if the gain
//! pushed it past full scale. Silent buffers are returned untouched.

use crate::audio::types::AudioBuffer;
use tracing::{debug, info};

/// Default loudness target in dBFS RMS
pub const DEFAULT_TARGET_DB: f64 = -14.0;

/// Peak level after clipping protection
pub const PEAK_CEILING: f32 = 0.99;

/// Level `buffer` to `target_db` (dBFS RMS).
pub fn normalize(mut buffer: AudioBuffer, target_db: f64) -> AudioBuffer {
    let rms = buffer.rms();
    if rms <= 0.0 {
        debug!("Silent buffer, skipping normalization");
        return buffer;
    }

    let current_db = 20.0 * rms.log10();
    let gain = 10f64.powf((target_db - current_db) / 20.0) as f32;
    for sample in &mut buffer.samples {
        *sample *= gain;
    }

    let peak = buffer.peak();
    if peak > 1.0 {
        let scale = PEAK_CEILING / peak;
        for sample in &mut buffer.samples {
            *sample *= scale;
        }
        debug!("Peak {:.3} after gain, scaled to {}", peak, PEAK_CEILING);
    }

    info!("Normalized: {:.1} dB -> {:.1} dB", current_db, target_db);
    buffer
}
