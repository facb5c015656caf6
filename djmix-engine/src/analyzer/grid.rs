//! Constant-tempo grid analyzer
//!
//! For tracks whose tempo is already known (electronic music produced on a
//! grid), the beat positions follow directly from the BPM and the time of
//! the first beat. Song structure is estimated from the loudness envelope:
//!
//! - intro: `[0, min(15% of duration, 30s))`
//! - outro: `[max(85% of duration, duration - 30s), duration)`
//! - drop: first envelope frame louder than 1.2x the mean, lasting up to 30s
//! - buildup: the 16s leading into the drop
//!
//! When no frame stands out the drop is placed at 40% and the buildup at
//! 30-40% of the track.

use super::Analyzer;
use crate::audio::types::AudioBuffer;
use crate::error::{Error, Result};
use djmix_common::analysis::{BEATS_PER_BAR, UNKNOWN_KEY};
use djmix_common::camelot::CamelotKey;
use djmix_common::{Segment, Segments, TrackAnalysis};
use std::path::Path;
use tracing::{debug, warn};

/// Envelope analysis frame length in samples
const ENERGY_FRAME_LEN: usize = 2048;

/// Envelope hop in samples
const ENERGY_HOP: usize = 512;

/// A frame this many times louder than the mean marks the drop
const DROP_ENERGY_RATIO: f64 = 1.2;

const MAX_INTRO_SECONDS: f64 = 30.0;
const MAX_OUTRO_SECONDS: f64 = 30.0;
const MAX_DROP_SECONDS: f64 = 30.0;
const BUILDUP_SECONDS: f64 = 16.0;

/// Analyzer for tracks with a known, constant tempo.
#[derive(Debug, Clone)]
pub struct GridAnalyzer {
    pub bpm: f64,

    /// Time of the first beat in seconds
    pub first_beat: f64,

    /// Camelot code, if known
    pub camelot: Option<String>,
}

impl GridAnalyzer {
    pub fn new(bpm: f64, first_beat: f64, camelot: Option<String>) -> Result<Self> {
        if !(bpm.is_finite() && bpm > 0.0) {
            return Err(Error::InvalidInput(format!("BPM must be positive, got {}", bpm)));
        }
        if !(first_beat.is_finite() && first_beat >= 0.0) {
            return Err(Error::InvalidInput(format!(
                "First beat must be a non-negative time, got {}",
                first_beat
            )));
        }
        Ok(Self {
            bpm,
            first_beat,
            camelot,
        })
    }

    /// Beat timestamps from `first_beat` to the end of the track.
    pub fn beat_grid(&self, duration: f64) -> Vec<f64> {
        let interval = 60.0 / self.bpm;
        (0..)
            .map(|i| self.first_beat + i as f64 * interval)
            .take_while(|&t| t < duration)
            .collect()
    }

    fn camelot_code(&self) -> String {
        match &self.camelot {
            None => UNKNOWN_KEY.to_string(),
            Some(code) => match CamelotKey::parse(code) {
                Some(key) => key.to_string(),
                None => {
                    warn!("Ignoring unrecognized key code '{}'", code);
                    UNKNOWN_KEY.to_string()
                }
            },
        }
    }
}

impl Analyzer for GridAnalyzer {
    fn analyze(&self, path: &Path, audio: &AudioBuffer) -> Result<TrackAnalysis> {
        let duration = audio.duration_seconds();
        let beats = self.beat_grid(duration);
        let downbeats = beats
            .iter()
            .step_by(BEATS_PER_BAR as usize)
            .copied()
            .collect();

        let envelope = energy_envelope(audio);
        let drop_start = find_drop(&envelope, audio.format.sample_rate);
        let segments = detect_segments(duration, drop_start);

        debug!(
            "Grid analysis of {}: {:.2} BPM, {} beats, drop at {:.2}s",
            path.display(),
            self.bpm,
            beats.len(),
            segments.drop.start
        );

        Ok(TrackAnalysis {
            bpm: self.bpm,
            beats,
            downbeats,
            camelot: self.camelot_code(),
            segments,
            duration,
        })
    }

    fn name(&self) -> &'static str {
        "grid"
    }
}

/// Per-frame RMS of the mono downmix, normalized to a peak of 1.0.
fn energy_envelope(audio: &AudioBuffer) -> Vec<f64> {
    let channels = audio.channels();
    let mono: Vec<f64> = audio
        .samples
        .chunks_exact(channels)
        .map(|frame| frame.iter().map(|&s| s as f64).sum::<f64>() / channels as f64)
        .collect();

    if mono.len() < ENERGY_FRAME_LEN {
        return Vec::new();
    }

    let rms: Vec<f64> = (0..=(mono.len() - ENERGY_FRAME_LEN) / ENERGY_HOP)
        .map(|i| {
            let frame = &mono[i * ENERGY_HOP..i * ENERGY_HOP + ENERGY_FRAME_LEN];
            (frame.iter().map(|s| s * s).sum::<f64>() / ENERGY_FRAME_LEN as f64).sqrt()
        })
        .collect();

    let peak = rms.iter().cloned().fold(0.0, f64::max);
    if peak > 0.0 {
        rms.into_iter().map(|e| e / peak).collect()
    } else {
        rms
    }
}

/// Time of the first frame clearly louder than average, if any.
fn find_drop(envelope: &[f64], sample_rate: u32) -> Option<f64> {
    if envelope.is_empty() {
        return None;
    }
    let mean = envelope.iter().sum::<f64>() / envelope.len() as f64;
    let threshold = mean * DROP_ENERGY_RATIO;
    envelope
        .iter()
        .position(|&e| e > threshold)
        .map(|frame| (frame * ENERGY_HOP) as f64 / sample_rate as f64)
}

/// Coarse song structure for a track of `duration` seconds.
pub(crate) fn detect_segments(duration: f64, drop_start: Option<f64>) -> Segments {
    let intro_end = (duration * 0.15).min(MAX_INTRO_SECONDS);
    let outro_start = (duration * 0.85).max(duration - MAX_OUTRO_SECONDS);

    let (drop_start, buildup) = match drop_start {
        Some(drop) => (drop, Segment::new((drop - BUILDUP_SECONDS).max(0.0), drop)),
        None => (duration * 0.4, Segment::new(duration * 0.3, duration * 0.4)),
    };

    let drop_end = (drop_start + MAX_DROP_SECONDS).min(outro_start).max(drop_start);

    Segments {
        intro: Segment::new(0.0, intro_end),
        buildup,
        drop: Segment::new(drop_start, drop_end),
        outro: Segment::new(outro_start, duration),
    }
}
