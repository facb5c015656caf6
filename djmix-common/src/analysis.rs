//! Track analysis values
//!
//! A [`TrackAnalysis`] is produced once per source track by an external
//! analyzer (tempo, beat grid, key, coarse song structure). The engine treats
//! it as read-only input, but derives adapted copies after tempo matching
//! ([`TrackAnalysis::rescaled`]) and after a splice
//! ([`TrackAnalysis::shifted`]).
//!
//! All times are seconds relative to the start of the track.

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Beats per bar assumed throughout the engine
pub const BEATS_PER_BAR: u32 = 4;

/// Camelot value used when the key could not be detected
pub const UNKNOWN_KEY: &str = "Unknown";

/// Tolerance for segment bounds checks (floating point slack)
const BOUNDS_EPSILON: f64 = 1e-6;

/// Half-open time range `[start, end)` in seconds.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Segment {
    pub start: f64,
    pub end: f64,
}

impl Segment {
    pub fn new(start: f64, end: f64) -> Self {
        Self { start, end }
    }

    /// Duration in seconds
    pub fn length(&self) -> f64 {
        self.end - self.start
    }

    fn map(self, f: impl Fn(f64) -> f64) -> Self {
        Self {
            start: f(self.start),
            end: f(self.end),
        }
    }
}

/// Coarse song structure reported by the analyzer.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Segments {
    pub intro: Segment,
    pub buildup: Segment,
    pub drop: Segment,
    pub outro: Segment,
}

impl Segments {
    /// Segments in display order, paired with their names
    pub fn named(&self) -> [(&'static str, Segment); 4] {
        [
            ("intro", self.intro),
            ("buildup", self.buildup),
            ("drop", self.drop),
            ("outro", self.outro),
        ]
    }

    fn map(self, f: impl Fn(f64) -> f64 + Copy) -> Self {
        Self {
            intro: self.intro.map(f),
            buildup: self.buildup.map(f),
            drop: self.drop.map(f),
            outro: self.outro.map(f),
        }
    }
}

/// Result of analyzing one track.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrackAnalysis {
    /// Detected tempo (beats per minute, > 0)
    pub bpm: f64,

    /// Beat timestamps, strictly increasing
    pub beats: Vec<f64>,

    /// Subsequence of `beats` marking bar starts
    #[serde(default)]
    pub downbeats: Vec<f64>,

    /// Camelot key code (`"8A"`, `"11B"`) or `"Unknown"`
    #[serde(default = "default_camelot")]
    pub camelot: String,

    pub segments: Segments,

    /// Track length in seconds
    pub duration: f64,
}

fn default_camelot() -> String {
    UNKNOWN_KEY.to_string()
}

/// Length in seconds of `bars` bars at `bpm`: `(60 / bpm) * 4 * bars`
pub fn bars_duration(bpm: f64, bars: u32) -> f64 {
    (60.0 / bpm) * BEATS_PER_BAR as f64 * bars as f64
}

impl TrackAnalysis {
    /// Load an analysis from a JSON file and validate it.
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let analysis: TrackAnalysis = serde_json::from_str(&content)?;
        analysis.validate()?;
        Ok(analysis)
    }

    /// Write this analysis as pretty-printed JSON.
    pub fn to_json_file(&self, path: &Path) -> Result<()> {
        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Check the analyzer contract: positive tempo, strictly increasing
    /// beats, and segments ordered and inside `[0, duration]`.
    pub fn validate(&self) -> Result<()> {
        if !(self.bpm.is_finite() && self.bpm > 0.0) {
            return Err(Error::InvalidInput(format!(
                "BPM must be positive, got {}",
                self.bpm
            )));
        }

        if !(self.duration.is_finite() && self.duration >= 0.0) {
            return Err(Error::InvalidInput(format!(
                "Duration must be non-negative, got {}",
                self.duration
            )));
        }

        if self.beats.iter().any(|b| !b.is_finite()) {
            return Err(Error::InvalidInput("Beat grid contains non-finite values".to_string()));
        }

        if let Some(pair) = self.beats.windows(2).find(|w| w[1] <= w[0]) {
            return Err(Error::InvalidInput(format!(
                "Beats must be strictly increasing ({:.3}s followed by {:.3}s)",
                pair[0], pair[1]
            )));
        }

        for (name, seg) in self.segments.named() {
            if seg.start > seg.end {
                return Err(Error::InvalidInput(format!(
                    "Segment '{}' starts after it ends ({:.3}s > {:.3}s)",
                    name, seg.start, seg.end
                )));
            }
            if seg.start < -BOUNDS_EPSILON || seg.end > self.duration + BOUNDS_EPSILON {
                return Err(Error::InvalidInput(format!(
                    "Segment '{}' [{:.3}s, {:.3}s) lies outside [0, {:.3}s]",
                    name, seg.start, seg.end, self.duration
                )));
            }
        }

        Ok(())
    }

    /// Adapt this analysis to a track time-stretched by `rate`.
    ///
    /// A stretch at `rate = target_bpm / bpm` shortens the track by `1/rate`,
    /// so every timestamp is divided by `rate` and the tempo becomes
    /// `bpm * rate`.
    pub fn rescaled(&self, rate: f64) -> TrackAnalysis {
        let scale = |t: f64| t / rate;
        TrackAnalysis {
            bpm: self.bpm * rate,
            beats: self.beats.iter().map(|&t| scale(t)).collect(),
            downbeats: self.downbeats.iter().map(|&t| scale(t)).collect(),
            camelot: self.camelot.clone(),
            segments: self.segments.map(scale),
            duration: scale(self.duration),
        }
    }

    /// Move every timestamp by `offset` seconds and replace the duration.
    ///
    /// Used to describe a track after it was spliced into a longer mix
    /// starting `offset` seconds later on the mix timeline.
    pub fn shifted(&self, offset: f64, duration: f64) -> TrackAnalysis {
        let shift = move |t: f64| t + offset;
        TrackAnalysis {
            bpm: self.bpm,
            beats: self.beats.iter().map(|&t| shift(t)).collect(),
            downbeats: self.downbeats.iter().map(|&t| shift(t)).collect(),
            camelot: self.camelot.clone(),
            segments: self.segments.map(shift),
            duration,
        }
    }
}
