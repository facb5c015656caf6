//! Audio format description threaded through every pipeline stage
//!
//! The mixing pipeline works on 44.1 kHz stereo by default, but every
//! component receives the format explicitly so the core can be exercised
//! against other rates (tests run at reduced rates to stay fast).

use serde::{Deserialize, Serialize};

/// Sample rate and channel count of an interleaved `f32` buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AudioFormat {
    /// Frames per second
    pub sample_rate: u32,

    /// Interleaved channel count
    pub channels: u16,
}

impl AudioFormat {
    /// Pipeline default: 44.1 kHz stereo
    pub const STANDARD: AudioFormat = AudioFormat {
        sample_rate: 44100,
        channels: 2,
    };

    pub const fn new(sample_rate: u32, channels: u16) -> Self {
        Self {
            sample_rate,
            channels,
        }
    }

    /// Convert a time in seconds to a frame index.
    ///
    /// Truncates toward zero; negative or NaN times map to frame 0.
    pub fn seconds_to_frames(&self, seconds: f64) -> usize {
        (seconds * self.sample_rate as f64) as usize
    }

    /// Convert a frame count to seconds.
    pub fn frames_to_seconds(&self, frames: usize) -> f64 {
        frames as f64 / self.sample_rate as f64
    }

    /// Interleaved sample count for the given number of frames.
    pub fn samples_for_frames(&self, frames: usize) -> usize {
        frames * self.channels as usize
    }
}

impl Default for AudioFormat {
    fn default() -> Self {
        Self::STANDARD
    }
}

impl std::fmt::Display for AudioFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} Hz / {} ch", self.sample_rate, self.channels)
    }
}
