//! Core audio data types
//!
//! [`AudioBuffer`] holds a whole track (or a whole accumulated mix) in RAM.
//!
//! **Format:**
//! - Samples are f32 (nominally -1.0 to 1.0)
//! - Interleaved: [L, R, L, R, ...] for stereo
//! - Sample rate and channel count carried explicitly in [`AudioFormat`]

use djmix_common::AudioFormat;

/// Fully materialized interleaved audio.
///
/// Each pipeline stage owns its buffer outright; transforms either mutate
/// in place or return a new buffer that supersedes the input.
#[derive(Debug, Clone, PartialEq)]
pub struct AudioBuffer {
    /// Interleaved PCM samples, length is a multiple of `format.channels`
    pub samples: Vec<f32>,

    pub format: AudioFormat,
}

impl AudioBuffer {
    /// Wrap interleaved samples. Trailing samples that do not form a whole
    /// frame are dropped.
    pub fn new(mut samples: Vec<f32>, format: AudioFormat) -> Self {
        let channels = format.channels.max(1) as usize;
        let whole = samples.len() - samples.len() % channels;
        samples.truncate(whole);
        Self { samples, format }
    }

    /// Silent buffer of `frames` frames
    pub fn silence(frames: usize, format: AudioFormat) -> Self {
        Self {
            samples: vec![0.0; format.samples_for_frames(frames)],
            format,
        }
    }

    /// Build from one vector per channel, truncating to the shortest channel.
    pub fn from_planar(planar: Vec<Vec<f32>>, sample_rate: u32) -> Self {
        let channels = planar.len();
        let frames = planar.iter().map(|c| c.len()).min().unwrap_or(0);
        let mut samples = Vec::with_capacity(frames * channels);

        for frame_idx in 0..frames {
            for channel in &planar {
                samples.push(channel[frame_idx]);
            }
        }

        Self {
            samples,
            format: AudioFormat::new(sample_rate, channels as u16),
        }
    }

    /// Split into one vector per channel.
    ///
    /// Input:  [L, R, L, R, ...]
    /// Output: [[L, L, ...], [R, R, ...]]
    pub fn to_planar(&self) -> Vec<Vec<f32>> {
        let channels = self.channels();
        let frames = self.frames();
        let mut planar = vec![Vec::with_capacity(frames); channels];

        for frame in self.samples.chunks_exact(channels) {
            for (ch_idx, &sample) in frame.iter().enumerate() {
                planar[ch_idx].push(sample);
            }
        }

        planar
    }

    pub fn channels(&self) -> usize {
        self.format.channels.max(1) as usize
    }

    /// Number of frames (samples per channel)
    pub fn frames(&self) -> usize {
        self.samples.len() / self.channels()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn duration_seconds(&self) -> f64 {
        self.format.frames_to_seconds(self.frames())
    }

    /// Keep only the first `frames` frames.
    pub fn truncate_frames(&mut self, frames: usize) {
        let len = self.format.samples_for_frames(frames);
        self.samples.truncate(len);
    }

    /// Interleaved samples of frames `[start, end)`, clamped to the buffer.
    pub fn frame_range(&self, start: usize, end: usize) -> &[f32] {
        let frames = self.frames();
        let end = end.min(frames);
        let start = start.min(end);
        let ch = self.channels();
        &self.samples[start * ch..end * ch]
    }

    /// Largest absolute sample value (0.0 for an empty buffer)
    pub fn peak(&self) -> f32 {
        self.samples.iter().fold(0.0f32, |acc, s| acc.max(s.abs()))
    }

    /// Root mean square over all samples of all channels
    pub fn rms(&self) -> f64 {
        if self.samples.is_empty() {
            return 0.0;
        }
        let sum_squares: f64 = self.samples.iter().map(|&s| (s as f64).powi(2)).sum();
        (sum_squares / self.samples.len() as f64).sqrt()
    }

    /// True when every sample is finite (no NaN or infinity)
    pub fn is_finite(&self) -> bool {
        self.samples.iter().all(|s| s.is_finite())
    }
}
