//! Audio Test Fixture Generator
//!
//! Synthesizes beat-driven test material in memory and as WAV files.

use djmix_common::analysis::BEATS_PER_BAR;
use djmix_common::{AudioFormat, Segment, Segments, TrackAnalysis};
use djmix_engine::{AudioBuffer, Track};
use std::path::Path;

/// Tone settings for generated tracks
#[derive(Debug, Clone, Copy)]
pub struct TestTone {
    /// Pad frequency in Hz
    pub frequency: f32,
    /// Pad amplitude
    pub amplitude: f32,
    /// Click amplitude on every beat
    pub click: f32,
}

impl Default for TestTone {
    fn default() -> Self {
        Self {
            frequency: 220.0,
            amplitude: 0.3,
            click: 0.4,
        }
    }
}

/// Stereo pad tone with a short decaying click on every beat.
pub fn click_track(format: AudioFormat, bpm: f64, seconds: f64, tone: TestTone) -> AudioBuffer {
    let rate = format.sample_rate as f64;
    let frames = format.seconds_to_frames(seconds);
    let beat_frames = (rate * 60.0 / bpm) as usize;
    let click_frames = (rate * 0.02) as usize;
    let channels = format.channels as usize;

    let mut samples = Vec::with_capacity(frames * channels);
    for i in 0..frames {
        let t = i as f64 / rate;
        let pad = (2.0 * std::f64::consts::PI * tone.frequency as f64 * t).sin() as f32 * tone.amplitude;

        let since_beat = i % beat_frames.max(1);
        let click = if since_beat < click_frames {
            let decay = 1.0 - since_beat as f32 / click_frames as f32;
            tone.click * decay * if since_beat % 2 == 0 { 1.0 } else { -1.0 }
        } else {
            0.0
        };

        for _ in 0..channels {
            samples.push(pad + click);
        }
    }

    AudioBuffer::new(samples, format)
}

/// Constant-tempo analysis with the usual coarse structure
/// (intro 15% up to 30s, outro from 85% or the last 30s).
pub fn grid_analysis(bpm: f64, duration: f64, camelot: &str) -> TrackAnalysis {
    let interval = 60.0 / bpm;
    let beats: Vec<f64> = (0..)
        .map(|i| i as f64 * interval)
        .take_while(|&t| t < duration)
        .collect();
    let downbeats = beats.iter().step_by(BEATS_PER_BAR as usize).copied().collect();

    let intro_end = (duration * 0.15).min(30.0);
    let outro_start = (duration * 0.85).max(duration - 30.0);
    let drop = duration * 0.4;

    TrackAnalysis {
        bpm,
        beats,
        downbeats,
        camelot: camelot.to_string(),
        segments: Segments {
            intro: Segment::new(0.0, intro_end),
            buildup: Segment::new(duration * 0.3, drop),
            drop: Segment::new(drop, (drop + 30.0).min(outro_start)),
            outro: Segment::new(outro_start, duration),
        },
        duration,
    }
}

/// In-memory track: click track plus matching grid analysis
pub fn grid_track(format: AudioFormat, bpm: f64, seconds: f64, camelot: &str, tone: TestTone) -> Track {
    let buffer = click_track(format, bpm, seconds, tone);
    let analysis = grid_analysis(bpm, buffer.duration_seconds(), camelot);
    Track::new(buffer, analysis)
}

/// Write `buffer` as a WAV file, 32-bit float or 16-bit integer.
pub fn write_test_wav(path: &Path, buffer: &AudioBuffer, float: bool) -> anyhow::Result<()> {
    let spec = hound::WavSpec {
        channels: buffer.format.channels,
        sample_rate: buffer.format.sample_rate,
        bits_per_sample: if float { 32 } else { 16 },
        sample_format: if float {
            hound::SampleFormat::Float
        } else {
            hound::SampleFormat::Int
        },
    };

    let mut writer = hound::WavWriter::create(path, spec)?;
    for &sample in &buffer.samples {
        if float {
            writer.write_sample(sample)?;
        } else {
            writer.write_sample((sample.clamp(-1.0, 1.0) * i16::MAX as f32) as i16)?;
        }
    }
    writer.finalize()?;
    Ok(())
}
