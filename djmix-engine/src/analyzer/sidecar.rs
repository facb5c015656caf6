//! JSON sidecar analyzer
//!
//! Reads `<track>.analysis.json` written by an external analysis tool
//! (for `intro.mp3` that is `intro.analysis.json` in the same directory).

use super::Analyzer;
use crate::audio::types::AudioBuffer;
use crate::error::{Error, Result};
use djmix_common::TrackAnalysis;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Slack allowed between the recorded and decoded durations
const DURATION_MISMATCH_WARN_SECONDS: f64 = 1.0;

/// Loads precomputed analyses stored next to the audio files.
#[derive(Debug, Clone, Copy, Default)]
pub struct SidecarAnalyzer;

impl SidecarAnalyzer {
    pub fn new() -> Self {
        Self
    }

    /// Sidecar location for an audio file
    pub fn sidecar_path(audio_path: &Path) -> PathBuf {
        audio_path.with_extension("analysis.json")
    }
}

impl Analyzer for SidecarAnalyzer {
    fn analyze(&self, path: &Path, audio: &AudioBuffer) -> Result<TrackAnalysis> {
        let sidecar = Self::sidecar_path(path);
        if !sidecar.exists() {
            return Err(Error::Analysis(format!(
                "No analysis found for {} (expected {}; pass --bpm to build a beat grid instead)",
                path.display(),
                sidecar.display()
            )));
        }

        debug!("Loading analysis from {}", sidecar.display());
        let analysis = TrackAnalysis::from_json_file(&sidecar).map_err(|e| {
            Error::Analysis(format!("Rejected analysis {}: {}", sidecar.display(), e))
        })?;

        let decoded = audio.duration_seconds();
        if (analysis.duration - decoded).abs() > DURATION_MISMATCH_WARN_SECONDS {
            warn!(
                "Analysis of {} reports {:.2}s but the decoded audio is {:.2}s",
                path.display(),
                analysis.duration,
                decoded
            );
        }

        Ok(analysis)
    }

    fn name(&self) -> &'static str {
        "sidecar"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use djmix_common::{AudioFormat, Segment, Segments};

    fn analysis() -> TrackAnalysis {
        TrackAnalysis {
            bpm: 124.0,
            beats: vec![0.1, 0.58],
            downbeats: vec![0.1],
            camelot: "5A".to_string(),
            segments: Segments {
                intro: Segment::new(0.0, 0.5),
                buildup: Segment::new(0.5, 0.6),
                drop: Segment::new(0.6, 0.8),
                outro: Segment::new(0.8, 1.0),
            },
            duration: 1.0,
        }
    }

    #[test]
    fn test_sidecar_path() {
        assert_eq!(
            SidecarAnalyzer::sidecar_path(Path::new("/music/intro.mp3")),
            PathBuf::from("/music/intro.analysis.json")
        );
    }

    #[test]
    fn test_loads_sidecar() {
        let dir = tempfile::tempdir().unwrap();
        let track = dir.path().join("track.wav");
        analysis()
            .to_json_file(&SidecarAnalyzer::sidecar_path(&track))
            .unwrap();

        let audio = AudioBuffer::silence(8000, AudioFormat::new(8000, 2));
        let loaded = SidecarAnalyzer::new().analyze(&track, &audio).unwrap();
        assert_eq!(loaded, analysis());
    }

    #[test]
    fn test_missing_sidecar_is_analysis_error() {
        let dir = tempfile::tempdir().unwrap();
        let audio = AudioBuffer::silence(10, AudioFormat::STANDARD);
        let result = SidecarAnalyzer::new().analyze(&dir.path().join("none.wav"), &audio);
        assert!(matches!(result, Err(Error::Analysis(_))));
    }

    #[test]
    fn test_invalid_sidecar_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let track = dir.path().join("track.wav");
        let mut bad = analysis();
        bad.beats = vec![0.5, 0.2];
        bad.to_json_file(&SidecarAnalyzer::sidecar_path(&track)).unwrap();

        let audio = AudioBuffer::silence(10, AudioFormat::STANDARD);
        assert!(SidecarAnalyzer::new().analyze(&track, &audio).is_err());
    }
}
