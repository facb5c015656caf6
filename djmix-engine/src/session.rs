//! File-level mixing jobs
//!
//! A [`MixSession`] wires the pipeline stages to the filesystem:
//! decode → analyze → mix or extend → normalize → write WAV.
//!
//! Output paths are validated before any audio is decoded, and a failed
//! write leaves no partial output behind. Passthrough results (a single-track
//! playlist, or an extension whose target the source already covers) are
//! written without normalization so their samples match the decoded input.

use crate::analyzer::Analyzer;
use crate::audio::{SimpleDecoder, WavEncoder};
use crate::error::{Error, Result};
use crate::mix::{extend_track, mix_playlist, AnalysisPropagation, MixOptions, OffsetShift, Track};
use crate::normalize::normalize;
use crate::stretch::{BeatmatchStretcher, TimeStretch};
use crate::AudioBuffer;
use djmix_common::human_time::format_duration;
use djmix_common::{AudioFormat, TrackAnalysis};
use std::path::{Path, PathBuf};
use tracing::info;

/// Summary of a finished job.
#[derive(Debug, Clone, PartialEq)]
pub struct MixReport {
    pub output: PathBuf,

    /// Output length in seconds
    pub duration: f64,

    /// Crossfades performed
    pub splices: usize,

    /// False for passthrough output
    pub normalized: bool,
}

/// Pipeline configuration plus its pluggable collaborators.
pub struct MixSession {
    pub format: AudioFormat,
    pub options: MixOptions,
    pub target_db: f64,
    analyzer: Box<dyn Analyzer>,
    stretcher: Box<dyn TimeStretch>,
    propagation: Box<dyn AnalysisPropagation>,
}

impl MixSession {
    /// Session at the standard pipeline format with the built-in stretcher
    /// and offset-shift propagation.
    pub fn new(options: MixOptions, target_db: f64, analyzer: Box<dyn Analyzer>) -> Self {
        Self {
            format: AudioFormat::STANDARD,
            options,
            target_db,
            analyzer,
            stretcher: Box::new(BeatmatchStretcher::new()),
            propagation: Box::new(OffsetShift),
        }
    }

    /// Override the pipeline format.
    pub fn with_format(mut self, format: AudioFormat) -> Self {
        self.format = format;
        self
    }

    pub fn with_stretcher(mut self, stretcher: Box<dyn TimeStretch>) -> Self {
        self.stretcher = stretcher;
        self
    }

    pub fn with_propagation(mut self, propagation: Box<dyn AnalysisPropagation>) -> Self {
        self.propagation = propagation;
        self
    }

    /// Decode and analyze one file.
    pub fn load_track(&self, path: &Path) -> Result<Track> {
        let buffer = SimpleDecoder::decode_file(path, self.format)?;
        let analysis = self.analyzer.analyze(path, &buffer)?;
        analysis.validate()?;

        info!(
            "Loaded {} ({}, {:.2} BPM, key {}, {} analysis)",
            path.display(),
            format_duration(buffer.duration_seconds()),
            analysis.bpm,
            analysis.camelot,
            self.analyzer.name()
        );

        Ok(Track::new(buffer, analysis))
    }

    /// Analyze one file without mixing.
    pub fn analyze_file(&self, path: &Path) -> Result<TrackAnalysis> {
        Ok(self.load_track(path)?.analysis)
    }

    /// Mix `inputs` in order and write the result to `output`.
    pub fn mix_files(&self, inputs: &[PathBuf], output: &Path) -> Result<MixReport> {
        WavEncoder::check_extension(output)?;
        if inputs.is_empty() {
            return Err(Error::InvalidInput("No input tracks given".to_string()));
        }

        let tracks = inputs
            .iter()
            .map(|path| self.load_track(path))
            .collect::<Result<Vec<_>>>()?;

        let state = mix_playlist(tracks, &self.options, self.stretcher.as_ref(), self.propagation.as_ref())?;
        let passthrough = state.splices == 0;

        self.finish(state.buffer, output, state.splices, !passthrough)
    }

    /// Loop `input` until it lasts at least `target_duration` seconds and
    /// write the result to `output`.
    pub fn extend_file(&self, input: &Path, target_duration: f64, output: &Path) -> Result<MixReport> {
        WavEncoder::check_extension(output)?;

        let track = self.load_track(input)?;
        let result = extend_track(&track, &self.options, target_duration)?;
        let passthrough = result.is_passthrough();

        self.finish(result.buffer, output, result.iterations as usize, !passthrough)
    }

    fn finish(&self, buffer: AudioBuffer, output: &Path, splices: usize, normalize_output: bool) -> Result<MixReport> {
        let buffer = if normalize_output {
            normalize(buffer, self.target_db)
        } else {
            info!("Passthrough output, skipping normalization");
            buffer
        };

        WavEncoder::write_file(output, &buffer)?;

        let report = MixReport {
            output: output.to_path_buf(),
            duration: buffer.duration_seconds(),
            splices,
            normalized: normalize_output,
        };
        info!(
            "Wrote {} ({}, {} splices)",
            report.output.display(),
            format_duration(report.duration),
            report.splices
        );
        Ok(report)
    }
}

/// Human-readable analysis summary.
pub fn analysis_report(path: &Path, analysis: &TrackAnalysis) -> String {
    let mut out = format!(
        "Track:     {}\n\
         Duration:  {}\n\
         BPM:       {:.2}\n\
         Beats:     {} ({} downbeats)\n\
         Key:       {}\n\
         Segments:\n",
        path.display(),
        format_duration(analysis.duration),
        analysis.bpm,
        analysis.beats.len(),
        analysis.downbeats.len(),
        analysis.camelot
    );
    for (name, segment) in analysis.segments.named() {
        out.push_str(&format!(
            "  {:<8} {:>9} - {:>9} ({})\n",
            name,
            format_duration(segment.start),
            format_duration(segment.end),
            format_duration(segment.length())
        ));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analyzer::GridAnalyzer;
    use djmix_common::{Segment, Segments};

    fn session() -> MixSession {
        let analyzer = GridAnalyzer::new(120.0, 0.0, None).unwrap();
        MixSession::new(MixOptions::default(), -14.0, Box::new(analyzer))
    }

    #[test]
    fn test_bad_output_extension_fails_before_decoding() {
        let dir = tempfile::tempdir().unwrap();
        let output = dir.path().join("mix.mp3");
        let result = session().mix_files(&[PathBuf::from("/nonexistent.wav")], &output);
        assert!(matches!(result, Err(Error::InvalidInput(_))));
    }

    #[test]
    fn test_empty_input_list() {
        let dir = tempfile::tempdir().unwrap();
        let output = dir.path().join("mix.wav");
        assert!(matches!(session().mix_files(&[], &output), Err(Error::InvalidInput(_))));
        assert!(!output.exists());
    }

    #[test]
    fn test_decode_failure_writes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let output = dir.path().join("mix.wav");
        let result = session().mix_files(&[dir.path().join("missing.wav")], &output);
        assert!(result.is_err());
        assert!(!output.exists());
    }

    #[test]
    fn test_analysis_report() {
        let analysis = TrackAnalysis {
            bpm: 128.0,
            beats: vec![0.0, 0.46875, 0.9375],
            downbeats: vec![0.0],
            camelot: "8A".to_string(),
            segments: Segments {
                outro: Segment::new(60.0, 70.0),
                ..Segments::default()
            },
            duration: 70.0,
        };
        let report = analysis_report(Path::new("track.wav"), &analysis);
        assert!(report.contains("BPM:       128.00"));
        assert!(report.contains("3 (1 downbeats)"));
        assert!(report.contains("Key:       8A"));
        assert!(report.contains("outro"));
        assert!(report.lines().next().unwrap().ends_with("track.wav"));

        let outro = report.lines().find(|l| l.trim_start().starts_with("outro")).unwrap();
        assert!(outro.ends_with(&format!("({})", format_duration(10.0))), "{}", outro);
    }
}
