//! Track analysis collaborators
//!
//! Tempo, beat, key and structure detection live outside the engine. The
//! [`Analyzer`] trait is the seam through which a [`TrackAnalysis`] reaches
//! the mixing pipeline. Two implementations ship with the engine:
//!
//! - [`SidecarAnalyzer`] loads a precomputed `<track>.analysis.json`
//! - [`GridAnalyzer`] builds a constant-tempo grid from a known BPM and
//!   estimates song structure from the loudness envelope

mod grid;
mod sidecar;

pub use grid::GridAnalyzer;
pub use sidecar::SidecarAnalyzer;

use crate::audio::types::AudioBuffer;
use crate::error::Result;
use djmix_common::TrackAnalysis;
use std::path::Path;

/// Produces the analysis of one decoded track.
pub trait Analyzer: Send + Sync {
    /// Analyze the track at `path`, already decoded into `audio`.
    fn analyze(&self, path: &Path, audio: &AudioBuffer) -> Result<TrackAnalysis>;

    /// Short name for log lines
    fn name(&self) -> &'static str;
}
