//! Mix accumulation
//!
//! Drives tempo matching, transition selection, beat alignment and crossfade
//! synthesis across many splices:
//!
//! - [`playlist`]: chain tracks 2..N into the running mix of track 1
//! - [`extend`]: loop one track against itself up to a target duration
//! - [`propagation`]: how the running mix's analysis is carried forward
//!   after each splice

pub mod extend;
pub mod playlist;
pub mod propagation;

pub use extend::{extend_track, ExtendResult, LoopAccumulator, LoopPlan, LoopState};
pub use playlist::{mix_playlist, RunningMixState};
pub use propagation::{AnalysisPropagation, OffsetShift};

use crate::audio::types::AudioBuffer;
use crate::crossfade::BlendStyle;
use crate::transition::TransitionSelector;
use djmix_common::config::MixSettings;
use djmix_common::TrackAnalysis;

/// A decoded track together with its analysis.
#[derive(Debug, Clone, PartialEq)]
pub struct Track {
    pub buffer: AudioBuffer,
    pub analysis: TrackAnalysis,
}

impl Track {
    pub fn new(buffer: AudioBuffer, analysis: TrackAnalysis) -> Self {
        Self { buffer, analysis }
    }
}

/// Per-run mixing switches.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MixOptions {
    /// Snap the out point to the outgoing track's nearest beat
    pub sync_beats: bool,

    /// Stretch incoming tracks to the first track's tempo
    pub match_tempo: bool,

    /// Log the key compatibility verdict for every splice
    pub harmonic_mix: bool,

    /// Crossfade length in bars
    pub transition_bars: u32,

    pub style: BlendStyle,

    /// Structure-driven splice points instead of "last N bars"
    pub auto_detect: bool,
}

impl Default for MixOptions {
    fn default() -> Self {
        Self::from_settings(&MixSettings::default())
    }
}

impl MixOptions {
    pub fn from_settings(settings: &MixSettings) -> Self {
        Self {
            sync_beats: settings.sync_beats,
            match_tempo: settings.match_tempo,
            harmonic_mix: settings.harmonic_mix,
            transition_bars: settings.transition_bars,
            style: BlendStyle::parse(&settings.transition_style),
            auto_detect: settings.auto_detect,
        }
    }

    pub(crate) fn selector(&self) -> TransitionSelector {
        TransitionSelector::new(self.transition_bars, self.auto_detect)
    }
}
