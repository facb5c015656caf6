//! Playlist mode
//!
//! The first track seeds a [`RunningMixState`]. Every following track is
//! brought to the first track's tempo, a transition is planned against the
//! running mix's (synthetic) analysis, the out point is snapped to a beat,
//! and the track is crossfaded onto the end of the mix. The running analysis
//! is then replaced by the new track's analysis moved onto the mix timeline.
//!
//! Each splice consumes the previous mix buffer, so at most one merged
//! buffer plus one incoming track are alive at a time.

use super::propagation::AnalysisPropagation;
use super::{MixOptions, Track};
use crate::audio::types::AudioBuffer;
use crate::crossfade;
use crate::error::{Error, Result};
use crate::stretch::TimeStretch;
use crate::transition::{align, match_tempo, stretch_rate};
use djmix_common::camelot::are_keys_compatible;
use djmix_common::human_time::format_duration;
use djmix_common::TrackAnalysis;
use tracing::{debug, info, warn};

/// The mix built so far and the analysis standing in for it.
#[derive(Debug, Clone, PartialEq)]
pub struct RunningMixState {
    pub buffer: AudioBuffer,

    /// Tempo pinned to the reference BPM; grid and segments of the most
    /// recently merged track, shifted onto the mix timeline
    pub analysis: TrackAnalysis,

    /// Tempo every incoming track is matched to
    pub reference_bpm: f64,

    /// Number of tracks spliced in after the first
    pub splices: usize,
}

impl RunningMixState {
    /// Seed the mix with its first track.
    pub fn new(first: Track) -> Self {
        let reference_bpm = first.analysis.bpm;
        Self {
            buffer: first.buffer,
            analysis: first.analysis,
            reference_bpm,
            splices: 0,
        }
    }

    /// Crossfade `next` onto the end of the mix.
    pub fn splice(
        self,
        next: Track,
        options: &MixOptions,
        stretcher: &dyn TimeStretch,
        propagation: &dyn AnalysisPropagation,
    ) -> Result<Self> {
        let Track {
            buffer: mut incoming,
            analysis: mut incoming_analysis,
        } = next;

        if options.harmonic_mix {
            let (compatible, reason) =
                are_keys_compatible(&self.analysis.camelot, &incoming_analysis.camelot);
            if compatible {
                info!("Keys are compatible: {}", reason);
            } else {
                warn!(
                    "Keys may clash: {} ({} -> {})",
                    reason, self.analysis.camelot, incoming_analysis.camelot
                );
            }
        }

        if options.match_tempo {
            if let Some(rate) = stretch_rate(incoming_analysis.bpm, self.reference_bpm) {
                incoming = match_tempo(incoming, incoming_analysis.bpm, self.reference_bpm, stretcher)?;
                incoming_analysis = incoming_analysis.rescaled(rate);
                incoming_analysis.bpm = self.reference_bpm;
                incoming_analysis.duration = incoming.duration_seconds();
            }
        }

        let plan = options.selector().select(&self.analysis, &incoming_analysis);
        let mixout_point = if options.sync_beats {
            align(&self.analysis.beats, &incoming_analysis.beats, plan.mixout_point)
        } else {
            plan.mixout_point
        };

        info!(
            "Splice {}: mix out @ {}, mix in @ {}, {} {} crossfade",
            self.splices + 1,
            format_duration(mixout_point),
            format_duration(plan.mixin_point),
            format_duration(plan.crossfade_duration),
            options.style
        );

        let merged = crossfade::crossfade(
            self.buffer,
            &incoming,
            mixout_point,
            plan.mixin_point,
            plan.crossfade_duration,
            options.style,
        )?;

        let offset = mixout_point - plan.mixin_point;
        let mut analysis = propagation.shift(&incoming_analysis, offset, merged.duration_seconds());
        analysis.bpm = self.reference_bpm;

        debug!(
            "Running mix now {} (offset {:.3}s, {} beats carried)",
            format_duration(merged.duration_seconds()),
            offset,
            analysis.beats.len()
        );

        Ok(Self {
            buffer: merged,
            analysis,
            reference_bpm: self.reference_bpm,
            splices: self.splices + 1,
        })
    }
}

/// Mix `tracks` in order into one continuous buffer.
///
/// A single track passes through untouched. An empty list is rejected.
pub fn mix_playlist(
    tracks: Vec<Track>,
    options: &MixOptions,
    stretcher: &dyn TimeStretch,
    propagation: &dyn AnalysisPropagation,
) -> Result<RunningMixState> {
    let mut tracks = tracks.into_iter();
    let first = tracks
        .next()
        .ok_or_else(|| Error::InvalidInput("Playlist is empty".to_string()))?;

    info!(
        "Mixing playlist at {:.2} BPM ({} bars, {} style)",
        first.analysis.bpm, options.transition_bars, options.style
    );

    let mut state = RunningMixState::new(first);
    for next in tracks {
        state = state.splice(next, options, stretcher, propagation)?;
    }

    info!(
        "Playlist mixed: {} splices, {}",
        state.splices,
        format_duration(state.buffer.duration_seconds())
    );

    Ok(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mix::OffsetShift;
    use crate::stretch::BeatmatchStretcher;
    use djmix_common::{AudioFormat, Segment, Segments};

    const FORMAT: AudioFormat = AudioFormat::new(100, 2);

    fn track(value: f32, bpm: f64, seconds: usize, intro_end: f64, outro_start: f64) -> Track {
        let duration = seconds as f64;
        let interval = 60.0 / bpm;
        let analysis = TrackAnalysis {
            bpm,
            beats: (0..)
                .map(|i| i as f64 * interval)
                .take_while(|&t| t < duration)
                .collect(),
            downbeats: Vec::new(),
            camelot: "8A".to_string(),
            segments: Segments {
                intro: Segment::new(0.0, intro_end),
                buildup: Segment::new(intro_end, intro_end),
                drop: Segment::new(intro_end, outro_start),
                outro: Segment::new(outro_start, duration),
            },
            duration,
        };
        Track::new(AudioBuffer::new(vec![value; seconds * 100 * 2], FORMAT), analysis)
    }

    #[test]
    fn test_empty_playlist_rejected() {
        let result = mix_playlist(Vec::new(), &MixOptions::default(), &BeatmatchStretcher, &OffsetShift);
        assert!(matches!(result, Err(Error::InvalidInput(_))));
    }

    #[test]
    fn test_single_track_passthrough() {
        let only = track(0.3, 120.0, 10, 6.0, 8.0);
        let state = mix_playlist(vec![only.clone()], &MixOptions::default(), &BeatmatchStretcher, &OffsetShift).unwrap();
        assert_eq!(state.buffer, only.buffer);
        assert_eq!(state.splices, 0);
    }

    #[test]
    fn test_two_tracks_same_tempo() {
        // A: outro at 50s, B: intro ends at 6s, 4 bars at 120 BPM = 8s fade
        let a = track(0.5, 120.0, 60, 6.0, 50.0);
        let b = track(0.25, 120.0, 40, 6.0, 30.0);
        let options = MixOptions {
            transition_bars: 4,
            ..MixOptions::default()
        };

        let state = mix_playlist(vec![a, b], &options, &BeatmatchStretcher, &OffsetShift).unwrap();

        // 50s + (40s - 6s)
        assert_eq!(state.buffer.frames(), 8400);
        assert_eq!(state.splices, 1);

        // running analysis is B moved by 50 - 6 = 44s
        assert_eq!(state.analysis.beats[0], 44.0);
        assert_eq!(state.analysis.segments.outro, Segment::new(74.0, 84.0));
        assert_eq!(state.analysis.duration, 84.0);
        assert_eq!(state.analysis.bpm, 120.0);
    }

    #[test]
    fn test_manual_transition_without_sync() {
        let a = track(0.5, 120.0, 30, 6.0, 25.0);
        let b = track(0.25, 120.0, 30, 6.0, 25.0);
        let options = MixOptions {
            transition_bars: 2,
            auto_detect: false,
            sync_beats: false,
            ..MixOptions::default()
        };

        let state = mix_playlist(vec![a, b], &options, &BeatmatchStretcher, &OffsetShift).unwrap();

        // mix out 4s before A's end, B from 0: 26 + 30
        assert_eq!(state.buffer.frames(), 5600);
    }
}
