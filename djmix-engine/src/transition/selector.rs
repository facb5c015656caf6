//! Transition point selection
//!
//! Decides where the outgoing track (A) starts fading out and where the
//! incoming track (B) enters:
//!
//! - **auto**: A mixes out at the start of its outro, snapped to the nearest
//!   beat of A. B mixes in at the end of its intro when that intro is longer
//!   than 5 seconds, otherwise from its very start.
//! - **manual**: A mixes out `bars` bars before its end, B mixes in at 0.
//!
//! The crossfade always lasts `bars` bars at A's tempo.

use super::aligner::nearest_beat;
use djmix_common::analysis::bars_duration;
use djmix_common::TrackAnalysis;
use tracing::debug;

/// Intros this short (seconds) are skipped entirely
pub const MIN_INTRO_SECONDS: f64 = 5.0;

/// Where and for how long two tracks overlap.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TransitionPlan {
    /// Seconds into A where the fade-out begins
    pub mixout_point: f64,

    /// Seconds into B where the fade-in begins
    pub mixin_point: f64,

    /// Fade length in seconds
    pub crossfade_duration: f64,
}

impl TransitionPlan {
    /// Structure-driven plan (A's outro into the body of B).
    pub fn auto(a: &TrackAnalysis, b: &TrackAnalysis, bars: u32) -> Self {
        let outro_start = a.segments.outro.start;
        let mixout_point = nearest_beat(&a.beats, outro_start).unwrap_or(outro_start);

        let intro_end = b.segments.intro.end;
        let mixin_point = if intro_end > MIN_INTRO_SECONDS {
            intro_end
        } else {
            0.0
        };

        let plan = Self {
            mixout_point,
            mixin_point,
            crossfade_duration: bars_duration(a.bpm, bars),
        };
        debug!(
            "Auto transition: outro {:.3}s -> mixout {:.3}s, mixin {:.3}s, fade {:.3}s",
            outro_start, plan.mixout_point, plan.mixin_point, plan.crossfade_duration
        );
        plan
    }

    /// Fixed plan: fade out over A's final `bars` bars, B from its start.
    ///
    /// The out point may be negative for a track shorter than the fade; the
    /// synthesizer then starts the blend at A's first sample.
    pub fn manual(a: &TrackAnalysis, bars: u32) -> Self {
        let crossfade_duration = bars_duration(a.bpm, bars);
        let plan = Self {
            mixout_point: a.duration - crossfade_duration,
            mixin_point: 0.0,
            crossfade_duration,
        };
        debug!(
            "Manual transition: mixout {:.3}s, fade {:.3}s",
            plan.mixout_point, plan.crossfade_duration
        );
        plan
    }

    /// Seconds of B's timeline that precede the splice on the mix timeline
    /// (B's time `t` lands at `t + offset` in the mix).
    pub fn offset(&self) -> f64 {
        self.mixout_point - self.mixin_point
    }
}

/// Chooses between the auto and manual policies.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TransitionSelector {
    pub bars: u32,
    pub auto_detect: bool,
}

impl TransitionSelector {
    pub fn new(bars: u32, auto_detect: bool) -> Self {
        Self { bars, auto_detect }
    }

    pub fn select(&self, a: &TrackAnalysis, b: &TrackAnalysis) -> TransitionPlan {
        if self.auto_detect {
            TransitionPlan::auto(a, b, self.bars)
        } else {
            TransitionPlan::manual(a, self.bars)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use djmix_common::{Segment, Segments};

    fn track(bpm: f64, duration: f64, intro_end: f64, outro_start: f64) -> TrackAnalysis {
        let interval = 60.0 / bpm;
        TrackAnalysis {
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
        }
    }

    #[test]
    fn test_auto_snaps_mixout_to_beat() {
        let a = track(120.0, 60.0, 9.0, 51.1);
        let b = track(120.0, 60.0, 9.0, 51.0);
        let plan = TransitionPlan::auto(&a, &b, 16);
        assert_eq!(plan.mixout_point, 51.0);
        assert_eq!(plan.mixin_point, 9.0);
        assert!((plan.crossfade_duration - 32.0).abs() < 1e-12);
    }

    #[test]
    fn test_short_intro_mixes_in_from_start() {
        let a = track(120.0, 60.0, 9.0, 51.0);
        let b = track(120.0, 30.0, 4.5, 25.5);
        assert_eq!(TransitionPlan::auto(&a, &b, 4).mixin_point, 0.0);

        let b = track(120.0, 30.0, 5.0, 25.5);
        assert_eq!(TransitionPlan::auto(&a, &b, 4).mixin_point, 0.0);
    }

    #[test]
    fn test_mixin_is_not_snapped() {
        let a = track(120.0, 60.0, 9.0, 51.0);
        let b = track(120.0, 60.0, 7.3, 51.0);
        assert_eq!(TransitionPlan::auto(&a, &b, 4).mixin_point, 7.3);
    }

    #[test]
    fn test_auto_without_beats_keeps_outro_start() {
        let mut a = track(120.0, 60.0, 9.0, 51.1);
        a.beats.clear();
        let b = track(120.0, 60.0, 9.0, 51.0);
        assert_eq!(TransitionPlan::auto(&a, &b, 16).mixout_point, 51.1);
    }

    #[test]
    fn test_manual_plan() {
        let a = track(128.0, 120.0, 18.0, 102.0);
        let plan = TransitionPlan::manual(&a, 16);
        assert!((plan.mixout_point - 90.0).abs() < 1e-9);
        assert_eq!(plan.mixin_point, 0.0);
        assert!((plan.crossfade_duration - 30.0).abs() < 1e-9);
    }

    #[test]
    fn test_selector_dispatch_and_offset() {
        let a = track(120.0, 60.0, 9.0, 51.0);
        let b = track(120.0, 60.0, 9.0, 51.0);

        let auto = TransitionSelector::new(8, true).select(&a, &b);
        assert_eq!(auto.offset(), 42.0);

        let manual = TransitionSelector::new(8, false).select(&a, &b);
        assert_eq!(manual.mixout_point, 44.0);
        assert_eq!(manual.offset(), 44.0);
    }
}
