//! Self-loop extension
//!
//! Lengthens one track to a target duration by crossfading it into fresh
//! copies of itself. A single transition plan is computed with the track as
//! both A and B (so tempo matching is never needed), giving:
//!
//! - `loop_length = mixout - mixin`, the time each repetition adds
//! - `required_loops = ceil((target - mixin) / loop_length)`, an upper bound
//!   on the number of copies (at most 1 when the source already covers the
//!   target)
//!
//! Every splice happens at a constant distance from the end of the growing
//! buffer (`original_duration - mixout`), because the tail of the mix is
//! always an identical copy of the source. Accumulation stops as soon as the
//! mix reaches the target, even before `required_loops` copies are used.
//!
//! The accumulation is an explicit state machine ([`LoopAccumulator`]) so
//! the termination rule can be driven one step at a time.

use super::{MixOptions, Track};
use crate::audio::types::AudioBuffer;
use crate::crossfade::{synthesize, BlendStyle, SpliceWindow};
use crate::error::{Error, Result};
use djmix_common::human_time::format_duration;
use djmix_common::TrackAnalysis;
use tracing::{debug, info, warn};

/// Degenerate-track fallback: loop the middle 80% of the track
const FALLBACK_MIXOUT_RATIO: f64 = 0.9;
const FALLBACK_MIXIN_RATIO: f64 = 0.1;

/// Loop geometry for one extension job.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LoopPlan {
    pub mixout_point: f64,
    pub mixin_point: f64,
    pub crossfade_duration: f64,

    /// Seconds added by each repetition
    pub loop_length: f64,

    /// Upper bound on the number of copies of the source in the output
    pub required_loops: i64,

    pub target_duration: f64,
}

impl LoopPlan {
    /// Plan a loop of `analysis` against itself.
    pub fn new(analysis: &TrackAnalysis, options: &MixOptions, target_duration: f64) -> Self {
        let plan = options.selector().select(analysis, analysis);
        Self::from_points(
            analysis.duration,
            plan.mixout_point,
            plan.mixin_point,
            plan.crossfade_duration,
            target_duration,
        )
    }

    /// Plan from explicit splice points, applying the degenerate-track
    /// fallback when the points do not move forward in time.
    pub fn from_points(
        duration: f64,
        mixout_point: f64,
        mixin_point: f64,
        crossfade_duration: f64,
        target_duration: f64,
    ) -> Self {
        let (mut mixout_point, mut mixin_point) = (mixout_point, mixin_point);
        let mut loop_length = mixout_point - mixin_point;

        if loop_length <= 0.0 {
            warn!(
                "Loop length {:.3}s is not positive, looping the middle of the track instead",
                loop_length
            );
            mixout_point = duration * FALLBACK_MIXOUT_RATIO;
            mixin_point = duration * FALLBACK_MIXIN_RATIO;
            loop_length = mixout_point - mixin_point;
        }

        let mut required_loops = ((target_duration - mixin_point) / loop_length).ceil() as i64;
        if target_duration <= duration {
            required_loops = required_loops.min(1);
        }

        Self {
            mixout_point,
            mixin_point,
            crossfade_duration,
            loop_length,
            required_loops,
            target_duration,
        }
    }

    /// True when the source already covers the target
    pub fn is_passthrough(&self) -> bool {
        self.required_loops <= 1
    }
}

/// Accumulator state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopState {
    Accumulating,
    Done,
}

/// Step-wise self-loop builder.
pub struct LoopAccumulator<'a> {
    source: &'a AudioBuffer,
    plan: LoopPlan,
    style: BlendStyle,
    current: AudioBuffer,
    /// Distance in frames from the mix end back to the next splice
    tail_frames: usize,
    mixin_frames: usize,
    crossfade_frames: usize,
    iterations: u64,
    state: LoopState,
}

impl<'a> LoopAccumulator<'a> {
    pub fn new(source: &'a AudioBuffer, plan: LoopPlan, style: BlendStyle) -> Self {
        let format = source.format;
        let mixout_frames = format.seconds_to_frames(plan.mixout_point);
        let state = if plan.is_passthrough() || source.is_empty() {
            LoopState::Done
        } else {
            LoopState::Accumulating
        };

        Self {
            source,
            plan,
            style,
            current: source.clone(),
            tail_frames: source.frames().saturating_sub(mixout_frames),
            mixin_frames: format.seconds_to_frames(plan.mixin_point),
            crossfade_frames: format.seconds_to_frames(plan.crossfade_duration),
            iterations: 0,
            state,
        }
    }

    pub fn state(&self) -> LoopState {
        self.state
    }

    /// Splices performed so far
    pub fn iterations(&self) -> u64 {
        self.iterations
    }

    pub fn current(&self) -> &AudioBuffer {
        &self.current
    }

    /// Splice one more copy of the source onto the mix, unless the target is
    /// already reached.
    pub fn step(&mut self) -> Result<LoopState> {
        if self.state == LoopState::Done {
            return Ok(LoopState::Done);
        }

        let max_iterations = (self.plan.required_loops - 1).max(0) as u64;
        if self.reached_target() || self.iterations >= max_iterations {
            self.state = LoopState::Done;
            return Ok(self.state);
        }

        let splice = self.current.frames().saturating_sub(self.tail_frames);
        let mut prefix = std::mem::replace(&mut self.current, AudioBuffer::new(Vec::new(), self.source.format));
        prefix.truncate_frames(splice + self.crossfade_frames);

        let window = SpliceWindow {
            fade_start: splice,
            fade_frames: self.crossfade_frames,
            mixin: self.mixin_frames,
        };
        self.current = synthesize(self.style, prefix, self.source, window)?;
        self.iterations += 1;

        debug!(
            "Loop {}/{}: spliced at frame {}, mix now {}",
            self.iterations,
            max_iterations,
            splice,
            format_duration(self.current.duration_seconds())
        );

        if self.reached_target() {
            self.state = LoopState::Done;
        }
        Ok(self.state)
    }

    /// Run until done and hand back the mix.
    pub fn finish(mut self) -> Result<AudioBuffer> {
        while self.step()? == LoopState::Accumulating {}
        Ok(self.into_buffer())
    }

    /// The mix as accumulated so far
    pub fn into_buffer(self) -> AudioBuffer {
        self.current
    }

    fn reached_target(&self) -> bool {
        self.current.duration_seconds() >= self.plan.target_duration
    }
}

/// Outcome of [`extend_track`].
#[derive(Debug, Clone, PartialEq)]
pub struct ExtendResult {
    pub buffer: AudioBuffer,
    pub plan: LoopPlan,
    /// Splices performed (0 for a passthrough)
    pub iterations: u64,
}

impl ExtendResult {
    /// True when the output is the untouched source (no splice was needed)
    pub fn is_passthrough(&self) -> bool {
        self.iterations == 0
    }
}

/// Loop `track` against itself until it lasts at least `target_duration`
/// seconds.
///
/// A target the source already covers returns the source unmodified.
pub fn extend_track(track: &Track, options: &MixOptions, target_duration: f64) -> Result<ExtendResult> {
    if !(target_duration.is_finite() && target_duration >= 0.0) {
        return Err(Error::InvalidInput(format!(
            "Target duration must be a non-negative number of seconds, got {}",
            target_duration
        )));
    }

    let plan = LoopPlan::new(&track.analysis, options, target_duration);
    info!(
        "Extending {} to {}: loop {:.2}s (mix out {:.2}s -> mix in {:.2}s), up to {} copies",
        format_duration(track.buffer.duration_seconds()),
        format_duration(target_duration),
        plan.loop_length,
        plan.mixout_point,
        plan.mixin_point,
        plan.required_loops
    );

    if plan.is_passthrough() {
        info!("Target is not longer than the source, keeping the original");
        return Ok(ExtendResult {
            buffer: track.buffer.clone(),
            plan,
            iterations: 0,
        });
    }

    let mut accumulator = LoopAccumulator::new(&track.buffer, plan, options.style);
    while accumulator.step()? == LoopState::Accumulating {}
    let iterations = accumulator.iterations();
    let buffer = accumulator.into_buffer();

    info!(
        "Extended to {} in {} splices",
        format_duration(buffer.duration_seconds()),
        iterations
    );

    Ok(ExtendResult {
        buffer,
        plan,
        iterations,
    })
}
