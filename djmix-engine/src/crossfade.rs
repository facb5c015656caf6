//! Crossfade synthesis
//!
//! Renders the overlap between an outgoing buffer (A) and an incoming buffer
//! (B) into one continuous buffer:
//!
//! ```text
//! A: |==========================\\\\\\\\\|
//! B:                             |/////////===============|
//!                                ^fade_start ^fade_end
//! out length = max(len(A), fade_start + len(B) - mixin)
//! ```
//!
//! A is kept whole and faded out over `[fade_start, fade_end)`, where
//! `fade_end` never passes A's end. B, read from its mix-in frame, is faded
//! in over the same window and everything of B after the window is copied
//! verbatim.
//!
//! **Curves:** every style uses equal-gain linear ramps (see
//! [`djmix_common::fade_curves`]), never equal-power curves.
//!
//! **Styles:**
//! - [`BlendStyle::Classic`]: one linear fade-in over the window, shortened
//!   if B runs out first
//! - [`BlendStyle::BassSwap`]: B rises over two back-to-back linear ramps,
//!   each covering half the window (an amplitude envelope only, no
//!   frequency band splitting)
//! - [`BlendStyle::FilterSweep`]: accepted by name, rendered as classic

use crate::audio::types::AudioBuffer;
use crate::error::{Error, Result};
use djmix_common::fade_curves::linear_gain;
use djmix_common::{AudioFormat, FadeDirection};
use tracing::{debug, warn};

/// Sonic character of a transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BlendStyle {
    #[default]
    Classic,
    BassSwap,
    /// Not implemented as a filter; renders as [`BlendStyle::Classic`]
    FilterSweep,
}

impl BlendStyle {
    /// Parse a style name. Unknown names fall back to `Classic` with a
    /// warning.
    pub fn parse(name: &str) -> Self {
        match name.trim().to_ascii_lowercase().as_str() {
            "classic" => BlendStyle::Classic,
            "bass_swap" | "bass-swap" => BlendStyle::BassSwap,
            "filter_sweep" | "filter-sweep" => BlendStyle::FilterSweep,
            other => {
                warn!("Unknown transition style '{}', using classic", other);
                BlendStyle::Classic
            }
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            BlendStyle::Classic => "classic",
            BlendStyle::BassSwap => "bass_swap",
            BlendStyle::FilterSweep => "filter_sweep",
        }
    }
}

impl std::fmt::Display for BlendStyle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Splice geometry in frames.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SpliceWindow {
    /// Frame of A where the fade begins (B's mix-in frame lands here)
    pub fade_start: usize,

    /// Requested fade length; clamped to A's end during synthesis
    pub fade_frames: usize,

    /// Frame of B where its fade-in begins
    pub mixin: usize,
}

impl SpliceWindow {
    /// Convert second-based splice points to frames (truncating, negative
    /// times map to frame 0).
    pub fn from_seconds(format: AudioFormat, mixout: f64, mixin: f64, duration: f64) -> Self {
        Self {
            fade_start: format.seconds_to_frames(mixout),
            fade_frames: format.seconds_to_frames(duration),
            mixin: format.seconds_to_frames(mixin),
        }
    }

    /// Fade length actually available inside a buffer of `len_a` frames
    pub fn actual_fade_frames(&self, len_a: usize) -> usize {
        let fade_end = (self.fade_start + self.fade_frames).min(len_a);
        fade_end.saturating_sub(self.fade_start)
    }

    /// Frame count of the blended output
    pub fn output_frames(&self, len_a: usize, len_b: usize) -> usize {
        len_a.max(self.fade_start + len_b.saturating_sub(self.mixin))
    }
}

/// Blend `b` into `a` at `window` using `style`.
///
/// Takes ownership of `a` and grows it into the output.
pub fn synthesize(
    style: BlendStyle,
    a: AudioBuffer,
    b: &AudioBuffer,
    window: SpliceWindow,
) -> Result<AudioBuffer> {
    if a.format != b.format {
        return Err(Error::InvalidInput(format!(
            "Cannot crossfade {} into {}",
            b.format, a.format
        )));
    }

    let channels = a.channels();
    let len_a = a.frames();
    let len_b = b.frames();
    let total = window.output_frames(len_a, len_b);
    let fade_len = window.actual_fade_frames(len_a);

    if fade_len < window.fade_frames {
        warn!(
            "Fade window shortened from {} to {} frames (outgoing track ends at frame {})",
            window.fade_frames, fade_len, len_a
        );
    }

    let format = a.format;
    let mut out = a.samples;
    out.resize(format.samples_for_frames(total), 0.0);

    // A fades out over the window
    for i in 0..fade_len {
        let gain = linear_gain(FadeDirection::Out, i, fade_len);
        let base = (window.fade_start + i) * channels;
        for sample in &mut out[base..base + channels] {
            *sample *= gain;
        }
    }

    let fade_start = window.fade_start;
    let mixin = window.mixin;

    match style {
        BlendStyle::BassSwap => {
            let first = fade_len / 2;
            let second = fade_len - first;
            add_fade_in(&mut out, b, fade_start, mixin, first);
            add_fade_in(&mut out, b, fade_start + first, mixin + first, second);
            copy_remainder(&mut out, b, fade_start + fade_len, mixin + fade_len);
        }
        BlendStyle::Classic | BlendStyle::FilterSweep => {
            let b_fade = len_b.saturating_sub(mixin).min(fade_len);
            add_fade_in(&mut out, b, fade_start, mixin, b_fade);
            copy_remainder(&mut out, b, fade_start + b_fade, mixin + b_fade);
        }
    }

    debug!(
        "{} crossfade: {} + {} frames -> {} frames (fade {} frames at {})",
        style, len_a, len_b, total, fade_len, fade_start
    );

    Ok(AudioBuffer::new(out, format))
}

/// Blend with splice points given in seconds.
pub fn crossfade(
    a: AudioBuffer,
    b: &AudioBuffer,
    mixout_point: f64,
    mixin_point: f64,
    duration: f64,
    style: BlendStyle,
) -> Result<AudioBuffer> {
    let window = SpliceWindow::from_seconds(a.format, mixout_point, mixin_point, duration);
    synthesize(style, a, b, window)
}

/// Add `len` frames of `b` starting at `src` under a linear fade-in, into
/// `out` at frame `dst`. Frames past B's end contribute silence.
fn add_fade_in(out: &mut [f32], b: &AudioBuffer, dst: usize, src: usize, len: usize) {
    let channels = b.channels();
    let available = b.frames().saturating_sub(src).min(len);

    for i in 0..available {
        let gain = linear_gain(FadeDirection::In, i, len);
        let from = (src + i) * channels;
        let to = (dst + i) * channels;
        for c in 0..channels {
            out[to + c] += b.samples[from + c] * gain;
        }
    }
}

/// Overwrite `out` from frame `dst` with `b` from frame `src` to B's end.
fn copy_remainder(out: &mut [f32], b: &AudioBuffer, dst: usize, src: usize) {
    let channels = b.channels();
    let out_frames = out.len() / channels;
    let count = b
        .frames()
        .saturating_sub(src)
        .min(out_frames.saturating_sub(dst));

    if count > 0 {
        out[dst * channels..(dst + count) * channels]
            .copy_from_slice(&b.samples[src * channels..(src + count) * channels]);
    }
}
