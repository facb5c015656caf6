//! Linear fade ramps for crossfading
//!
//! Every blend style uses equal-gain linear ramps: the outgoing gain falls
//! from 1.0 to 0.0 while the incoming gain rises from 0.0 to 1.0, so the two
//! gains always sum to 1.0. There are no equal-power curves.
//!
//! Ramps are inclusive at both ends, like `linspace(start, end, len)`:
//! index 0 yields the start value and index `len - 1` yields the end value.
//! A one-sample ramp yields the start value.

use serde::{Deserialize, Serialize};

/// Direction of a fade ramp
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FadeDirection {
    /// 0.0 → 1.0
    In,
    /// 1.0 → 0.0
    Out,
}

/// Gain at `index` of a linear ramp spanning `len` samples.
///
/// Indices at or past the end clamp to the final value.
pub fn linear_gain(direction: FadeDirection, index: usize, len: usize) -> f32 {
    let t = if len <= 1 {
        0.0
    } else {
        (index.min(len - 1) as f64 / (len - 1) as f64) as f32
    };

    match direction {
        FadeDirection::In => t,
        FadeDirection::Out => 1.0 - t,
    }
}

/// Materialize a full ramp of `len` gains.
pub fn linear_ramp(direction: FadeDirection, len: usize) -> Vec<f32> {
    (0..len).map(|i| linear_gain(direction, i, len)).collect()
}
