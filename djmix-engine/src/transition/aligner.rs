//! Beat alignment
//!
//! Snaps a candidate splice time onto the outgoing track's beat grid so both
//! tracks meet on a beat boundary.

use tracing::debug;

/// Beat in `beats` closest to `time`.
///
/// Ties go to the earlier beat (first match in ascending order). Returns
/// `None` for an empty grid.
pub fn nearest_beat(beats: &[f64], time: f64) -> Option<f64> {
    let mut best: Option<(f64, f64)> = None;
    for &beat in beats {
        let distance = (beat - time).abs();
        match best {
            Some((_, best_distance)) if distance >= best_distance => {}
            _ => best = Some((beat, distance)),
        }
    }
    best.map(|(beat, _)| beat)
}

/// Align a candidate splice point to the outgoing track's beats.
///
/// `beats_b` is only reported; the incoming track is positioned by its
/// mix-in point, not moved here. With an empty `beats_a` the candidate is
/// returned unchanged.
pub fn align(beats_a: &[f64], beats_b: &[f64], candidate: f64) -> f64 {
    let aligned = nearest_beat(beats_a, candidate).unwrap_or(candidate);
    debug!(
        "Beat alignment: outgoing @ {:.3}s (candidate {:.3}s), incoming first beat @ {}",
        aligned,
        candidate,
        beats_b
            .first()
            .map(|b| format!("{:.3}s", b))
            .unwrap_or_else(|| "n/a".to_string())
    );
    aligned
}
