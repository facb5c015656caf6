//! Analysis propagation across splices
//!
//! After B is spliced into the running mix, the mix needs an analysis of its
//! own so the next transition can be planned. Re-analyzing the merged audio
//! is expensive, so the default strategy reuses B's analysis moved onto the
//! mix timeline. The trait lets a re-analyzing strategy replace it without
//! touching the accumulator.

use djmix_common::TrackAnalysis;

/// Derives the running mix's analysis from the most recently merged track.
pub trait AnalysisPropagation: Send + Sync {
    /// `analysis` describes the merged track on its own timeline; it starts
    /// `offset` seconds into a mix that is now `merged_duration` long.
    fn shift(&self, analysis: &TrackAnalysis, offset: f64, merged_duration: f64) -> TrackAnalysis;
}

/// Moves every timestamp by the splice offset.
///
/// This is an approximation: beats of the outgoing track that survive in
/// the mix are dropped, and the merged signal is never re-detected.
#[derive(Debug, Clone, Copy, Default)]
pub struct OffsetShift;

impl AnalysisPropagation for OffsetShift {
    fn shift(&self, analysis: &TrackAnalysis, offset: f64, merged_duration: f64) -> TrackAnalysis {
        analysis.shifted(offset, merged_duration)
    }
}
