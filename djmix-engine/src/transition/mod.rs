//! Transition planning
//!
//! Everything decided before audio is blended: bringing the incoming track
//! to the reference tempo ([`tempo`]), choosing where each track is cut
//! ([`selector`]), and snapping the cut to a beat ([`aligner`]).

pub mod aligner;
pub mod selector;
pub mod tempo;

pub use aligner::{align, nearest_beat};
pub use selector::{TransitionPlan, TransitionSelector};
pub use tempo::{match_tempo, stretch_rate};
