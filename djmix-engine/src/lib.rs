//! # djmix Engine Library (djmix-engine)
//!
//! Beat-synchronized transition engine for assembling long-form mixes.
//!
//! **Purpose:** Chain short source tracks with beat-aligned crossfades, or
//! loop a single track against itself, to build a continuous program of a
//! requested length.
//!
//! **Pipeline:** decode (symphonia + rubato) → analyze (external collaborator)
//! → tempo match → transition point selection → beat alignment → crossfade
//! synthesis → accumulation → loudness normalization → WAV output (hound).
//!
//! All stages operate on fully materialized in-memory buffers and are
//! synchronous; independent jobs can run in parallel because the engine
//! holds no shared mutable state.

pub mod analyzer;
pub mod audio;
pub mod crossfade;
pub mod error;
pub mod mix;
pub mod normalize;
pub mod session;
pub mod stretch;
pub mod transition;

pub use audio::types::AudioBuffer;
pub use crossfade::BlendStyle;
pub use error::{Error, Result};
pub use mix::{MixOptions, Track};
