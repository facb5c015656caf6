//! # djmix Common Library
//!
//! Shared code for the djmix engine and command-line front end:
//! - Audio format description (sample rate, channel count)
//! - Track analysis values produced by an external analyzer
//! - Camelot key compatibility rules
//! - Duration parsing and human-readable time formatting
//! - Linear fade ramps used by every blend style
//! - TOML configuration loading

pub mod analysis;
pub mod camelot;
pub mod config;
pub mod error;
pub mod fade_curves;
pub mod format;
pub mod human_time;

pub use analysis::{Segment, Segments, TrackAnalysis};
pub use error::{Error, Result};
pub use fade_curves::FadeDirection;
pub use format::AudioFormat;
