//! Audio file I/O and buffer types
//!
//! Decoding (symphonia), sample rate conversion (rubato) and WAV output
//! (hound) around the in-memory [`AudioBuffer`](types::AudioBuffer).

pub mod decoder;
pub mod encoder;
pub mod resampler;
pub mod types;

pub use decoder::SimpleDecoder;
pub use encoder::WavEncoder;
pub use resampler::Resampler;
pub use types::AudioBuffer;
