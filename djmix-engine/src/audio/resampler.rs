//! Audio resampling using rubato
//!
//! Converts decoded audio to the pipeline sample rate (44.1 kHz unless the
//! caller threads a different [`AudioFormat`] through).

use crate::audio::types::AudioBuffer;
use crate::error::{Error, Result};
use djmix_common::AudioFormat;
use rubato::{FastFixedIn, PolynomialDegree, Resampler as RubatoResampler};
use tracing::debug;

/// Whole-buffer resampler.
pub struct Resampler;

impl Resampler {
    /// Resample `input` to `output_rate`.
    ///
    /// If the input is already at `output_rate` it is returned unchanged.
    pub fn resample(input: AudioBuffer, output_rate: u32) -> Result<AudioBuffer> {
        let input_rate = input.format.sample_rate;
        if input_rate == output_rate {
            debug!("Sample rate already at {}Hz, skipping resample", output_rate);
            return Ok(input);
        }

        if input.is_empty() {
            return Ok(AudioBuffer::new(
                Vec::new(),
                AudioFormat::new(output_rate, input.format.channels),
            ));
        }

        debug!(
            "Resampling from {}Hz to {}Hz ({} channels)",
            input_rate,
            output_rate,
            input.channels()
        );

        // rubato expects planar input
        let planar_input = input.to_planar();
        let input_frames = input.frames();

        let mut resampler = Self::create_resampler(input_rate, output_rate, input.channels(), input_frames)?;

        let planar_output = resampler
            .process(&planar_input, None)
            .map_err(|e| Error::Resample(format!("Resampling failed: {}", e)))?;

        let output = AudioBuffer::from_planar(planar_output, output_rate);

        debug!(
            "Resampled {} input frames to {} output frames",
            input_frames,
            output.frames()
        );

        Ok(output)
    }

    /// Create a rubato resampler sized to process the whole buffer in one
    /// call.
    fn create_resampler(
        input_rate: u32,
        output_rate: u32,
        channels: usize,
        chunk_size: usize,
    ) -> Result<FastFixedIn<f32>> {
        FastFixedIn::<f32>::new(
            output_rate as f64 / input_rate as f64,
            1.0, // no runtime ratio changes
            PolynomialDegree::Septic,
            chunk_size,
            channels,
        )
        .map_err(|e| Error::Resample(format!("Failed to create resampler: {}", e)))
    }
}
