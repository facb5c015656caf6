//! WAV output using hound
//!
//! The mix is written as 32-bit float PCM at the buffer's own sample rate and
//! channel count, so no quantization or gain change happens on the way out.
//! Only `.wav` output paths are accepted.

use crate::audio::types::AudioBuffer;
use crate::error::{Error, Result};
use djmix_common::AudioFormat;
use hound::{SampleFormat, WavReader, WavSpec, WavWriter};
use std::path::Path;
use tracing::{debug, warn};

/// Float WAV writer.
pub struct WavEncoder;

impl WavEncoder {
    /// Write `buffer` to `path`.
    ///
    /// On failure the partially written file is removed before the error is
    /// returned.
    pub fn write_file(path: &Path, buffer: &AudioBuffer) -> Result<()> {
        Self::check_extension(path)?;

        debug!(
            "Writing {} frames ({:.2}s) to {}",
            buffer.frames(),
            buffer.duration_seconds(),
            path.display()
        );

        if let Err(e) = Self::write_samples(path, buffer) {
            if path.exists() {
                if let Err(remove_err) = std::fs::remove_file(path) {
                    warn!(
                        "Failed to remove partial output {}: {}",
                        path.display(),
                        remove_err
                    );
                }
            }
            return Err(e);
        }

        Ok(())
    }

    /// Read a float or integer WAV file back into a buffer, without
    /// resampling or channel conversion.
    pub fn read_file(path: &Path) -> Result<AudioBuffer> {
        let mut reader = WavReader::open(path)
            .map_err(|e| Error::Decode(format!("Failed to open {}: {}", path.display(), e)))?;
        let spec = reader.spec();

        let samples: Vec<f32> = match spec.sample_format {
            SampleFormat::Float => reader
                .samples::<f32>()
                .collect::<std::result::Result<_, _>>()
                .map_err(|e| Error::Decode(format!("Failed to read samples: {}", e)))?,
            SampleFormat::Int => {
                let scale = 1.0 / (1u64 << (spec.bits_per_sample - 1)) as f32;
                reader
                    .samples::<i32>()
                    .map(|s| s.map(|v| v as f32 * scale))
                    .collect::<std::result::Result<_, _>>()
                    .map_err(|e| Error::Decode(format!("Failed to read samples: {}", e)))?
            }
        };

        Ok(AudioBuffer::new(
            samples,
            AudioFormat::new(spec.sample_rate, spec.channels),
        ))
    }

    /// Reject output paths that are not `.wav` files.
    pub fn check_extension(path: &Path) -> Result<()> {
        let is_wav = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.eq_ignore_ascii_case("wav"))
            .unwrap_or(false);

        if is_wav {
            Ok(())
        } else {
            Err(Error::InvalidInput(format!(
                "Unsupported output format for {} (only .wav is supported)",
                path.display()
            )))
        }
    }

    fn write_samples(path: &Path, buffer: &AudioBuffer) -> Result<()> {
        let spec = WavSpec {
            channels: buffer.format.channels,
            sample_rate: buffer.format.sample_rate,
            bits_per_sample: 32,
            sample_format: SampleFormat::Float,
        };

        let mut writer = WavWriter::create(path, spec).map_err(encode_error)?;
        for &sample in &buffer.samples {
            writer.write_sample(sample).map_err(encode_error)?;
        }
        writer.finalize().map_err(encode_error)?;

        Ok(())
    }
}

fn encode_error(err: hound::Error) -> Error {
    match err {
        hound::Error::IoError(e) => Error::Io(e),
        other => Error::Encode(other.to_string()),
    }
}
