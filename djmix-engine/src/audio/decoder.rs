//! Audio decoder using symphonia
//!
//! Decodes any container/codec symphonia can probe (MP3, FLAC, AAC/MP4,
//! Vorbis, WAV, ...) into an interleaved stereo f32 buffer at the pipeline
//! sample rate.
//!
//! Channel policy:
//! - mono sources are duplicated to both channels
//! - stereo sources pass through
//! - sources with more channels keep the first two

use crate::audio::resampler::Resampler;
use crate::audio::types::AudioBuffer;
use crate::error::{Error, Result};
use djmix_common::AudioFormat;
use std::path::Path;
use symphonia::core::audio::SampleBuffer;
use symphonia::core::codecs::{DecoderOptions, CODEC_TYPE_NULL};
use symphonia::core::errors::Error as SymphoniaError;
use symphonia::core::formats::FormatOptions;
use symphonia::core::io::MediaSourceStream;
use symphonia::core::meta::MetadataOptions;
use symphonia::core::probe::Hint;
use tracing::{debug, warn};

/// Whole-file audio decoder.
pub struct SimpleDecoder;

impl SimpleDecoder {
    /// Decode an entire file and convert it to `format`.
    ///
    /// # Errors
    /// - `Io` if the file cannot be opened
    /// - `InvalidInput` if the container/codec is not recognized
    /// - `Decode` for other decoder failures
    /// - `Resample` if sample rate conversion fails
    pub fn decode_file(path: &Path, format: AudioFormat) -> Result<AudioBuffer> {
        let (samples, source_rate) = Self::decode_stereo(path)?;

        let stereo = AudioBuffer::new(samples, AudioFormat::new(source_rate, 2));
        let buffer = Resampler::resample(stereo, format.sample_rate)?;

        debug!(
            "Decoded {}: {} frames ({:.2}s) at {}",
            path.display(),
            buffer.frames(),
            buffer.duration_seconds(),
            buffer.format
        );

        Ok(buffer)
    }

    /// Decode to interleaved stereo at the source sample rate.
    fn decode_stereo(path: &Path) -> Result<(Vec<f32>, u32)> {
        debug!("Decoding entire file: {}", path.display());

        let file = std::fs::File::open(path)?;
        let mss = MediaSourceStream::new(Box::new(file), Default::default());

        // Create a hint to help the format registry guess the format
        let mut hint = Hint::new();
        if let Some(ext_str) = path.extension().and_then(|e| e.to_str()) {
            hint.with_extension(ext_str);
        }

        let probed = symphonia::default::get_probe()
            .format(
                &hint,
                mss,
                &FormatOptions::default(),
                &MetadataOptions::default(),
            )
            .map_err(|e| match e {
                SymphoniaError::Unsupported(msg) => Error::InvalidInput(format!(
                    "Unknown file type {}: {}",
                    path.display(),
                    msg
                )),
                other => Error::Decode(format!("Failed to probe format: {}", other)),
            })?;

        let mut format = probed.format;

        let track = format
            .tracks()
            .iter()
            .find(|t| t.codec_params.codec != CODEC_TYPE_NULL)
            .ok_or_else(|| Error::Decode("No audio track found".to_string()))?;

        let track_id = track.id;
        let codec_params = track.codec_params.clone();

        let sample_rate = codec_params
            .sample_rate
            .ok_or_else(|| Error::Decode("Sample rate not found".to_string()))?;

        let mut decoder = symphonia::default::get_codecs()
            .make(&codec_params, &DecoderOptions::default())
            .map_err(|e| match e {
                SymphoniaError::Unsupported(msg) => {
                    Error::InvalidInput(format!("Unsupported codec in {}: {}", path.display(), msg))
                }
                other => Error::Decode(format!("Failed to create decoder: {}", other)),
            })?;

        let mut samples = Vec::new();

        loop {
            let packet = match format.next_packet() {
                Ok(packet) => packet,
                Err(SymphoniaError::IoError(ref e))
                    if e.kind() == std::io::ErrorKind::UnexpectedEof =>
                {
                    debug!("Reached end of file");
                    break;
                }
                Err(SymphoniaError::ResetRequired) => {
                    warn!("Stream reset requested, stopping decode");
                    break;
                }
                Err(e) => {
                    return Err(Error::Decode(format!("Error reading packet: {}", e)));
                }
            };

            // Skip packets for other tracks
            if packet.track_id() != track_id {
                continue;
            }

            let decoded = match decoder.decode(&packet) {
                Ok(decoded) => decoded,
                Err(SymphoniaError::DecodeError(msg)) => {
                    warn!("Decode error (skipping packet): {}", msg);
                    continue;
                }
                Err(e) => {
                    return Err(Error::Decode(format!("Fatal decode error: {}", e)));
                }
            };

            let spec = *decoded.spec();
            let num_channels = spec.channels.count();
            let mut sample_buf = SampleBuffer::<f32>::new(decoded.frames() as u64, spec);
            sample_buf.copy_interleaved_ref(decoded);

            Self::append_as_stereo(sample_buf.samples(), num_channels, &mut samples);
        }

        debug!(
            "Decoded {} stereo frames at {} Hz",
            samples.len() / 2,
            sample_rate
        );

        Ok((samples, sample_rate))
    }

    /// Append interleaved samples with `channels` channels as stereo.
    fn append_as_stereo(input: &[f32], channels: usize, output: &mut Vec<f32>) {
        match channels {
            0 => {}
            1 => {
                output.reserve(input.len() * 2);
                for &s in input {
                    output.push(s);
                    output.push(s);
                }
            }
            2 => output.extend_from_slice(input),
            _ => {
                for frame in input.chunks_exact(channels) {
                    output.push(frame[0]);
                    output.push(frame[1]);
                }
            }
        }
    }
}
