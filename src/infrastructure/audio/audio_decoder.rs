use std::io::Cursor;

use symphonia::core::audio::SampleBuffer;
use symphonia::core::codecs::DecoderOptions;
use symphonia::core::formats::FormatOptions;
use symphonia::core::io::MediaSourceStream;
use symphonia::core::meta::MetadataOptions;
use symphonia::core::probe::Hint;

use crate::application::ports::{AudioDecoder, AudioDecoderError};
use crate::domain::{AudioClip, DecodedSamples, TARGET_SAMPLE_RATE};

/// Pure-Rust decoder for every container and codec symphonia bundles.
/// Output is mono, downmixed by averaging channels, resampled to 16 kHz.
#[derive(Debug, Default, Clone, Copy)]
pub struct SymphoniaAudioDecoder;

impl AudioDecoder for SymphoniaAudioDecoder {
    fn decode(
        &self,
        clip: &AudioClip,
        max_duration_secs: Option<f32>,
    ) -> Result<DecodedSamples, AudioDecoderError> {
        let mut hint = Hint::new();
        if let Some(extension) = clip.media_type().subtype().and_then(extension_hint) {
            hint.with_extension(extension);
        }

        let samples = decode_audio_to_pcm(clip.data(), &hint, max_duration_secs)?;
        Ok(DecodedSamples::new(samples, TARGET_SAMPLE_RATE))
    }
}

fn extension_hint(subtype: &str) -> Option<&'static str> {
    let ext = match subtype.to_ascii_lowercase().as_str() {
        "wav" | "wave" | "x-wav" | "vnd.wave" => "wav",
        "mpeg" | "mp3" | "x-mp3" => "mp3",
        "flac" | "x-flac" => "flac",
        "ogg" | "vorbis" | "x-vorbis+ogg" => "ogg",
        "mp4" | "m4a" | "x-m4a" | "aac" => "m4a",
        "webm" => "webm",
        "aiff" | "x-aiff" => "aiff",
        _ => return None,
    };
    Some(ext)
}

/// Caps how many source-rate frames a decode may produce.
#[derive(Debug, Clone, Copy)]
struct FrameBudget {
    limit_secs: f32,
    source_rate: u32,
    max_frames: u64,
}

impl FrameBudget {
    /// `None` when there is no positive limit.
    fn new(limit_secs: Option<f32>, source_rate: u32) -> Option<Self> {
        let limit_secs = limit_secs.filter(|secs| *secs > 0.0)?;
        Some(Self {
            limit_secs,
            source_rate,
            max_frames: (f64::from(limit_secs) * f64::from(source_rate)).ceil() as u64,
        })
    }

    fn check(&self, frames: u64) -> Result<(), AudioDecoderError> {
        if frames <= self.max_frames {
            return Ok(());
        }
        Err(AudioDecoderError::ClipTooLong {
            duration_secs: frames as f32 / self.source_rate as f32,
            limit_secs: self.limit_secs,
        })
    }
}

pub fn decode_audio_to_pcm(
    data: &[u8],
    hint: &Hint,
    max_duration_secs: Option<f32>,
) -> Result<Vec<f32>, AudioDecoderError> {
    if data.is_empty() {
        return Err(AudioDecoderError::DecodingFailed(
            "empty payload".to_string(),
        ));
    }

    let cursor = Cursor::new(data.to_vec());
    let mss = MediaSourceStream::new(Box::new(cursor), Default::default());

    let format_opts = FormatOptions::default();
    let metadata_opts = MetadataOptions::default();
    let decoder_opts = DecoderOptions::default();

    let probed = symphonia::default::get_probe()
        .format(hint, mss, &format_opts, &metadata_opts)
        .map_err(|e| AudioDecoderError::UnsupportedFormat(format!("probe: {}", e)))?;

    let mut format = probed.format;

    let track = format
        .default_track()
        .ok_or_else(|| AudioDecoderError::DecodingFailed("no audio track found".to_string()))?;

    let track_id = track.id;
    let codec_params = track.codec_params.clone();
    let source_rate = codec_params
        .sample_rate
        .ok_or_else(|| AudioDecoderError::DecodingFailed("unknown sample rate".to_string()))?;
    let channels = codec_params.channels.map(|c| c.count()).unwrap_or(1);

    let budget = FrameBudget::new(max_duration_secs, source_rate);
    if let (Some(budget), Some(declared_frames)) = (budget, codec_params.n_frames) {
        budget.check(declared_frames).inspect_err(|_| {
            tracing::warn!(
                source_rate,
                declared_frames,
                "Container declares a clip longer than the limit"
            );
        })?;
    }

    let mut decoder = symphonia::default::get_codecs()
        .make(&codec_params, &decoder_opts)
        .map_err(|e| AudioDecoderError::UnsupportedFormat(format!("codec: {}", e)))?;

    let mut all_samples: Vec<f32> = Vec::new();

    loop {
        let packet = match format.next_packet() {
            Ok(p) => p,
            Err(symphonia::core::errors::Error::IoError(ref e))
                if e.kind() == std::io::ErrorKind::UnexpectedEof =>
            {
                break;
            }
            Err(e) => {
                return Err(AudioDecoderError::DecodingFailed(format!("packet: {}", e)));
            }
        };

        if packet.track_id() != track_id {
            continue;
        }

        let decoded = match decoder.decode(&packet) {
            Ok(d) => d,
            Err(symphonia::core::errors::Error::DecodeError(e)) => {
                tracing::warn!(error = %e, "Skipping corrupt audio frame");
                continue;
            }
            Err(e) => {
                return Err(AudioDecoderError::DecodingFailed(format!("decode: {}", e)));
            }
        };

        let spec = *decoded.spec();
        let num_frames = decoded.frames();
        if num_frames == 0 {
            continue;
        }

        let mut sample_buf = SampleBuffer::<f32>::new(num_frames as u64, spec);
        sample_buf.copy_interleaved_ref(decoded);
        let samples = sample_buf.samples();

        let frame_channels = spec.channels.count().max(1);
        if frame_channels > 1 {
            for frame in samples.chunks(frame_channels) {
                all_samples.push(frame.iter().sum::<f32>() / frame_channels as f32);
            }
        } else {
            all_samples.extend_from_slice(samples);
        }

        if let Some(budget) = budget {
            budget.check(all_samples.len() as u64).inspect_err(|_| {
                tracing::warn!(
                    source_rate,
                    decoded_frames = all_samples.len(),
                    "Decoding stopped: clip exceeds duration limit"
                );
            })?;
        }
    }

    if all_samples.is_empty() {
        return Err(AudioDecoderError::DecodingFailed(
            "no audio samples decoded".to_string(),
        ));
    }

    if source_rate != TARGET_SAMPLE_RATE {
        all_samples = resample(&all_samples, source_rate, TARGET_SAMPLE_RATE)?;
    }

    tracing::debug!(
        source_rate,
        channels,
        samples = all_samples.len(),
        duration_secs = all_samples.len() as f32 / TARGET_SAMPLE_RATE as f32,
        "Audio decoded to 16kHz mono PCM"
    );

    Ok(all_samples)
}

fn resample(samples: &[f32], from_rate: u32, to_rate: u32) -> Result<Vec<f32>, AudioDecoderError> {
    use rubato::{
        Resampler, SincFixedIn, SincInterpolationParameters, SincInterpolationType, WindowFunction,
    };

    let params = SincInterpolationParameters {
        sinc_len: 256,
        f_cutoff: 0.95,
        interpolation: SincInterpolationType::Linear,
        oversampling_factor: 256,
        window: WindowFunction::BlackmanHarris2,
    };

    let ratio = to_rate as f64 / from_rate as f64;
    let chunk_size = 1024;

    let mut resampler = SincFixedIn::<f32>::new(ratio, 2.0, params, chunk_size, 1)
        .map_err(|e| AudioDecoderError::ResamplingFailed(format!("init: {}", e)))?;

    let mut output = Vec::with_capacity((samples.len() as f64 * ratio) as usize + chunk_size);

    for chunk in samples.chunks(chunk_size) {
        let input = if chunk.len() < chunk_size {
            let mut padded = chunk.to_vec();
            padded.resize(chunk_size, 0.0);
            padded
        } else {
            chunk.to_vec()
        };

        let result = resampler
            .process(&[input], None)
            .map_err(|e| AudioDecoderError::ResamplingFailed(e.to_string()))?;

        if let Some(channel) = result.first() {
            output.extend_from_slice(channel);
        }
    }

    // The last chunk was zero-padded; drop the tail it produced.
    let expected_len = (samples.len() as f64 * ratio) as usize;
    output.truncate(expected_len);

    Ok(output)
}
