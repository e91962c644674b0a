use crate::domain::{AudioClip, DecodedSamples};

/// Turns an encoded recording into mono PCM at the target sample rate.
pub trait AudioDecoder: Send + Sync {
    /// With `max_duration_secs` set, decoding stops with
    /// [`AudioDecoderError::ClipTooLong`] as soon as the stream is known to be
    /// longer than that, without decoding or resampling the rest.
    fn decode(
        &self,
        clip: &AudioClip,
        max_duration_secs: Option<f32>,
    ) -> Result<DecodedSamples, AudioDecoderError>;
}

#[derive(Debug, thiserror::Error)]
pub enum AudioDecoderError {
    #[error("audio decoding failed: {0}")]
    DecodingFailed(String),
    #[error("unsupported audio format: {0}")]
    UnsupportedFormat(String),
    #[error("resampling failed: {0}")]
    ResamplingFailed(String),
    #[error("clip is at least {duration_secs:.2}s long; the limit is {limit_secs:.2}s")]
    ClipTooLong { duration_secs: f32, limit_secs: f32 },
}
