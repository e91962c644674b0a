//! Audio-to-tensor feature stages: log-mel extraction, frame and amplitude
//! normalization, tensor layout.

mod frame_normalizer;
mod mel_spectrogram;
mod tensor_builder;

pub use frame_normalizer::{FrameNormalizer, TARGET_FRAMES, min_max_scale};
pub use mel_spectrogram::{
    AMIN, F_MIN, HOP_LENGTH, MelSpectrogramExtractor, N_FFT, N_MELS, TOP_DB, power_to_db,
};
pub use tensor_builder::TensorBuilder;

#[derive(Debug, thiserror::Error)]
pub enum FeatureError {
    #[error("no samples to analyse")]
    EmptySignal,
    #[error("expected {expected} Hz samples, got {actual} Hz")]
    SampleRateMismatch { expected: u32, actual: u32 },
    #[error("feature matrix has no dynamic range (min {min}, max {max})")]
    Degenerate { min: f32, max: f32 },
    #[error("feature matrix contains non-finite values")]
    NonFinite,
    #[error("feature matrix shape {actual:?} does not match expected {expected:?}")]
    ShapeMismatch {
        expected: (usize, usize),
        actual: (usize, usize),
    },
    #[error("tensor construction failed: {0}")]
    Tensor(String),
}
