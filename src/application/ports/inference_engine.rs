use candle_core::Tensor;

use crate::domain::{ModelStatus, PredictionVector};

/// Maps a `[1, 128, 345, 1]` feature tensor to class probabilities.
///
/// Implementations are shared across concurrent requests and must not need
/// external synchronization.
pub trait InferenceEngine: Send + Sync {
    fn predict(&self, features: &Tensor) -> Result<PredictionVector, InferenceError>;

    fn status(&self) -> ModelStatus;

    fn name(&self) -> &'static str;
}

#[derive(Debug, thiserror::Error)]
pub enum InferenceError {
    #[error("model unavailable: {0}")]
    ModelUnavailable(String),
    #[error("model loading failed: {0}")]
    ModelLoadFailed(String),
    #[error("inference failed: {0}")]
    InferenceFailed(String),
}
