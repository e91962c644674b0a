use std::sync::Arc;
use std::time::Duration;

use crate::application::ports::InferenceEngine;
use crate::presentation::config::{ModelProvider, ModelSettings};

use super::MockClassifier;
#[cfg(feature = "onnx")]
use super::OnnxClassifier;

pub struct InferenceEngineFactory;

impl InferenceEngineFactory {
    /// Builds the configured engine. Never fails: an artifact that cannot be
    /// loaded yields an engine reporting `ModelStatus::Unavailable`.
    pub fn create(settings: &ModelSettings) -> Arc<dyn InferenceEngine> {
        match settings.provider {
            ModelProvider::Onnx => Self::create_onnx(settings),
            ModelProvider::Mock => {
                tracing::info!(
                    seed = ?settings.mock_seed,
                    delay_ms = settings.mock_delay_ms,
                    "Using mock classifier"
                );
                Arc::new(MockClassifier::new(
                    settings.mock_seed,
                    Duration::from_millis(settings.mock_delay_ms),
                ))
            }
        }
    }

    #[cfg(feature = "onnx")]
    fn create_onnx(settings: &ModelSettings) -> Arc<dyn InferenceEngine> {
        Arc::new(OnnxClassifier::load(&settings.artifact_path))
    }

    #[cfg(not(feature = "onnx"))]
    fn create_onnx(settings: &ModelSettings) -> Arc<dyn InferenceEngine> {
        tracing::error!(
            path = %settings.artifact_path,
            "Built without the `onnx` feature; classifier unavailable"
        );
        Arc::new(UnavailableClassifier)
    }
}

#[cfg(not(feature = "onnx"))]
struct UnavailableClassifier;

#[cfg(not(feature = "onnx"))]
impl InferenceEngine for UnavailableClassifier {
    fn predict(
        &self,
        _features: &candle_core::Tensor,
    ) -> Result<crate::domain::PredictionVector, crate::application::ports::InferenceError> {
        Err(crate::application::ports::InferenceError::ModelUnavailable(
            "built without ONNX support".to_string(),
        ))
    }

    fn status(&self) -> crate::domain::ModelStatus {
        crate::domain::ModelStatus::Unavailable
    }

    fn name(&self) -> &'static str {
        "onnx"
    }
}
