mod common;

use std::time::Duration;

use candle_core::{DType, Device, Tensor};

use respire::application::ports::{InferenceEngine, InferenceError};
use respire::domain::ModelStatus;
use respire::infrastructure::inference::{InferenceEngineFactory, MOCK_CLASS_COUNT, MockClassifier};
use respire::presentation::config::{ModelProvider, ModelSettings};

fn input_tensor() -> Tensor {
    Tensor::zeros((1, 128, 345, 1), DType::F32, &Device::Cpu).unwrap()
}

fn settings(provider: ModelProvider, artifact_path: &str) -> ModelSettings {
    ModelSettings {
        provider,
        artifact_path: artifact_path.to_string(),
        mock_seed: Some(7),
        mock_delay_ms: 0,
    }
}

#[test]
fn given_mock_classifier_when_predicting_then_probabilities_sum_to_one() {
    let engine = MockClassifier::new(Some(1), Duration::ZERO);

    for _ in 0..50 {
        let predictions = engine.predict(&input_tensor()).unwrap();
        assert_eq!(predictions.class_count(), MOCK_CLASS_COUNT);
        assert!((predictions.sum() - 1.0).abs() < 1e-3);
        assert!(predictions.probabilities().iter().all(|p| *p >= 0.0));
    }
}

#[test]
fn given_mock_classifier_when_predicting_then_winner_is_unique_and_confident() {
    let engine = MockClassifier::new(Some(2), Duration::ZERO);

    for _ in 0..50 {
        let predictions = engine.predict(&input_tensor()).unwrap();
        let winner = predictions.argmax().unwrap();
        let confidence = predictions.get(winner).unwrap();

        assert!((0.70..0.95).contains(&confidence), "confidence {confidence}");
        let runners_up = predictions
            .probabilities()
            .iter()
            .enumerate()
            .filter(|(i, _)| *i != winner);
        for (_, p) in runners_up {
            assert!(*p < confidence);
        }
    }
}

#[test]
fn given_same_seed_when_predicting_then_sequences_match() {
    let a = MockClassifier::new(Some(42), Duration::ZERO);
    let b = MockClassifier::new(Some(42), Duration::ZERO);

    for _ in 0..10 {
        assert_eq!(
            a.predict(&input_tensor()).unwrap(),
            b.predict(&input_tensor()).unwrap()
        );
    }
}

#[test]
fn given_mock_provider_when_creating_engine_then_engine_is_loaded() {
    let engine = InferenceEngineFactory::create(&settings(ModelProvider::Mock, "unused"));

    assert_eq!(engine.status(), ModelStatus::Loaded);
    assert_eq!(engine.name(), "mock");
}

#[test]
fn given_missing_artifact_when_creating_onnx_engine_then_engine_is_unavailable() {
    let engine =
        InferenceEngineFactory::create(&settings(ModelProvider::Onnx, "/nonexistent/model.onnx"));

    assert_eq!(engine.status(), ModelStatus::Unavailable);
    assert!(matches!(
        engine.predict(&input_tensor()),
        Err(InferenceError::ModelUnavailable(_))
    ));
}

#[cfg(feature = "onnx")]
mod onnx {
    use std::io::Write;

    use respire::infrastructure::inference::OnnxClassifier;

    use super::*;
    use crate::common::onnx::{CLASS_COUNT, constant_logits_classifier, linear_softmax_classifier};

    #[test]
    fn given_valid_graph_when_predicting_then_returns_probability_vector() {
        let engine = OnnxClassifier::from_model(linear_softmax_classifier()).unwrap();
        let features = Tensor::rand(0f32, 1f32, (1, 128, 345, 1), &Device::Cpu).unwrap();

        let predictions = engine.predict(&features).unwrap();

        assert_eq!(engine.status(), ModelStatus::Loaded);
        assert_eq!(predictions.class_count(), CLASS_COUNT);
        assert!((predictions.sum() - 1.0).abs() <= 1e-3);
    }

    #[test]
    fn given_logits_summing_to_one_when_predicting_then_softmax_is_still_applied() {
        let logits = vec![1.5, -0.5, 0.0, 0.0, 0.0, 0.0, 0.0];
        let engine = OnnxClassifier::from_model(constant_logits_classifier(logits)).unwrap();

        let predictions = engine.predict(&input_tensor()).unwrap();

        assert!(predictions.probabilities().iter().all(|p| (0.0..=1.0).contains(p)));
        assert!((predictions.sum() - 1.0).abs() <= 1e-3);
        assert_eq!(predictions.argmax(), Some(0));
        assert!(predictions.get(1).unwrap() < predictions.get(2).unwrap());
    }

    #[test]
    fn given_garbage_artifact_when_loading_then_engine_is_unavailable() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"definitely not a protobuf model").unwrap();

        let engine = OnnxClassifier::load(file.path());

        assert_eq!(engine.status(), ModelStatus::Unavailable);
        assert!(matches!(
            engine.predict(&input_tensor()),
            Err(InferenceError::ModelUnavailable(_))
        ));
    }

    #[test]
    fn given_explicitly_unavailable_classifier_when_predicting_then_reports_reason() {
        let engine = OnnxClassifier::unavailable("no artifact configured");

        match engine.predict(&input_tensor()) {
            Err(InferenceError::ModelUnavailable(reason)) => {
                assert_eq!(reason, "no artifact configured")
            }
            other => panic!("expected ModelUnavailable, got {other:?}"),
        }
    }
}
