mod inference_engine_factory;
mod mock_classifier;
#[cfg(feature = "onnx")]
mod onnx_classifier;

pub use inference_engine_factory::InferenceEngineFactory;
pub use mock_classifier::{MOCK_CLASS_COUNT, MockClassifier};
#[cfg(feature = "onnx")]
pub use onnx_classifier::OnnxClassifier;
