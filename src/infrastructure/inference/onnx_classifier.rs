use std::collections::HashMap;
use std::path::Path;

use candle_core::{D, DType, Device, Tensor};
use candle_onnx::onnx::ModelProto;

use crate::application::ports::{InferenceEngine, InferenceError};
use crate::domain::{ModelStatus, PredictionVector};

const PROBABILITY_SUM_TOLERANCE: f32 = 1e-3;

struct LoadedGraph {
    model: ModelProto,
    input_name: String,
    output_name: String,
}

/// Classifier backed by an ONNX artifact, loaded once at startup.
///
/// A failed load leaves the classifier permanently unavailable; there is no
/// reload path. Evaluation only reads the immutable `ModelProto`, so
/// concurrent `predict` calls need no lock.
pub struct OnnxClassifier {
    graph: Result<LoadedGraph, String>,
}

impl OnnxClassifier {
    /// Loads the artifact, or returns an unavailable classifier describing
    /// why it could not be loaded.
    pub fn load(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        tracing::info!(path = %path.display(), "Loading ONNX classifier");

        let graph = Self::read_graph(path);
        match &graph {
            Ok(g) => tracing::info!(
                input = %g.input_name,
                output = %g.output_name,
                "ONNX classifier loaded"
            ),
            Err(e) => tracing::error!(
                path = %path.display(),
                error = %e,
                "Failed to load classifier; /predict will answer 503 until restart"
            ),
        }

        Self { graph }
    }

    pub fn from_model(model: ModelProto) -> Result<Self, InferenceError> {
        let graph = LoadedGraph::from_proto(model).map_err(InferenceError::ModelLoadFailed)?;
        Ok(Self { graph: Ok(graph) })
    }

    pub fn unavailable(reason: impl Into<String>) -> Self {
        Self {
            graph: Err(reason.into()),
        }
    }

    fn read_graph(path: &Path) -> Result<LoadedGraph, String> {
        if !path.exists() {
            return Err(format!("model file not found at {}", path.display()));
        }
        let model = candle_onnx::read_file(path).map_err(|e| format!("read artifact: {e}"))?;
        LoadedGraph::from_proto(model)
    }

    fn evaluate(&self, graph: &LoadedGraph, features: &Tensor) -> candle_core::Result<Vec<f32>> {
        let mut inputs = HashMap::new();
        inputs.insert(
            graph.input_name.clone(),
            features.to_device(&Device::Cpu)?.to_dtype(DType::F32)?,
        );

        let mut outputs = candle_onnx::simple_eval(&graph.model, inputs)?;
        let output = outputs.remove(&graph.output_name).ok_or_else(|| {
            candle_core::Error::Msg(format!("missing output '{}'", graph.output_name))
        })?;

        let output = output.to_dtype(DType::F32)?;
        let output = match output.rank() {
            1 => output,
            _ => output.flatten_all()?,
        };

        let values = output.to_vec1::<f32>()?;
        if is_probability_distribution(&values) {
            return Ok(values);
        }

        // The artifact emitted logits rather than probabilities.
        candle_nn::ops::softmax(&output, D::Minus1)?.to_vec1::<f32>()
    }
}

/// Every entry in `[0, 1]` and a total of 1 within tolerance. A logit vector
/// can sum to 1 by accident, so the sum alone is not enough.
fn is_probability_distribution(values: &[f32]) -> bool {
    let in_range = values.iter().all(|v| (0.0..=1.0).contains(v));
    let sum: f32 = values.iter().sum();
    in_range && (sum - 1.0).abs() <= PROBABILITY_SUM_TOLERANCE
}

impl LoadedGraph {
    fn from_proto(model: ModelProto) -> Result<Self, String> {
        let graph = model
            .graph
            .as_ref()
            .ok_or_else(|| "no graph defined in artifact".to_string())?;

        let initializers: Vec<&str> = graph.initializer.iter().map(|t| t.name.as_str()).collect();
        let input_name = graph
            .input
            .iter()
            .map(|i| i.name.as_str())
            .find(|name| !initializers.contains(name))
            .ok_or_else(|| "artifact declares no graph input".to_string())?
            .to_string();
        let output_name = graph
            .output
            .first()
            .map(|o| o.name.clone())
            .ok_or_else(|| "artifact declares no graph output".to_string())?;

        Ok(Self {
            model,
            input_name,
            output_name,
        })
    }
}

impl InferenceEngine for OnnxClassifier {
    fn predict(&self, features: &Tensor) -> Result<PredictionVector, InferenceError> {
        let graph = self
            .graph
            .as_ref()
            .map_err(|reason| InferenceError::ModelUnavailable(reason.clone()))?;

        let probabilities = self
            .evaluate(graph, features)
            .map_err(|e| InferenceError::InferenceFailed(e.to_string()))?;

        if probabilities.is_empty() || probabilities.iter().any(|p| !p.is_finite()) {
            return Err(InferenceError::InferenceFailed(format!(
                "classifier produced an invalid probability vector of length {}",
                probabilities.len()
            )));
        }

        Ok(PredictionVector::new(probabilities))
    }

    fn status(&self) -> ModelStatus {
        match self.graph {
            Ok(_) => ModelStatus::Loaded,
            Err(_) => ModelStatus::Unavailable,
        }
    }

    fn name(&self) -> &'static str {
        "onnx"
    }
}
