use candle_core::{Device, Tensor};

use crate::domain::FeatureMatrix;

use super::{FeatureError, N_MELS, TARGET_FRAMES};

/// Lays a `[128, 345]` feature matrix out as the `[batch, mels, frames, channel]`
/// tensor the classifier takes. No value is changed.
pub struct TensorBuilder {
    device: Device,
}

impl TensorBuilder {
    pub fn new(device: Device) -> Self {
        Self { device }
    }

    pub fn build(&self, features: &FeatureMatrix) -> Result<Tensor, FeatureError> {
        let shape = features.shape();
        if shape != (N_MELS, TARGET_FRAMES) {
            return Err(FeatureError::ShapeMismatch {
                expected: (N_MELS, TARGET_FRAMES),
                actual: shape,
            });
        }

        let data: Vec<f32> = features.values().iter().copied().collect();
        Tensor::from_vec(data, (1, N_MELS, TARGET_FRAMES, 1), &self.device)
            .map_err(|e| FeatureError::Tensor(e.to_string()))
    }
}

impl Default for TensorBuilder {
    fn default() -> Self {
        Self::new(Device::Cpu)
    }
}
