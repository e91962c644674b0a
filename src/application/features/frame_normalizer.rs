use ndarray::{Array2, s};

use crate::domain::{FeatureMatrix, Spectrogram};

use super::FeatureError;

/// Number of time frames the classifier consumes.
pub const TARGET_FRAMES: usize = 345;

/// Forces a spectrogram to a fixed frame count, then rescales it to `[0, 1]`.
#[derive(Debug, Clone, Copy)]
pub struct FrameNormalizer {
    target_frames: usize,
}

impl FrameNormalizer {
    pub fn new(target_frames: usize) -> Self {
        Self { target_frames }
    }

    /// Keeps the first `target_frames` frames, or right-pads with zero-valued
    /// frames. Frames past the target are dropped unseen.
    pub fn fit_frames(&self, spectrogram: Spectrogram) -> Array2<f32> {
        let frames = spectrogram.frames();
        let values = spectrogram.into_values();

        if frames == self.target_frames {
            return values;
        }
        if frames > self.target_frames {
            return values.slice(s![.., ..self.target_frames]).to_owned();
        }

        let mut fitted = Array2::<f32>::zeros((values.nrows(), self.target_frames));
        fitted.slice_mut(s![.., ..frames]).assign(&values);
        fitted
    }

    pub fn normalize(&self, spectrogram: Spectrogram) -> Result<FeatureMatrix, FeatureError> {
        let original_frames = spectrogram.frames();
        let fitted = self.fit_frames(spectrogram);
        let scaled = min_max_scale(fitted)?;

        tracing::debug!(
            original_frames,
            target_frames = self.target_frames,
            "Normalized spectrogram frames and amplitude"
        );

        Ok(FeatureMatrix::new(scaled))
    }
}

impl Default for FrameNormalizer {
    fn default() -> Self {
        Self::new(TARGET_FRAMES)
    }
}

/// Global `(x - min) / (max - min)`. A zero or non-finite range would put NaN
/// into the tensor, so it is rejected.
pub fn min_max_scale(mut values: Array2<f32>) -> Result<Array2<f32>, FeatureError> {
    if values.iter().any(|v| !v.is_finite()) {
        return Err(FeatureError::NonFinite);
    }

    let (min, max) = values
        .iter()
        .fold((f32::INFINITY, f32::NEG_INFINITY), |(lo, hi), &v| {
            (lo.min(v), hi.max(v))
        });
    let range = max - min;

    if !(range.is_finite() && range > 0.0) {
        return Err(FeatureError::Degenerate { min, max });
    }

    values.mapv_inplace(|v| (v - min) / range);
    Ok(values)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_matrix_is_degenerate() {
        let result = min_max_scale(Array2::zeros((0, 0)));
        assert!(matches!(result, Err(FeatureError::Degenerate { .. })));
    }

    #[test]
    fn scaling_maps_extremes_to_unit_interval() {
        let values = Array2::from_shape_vec((2, 2), vec![-80.0, -40.0, -20.0, 0.0]).unwrap();
        let scaled = min_max_scale(values).unwrap();
        assert_eq!(scaled[[0, 0]], 0.0);
        assert_eq!(scaled[[1, 1]], 1.0);
        assert!((scaled[[0, 1]] - 0.5).abs() < 1e-6);
    }
}
