use ndarray::Array2;

/// Log-power mel spectrogram laid out as `[mel_bands, frames]`, in dB
/// relative to the loudest bin of the same clip.
#[derive(Debug, Clone, PartialEq)]
pub struct Spectrogram {
    values: Array2<f32>,
}

impl Spectrogram {
    pub fn new(values: Array2<f32>) -> Self {
        Self { values }
    }

    pub fn mel_bands(&self) -> usize {
        self.values.nrows()
    }

    pub fn frames(&self) -> usize {
        self.values.ncols()
    }

    pub fn values(&self) -> &Array2<f32> {
        &self.values
    }

    pub fn into_values(self) -> Array2<f32> {
        self.values
    }
}

/// Fixed-length spectrogram with amplitudes rescaled to `[0, 1]`.
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureMatrix {
    values: Array2<f32>,
}

impl FeatureMatrix {
    pub fn new(values: Array2<f32>) -> Self {
        Self { values }
    }

    pub fn shape(&self) -> (usize, usize) {
        self.values.dim()
    }

    pub fn values(&self) -> &Array2<f32> {
        &self.values
    }

    pub fn into_values(self) -> Array2<f32> {
        self.values
    }
}
