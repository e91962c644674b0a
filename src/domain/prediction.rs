use serde::Serialize;

/// Class probabilities in class-index order, as returned by the classifier.
#[derive(Debug, Clone, PartialEq)]
pub struct PredictionVector {
    probabilities: Vec<f32>,
}

impl PredictionVector {
    pub fn new(probabilities: Vec<f32>) -> Self {
        Self { probabilities }
    }

    pub fn probabilities(&self) -> &[f32] {
        &self.probabilities
    }

    pub fn class_count(&self) -> usize {
        self.probabilities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.probabilities.is_empty()
    }

    /// Index of the largest probability. Ties resolve to the lowest index.
    pub fn argmax(&self) -> Option<usize> {
        let mut best: Option<(usize, f32)> = None;
        for (index, &p) in self.probabilities.iter().enumerate() {
            match best {
                Some((_, top)) if p <= top => {}
                _ => best = Some((index, p)),
            }
        }
        best.map(|(index, _)| index)
    }

    pub fn get(&self, index: usize) -> Option<f32> {
        self.probabilities.get(index).copied()
    }

    pub fn sum(&self) -> f32 {
        self.probabilities.iter().sum()
    }

    pub fn into_inner(self) -> Vec<f32> {
        self.probabilities
    }
}

/// Final answer for one recording.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClassificationResult {
    pub predicted_class: usize,
    pub label: String,
    pub description: String,
    /// Probability of `predicted_class`, rounded to 4 decimals for display.
    pub confidence: f64,
    /// Unrounded classifier output.
    pub raw_predictions: Vec<f32>,
}

pub fn round_confidence(p: f32) -> f64 {
    (f64::from(p) * 10_000.0).round() / 10_000.0
}
