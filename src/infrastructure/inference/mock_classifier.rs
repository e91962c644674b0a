use std::sync::Mutex;
use std::time::Duration;

use candle_core::Tensor;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::application::ports::{InferenceEngine, InferenceError};
use crate::domain::{ModelStatus, PredictionVector};

pub const MOCK_CLASS_COUNT: usize = 4;

/// Stand-in classifier that ignores its input and returns a random but
/// well-formed probability vector. One class gets 0.70..0.95; the rest of the
/// mass is spread over the others, so the winner is always unique.
pub struct MockClassifier {
    rng: Mutex<StdRng>,
    class_count: usize,
    delay: Duration,
}

impl MockClassifier {
    pub fn new(seed: Option<u64>, delay: Duration) -> Self {
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        Self {
            rng: Mutex::new(rng),
            class_count: MOCK_CLASS_COUNT,
            delay,
        }
    }

    pub fn class_count(&self) -> usize {
        self.class_count
    }

    fn sample(&self) -> Vec<f32> {
        let mut rng = match self.rng.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };

        let winner = rng.gen_range(0..self.class_count);
        let confidence: f32 = rng.gen_range(0.70..0.95);

        let weights: Vec<f32> = (0..self.class_count - 1)
            .map(|_| rng.gen_range(0.01f32..1.0))
            .collect();
        let total: f32 = weights.iter().sum();
        let remainder = 1.0 - confidence;

        let mut others = weights.into_iter().map(|w| w / total * remainder);
        (0..self.class_count)
            .map(|class| {
                if class == winner {
                    confidence
                } else {
                    others.next().unwrap_or_default()
                }
            })
            .collect()
    }
}

impl Default for MockClassifier {
    fn default() -> Self {
        Self::new(None, Duration::ZERO)
    }
}

impl InferenceEngine for MockClassifier {
    fn predict(&self, _features: &Tensor) -> Result<PredictionVector, InferenceError> {
        if !self.delay.is_zero() {
            std::thread::sleep(self.delay);
        }
        Ok(PredictionVector::new(self.sample()))
    }

    fn status(&self) -> ModelStatus {
        ModelStatus::Loaded
    }

    fn name(&self) -> &'static str {
        "mock"
    }
}
