/// Sample rate every decoded clip is converted to.
pub const TARGET_SAMPLE_RATE: u32 = 16_000;

/// Mono PCM signal produced by the audio decoder.
#[derive(Debug, Clone, PartialEq)]
pub struct DecodedSamples {
    samples: Vec<f32>,
    sample_rate: u32,
}

impl DecodedSamples {
    pub fn new(samples: Vec<f32>, sample_rate: u32) -> Self {
        Self {
            samples,
            sample_rate,
        }
    }

    pub fn samples(&self) -> &[f32] {
        &self.samples
    }

    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn duration_secs(&self) -> f32 {
        if self.sample_rate == 0 {
            return 0.0;
        }
        self.samples.len() as f32 / self.sample_rate as f32
    }
}
