#![allow(dead_code)]

use std::f32::consts::PI;
use std::time::Duration;

use candle_core::Tensor;

use respire::application::ports::{InferenceEngine, InferenceError};
use respire::domain::{ModelStatus, PredictionVector};

pub fn build_wav(sample_rate: u32, channels: u16, samples: &[i16]) -> Vec<u8> {
    let block_align = channels * 2;
    let byte_rate = sample_rate * block_align as u32;
    let data_size = (samples.len() * 2) as u32;
    let file_size = 36 + data_size;

    let mut wav = Vec::with_capacity(44 + data_size as usize);
    wav.extend_from_slice(b"RIFF");
    wav.extend_from_slice(&file_size.to_le_bytes());
    wav.extend_from_slice(b"WAVE");
    wav.extend_from_slice(b"fmt ");
    wav.extend_from_slice(&16u32.to_le_bytes());
    wav.extend_from_slice(&1u16.to_le_bytes()); // PCM
    wav.extend_from_slice(&channels.to_le_bytes());
    wav.extend_from_slice(&sample_rate.to_le_bytes());
    wav.extend_from_slice(&byte_rate.to_le_bytes());
    wav.extend_from_slice(&block_align.to_le_bytes());
    wav.extend_from_slice(&16u16.to_le_bytes()); // bits per sample
    wav.extend_from_slice(b"data");
    wav.extend_from_slice(&data_size.to_le_bytes());
    for &s in samples {
        wav.extend_from_slice(&s.to_le_bytes());
    }
    wav
}

/// Sum of sines, `(frequency_hz, amplitude)` pairs.
pub fn tone(sample_rate: u32, num_samples: usize, partials: &[(f32, f32)]) -> Vec<f32> {
    (0..num_samples)
        .map(|n| {
            let t = n as f32 / sample_rate as f32;
            partials
                .iter()
                .map(|&(freq, amp)| amp * (2.0 * PI * freq * t).sin())
                .sum()
        })
        .collect()
}

/// Deterministic uniform noise in `[-amplitude, amplitude]`.
pub fn noise(num_samples: usize, amplitude: f32, seed: u32) -> Vec<f32> {
    let mut state = seed.wrapping_mul(2_654_435_761).max(1);
    (0..num_samples)
        .map(|_| {
            state ^= state << 13;
            state ^= state >> 17;
            state ^= state << 5;
            (state as f32 / u32::MAX as f32 * 2.0 - 1.0) * amplitude
        })
        .collect()
}

pub fn to_i16(samples: &[f32]) -> Vec<i16> {
    samples
        .iter()
        .map(|s| (s.clamp(-1.0, 1.0) * i16::MAX as f32) as i16)
        .collect()
}

/// A mono 16 kHz WAV of a breathing-like tone mix with a little noise.
pub fn breath_wav(seconds: f32) -> Vec<u8> {
    let n = (16_000.0 * seconds) as usize;
    let mut signal = tone(16_000, n, &[(220.0, 0.3), (1_250.0, 0.1)]);
    for (s, e) in signal.iter_mut().zip(noise(n, 0.05, 7)) {
        *s += e;
    }
    build_wav(16_000, 1, &to_i16(&signal))
}

pub fn multipart_body(boundary: &str, field: &str, content_type: &str, data: &[u8]) -> Vec<u8> {
    let mut body = Vec::new();
    body.extend_from_slice(format!("--{boundary}\r\n").as_bytes());
    body.extend_from_slice(
        format!(
            "Content-Disposition: form-data; name=\"{field}\"; filename=\"upload\"\r\n"
        )
        .as_bytes(),
    );
    body.extend_from_slice(format!("Content-Type: {content_type}\r\n\r\n").as_bytes());
    body.extend_from_slice(data);
    body.extend_from_slice(format!("\r\n--{boundary}--\r\n").as_bytes());
    body
}

/// Engine returning a fixed vector, optionally after a delay or reporting
/// itself unavailable.
pub struct FixedEngine {
    pub probabilities: Vec<f32>,
    pub delay: Duration,
    pub status: ModelStatus,
}

impl FixedEngine {
    pub fn new(probabilities: Vec<f32>) -> Self {
        Self {
            probabilities,
            delay: Duration::ZERO,
            status: ModelStatus::Loaded,
        }
    }
}

impl InferenceEngine for FixedEngine {
    fn predict(&self, features: &Tensor) -> Result<PredictionVector, InferenceError> {
        assert_eq!(features.dims(), &[1, 128, 345, 1]);
        std::thread::sleep(self.delay);
        Ok(PredictionVector::new(self.probabilities.clone()))
    }

    fn status(&self) -> ModelStatus {
        self.status
    }

    fn name(&self) -> &'static str {
        "fixed"
    }
}

#[cfg(feature = "onnx")]
pub mod onnx {
    use candle_onnx::onnx::tensor_proto::DataType;
    use candle_onnx::onnx::{GraphProto, ModelProto, NodeProto, TensorProto, ValueInfoProto};

    use respire::application::features::{N_MELS, TARGET_FRAMES};

    pub const CLASS_COUNT: usize = 7;

    const FEATURES: usize = N_MELS * TARGET_FRAMES;

    /// `[1, 128, 345, 1]` → Flatten → MatMul(W) → Softmax, `[1, CLASS_COUNT]`.
    pub fn linear_softmax_classifier() -> ModelProto {
        let weights: Vec<f32> = (0..FEATURES * CLASS_COUNT)
            .map(|i| ((i * 31 % 17) as f32 - 8.0) * 1e-3)
            .collect();

        model(
            vec![
                node("Flatten", &["features"], "flat"),
                node("MatMul", &["flat", "W"], "logits"),
                node("Softmax", &["logits"], "probabilities"),
            ],
            vec![float_tensor("W", &[FEATURES, CLASS_COUNT], weights)],
            "probabilities",
        )
    }

    /// `[1, 128, 345, 1]` → Flatten → MatMul(0) → Add(bias): emits `bias` as
    /// raw logits whatever the input.
    pub fn constant_logits_classifier(bias: Vec<f32>) -> ModelProto {
        let classes = bias.len();
        model(
            vec![
                node("Flatten", &["features"], "flat"),
                node("MatMul", &["flat", "W"], "projected"),
                node("Add", &["projected", "bias"], "logits"),
            ],
            vec![
                float_tensor("W", &[FEATURES, classes], vec![0.0; FEATURES * classes]),
                float_tensor("bias", &[classes], bias),
            ],
            "logits",
        )
    }

    fn node(op: &str, inputs: &[&str], output: &str) -> NodeProto {
        NodeProto {
            op_type: op.to_string(),
            input: inputs.iter().map(|s| s.to_string()).collect(),
            output: vec![output.to_string()],
            ..Default::default()
        }
    }

    fn float_tensor(name: &str, dims: &[usize], data: Vec<f32>) -> TensorProto {
        TensorProto {
            name: name.to_string(),
            dims: dims.iter().map(|&d| d as i64).collect(),
            data_type: DataType::Float as i32,
            float_data: data,
            ..Default::default()
        }
    }

    fn model(nodes: Vec<NodeProto>, initializer: Vec<TensorProto>, output: &str) -> ModelProto {
        let graph = GraphProto {
            node: nodes,
            initializer,
            input: vec![ValueInfoProto {
                name: "features".to_string(),
                ..Default::default()
            }],
            output: vec![ValueInfoProto {
                name: output.to_string(),
                ..Default::default()
            }],
            ..Default::default()
        };

        ModelProto {
            graph: Some(graph),
            ..Default::default()
        }
    }
}
