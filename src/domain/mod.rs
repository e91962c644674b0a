mod audio_clip;
mod decoded_samples;
mod label_table;
mod model_status;
mod prediction;
mod spectrogram;

pub use audio_clip::{AudioClip, MediaType};
pub use decoded_samples::{DecodedSamples, TARGET_SAMPLE_RATE};
pub use label_table::{ConditionLabel, LabelTable};
pub use model_status::ModelStatus;
pub use prediction::{ClassificationResult, PredictionVector, round_confidence};
pub use spectrogram::{FeatureMatrix, Spectrogram};
