mod audio_decoder;
mod inference_engine;

pub use audio_decoder::{AudioDecoder, AudioDecoderError};
pub use inference_engine::{InferenceEngine, InferenceError};
