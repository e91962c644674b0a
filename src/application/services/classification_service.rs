use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::application::features::{
    FeatureError, FrameNormalizer, MelSpectrogramExtractor, TensorBuilder,
};
use crate::application::ports::{
    AudioDecoder, AudioDecoderError, InferenceEngine, InferenceError,
};
use crate::domain::{AudioClip, ClassificationResult, ModelStatus, TARGET_SAMPLE_RATE};

use super::response_assembler::{AssemblyError, ResponseAssembler};

/// Per-request resource caps.
#[derive(Debug, Clone, Copy)]
pub struct ClassificationLimits {
    pub max_upload_bytes: usize,
    /// `0.0` disables the duration check.
    pub max_clip_seconds: f32,
    pub request_timeout: Duration,
}

impl Default for ClassificationLimits {
    fn default() -> Self {
        Self {
            max_upload_bytes: 10 * 1024 * 1024,
            max_clip_seconds: 5.0,
            request_timeout: Duration::from_secs(30),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ClassificationError {
    #[error("{0}")]
    InvalidInput(String),
    #[error("upload is {size} bytes; the limit is {limit} bytes")]
    ClipTooLarge { size: usize, limit: usize },
    #[error("clip is at least {duration_secs:.2}s long; the limit is {limit_secs:.2}s")]
    ClipTooLong { duration_secs: f32, limit_secs: f32 },
    #[error("could not decode audio: {0}")]
    Decode(AudioDecoderError),
    #[error("cannot classify a silent or constant recording: {0}")]
    DegenerateFeature(FeatureError),
    #[error("model is not available: {0}")]
    ModelUnavailable(String),
    #[error("inference failed: {0}")]
    Inference(String),
    #[error("{0}")]
    LookupMismatch(AssemblyError),
    #[error("unexpected feature shape: {0}")]
    ShapeMismatch(FeatureError),
    #[error("request timed out after {0:?}")]
    Timeout(Duration),
    #[error("internal error: {0}")]
    Internal(String),
}

impl ClassificationError {
    /// Stable machine-readable name for the error class.
    pub fn kind(&self) -> &'static str {
        match self {
            ClassificationError::InvalidInput(_) => "invalid_input",
            ClassificationError::ClipTooLarge { .. } => "clip_too_large",
            ClassificationError::ClipTooLong { .. } => "clip_too_long",
            ClassificationError::Decode(_) => "decode_error",
            ClassificationError::DegenerateFeature(_) => "degenerate_features",
            ClassificationError::ModelUnavailable(_) => "model_unavailable",
            ClassificationError::Inference(_) => "inference_error",
            ClassificationError::LookupMismatch(_) => "lookup_mismatch",
            ClassificationError::ShapeMismatch(_) => "shape_mismatch",
            ClassificationError::Timeout(_) => "timeout",
            ClassificationError::Internal(_) => "internal_error",
        }
    }
}

impl From<AudioDecoderError> for ClassificationError {
    fn from(e: AudioDecoderError) -> Self {
        match e {
            AudioDecoderError::ClipTooLong {
                duration_secs,
                limit_secs,
            } => ClassificationError::ClipTooLong {
                duration_secs,
                limit_secs,
            },
            other => ClassificationError::Decode(other),
        }
    }
}

impl From<FeatureError> for ClassificationError {
    fn from(e: FeatureError) -> Self {
        match e {
            FeatureError::Degenerate { .. } | FeatureError::NonFinite => {
                ClassificationError::DegenerateFeature(e)
            }
            FeatureError::ShapeMismatch { .. } => ClassificationError::ShapeMismatch(e),
            FeatureError::EmptySignal => ClassificationError::Decode(
                AudioDecoderError::DecodingFailed("no audio samples decoded".to_string()),
            ),
            FeatureError::SampleRateMismatch { .. } | FeatureError::Tensor(_) => {
                ClassificationError::Internal(e.to_string())
            }
        }
    }
}

impl From<InferenceError> for ClassificationError {
    fn from(e: InferenceError) -> Self {
        match e {
            InferenceError::ModelUnavailable(msg) | InferenceError::ModelLoadFailed(msg) => {
                ClassificationError::ModelUnavailable(msg)
            }
            InferenceError::InferenceFailed(msg) => ClassificationError::Inference(msg),
        }
    }
}

impl From<AssemblyError> for ClassificationError {
    fn from(e: AssemblyError) -> Self {
        match e {
            AssemblyError::EmptyPredictions => ClassificationError::Inference(e.to_string()),
            AssemblyError::LookupMismatch { .. } => ClassificationError::LookupMismatch(e),
        }
    }
}

/// The synchronous decode → features → inference → assembly chain. Runs on
/// the blocking pool; every stage short-circuits the rest on failure.
pub struct ClassificationPipeline {
    decoder: Arc<dyn AudioDecoder>,
    extractor: MelSpectrogramExtractor,
    normalizer: FrameNormalizer,
    tensor_builder: TensorBuilder,
    engine: Arc<dyn InferenceEngine>,
    assembler: ResponseAssembler,
    max_clip_seconds: f32,
}

impl ClassificationPipeline {
    pub fn new(
        decoder: Arc<dyn AudioDecoder>,
        engine: Arc<dyn InferenceEngine>,
        assembler: ResponseAssembler,
        max_clip_seconds: f32,
    ) -> Self {
        Self {
            decoder,
            extractor: MelSpectrogramExtractor::new(TARGET_SAMPLE_RATE),
            normalizer: FrameNormalizer::default(),
            tensor_builder: TensorBuilder::default(),
            engine,
            assembler,
            max_clip_seconds,
        }
    }

    pub fn run(&self, clip: &AudioClip) -> Result<ClassificationResult, ClassificationError> {
        let started = Instant::now();

        let max_duration = (self.max_clip_seconds > 0.0).then_some(self.max_clip_seconds);
        let pcm = self.decoder.decode(clip, max_duration).inspect_err(|e| {
            tracing::warn!(
                stage = "decode",
                bytes = clip.len(),
                media_type = %clip.media_type(),
                error = %e,
                "Audio decoding failed"
            );
        })?;

        let spectrogram = self.extractor.extract(&pcm).inspect_err(|e| {
            tracing::error!(
                stage = "extract",
                samples = pcm.len(),
                error = %e,
                "Feature extraction failed"
            );
        })?;
        let (mel_bands, frames) = (spectrogram.mel_bands(), spectrogram.frames());

        let features = self.normalizer.normalize(spectrogram).inspect_err(|e| {
            tracing::warn!(
                stage = "normalize",
                mel_bands,
                frames,
                error = %e,
                "Frame normalization failed"
            );
        })?;

        let tensor = self.tensor_builder.build(&features).inspect_err(|e| {
            tracing::error!(
                stage = "tensor",
                shape = ?features.shape(),
                error = %e,
                "Tensor assembly failed"
            );
        })?;

        let predictions = self.engine.predict(&tensor).inspect_err(|e| {
            tracing::error!(
                stage = "inference",
                engine = self.engine.name(),
                shape = ?tensor.dims(),
                error = %e,
                "Inference failed"
            );
        })?;

        let result = self.assembler.assemble(predictions)?;

        tracing::info!(
            bytes = clip.len(),
            samples = pcm.len(),
            duration_secs = pcm.duration_secs(),
            frames,
            predicted_class = result.predicted_class,
            confidence = result.confidence,
            elapsed_ms = started.elapsed().as_millis() as u64,
            "Classification completed"
        );

        Ok(result)
    }
}

/// Request-level entry point: admission checks, then the pipeline on the
/// blocking pool under a wall-clock timeout.
pub struct ClassificationService {
    pipeline: Arc<ClassificationPipeline>,
    engine: Arc<dyn InferenceEngine>,
    limits: ClassificationLimits,
}

impl ClassificationService {
    pub fn new(
        decoder: Arc<dyn AudioDecoder>,
        engine: Arc<dyn InferenceEngine>,
        assembler: ResponseAssembler,
        limits: ClassificationLimits,
    ) -> Self {
        let pipeline = ClassificationPipeline::new(
            decoder,
            Arc::clone(&engine),
            assembler,
            limits.max_clip_seconds,
        );

        Self {
            pipeline: Arc::new(pipeline),
            engine,
            limits,
        }
    }

    pub fn model_status(&self) -> ModelStatus {
        self.engine.status()
    }

    pub fn engine_name(&self) -> &'static str {
        self.engine.name()
    }

    pub fn limits(&self) -> &ClassificationLimits {
        &self.limits
    }

    pub fn check_available(&self) -> Result<(), ClassificationError> {
        match self.engine.status() {
            ModelStatus::Loaded => Ok(()),
            ModelStatus::Unavailable => Err(ClassificationError::ModelUnavailable(
                "Model is not available or failed to load.".to_string(),
            )),
        }
    }

    pub fn validate_media_type(&self, clip: &AudioClip) -> Result<(), ClassificationError> {
        if clip.media_type().is_audio() {
            return Ok(());
        }
        tracing::warn!(media_type = %clip.media_type(), "Rejected non-audio upload");
        Err(ClassificationError::InvalidInput(format!(
            "Invalid file type '{}'. Please upload an audio file.",
            clip.media_type()
        )))
    }

    #[tracing::instrument(
        skip(self, clip),
        fields(bytes = clip.len(), media_type = %clip.media_type())
    )]
    pub async fn classify(
        &self,
        clip: AudioClip,
    ) -> Result<ClassificationResult, ClassificationError> {
        self.check_available()?;
        self.validate_media_type(&clip)?;

        if clip.len() > self.limits.max_upload_bytes {
            tracing::warn!(
                limit = self.limits.max_upload_bytes,
                "Upload exceeds size limit"
            );
            return Err(ClassificationError::ClipTooLarge {
                size: clip.len(),
                limit: self.limits.max_upload_bytes,
            });
        }

        let pipeline = Arc::clone(&self.pipeline);
        let timeout = self.limits.request_timeout;

        tokio::time::timeout(
            timeout,
            tokio::task::spawn_blocking(move || pipeline.run(&clip)),
        )
        .await
        .map_err(|_| {
            tracing::error!(
                timeout_ms = timeout.as_millis() as u64,
                "Classification timed out"
            );
            ClassificationError::Timeout(timeout)
        })?
        .map_err(|e| ClassificationError::Internal(format!("task join error: {e}")))?
    }
}
