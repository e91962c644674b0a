use axum::Json;
use axum::extract::{Multipart, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use serde::Serialize;

use crate::domain::{AudioClip, ClassificationResult};
use crate::presentation::state::AppState;

use super::error::ApiError;

pub const FILE_FIELD: &str = "file";
const FALLBACK_CONTENT_TYPE: &str = "application/octet-stream";

#[derive(Debug, Serialize)]
pub struct PredictResponse {
    pub predicted_class: usize,
    pub label: String,
    pub description: String,
    pub confidence: f64,
    pub raw_predictions: Vec<f32>,
}

impl From<ClassificationResult> for PredictResponse {
    fn from(result: ClassificationResult) -> Self {
        Self {
            predicted_class: result.predicted_class,
            label: result.label,
            description: result.description,
            confidence: result.confidence,
            raw_predictions: result.raw_predictions,
        }
    }
}

#[tracing::instrument(skip(state, multipart))]
pub async fn predict_handler(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<impl IntoResponse, ApiError> {
    let service = &state.classification_service;
    service.check_available()?;

    let clip = read_audio_field(multipart).await?;

    tracing::debug!(
        bytes = clip.len(),
        media_type = %clip.media_type(),
        "Audio upload received"
    );

    let result = service.classify(clip).await?;
    Ok((StatusCode::OK, Json(PredictResponse::from(result))))
}

async fn read_audio_field(mut multipart: Multipart) -> Result<AudioClip, ApiError> {
    loop {
        let field = match multipart.next_field().await {
            Ok(Some(field)) => field,
            Ok(None) => {
                return Err(ApiError::bad_request(format!(
                    "No '{FILE_FIELD}' field in multipart upload"
                )));
            }
            Err(e) => {
                return Err(ApiError {
                    status: e.status(),
                    kind: "invalid_input",
                    message: format!("Failed to read multipart: {}", e.body_text()),
                });
            }
        };

        if field.name() != Some(FILE_FIELD) {
            continue;
        }

        let content_type = field
            .content_type()
            .unwrap_or(FALLBACK_CONTENT_TYPE)
            .to_string();

        let data = field.bytes().await.map_err(|e| ApiError {
            status: e.status(),
            kind: if e.status() == StatusCode::PAYLOAD_TOO_LARGE {
                "clip_too_large"
            } else {
                "invalid_input"
            },
            message: format!("Failed to read file: {}", e.body_text()),
        })?;

        return Ok(AudioClip::new(data.to_vec(), content_type));
    }
}
