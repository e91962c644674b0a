use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use serde::Serialize;

use crate::presentation::state::AppState;

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub message: String,
    pub model_status: String,
    pub engine: String,
}

pub async fn health_handler(State(state): State<AppState>) -> impl IntoResponse {
    let service = &state.classification_service;

    (
        StatusCode::OK,
        Json(HealthResponse {
            status: "healthy".to_string(),
            message: "Respire API is running".to_string(),
            model_status: service.model_status().as_str().to_string(),
            engine: service.engine_name().to_string(),
        }),
    )
}
