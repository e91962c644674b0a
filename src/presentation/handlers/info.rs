use axum::Json;
use axum::response::IntoResponse;
use serde::Serialize;

#[derive(Serialize)]
pub struct ApiInfoResponse {
    pub message: String,
    pub version: String,
    pub docs_url: String,
    pub endpoints: Endpoints,
}

#[derive(Serialize)]
pub struct Endpoints {
    pub predict: String,
    pub health: String,
}

pub async fn info_handler() -> impl IntoResponse {
    Json(ApiInfoResponse {
        message: "Respire Inference API".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        docs_url: "/docs".to_string(),
        endpoints: Endpoints {
            predict: "/predict".to_string(),
            health: "/health".to_string(),
        },
    })
}
