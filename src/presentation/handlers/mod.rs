mod error;
mod health;
mod info;
mod predict;

pub use error::{ApiError, ErrorResponse, status_for};
pub use health::{HealthResponse, health_handler};
pub use info::{ApiInfoResponse, info_handler};
pub use predict::{FILE_FIELD, PredictResponse, predict_handler};
