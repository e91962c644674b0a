use std::sync::Arc;

use crate::application::services::ClassificationService;

#[derive(Clone)]
pub struct AppState {
    pub classification_service: Arc<ClassificationService>,
}

impl AppState {
    pub fn new(classification_service: Arc<ClassificationService>) -> Self {
        Self {
            classification_service,
        }
    }
}
