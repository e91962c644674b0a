use crate::domain::{ClassificationResult, LabelTable, PredictionVector, round_confidence};

#[derive(Debug, thiserror::Error)]
pub enum AssemblyError {
    #[error("classifier returned an empty prediction vector")]
    EmptyPredictions,
    #[error(
        "class index {index} has no label entry (label table has {table_size} entries, \
         classifier returned {class_count} classes)"
    )]
    LookupMismatch {
        index: usize,
        table_size: usize,
        class_count: usize,
    },
}

/// Turns a probability vector into the labelled result returned to clients.
#[derive(Debug, Clone, Default)]
pub struct ResponseAssembler {
    labels: LabelTable,
}

impl ResponseAssembler {
    pub fn new(labels: LabelTable) -> Self {
        Self { labels }
    }

    pub fn assemble(
        &self,
        predictions: PredictionVector,
    ) -> Result<ClassificationResult, AssemblyError> {
        let index = predictions.argmax().ok_or(AssemblyError::EmptyPredictions)?;

        let Some(entry) = self.labels.get(index) else {
            tracing::error!(
                index,
                table_size = self.labels.len(),
                class_count = predictions.class_count(),
                "Classifier output does not match the label table"
            );
            return Err(AssemblyError::LookupMismatch {
                index,
                table_size: self.labels.len(),
                class_count: predictions.class_count(),
            });
        };

        let confidence = predictions.get(index).unwrap_or_default();

        Ok(ClassificationResult {
            predicted_class: index,
            label: entry.label.clone(),
            description: entry.description.clone(),
            confidence: round_confidence(confidence),
            raw_predictions: predictions.into_inner(),
        })
    }
}
