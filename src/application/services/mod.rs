mod classification_service;
mod response_assembler;

pub use classification_service::{
    ClassificationError, ClassificationLimits, ClassificationPipeline, ClassificationService,
};
pub use response_assembler::{AssemblyError, ResponseAssembler};
