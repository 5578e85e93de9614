//! Seam to the external training service.

use breath_model::UploadedFile;
use thiserror::Error;

use crate::metadata::TrainingMetadata;

/// Everything the training service needs for one model.
#[derive(Debug, Clone)]
pub struct TrainingRequest {
    pub file: UploadedFile,
    pub metadata: TrainingMetadata,
}

/// Successful acknowledgement, with the service's message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrainingAck {
    pub message: String,
}

/// The service rejected or failed the request. `message` is shown verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct TrainingError {
    pub message: String,
}

impl TrainingError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Submits a validated upload for training.
///
/// Implementations perform no automatic retries; the workflow leaves the
/// state untouched on failure so the user can resubmit.
pub trait TrainingService {
    fn submit(&self, request: &TrainingRequest) -> Result<TrainingAck, TrainingError>;
}
