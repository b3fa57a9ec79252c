use thiserror::Error;

use crate::numbers::NumbersError;

/// Failures the pipeline surfaces to callers.
///
/// `RegistrationFailed` and `CommitFailed` always abort a transition before
/// any registry mutation, so a caller observing either can assume the
/// registry is exactly as it was before the request.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("job not found: {0}")]
    NotFound(String),

    #[error("job already registered: {0}")]
    AlreadyExists(String),

    #[error("invalid transition request: {0}")]
    Validation(String),

    #[error("asset registration failed: {0}")]
    RegistrationFailed(#[source] NumbersError),

    #[error("event commit failed: {0}")]
    CommitFailed(#[source] NumbersError),
}
