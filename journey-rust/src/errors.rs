use crate::View;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum JourneyError {
    #[error("A question sequence needs at least one question")]
    EmptySequence,
    #[error("Duplicate question id: {0}")]
    DuplicateQuestion(String),
    /// The action is not available in the current view. The journey state is
    /// left untouched.
    #[error("Cannot {action} while in the {view} view")]
    InvalidTransition { view: View, action: &'static str },
}

#[derive(Debug, Error)]
pub enum GenerationError {
    #[error("Language model error: {0}")]
    LanguageModel(#[from] capsule_sdk::LanguageModelError),
    #[error("The model returned an empty response")]
    EmptyResponse,
    #[error("Malformed review: {0}")]
    Analysis(#[from] AnalysisError),
}

/// Failure to turn model output into an `AnalysisResult`.
#[derive(Debug, Error)]
pub enum AnalysisError {
    #[error("Invalid JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Unexpected shape: {0}")]
    Shape(&'static str),
}
