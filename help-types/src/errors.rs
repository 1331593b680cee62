use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// Failure taxonomy shared by the store, the core logic and the HTTP layer.
/// The display string is what clients see in the `error` field.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum HelpError {
    #[error("{0}")]
    NotFound(String),
    #[error("{0}")]
    InvalidState(String),
    #[error("{0}")]
    InvalidInput(String),
    #[error("{0}")]
    UpstreamFailure(String),
    #[error("{0}")]
    Storage(String),
}

impl HelpError {
    pub fn not_found(kind: &str) -> Self {
        HelpError::NotFound(format!("{} not found", kind))
    }

    pub fn missing(parameter: &str) -> Self {
        HelpError::InvalidInput(format!("{} is required", parameter))
    }
}

/// JSON body returned with every non-2xx response.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct ApiError {
    pub error: String,
}

impl From<&HelpError> for ApiError {
    fn from(err: &HelpError) -> Self {
        ApiError {
            error: err.to_string(),
        }
    }
}
