use crate::RecordId;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ScrubError {
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("The comment IP scrub setting has not been enabled")]
    NotEnabled,

    #[error("Query failed: {0}")]
    QueryFailed(String),

    #[error("Update failed for comment {id}: {detail}")]
    UpdateFailed { id: RecordId, detail: String },

    #[error("Invalid config: {0}")]
    InvalidConfig(String),

    #[error("Option store error: {0}")]
    Store(String),
}

impl ScrubError {
    /// Short machine-readable code, used in logs and by callers that need to branch
    pub fn code(&self) -> &'static str {
        match self {
            ScrubError::InvalidArgument(_) => "invalid_argument",
            ScrubError::NotEnabled => "not_enabled",
            ScrubError::QueryFailed(_) => "query_failed",
            ScrubError::UpdateFailed { .. } => "update_failed",
            ScrubError::InvalidConfig(_) => "invalid_config",
            ScrubError::Store(_) => "store",
        }
    }
}

pub type Result<T> = std::result::Result<T, ScrubError>;
