use thiserror::Error;

#[derive(Error, Debug)]
pub enum HierarchyError {
    #[error("computation cancelled")]
    Cancelled,
    #[error("type not found: {0}")]
    TypeNotFound(String),
    #[error("JSON serialization/deserialization error: {0}")]
    Json(#[from] serde_json::Error),
}

impl HierarchyError {
    /// Cancellation is an expected outcome; callers should retry rather than report it.
    pub fn is_cancelled(&self) -> bool {
        matches!(self, HierarchyError::Cancelled)
    }
}

pub type Result<T> = std::result::Result<T, HierarchyError>;
