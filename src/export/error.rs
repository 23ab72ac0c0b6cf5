//! Export Error Types

#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    #[error("failed to write report: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to serialize report: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("failed to render report template: {0}")]
    Template(#[from] tera::Error),

    #[error("report writer unavailable: {message}")]
    Writer { message: String },
}

impl crate::core::error_handling::ContextualError for ExportError {
    fn is_user_actionable(&self) -> bool {
        false
    }

    fn user_message(&self) -> Option<&str> {
        None
    }
}

/// Result type for export operations
pub type ExportResult<T> = Result<T, ExportError>;
