//! Analyzer Error Types

use crate::core::error_handling::ContextualError;
use crate::gcp::error::GcpError;

#[derive(Debug, thiserror::Error)]
pub enum AnalyzerError {
    /// Container Analysis call failed (transport, status, decode or credentials)
    #[error(transparent)]
    Api(#[from] GcpError),

    /// Request cannot be analyzed as given
    #[error("invalid analyze request: {message}")]
    InvalidRequest { message: String },
}

impl ContextualError for AnalyzerError {
    fn is_user_actionable(&self) -> bool {
        match self {
            AnalyzerError::Api(e) => e.is_user_actionable(),
            AnalyzerError::InvalidRequest { .. } => false,
        }
    }

    fn user_message(&self) -> Option<&str> {
        match self {
            AnalyzerError::Api(e) => e.user_message(),
            AnalyzerError::InvalidRequest { .. } => None,
        }
    }
}

/// Result type for analyzer operations
pub type AnalyzerResult<T> = Result<T, AnalyzerError>;
