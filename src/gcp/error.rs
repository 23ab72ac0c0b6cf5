//! Google Cloud API Error Types

#[derive(Debug, thiserror::Error)]
pub enum GcpError {
    #[error("request to {url} failed: {source}")]
    Request {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("{url} returned HTTP {status}: {message}")]
    Status {
        url: String,
        status: u16,
        message: String,
    },

    #[error("failed to decode response from {url}: {source}")]
    Decode {
        url: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("no usable Google Cloud credentials: {message}")]
    Credentials { message: String },

    #[error("could not determine the Google Cloud project: {message}")]
    Project { message: String },
}

impl crate::core::error_handling::ContextualError for GcpError {
    fn is_user_actionable(&self) -> bool {
        matches!(
            self,
            GcpError::Credentials { .. } | GcpError::Project { .. }
        )
    }

    fn user_message(&self) -> Option<&str> {
        match self {
            GcpError::Credentials { message } | GcpError::Project { message } => Some(message),
            _ => None,
        }
    }
}

/// Result type for Google Cloud API calls
pub type GcpResult<T> = Result<T, GcpError>;
