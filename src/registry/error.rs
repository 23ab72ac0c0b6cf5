//! Registry Error Types

/// Boxed failure returned by listing collaborators
pub type ClientError = Box<dyn std::error::Error + Send + Sync>;

#[derive(Debug, thiserror::Error)]
pub enum RegistryError {
    /// Image reference string does not match the registry URI grammar
    #[error("invalid GAR URI format: {uri} ({reason})")]
    MalformedReference { uri: String, reason: String },

    /// A paginated listing call failed
    #[error("failed to list {resource}: {source}")]
    ListingFailed {
        resource: String,
        #[source]
        source: ClientError,
    },

    /// Listing abandoned because shutdown was requested
    #[error("listing {resource} cancelled")]
    Cancelled { resource: String },
}

impl RegistryError {
    /// Build a `ListingFailed` for the given resource name
    pub fn listing_failed(resource: impl Into<String>, source: impl Into<ClientError>) -> Self {
        RegistryError::ListingFailed {
            resource: resource.into(),
            source: source.into(),
        }
    }

    pub(crate) fn malformed(uri: &str, reason: impl Into<String>) -> Self {
        RegistryError::MalformedReference {
            uri: uri.to_string(),
            reason: reason.into(),
        }
    }
}

impl crate::core::error_handling::ContextualError for RegistryError {
    fn is_user_actionable(&self) -> bool {
        matches!(self, RegistryError::MalformedReference { .. })
    }

    fn user_message(&self) -> Option<&str> {
        match self {
            RegistryError::MalformedReference { reason, .. } => Some(reason),
            _ => None,
        }
    }
}

/// Result type for registry operations
pub type RegistryResult<T> = Result<T, RegistryError>;
