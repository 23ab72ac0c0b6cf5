//! Scanner Error Types

use crate::analyzer::error::AnalyzerError;
use crate::core::error_handling::ContextualError;
use crate::export::error::ExportError;
use crate::registry::error::RegistryError;
use std::fmt;

#[derive(Debug, thiserror::Error)]
pub enum ScanError {
    /// The resolver yielded an error instead of a target
    #[error("resolving image stream: {0}")]
    Resolution(#[from] RegistryError),

    /// Fetching findings for one target failed
    #[error("analyzing {uri}: {source}")]
    AnalysisFailed {
        uri: String,
        #[source]
        source: AnalyzerError,
    },

    /// Writing the report failed; always fatal
    #[error("failed to export results: {0}")]
    ExportFailed(#[from] ExportError),

    /// Analysis abandoned because shutdown was requested
    #[error("analysis of {uri} cancelled")]
    Cancelled { uri: String },

    #[error("Configuration error: {message}")]
    Configuration { message: String },

    /// A worker panicked or shared state was poisoned
    #[error("internal error: {message}")]
    Internal { message: String },

    /// Every failure recorded during an otherwise completed scan
    #[error(transparent)]
    PartialFailure(AggregateError),
}

impl ContextualError for ScanError {
    fn is_user_actionable(&self) -> bool {
        match self {
            ScanError::Configuration { .. } => true,
            ScanError::Resolution(e) => e.is_user_actionable(),
            ScanError::AnalysisFailed { source, .. } => source.is_user_actionable(),
            _ => false,
        }
    }

    fn user_message(&self) -> Option<&str> {
        match self {
            ScanError::Configuration { message } => Some(message),
            ScanError::Resolution(e) => e.user_message(),
            ScanError::AnalysisFailed { source, .. } => source.user_message(),
            _ => None,
        }
    }
}

/// Many scan errors reported as one
#[derive(Debug)]
pub struct AggregateError {
    errors: Vec<ScanError>,
}

impl AggregateError {
    pub fn new(errors: Vec<ScanError>) -> Self {
        Self { errors }
    }

    pub fn errors(&self) -> &[ScanError] {
        &self.errors
    }

    pub fn len(&self) -> usize {
        self.errors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }
}

impl fmt::Display for AggregateError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "scan completed with partial errors:")?;
        for error in &self.errors {
            write!(f, "\n{}", error)?;
        }
        Ok(())
    }
}

impl std::error::Error for AggregateError {}

pub type ScanResult<T> = Result<T, ScanError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_aggregate_lists_every_failure() {
        let aggregate = AggregateError::new(vec![
            ScanError::Cancelled {
                uri: "img-a".to_string(),
            },
            ScanError::Resolution(RegistryError::Cancelled {
                resource: "repo".to_string(),
            }),
        ]);

        assert_eq!(
            ScanError::PartialFailure(aggregate).to_string(),
            "scan completed with partial errors:\nanalysis of img-a cancelled\nresolving image stream: listing repo cancelled"
        );
    }

    #[test]
    fn test_configuration_is_user_actionable() {
        let error = ScanError::Configuration {
            message: "concurrency must be at least 1".to_string(),
        };
        assert!(error.is_user_actionable());
        assert_eq!(error.user_message(), Some("concurrency must be at least 1"));
    }
}
