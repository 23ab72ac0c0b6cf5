//! CLI argument validation
//!
//! Runs after the config file has been merged, so values that came from the
//! file get the same checks as command-line flags.

use crate::analyzer::types::Severity;
use crate::core::error_handling::ContextualError;
use crate::export::traits::ExportFormat;

use super::args::Args;

/// A setting the user has to fix before a scan can start
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{message}")]
pub struct ValidationError {
    message: String,
}

impl ValidationError {
    pub fn new(message: &str) -> Self {
        Self {
            message: message.to_string(),
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl ContextualError for ValidationError {
    fn is_user_actionable(&self) -> bool {
        true
    }

    fn user_message(&self) -> Option<&str> {
        Some(&self.message)
    }
}

impl Args {
    /// Validate the merged arguments for consistency and constraints
    pub fn validate(&self) -> Result<(), ValidationError> {
        self.validate_location()?;
        self.validate_project()?;
        self.validate_severity()?;
        self.validate_output_format()?;
        self.validate_concurrency()?;
        Ok(())
    }

    fn validate_location(&self) -> Result<(), ValidationError> {
        match self.location.as_deref().map(str::trim) {
            Some(location) if !location.is_empty() => Ok(()),
            _ => Err(ValidationError::new(
                "Location is required: pass --location or set 'location' in the config file",
            )),
        }
    }

    fn validate_project(&self) -> Result<(), ValidationError> {
        match self.project.as_deref() {
            Some(project) if project.trim().is_empty() => {
                Err(ValidationError::new("Project ID cannot be empty"))
            }
            _ => Ok(()),
        }
    }

    fn validate_severity(&self) -> Result<(), ValidationError> {
        if let Some(name) = self.min_severity.as_deref() {
            if Severity::parse(name).is_none() {
                return Err(ValidationError::new(&format!(
                    "Invalid minimum severity '{}'. Allowed: {}",
                    name,
                    Severity::names().collect::<Vec<_>>().join(", ")
                )));
            }
        }
        Ok(())
    }

    fn validate_output_format(&self) -> Result<(), ValidationError> {
        if let Some(name) = self.output_format.as_deref() {
            if ExportFormat::parse(name).is_none() {
                return Err(ValidationError::new(&format!(
                    "Invalid output format '{}'. Allowed: {}",
                    name,
                    ExportFormat::names().collect::<Vec<_>>().join(", ")
                )));
            }
        }
        Ok(())
    }

    fn validate_concurrency(&self) -> Result<(), ValidationError> {
        if self.concurrency == Some(0) {
            return Err(ValidationError::new(
                "Concurrency must be between 1 and 255",
            ));
        }
        Ok(())
    }
}

/// Check a raw concurrency value (config files carry plain integers)
pub fn validate_concurrency_value(value: i64) -> Result<u8, ValidationError> {
    match u8::try_from(value) {
        Ok(n) if n >= 1 => Ok(n),
        _ => Err(ValidationError::new(&format!(
            "Concurrency must be between 1 and 255, got {}",
            value
        ))),
    }
}
