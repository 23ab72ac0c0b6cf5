//! Scanner Types

use crate::analyzer::types::{AnalyzeResult, Severity};
use crate::registry::types::ScanTarget;
use crate::scanner::error::{AggregateError, ScanError, ScanResult};

/// Default number of concurrent analysis workers
pub const DEFAULT_CONCURRENCY: u8 = 5;

/// What to scan and how to filter findings
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanOptions {
    pub project: String,
    pub location: String,
    pub min_severity: Severity,
    pub fixable_only: bool,
    /// In-flight analysis cap, 1..=255
    pub concurrency: u8,
}

impl ScanOptions {
    pub fn new(project: impl Into<String>, location: impl Into<String>) -> Self {
        Self {
            project: project.into(),
            location: location.into(),
            min_severity: Severity::High,
            fixable_only: false,
            concurrency: DEFAULT_CONCURRENCY,
        }
    }

    pub fn with_min_severity(mut self, min_severity: Severity) -> Self {
        self.min_severity = min_severity;
        self
    }

    pub fn with_fixable_only(mut self, fixable_only: bool) -> Self {
        self.fixable_only = fixable_only;
        self
    }

    pub fn with_concurrency(mut self, concurrency: u8) -> Self {
        self.concurrency = concurrency;
        self
    }
}

/// Result of analyzing one target
#[derive(Debug)]
pub struct ScanOutcome {
    pub target: ScanTarget,
    pub result: ScanResult<AnalyzeResult>,
}

/// Overall scan status
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScanStatus {
    /// Results exported, nothing failed
    Succeeded,
    /// Results exported, some targets or repositories failed
    PartiallySucceeded,
    /// Nothing exported and something failed
    Failed,
    /// Nothing found and nothing failed
    NothingToReport,
}

/// What a completed scan did
#[derive(Debug, Default)]
pub struct ScanSummary {
    pub targets_found: usize,
    pub results_exported: usize,
    pub failures: Vec<ScanError>,
}

impl ScanSummary {
    pub fn status(&self) -> ScanStatus {
        match (self.results_exported > 0, self.failures.is_empty()) {
            (true, true) => ScanStatus::Succeeded,
            (true, false) => ScanStatus::PartiallySucceeded,
            (false, true) => ScanStatus::NothingToReport,
            (false, false) => ScanStatus::Failed,
        }
    }

    /// Turn recorded failures into one aggregate error
    pub fn into_result(self) -> ScanResult<ScanSummary> {
        if self.failures.is_empty() {
            return Ok(self);
        }
        Err(ScanError::PartialFailure(AggregateError::new(self.failures)))
    }
}
