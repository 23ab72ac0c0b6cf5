//! Shared accumulator for worker outcomes

use crate::analyzer::types::AnalyzeResult;
use crate::scanner::error::ScanError;
use crate::scanner::types::ScanOutcome;

/// Results and failures gathered during one scan.
///
/// Lives behind a single mutex; every critical section is one push.
#[derive(Debug, Default)]
pub struct ScanCollector {
    results: Vec<AnalyzeResult>,
    failures: Vec<ScanError>,
}

impl ScanCollector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Merge one worker's outcome
    pub fn record(&mut self, outcome: ScanOutcome) {
        match outcome.result {
            Ok(result) => self.results.push(result),
            Err(error) => self.failures.push(error),
        }
    }

    /// Record a failure that is not tied to an analyzed target
    pub fn record_error(&mut self, error: ScanError) {
        self.failures.push(error);
    }

    pub fn into_parts(self) -> (Vec<AnalyzeResult>, Vec<ScanError>) {
        (self.results, self.failures)
    }
}
