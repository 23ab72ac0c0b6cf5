//! Vulnerability fetch collaborator interface

use crate::analyzer::error::AnalyzerResult;
use crate::analyzer::types::{AnalyzeRequest, AnalyzeResult};

/// Fetches and filters vulnerability findings for one image digest
#[async_trait::async_trait]
pub trait Analyzer: Send + Sync {
    async fn analyze(&self, request: &AnalyzeRequest) -> AnalyzerResult<AnalyzeResult>;
}
