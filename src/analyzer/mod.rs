//! Analyzer Component
//!
//! Fetches vulnerability findings for a selected image digest, applies the
//! severity and fixability filters, and summarizes what is left.

pub mod client;
pub mod error;
pub mod filter;
pub mod grafeas;
pub mod types;

pub use client::Analyzer;
pub use error::{AnalyzerError, AnalyzerResult};
pub use grafeas::ContainerAnalysisClient;
pub use types::{AnalyzeRequest, AnalyzeResult, Severity, Vulnerability, VulnerabilitySummary};
