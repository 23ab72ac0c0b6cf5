//! Scanner Component
//!
//! Drives a full scan: resolves targets from the registry, analyzes them with
//! bounded concurrency, and exports the aggregate report.
//!
//! ## Core Features
//!
//! - **ScanOrchestrator**: single-producer resolution with a permit-bounded worker pool
//! - **ScanCollector**: one mutex-guarded accumulator for results and failures
//! - **Failure isolation**: per-target and per-repository errors never abort the scan
//! - **Cancellation**: workers race their analysis call against the shutdown signal

pub mod api;
pub mod collector;
pub mod error;
pub mod manager;
pub mod types;

#[cfg(test)]
mod tests;

pub use error::{ScanError, ScanResult};
pub use manager::ScanOrchestrator;
pub use types::{ScanOptions, ScanStatus, ScanSummary};
