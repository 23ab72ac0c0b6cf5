//! Scanner API
//!
//! This module provides the public API for the scanner system, consolidating all external
//! exports and providing a controlled interface for accessing scanner functionality.
//!
//! This follows the same pattern as the registry::api module to maintain consistent
//! architecture across the application.

// Core orchestration
pub use crate::scanner::manager::ScanOrchestrator;

// Error handling
pub use crate::scanner::error::{AggregateError, ScanError, ScanResult};

// Result accumulation
pub use crate::scanner::collector::ScanCollector;

// Core data types and structures
pub use crate::scanner::types::{
    ScanOptions, ScanOutcome, ScanStatus, ScanSummary, DEFAULT_CONCURRENCY,
};
