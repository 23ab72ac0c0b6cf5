//! Test modules for the scanner system
//!
//! Orchestrator behavior against in-memory sources, analyzers and exporters.

pub mod helpers;
