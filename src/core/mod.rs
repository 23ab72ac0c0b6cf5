//! Core services and infrastructure

pub mod error_handling;
pub mod logging;
pub mod permits;
pub mod shutdown;
pub mod sync;
pub mod version;
