//! Test modules for the registry component
//!
//! Repository scanning and resolver stream behavior, driven by an in-memory
//! listing client.

pub mod helpers;
pub mod repository;
