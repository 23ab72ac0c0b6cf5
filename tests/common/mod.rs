//! Common test utilities and helpers
//!
//! In-memory registry and analyzer collaborators plus a shared output buffer,
//! so the full resolve -> analyze -> export pipeline runs without network access.

pub mod fixtures;
pub mod mocks;
