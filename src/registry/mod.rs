//! Registry Component
//!
//! Discovers container images in Artifact Registry and selects one digest per
//! image to scan.
//!
//! ## Core Features
//!
//! - **ImageResolver**: lazy, pull-driven stream of scan targets across all docker repositories
//! - **RepositoryScanner**: per-repository grouping with a bounded candidate window
//! - **Selection policy**: `latest` tag first, newest update time otherwise
//! - **Reference parsing**: strict `<host>/<project>/<repository>/<image>[:tag][@sha256:...]` grammar

pub mod api;
pub mod client;
pub mod error;
pub mod http;
pub mod reference;
pub mod repository;
pub mod resolver;
pub mod selection;
pub mod types;

#[cfg(test)]
mod tests;

pub use error::{RegistryError, RegistryResult};
