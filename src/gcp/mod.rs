//! Google Cloud plumbing
//!
//! Credentials, project discovery and the authenticated JSON transport shared
//! by the Artifact Registry and Container Analysis clients.

pub mod auth;
pub mod error;
pub mod project;
pub mod transport;

pub use auth::{CredentialSource, TokenProvider};
pub use error::{GcpError, GcpResult};
pub use project::{discover_project_id, project_from_env};
pub use transport::ApiTransport;
