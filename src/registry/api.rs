//! Registry API
//!
//! Public surface of the registry component, following the same pattern as
//! `scanner::api`.

// Discovery
pub use crate::registry::repository::{extract_location_and_repository, RepositoryScanner, MAX_CANDIDATES};
pub use crate::registry::resolver::{ImageResolver, TargetSource};
pub use crate::registry::selection::{select_best_version, CandidateVersion, LATEST_TAG};

// Listing collaborators
pub use crate::registry::client::{RegistryClient, ORDER_BY_UPDATE_TIME_DESC};
pub use crate::registry::http::ArtifactRegistryClient;

// References
pub use crate::registry::reference::{
    is_digest_like, parse_artifact_uri, parse_digest_from_uri, ArtifactReference,
};

// Error handling
pub use crate::registry::error::{ClientError, RegistryError, RegistryResult};

// Data types
pub use crate::registry::types::{DockerImage, Page, Repository, RepositoryFormat, ScanTarget};
