//! Listing collaborator interface
//!
//! The resolver only ever reads the registry through this trait, one page at a
//! time, so callers can stop after any page without paying for the rest.

use crate::registry::error::ClientError;
use crate::registry::types::{DockerImage, Page, Repository};

/// Sort order requested for image listings
pub const ORDER_BY_UPDATE_TIME_DESC: &str = "update_time desc";

/// Paginated read-only access to repositories and their images
#[async_trait::async_trait]
pub trait RegistryClient: Send + Sync {
    /// List one page of repositories under `parent` (projects/{p}/locations/{l})
    async fn list_repositories(
        &self,
        parent: &str,
        page_token: Option<&str>,
    ) -> Result<Page<Repository>, ClientError>;

    /// List one page of docker images in the repository `parent`
    async fn list_docker_images(
        &self,
        parent: &str,
        order_by: &str,
        page_token: Option<&str>,
    ) -> Result<Page<DockerImage>, ClientError>;
}
