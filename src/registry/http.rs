//! Artifact Registry REST client
//!
//! Implements [`RegistryClient`] over the v1 REST API, one page per call.

use crate::gcp::ApiTransport;
use crate::registry::client::RegistryClient;
use crate::registry::error::ClientError;
use crate::registry::types::{DockerImage, Page, Repository};
use serde::Deserialize;

pub const ARTIFACT_REGISTRY_ENDPOINT: &str = "https://artifactregistry.googleapis.com/v1";

const PAGE_SIZE: u32 = 100;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ListRepositoriesResponse {
    #[serde(default)]
    repositories: Vec<Repository>,
    #[serde(default)]
    next_page_token: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ListDockerImagesResponse {
    #[serde(default)]
    docker_images: Vec<DockerImage>,
    #[serde(default)]
    next_page_token: Option<String>,
}

/// Empty tokens mark the last page just like absent ones
fn non_empty(token: Option<String>) -> Option<String> {
    token.filter(|t| !t.is_empty())
}

fn page_query(page_token: Option<&str>) -> Vec<(&'static str, String)> {
    let mut query = vec![("pageSize", PAGE_SIZE.to_string())];
    if let Some(token) = page_token {
        query.push(("pageToken", token.to_string()));
    }
    query
}

#[derive(Debug, Clone)]
pub struct ArtifactRegistryClient {
    transport: ApiTransport,
    endpoint: String,
}

impl ArtifactRegistryClient {
    pub fn new(transport: ApiTransport) -> Self {
        Self {
            transport,
            endpoint: ARTIFACT_REGISTRY_ENDPOINT.to_string(),
        }
    }

    /// Point the client at a different API root (emulators, proxies)
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into().trim_end_matches('/').to_string();
        self
    }
}

#[async_trait::async_trait]
impl RegistryClient for ArtifactRegistryClient {
    async fn list_repositories(
        &self,
        parent: &str,
        page_token: Option<&str>,
    ) -> Result<Page<Repository>, ClientError> {
        let url = format!("{}/{}/repositories", self.endpoint, parent);
        let response: ListRepositoriesResponse =
            self.transport.get_json(&url, &page_query(page_token)).await?;

        Ok(Page {
            items: response.repositories,
            next_page_token: non_empty(response.next_page_token),
        })
    }

    async fn list_docker_images(
        &self,
        parent: &str,
        order_by: &str,
        page_token: Option<&str>,
    ) -> Result<Page<DockerImage>, ClientError> {
        let url = format!("{}/{}/dockerImages", self.endpoint, parent);
        let mut query = page_query(page_token);
        query.push(("orderBy", order_by.to_string()));

        let response: ListDockerImagesResponse = self.transport.get_json(&url, &query).await?;

        Ok(Page {
            items: response.docker_images,
            next_page_token: non_empty(response.next_page_token),
        })
    }
}
