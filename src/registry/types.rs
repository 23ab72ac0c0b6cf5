//! Registry Types
//!
//! Shared types produced by listing collaborators and consumed by the resolver.

use crate::registry::reference::ArtifactReference;
use chrono::{DateTime, Utc};
use serde::Deserialize;

/// Repository package format as reported by Artifact Registry
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RepositoryFormat {
    Docker,
    Maven,
    Npm,
    Python,
    Apt,
    Yum,
    Go,
    Kfp,
    #[default]
    #[serde(other)]
    Unspecified,
}

/// One repository in a project/location
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Repository {
    /// Full resource name: projects/{p}/locations/{l}/repositories/{r}
    pub name: String,
    #[serde(default)]
    pub format: RepositoryFormat,
}

/// One docker image version listed in a repository
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DockerImage {
    /// Full resource name of the image version
    #[serde(default)]
    pub name: String,
    /// e.g. us-docker.pkg.dev/p/r/image@sha256:...
    pub uri: String,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub update_time: DateTime<Utc>,
}

/// One page of a paginated listing
#[derive(Debug, Clone)]
pub struct Page<T> {
    pub items: Vec<T>,
    /// Absent on the last page
    pub next_page_token: Option<String>,
}

impl<T> Page<T> {
    /// A final page holding `items`
    pub fn last(items: Vec<T>) -> Self {
        Self {
            items,
            next_page_token: None,
        }
    }
}

/// A resolved image version to analyze
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanTarget {
    /// Reference with the selected digest populated
    pub artifact: ArtifactReference,
    /// Listing URI, for diagnostics
    pub uri: String,
    /// Registry location, e.g. us-central1
    pub location: String,
    /// Repository ID the image was found in
    pub repository: String,
}
