//! Project ID discovery
//!
//! Used when no project was given on the command line or in the config file.

use crate::gcp::auth::{gcloud_output, metadata_get, METADATA_HOST};
use crate::gcp::error::{GcpError, GcpResult};

/// Environment variables checked, in order
pub const PROJECT_ENV_VARS: &[&str] = &[
    "GOOGLE_CLOUD_PROJECT",
    "GCLOUD_PROJECT",
    "CLOUDSDK_CORE_PROJECT",
];

const METADATA_PROJECT_PATH: &str = "/computeMetadata/v1/project/project-id";

/// First non-empty project variable from the environment
pub fn project_from_env() -> Option<String> {
    PROJECT_ENV_VARS
        .iter()
        .filter_map(|name| std::env::var(name).ok())
        .map(|value| value.trim().to_string())
        .find(|value| !value.is_empty())
}

/// Determine the project ID from the environment, gcloud config, or the metadata server
pub async fn discover_project_id(http: &reqwest::Client) -> GcpResult<String> {
    if let Some(project) = project_from_env() {
        log::debug!("Project ID taken from environment: {}", project);
        return Ok(project);
    }

    match gcloud_output(&["config", "get-value", "project"]).await {
        Ok(project) if project != "(unset)" => {
            log::debug!("Project ID taken from gcloud config: {}", project);
            return Ok(project);
        }
        Ok(_) => log::debug!("gcloud config has no project set"),
        Err(e) => log::debug!("gcloud config lookup failed: {}", e),
    }

    let url = format!("{}{}", METADATA_HOST, METADATA_PROJECT_PATH);
    match metadata_get(http, &url).await {
        Ok(project) if !project.is_empty() => {
            log::debug!("Project ID taken from metadata server: {}", project);
            Ok(project)
        }
        _ => Err(GcpError::Project {
            message: format!(
                "pass --project or set {} (not found in environment, gcloud config, or metadata server)",
                PROJECT_ENV_VARS[0]
            ),
        }),
    }
}
