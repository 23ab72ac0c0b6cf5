//! Authenticated JSON transport for Google REST APIs

use crate::gcp::auth::TokenProvider;
use crate::gcp::error::{GcpError, GcpResult};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::sync::Arc;
use std::time::Duration;

const USER_PROJECT_HEADER: &str = "x-goog-user-project";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(60);

#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    error: ErrorBody,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    message: String,
    #[serde(default)]
    status: String,
}

/// Shared HTTP client plus credentials, cloned into each API client
#[derive(Debug, Clone)]
pub struct ApiTransport {
    http: reqwest::Client,
    tokens: Arc<TokenProvider>,
    quota_project: Option<String>,
}

impl ApiTransport {
    pub fn new(http: reqwest::Client, tokens: Arc<TokenProvider>) -> Self {
        Self {
            http,
            tokens,
            quota_project: None,
        }
    }

    /// Bill API quota against `project` rather than the credential's default
    pub fn with_quota_project(mut self, project: impl Into<String>) -> Self {
        self.quota_project = Some(project.into());
        self
    }

    /// Build the reqwest client used for all API traffic
    pub fn http_client() -> GcpResult<reqwest::Client> {
        reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .user_agent(concat!("drydock/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|source| GcpError::Request {
                url: String::from("<client>"),
                source,
            })
    }

    /// GET `url` with `query` and decode the JSON body
    pub async fn get_json<T: DeserializeOwned>(
        &self,
        url: &str,
        query: &[(&str, String)],
    ) -> GcpResult<T> {
        let token = self.tokens.access_token().await?;

        let mut request = self.http.get(url).bearer_auth(token).query(query);
        if let Some(project) = &self.quota_project {
            request = request.header(USER_PROJECT_HEADER, project);
        }

        log::trace!("GET {} {:?}", url, query);
        let response = request.send().await.map_err(|source| GcpError::Request {
            url: url.to_string(),
            source,
        })?;

        let status = response.status();
        let body = response.text().await.map_err(|source| GcpError::Request {
            url: url.to_string(),
            source,
        })?;

        if !status.is_success() {
            return Err(GcpError::Status {
                url: url.to_string(),
                status: status.as_u16(),
                message: error_message(&body),
            });
        }

        serde_json::from_str(&body).map_err(|source| GcpError::Decode {
            url: url.to_string(),
            source,
        })
    }
}

/// Pull the human readable message out of a Google error payload
fn error_message(body: &str) -> String {
    match serde_json::from_str::<ErrorEnvelope>(body) {
        Ok(envelope) if !envelope.error.status.is_empty() => {
            format!("{} ({})", envelope.error.message, envelope.error.status)
        }
        Ok(envelope) => envelope.error.message,
        Err(_) => body.trim().to_string(),
    }
}
