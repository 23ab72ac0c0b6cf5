//! Access token sources
//!
//! Tokens come from, in order: an explicit `GOOGLE_OAUTH_ACCESS_TOKEN`, the
//! `gcloud` CLI, or the GCE metadata server. Fetched tokens are cached and
//! refreshed well before their one hour lifetime runs out.

use crate::gcp::error::{GcpError, GcpResult};
use serde::Deserialize;
use std::time::{Duration, Instant};
use tokio::sync::Mutex;

/// Environment variable holding a ready-made bearer token
pub const ACCESS_TOKEN_ENV: &str = "GOOGLE_OAUTH_ACCESS_TOKEN";

pub(crate) const METADATA_HOST: &str = "http://metadata.google.internal";
const METADATA_TOKEN_PATH: &str =
    "/computeMetadata/v1/instance/service-accounts/default/token";

/// Refresh cached tokens after this long
const TOKEN_REFRESH_AFTER: Duration = Duration::from_secs(45 * 60);

/// Where bearer tokens are obtained from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CredentialSource {
    /// A fixed token (never refreshed)
    StaticToken(String),
    /// `gcloud auth print-access-token`
    GcloudCli,
    /// GCE/GKE/Cloud Run metadata server
    MetadataServer,
    /// gcloud first, metadata server as fallback
    Auto,
}

impl CredentialSource {
    /// Pick a source from the environment
    pub fn detect() -> Self {
        match std::env::var(ACCESS_TOKEN_ENV) {
            Ok(token) if !token.trim().is_empty() => {
                CredentialSource::StaticToken(token.trim().to_string())
            }
            _ => CredentialSource::Auto,
        }
    }
}

#[derive(Debug)]
struct CachedToken {
    value: String,
    fetched_at: Instant,
}

#[derive(Debug, Deserialize)]
struct MetadataToken {
    access_token: String,
}

/// Hands out bearer tokens, caching them between calls
#[derive(Debug)]
pub struct TokenProvider {
    source: CredentialSource,
    http: reqwest::Client,
    cached: Mutex<Option<CachedToken>>,
}

impl TokenProvider {
    pub fn new(source: CredentialSource, http: reqwest::Client) -> Self {
        Self {
            source,
            http,
            cached: Mutex::new(None),
        }
    }

    /// Current bearer token, fetching a fresh one when the cache is stale
    pub async fn access_token(&self) -> GcpResult<String> {
        if let CredentialSource::StaticToken(token) = &self.source {
            return Ok(token.clone());
        }

        // Held across the fetch so concurrent workers share one refresh
        let mut cached = self.cached.lock().await;
        if let Some(token) = cached.as_ref() {
            if token.fetched_at.elapsed() < TOKEN_REFRESH_AFTER {
                return Ok(token.value.clone());
            }
        }

        let value = self.fetch().await?;
        *cached = Some(CachedToken {
            value: value.clone(),
            fetched_at: Instant::now(),
        });
        Ok(value)
    }

    async fn fetch(&self) -> GcpResult<String> {
        match &self.source {
            CredentialSource::StaticToken(token) => Ok(token.clone()),
            CredentialSource::GcloudCli => gcloud_token().await,
            CredentialSource::MetadataServer => self.metadata_token().await,
            CredentialSource::Auto => match gcloud_token().await {
                Ok(token) => Ok(token),
                Err(gcloud_err) => {
                    log::debug!("gcloud token unavailable ({}); trying metadata server", gcloud_err);
                    self.metadata_token().await.map_err(|metadata_err| GcpError::Credentials {
                        message: format!(
                            "set {} or run `gcloud auth login` (gcloud: {}; metadata server: {})",
                            ACCESS_TOKEN_ENV, gcloud_err, metadata_err
                        ),
                    })
                }
            },
        }
    }

    async fn metadata_token(&self) -> GcpResult<String> {
        let url = format!("{}{}", METADATA_HOST, METADATA_TOKEN_PATH);
        let body = metadata_get(&self.http, &url).await?;
        let token: MetadataToken =
            serde_json::from_str(&body).map_err(|source| GcpError::Decode { url, source })?;
        Ok(token.access_token)
    }
}

/// GET a metadata server path with the required flavor header
pub(crate) async fn metadata_get(http: &reqwest::Client, url: &str) -> GcpResult<String> {
    let response = http
        .get(url)
        .header("Metadata-Flavor", "Google")
        .timeout(Duration::from_secs(3))
        .send()
        .await
        .map_err(|source| GcpError::Request {
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
            message: body.trim().to_string(),
        });
    }
    Ok(body.trim().to_string())
}

/// Run a gcloud subcommand and return its trimmed stdout
pub(crate) async fn gcloud_output(args: &[&str]) -> GcpResult<String> {
    let output = tokio::process::Command::new("gcloud")
        .args(args)
        .output()
        .await
        .map_err(|e| GcpError::Credentials {
            message: format!("failed to run gcloud: {}", e),
        })?;

    if !output.status.success() {
        return Err(GcpError::Credentials {
            message: format!(
                "gcloud {} exited with {}: {}",
                args.join(" "),
                output.status,
                String::from_utf8_lossy(&output.stderr).trim()
            ),
        });
    }

    let stdout = String::from_utf8_lossy(&output.stdout).trim().to_string();
    if stdout.is_empty() {
        return Err(GcpError::Credentials {
            message: format!("gcloud {} printed nothing", args.join(" ")),
        });
    }
    Ok(stdout)
}

async fn gcloud_token() -> GcpResult<String> {
    gcloud_output(&["auth", "print-access-token"]).await
}
