//! Container Analysis (Grafeas) client
//!
//! Lists the `VULNERABILITY` occurrences recorded for an image digest and turns
//! them into [`Vulnerability`] findings.

use crate::analyzer::client::Analyzer;
use crate::analyzer::error::{AnalyzerError, AnalyzerResult};
use crate::analyzer::filter::{build_summary, filter_by_severity, filter_fixable};
use crate::analyzer::types::{AnalyzeRequest, AnalyzeResult, Severity, Vulnerability};
use crate::gcp::ApiTransport;
use chrono::Utc;
use serde::Deserialize;

pub const CONTAINER_ANALYSIS_ENDPOINT: &str = "https://containeranalysis.googleapis.com/v1";

const PAGE_SIZE: u32 = 1000;

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ListOccurrencesResponse {
    #[serde(default)]
    pub occurrences: Vec<Occurrence>,
    #[serde(default)]
    pub next_page_token: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct Occurrence {
    #[serde(default)]
    pub note_name: String,
    #[serde(default)]
    pub vulnerability: Option<VulnerabilityDetails>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct VulnerabilityDetails {
    #[serde(default)]
    pub severity: String,
    #[serde(default)]
    pub cvss_score: f32,
    #[serde(default)]
    pub short_description: String,
    #[serde(default)]
    pub related_urls: Vec<RelatedUrl>,
    #[serde(default)]
    pub package_issue: Vec<PackageIssue>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub(crate) struct RelatedUrl {
    #[serde(default)]
    pub url: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct PackageIssue {
    #[serde(default)]
    pub affected_package: String,
    #[serde(default)]
    pub affected_version: Option<PackageVersion>,
    #[serde(default)]
    pub fixed_version: Option<PackageVersion>,
    #[serde(default)]
    pub package_type: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub(crate) struct PackageVersion {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub kind: String,
}

/// Map the API severity enum; anything unknown is `Unspecified`
fn convert_severity(wire: &str) -> Severity {
    Severity::parse(wire).unwrap_or_default()
}

/// Convert one occurrence. Occurrences without vulnerability details are skipped.
pub(crate) fn convert_occurrence(occurrence: Occurrence) -> Option<Vulnerability> {
    let details = occurrence.vulnerability?;

    let mut vulnerability = Vulnerability {
        id: details.short_description,
        severity: convert_severity(&details.severity),
        cvss_score: details.cvss_score,
        urls: details
            .related_urls
            .into_iter()
            .map(|u| u.url)
            .collect(),
        description: occurrence.note_name,
        ..Default::default()
    };

    // The first issue carries the package metadata
    if let Some(issue) = details.package_issue.into_iter().next() {
        vulnerability.package_name = issue.affected_package;
        vulnerability.package_type = issue.package_type;
        if let Some(installed) = issue.affected_version {
            vulnerability.installed_version = format!("{} (Kind: {})", installed.name, installed.kind);
        }
        if let Some(fixed) = issue.fixed_version {
            vulnerability.fixed_version = fixed.name;
        }
    }

    Some(vulnerability)
}

/// [`Analyzer`] backed by the Container Analysis REST API
#[derive(Debug, Clone)]
pub struct ContainerAnalysisClient {
    transport: ApiTransport,
    endpoint: String,
}

impl ContainerAnalysisClient {
    pub fn new(transport: ApiTransport) -> Self {
        Self {
            transport,
            endpoint: CONTAINER_ANALYSIS_ENDPOINT.to_string(),
        }
    }

    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into().trim_end_matches('/').to_string();
        self
    }

    async fn list_vulnerabilities(
        &self,
        project_id: &str,
        resource_url: &str,
    ) -> AnalyzerResult<Vec<Vulnerability>> {
        let url = format!("{}/projects/{}/occurrences", self.endpoint, project_id);
        let filter = format!(r#"resourceUrl="{}" AND kind="VULNERABILITY""#, resource_url);

        let mut vulnerabilities = Vec::new();
        let mut page_token: Option<String> = None;
        loop {
            let mut query = vec![("filter", filter.clone()), ("pageSize", PAGE_SIZE.to_string())];
            if let Some(token) = &page_token {
                query.push(("pageToken", token.clone()));
            }

            let page: ListOccurrencesResponse = self.transport.get_json(&url, &query).await?;
            vulnerabilities.extend(page.occurrences.into_iter().filter_map(convert_occurrence));

            match page.next_page_token.filter(|t| !t.is_empty()) {
                Some(token) => page_token = Some(token),
                None => break,
            }
        }

        Ok(vulnerabilities)
    }
}

#[async_trait::async_trait]
impl Analyzer for ContainerAnalysisClient {
    async fn analyze(&self, request: &AnalyzeRequest) -> AnalyzerResult<AnalyzeResult> {
        if !request.artifact.is_pinned() {
            return Err(AnalyzerError::InvalidRequest {
                message: format!("{} has no digest", request.artifact),
            });
        }

        let resource_url = request.artifact.to_resource_url(&request.location);
        log::debug!("Listing vulnerability occurrences: resource_url={}", resource_url);

        let found = self
            .list_vulnerabilities(&request.artifact.project_id, &resource_url)
            .await?;
        let total = found.len();

        let mut filtered = filter_by_severity(found, request.min_severity);
        if request.fixable_only {
            filtered = filter_fixable(filtered);
        }

        log::debug!(
            "Analyzed image: image={} found={} kept={}",
            request.artifact.image_name,
            total,
            filtered.len()
        );

        Ok(AnalyzeResult {
            artifact: request.artifact.clone(),
            scan_time: Utc::now(),
            summary: build_summary(&filtered),
            vulnerabilities: filtered,
        })
    }
}
