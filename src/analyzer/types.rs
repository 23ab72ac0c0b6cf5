//! Analyzer Types
//!
//! Vulnerability findings and the request/result pair exchanged with an
//! [`Analyzer`](crate::analyzer::Analyzer). JSON field names follow the report
//! format consumers already parse (`ID`, `Severity`, `CVSSScore`, ...).

use crate::registry::reference::ArtifactReference;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;
use strum::IntoEnumIterator;
use strum_macros::EnumIter;

/// Vulnerability severity, ordered from least to most severe
#[derive(
    EnumIter, Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize,
)]
#[serde(rename_all = "UPPERCASE")]
pub enum Severity {
    #[default]
    Unspecified,
    Minimal,
    Low,
    Medium,
    High,
    Critical,
}

impl Severity {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Unspecified => "UNSPECIFIED",
            Self::Minimal => "MINIMAL",
            Self::Low => "LOW",
            Self::Medium => "MEDIUM",
            Self::High => "HIGH",
            Self::Critical => "CRITICAL",
        }
    }

    /// Ordinal used for threshold comparison
    pub fn level(&self) -> u8 {
        *self as u8
    }

    pub fn names() -> impl Iterator<Item = &'static str> {
        Severity::iter().map(|s| s.name())
    }

    /// Case-insensitive lookup by name
    pub fn parse(s: &str) -> Option<Self> {
        let upper = s.trim().to_uppercase();
        Severity::iter().find(|severity| severity.name() == upper)
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl std::str::FromStr for Severity {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Severity::parse(s).ok_or_else(|| {
            format!(
                "invalid severity level: {} (allowed: {})",
                s,
                Severity::names().collect::<Vec<_>>().join(", ")
            )
        })
    }
}

/// A single vulnerability finding
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct Vulnerability {
    /// CVE identifier
    #[serde(rename = "ID")]
    pub id: String,
    #[serde(rename = "Severity")]
    pub severity: Severity,
    #[serde(rename = "PackageName")]
    pub package_name: String,
    /// e.g. OS, GO, MAVEN
    #[serde(rename = "PackageType")]
    pub package_type: String,
    #[serde(rename = "InstalledVersion")]
    pub installed_version: String,
    /// Empty when no fix is available
    #[serde(rename = "FixedVersion")]
    pub fixed_version: String,
    #[serde(rename = "Description")]
    pub description: String,
    #[serde(rename = "CVSSScore")]
    pub cvss_score: f32,
    #[serde(rename = "URLs")]
    pub urls: Vec<String>,
}

impl Vulnerability {
    pub fn is_fixable(&self) -> bool {
        !self.fixed_version.is_empty()
    }
}

/// Aggregate counts over a set of findings
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct VulnerabilitySummary {
    #[serde(rename = "TotalCount")]
    pub total_count: usize,
    #[serde(rename = "CountBySeverity")]
    pub count_by_severity: BTreeMap<Severity, usize>,
    #[serde(rename = "FixableCount")]
    pub fixable_count: usize,
}

/// What to analyze and how to filter the findings
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnalyzeRequest {
    /// Image reference; must carry a digest
    pub artifact: ArtifactReference,
    /// Registry location, needed to build the resource URL
    pub location: String,
    pub min_severity: Severity,
    pub fixable_only: bool,
}

/// Findings for one image
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnalyzeResult {
    #[serde(rename = "Artifact")]
    pub artifact: ArtifactReference,
    #[serde(rename = "ScanTime")]
    pub scan_time: DateTime<Utc>,
    #[serde(rename = "Vulnerabilities")]
    pub vulnerabilities: Vec<Vulnerability>,
    #[serde(rename = "Summary")]
    pub summary: VulnerabilitySummary,
}
