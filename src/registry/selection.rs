//! Version selection policy
//!
//! Picks the one digest to scan out of the versions observed for an image:
//! the first version tagged `latest` wins outright, otherwise the most
//! recently updated one.

use chrono::{DateTime, Utc};

/// Tag that always wins selection
pub const LATEST_TAG: &str = "latest";

/// One observed version of an image
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CandidateVersion {
    pub digest: String,
    pub tags: Vec<String>,
    pub update_time: DateTime<Utc>,
    /// Listing URI, kept for diagnostics
    pub uri: String,
}

impl CandidateVersion {
    /// Whether this version carries the `latest` tag
    pub fn is_latest(&self) -> bool {
        self.tags.iter().any(|tag| tag == LATEST_TAG)
    }
}

/// Choose the version to scan.
///
/// Returns `CandidateVersion::default()` (empty digest) for an empty slice;
/// callers must check the digest before using the result.
pub fn select_best_version(candidates: &[CandidateVersion]) -> CandidateVersion {
    let Some(first) = candidates.first() else {
        return CandidateVersion::default();
    };

    let mut newest = first;
    for candidate in candidates {
        if candidate.is_latest() {
            log::debug!(
                "Selected image digest: digest={} tags={:?} update_time={} selection_reason=latest_tag",
                candidate.digest,
                candidate.tags,
                candidate.update_time
            );
            return candidate.clone();
        }

        // Strict comparison keeps the earliest candidate on ties
        if candidate.update_time > newest.update_time {
            newest = candidate;
        }
    }

    log::debug!(
        "Selected image digest: digest={} tags={:?} update_time={} selection_reason=newest_timestamp",
        newest.digest,
        newest.tags,
        newest.update_time
    );
    newest.clone()
}
