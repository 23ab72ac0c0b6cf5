//! Artifact Registry image references
//!
//! Parses `<host>/<project>/<repository>/<image-path>[:<tag>][@<digest>]` into
//! an [`ArtifactReference`] and renders it back to the canonical form.

use crate::registry::error::{RegistryError, RegistryResult};
use regex::Regex;
use serde::{Serialize, Serializer};
use std::fmt;
use std::sync::LazyLock;

/// Only digests of this algorithm are accepted
pub const DIGEST_PREFIX: &str = "sha256:";

static ARTIFACT_URI_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^([a-z0-9-]+-docker\.pkg\.dev)/([^/]+)/([^/]+)/([^:@]+)(?::([^@]+))?(?:@(sha256:[a-fA-F0-9]{64}))?$",
    )
    .expect("artifact URI pattern is valid")
});

static DIGEST_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^sha256:[a-fA-F0-9]{64}$").expect("digest pattern is valid")
});

static HOST_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[a-z0-9-]+-docker\.pkg\.dev$").expect("host pattern is valid")
});

/// Structured form of an Artifact Registry docker image URI
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ArtifactReference {
    /// e.g. us-central1-docker.pkg.dev
    pub host: String,
    pub project_id: String,
    pub repository_id: String,
    /// May contain nested namespaces, e.g. my-service/worker
    pub image_name: String,
    pub tag: Option<String>,
    /// sha256:<64 hex>
    pub digest: Option<String>,
}

impl ArtifactReference {
    /// Resource URL the Container Analysis API indexes occurrences by
    pub fn to_resource_url(&self, location: &str) -> String {
        format!(
            "https://{}-docker.pkg.dev/{}/{}/{}@{}",
            location,
            self.project_id,
            self.repository_id,
            self.image_name,
            self.digest.as_deref().unwrap_or("")
        )
    }

    /// True when the reference pins a content digest
    pub fn is_pinned(&self) -> bool {
        self.digest.is_some()
    }
}

impl fmt::Display for ArtifactReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}/{}/{}/{}",
            self.host, self.project_id, self.repository_id, self.image_name
        )?;
        if let Some(tag) = &self.tag {
            write!(f, ":{}", tag)?;
        }
        if let Some(digest) = &self.digest {
            write!(f, "@{}", digest)?;
        }
        Ok(())
    }
}

impl std::str::FromStr for ArtifactReference {
    type Err = RegistryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_artifact_uri(s)
    }
}

// Structured fields plus the rendered URI, so reports carry both
impl Serialize for ArtifactReference {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        #[derive(Serialize)]
        struct Wire<'a> {
            host: &'a str,
            #[serde(rename = "projectID")]
            project_id: &'a str,
            #[serde(rename = "repositoryID")]
            repository_id: &'a str,
            #[serde(rename = "imageName")]
            image_name: &'a str,
            #[serde(skip_serializing_if = "Option::is_none")]
            tag: Option<&'a str>,
            #[serde(skip_serializing_if = "Option::is_none")]
            digest: Option<&'a str>,
            uri: String,
        }

        Wire {
            host: &self.host,
            project_id: &self.project_id,
            repository_id: &self.repository_id,
            image_name: &self.image_name,
            tag: self.tag.as_deref(),
            digest: self.digest.as_deref(),
            uri: self.to_string(),
        }
        .serialize(serializer)
    }
}

/// Parse a raw registry URI into an [`ArtifactReference`]
pub fn parse_artifact_uri(uri: &str) -> RegistryResult<ArtifactReference> {
    let captures = ARTIFACT_URI_PATTERN
        .captures(uri)
        .ok_or_else(|| RegistryError::malformed(uri, diagnose(uri)))?;

    let group = |index: usize| {
        captures
            .get(index)
            .map(|m| m.as_str())
            .filter(|s| !s.is_empty())
            .map(str::to_string)
    };

    Ok(ArtifactReference {
        host: group(1).unwrap_or_default(),
        project_id: group(2).unwrap_or_default(),
        repository_id: group(3).unwrap_or_default(),
        image_name: group(4).unwrap_or_default(),
        tag: group(5),
        digest: group(6),
    })
}

/// Extract the `@`-qualified digest from a URI that must carry one
pub fn parse_digest_from_uri(uri: &str) -> RegistryResult<String> {
    let (_, digest) = uri
        .rsplit_once('@')
        .ok_or_else(|| RegistryError::malformed(uri, "missing '@' separator before digest"))?;

    if !digest.starts_with(DIGEST_PREFIX) {
        return Err(RegistryError::malformed(
            uri,
            format!("unsupported digest algorithm, expected '{}'", DIGEST_PREFIX),
        ));
    }
    if !DIGEST_PATTERN.is_match(digest) {
        return Err(RegistryError::malformed(
            uri,
            "digest must be sha256: followed by 64 hexadecimal characters",
        ));
    }

    Ok(digest.to_string())
}

/// True when a tag value is really a digest
pub fn is_digest_like(tag: &str) -> bool {
    tag.starts_with(DIGEST_PREFIX)
}

// Best-effort reason for a URI the pattern rejected
fn diagnose(uri: &str) -> String {
    if let Some((_, digest)) = uri.rsplit_once('@') {
        if !digest.starts_with(DIGEST_PREFIX) {
            return format!("unsupported digest algorithm, expected '{}'", DIGEST_PREFIX);
        }
        if !DIGEST_PATTERN.is_match(digest) {
            return "digest must be sha256: followed by 64 hexadecimal characters".to_string();
        }
    }

    let segments: Vec<&str> = uri.split('/').collect();
    if segments.len() < 4 || segments.iter().any(|s| s.is_empty()) {
        return "expected <host>/<project>/<repository>/<image>".to_string();
    }
    if !HOST_PATTERN.is_match(segments[0]) {
        return format!("unrecognised registry host '{}'", segments[0]);
    }

    "does not match <host>/<project>/<repository>/<image>[:<tag>][@<digest>]".to_string()
}
