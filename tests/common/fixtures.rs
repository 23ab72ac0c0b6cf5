//! Registry listings and findings used across integration tests

use chrono::{DateTime, TimeZone, Utc};
use drydock::analyzer::{Severity, Vulnerability};
use drydock::registry::api::{DockerImage, Repository, RepositoryFormat};

pub const PROJECT: &str = "acme-prod";
pub const LOCATION: &str = "europe-west4";

pub fn parent() -> String {
    format!("projects/{}/locations/{}", PROJECT, LOCATION)
}

pub fn repository_name(repository: &str) -> String {
    format!("{}/repositories/{}", parent(), repository)
}

pub fn repository(repository: &str, format: RepositoryFormat) -> Repository {
    Repository {
        name: repository_name(repository),
        format,
    }
}

/// 64 hex chars derived from a one-byte seed
pub fn digest(seed: u8) -> String {
    format!("sha256:{}", format!("{:02x}", seed).repeat(32))
}

pub fn at(hour: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 6, 1, hour, 0, 0).unwrap()
}

pub fn image(repository: &str, name: &str, seed: u8, tags: &[&str], hour: u32) -> DockerImage {
    let digest = digest(seed);
    DockerImage {
        name: format!("{}/dockerImages/{}@{}", repository_name(repository), name, digest),
        uri: format!(
            "{}-docker.pkg.dev/{}/{}/{}@{}",
            LOCATION, PROJECT, repository, name, digest
        ),
        tags: tags.iter().map(|t| t.to_string()).collect(),
        update_time: at(hour),
    }
}

pub fn vulnerability(id: &str, severity: Severity, fixed_version: &str) -> Vulnerability {
    Vulnerability {
        id: id.to_string(),
        severity,
        package_name: "openssl".to_string(),
        package_type: "OS".to_string(),
        installed_version: "3.0.2 (Kind: NORMAL)".to_string(),
        fixed_version: fixed_version.to_string(),
        description: "Buffer overflow, in X.509 \"name\" checks".to_string(),
        cvss_score: 8.1,
        urls: vec![format!("https://nvd.nist.gov/vuln/detail/{}", id)],
    }
}
