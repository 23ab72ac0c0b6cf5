//! Repository Scanner
//!
//! Turns the image listing of one repository into at most one scan target per
//! image name.

use crate::core::permits::PermitPool;
use crate::core::shutdown::ShutdownSignal;
use crate::registry::client::{RegistryClient, ORDER_BY_UPDATE_TIME_DESC};
use crate::registry::error::{RegistryError, RegistryResult};
use crate::registry::reference::{parse_artifact_uri, ArtifactReference};
use crate::registry::selection::{select_best_version, CandidateVersion};
use crate::registry::types::ScanTarget;
use std::collections::BTreeMap;
use std::sync::Arc;

/// Versions considered per image. The listing is newest-first, so this bounds
/// how far back selection looks.
pub const MAX_CANDIDATES: usize = 5;

/// Split `projects/{p}/locations/{l}/repositories/{r}` into `(l, r)`.
///
/// Names with fewer than six segments yield `("", "")`.
pub fn extract_location_and_repository(repository_name: &str) -> (&str, &str) {
    let parts: Vec<&str> = repository_name.split('/').collect();
    if parts.len() >= 6 {
        (parts[3], parts[5])
    } else {
        ("", "")
    }
}

/// Candidates collected for one image name
struct ImageGroup {
    slots: PermitPool,
    candidates: Vec<(CandidateVersion, ArtifactReference)>,
}

impl ImageGroup {
    fn new(max_candidates: usize) -> Self {
        Self {
            slots: PermitPool::new(max_candidates),
            candidates: Vec::new(),
        }
    }
}

/// Lists one repository and selects a version per image
#[derive(Clone)]
pub struct RepositoryScanner {
    client: Arc<dyn RegistryClient>,
    max_candidates: usize,
}

impl RepositoryScanner {
    pub fn new(client: Arc<dyn RegistryClient>) -> Self {
        Self {
            client,
            max_candidates: MAX_CANDIDATES,
        }
    }

    pub fn with_max_candidates(mut self, max_candidates: usize) -> Self {
        self.max_candidates = max_candidates.max(1);
        self
    }

    /// Scan `repository_name` and return one target per image, ordered by image name
    pub async fn scan(
        &self,
        repository_name: &str,
        shutdown: &ShutdownSignal,
    ) -> RegistryResult<Vec<ScanTarget>> {
        let (location, repository) = extract_location_and_repository(repository_name);
        let mut groups: BTreeMap<String, ImageGroup> = BTreeMap::new();
        let mut page_token: Option<String> = None;

        loop {
            let page = tokio::select! {
                biased;
                _ = shutdown.cancelled() => {
                    return Err(RegistryError::Cancelled {
                        resource: repository_name.to_string(),
                    });
                }
                page = self.client.list_docker_images(
                    repository_name,
                    ORDER_BY_UPDATE_TIME_DESC,
                    page_token.as_deref(),
                ) => page.map_err(|e| RegistryError::listing_failed(repository_name, e))?,
            };

            for image in page.items {
                let reference = parse_artifact_uri(&image.uri)
                    .map_err(|e| RegistryError::listing_failed(repository_name, e))?;

                let Some(digest) = reference.digest.clone() else {
                    log::warn!("Skipping image without digest: uri={}", image.uri);
                    continue;
                };

                let group = groups
                    .entry(reference.image_name.clone())
                    .or_insert_with(|| ImageGroup::new(self.max_candidates));
                if !group.slots.try_reserve() {
                    continue;
                }

                group.candidates.push((
                    CandidateVersion {
                        digest,
                        tags: image.tags,
                        update_time: image.update_time,
                        uri: image.uri,
                    },
                    reference,
                ));
            }

            match page.next_page_token {
                Some(token) => page_token = Some(token),
                None => break,
            }
        }

        let mut targets = Vec::with_capacity(groups.len());
        for (image_name, group) in groups {
            let versions: Vec<CandidateVersion> =
                group.candidates.iter().map(|(c, _)| c.clone()).collect();
            let best = select_best_version(&versions);
            if best.digest.is_empty() {
                continue;
            }

            let Some((_, artifact)) = group
                .candidates
                .into_iter()
                .find(|(candidate, _)| candidate.digest == best.digest)
            else {
                continue;
            };

            log::debug!(
                "Resolved image target: location={} repository={} image_name={} digest={} uri={}",
                location,
                repository,
                image_name,
                best.digest,
                best.uri
            );

            targets.push(ScanTarget {
                artifact,
                uri: best.uri,
                location: location.to_string(),
                repository: repository.to_string(),
            });
        }

        Ok(targets)
    }
}
