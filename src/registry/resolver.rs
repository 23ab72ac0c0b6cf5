//! Registry Resolver
//!
//! Walks every docker repository of a project/location and yields one
//! [`ScanTarget`] per image as a pull-driven stream. Nothing is listed until
//! the consumer polls, and dropping the stream abandons whatever is left.
//!
//! Failure isolation:
//! - the repository list itself failing yields one error and ends the stream;
//! - one repository failing yields one error and moves on to the next;
//! - cancellation yields one error and ends the stream.

use crate::core::shutdown::ShutdownSignal;
use crate::registry::client::RegistryClient;
use crate::registry::error::{RegistryError, RegistryResult};
use crate::registry::repository::RepositoryScanner;
use crate::registry::types::{Repository, RepositoryFormat, ScanTarget};
use futures::stream::{self, BoxStream, Stream, StreamExt};
use std::collections::VecDeque;
use std::sync::Arc;

/// Anything that can produce scan targets for a project/location
pub trait TargetSource: Send + Sync {
    fn targets(
        &self,
        project: &str,
        location: &str,
        shutdown: ShutdownSignal,
    ) -> BoxStream<'static, RegistryResult<ScanTarget>>;
}

/// Resolves the latest version of every image in a project/location
#[derive(Clone)]
pub struct ImageResolver {
    client: Arc<dyn RegistryClient>,
    scanner: RepositoryScanner,
}

impl ImageResolver {
    pub fn new(client: Arc<dyn RegistryClient>) -> Self {
        let scanner = RepositoryScanner::new(Arc::clone(&client));
        Self { client, scanner }
    }

    /// Replace the repository scanner (e.g. to change the candidate cap)
    pub fn with_scanner(mut self, scanner: RepositoryScanner) -> Self {
        self.scanner = scanner;
        self
    }

    /// Lazily resolve all images under `projects/{project}/locations/{location}`
    pub fn resolve_all(
        &self,
        project: &str,
        location: &str,
        shutdown: ShutdownSignal,
    ) -> impl Stream<Item = RegistryResult<ScanTarget>> + Send + 'static {
        let state = ResolveState {
            parent: format!("projects/{}/locations/{}", project, location),
            client: Arc::clone(&self.client),
            scanner: self.scanner.clone(),
            shutdown,
            repositories: VecDeque::new(),
            targets: VecDeque::new(),
            next_page_token: None,
            repositories_exhausted: false,
            finished: false,
        };

        stream::unfold(state, |mut state| async move {
            let item = state.advance().await?;
            Some((item, state))
        })
    }
}

impl TargetSource for ImageResolver {
    fn targets(
        &self,
        project: &str,
        location: &str,
        shutdown: ShutdownSignal,
    ) -> BoxStream<'static, RegistryResult<ScanTarget>> {
        self.resolve_all(project, location, shutdown).boxed()
    }
}

struct ResolveState {
    parent: String,
    client: Arc<dyn RegistryClient>,
    scanner: RepositoryScanner,
    shutdown: ShutdownSignal,
    /// Repositories from the current page not yet scanned
    repositories: VecDeque<Repository>,
    /// Targets from the current repository not yet yielded
    targets: VecDeque<ScanTarget>,
    next_page_token: Option<String>,
    repositories_exhausted: bool,
    finished: bool,
}

impl ResolveState {
    /// Do just enough work to produce the next item; `None` ends the stream
    async fn advance(&mut self) -> Option<RegistryResult<ScanTarget>> {
        loop {
            if self.finished {
                return None;
            }

            if self.shutdown.is_triggered() {
                self.finished = true;
                return Some(Err(RegistryError::Cancelled {
                    resource: self.parent.clone(),
                }));
            }

            if let Some(target) = self.targets.pop_front() {
                return Some(Ok(target));
            }

            if let Some(repository) = self.repositories.pop_front() {
                if repository.format != RepositoryFormat::Docker {
                    continue;
                }

                match self.scanner.scan(&repository.name, &self.shutdown).await {
                    Ok(targets) => {
                        log::debug!(
                            "Scanned repository: repository={} targets={}",
                            repository.name,
                            targets.len()
                        );
                        self.targets = targets.into();
                        continue;
                    }
                    Err(e @ RegistryError::Cancelled { .. }) => {
                        self.finished = true;
                        return Some(Err(e));
                    }
                    Err(e) => {
                        log::warn!("Failed to scan repository {}: {}", repository.name, e);
                        return Some(Err(e));
                    }
                }
            }

            if self.repositories_exhausted {
                self.finished = true;
                return None;
            }

            if let Err(e) = self.fetch_repository_page().await {
                self.finished = true;
                return Some(Err(e));
            }
        }
    }

    async fn fetch_repository_page(&mut self) -> RegistryResult<()> {
        let page = tokio::select! {
            biased;
            _ = self.shutdown.cancelled() => {
                return Err(RegistryError::Cancelled {
                    resource: self.parent.clone(),
                });
            }
            page = self.client.list_repositories(&self.parent, self.next_page_token.as_deref()) => {
                page.map_err(|e| RegistryError::listing_failed(format!("repositories in {}", self.parent), e))?
            }
        };

        self.repositories = page.items.into();
        self.repositories_exhausted = page.next_page_token.is_none();
        self.next_page_token = page.next_page_token;
        Ok(())
    }
}
