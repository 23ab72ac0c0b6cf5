//! Test helpers for registry unit tests
//!
//! An in-memory [`RegistryClient`] with call counters, so tests can assert how
//! much listing work the resolver actually performed.

use crate::registry::client::RegistryClient;
use crate::registry::error::ClientError;
use crate::registry::types::{DockerImage, Page, Repository, RepositoryFormat};
use chrono::{DateTime, Duration, TimeZone, Utc};
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

pub const PROJECT: &str = "demo-project";
pub const LOCATION: &str = "us-central1";

/// Deterministic 64-hex digest derived from a short seed
pub fn digest(seed: &str) -> String {
    let hex: String = seed
        .bytes()
        .map(|b| format!("{:02x}", b))
        .collect::<String>()
        .chars()
        .cycle()
        .take(64)
        .collect();
    format!("sha256:{}", hex)
}

pub fn base_time() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap()
}

pub fn repository_name(repository: &str) -> String {
    format!("projects/{}/locations/{}/repositories/{}", PROJECT, LOCATION, repository)
}

pub fn docker_repository(repository: &str) -> Repository {
    Repository {
        name: repository_name(repository),
        format: RepositoryFormat::Docker,
    }
}

pub fn maven_repository(repository: &str) -> Repository {
    Repository {
        name: repository_name(repository),
        format: RepositoryFormat::Maven,
    }
}

/// Image version in `repository` with a digest derived from `seed`
pub fn image(repository: &str, name: &str, seed: &str, tags: &[&str], age_hours: i64) -> DockerImage {
    DockerImage {
        name: format!("{}/dockerImages/{}", repository_name(repository), name),
        uri: format!(
            "{}-docker.pkg.dev/{}/{}/{}@{}",
            LOCATION,
            PROJECT,
            repository,
            name,
            digest(seed)
        ),
        tags: tags.iter().map(|t| t.to_string()).collect(),
        update_time: base_time() - Duration::hours(age_hours),
    }
}

type Pages<T> = Vec<Result<Vec<T>, String>>;

/// In-memory registry. Pages are addressed by index; the page token is the
/// index of the next page.
#[derive(Default)]
pub struct MockRegistryClient {
    repository_pages: Pages<Repository>,
    image_pages: HashMap<String, Pages<DockerImage>>,
    hang_on_repositories: AtomicBool,
    pub repository_calls: AtomicUsize,
    pub image_calls: AtomicUsize,
}

impl MockRegistryClient {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_repository_page(mut self, repositories: Vec<Repository>) -> Self {
        self.repository_pages.push(Ok(repositories));
        self
    }

    pub fn with_repository_error(mut self, message: &str) -> Self {
        self.repository_pages.push(Err(message.to_string()));
        self
    }

    pub fn with_image_page(mut self, repository: &str, images: Vec<DockerImage>) -> Self {
        self.image_pages
            .entry(repository_name(repository))
            .or_default()
            .push(Ok(images));
        self
    }

    pub fn with_image_error(mut self, repository: &str, message: &str) -> Self {
        self.image_pages
            .entry(repository_name(repository))
            .or_default()
            .push(Err(message.to_string()));
        self
    }

    /// Make repository listing block forever
    pub fn hanging(self) -> Self {
        self.hang_on_repositories.store(true, Ordering::SeqCst);
        self
    }

    pub fn repository_calls(&self) -> usize {
        self.repository_calls.load(Ordering::SeqCst)
    }

    pub fn image_calls(&self) -> usize {
        self.image_calls.load(Ordering::SeqCst)
    }
}

fn page_at<T: Clone>(pages: &Pages<T>, page_token: Option<&str>) -> Result<Page<T>, ClientError> {
    let index: usize = page_token.map(|t| t.parse().unwrap_or(0)).unwrap_or(0);
    match pages.get(index) {
        None => Ok(Page::last(Vec::new())),
        Some(Err(message)) => Err(message.clone().into()),
        Some(Ok(items)) => Ok(Page {
            items: items.clone(),
            next_page_token: (index + 1 < pages.len()).then(|| (index + 1).to_string()),
        }),
    }
}

#[async_trait::async_trait]
impl RegistryClient for MockRegistryClient {
    async fn list_repositories(
        &self,
        _parent: &str,
        page_token: Option<&str>,
    ) -> Result<Page<Repository>, ClientError> {
        self.repository_calls.fetch_add(1, Ordering::SeqCst);
        if self.hang_on_repositories.load(Ordering::SeqCst) {
            futures::future::pending::<()>().await;
        }
        page_at(&self.repository_pages, page_token)
    }

    async fn list_docker_images(
        &self,
        parent: &str,
        order_by: &str,
        page_token: Option<&str>,
    ) -> Result<Page<DockerImage>, ClientError> {
        assert_eq!(order_by, "update_time desc");
        self.image_calls.fetch_add(1, Ordering::SeqCst);
        match self.image_pages.get(parent) {
            Some(pages) => page_at(pages, page_token),
            None => Ok(Page::last(Vec::new())),
        }
    }
}
