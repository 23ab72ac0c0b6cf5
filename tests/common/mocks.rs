//! In-memory collaborators for pipeline tests

use chrono::Utc;
use drydock::analyzer::filter::{build_summary, filter_by_severity, filter_fixable};
use drydock::analyzer::{AnalyzeRequest, AnalyzeResult, Analyzer, AnalyzerError, AnalyzerResult, Vulnerability};
use drydock::registry::api::{ClientError, DockerImage, Page, RegistryClient, Repository};
use std::collections::HashMap;
use std::io::Write;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

/// Registry backed by fixed pages; unknown repositories fail
#[derive(Default)]
pub struct FakeRegistry {
    repository_pages: Vec<Vec<Repository>>,
    images: HashMap<String, Vec<Vec<DockerImage>>>,
    pub image_listings: AtomicUsize,
}

impl FakeRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_repository_page(mut self, page: Vec<Repository>) -> Self {
        self.repository_pages.push(page);
        self
    }

    pub fn with_images(mut self, repository_name: String, pages: Vec<Vec<DockerImage>>) -> Self {
        self.images.insert(repository_name, pages);
        self
    }
}

fn page_index(token: Option<&str>) -> usize {
    token.and_then(|t| t.parse().ok()).unwrap_or(0)
}

fn page_of<T: Clone>(pages: &[Vec<T>], index: usize) -> Page<T> {
    Page {
        items: pages.get(index).cloned().unwrap_or_default(),
        next_page_token: (index + 1 < pages.len()).then(|| (index + 1).to_string()),
    }
}

#[async_trait::async_trait]
impl RegistryClient for FakeRegistry {
    async fn list_repositories(
        &self,
        _parent: &str,
        page_token: Option<&str>,
    ) -> Result<Page<Repository>, ClientError> {
        Ok(page_of(&self.repository_pages, page_index(page_token)))
    }

    async fn list_docker_images(
        &self,
        parent: &str,
        _order_by: &str,
        page_token: Option<&str>,
    ) -> Result<Page<DockerImage>, ClientError> {
        self.image_listings.fetch_add(1, Ordering::SeqCst);
        match self.images.get(parent) {
            Some(pages) => Ok(page_of(pages, page_index(page_token))),
            None => Err(format!("403 Forbidden: {}", parent).into()),
        }
    }
}

/// Analyzer returning canned findings per image name, filtered like the real one
#[derive(Default)]
pub struct FakeAnalyzer {
    findings: HashMap<String, Vec<Vulnerability>>,
    failing: Vec<String>,
    pub requests: Mutex<Vec<AnalyzeRequest>>,
}

impl FakeAnalyzer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_findings(mut self, image_name: &str, findings: Vec<Vulnerability>) -> Self {
        self.findings.insert(image_name.to_string(), findings);
        self
    }

    pub fn failing_for(mut self, image_name: &str) -> Self {
        self.failing.push(image_name.to_string());
        self
    }

    pub fn analyzed_digests(&self) -> Vec<String> {
        let mut digests: Vec<String> = self
            .requests
            .lock()
            .unwrap()
            .iter()
            .filter_map(|r| r.artifact.digest.clone())
            .collect();
        digests.sort();
        digests
    }
}

#[async_trait::async_trait]
impl Analyzer for FakeAnalyzer {
    async fn analyze(&self, request: &AnalyzeRequest) -> AnalyzerResult<AnalyzeResult> {
        self.requests.lock().unwrap().push(request.clone());
        let image_name = &request.artifact.image_name;

        if self.failing.contains(image_name) {
            return Err(AnalyzerError::InvalidRequest {
                message: format!("no occurrences visible for {}", image_name),
            });
        }

        let all = self.findings.get(image_name).cloned().unwrap_or_default();
        let mut vulnerabilities = filter_by_severity(all, request.min_severity);
        if request.fixable_only {
            vulnerabilities = filter_fixable(vulnerabilities);
        }
        let summary = build_summary(&vulnerabilities);

        Ok(AnalyzeResult {
            artifact: request.artifact.clone(),
            scan_time: Utc::now(),
            vulnerabilities,
            summary,
        })
    }
}

/// Cloneable in-memory writer handed to an exporter
#[derive(Clone, Default)]
pub struct SharedBuffer(Arc<Mutex<Vec<u8>>>);

impl SharedBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contents(&self) -> String {
        String::from_utf8(self.0.lock().unwrap().clone()).unwrap()
    }
}

impl Write for SharedBuffer {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}
