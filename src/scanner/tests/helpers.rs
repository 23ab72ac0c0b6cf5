//! Test helpers for scanner unit tests
//!
//! In-memory collaborators for the orchestrator. These are separate from the
//! integration test helpers in tests/common/ since unit tests and integration
//! tests run in different contexts.

use crate::analyzer::client::Analyzer;
use crate::analyzer::error::{AnalyzerError, AnalyzerResult};
use crate::analyzer::types::{AnalyzeRequest, AnalyzeResult};
use crate::core::shutdown::ShutdownSignal;
use crate::export::error::{ExportError, ExportResult};
use crate::export::traits::Exporter;
use crate::registry::error::{RegistryError, RegistryResult};
use crate::registry::reference::parse_artifact_uri;
use crate::registry::resolver::TargetSource;
use crate::registry::types::ScanTarget;
use chrono::Utc;
use futures::stream::{self, BoxStream, StreamExt};
use std::collections::HashSet;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

pub fn target(name: &str) -> ScanTarget {
    let uri = format!("us-central1-docker.pkg.dev/demo/apps/{}@sha256:{}", name, "ab".repeat(32));
    ScanTarget {
        artifact: parse_artifact_uri(&uri).unwrap(),
        uri,
        location: "us-central1".to_string(),
        repository: "apps".to_string(),
    }
}

pub fn targets(count: usize) -> Vec<ScanTarget> {
    (0..count).map(|i| target(&format!("image-{}", i))).collect()
}

/// One item a [`StaticSource`] yields
#[derive(Clone)]
pub enum SourceItem {
    Target(ScanTarget),
    Failure(String),
}

/// Yields a fixed list of targets and failures
pub struct StaticSource {
    items: Vec<SourceItem>,
}

impl StaticSource {
    pub fn new(items: Vec<SourceItem>) -> Self {
        Self { items }
    }

    pub fn of_targets(targets: Vec<ScanTarget>) -> Self {
        Self::new(targets.into_iter().map(SourceItem::Target).collect())
    }
}

impl TargetSource for StaticSource {
    fn targets(
        &self,
        _project: &str,
        _location: &str,
        _shutdown: ShutdownSignal,
    ) -> BoxStream<'static, RegistryResult<ScanTarget>> {
        let items: Vec<RegistryResult<ScanTarget>> = self
            .items
            .iter()
            .cloned()
            .map(|item| match item {
                SourceItem::Target(target) => Ok(target),
                SourceItem::Failure(resource) => Err(RegistryError::listing_failed(
                    resource,
                    "permission denied",
                )),
            })
            .collect();
        stream::iter(items).boxed()
    }
}

/// Analyzer that tracks concurrency and can fail or hang on demand
#[derive(Default)]
pub struct MockAnalyzer {
    delay: Duration,
    hang: bool,
    failing: HashSet<String>,
    in_flight: AtomicUsize,
    pub max_in_flight: AtomicUsize,
    pub calls: AtomicUsize,
    pub requests: Mutex<Vec<AnalyzeRequest>>,
}

impl MockAnalyzer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    pub fn hanging(mut self) -> Self {
        self.hang = true;
        self
    }

    /// Fail requests for these image names
    pub fn failing(mut self, images: &[&str]) -> Self {
        self.failing = images.iter().map(|i| i.to_string()).collect();
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn max_in_flight(&self) -> usize {
        self.max_in_flight.load(Ordering::SeqCst)
    }
}

#[async_trait::async_trait]
impl Analyzer for MockAnalyzer {
    async fn analyze(&self, request: &AnalyzeRequest) -> AnalyzerResult<AnalyzeResult> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.requests.lock().unwrap().push(request.clone());
        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(now, Ordering::SeqCst);

        if self.hang {
            futures::future::pending::<()>().await;
        }
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        self.in_flight.fetch_sub(1, Ordering::SeqCst);

        if self.failing.contains(&request.artifact.image_name) {
            return Err(AnalyzerError::InvalidRequest {
                message: format!("{} rejected", request.artifact.image_name),
            });
        }

        Ok(AnalyzeResult {
            artifact: request.artifact.clone(),
            scan_time: Utc::now(),
            vulnerabilities: Vec::new(),
            summary: Default::default(),
        })
    }
}

/// Records the size of every export call
#[derive(Clone, Default)]
pub struct RecordingExporter {
    pub calls: Arc<Mutex<Vec<usize>>>,
    fail: bool,
}

impl RecordingExporter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }

    pub fn calls(&self) -> Vec<usize> {
        self.calls.lock().unwrap().clone()
    }
}

impl Exporter for RecordingExporter {
    fn export(&self, results: &[AnalyzeResult]) -> ExportResult<()> {
        self.calls.lock().unwrap().push(results.len());
        if self.fail {
            return Err(ExportError::Io(std::io::Error::new(
                std::io::ErrorKind::BrokenPipe,
                "stdout closed",
            )));
        }
        Ok(())
    }
}
