//! Scan Orchestrator
//!
//! Pulls targets from a [`TargetSource`], analyzes them on a bounded pool of
//! workers, then exports every successful result in one call.
//!
//! Flow: resolve (single producer) -> dispatch (permit per worker) -> drain
//! (join all workers) -> export (once, only if there is something to export).

use crate::analyzer::client::Analyzer;
use crate::analyzer::types::AnalyzeRequest;
use crate::core::permits::PermitPool;
use crate::core::shutdown::ShutdownSignal;
use crate::core::sync::handle_mutex_poison;
use crate::export::traits::Exporter;
use crate::registry::resolver::TargetSource;
use crate::registry::types::ScanTarget;
use crate::scanner::collector::ScanCollector;
use crate::scanner::error::{ScanError, ScanResult};
use crate::scanner::types::{ScanOptions, ScanOutcome, ScanSummary};
use futures::StreamExt;
use std::sync::{Arc, Mutex};
use tokio::task::{JoinError, JoinSet};

pub struct ScanOrchestrator {
    source: Arc<dyn TargetSource>,
    analyzer: Arc<dyn Analyzer>,
    exporter: Box<dyn Exporter>,
}

impl ScanOrchestrator {
    pub fn new(
        source: Arc<dyn TargetSource>,
        analyzer: Arc<dyn Analyzer>,
        exporter: Box<dyn Exporter>,
    ) -> Self {
        Self {
            source,
            analyzer,
            exporter,
        }
    }

    /// Run one scan to completion.
    ///
    /// Per-target and per-repository failures are collected into the returned
    /// summary; only configuration and export failures are returned as `Err`.
    pub async fn run(&self, options: &ScanOptions, shutdown: ShutdownSignal) -> ScanResult<ScanSummary> {
        if options.concurrency == 0 {
            return Err(ScanError::Configuration {
                message: "concurrency must be at least 1".to_string(),
            });
        }

        log::debug!(
            "Resolving images from Artifact Registry: project={} location={} concurrency={}",
            options.project,
            options.location,
            options.concurrency
        );

        let collector = Arc::new(Mutex::new(ScanCollector::new()));
        let permits = PermitPool::new(options.concurrency as usize);
        let mut workers = JoinSet::new();
        let mut targets_found = 0usize;

        let mut targets = self
            .source
            .targets(&options.project, &options.location, shutdown.clone());

        while let Some(item) = targets.next().await {
            let target = match item {
                Ok(target) => target,
                Err(e) => {
                    log::warn!("Error occurred during image resolution stream: {}", e);
                    lock_collector(&collector)?.record_error(ScanError::Resolution(e));
                    continue;
                }
            };
            targets_found += 1;

            // Blocks while `concurrency` workers are in flight
            let permit = permits.acquire().await.map_err(|e| ScanError::Internal {
                message: format!("worker permit pool closed: {}", e),
            })?;

            let analyzer = Arc::clone(&self.analyzer);
            let worker_collector = Arc::clone(&collector);
            let shutdown = shutdown.clone();
            let request = AnalyzeRequest {
                artifact: target.artifact.clone(),
                location: target.location.clone(),
                min_severity: options.min_severity,
                fixable_only: options.fixable_only,
            };

            workers.spawn(async move {
                let _permit = permit;
                let outcome = analyze_target(analyzer.as_ref(), target, request, &shutdown).await;
                match lock_collector(&worker_collector) {
                    Ok(mut collector) => collector.record(outcome),
                    Err(e) => log::error!("Dropping outcome: {}", e),
                }
            });

            while let Some(joined) = workers.try_join_next() {
                record_join(&collector, joined)?;
            }
        }
        drop(targets);

        while let Some(joined) = workers.join_next().await {
            record_join(&collector, joined)?;
        }

        let (results, failures) = std::mem::take(&mut *lock_collector(&collector)?).into_parts();

        log::info!(
            "Scan phase completed: targets_found={} scanned_successfully={} failures={}",
            targets_found,
            results.len(),
            failures.len()
        );

        if results.is_empty() {
            log::warn!("No vulnerabilities found or no images scanned.");
        } else {
            log::info!("Exporting {} results...", results.len());
            self.exporter.export(&results)?;
        }

        Ok(ScanSummary {
            targets_found,
            results_exported: results.len(),
            failures,
        })
    }
}

fn lock_collector(
    collector: &Mutex<ScanCollector>,
) -> ScanResult<std::sync::MutexGuard<'_, ScanCollector>> {
    handle_mutex_poison(collector.lock(), |message| ScanError::Internal { message })
}

/// A panicked worker still counts as a failure
fn record_join(collector: &Mutex<ScanCollector>, joined: Result<(), JoinError>) -> ScanResult<()> {
    if let Err(e) = joined {
        log::error!("Analysis worker failed: {}", e);
        lock_collector(collector)?.record_error(ScanError::Internal {
            message: format!("analysis worker failed: {}", e),
        });
    }
    Ok(())
}

/// Analyze one target, giving up as soon as shutdown is requested
async fn analyze_target(
    analyzer: &dyn Analyzer,
    target: ScanTarget,
    request: AnalyzeRequest,
    shutdown: &ShutdownSignal,
) -> ScanOutcome {
    log::debug!("Analyzing image: image={} uri={}", target.artifact.image_name, target.uri);

    let result = tokio::select! {
        biased;
        _ = shutdown.cancelled() => Err(ScanError::Cancelled {
            uri: target.uri.clone(),
        }),
        analyzed = analyzer.analyze(&request) => analyzed.map_err(|source| ScanError::AnalysisFailed {
            uri: target.uri.clone(),
            source,
        }),
    };

    if let Err(e) = &result {
        log::warn!("Analysis failed: image={} error={}", target.artifact.image_name, e);
    }

    ScanOutcome { target, result }
}
