//! Application startup
//!
//! Parses arguments, merges the config file, starts logging and the tokio
//! runtime, wires the Google Cloud clients into a [`ScanOrchestrator`] and
//! maps the outcome to a process exit code.

use crate::analyzer::grafeas::ContainerAnalysisClient;
use crate::app::cli::Args;
use crate::core::error_handling::log_error_with_context;
use crate::core::logging::{init_logging, LoggingOptions};
use crate::core::shutdown::{ShutdownCoordinator, ShutdownSignal};
use crate::export::new_exporter;
use crate::gcp::{discover_project_id, ApiTransport, CredentialSource, TokenProvider};
use crate::registry::http::ArtifactRegistryClient;
use crate::registry::resolver::ImageResolver;
use crate::scanner::{ScanError, ScanOrchestrator, ScanStatus};
use clap::Parser;
use std::io::IsTerminal;
use std::sync::Arc;
use std::time::Instant;

/// Scan completed; nothing failed
pub const EXIT_SUCCESS: i32 = 0;
/// Something failed, possibly after a partial report was written
pub const EXIT_FAILURE: i32 = 1;
/// Interrupted by SIGINT/SIGTERM
pub const EXIT_INTERRUPTED: i32 = 130;

/// Run the application and return the process exit code.
///
/// Argument errors never reach here: clap prints usage and exits with 2.
pub fn startup() -> i32 {
    let mut args = Args::parse();

    // Logging is not up yet, so config problems go straight to stderr
    if let Err(e) = args.load_config_file() {
        eprintln!("Error: {}", e);
        return EXIT_FAILURE;
    }

    let logging = LoggingOptions {
        level: Some(args.effective_log_level()),
        format: args.log_format.clone(),
        file: args.log_file.clone(),
        color: args.log_file.is_none() && !args.no_color && std::io::stderr().is_terminal(),
    };
    if let Err(e) = init_logging(&logging) {
        eprintln!("Error: failed to initialize logging: {}", e);
        return EXIT_FAILURE;
    }

    if let Err(e) = args.validate() {
        log_error_with_context(&e, "Validating arguments");
        return EXIT_FAILURE;
    }

    log::debug!("Final arguments: {:?}", args);

    let runtime = match tokio::runtime::Builder::new_multi_thread().enable_all().build() {
        Ok(runtime) => runtime,
        Err(e) => {
            log::error!("FATAL: failed to start async runtime: {}", e);
            return EXIT_FAILURE;
        }
    };

    runtime.block_on(run(args))
}

async fn run(args: Args) -> i32 {
    let coordinator = ShutdownCoordinator::new();
    coordinator.install_signal_handlers();
    if let Some(timeout) = args.timeout_duration() {
        coordinator.trigger_after(timeout);
    }

    let started = Instant::now();
    let code = scan(&args, coordinator.signal()).await;

    let timed_out = args
        .timeout_duration()
        .is_some_and(|timeout| started.elapsed() >= timeout);
    if coordinator.is_shutdown_requested() && !timed_out {
        log::warn!("Scan interrupted");
        return EXIT_INTERRUPTED;
    }
    code
}

async fn scan(args: &Args, shutdown: ShutdownSignal) -> i32 {
    let http = match ApiTransport::http_client() {
        Ok(http) => http,
        Err(e) => {
            log_error_with_context(&e, "Creating HTTP client");
            return EXIT_FAILURE;
        }
    };

    let project = match args.project.as_deref().map(str::trim) {
        Some(project) => project.to_string(),
        None => match discover_project_id(&http).await {
            Ok(project) => {
                log::info!("Using inferred project ID: {}", project);
                project
            }
            Err(e) => {
                log_error_with_context(&e, "Determining Google Cloud project");
                return EXIT_FAILURE;
            }
        },
    };

    let (options, format) = match (args.scan_options(&project), args.format()) {
        (Ok(options), Ok(format)) => (options, format),
        (Err(message), _) | (_, Err(message)) => {
            log_error_with_context(&ScanError::Configuration { message }, "Building scan options");
            return EXIT_FAILURE;
        }
    };

    let tokens = Arc::new(TokenProvider::new(CredentialSource::detect(), http.clone()));
    let transport = ApiTransport::new(http, tokens).with_quota_project(project.as_str());

    let registry = Arc::new(ArtifactRegistryClient::new(transport.clone()));
    let resolver = Arc::new(ImageResolver::new(registry));
    let analyzer = Arc::new(ContainerAnalysisClient::new(transport));
    let exporter = new_exporter(format, Box::new(std::io::stdout()));

    log::info!(
        "Starting scan: project={} location={} min_severity={} fixable_only={} concurrency={} format={}",
        options.project,
        options.location,
        options.min_severity,
        options.fixable_only,
        options.concurrency,
        format
    );

    let orchestrator = ScanOrchestrator::new(resolver, analyzer, exporter);
    let summary = match orchestrator.run(&options, shutdown).await {
        Ok(summary) => summary,
        Err(e) => {
            log_error_with_context(&e, "Scan failed");
            return EXIT_FAILURE;
        }
    };

    let status = summary.status();
    log::info!(
        "Scan finished: status={:?} targets={} exported={} failures={}",
        status,
        summary.targets_found,
        summary.results_exported,
        summary.failures.len()
    );

    match summary.into_result() {
        Ok(_) => EXIT_SUCCESS,
        Err(e) => {
            if status == ScanStatus::PartiallySucceeded {
                log::warn!("Report written, but some images could not be scanned");
            }
            log_error_with_context(&e, "Scan completed with errors");
            EXIT_FAILURE
        }
    }
}
