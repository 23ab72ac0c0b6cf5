//! Command-line arguments
//!
//! Every setting that can also come from the config file is an `Option` here;
//! `None` means "not given on the command line" so file values can fill it in.

use crate::analyzer::types::Severity;
use crate::core::version::long_version;
use crate::export::traits::ExportFormat;
use crate::scanner::types::{ScanOptions, DEFAULT_CONCURRENCY};
use clap::Parser;
use std::path::PathBuf;
use std::time::Duration;

#[derive(Parser, Debug, Clone, Default)]
#[command(name = "drydock")]
#[command(about = "Scan the latest container images in Artifact Registry for known vulnerabilities")]
#[command(version = long_version())]
pub struct Args {
    /// Artifact Registry location (e.g. us-central1)
    #[arg(short = 'l', long = "location", value_name = "LOCATION")]
    pub location: Option<String>,

    /// Google Cloud project ID (inferred from the environment when omitted)
    #[arg(short = 'p', long = "project", value_name = "PROJECT")]
    pub project: Option<String>,

    /// Minimum severity to report [default: HIGH]
    #[arg(short = 's', long = "min-severity", value_name = "SEVERITY", value_parser = parse_severity_name)]
    pub min_severity: Option<String>,

    /// Report format [default: json]
    #[arg(short = 'o', long = "output-format", value_name = "FORMAT", value_parser = parse_format_name)]
    pub output_format: Option<String>,

    /// Images analyzed in parallel [default: 5]
    #[arg(short = 'c', long = "concurrency", value_name = "N", value_parser = clap::value_parser!(u8).range(1..))]
    pub concurrency: Option<u8>,

    /// Only report vulnerabilities that have a fix available
    #[arg(short = 'f', long = "fixable")]
    pub fixable: bool,

    /// Enable debug logging
    #[arg(short = 'd', long = "debug")]
    pub debug: bool,

    /// Configuration file path
    #[arg(long = "config-file", value_name = "FILE")]
    pub config_file: Option<PathBuf>,

    /// Log level
    #[arg(long = "log-level", value_name = "LEVEL", value_parser = ["trace", "debug", "info", "warn", "error", "off"])]
    pub log_level: Option<String>,

    /// Log output format
    #[arg(long = "log-format", value_name = "FORMAT", value_parser = ["text", "ext", "json"])]
    pub log_format: Option<String>,

    /// Write logs to this file instead of stderr
    #[arg(long = "log-file", value_name = "FILE")]
    pub log_file: Option<PathBuf>,

    /// Disable colored log output
    #[arg(long = "no-color")]
    pub no_color: bool,

    /// Cancel the scan after this many seconds
    #[arg(long = "timeout", value_name = "SECONDS", value_parser = clap::value_parser!(u64).range(1..))]
    pub timeout: Option<u64>,
}

/// Canonical severity name ("high" -> "HIGH")
pub fn parse_severity_name(value: &str) -> Result<String, String> {
    value.parse::<Severity>().map(|s| s.name().to_string())
}

/// Canonical format name ("markdown" -> "md")
pub fn parse_format_name(value: &str) -> Result<String, String> {
    value.parse::<ExportFormat>().map(|f| f.name().to_string())
}

impl Args {
    pub fn new() -> Self {
        Self::default()
    }

    /// Minimum severity, falling back to HIGH
    pub fn severity(&self) -> Result<Severity, String> {
        match self.min_severity.as_deref() {
            Some(name) => name.parse(),
            None => Ok(Severity::High),
        }
    }

    /// Output format, falling back to JSON
    pub fn format(&self) -> Result<ExportFormat, String> {
        match self.output_format.as_deref() {
            Some(name) => name.parse(),
            None => Ok(ExportFormat::default()),
        }
    }

    pub fn concurrency_or_default(&self) -> u8 {
        self.concurrency.unwrap_or(DEFAULT_CONCURRENCY)
    }

    pub fn timeout_duration(&self) -> Option<Duration> {
        self.timeout.map(Duration::from_secs)
    }

    /// Effective log level; `--debug` wins over everything else
    pub fn effective_log_level(&self) -> String {
        if self.debug {
            "debug".to_string()
        } else {
            self.log_level.clone().unwrap_or_else(|| "info".to_string())
        }
    }

    /// Build scan options for `project`. Call after [`Args::validate`].
    pub fn scan_options(&self, project: &str) -> Result<ScanOptions, String> {
        let location = self
            .location
            .as_deref()
            .map(str::trim)
            .filter(|l| !l.is_empty())
            .ok_or_else(|| "location is required".to_string())?;

        Ok(ScanOptions::new(project, location)
            .with_min_severity(self.severity()?)
            .with_fixable_only(self.fixable)
            .with_concurrency(self.concurrency_or_default()))
    }
}
