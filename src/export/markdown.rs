//! Markdown exporter (rendered with tera)

use crate::analyzer::types::AnalyzeResult;
use crate::core::sync::handle_mutex_poison;
use crate::export::error::{ExportError, ExportResult};
use crate::export::traits::Exporter;
use serde::Serialize;
use std::io::Write;
use std::sync::Mutex;
use tera::{Context, Tera};

const REPORT_TEMPLATE: &str = r#"# Vulnerability Scan Report
{% for result in results %}
## Image: {{ result.uri }}

**Scan Time**: {{ result.scan_time }}

### Summary

Total vulnerabilities found: {{ result.total_count }}
Vulnerabilities with fixes available: {{ result.fixable_count }}

#### Severity Breakdown

| Severity Level | Count |
|---------------|-------|
{% for row in result.severities %}| {{ row.severity }} | {{ row.count }} |
{% endfor %}
### Vulnerabilities

| ID | Severity | Package | Installed Version | Fixed Version | CVSS Score |
|----|----------|---------|-------------------|---------------|------------|
{% for v in result.vulnerabilities %}| {{ v.id }} | {{ v.severity }} | {{ v.package }} | {{ v.installed_version }} | {{ v.fixed_version }} | {{ v.cvss_score }} |
{% endfor %}{% endfor %}"#;

#[derive(Serialize)]
struct ReportView {
    results: Vec<ResultView>,
}

#[derive(Serialize)]
struct ResultView {
    uri: String,
    scan_time: String,
    total_count: usize,
    fixable_count: usize,
    severities: Vec<SeverityRow>,
    vulnerabilities: Vec<VulnerabilityRow>,
}

#[derive(Serialize)]
struct SeverityRow {
    severity: String,
    count: usize,
}

#[derive(Serialize)]
struct VulnerabilityRow {
    id: String,
    severity: String,
    package: String,
    installed_version: String,
    fixed_version: String,
    cvss_score: String,
}

/// Pipes would split table cells
fn cell(value: &str) -> String {
    value.replace('|', "\\|").replace('\n', " ")
}

impl From<&AnalyzeResult> for ResultView {
    fn from(result: &AnalyzeResult) -> Self {
        ResultView {
            uri: result.artifact.to_string(),
            scan_time: result.scan_time.format("%Y-%m-%d %H:%M:%S").to_string(),
            total_count: result.summary.total_count,
            fixable_count: result.summary.fixable_count,
            // Most severe first
            severities: result
                .summary
                .count_by_severity
                .iter()
                .rev()
                .map(|(severity, count)| SeverityRow {
                    severity: severity.to_string(),
                    count: *count,
                })
                .collect(),
            vulnerabilities: result
                .vulnerabilities
                .iter()
                .map(|v| VulnerabilityRow {
                    id: cell(&v.id),
                    severity: v.severity.to_string(),
                    package: cell(&v.package_name),
                    installed_version: cell(&v.installed_version),
                    fixed_version: cell(&v.fixed_version),
                    cvss_score: format!("{:.1}", v.cvss_score),
                })
                .collect(),
        }
    }
}

pub struct MarkdownExporter<W: Write + Send> {
    writer: Mutex<W>,
}

impl<W: Write + Send> MarkdownExporter<W> {
    pub fn new(writer: W) -> Self {
        Self {
            writer: Mutex::new(writer),
        }
    }

    pub fn into_inner(self) -> W {
        self.writer
            .into_inner()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn render(results: &[AnalyzeResult]) -> ExportResult<String> {
        let view = ReportView {
            results: results.iter().map(ResultView::from).collect(),
        };
        let context = Context::from_serialize(&view)?;
        Ok(Tera::one_off(REPORT_TEMPLATE, &context, false)?)
    }
}

impl<W: Write + Send> Exporter for MarkdownExporter<W> {
    fn export(&self, results: &[AnalyzeResult]) -> ExportResult<()> {
        let report = Self::render(results)?;

        let mut writer = handle_mutex_poison(self.writer.lock(), |message| ExportError::Writer {
            message,
        })?;
        writer.write_all(report.as_bytes())?;
        writer.flush()?;
        Ok(())
    }
}
