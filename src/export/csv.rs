//! CSV and TSV exporters
//!
//! One row per vulnerability; images without findings produce no rows.

use crate::analyzer::types::{AnalyzeResult, Vulnerability};
use crate::core::sync::handle_mutex_poison;
use crate::export::error::{ExportError, ExportResult};
use crate::export::traits::Exporter;
use chrono::SecondsFormat;
use std::io::Write;
use std::sync::Mutex;

pub const HEADER: [&str; 10] = [
    "Scan Time",
    "Image URI",
    "Vulnerability ID",
    "Severity",
    "CVSS Score",
    "Package Name",
    "Installed Version",
    "Fixed Version",
    "Description",
    "Reference URL",
];

/// Delimiter-separated table exporter
pub struct TableExporter<W: Write + Send> {
    writer: Mutex<W>,
    delimiter: char,
}

impl<W: Write + Send> TableExporter<W> {
    /// Comma separated
    pub fn new_csv(writer: W) -> Self {
        Self::with_delimiter(writer, ',')
    }

    /// Tab separated
    pub fn new_tsv(writer: W) -> Self {
        Self::with_delimiter(writer, '\t')
    }

    fn with_delimiter(writer: W, delimiter: char) -> Self {
        Self {
            writer: Mutex::new(writer),
            delimiter,
        }
    }

    pub fn into_inner(self) -> W {
        self.writer
            .into_inner()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Escape a field if needed. Leading whitespace and a lone `\.` are quoted
    /// too, so readers that trim or treat `\.` as end-of-data keep the value.
    fn escape_value(&self, value: &str) -> String {
        if value.contains(self.delimiter)
            || value.contains('"')
            || value.contains('\n')
            || value.contains('\r')
            || value == "\\."
            || value.starts_with(char::is_whitespace)
        {
            format!("\"{}\"", value.replace('"', "\"\""))
        } else {
            value.to_string()
        }
    }

    fn format_row<S: AsRef<str>>(&self, fields: &[S]) -> String {
        let mut line = fields
            .iter()
            .map(|field| self.escape_value(field.as_ref()))
            .collect::<Vec<_>>()
            .join(&self.delimiter.to_string());
        line.push('\n');
        line
    }
}

/// Fields of one row, in header order
fn build_record(scan_time: &str, image_uri: &str, v: &Vulnerability) -> [String; 10] {
    [
        scan_time.to_string(),
        image_uri.to_string(),
        v.id.clone(),
        v.severity.to_string(),
        format!("{:.1}", v.cvss_score),
        v.package_name.clone(),
        v.installed_version.clone(),
        v.fixed_version.clone(),
        v.description.trim().to_string(),
        v.urls.first().cloned().unwrap_or_default(),
    ]
}

impl<W: Write + Send> Exporter for TableExporter<W> {
    fn export(&self, results: &[AnalyzeResult]) -> ExportResult<()> {
        let mut output = self.format_row(&HEADER);

        for result in results {
            let image_uri = result.artifact.to_string();
            let scan_time = result.scan_time.to_rfc3339_opts(SecondsFormat::Secs, true);

            for v in &result.vulnerabilities {
                output.push_str(&self.format_row(&build_record(&scan_time, &image_uri, v)));
            }
        }

        let mut writer = handle_mutex_poison(self.writer.lock(), |message| ExportError::Writer {
            message,
        })?;
        writer.write_all(output.as_bytes())?;
        writer.flush()?;
        Ok(())
    }
}
